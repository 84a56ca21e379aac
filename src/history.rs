use crate::providers::{Message, Role};

/// Ordered, role-tagged log sent as context on every completion request.
///
/// The first message is always the system prompt. Messages are only ever appended;
/// with a cap configured the oldest non-system messages are evicted first.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    max_messages: Option<usize>,
}

impl Conversation {
    pub fn new(system_prompt: &str, max_messages: Option<usize>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
            max_messages,
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Message::assistant(content));
    }

    fn push(&mut self, message: Message) {
        self.messages.push(message);

        if let Some(max) = self.max_messages {
            let excess = (self.messages.len() - 1).saturating_sub(max.max(1));
            if excess > 0 {
                self.messages.drain(1..1 + excess);
            }
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn last_role(&self) -> Option<Role> {
        self.last().map(|m| m.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_system_prompt() {
        let conversation = Conversation::new("be brief", None);
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0], Message::system("be brief"));
    }

    #[test]
    fn keeps_append_order() {
        let mut conversation = Conversation::new("sys", None);
        conversation.push_user("one");
        conversation.push_user("two");
        conversation.push_assistant("reply");

        let roles: Vec<Role> = conversation.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::User, Role::Assistant]
        );
        assert_eq!(conversation.last().unwrap().content, "reply");
    }

    #[test]
    fn cap_evicts_oldest_but_never_the_system_prompt() {
        let mut conversation = Conversation::new("sys", Some(2));
        conversation.push_user("q1");
        conversation.push_assistant("a1");
        conversation.push_user("q2");

        let contents: Vec<&str> = conversation
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["sys", "a1", "q2"]);
        assert_eq!(conversation.last_role(), Some(Role::User));
    }
}
