use super::Command;

/// Classify one line of input. Blank lines yield `None` so the loop simply re-prompts.
///
/// Only the first whitespace-delimited token is matched, case-sensitively, against
/// the reserved names. Everything else is a chat prompt carrying the original line.
pub fn parse(line: &str) -> Option<Command> {
    if line.trim().is_empty() {
        return None;
    }
    if line == "exit" {
        return Some(Command::Exit);
    }

    let mut tokens = line.split_whitespace();
    let head = tokens.next()?;
    let rest: Vec<&str> = tokens.collect();
    let argument = rest.join(" ");
    let optional = |arg: String| if arg.is_empty() { None } else { Some(arg) };

    let command = match head {
        "clear" => Command::Clear,
        "help" => Command::Help,
        "pwd" => Command::Pwd,
        "copy" => Command::Copy,
        "snippets" => Command::Snippets,
        "cat" => Command::Cat(argument),
        "save" => Command::Save(optional(argument)),
        "snippet" => Command::Snippet(argument),
        "debug" => {
            let (path, context) = match rest.split_first() {
                Some((path, context)) => (path.to_string(), optional(context.join(" "))),
                None => (String::new(), None),
            };
            Command::Debug { path, context }
        }
        _ => Command::Chat(line.to_string()),
    };
    Some(command)
}
