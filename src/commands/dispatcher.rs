use super::{ChatState, Command, handler};
use crate::chat::stream_completion;
use crate::core::error::GptermError;
use crate::display;
use std::io::Write;
use tracing::debug;

/// What the loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Execute one command against the session. Errors are returned to the loop, which
/// renders them and keeps going.
pub async fn dispatch<W: Write>(
    state: &mut ChatState<'_>,
    command: Command,
    out: &mut W,
) -> Result<Flow, GptermError> {
    debug!(?command, "dispatching");

    let output = match command {
        Command::Exit => return Ok(Flow::Exit),
        Command::Clear => handler::clear()?,
        Command::Help => handler::help(),
        Command::Pwd => handler::pwd(state),
        Command::Cat(path) => handler::cat(state, &path)?,
        Command::Snippets => handler::list_snippets(state)?,
        Command::Snippet(query) => handler::show_snippet(state, &query)?,
        Command::Copy => handler::copy(state).await?,
        Command::Save(target) => handler::save(state, target.as_deref()).await?,
        Command::Debug { path, context } => {
            writeln!(out, "{}", display::status_loading("Debugging..."))?;
            let request = handler::prepare_debug(state, &path, context.as_deref())?;
            writeln!(out, "{}", request.preview)?;
            send_prompt(state, request.prompt, out).await?;
            None
        }
        Command::Chat(prompt) => {
            send_prompt(state, prompt, out).await?;
            None
        }
    };

    if let Some(output) = output {
        writeln!(out, "{}", output)?;
    }
    Ok(Flow::Continue)
}

async fn send_prompt<W: Write>(
    state: &mut ChatState<'_>,
    prompt: String,
    out: &mut W,
) -> Result<(), GptermError> {
    state.history.push_user(prompt);
    stream_completion(
        state.provider.as_ref(),
        &mut state.history,
        state.config.response_color,
        out,
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::testing::RecordingClipboard;
    use crate::commands::parse;
    use crate::config::Config;
    use crate::providers::testing::ScriptedProvider;
    use crate::providers::{Message, Role};
    use console::strip_ansi_codes;
    use std::fs;
    use tempfile::TempDir;

    fn config(tmp: &TempDir) -> Config {
        Config {
            api_key: Some("sk-test".to_string()),
            snippet_folder: tmp.path().join("snippets"),
            ..Config::default()
        }
    }

    fn session<'a>(config: &'a Config, tmp: &TempDir, provider: ScriptedProvider) -> ChatState<'a> {
        ChatState::new(
            config,
            Box::new(provider),
            Box::new(RecordingClipboard::default()),
            tmp.path().to_path_buf(),
        )
    }

    async fn run_line(state: &mut ChatState<'_>, line: &str) -> (Result<Flow, GptermError>, String) {
        let mut out = Vec::new();
        let command = parse(line).expect("non-blank line");
        let result = dispatch(state, command, &mut out).await;
        (result, strip_ansi_codes(&String::from_utf8_lossy(&out)).to_string())
    }

    #[tokio::test]
    async fn snippets_on_an_empty_folder_prints_a_heading() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let mut state = session(&config, &tmp, ScriptedProvider::default());

        let (result, out) = run_line(&mut state, "snippets").await;

        assert_eq!(result.unwrap(), Flow::Continue);
        assert!(out.starts_with("Snippets in"));
        assert_eq!(state.history.len(), 1);
    }

    #[tokio::test]
    async fn exit_stops_the_loop() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let mut state = session(&config, &tmp, ScriptedProvider::default());

        let (result, _) = run_line(&mut state, "exit").await;
        assert_eq!(result.unwrap(), Flow::Exit);
    }

    #[tokio::test]
    async fn chat_round_trip_grows_history() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let mut state = session(&config, &tmp, ScriptedProvider::streaming(&["Hi", "!"]));

        let (result, out) = run_line(&mut state, "hello there").await;

        assert_eq!(result.unwrap(), Flow::Continue);
        assert_eq!(out, "Hi!\n");
        let messages = state.history.messages();
        assert_eq!(messages[1], Message::user("hello there"));
        assert_eq!(messages[2], Message::assistant("Hi!"));
    }

    #[tokio::test]
    async fn failed_stream_keeps_the_user_message() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let mut state = session(
            &config,
            &tmp,
            ScriptedProvider::failing_after(&["Hel"], "reset"),
        );

        let (result, _) = run_line(&mut state, "hello").await;

        assert!(matches!(result, Err(GptermError::Transport(_))));
        assert_eq!(state.history.len(), 2);
        assert_eq!(state.history.last_role(), Some(Role::User));
    }

    #[tokio::test]
    async fn local_failures_leave_history_alone() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let mut state = session(&config, &tmp, ScriptedProvider::default());

        let (cat, _) = run_line(&mut state, "cat missing.txt").await;
        let (snippet, _) = run_line(&mut state, "snippet 1").await;
        let (debug, _) = run_line(&mut state, "debug").await;

        assert!(matches!(cat, Err(GptermError::FileNotFound(_))));
        assert!(matches!(
            snippet,
            Err(GptermError::IndexOutOfRange { index: 1, count: 0 })
        ));
        assert!(matches!(debug, Err(GptermError::Input(_))));
        assert_eq!(state.history.len(), 1);
    }

    #[tokio::test]
    async fn debug_sends_the_synthesized_prompt_as_chat() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("app.py"), "print(undefined_name)\n").unwrap();
        let config = config(&tmp);
        let mut state = session(&config, &tmp, ScriptedProvider::streaming(&["NameError"]));

        let (result, out) = run_line(&mut state, "debug app.py it crashes").await;

        assert_eq!(result.unwrap(), Flow::Continue);
        assert!(out.contains("Debugging..."));
        assert!(out.ends_with("NameError\n"));
        assert_eq!(
            state.history.messages()[1],
            Message::user(
                "I need help with this code:\nprint(undefined_name)\n\n// it crashes"
            )
        );
        assert_eq!(state.history.last_role(), Some(Role::Assistant));
    }

    #[tokio::test]
    async fn pwd_prints_the_active_directory() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let mut state = session(&config, &tmp, ScriptedProvider::default());

        let (_, out) = run_line(&mut state, "pwd").await;
        assert!(out.contains(&tmp.path().display().to_string()));
    }
}
