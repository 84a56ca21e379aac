use crate::clipboard::SystemClipboard;
use crate::commands::{ChatState, Flow, dispatch, parse};
use crate::config::Config;
use crate::core::error::GptermError;
use crate::display;
use crate::input;
use crate::providers::LLMProvider;
use std::env;
use std::io::{self, Write};
use tracing::{info, warn};

pub struct Application {
    pub config: Config,
    pub provider: Box<dyn LLMProvider>,
}

impl Application {
    pub fn new(config: Config, provider: Box<dyn LLMProvider>) -> Self {
        Self { config, provider }
    }

    /// Read, classify and dispatch lines until the user exits.
    pub async fn run(self) -> Result<(), GptermError> {
        let Application { config, provider } = self;

        let active_dir = env::current_dir()?;
        info!(dir = %active_dir.display(), model = provider.model(), "session started");

        let mut editor = input::create_editor()?;
        let mut state = ChatState::new(
            &config,
            provider,
            Box::new(SystemClipboard::new()),
            active_dir,
        );

        println!("{}", display::directory_banner(&state.active_dir));
        println!("{}", display::greeting());

        let prompt = display::user_prompt(&config.user_name, config.user_name_color);
        let mut stdout = io::stdout();

        loop {
            println!();
            let line = match input::read_input(&mut editor, &prompt)? {
                Some(line) => line,
                None => break,
            };

            if handle_line(&mut state, &line, &mut stdout).await? == Flow::Exit {
                break;
            }
        }

        if let Err(e) = input::save_history(&mut editor) {
            warn!(error = %e, "could not save input history");
        }
        info!(messages = state.history.len(), "session ended");
        Ok(())
    }
}

/// Classify and run one input line. A failing command is rendered to `out` and the
/// session carries on; only a failed write to `out` is returned.
pub async fn handle_line<W: Write>(
    state: &mut ChatState<'_>,
    line: &str,
    out: &mut W,
) -> Result<Flow, GptermError> {
    let Some(command) = parse(line.trim()) else {
        return Ok(Flow::Continue);
    };

    match dispatch(state, command, out).await {
        Ok(flow) => Ok(flow),
        Err(e) => {
            warn!(error = %e, "command failed");
            writeln!(out, "{}", display::format_error(&e))?;
            Ok(Flow::Continue)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::testing::RecordingClipboard;
    use crate::providers::testing::ScriptedProvider;
    use crate::providers::{Message, Role};
    use console::strip_ansi_codes;
    use tempfile::TempDir;

    #[tokio::test]
    async fn failed_command_is_rendered_and_the_session_continues() {
        let tmp = TempDir::new().unwrap();
        let config = Config {
            api_key: Some("sk-test".to_string()),
            snippet_folder: tmp.path().join("snippets"),
            ..Config::default()
        };
        let mut state = ChatState::new(
            &config,
            Box::new(ScriptedProvider::streaming(&["Hi"])),
            Box::new(RecordingClipboard::default()),
            tmp.path().to_path_buf(),
        );
        let mut out = Vec::new();

        let flow = handle_line(&mut state, "cat missing.txt", &mut out).await.unwrap();
        assert_eq!(flow, Flow::Continue);
        let rendered = strip_ansi_codes(&String::from_utf8_lossy(&out)).to_string();
        assert!(rendered.contains("━━━ Error ━━━"));
        assert!(rendered.contains("File not found"));

        assert_eq!(handle_line(&mut state, "   ", &mut out).await.unwrap(), Flow::Continue);
        assert_eq!(handle_line(&mut state, "hello", &mut out).await.unwrap(), Flow::Continue);

        let roles: Vec<Role> = state.history.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
        assert_eq!(state.history.last(), Some(&Message::assistant("Hi")));
        assert_eq!(handle_line(&mut state, "exit", &mut out).await.unwrap(), Flow::Exit);
    }
}
