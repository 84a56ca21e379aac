use crate::commands::Command;
use crate::config::Config;
use crate::core::error::GptermError;

use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter, MatchingBracketHighlighter};
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config as EditorConfig, Context, EditMode, Editor, Helper};
use std::borrow::Cow;
use tracing::warn;

pub type LineEditor = Editor<ChatHelper, FileHistory>;

/// Names offered when completing the first token.
fn command_names() -> impl Iterator<Item = &'static str> {
    std::iter::once("exit").chain(Command::RESERVED.iter().copied())
}

/// Completes command names for the first token and file paths after it
pub struct ChatHelper {
    filename_completer: FilenameCompleter,
    bracket_highlighter: MatchingBracketHighlighter,
    history_hinter: HistoryHinter,
}

impl ChatHelper {
    pub fn new() -> Self {
        Self {
            filename_completer: FilenameCompleter::new(),
            bracket_highlighter: MatchingBracketHighlighter::new(),
            history_hinter: HistoryHinter::new(),
        }
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let typed = &line[..pos];
        if !typed.contains(char::is_whitespace) {
            let matches: Vec<Pair> = command_names()
                .filter(|name| name.starts_with(typed))
                .map(|name| Pair {
                    display: name.to_string(),
                    replacement: name.to_string(),
                })
                .collect();

            if !matches.is_empty() {
                return Ok((0, matches));
            }
        }

        self.filename_completer.complete(line, pos, ctx)
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.history_hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.bracket_highlighter.highlight(line, pos)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(console::style(hint).dim().to_string())
    }

    fn highlight_char(&self, line: &str, pos: usize, kind: CmdKind) -> bool {
        self.bracket_highlighter.highlight_char(line, pos, kind)
    }
}

impl Validator for ChatHelper {}

/// Creates a configured rustyline editor with persisted input history
pub fn create_editor() -> Result<LineEditor, GptermError> {
    let config = EditorConfig::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_config(config)
        .map_err(|e| GptermError::Input(format!("Failed to create line editor: {}", e)))?;
    editor.set_helper(Some(ChatHelper::new()));

    match editor.load_history(&Config::history_path()) {
        Ok(()) => {}
        Err(ReadlineError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(error = %e, "could not load input history"),
    }

    Ok(editor)
}

/// Reads one line. `None` means the user pressed Ctrl-C or Ctrl-D.
pub fn read_input(editor: &mut LineEditor, prompt: &str) -> Result<Option<String>, GptermError> {
    match editor.readline(prompt) {
        Ok(line) => {
            if !line.trim().is_empty() {
                editor
                    .add_history_entry(line.as_str())
                    .map_err(|e| GptermError::Input(format!("Failed to add history entry: {}", e)))?;
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(GptermError::Input(format!("Input error: {}", err))),
    }
}

/// Saves the editor history
pub fn save_history(editor: &mut LineEditor) -> Result<(), GptermError> {
    let history_path = Config::history_path();

    if let Some(parent) = history_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                GptermError::Input(format!("Failed to create history directory: {}", e))
            })?;
        }
    }

    editor
        .save_history(&history_path)
        .map_err(|e| GptermError::Input(format!("Failed to save history: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustyline::history::DefaultHistory;

    #[test]
    fn completes_command_names_for_the_first_token() {
        let helper = ChatHelper::new();
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);

        let (start, pairs) = helper.complete("sni", 3, &ctx).unwrap();
        let names: Vec<&str> = pairs.iter().map(|p| p.replacement.as_str()).collect();

        assert_eq!(start, 0);
        assert_eq!(names, vec!["snippet", "snippets"]);
    }
}
