pub mod debug;
pub mod dispatcher;
pub mod handler;
pub mod parser;

use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::history::Conversation;
use crate::providers::LLMProvider;
use std::path::PathBuf;

pub use dispatcher::{Flow, dispatch};
pub use parser::parse;

/// One classified line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Clear,
    Help,
    Cat(String),
    Copy,
    Save(Option<String>),
    Snippet(String),
    Snippets,
    Pwd,
    Debug {
        path: String,
        context: Option<String>,
    },
    Chat(String),
}

impl Command {
    /// First tokens that select a local command.
    pub const RESERVED: &'static [&'static str] = &[
        "clear", "help", "cat", "copy", "save", "pwd", "snippet", "snippets", "debug",
    ];

    pub fn help_entries() -> &'static [(&'static str, &'static str)] {
        &[
            ("exit", "exit the program"),
            ("clear", "clear the terminal"),
            ("help", "show this help menu"),
            ("pwd", "print the active directory"),
            ("cat", "print a file with syntax highlighting - cat <path>"),
            ("copy", "copy the code from the last message to the clipboard"),
            (
                "save",
                "save the code from the last message - save [folder | path/file.ext]",
            ),
            ("snippets", "show a list of saved snippets"),
            ("snippet", "show a saved snippet - snippet <name | number>"),
            (
                "debug",
                "ask for help with a file, inlining its local imports - debug <path> [question]",
            ),
        ]
    }
}

/// Everything the dispatch loop owns for the lifetime of one session.
pub struct ChatState<'a> {
    pub config: &'a Config,
    pub provider: Box<dyn LLMProvider>,
    pub clipboard: Box<dyn Clipboard>,
    pub history: Conversation,
    /// Working directory captured at startup; relative paths resolve against it.
    pub active_dir: PathBuf,
}

impl<'a> ChatState<'a> {
    pub fn new(
        config: &'a Config,
        provider: Box<dyn LLMProvider>,
        clipboard: Box<dyn Clipboard>,
        active_dir: PathBuf,
    ) -> Self {
        Self {
            history: Conversation::new(&config.system_prompt, config.max_history),
            config,
            provider,
            clipboard,
            active_dir,
        }
    }

    /// Resolve a user-supplied path against the active directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        self.active_dir.join(path.trim())
    }
}
