use crate::commands::Command;
use crate::core::error::GptermError;
use console::{Style, StyledObject, style};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Named terminal colors accepted in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "black")]
    Black,
    #[serde(rename = "red")]
    Red,
    #[serde(rename = "green")]
    Green,
    #[serde(rename = "yellow")]
    Yellow,
    #[serde(rename = "blue")]
    Blue,
    #[serde(rename = "magenta")]
    Magenta,
    #[serde(rename = "cyan")]
    Cyan,
    #[serde(rename = "white")]
    White,
    #[serde(rename = "gray", alias = "grey")]
    Gray,
    #[serde(rename = "bgBlack")]
    BgBlack,
    #[serde(rename = "bgRed")]
    BgRed,
    #[serde(rename = "bgGreen")]
    BgGreen,
    #[serde(rename = "bgYellow")]
    BgYellow,
    #[serde(rename = "bgBlue")]
    BgBlue,
    #[serde(rename = "bgMagenta")]
    BgMagenta,
    #[serde(rename = "bgCyan")]
    BgCyan,
    #[serde(rename = "bgWhite")]
    BgWhite,
    #[serde(rename = "bgGray", alias = "bgGrey")]
    BgGray,
}

impl Color {
    pub fn style(self) -> Style {
        let base = Style::new();
        match self {
            Color::Black => base.black(),
            Color::Red => base.red(),
            Color::Green => base.green(),
            Color::Yellow => base.yellow(),
            Color::Blue => base.blue(),
            Color::Magenta => base.magenta(),
            Color::Cyan => base.cyan(),
            Color::White => base.white(),
            Color::Gray => base.color256(8),
            Color::BgBlack => base.on_black(),
            Color::BgRed => base.on_red(),
            Color::BgGreen => base.on_green(),
            Color::BgYellow => base.on_yellow(),
            Color::BgBlue => base.on_blue(),
            Color::BgMagenta => base.on_magenta(),
            Color::BgCyan => base.on_cyan(),
            Color::BgWhite => base.on_white(),
            Color::BgGray => base.on_color256(8),
        }
    }

    pub fn paint<D>(self, value: D) -> StyledObject<D> {
        self.style().apply_to(value)
    }
}

fn terminal_width() -> usize {
    let (_, cols) = console::Term::stdout().size();
    (cols as usize).clamp(40, 120)
}

/// Pad `text` on both sides so it sits in the middle of `width` columns.
pub fn centered(text: &str, width: usize) -> String {
    let len = console::measure_text_width(text);
    let left = width.saturating_sub(len) / 2;
    let right = width.saturating_sub(len + left);
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

fn section(text: &str, width: usize) -> String {
    style(centered(text, width))
        .on_cyan()
        .black()
        .bold()
        .to_string()
}

/// Static command reference printed by `help`
pub fn help_menu() -> String {
    let width = terminal_width();
    let entries = Command::help_entries();
    let label_width = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    let mut lines = vec![section("OPTIONS", width), String::new()];
    for (name, description) in entries {
        let label = format!(" {:<label_width$} ", name);
        lines.push(style(label).on_cyan().blue().bold().to_string());
        lines.push(style(*description).cyan().to_string());
        lines.push(String::new());
    }
    lines.push(section("gpterm", width));
    lines.join("\n")
}

pub fn greeting() -> String {
    format!(
        "Type {} for options {} {}",
        style("'help'").magenta().bold(),
        style("or").yellow().italic(),
        style("start chatting").magenta().bold()
    )
}

pub fn directory_banner(dir: &Path) -> String {
    format!(
        "{} {}",
        style("Active directory:").bold().cyan(),
        style(dir.display()).yellow()
    )
}

/// The styled `name: ` prompt shown before each input read.
pub fn user_prompt(user_name: &str, color: Color) -> String {
    format!("{}: ", color.paint(user_name).bold())
}

pub fn status_success(message: &str) -> String {
    format!("{} {}", style("✔").green().bold(), style(message).green())
}

pub fn status_loading(message: &str) -> String {
    format!("{} {}", style("…").yellow().bold(), style(message).yellow().italic())
}

pub fn warning(message: &str) -> String {
    format!("{} {}", style("!").yellow().bold(), style(message).yellow())
}

/// Heading plus a 1-based listing in the order given.
pub fn snippet_list(folder: &Path, entries: &[PathBuf]) -> String {
    let mut lines = vec![format!(
        "{} {}",
        style("Snippets in").bold().underlined(),
        style(folder.display()).bold().underlined()
    )];

    if entries.is_empty() {
        lines.push(style("(no snippets saved yet)").dim().to_string());
    }

    for (i, entry) in entries.iter().enumerate() {
        let name = entry
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        lines.push(format!("{} {}", style(format!("{:>3}.", i + 1)).cyan(), name));
    }

    lines.join("\n")
}

/// Framed, user-facing rendering of a command or stream failure.
pub fn format_error(err: &GptermError) -> String {
    let mut lines = Vec::new();

    match err {
        GptermError::Api {
            status, message, ..
        } => {
            let header = match status {
                Some(status) => format!("━━━ OpenAI API Error ({}) ━━━", status),
                None => "━━━ OpenAI API Error ━━━".to_string(),
            };
            let footer = "━".repeat(console::measure_text_width(&header));
            lines.push(style(header).red().bold().to_string());
            lines.push(String::new());
            lines.push(style(message).yellow().to_string());
            if let Some(guidance) = err.guidance() {
                lines.push(String::new());
                lines.push(style(guidance).dim().to_string());
            }
            lines.push(String::new());
            lines.push(style(footer).red().bold().to_string());
        }
        _ => {
            lines.push(style("━━━ Error ━━━").red().bold().to_string());
            lines.push(String::new());
            lines.push(style(err.to_string()).yellow().to_string());
            lines.push(String::new());
            lines.push(style("━━━━━━━━━━━━━").red().bold().to_string());
        }
    }

    lines.join("\n")
}
