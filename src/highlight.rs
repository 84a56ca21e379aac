use crate::core::error::GptermError;
use std::path::Path;
use std::sync::OnceLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::{LinesWithEndings, as_24_bit_terminal_escaped};

const THEME: &str = "base16-ocean.dark";

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAXES: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAXES.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    static THEMES: OnceLock<ThemeSet> = OnceLock::new();
    THEMES.get_or_init(ThemeSet::load_defaults)
}

/// Extension used to pick a highlighter, e.g. `rs` for `src/main.rs`.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Render `content` with terminal escapes for the language behind `extension`.
pub fn highlight(content: &str, extension: &str) -> Result<String, GptermError> {
    let syntaxes = syntax_set();
    let syntax = syntaxes
        .find_syntax_by_extension(extension)
        .ok_or_else(|| GptermError::RenderingUnsupported(extension.to_string()))?;
    let theme = theme_set()
        .themes
        .get(THEME)
        .ok_or_else(|| GptermError::RenderingUnsupported(extension.to_string()))?;

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut out = String::with_capacity(content.len() * 2);
    for line in LinesWithEndings::from(content) {
        let ranges = highlighter
            .highlight_line(line, syntaxes)
            .map_err(|_| GptermError::RenderingUnsupported(extension.to_string()))?;
        out.push_str(&as_24_bit_terminal_escaped(&ranges, false));
    }
    out.push_str("\x1b[0m");
    Ok(out)
}
