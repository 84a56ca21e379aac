use super::ChatState;
use super::debug::{build_prompt, expand_imports};
use crate::core::error::GptermError;
use crate::crawl::FileIndex;
use crate::display;
use crate::extract::{CodeSnippet, extract_snippet};
use crate::highlight::{extension_of, highlight};
use crate::snippets::{self, SaveTarget};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

fn read_file(path: &Path) -> Result<String, GptermError> {
    fs::read_to_string(path).map_err(|_| GptermError::FileNotFound(path.to_path_buf()))
}

/// Highlight by extension, degrading to a warning plus the raw text.
pub fn render_source(path: &Path, content: &str) -> String {
    match highlight(content, &extension_of(path)) {
        Ok(rendered) => rendered,
        Err(e) => format!("{}\n{}", display::warning(&e.to_string()), content),
    }
}

pub fn help() -> Option<String> {
    Some(display::help_menu())
}

pub fn pwd(state: &ChatState) -> Option<String> {
    Some(display::directory_banner(&state.active_dir))
}

pub fn clear() -> Result<Option<String>, GptermError> {
    console::Term::stdout().clear_screen()?;
    Ok(None)
}

pub fn cat(state: &ChatState, path: &str) -> Result<Option<String>, GptermError> {
    if path.trim().is_empty() {
        return Err(GptermError::Input("Usage: cat <path>".to_string()));
    }

    let path = state.resolve_path(path);
    let content = read_file(&path)?;
    Ok(Some(render_source(&path, &content)))
}

pub fn list_snippets(state: &ChatState) -> Result<Option<String>, GptermError> {
    let folder = &state.config.snippet_folder;
    let entries = snippets::list(folder)?;
    Ok(Some(display::snippet_list(folder, &entries)))
}

pub fn show_snippet(state: &ChatState, query: &str) -> Result<Option<String>, GptermError> {
    if query.trim().is_empty() {
        return Err(GptermError::Input(
            "Usage: snippet <name | number>".to_string(),
        ));
    }

    let entries = snippets::list(&state.config.snippet_folder)?;
    let path = snippets::resolve(&entries, query)?;
    let content =
        fs::read_to_string(path).map_err(|_| GptermError::SnippetNotFound(query.to_string()))?;
    Ok(Some(render_source(path, &content)))
}

async fn extract_from_last_message(state: &ChatState<'_>) -> Result<CodeSnippet, GptermError> {
    let last = state
        .history
        .last()
        .map(|m| m.content.clone())
        .unwrap_or_default();
    extract_snippet(state.provider.as_ref(), &last).await
}

pub async fn copy(state: &mut ChatState<'_>) -> Result<Option<String>, GptermError> {
    let snippet = extract_from_last_message(state).await?;
    state.clipboard.set_text(&snippet.code)?;

    info!(language = %snippet.language, "copied snippet to clipboard");
    Ok(Some(display::status_success(&format!(
        "{} code copied to clipboard",
        snippet.language
    ))))
}

pub async fn save(
    state: &ChatState<'_>,
    argument: Option<&str>,
) -> Result<Option<String>, GptermError> {
    let snippet = extract_from_last_message(state).await?;
    let target = SaveTarget::resolve(
        &state.config.snippet_folder,
        &state.active_dir,
        argument,
        &snippet,
    );
    let path = target.write(&snippet.code)?;

    info!(path = %path.display(), "saved snippet");
    Ok(Some(display::status_success(&format!(
        "Saved {} snippet at {}",
        snippet.language,
        path.display()
    ))))
}

/// A debug request after import expansion: the highlighted source to show and the
/// prompt to send.
pub struct DebugRequest {
    pub preview: String,
    pub prompt: String,
}

pub fn prepare_debug(
    state: &ChatState,
    path: &str,
    context: Option<&str>,
) -> Result<DebugRequest, GptermError> {
    if path.trim().is_empty() {
        return Err(GptermError::Input(
            "Usage: debug <path> [question]".to_string(),
        ));
    }

    let path = state.resolve_path(path);
    let content = read_file(&path)?;
    let index = FileIndex::build(&state.active_dir);
    debug!(files = index.files().len(), "indexed active directory");
    let expanded = expand_imports(&content, &index);

    Ok(DebugRequest {
        preview: render_source(&path, &content),
        prompt: build_prompt(&expanded, context),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::testing::RecordingClipboard;
    use crate::config::Config;
    use crate::providers::testing::ScriptedProvider;
    use console::strip_ansi_codes;
    use tempfile::TempDir;

    const REPLY: &str = r#"{"code":"fn main() {}","language":"Rust","snippetName":"mainFn","fileExtension":"rs"}"#;

    fn config(tmp: &TempDir) -> Config {
        Config {
            api_key: Some("sk-test".to_string()),
            snippet_folder: tmp.path().join("snippets"),
            ..Config::default()
        }
    }

    fn session<'a>(config: &'a Config, tmp: &TempDir, reply: &str) -> ChatState<'a> {
        ChatState::new(
            config,
            Box::new(ScriptedProvider::replying(reply)),
            Box::new(RecordingClipboard::default()),
            tmp.path().to_path_buf(),
        )
    }

    #[test]
    fn cat_reports_missing_files() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let state = session(&config, &tmp, "");

        let err = cat(&state, "nope.rs").unwrap_err();
        assert!(matches!(err, GptermError::FileNotFound(p) if p == tmp.path().join("nope.rs")));
    }

    #[test]
    fn cat_falls_back_to_plain_text() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("notes.zzz"), "just words").unwrap();
        let config = config(&tmp);
        let state = session(&config, &tmp, "");

        let out = cat(&state, "notes.zzz").unwrap().unwrap();
        let plain = strip_ansi_codes(&out).to_string();
        assert!(plain.contains("Syntax highlighting unavailable"));
        assert!(plain.ends_with("just words"));
    }

    #[test]
    fn cat_accepts_absolute_paths() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("abs.py");
        fs::write(&file, "print('hi')\n").unwrap();
        let config = config(&tmp);
        let state = ChatState::new(
            &config,
            Box::new(ScriptedProvider::default()),
            Box::new(RecordingClipboard::default()),
            "/somewhere/else".into(),
        );

        let out = cat(&state, file.to_str().unwrap()).unwrap().unwrap();
        assert_eq!(strip_ansi_codes(&out), "print('hi')\n");
    }

    #[test]
    fn snippet_by_index_and_name() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        fs::create_dir_all(&config.snippet_folder).unwrap();
        fs::write(config.snippet_folder.join("mySnippet.txt"), "saved text").unwrap();
        let state = session(&config, &tmp, "");

        let by_index = show_snippet(&state, "1").unwrap().unwrap();
        assert!(strip_ansi_codes(&by_index).contains("saved text"));
        let by_name = show_snippet(&state, "MY_SNIPPET").unwrap().unwrap();
        assert!(strip_ansi_codes(&by_name).contains("saved text"));
        assert!(matches!(
            show_snippet(&state, "2"),
            Err(GptermError::IndexOutOfRange { index: 2, count: 1 })
        ));
        assert!(matches!(
            show_snippet(&state, "other"),
            Err(GptermError::SnippetNotFound(_))
        ));
    }

    #[tokio::test]
    async fn copy_puts_extracted_code_on_the_clipboard() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let clipboard = RecordingClipboard::default();
        let mut state = ChatState::new(
            &config,
            Box::new(ScriptedProvider::replying(REPLY)),
            Box::new(clipboard.clone()),
            tmp.path().to_path_buf(),
        );
        state.history.push_user("write main");
        state.history.push_assistant("```rust\nfn main() {}\n```");

        copy(&mut state).await.unwrap();

        assert_eq!(*clipboard.copied.lock().unwrap(), vec!["fn main() {}".to_string()]);
    }

    #[tokio::test]
    async fn copy_reports_clipboard_and_extraction_failures() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let mut state = ChatState::new(
            &config,
            Box::new(ScriptedProvider::replying(REPLY)),
            Box::new(RecordingClipboard {
                fail: true,
                ..RecordingClipboard::default()
            }),
            tmp.path().to_path_buf(),
        );
        assert!(matches!(
            copy(&mut state).await,
            Err(GptermError::ClipboardFailed(_))
        ));

        let mut state = session(&config, &tmp, "Sure! Here is the code.");
        assert!(matches!(
            copy(&mut state).await,
            Err(GptermError::ExtractionFailed(_))
        ));
    }

    #[tokio::test]
    async fn save_writes_to_the_snippet_folder_by_default() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let state = session(&config, &tmp, REPLY);

        save(&state, None).await.unwrap();

        let written = config.snippet_folder.join("mainFn.rs");
        assert_eq!(fs::read_to_string(written).unwrap(), "fn main() {}");
    }

    #[tokio::test]
    async fn save_reports_extraction_and_write_failures() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);

        let state = session(&config, &tmp, "No code in that answer.");
        assert!(matches!(
            save(&state, None).await,
            Err(GptermError::ExtractionFailed(_))
        ));
        assert!(!config.snippet_folder.exists());

        fs::write(tmp.path().join("occupied"), "").unwrap();
        let state = session(&config, &tmp, REPLY);
        assert!(matches!(
            save(&state, Some("occupied/inner")).await,
            Err(GptermError::WriteFailed { .. })
        ));
    }

    #[tokio::test]
    async fn save_honours_explicit_targets() {
        let tmp = TempDir::new().unwrap();
        let config = config(&tmp);
        let state = session(&config, &tmp, REPLY);

        save(&state, Some("out/entry.rs")).await.unwrap();
        save(&state, Some("kept")).await.unwrap();

        assert!(tmp.path().join("out/entry.rs").is_file());
        assert!(tmp.path().join("kept/mainFn.rs").is_file());
        assert!(!config.snippet_folder.exists());
    }

    #[test]
    fn debug_prompt_inlines_local_imports() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("helper.js"), "export const two = 2;").unwrap();
        fs::write(
            tmp.path().join("main.js"),
            "import { two } from './helper';\nconsole.log(two);",
        )
        .unwrap();
        let config = config(&tmp);
        let state = session(&config, &tmp, "");

        let request = prepare_debug(&state, "main.js", None).unwrap();

        assert_eq!(
            request.prompt,
            "Find the bug(s) in this file:\nexport const two = 2;\nconsole.log(two);"
        );
        assert!(strip_ansi_codes(&request.preview).contains("import { two }"));
        assert!(matches!(
            prepare_debug(&state, "absent.js", None),
            Err(GptermError::FileNotFound(_))
        ));
    }
}
