//! Prompt synthesis for `debug <path> [context]`.
//!
//! Local imports are inlined in a single pass over the whole file. Inlined files are
//! not scanned again.

use crate::crawl::{FileIndex, base_name};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

const BUG_PREFIX: &str = "Find the bug(s) in this file:";
const HELP_PREFIX: &str = "I need help with this code:";

static IMPORT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // import x from "./x"; export { y } from '../y'
        r#"^\s*(?:import|export)\s.*\sfrom\s+['"`]([^'"`]+)['"`]"#,
        // import "./side-effect.css"
        r#"^\s*import\s+['"`]([^'"`]+)['"`]"#,
        // const x = require("./x")
        r#"require\(\s*['"`]([^'"`]+)['"`]\s*\)"#,
        // #include "local.h"
        r#"^\s*#\s*include\s+"([^"]+)""#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("import pattern is valid"))
    .collect()
});

/// Module path referenced by `line` if it is a local import. Package imports such as
/// `react` or `<stdio.h>` return `None`.
pub fn local_import(line: &str) -> Option<&str> {
    let specifier = IMPORT_PATTERNS
        .iter()
        .find_map(|re| re.captures(line))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())?;

    if specifier.contains('.') || specifier.contains('/') {
        Some(specifier)
    } else {
        None
    }
}

/// Extension-stripped file name an import refers to: `../lib/api.client` gives `api`.
fn import_base_name(specifier: &str) -> Option<&str> {
    let last = specifier.rsplit('/').next()?;
    base_name(Path::new(last)).filter(|name| !name.is_empty())
}

/// Replace each resolvable local import line with the imported file's content.
/// Unresolved imports and every other line are kept verbatim.
pub fn expand_imports(content: &str, index: &FileIndex) -> String {
    let mut out = String::with_capacity(content.len());

    for line in content.lines() {
        let inlined = local_import(line)
            .and_then(import_base_name)
            .and_then(|name| index.find_by_base_name(name))
            .and_then(|path| {
                debug!(import = %path.display(), "inlining import");
                fs::read_to_string(path).ok()
            });

        match inlined {
            Some(imported) => {
                out.push_str(&imported);
                if !imported.ends_with('\n') {
                    out.push('\n');
                }
            }
            None => {
                out.push_str(line);
                out.push('\n');
            }
        }
    }

    out
}

/// The chat prompt sent for a debug request.
pub fn build_prompt(expanded: &str, context: Option<&str>) -> String {
    let prefix = match context {
        None => BUG_PREFIX,
        Some(_) => HELP_PREFIX,
    };

    let mut prompt = format!("{}\n{}", prefix, expanded.trim_end());
    if let Some(context) = context {
        prompt.push_str(&format!("\n\n// {}", context));
    }
    prompt
}
