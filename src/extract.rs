use crate::core::error::GptermError;
use crate::providers::{LLMProvider, Message};
use serde::Deserialize;
use tracing::debug;

pub const EXTRACTION_PROMPT: &str = r#"Your job is to look at some text and extract the code from it. You will return only JSON in the following format:
{
  "code": <EXTRACTED CODE>,
  "language": <LANGUAGE OF CODE>,
  "snippetName": <NAME OF SNIPPET>,
  "fileExtension": <FILE EXTENSION>
}

Do not return it as a string, but as a JSON object. No text should be returned, only the JSON object.

Good Example (DO THIS):
{"code": "console.log('Hello World!')", "language": "JavaScript", "snippetName": "helloWorld", "fileExtension": "js"}

If there is no code found in the text, return the full text like this:
{"code": "<FULL RESPONSE>", "language": "Text", "snippetName": "<1 TO 2 WORD SUMMARY>", "fileExtension": "txt"}

Do not wrap the JSON in a markdown code block. Do not add a '.' to the fileExtension.
File names should be in camelCase, PascalCase, or snake_case depending on the language. Do not use kebab-case. Do not use spaces in file names."#;

/// Code block pulled out of the last message by the extraction call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSnippet {
    pub code: String,
    pub language: String,
    pub snippet_name: String,
    pub file_extension: String,
}

impl CodeSnippet {
    /// `<snippetName>.<fileExtension>`, safe to join onto a folder.
    pub fn file_name(&self) -> String {
        let name: String = self
            .snippet_name
            .trim()
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' => '_',
                c if c.is_whitespace() => '_',
                c => c,
            })
            .collect();
        let name = name.trim_start_matches('.');
        let name = if name.is_empty() { "snippet" } else { name };

        let extension = self.file_extension.trim().trim_start_matches('.');
        if extension.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", name, extension)
        }
    }
}

/// Strip a surrounding markdown fence the model sometimes adds despite instructions.
fn unfence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

pub fn parse_snippet(reply: &str) -> Result<CodeSnippet, GptermError> {
    serde_json::from_str::<CodeSnippet>(unfence(reply))
        .map_err(|e| GptermError::ExtractionFailed(e.to_string()))
}

/// Stateless extraction request: fixed instruction plus only `last_message`.
pub async fn extract_snippet(
    provider: &dyn LLMProvider,
    last_message: &str,
) -> Result<CodeSnippet, GptermError> {
    let messages = [
        Message::system(EXTRACTION_PROMPT),
        Message::user(last_message),
    ];
    let reply = provider.get_response(&messages).await?;
    let snippet = parse_snippet(&reply)?;
    debug!(language = %snippet.language, name = %snippet.snippet_name, "extracted snippet");
    Ok(snippet)
}
