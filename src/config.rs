use crate::core::error::GptermError;
use crate::display::Color;
use console::{Term, style};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an assistant that helps software developers get information from their terminal.";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Settings loaded once at startup. The chat session only ever borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub user_name: String,
    pub response_color: Color,
    pub user_name_color: Color,
    pub system_prompt: String,
    pub snippet_folder: PathBuf,
    pub model: String,
    pub base_url: String,
    /// Upper bound on non-system messages kept in the conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_history: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            user_name: std::env::var("USER").unwrap_or_else(|_| "User".to_string()),
            response_color: Color::Green,
            user_name_color: Color::Blue,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            snippet_folder: Self::home_dir().join("gpt-snippets"),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_history: None,
        }
    }
}

impl Config {
    fn home_dir() -> PathBuf {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn app_dir() -> PathBuf {
        Self::home_dir().join(".gpterm")
    }

    pub fn config_path() -> PathBuf {
        Self::app_dir().join("config.yaml")
    }

    pub fn history_path() -> PathBuf {
        Self::app_dir().join("input_history.txt")
    }

    pub fn log_dir() -> PathBuf {
        Self::app_dir().join("logs")
    }

    /// Load the YAML config at `path`, writing a default one if the file is absent.
    pub fn load_from(path: &Path) -> Result<Config, GptermError> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            if contents.trim().is_empty() {
                return Ok(Config::default());
            }
            return serde_yml::from_str::<Config>(&contents)
                .map_err(|e| GptermError::Config(format!("Parse {}: {}", path.display(), e)));
        }

        let config = Config::default();
        if let Err(e) = config.save_to(path) {
            warn!(path = %path.display(), error = %e, "could not write default config");
        }
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), GptermError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(path, yaml_content)?;
        Ok(())
    }

    /// The configured key, or the environment fallback, ignoring blank values.
    pub fn resolve_api_key(&mut self, env_value: Option<String>) -> Option<&str> {
        let from_file = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);

        self.api_key = from_file.or_else(|| {
            env_value
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
        });
        self.api_key.as_deref()
    }

    /// Command-line values win over the file for this session only.
    pub fn apply_overrides(&mut self, model: Option<String>, base_url: Option<String>) {
        if let Some(model) = model {
            self.model = model;
        }
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
    }

    /// Store `api_key` in the file at `path`, leaving every other stored value as it was.
    pub fn persist_api_key(path: &Path, api_key: &str) -> Result<(), GptermError> {
        let mut stored = Config::load_from(path)?;
        stored.api_key = Some(api_key.to_string());
        stored.save_to(path)
    }
}

/// First-run setup: ask for the API key and persist it next to the other settings.
pub fn prompt_for_api_key(config: &mut Config, path: &Path) -> Result<(), GptermError> {
    let term = Term::stdout();
    term.write_str(&format!("{} ", style("Enter your OpenAI API key:").bold().cyan()))?;
    let answer = term.read_secure_line()?;
    let answer = answer.trim();

    if answer.is_empty() {
        return Err(GptermError::Config(format!(
            "An API key is required. Add api_key to {} or set {}",
            path.display(),
            API_KEY_ENV
        )));
    }

    Config::persist_api_key(path, answer)?;
    config.api_key = Some(answer.to_string());
    term.clear_screen()?;
    Ok(())
}
