use serde::Deserialize;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for gpterm
#[derive(Error, Debug)]
pub enum GptermError {
    /// A file named by the user could not be read
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// No snippet matched the requested name or could be read
    #[error("Snippet not found: {0}")]
    SnippetNotFound(String),

    /// A numeric snippet reference outside `[1, count]`
    #[error("Snippet index {index} is out of range (1-{count})")]
    IndexOutOfRange { index: usize, count: usize },

    /// The model's extraction reply was not the expected JSON record
    #[error("Could not extract code from the last message: {0}")]
    ExtractionFailed(String),

    #[error("Clipboard error: {0}")]
    ClipboardFailed(String),

    #[error("Could not write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Network or stream failures
    #[error("Network error: {0}")]
    Transport(String),

    /// Structured error returned by the remote service. Errors sent inside an
    /// event stream carry no HTTP status.
    #[error(
        "API error{}: {}",
        .status.map_or_else(String::new, |s| format!(" ({})", s)),
        .message
    )]
    Api {
        status: Option<u16>,
        code: Option<String>,
        param: Option<String>,
        message: String,
    },

    /// No highlighter exists for the extension. Callers fall back to plain text.
    #[error("Syntax highlighting unavailable for '{0}'")]
    RenderingUnsupported(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GptermError {
    /// Actionable advice for known API failure categories.
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            GptermError::Api { code, param, .. }
                if code.as_deref() == Some("unsupported_value")
                    && param.as_deref() == Some("stream") =>
            {
                Some(
                    "This usually means your organization needs verification. \
                     Verification can take up to 15 minutes to propagate.",
                )
            }
            GptermError::Api {
                status: Some(401), ..
            } => Some(
                "Please check the api_key in your gpterm config file or the OPENAI_API_KEY \
                 environment variable",
            ),
            GptermError::Api {
                status: Some(429), ..
            } => {
                Some("You have exceeded your rate limit or quota.")
            }
            _ => None,
        }
    }

    /// Decode an OpenAI error body into an `Api` error.
    pub fn from_api_response(status: Option<u16>, body: &str) -> Self {
        #[derive(Deserialize)]
        struct Envelope {
            error: ErrorBody,
        }

        #[derive(Deserialize)]
        struct ErrorBody {
            message: String,
            code: Option<serde_json::Value>,
            param: Option<String>,
        }

        match serde_json::from_str::<Envelope>(body) {
            Ok(envelope) => GptermError::Api {
                status,
                code: envelope.error.code.map(|c| match c {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                }),
                param: envelope.error.param,
                message: envelope.error.message,
            },
            Err(_) => GptermError::Api {
                status,
                code: None,
                param: None,
                message: if body.trim().is_empty() {
                    "empty response body".to_string()
                } else {
                    body.trim().to_string()
                },
            },
        }
    }
}

impl From<reqwest::Error> for GptermError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            GptermError::Api {
                status: Some(status.as_u16()),
                code: None,
                param: None,
                message: err.to_string(),
            }
        } else if err.is_timeout() {
            GptermError::Transport(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            GptermError::Transport(format!("Connection failed: {}", err))
        } else {
            GptermError::Transport(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for GptermError {
    fn from(err: serde_json::Error) -> Self {
        GptermError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for GptermError {
    fn from(err: serde_yml::Error) -> Self {
        GptermError::Serialization(format!("YAML error: {}", err))
    }
}
