use crate::core::error::GptermError;

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), GptermError>;
}

/// System clipboard. The handle is opened lazily and kept for the session, since on
/// X11 the copied text is only served while the owning handle is alive.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), GptermError> {
        let clipboard = match self.inner.as_mut() {
            Some(clipboard) => clipboard,
            None => self.inner.insert(
                arboard::Clipboard::new()
                    .map_err(|e| GptermError::ClipboardFailed(e.to_string()))?,
            ),
        };

        clipboard
            .set_text(text.to_owned())
            .map_err(|e| GptermError::ClipboardFailed(e.to_string()))
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records copied text; can be told to fail.
    #[derive(Clone, Default)]
    pub struct RecordingClipboard {
        pub copied: Arc<Mutex<Vec<String>>>,
        pub fail: bool,
    }

    impl Clipboard for RecordingClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), GptermError> {
            if self.fail {
                return Err(GptermError::ClipboardFailed("no display".to_string()));
            }
            self.copied.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }
}
