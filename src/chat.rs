use crate::core::error::GptermError;
use crate::display::Color;
use crate::history::Conversation;
use crate::providers::LLMProvider;
use futures::StreamExt;
use std::io::Write;
use tracing::debug;

/// Stream a reply to the conversation as it stands, rendering each fragment the
/// moment it arrives.
///
/// The caller has already appended the user message. On a clean end of stream the
/// accumulated text is appended as one assistant message. On any failure the partial
/// text is dropped and history is left ending with that user message.
pub async fn stream_completion<W: Write>(
    provider: &dyn LLMProvider,
    history: &mut Conversation,
    color: Color,
    out: &mut W,
) -> Result<String, GptermError> {
    debug!(
        model = provider.model(),
        messages = history.len(),
        "requesting completion"
    );
    let mut stream = provider.get_response_stream(history.messages()).await?;

    let mut full_response = String::new();
    while let Some(fragment) = stream.next().await {
        let fragment = match fragment {
            Ok(fragment) => fragment,
            Err(e) => {
                if !full_response.is_empty() {
                    writeln!(out)?;
                }
                debug!(discarded = full_response.len(), "stream failed");
                return Err(e);
            }
        };

        write!(out, "{}", color.paint(&fragment))?;
        out.flush()?;
        full_response.push_str(&fragment);
    }

    if !full_response.ends_with('\n') {
        writeln!(out)?;
    }

    history.push_assistant(full_response.clone());
    debug!(chars = full_response.len(), "completion appended");
    Ok(full_response)
}
