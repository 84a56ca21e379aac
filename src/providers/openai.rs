use super::{FragmentStream, LLMProvider, Message};
use crate::core::error::GptermError;
use crate::providers::base_client::{HttpClient, StreamEvent};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parser for the `data` of one OpenAI chat-completions event
pub fn openai_stream_parser(data: &str) -> Result<Option<StreamEvent>, GptermError> {
    let data = data.trim();
    if data.is_empty() {
        return Ok(None);
    }
    if data == "[DONE]" {
        return Ok(Some(StreamEvent::Done));
    }

    let parsed: serde_json::Value = serde_json::from_str(data)
        .map_err(|e| GptermError::Serialization(format!("Failed to parse stream data: {}", e)))?;

    if let Some(error) = parsed.get("error") {
        return Err(GptermError::from_api_response(
            None,
            &serde_json::json!({ "error": error }).to_string(),
        ));
    }

    let text = parsed
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("delta"))
        .and_then(|delta| delta.get("content"))
        .and_then(|content| content.as_str())
        .unwrap_or_default();

    if text.is_empty() {
        Ok(None)
    } else {
        Ok(Some(StreamEvent::Delta(text.to_string())))
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

pub struct OpenAIProvider {
    client: HttpClient,
    model: String,
}

impl OpenAIProvider {
    pub fn new(base_url: String, api_key: &str, model: String) -> Result<Self, GptermError> {
        Ok(Self {
            client: HttpClient::new(base_url, api_key.to_string())?,
            model,
        })
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn get_response(&self, messages: &[Message]) -> Result<String, GptermError> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages,
            stream: None,
        };

        let response = self.client.post("chat/completions", &payload).await?;
        let response_body = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&response_body)?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| GptermError::Serialization("No choices in API response".to_string()))?;

        debug!(chars = content.len(), "received completion");
        Ok(content.trim().to_string())
    }

    async fn get_response_stream(
        &self,
        messages: &[Message],
    ) -> Result<FragmentStream, GptermError> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages,
            stream: Some(true),
        };

        let response = self.client.post("chat/completions", &payload).await?;
        debug!(model = %self.model, "stream opened");
        Ok(self.client.stream_response(response, openai_stream_parser))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
