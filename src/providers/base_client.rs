use crate::core::error::GptermError;
use crate::providers::FragmentStream;
use eventsource_stream::{Event, EventStreamError, Eventsource};
use futures::stream::{self, BoxStream, StreamExt};
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// What one server-sent event contributed to the reply.
#[derive(Debug, PartialEq, Eq)]
pub enum StreamEvent {
    Delta(String),
    Done,
}

/// Parses the `data` of a single event. `Ok(None)` means the event carries no text.
pub type StreamParser = fn(&str) -> Result<Option<StreamEvent>, GptermError>;

pub struct HttpClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self, GptermError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// POST `payload` as JSON. Non-success statuses are decoded into `GptermError::Api`.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, GptermError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "sending request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GptermError::from_api_response(Some(status.as_u16()), &body));
        }

        Ok(response)
    }

    pub fn stream_response(&self, response: Response, parser: StreamParser) -> FragmentStream {
        let bytes = response
            .bytes_stream()
            .map(|chunk| chunk.map(|b| b.to_vec()).map_err(GptermError::from))
            .boxed();
        sse_fragments(bytes, parser)
    }
}

type EventResult = Result<Event, EventStreamError<GptermError>>;

struct SseState {
    events: BoxStream<'static, EventResult>,
    parser: StreamParser,
    finished: bool,
}

/// Turn raw body chunks into text fragments. The stream stops after the done marker
/// or the first error. A body that ends before the done marker yields a final
/// `Transport` error.
pub fn sse_fragments(
    body: BoxStream<'static, Result<Vec<u8>, GptermError>>,
    parser: StreamParser,
) -> FragmentStream {
    let state = SseState {
        events: body.eventsource().boxed(),
        parser,
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        if state.finished {
            return None;
        }

        loop {
            let item = match state.events.next().await {
                Some(Ok(event)) => match (state.parser)(&event.data) {
                    Ok(Some(StreamEvent::Delta(text))) => Ok(text),
                    Ok(Some(StreamEvent::Done)) => return None,
                    Ok(None) => continue,
                    Err(e) => Err(e),
                },
                Some(Err(EventStreamError::Transport(e))) => Err(e),
                Some(Err(e)) => Err(GptermError::Transport(format!(
                    "malformed event stream: {}",
                    e
                ))),
                None => Err(GptermError::Transport(
                    "stream closed before the response completed".to_string(),
                )),
            };

            state.finished = item.is_err();
            return Some((item, state));
        }
    })
    .boxed()
}
