//! Replicate provider implementation
//!
//! A generation is two requests: create a prediction with streaming
//! enabled, then follow its `urls.stream` event stream until `done`.

use super::sse::{SseDecoder, SseEvent};
use super::{GenerationRequest, LlmConfig, LlmError, TextGenerator, TextStream};
use crate::llm::DecodingParams;
use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt::Display;
use std::pin::Pin;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a prediction gets created
#[derive(Debug, Clone, PartialEq, Eq)]
enum ModelTarget {
    /// `owner/name:version` or a bare version id
    Version(String),
    /// `owner/name`, run on the model's latest deployment
    Latest(String),
}

impl ModelTarget {
    fn parse(model: &str) -> Self {
        match model.split_once(':') {
            Some((_, version)) => ModelTarget::Version(version.to_string()),
            None if model.contains('/') => ModelTarget::Latest(model.to_string()),
            None => ModelTarget::Version(model.to_string()),
        }
    }
}

/// Replicate service implementation
pub struct ReplicateService {
    client: Client,
    api_token: Option<String>,
    target: ModelTarget,
    base_url: String,
    model_id: String,
}

impl ReplicateService {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_token: config.api_token.clone(),
            target: ModelTarget::parse(&config.model),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model_id: config.model.clone(),
        })
    }

    fn predictions_url(&self) -> String {
        match &self.target {
            ModelTarget::Version(_) => format!("{}/predictions", self.base_url),
            ModelTarget::Latest(model) => format!("{}/models/{model}/predictions", self.base_url),
        }
    }

    fn translate_request<'a>(&'a self, request: &'a GenerationRequest) -> PredictionRequest<'a> {
        PredictionRequest {
            version: match &self.target {
                ModelTarget::Version(version) => Some(version.as_str()),
                ModelTarget::Latest(_) => None,
            },
            input: PredictionInput {
                prompt: &request.prompt,
                params: request.params,
            },
            stream: true,
        }
    }

    async fn create_prediction(
        &self,
        token: &str,
        request: &GenerationRequest,
    ) -> Result<String, LlmError> {
        let response = self
            .client
            .post(self.predictions_url())
            .bearer_auth(token)
            .json(&self.translate_request(request))
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(LlmError::from_status(status, &body));
        }

        let prediction: PredictionResponse = serde_json::from_str(&body).map_err(|e| {
            LlmError::unknown(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        if prediction.status.as_deref() == Some("failed") {
            let detail = prediction
                .error
                .map_or_else(|| "unknown error".to_string(), |e| e.to_string());
            return Err(LlmError::server_error(format!(
                "Prediction {} failed: {detail}",
                prediction.id
            )));
        }

        tracing::debug!(prediction_id = %prediction.id, "Prediction created");

        prediction.urls.stream.ok_or_else(|| {
            LlmError::invalid_request(format!(
                "Model {} does not support streaming output",
                self.model_id
            ))
        })
    }
}

#[async_trait]
impl TextGenerator for ReplicateService {
    async fn stream(&self, request: &GenerationRequest) -> Result<TextStream, LlmError> {
        let token = self
            .api_token
            .as_deref()
            .ok_or_else(|| LlmError::auth("REPLICATE_API_TOKEN is not set"))?;

        let stream_url = self.create_prediction(token, request).await?;

        let response = self
            .client
            .get(&stream_url)
            .bearer_auth(token)
            .header("accept", "text/event-stream")
            .header("cache-control", "no-store")
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status(status, &body));
        }

        Ok(output_stream(response.bytes_stream()))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// What one decoded event means for the output stream
enum EventAction {
    Chunk(String),
    Fail(LlmError),
    Done,
    Skip,
}

fn interpret_event(event: SseEvent) -> EventAction {
    match event.event.as_str() {
        "output" => EventAction::Chunk(event.data),
        "error" => EventAction::Fail(LlmError::stream(error_detail(&event.data))),
        "done" => match done_reason(&event.data).as_deref() {
            Some(reason @ ("canceled" | "error")) => {
                EventAction::Fail(LlmError::stream(format!("Prediction ended: {reason}")))
            }
            _ => EventAction::Done,
        },
        _ => EventAction::Skip,
    }
}

fn error_detail(data: &str) -> String {
    serde_json::from_str::<StreamError>(data)
        .ok()
        .and_then(|e| e.detail)
        .unwrap_or_else(|| data.to_string())
}

fn done_reason(data: &str) -> Option<String> {
    serde_json::from_str::<DoneEvent>(data)
        .ok()
        .and_then(|d| d.reason)
        .filter(|r| !r.is_empty())
}

struct OutputState<S> {
    body: Pin<Box<S>>,
    decoder: SseDecoder,
    pending: VecDeque<SseEvent>,
    finished: bool,
}

/// Turn a raw event-stream body into text chunks
fn output_stream<S, B, E>(body: S) -> TextStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let state = OutputState {
        body: Box::pin(body),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.pending.pop_front() {
                match interpret_event(event) {
                    EventAction::Chunk(text) => return Some((Ok(text), state)),
                    EventAction::Fail(err) => {
                        state.pending.clear();
                        state.finished = true;
                        return Some((Err(err), state));
                    }
                    EventAction::Done => return None,
                    EventAction::Skip => continue,
                }
            }

            if state.finished {
                return None;
            }

            match state.body.next().await {
                Some(Ok(chunk)) => {
                    let events = state.decoder.feed(chunk.as_ref());
                    state.pending.extend(events);
                }
                Some(Err(e)) => {
                    state.finished = true;
                    return Some((Err(LlmError::network(format!("Stream interrupted: {e}"))), state));
                }
                None => {
                    state.finished = true;
                    let last = state.decoder.finish();
                    state.pending.extend(last);
                }
            }
        }
    }))
}

// Replicate API types

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    input: PredictionInput<'a>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct PredictionInput<'a> {
    prompt: &'a str,
    #[serde(flatten)]
    params: DecodingParams,
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    id: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
    urls: PredictionUrls,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    #[serde(default)]
    stream: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamError {
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DoneEvent {
    reason: Option<String>,
}
