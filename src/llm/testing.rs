//! Mock generator for testing
//!
//! Replays queued outputs without touching the network.

use super::{GenerationRequest, LlmError, TextGenerator, TextStream};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

enum Queued {
    Chunks(Vec<String>),
    /// Stream yields these chunks, then this error
    FailMidStream(Vec<String>, LlmError),
    Error(LlmError),
}

/// Mock generator that returns queued outputs in order.
///
/// With nothing queued it answers with a single "mock reply" chunk.
pub struct MockGenerator {
    queue: Mutex<VecDeque<Queued>>,
    delay: Mutex<Option<Duration>>,
    model_id: String,
    /// Record of all requests made
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerator {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            delay: Mutex::new(None),
            model_id: model_id.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful streamed output
    pub fn queue_chunks(&self, chunks: &[&str]) {
        self.queue.lock().unwrap().push_back(Queued::Chunks(
            chunks.iter().map(|c| (*c).to_string()).collect(),
        ));
    }

    /// Queue a failure when opening the stream
    pub fn queue_error(&self, error: LlmError) {
        self.queue.lock().unwrap().push_back(Queued::Error(error));
    }

    /// Queue a stream that breaks after some output
    pub fn queue_mid_stream_error(&self, chunks: &[&str], error: LlmError) {
        self.queue.lock().unwrap().push_back(Queued::FailMidStream(
            chunks.iter().map(|c| (*c).to_string()).collect(),
            error,
        ));
    }

    /// Delay every call before answering
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn stream(&self, request: &GenerationRequest) -> Result<TextStream, LlmError> {
        self.requests.lock().unwrap().push(request.clone());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.queue.lock().unwrap().pop_front();
        let items: Vec<Result<String, LlmError>> = match next {
            None => vec![Ok("mock reply".to_string())],
            Some(Queued::Chunks(chunks)) => chunks.into_iter().map(Ok).collect(),
            Some(Queued::FailMidStream(chunks, error)) => chunks
                .into_iter()
                .map(Ok)
                .chain(std::iter::once(Err(error)))
                .collect(),
            Some(Queued::Error(error)) => return Err(error),
        };
        Ok(Box::pin(futures::stream::iter(items)))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
