//! Text-generation provider abstraction
//!
//! Providers hand back a lazy stream of text chunks; callers decide how to
//! consume it.

mod config;
mod error;
mod replicate;
mod sse;
mod types;

#[cfg(test)]
pub mod testing;

pub use config::LlmConfig;
#[allow(unused_imports)] // LlmErrorKind is matched on by callers' tests
pub use error::{LlmError, LlmErrorKind};
pub use replicate::ReplicateService;
pub use types::*;

use async_trait::async_trait;
use futures::stream::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

/// Lazily produced text chunks, consumed once
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>;

/// Common interface for text-generation providers
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Start a generation and return its output stream
    async fn stream(&self, request: &GenerationRequest) -> Result<TextStream, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for text generators
pub struct LoggingGenerator {
    inner: Arc<dyn TextGenerator>,
    model_id: String,
}

impl LoggingGenerator {
    pub fn new(inner: Arc<dyn TextGenerator>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl TextGenerator for LoggingGenerator {
    async fn stream(&self, request: &GenerationRequest) -> Result<TextStream, LlmError> {
        let start = Instant::now();
        let prompt_chars = request.prompt.chars().count();

        match self.inner.stream(request).await {
            Ok(stream) => {
                tracing::info!(
                    model = %self.model_id,
                    prompt_chars,
                    duration_ms = %start.elapsed().as_millis(),
                    "Generation stream opened"
                );

                let model_id = self.model_id.clone();
                let logged = stream.inspect(move |item| {
                    if let Err(e) = item {
                        tracing::error!(
                            model = %model_id,
                            error = %e.message,
                            kind = ?e.kind,
                            "Generation stream failed"
                        );
                    }
                });
                Ok(Box::pin(logged))
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %start.elapsed().as_millis(),
                    error = %e.message,
                    kind = ?e.kind,
                    "Generation request failed"
                );
                Err(e)
            }
        }
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Drain a stream, concatenating every chunk. Stops at the first error.
pub async fn collect_text(mut stream: TextStream) -> Result<String, LlmError> {
    let mut text = String::new();
    while let Some(chunk) = stream.next().await {
        text.push_str(&chunk?);
    }
    Ok(text)
}
