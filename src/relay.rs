//! Response relay: forwards the conversation to the text-generation model
//!
//! The whole call, prompt submission through the last streamed chunk, runs
//! under one timeout. Failures come back as [`RelayError`]; choosing what
//! the user sees instead is left to the caller.

use crate::llm::{collect_text, GenerationRequest, LlmError, TextGenerator};
use crate::session::Message;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Persona and tone given to the model ahead of the transcript
pub const SYSTEM_PREAMBLE: &str = "You are a helpful, kind and supportive assistant specialized in solving fraction-related math problems. Be supportive and motivational and help students to Break down math problems into simple, clear steps that are easy to understand. Communicate in an empathetic, friendly, and conversational tone";

/// Why a relay call produced no reply
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("no response within {}s", .0.as_secs_f64())]
    Timeout(Duration),
}

/// Render the prompt: preamble, prior messages, the new user turn, and an
/// open `Assistant:` cue for the model to continue.
pub fn build_prompt(transcript: &[Message], user_text: &str) -> String {
    let mut prompt = format!("{SYSTEM_PREAMBLE}\n\n");
    for message in transcript {
        prompt.push_str(&message.render());
        prompt.push('\n');
    }
    let _ = write!(prompt, "User: {user_text}\nAssistant:");
    prompt
}

pub struct ResponseRelay {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl ResponseRelay {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub fn model_id(&self) -> &str {
        self.generator.model_id()
    }

    /// Generate the assistant's next message, trimmed of surrounding whitespace
    pub async fn generate(
        &self,
        transcript: &[Message],
        user_text: &str,
    ) -> Result<String, RelayError> {
        let request = GenerationRequest::new(build_prompt(transcript, user_text));

        let start = Instant::now();
        let call = async {
            let stream = self.generator.stream(&request).await?;
            collect_text(stream).await
        };

        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(text)) => Ok(text.trim().to_string()),
            Ok(Err(e)) => Err(RelayError::Llm(e)),
            Err(_) => Err(RelayError::Timeout(self.timeout)),
        };

        match &result {
            Ok(text) => tracing::info!(
                duration_ms = %start.elapsed().as_millis(),
                reply_chars = text.chars().count(),
                "Relay completed"
            ),
            Err(e) => tracing::warn!(
                duration_ms = %start.elapsed().as_millis(),
                error = %e,
                "Relay failed"
            ),
        }

        result
    }
}
