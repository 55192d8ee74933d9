//! API request and response types

use crate::runtime::SessionSnapshot;
use crate::sentiment::Emotion;
use crate::session::Message;
use crate::state_machine::Stage;
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Response with a single session
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: SessionSnapshot,
}

/// Response for a chat turn
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub stage: Stage,
    pub stage_number: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Emotion>,
    /// Transient notice to show once, e.g. when the model call failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub messages: Vec<Message>,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Response for the version endpoint
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
    pub model: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
