//! Common types for text generation

use serde::Serialize;

/// Sampling settings sent with every generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecodingParams {
    pub temperature: f64,
    pub top_p: f64,
    pub max_length: u32,
    pub repetition_penalty: f64,
}

impl Default for DecodingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            max_length: 128,
            repetition_penalty: 1.2,
        }
    }
}

/// A single-prompt generation request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub params: DecodingParams,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            params: DecodingParams::default(),
        }
    }
}
