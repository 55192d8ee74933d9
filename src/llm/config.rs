//! Inference provider configuration

use std::time::Duration;

pub const DEFAULT_MODEL: &str =
    "a16z-infra/llama7b-v2-chat:4f0a4744c7295c024a1de15e1a63c880d3da035fa1f49bfd344fe076074c8eea";
pub const DEFAULT_BASE_URL: &str = "https://api.replicate.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Configuration for the text-generation provider
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_token: Option<String>,
    /// `owner/name:version` or a bare version id
    pub model: String,
    pub base_url: String,
    /// Upper bound on one whole relay call, stream included
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank or unparsable values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            api_token: get("REPLICATE_API_TOKEN"),
            model: get("REPLICATE_MODEL").unwrap_or(defaults.model),
            base_url: get("REPLICATE_BASE_URL").unwrap_or(defaults.base_url),
            timeout: get("RELAY_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map_or(defaults.timeout, Duration::from_secs),
        }
    }

    pub fn has_token(&self) -> bool {
        self.api_token.is_some()
    }
}
