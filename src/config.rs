//! Process configuration, read once from the environment at startup

use crate::llm::LlmConfig;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_IDLE_TTL_SECS: u64 = 3600;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Sessions untouched for this long are discarded
    pub session_idle_ttl: Duration,
    pub sweep_interval: Duration,
    pub llm: LlmConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let secs = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|s| *s > 0)
                .map_or(Duration::from_secs(default), Duration::from_secs)
        };

        Self {
            port: lookup("TUTOR_PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            session_idle_ttl: secs("SESSION_IDLE_TTL_SECS", DEFAULT_IDLE_TTL_SECS),
            sweep_interval: secs("SESSION_SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL_SECS),
            llm: LlmConfig::from_lookup(&lookup),
        }
    }
}
