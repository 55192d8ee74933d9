//! Conversation stages

use serde::Serialize;

/// Phase of the scripted conversation. Only ever moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Asking how the student feels
    #[default]
    Greeting,
    /// Asking for the first step
    Probe,
    /// Handing the conversation to the model; absorbing
    Solve,
}

impl Stage {
    /// The stage after a completed turn
    pub fn next(self) -> Self {
        match self {
            Stage::Greeting => Stage::Probe,
            Stage::Probe | Stage::Solve => Stage::Solve,
        }
    }

    /// 1-based position, as shown to clients
    pub fn number(self) -> u8 {
        match self {
            Stage::Greeting => 1,
            Stage::Probe => 2,
            Stage::Solve => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Greeting => "greeting",
            Stage::Probe => "probe",
            Stage::Solve => "solve",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
