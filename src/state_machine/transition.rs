//! Pure stage transition function
//!
//! Decides, from the current stage and the user's text alone, what the
//! next stage is and whether the reply is scripted or must come from the
//! model. Executing that decision is `advance`'s job.

use super::Stage;
use crate::sentiment::{classify, Emotion};

pub const NEGATIVE_REPLY: &str = "I'm sorry to hear that you're feeling this way. Don't worry, I'm here to help you every step of the way. Let's tackle this math problem together! What problem are you working on?";
pub const POSITIVE_REPLY: &str =
    "That's a wonderful attitude! Let's dive right in. What fraction problem would you like to solve today?";
pub const NEUTRAL_REPLY: &str = "Alright, let's get started. What math problem can I help you with?";
pub const PROBE_REPLY: &str = "Great! Now, what do you think is the first step to solving this problem? If you're not sure, don't worry\u{2014}I can guide you.";

/// What to answer with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A fixed reply
    Reply(&'static str),
    /// Ask the model
    Delegate,
}

/// Result of a stage transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: Stage,
    pub action: Action,
    /// Set only when the greeting stage classified the text
    pub emotion: Option<Emotion>,
}

/// Motivational reply for the greeting stage
pub fn motivational_reply(emotion: Emotion) -> &'static str {
    match emotion {
        Emotion::Negative => NEGATIVE_REPLY,
        Emotion::Positive => POSITIVE_REPLY,
        Emotion::Neutral => NEUTRAL_REPLY,
    }
}

/// Pure transition function: no I/O, same inputs give the same output.
pub fn transition(stage: Stage, user_text: &str) -> Transition {
    match stage {
        Stage::Greeting => {
            let emotion = classify(user_text);
            Transition {
                next: stage.next(),
                action: Action::Reply(motivational_reply(emotion)),
                emotion: Some(emotion),
            }
        }
        Stage::Probe => Transition {
            next: stage.next(),
            action: Action::Reply(PROBE_REPLY),
            emotion: None,
        },
        Stage::Solve => Transition {
            next: stage.next(),
            action: Action::Delegate,
            emotion: None,
        },
    }
}
