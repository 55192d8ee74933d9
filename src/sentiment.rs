//! Emotion classification for the greeting stage
//!
//! Keyword checks take precedence over the lexicon polarity score:
//! negative keywords are checked first, then positive keywords, and only
//! then does the scorer decide.

mod lexicon;

pub use lexicon::polarity;

use serde::Serialize;

const NEGATIVE_KEYWORDS: &[&str] = &["nervous", "sad", "anxious", "worried", "scared"];
const POSITIVE_KEYWORDS: &[&str] = &["happy", "excited", "great", "confident", "motivated"];

/// Polarity above which text without keywords counts as positive
const POSITIVE_THRESHOLD: f64 = 0.3;
/// Polarity below which text without keywords counts as negative
const NEGATIVE_THRESHOLD: f64 = -0.3;

/// Coarse emotional state inferred from a single message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Negative,
    Positive,
    Neutral,
}

impl Emotion {
    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Negative => "negative",
            Emotion::Positive => "positive",
            Emotion::Neutral => "neutral",
        }
    }

    /// Bucket a polarity score in [-1, 1]
    pub fn from_polarity(score: f64) -> Self {
        if score < NEGATIVE_THRESHOLD {
            Emotion::Negative
        } else if score > POSITIVE_THRESHOLD {
            Emotion::Positive
        } else {
            Emotion::Neutral
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify free text. Total and side-effect free.
pub fn classify(text: &str) -> Emotion {
    let lowered = text.to_lowercase();

    if contains_any(&lowered, NEGATIVE_KEYWORDS) {
        return Emotion::Negative;
    }
    if contains_any(&lowered, POSITIVE_KEYWORDS) {
        return Emotion::Positive;
    }

    Emotion::from_polarity(polarity(text))
}

/// Substring match, so "saddest" still hits "sad"
fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| haystack.contains(kw))
}

#[cfg(test)]
mod proptests;
