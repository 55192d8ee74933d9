//! Lexicon-based polarity scoring
//!
//! Scores are the mean polarity of the sentiment-bearing words in the text.
//! A modifier directly before a sentiment word scales it, and a negator
//! within the two preceding words flips and halves it.

/// How far back (in words) a negator still applies
const NEGATION_WINDOW: usize = 2;
/// Applied to a negated word's polarity
const NEGATION_FACTOR: f64 = -0.5;

/// Polarity score in [-1, 1]; 0.0 when no lexicon word matches.
pub fn polarity(text: &str) -> f64 {
    let tokens = tokenize(text);

    let mut total = 0.0;
    let mut matched = 0.0;

    for (idx, token) in tokens.iter().enumerate() {
        let Some(base) = word_polarity(token) else {
            continue;
        };

        let mut score = base;
        if let Some(factor) = idx
            .checked_sub(1)
            .and_then(|prev| intensity(&tokens[prev]))
        {
            score *= factor;
        }

        let window_start = idx.saturating_sub(NEGATION_WINDOW);
        if tokens[window_start..idx].iter().any(|t| is_negator(t)) {
            score *= NEGATION_FACTOR;
        }

        total += score.clamp(-1.0, 1.0);
        matched += 1.0;
    }

    if matched < 1.0 {
        0.0
    } else {
        (total / matched).clamp(-1.0, 1.0)
    }
}

/// Lower-cased words made of letters, digits and apostrophes
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace(['\u{2019}', '\u{2018}'], "'")
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_negator(word: &str) -> bool {
    matches!(word, "not" | "no" | "never" | "cannot" | "neither" | "nor")
        || word.ends_with("n't")
}

fn intensity(word: &str) -> Option<f64> {
    let factor = match word {
        "very" | "really" | "so" | "totally" | "truly" => 1.3,
        "extremely" | "incredibly" | "super" => 1.5,
        "quite" | "pretty" => 1.1,
        "somewhat" | "kinda" | "fairly" => 0.7,
        "slightly" | "barely" => 0.5,
        _ => return None,
    };
    Some(factor)
}

fn word_polarity(word: &str) -> Option<f64> {
    let score = match word {
        // positive
        "good" => 0.7,
        "nice" => 0.6,
        "fine" => 0.4,
        "ok" | "okay" => 0.5,
        "better" => 0.5,
        "best" => 1.0,
        "awesome" | "excellent" | "perfect" | "wonderful" => 1.0,
        "amazing" => 0.6,
        "fantastic" => 0.4,
        "love" | "glad" | "pleased" | "hopeful" => 0.5,
        "enjoy" | "eager" => 0.4,
        "fun" | "calm" | "relaxed" => 0.3,
        "easy" => 0.43,
        "interesting" => 0.5,
        "cool" => 0.35,
        "proud" | "joy" | "thrilled" => 0.8,
        "cheerful" => 0.6,
        "lucky" => 0.33,
        "ready" => 0.2,
        "sure" => 0.5,
        "positive" => 0.23,
        "brilliant" => 0.9,
        "comfortable" => 0.4,
        "curious" => 0.2,
        // negative
        "bad" => -0.7,
        "terrible" | "awful" | "horrible" | "worst" | "miserable" | "terrified" => -1.0,
        "boring" => -1.0,
        "worse" => -0.4,
        "hate" => -0.8,
        "stupid" | "dumb" => -0.8,
        "difficult" => -0.5,
        "hard" => -0.29,
        "tough" => -0.39,
        "confused" | "struggling" | "annoyed" | "poor" => -0.4,
        "confusing" => -0.3,
        "frustrated" | "frustrating" => -0.7,
        "tired" => -0.4,
        "upset" | "angry" | "overwhelmed" | "useless" | "fail" | "failing" => -0.5,
        "mad" => -0.625,
        "afraid" | "dread" | "panic" | "hopeless" => -0.6,
        "stressed" | "stressful" => -0.5,
        "impossible" => -0.67,
        "lonely" => -0.25,
        "depressed" => -0.35,
        "sick" => -0.71,
        "sorry" => -0.5,
        "unsure" => -0.2,
        "negative" => -0.3,
        "lost" => -0.2,
        _ => return None,
    };
    Some(score)
}
