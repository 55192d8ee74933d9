//! Property-based tests for emotion classification

use super::*;
use proptest::prelude::*;

fn arb_negative_keyword() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(NEGATIVE_KEYWORDS)
}

fn arb_positive_keyword() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(POSITIVE_KEYWORDS)
}

/// Lexicon and filler words, none of which contain a keyword
fn arb_word() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(vec![
        "good", "bad", "terrible", "wonderful", "not", "very", "slightly", "hate", "love",
        "fraction", "the", "denominator", "I", "am", "feeling", "don't", "okay", "confused",
        "math", "today", "awful", "fine", "tired", "easy", "hard",
    ])
}

fn arb_filler() -> impl Strategy<Value = String> {
    proptest::collection::vec(arb_word(), 0..12).prop_map(|words| words.join(" "))
}

proptest! {
    #[test]
    fn negative_keyword_always_negative(
        before in arb_filler(),
        kw in arb_negative_keyword(),
        after in arb_filler(),
        upper in any::<bool>(),
    ) {
        let kw = if upper { kw.to_uppercase() } else { kw.to_string() };
        let text = format!("{before} {kw} {after}");
        prop_assert_eq!(classify(&text), Emotion::Negative);
    }

    #[test]
    fn negative_keyword_beats_positive_keyword(
        neg in arb_negative_keyword(),
        pos in arb_positive_keyword(),
        filler in arb_filler(),
        neg_first in any::<bool>(),
    ) {
        let text = if neg_first {
            format!("{neg} {filler} {pos}")
        } else {
            format!("{pos} {filler} {neg}")
        };
        prop_assert_eq!(classify(&text), Emotion::Negative);
    }

    #[test]
    fn positive_keyword_without_negative_is_positive(
        before in arb_filler(),
        kw in arb_positive_keyword(),
        after in arb_filler(),
    ) {
        let text = format!("{before} {kw} {after}");
        prop_assert_eq!(classify(&text), Emotion::Positive);
    }

    #[test]
    fn no_keyword_follows_polarity_thresholds(text in arb_filler()) {
        let p = polarity(&text);
        let expected = if p > 0.3 {
            Emotion::Positive
        } else if p < -0.3 {
            Emotion::Negative
        } else {
            Emotion::Neutral
        };
        prop_assert_eq!(classify(&text), expected);
    }

    #[test]
    fn polarity_stays_in_range(text in ".{0,80}") {
        let p = polarity(&text);
        prop_assert!((-1.0..=1.0).contains(&p));
    }
}
