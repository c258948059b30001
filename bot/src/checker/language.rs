//! English-text classification.
//!
//! Primary strategy is statistical language identification via `whatlang`;
//! when it cannot produce a reliable answer (short or ambiguous input) a
//! word-level ASCII heuristic takes over. Classification never fails; the
//! result only selects which prompt is built.

use whatlang::Lang;

/// Fallback threshold: strictly more than this share of words must contain
/// an ASCII letter for the text to count as English.
const ENGLISH_WORD_RATIO: f64 = 0.7;

/// Classify `text` as English or not.
pub fn is_english(text: &str) -> bool {
    classify(text, detect_english)
}

/// Language identification; `None` is the detection-failure condition.
fn detect_english(text: &str) -> Option<bool> {
    let info = whatlang::detect(text)?;
    if !info.is_reliable() {
        return None;
    }
    Some(info.lang() == Lang::Eng)
}

/// Run the injected detector, falling back to the heuristic on failure.
fn classify<D>(text: &str, detect: D) -> bool
where
    D: Fn(&str) -> Option<bool>,
{
    detect(text).unwrap_or_else(|| mostly_ascii_words(text))
}

/// Fallback heuristic: strip punctuation (keep word characters and
/// whitespace), split into words, and count the words containing at least
/// one ASCII letter. Zero words is never English.
fn mostly_ascii_words(text: &str) -> bool {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    let mut words = 0usize;
    let mut ascii_words = 0usize;

    for word in cleaned.split_whitespace() {
        words += 1;
        if word.chars().any(|c| c.is_ascii_alphabetic()) {
            ascii_words += 1;
        }
    }

    if words == 0 {
        return false;
    }

    ascii_words as f64 / words as f64 > ENGLISH_WORD_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_all_ascii_words() {
        assert!(mostly_ascii_words("Hello world"));
        assert!(mostly_ascii_words("this sentence is unmistakably english"));
    }

    #[test]
    fn test_heuristic_no_ascii_words() {
        assert!(!mostly_ascii_words("你好"));
        assert!(!mostly_ascii_words("こんにちは 世界"));
    }

    #[test]
    fn test_heuristic_punctuation_only_is_false_not_error() {
        assert!(!mostly_ascii_words("!!! ... ???"));
        assert!(!mostly_ascii_words(""));
        assert!(!mostly_ascii_words("   "));
    }

    #[test]
    fn test_heuristic_threshold_is_strict() {
        // 7 of 10 words carry ASCII letters: exactly 70% is not enough.
        assert!(!mostly_ascii_words("a b c d e f g 一 二 三"));
        // 8 of 10 crosses the threshold.
        assert!(mostly_ascii_words("a b c d e f g h 一 二"));
    }

    #[test]
    fn test_heuristic_mixed_scripts() {
        // 2 of 4 words are ASCII-lettered.
        assert!(!mostly_ascii_words("hello 你好 world 再见"));
        // A word mixing scripts still counts as ASCII-lettered.
        assert!(mostly_ascii_words("你好world"));
    }

    #[test]
    fn test_heuristic_strips_punctuation_before_splitting() {
        // Without stripping, "--" would survive as a non-ASCII word.
        assert!(mostly_ascii_words("wait -- what?!"));
    }

    #[test]
    fn test_forced_detection_failure_falls_back() {
        assert!(classify("Hello world", |_| None));
        assert!(!classify("你好", |_| None));
        assert!(!classify("!!!", |_| None));
    }

    #[test]
    fn test_detector_answer_takes_precedence() {
        // The heuristic would say English; a successful detection wins.
        assert!(!classify("plain ascii words", |_| Some(false)));
        assert!(classify("何でも", |_| Some(true)));
    }

    #[test]
    fn test_is_english_on_clear_inputs() {
        // Long unambiguous sentences: either the detector answers or the
        // heuristic agrees, so the result is stable both ways.
        assert!(is_english(
            "The quick brown fox jumps over the lazy dog near the river bank."
        ));
        assert!(!is_english(
            "Это предложение написано на русском языке и содержит достаточно слов."
        ));
        assert!(!is_english("これは日本語で書かれた文章です。"));
    }
}
