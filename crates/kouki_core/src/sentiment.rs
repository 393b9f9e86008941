//! Simple keyword-based emotion classification for Japanese replies.
//!
//! The table is ordered: the first category with a matching keyword wins,
//! so `happy` shadows everything after it.

use crate::emotion::Emotion;

const HAPPY: &[&str] = &[
    "嬉しい", "楽しい", "最高", "よかった", "ありがとう", "わーい", "やった", "！",
];

const SAD: &[&str] = &["悲しい", "辛い", "しんどい", "残念", "寂しい"];

const ANGRY: &[&str] = &["怒", "むかつく", "イライラ"];

const SURPRISED: &[&str] = &["まじか", "えっ", "驚", "すごい", "マジ"];

const RELAXED: &[&str] = &["まぁ", "ねー", "かも", "だろうね"];

/// Default category table, in match priority order.
pub const DEFAULT_TABLE: &[(Emotion, &[&str])] = &[
    (Emotion::Happy, HAPPY),
    (Emotion::Sad, SAD),
    (Emotion::Angry, ANGRY),
    (Emotion::Surprised, SURPRISED),
    (Emotion::Relaxed, RELAXED),
];

/// Maps reply text to the emotion the avatar should show.
pub trait EmotionClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Emotion;
}

/// First-match keyword lookup over an ordered `(emotion, keywords)` table.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    table: Vec<(Emotion, Vec<String>)>,
}

impl KeywordClassifier {
    pub fn new() -> Self {
        Self::with_table(
            DEFAULT_TABLE
                .iter()
                .map(|(emotion, words)| (*emotion, words.iter().map(|w| w.to_string()).collect()))
                .collect(),
        )
    }

    pub fn with_table(table: Vec<(Emotion, Vec<String>)>) -> Self {
        Self { table }
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl EmotionClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Emotion {
        self.table
            .iter()
            .find(|(_, words)| words.iter().any(|w| text.contains(w.as_str())))
            .map(|(emotion, _)| *emotion)
            .unwrap_or(Emotion::Neutral)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_text() {
        let c = KeywordClassifier::new();
        assert_eq!(c.classify("明日は雨です"), Emotion::Neutral);
        assert_eq!(c.classify(""), Emotion::Neutral);
    }

    #[test]
    fn test_each_category() {
        let c = KeywordClassifier::new();
        assert_eq!(c.classify("ありがとう"), Emotion::Happy);
        assert_eq!(c.classify("それは残念"), Emotion::Sad);
        assert_eq!(c.classify("正直イライラする"), Emotion::Angry);
        assert_eq!(c.classify("えっ本当に"), Emotion::Surprised);
        assert_eq!(c.classify("まぁいいか"), Emotion::Relaxed);
    }

    #[test]
    fn test_first_category_wins() {
        // "悲しい" is sad, but the full-width "！" is a happy keyword checked first
        let c = KeywordClassifier::new();
        assert_eq!(c.classify("悲しい！"), Emotion::Happy);
    }

    #[test]
    fn test_custom_table() {
        let c = KeywordClassifier::with_table(vec![(Emotion::Angry, vec!["grr".into()])]);
        assert_eq!(c.classify("grr!"), Emotion::Angry);
        assert_eq!(c.classify("ありがとう"), Emotion::Neutral);
    }
}
