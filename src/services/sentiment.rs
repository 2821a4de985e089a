use crate::models::mood::MoodLabel;

const EXTENDED_POSITIVE: &[&str] = &[
    "happy", "great", "awesome", "wonderful", "excellent", "amazing", "good",
    "better", "best", "love", "loved", "enjoy", "enjoying", "enjoyed",
    "excited", "excitement", "glad", "pleased", "delighted", "grateful",
    "thankful", "blessed", "lucky", "fortunate", "peaceful", "calm", "relaxed",
];

const EXTENDED_NEGATIVE: &[&str] = &[
    "sad", "terrible", "awful", "horrible", "bad", "worse", "worst", "hate",
    "hated", "angry", "mad", "upset", "frustrated", "annoyed", "worried",
    "anxious", "stressed", "depressed", "lonely", "tired", "exhausted",
    "overwhelmed", "confused", "disappointed", "hurt", "pain", "suffering",
];

const CORE_POSITIVE: &[&str] = &[
    "good", "great", "excellent", "happy", "wonderful", "amazing", "fantastic",
    "better", "fine", "okay", "alright",
];

const CORE_NEGATIVE: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "sad", "depressed", "anxious",
    "worried", "upset", "angry", "frustrated",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lexicon {
    Core,
    Extended,
}

impl std::str::FromStr for Lexicon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "core" => Ok(Lexicon::Core),
            "extended" => Ok(Lexicon::Extended),
            other => Err(format!("unknown sentiment lexicon: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentimentScore {
    pub positive: usize,
    pub negative: usize,
}

impl SentimentScore {
    pub fn label(&self) -> MoodLabel {
        if self.positive > self.negative {
            MoodLabel::Good
        } else if self.negative > self.positive {
            MoodLabel::Bad
        } else {
            MoodLabel::Meh
        }
    }
}

/// Keyword-count mood detector.
///
/// Words are matched as plain substrings of the lower-cased text, so `"sad"`
/// also hits `"sadly"`. Each list word counts at most once no matter how
/// often it appears.
#[derive(Debug, Clone, Copy)]
pub struct SentimentClassifier {
    positive: &'static [&'static str],
    negative: &'static [&'static str],
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::new(Lexicon::Extended)
    }
}

impl SentimentClassifier {
    pub fn new(lexicon: Lexicon) -> Self {
        match lexicon {
            Lexicon::Core => Self {
                positive: CORE_POSITIVE,
                negative: CORE_NEGATIVE,
            },
            Lexicon::Extended => Self {
                positive: EXTENDED_POSITIVE,
                negative: EXTENDED_NEGATIVE,
            },
        }
    }

    pub fn score(&self, text: &str) -> SentimentScore {
        let text = text.to_lowercase();
        SentimentScore {
            positive: count_hits(self.positive, &text),
            negative: count_hits(self.negative, &text),
        }
    }

    pub fn classify(&self, text: &str) -> MoodLabel {
        self.score(text).label()
    }
}

fn count_hits(words: &[&str], text: &str) -> usize {
    words.iter().filter(|w| text.contains(*w)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_text_is_good() {
        let c = SentimentClassifier::default();
        assert_eq!(c.classify("I had a great and wonderful day"), MoodLabel::Good);
    }

    #[test]
    fn test_negative_text_is_bad() {
        let c = SentimentClassifier::default();
        assert_eq!(c.classify("I feel sad and terrible"), MoodLabel::Bad);
    }

    #[test]
    fn test_neutral_text_is_meh() {
        let c = SentimentClassifier::default();
        assert_eq!(c.classify("It was an okay day"), MoodLabel::Meh);
    }

    #[test]
    fn test_empty_text_is_meh() {
        let c = SentimentClassifier::default();
        assert_eq!(c.classify(""), MoodLabel::Meh);
        assert_eq!(c.score(""), SentimentScore { positive: 0, negative: 0 });
    }

    #[test]
    fn test_tie_is_meh() {
        let c = SentimentClassifier::default();
        assert_eq!(c.classify("happy but tired"), MoodLabel::Meh);
    }

    #[test]
    fn test_case_insensitive() {
        let c = SentimentClassifier::default();
        assert_eq!(c.classify("AMAZING"), MoodLabel::Good);
    }

    #[test]
    fn test_substring_matching_is_kept() {
        let c = SentimentClassifier::default();
        // "sad" inside "sadly", "mad" inside "made"
        assert_eq!(c.score("sadly").negative, 1);
        assert_eq!(c.classify("she made dinner"), MoodLabel::Bad);
    }

    #[test]
    fn test_repeated_word_counts_once() {
        let c = SentimentClassifier::default();
        let score = c.score("sad sad sad but glad");
        assert_eq!(score.negative, 1);
        assert_eq!(score.positive, 1);
        assert_eq!(score.label(), MoodLabel::Meh);
    }

    #[test]
    fn test_overlapping_entries_each_count() {
        let c = SentimentClassifier::default();
        // "love" and "loved" are both list words
        assert_eq!(c.score("I loved it").positive, 2);
    }

    #[test]
    fn test_core_lexicon_counts_okay_as_positive() {
        let c = SentimentClassifier::new(Lexicon::Core);
        assert_eq!(c.classify("It was an okay day"), MoodLabel::Good);
        assert_eq!(c.classify("I feel sad and terrible"), MoodLabel::Bad);
    }

    #[test]
    fn test_never_produces_great() {
        let c = SentimentClassifier::default();
        for text in ["great great great", "best day ever, amazing, wonderful", ""] {
            assert_ne!(c.classify(text), MoodLabel::Great);
        }
    }

    #[test]
    fn test_lexicon_from_str() {
        assert_eq!("core".parse::<Lexicon>().unwrap(), Lexicon::Core);
        assert_eq!(" Extended ".parse::<Lexicon>().unwrap(), Lexicon::Extended);
        assert!("full".parse::<Lexicon>().is_err());
    }
}
