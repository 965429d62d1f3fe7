use serde::{Deserialize, Serialize};

use crate::PolarityScorer;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PolarityScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    /// Normalized sum of valences, in [-1, 1].
    pub compound: f64,
}

/// Valence-aware lexicon scorer (rule based, no training) over the full VADER lexicon.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentIntensityAnalyzer;

impl SentimentIntensityAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn polarity_scores(&self, text: &str) -> PolarityScores {
        let analyzer = vader_sentiment::SentimentIntensityAnalyzer::new();
        let raw = analyzer.polarity_scores(text);
        let get = |key: &str| raw.get(key).copied().unwrap_or(0.0);
        PolarityScores {
            neg: get("neg"),
            neu: get("neu"),
            pos: get("pos"),
            compound: get("compound").clamp(-1.0, 1.0),
        }
    }
}

impl PolarityScorer for SentimentIntensityAnalyzer {
    fn compound(&self, text: &str) -> f64 {
        self.polarity_scores(text).compound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compound(text: &str) -> f64 {
        SentimentIntensityAnalyzer::new().polarity_scores(text).compound
    }

    #[test]
    fn test_positive_sentence() {
        let scores = SentimentIntensityAnalyzer::new()
            .polarity_scores("I love this product, it is amazing and wonderful");
        assert!(scores.compound > 0.5);
        assert!(scores.pos > scores.neg);
        assert_eq!(scores.neg, 0.0);
    }

    #[test]
    fn test_negative_sentence() {
        assert!(compound("This is the worst experience ever, terrible service") < -0.5);
    }

    #[test]
    fn test_no_lexicon_words_is_zero() {
        let scores = SentimentIntensityAnalyzer::new().polarity_scores("The parcel arrived on Tuesday");
        assert_eq!(scores.compound, 0.0);
        assert_eq!(scores.neu, 1.0);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(compound(""), 0.0);
        assert_eq!(compound("nan"), 0.0);
    }

    #[test]
    fn test_everyday_vocabulary_is_scored() {
        assert!(compound("we won the championship tonight") > 0.0);
        assert!(compound("no signal again on this train") < 0.0);
        assert!(compound("she keeps crying about the ending") < 0.0);
    }

    #[test]
    fn test_negation_flips_sign() {
        assert!(compound("the food is good") > 0.0);
        assert!(compound("the food is not good") < 0.0);
        assert!(compound("the food isn't good") < 0.0);
    }

    #[test]
    fn test_booster_increases_intensity() {
        assert!(compound("the food is very good") > compound("the food is good"));
        assert!(compound("the food is slightly good") < compound("the food is good"));
    }

    #[test]
    fn test_caps_emphasis() {
        assert!(compound("the food is GOOD") > compound("the food is good"));
    }

    #[test]
    fn test_exclamation_emphasis() {
        assert!(compound("the food is good!!!") > compound("the food is good"));
    }

    #[test]
    fn test_but_shifts_weight_to_second_clause() {
        assert!(compound("the food is great but the service is terrible") < 0.0);
    }

    #[test]
    fn test_emoticons() {
        assert!(compound("see you tomorrow :)") > 0.0);
        assert!(compound("see you tomorrow :(") < 0.0);
    }

    #[test]
    fn test_compound_is_bounded() {
        let text = "love love love love love love love love love love amazing!!!!";
        let c = compound(text);
        assert!(c <= 1.0 && c > 0.9);
    }

    #[test]
    fn test_proportions_sum_to_one() {
        let s = SentimentIntensityAnalyzer::new().polarity_scores("good bad and the ugly truth");
        assert!((s.pos + s.neg + s.neu - 1.0).abs() < 0.01);
    }
}
