//! Lexicon-based polarity scoring
//!
//! Assigns a compound sentiment intensity in [-1, 1] to short texts using the
//! VADER valence lexicon and its rules (boosters, negation, caps, "but",
//! punctuation). Nothing is trained on the input.

mod analyzer;

pub use analyzer::{PolarityScores, SentimentIntensityAnalyzer};

/// Anything that can turn a text into a compound polarity score.
///
/// Must be deterministic: the same text always yields the same score.
pub trait PolarityScorer: Send + Sync {
    fn compound(&self, text: &str) -> f64;
}
