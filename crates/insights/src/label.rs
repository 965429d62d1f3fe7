use std::fmt;

use dataset::Dataset;
use polarity::PolarityScorer;
use serde::{Deserialize, Serialize};

use crate::schema::SENTIMENT_COLUMN;
use crate::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Sign rule: > 0 positive, < 0 negative, exactly 0 neutral.
    pub fn from_score(score: f64) -> Self {
        if score > 0.0 {
            SentimentLabel::Positive
        } else if score < 0.0 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score every value of `text_idx`; missing values are scored as their placeholder.
pub fn derive_labels(ds: &Dataset, text_idx: usize, scorer: &dyn PolarityScorer) -> Vec<SentimentLabel> {
    ds.column_text(text_idx)
        .map(|text| SentimentLabel::from_score(scorer.compound(text)))
        .collect()
}

/// Write labels into the `Sentiment` column (appended, or replaced if present).
pub fn apply_labels(ds: &mut Dataset, labels: &[SentimentLabel]) -> Result<()> {
    let values = labels.iter().map(|l| Some(l.as_str().to_string())).collect();
    ds.set_column(SENTIMENT_COLUMN, values)?;
    Ok(())
}
