//! Deciding which column holds text and whether labels already exist.

use dataset::Dataset;
use serde::Serialize;
use tracing::info;

use crate::{PipelineError, Result};

/// Name of the label column the pipeline reads or writes.
pub const SENTIMENT_COLUMN: &str = "Sentiment";

/// Column names (case-insensitive) that already carry sentiment labels.
pub const LABEL_COLUMN_NAMES: &[&str] = &["sentiment"];

/// Column names (case-insensitive, exact) used to pick the display text column.
pub const DISPLAY_TEXT_NAMES: &[&str] = &["text", "tweet", "review", "comment"];

/// Strategy for spotting a free-text column in an unknown schema.
pub trait TextColumnPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Index of the chosen column, if any qualifies.
    fn select(&self, ds: &Dataset) -> Option<usize>;
}

/// First column (in column order) where at least one of the first `sample_size`
/// non-missing values has more than `token_threshold` whitespace-separated tokens.
#[derive(Clone, Debug)]
pub struct FirstVerboseColumn {
    pub sample_size: usize,
    pub token_threshold: usize,
}

impl Default for FirstVerboseColumn {
    fn default() -> Self {
        Self { sample_size: 10, token_threshold: 3 }
    }
}

impl FirstVerboseColumn {
    pub fn is_text_like<'a>(&self, values: impl Iterator<Item = Option<&'a str>>) -> bool {
        values
            .flatten()
            .take(self.sample_size)
            .any(|v| v.split_whitespace().count() > self.token_threshold)
    }
}

impl TextColumnPolicy for FirstVerboseColumn {
    fn name(&self) -> &'static str {
        "first_verbose_column"
    }

    fn select(&self, ds: &Dataset) -> Option<usize> {
        (0..ds.columns().len()).find(|&idx| self.is_text_like(ds.column_cells(idx)))
    }
}

/// Fixed-vocabulary lookup for the column shown in the word cloud.
#[derive(Clone, Debug)]
pub struct DisplayColumnVocabulary {
    names: Vec<String>,
}

impl Default for DisplayColumnVocabulary {
    fn default() -> Self {
        Self::new(DISPLAY_TEXT_NAMES.iter().copied())
    }
}

impl DisplayColumnVocabulary {
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self { names: names.into_iter().map(str::to_lowercase).collect() }
    }

    /// First column, in column order, whose lower-cased name is in the vocabulary.
    pub fn resolve(&self, ds: &Dataset) -> Option<usize> {
        ds.columns()
            .iter()
            .position(|c| self.names.iter().any(|n| *n == c.to_lowercase()))
    }
}

/// First column whose name is a known label column name.
pub fn find_label_column(ds: &Dataset) -> Option<usize> {
    LABEL_COLUMN_NAMES.iter().find_map(|name| ds.find_column_ci(name))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LabelSource {
    /// Labels were read from an input column.
    Existing { column: String },
    /// Labels were derived by scoring this column.
    Derived { text_column: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub label: LabelSource,
    /// Column from the display vocabulary, independent of `label`.
    pub display_text_column: Option<String>,
}

impl Schema {
    /// Column feeding the word cloud and the text-length metric: the vocabulary
    /// match when there is one, otherwise the heuristically detected column.
    pub fn word_cloud_column(&self) -> Option<&str> {
        self.display_text_column.as_deref().or(match &self.label {
            LabelSource::Derived { text_column } => Some(text_column.as_str()),
            LabelSource::Existing { .. } => None,
        })
    }
}

pub fn resolve_schema(
    ds: &Dataset,
    policy: &dyn TextColumnPolicy,
    vocabulary: &DisplayColumnVocabulary,
) -> Result<Schema> {
    let display_text_column = vocabulary.resolve(ds).map(|i| ds.columns()[i].clone());

    if let Some(idx) = find_label_column(ds) {
        let column = ds.columns()[idx].clone();
        info!(%column, "label column present; skipping derivation");
        return Ok(Schema { label: LabelSource::Existing { column }, display_text_column });
    }

    let Some(idx) = policy.select(ds) else {
        return Err(PipelineError::NoTextColumn { columns: ds.columns().to_vec() });
    };
    let text_column = ds.columns()[idx].clone();
    info!(%text_column, policy = policy.name(), "detected text column");

    Ok(Schema { label: LabelSource::Derived { text_column }, display_text_column })
}
