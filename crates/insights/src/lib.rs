//! Sentiment dashboard pipeline
//!
//! Given an ingested [`dataset::Dataset`] of unknown schema: find the label or
//! text column, derive labels with a lexicon scorer when needed, aggregate the
//! label distribution and build a word cloud over positive text. Rendering is
//! left to a [`DashboardRenderer`].

pub mod aggregate;
pub mod label;
pub mod pipeline;
pub mod render;
pub mod schema;
pub mod wordcloud;

pub use aggregate::{average_text_length, label_distribution, LabelShare};
pub use label::{apply_labels, derive_labels, SentimentLabel};
pub use pipeline::{
    run_pipeline, Analysis, ChartData, Dashboard, Notice, NoticeLevel, PipelineOptions, RawPreview,
    Summary, DEFAULT_PREVIEW_ROWS,
};
pub use render::{DashboardRenderer, TextRenderer};
pub use schema::{
    find_label_column, resolve_schema, DisplayColumnVocabulary, FirstVerboseColumn, LabelSource,
    Schema, TextColumnPolicy, DISPLAY_TEXT_NAMES, LABEL_COLUMN_NAMES, SENTIMENT_COLUMN,
};
pub use wordcloud::{
    build_word_cloud, positive_text, word_frequencies, PlacedWord, WordCloud, WordCloudConfig,
    WordCloudOutcome, NO_POSITIVE_TEXT, NO_TEXT_COLUMN, STOPWORDS,
};
pub use wordcloud::xml_escape;

use dataset::DatasetError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Could not load dataset: {0}")]
    Ingest(#[from] DatasetError),

    #[error("No text-like column found among {columns:?}. Please upload a CSV containing sentences, reviews, or comments.")]
    NoTextColumn { columns: Vec<String> },
}

impl PipelineError {
    /// Short machine-readable category.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Ingest(_) => "ingestion",
            PipelineError::NoTextColumn { .. } => "schema",
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
