use dataset::{Cell, Dataset, IngestReport};
use polarity::PolarityScorer;
use serde::Serialize;
use tracing::{info, warn};

use crate::aggregate::{average_text_length, label_distribution, LabelShare};
use crate::label::{apply_labels, derive_labels};
use crate::render::DashboardRenderer;
use crate::schema::{
    resolve_schema, DisplayColumnVocabulary, FirstVerboseColumn, LabelSource, Schema,
    TextColumnPolicy, SENTIMENT_COLUMN,
};
use crate::wordcloud::{build_word_cloud, positive_text, WordCloudConfig, WordCloudOutcome, NO_TEXT_COLUMN};
use crate::{PipelineError, Result};

pub const DEFAULT_PREVIEW_ROWS: usize = 20;

pub struct PipelineOptions {
    pub text_policy: Box<dyn TextColumnPolicy>,
    pub display_vocabulary: DisplayColumnVocabulary,
    pub word_cloud: WordCloudConfig,
    pub preview_rows: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            text_policy: Box::new(FirstVerboseColumn::default()),
            display_vocabulary: DisplayColumnVocabulary::default(),
            word_cloud: WordCloudConfig::default(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, message: message.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub total_records: usize,
    pub most_frequent_label: Option<String>,
    /// Mean characters per value of `text_column`; 0 when there is none.
    pub average_text_length: f64,
    pub text_column: Option<String>,
    pub schema: Schema,
    pub columns: Vec<String>,
    pub fingerprint: String,
    pub ingest: IngestReport,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartData {
    pub shares: Vec<LabelShare>,
}

impl ChartData {
    pub fn percent_of(&self, label: &str) -> Option<f64> {
        self.shares.iter().find(|s| s.label == label).map(|s| s.percent)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RawPreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub total_rows: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dashboard {
    pub notices: Vec<Notice>,
    pub summary: Summary,
    pub chart: ChartData,
    pub word_cloud: WordCloudOutcome,
    pub preview: RawPreview,
}

impl Dashboard {
    pub fn render_with<R: DashboardRenderer>(&self, renderer: &R) -> R::Output {
        renderer.render(&self.summary, &self.chart, &self.word_cloud, &self.preview)
    }
}

/// Labeled dataset (for export) plus everything the dashboard shows.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub dataset: Dataset,
    pub dashboard: Dashboard,
}

/// Resolve → label → aggregate → word cloud, on an already ingested dataset.
pub fn run_pipeline(
    mut ds: Dataset,
    scorer: &dyn PolarityScorer,
    options: &PipelineOptions,
) -> Result<Analysis> {
    let mut notices = Vec::new();
    let schema = resolve_schema(&ds, options.text_policy.as_ref(), &options.display_vocabulary)?;

    let label_idx = match &schema.label {
        LabelSource::Existing { column } => column_index(&ds, column)?,
        LabelSource::Derived { text_column } => {
            notices.push(Notice::info(format!(
                "Detected text column: '{text_column}', running sentiment analysis..."
            )));
            let text_idx = column_index(&ds, text_column)?;
            let labels = derive_labels(&ds, text_idx, scorer);
            apply_labels(&mut ds, &labels)?;
            info!(rows = labels.len(), column = %text_column, "derived sentiment labels");
            column_index(&ds, SENTIMENT_COLUMN)?
        }
    };
    notices.push(Notice::info(format!("Detected columns: {:?}", ds.columns())));

    let shares = label_distribution(&ds, label_idx);
    let text_column = schema.word_cloud_column().map(str::to_string);
    let text_idx = match &text_column {
        Some(name) => Some(column_index(&ds, name)?),
        None => None,
    };

    let summary = Summary {
        total_records: ds.len(),
        most_frequent_label: shares.first().map(|s| s.label.clone()),
        average_text_length: average_text_length(&ds, text_idx),
        text_column,
        schema: schema.clone(),
        columns: ds.columns().to_vec(),
        fingerprint: ds.fingerprint_hex(),
        ingest: ds.report().clone(),
    };

    let word_cloud = match text_idx {
        Some(idx) => build_word_cloud(&positive_text(&ds, label_idx, idx), &options.word_cloud),
        None => WordCloudOutcome::unavailable(NO_TEXT_COLUMN),
    };
    if let WordCloudOutcome::Unavailable { reason } = &word_cloud {
        warn!(%reason, "word cloud unavailable");
        notices.push(Notice::warning(reason.clone()));
    }

    let preview = RawPreview {
        columns: ds.columns().to_vec(),
        rows: ds.head(options.preview_rows).to_vec(),
        total_rows: ds.len(),
    };

    let dashboard = Dashboard {
        notices,
        summary,
        chart: ChartData { shares },
        word_cloud,
        preview,
    };
    Ok(Analysis { dataset: ds, dashboard })
}

fn column_index(ds: &Dataset, name: &str) -> Result<usize> {
    ds.column_index(name)
        .ok_or_else(|| PipelineError::Ingest(dataset::DatasetError::MissingColumn(name.to_string())))
}
