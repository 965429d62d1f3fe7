use anyhow::{bail, Context, Result};
use dataset::SAMPLE_DATASET_URL;
use insights::{PipelineOptions, WordCloudConfig, DEFAULT_PREVIEW_ROWS};
use serde::Serialize;

pub const DEFAULT_TITLE: &str = "Consumer Sentiment Analysis Dashboard";
pub const DEFAULT_SUBTITLE: &str = "Analyze how people feel about a brand, product, or topic.";
const MAX_PREVIEW_ROWS: usize = 1000;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub sample_url: String,
    pub title: String,
    pub preview_rows: usize,
    pub max_upload_bytes: usize,
    pub layout: Layout,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = lookup("DASHBOARD_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8501".to_string());
        let sample_url = lookup("DASHBOARD_SAMPLE_URL").unwrap_or_else(|| SAMPLE_DATASET_URL.to_string());
        let title = lookup("DASHBOARD_TITLE").unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let preview_rows = parse_or(&lookup, "DASHBOARD_PREVIEW_ROWS", DEFAULT_PREVIEW_ROWS)?;
        let max_upload_bytes = parse_or(&lookup, "DASHBOARD_MAX_UPLOAD_BYTES", 50 * 1024 * 1024)?;

        let layout = match lookup("DASHBOARD_LAYOUT").as_deref() {
            None | Some("wide") => Layout::Wide,
            Some("centered") => Layout::Centered,
            Some(other) => bail!("DASHBOARD_LAYOUT must be wide or centered, got {other:?}"),
        };

        if !sample_url.starts_with("http://") && !sample_url.starts_with("https://") {
            bail!("DASHBOARD_SAMPLE_URL must start with http:// or https://");
        }
        if !(1..=MAX_PREVIEW_ROWS).contains(&preview_rows) {
            bail!("DASHBOARD_PREVIEW_ROWS must be between 1 and {MAX_PREVIEW_ROWS}");
        }
        if max_upload_bytes == 0 {
            bail!("DASHBOARD_MAX_UPLOAD_BYTES must be positive");
        }

        Ok(Self { bind_addr, sample_url, title, preview_rows, max_upload_bytes, layout })
    }
}

fn parse_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: usize) -> Result<usize> {
    match lookup(key) {
        Some(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a non-negative integer, got {v:?}")),
        None => Ok(default),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    Wide,
    Centered,
}

impl Layout {
    pub fn max_width_px(&self) -> u32 {
        match self {
            Layout::Wide => 1400,
            Layout::Centered => 760,
        }
    }
}

/// Everything the render step needs, fixed at startup.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardConfig {
    pub title: String,
    pub subtitle: String,
    pub upload_prompt: String,
    pub layout: Layout,
    /// Bar colours for labels without an entry in `label_colors`.
    pub palette: Vec<String>,
    pub label_colors: Vec<(String, String)>,
    pub preview_rows: usize,
    pub word_cloud: WordCloudConfig,
}

impl DashboardConfig {
    pub fn from_app(cfg: &AppConfig) -> Self {
        Self {
            title: cfg.title.clone(),
            subtitle: DEFAULT_SUBTITLE.to_string(),
            upload_prompt: "Upload a CSV file with Tweets or Reviews".to_string(),
            layout: cfg.layout,
            palette: ["#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            label_colors: [("Positive", "#2ca02c"), ("Neutral", "#7f7f7f"), ("Negative", "#d62728")]
                .iter()
                .map(|(l, c)| (l.to_string(), c.to_string()))
                .collect(),
            preview_rows: cfg.preview_rows,
            word_cloud: WordCloudConfig::default(),
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            word_cloud: self.word_cloud.clone(),
            preview_rows: self.preview_rows,
            ..Default::default()
        }
    }

    /// Fixed colour for known labels, otherwise the `index`-th palette entry.
    pub fn label_color(&self, label: &str, index: usize) -> &str {
        if let Some((_, color)) = self.label_colors.iter().find(|(l, _)| l == label) {
            return color;
        }
        if self.palette.is_empty() {
            "#636efa"
        } else {
            &self.palette[index % self.palette.len()]
        }
    }
}
