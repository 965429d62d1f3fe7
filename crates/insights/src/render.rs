//! The seam between the pipeline and whatever draws the dashboard.

use std::fmt::Write as _;

use dataset::display_cell;

use crate::pipeline::{ChartData, RawPreview, Summary};
use crate::wordcloud::WordCloudOutcome;

pub trait DashboardRenderer {
    type Output;

    fn render(
        &self,
        summary: &Summary,
        chart: &ChartData,
        word_cloud: &WordCloudOutcome,
        preview: &RawPreview,
    ) -> Self::Output;
}

/// Plain-text rendering for terminals and logs.
#[derive(Clone, Debug)]
pub struct TextRenderer {
    pub top_words: usize,
    pub max_cell_chars: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { top_words: 10, max_cell_chars: 40 }
    }
}

impl DashboardRenderer for TextRenderer {
    type Output = String;

    fn render(
        &self,
        summary: &Summary,
        chart: &ChartData,
        word_cloud: &WordCloudOutcome,
        preview: &RawPreview,
    ) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Sentiment Distribution");
        for share in &chart.shares {
            let bar = "#".repeat((share.percent / 2.0).round() as usize);
            let _ = writeln!(out, "  {:<10} {:>6}  {bar}", share.label, share.percent_display());
        }

        let _ = writeln!(out, "\nSummary");
        let _ = writeln!(out, "  Total records:     {}", summary.total_records);
        let _ = writeln!(
            out,
            "  Most common:       {}",
            summary.most_frequent_label.as_deref().unwrap_or("-")
        );
        let _ = writeln!(out, "  Avg text length:   {:.1}", summary.average_text_length);

        let _ = writeln!(out, "\nMost Frequent Words in Positive Sentences");
        match word_cloud {
            WordCloudOutcome::Rendered(cloud) => {
                let words: Vec<String> = cloud
                    .words
                    .iter()
                    .take(self.top_words)
                    .map(|w| format!("{} ({})", w.word, w.count))
                    .collect();
                let _ = writeln!(out, "  {}", words.join(", "));
            }
            WordCloudOutcome::Unavailable { reason } => {
                let _ = writeln!(out, "  warning: {reason}");
            }
        }

        let _ = writeln!(
            out,
            "\nRaw Data ({} of {} rows)",
            preview.rows.len(),
            preview.total_rows
        );
        let _ = writeln!(out, "  {}", preview.columns.join(" | "));
        for row in &preview.rows {
            let cells: Vec<String> = row
                .iter()
                .map(|c| truncate(display_cell(c.as_deref()), self.max_cell_chars))
                .collect();
            let _ = writeln!(out, "  {}", cells.join(" | "));
        }
        out
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max.saturating_sub(3)).collect();
        t.push_str("...");
        t
    }
}
