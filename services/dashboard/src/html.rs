//! HTML rendering of the dashboard page.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use dataset::{display_cell, EXPORT_FILE_NAME, EXPORT_MIME};
use insights::{
    xml_escape, ChartData, Dashboard, DashboardRenderer, NoticeLevel, RawPreview, Summary,
    WordCloudOutcome,
};
use plotters::prelude::*;
use tracing::warn;
use uuid::Uuid;

use crate::config::DashboardConfig;

const CHART_WIDTH: u32 = 640;
const CHART_HEIGHT: u32 = 360;

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0 auto; padding: 1.5rem; color: #262730; }
h1 { margin-bottom: 0.25rem; }
section { margin: 1.5rem 0; }
.notice { padding: 0.6rem 1rem; border-radius: 4px; margin: 0.4rem 0; }
.notice.info { background: #e8f0fe; }
.notice.warning { background: #fff4e5; }
.notice.error { background: #fdecea; }
.metrics { display: flex; gap: 2rem; }
.metric .value { font-size: 1.8rem; font-weight: 600; }
table { border-collapse: collapse; font-size: 0.9rem; }
th, td { border: 1px solid #ddd; padding: 0.3rem 0.6rem; text-align: left; }
footer { color: #888; font-size: 0.8rem; margin-top: 2rem; }
"#;

/// Renders the four dashboard sections as an HTML fragment.
pub struct HtmlRenderer<'a> {
    cfg: &'a DashboardConfig,
}

impl<'a> HtmlRenderer<'a> {
    pub fn new(cfg: &'a DashboardConfig) -> Self {
        Self { cfg }
    }
}

impl DashboardRenderer for HtmlRenderer<'_> {
    type Output = String;

    fn render(
        &self,
        summary: &Summary,
        chart: &ChartData,
        word_cloud: &WordCloudOutcome,
        preview: &RawPreview,
    ) -> String {
        let mut out = String::new();

        out.push_str("<section><h2>Sentiment Distribution</h2>");
        out.push_str(&bar_chart_svg(chart, self.cfg));
        out.push_str("</section>");

        out.push_str(r#"<section class="metrics">"#);
        metric(&mut out, "Total Records", &summary.total_records.to_string());
        metric(
            &mut out,
            "Most Common Sentiment",
            summary.most_frequent_label.as_deref().unwrap_or("-"),
        );
        metric(&mut out, "Avg. Text Length", &format!("{:.1}", summary.average_text_length));
        out.push_str("</section>");

        out.push_str("<section><h2>Most Frequent Words in Positive Sentences</h2>");
        match word_cloud {
            WordCloudOutcome::Rendered(cloud) => out.push_str(&cloud.svg),
            WordCloudOutcome::Unavailable { reason } => {
                let _ = write!(out, r#"<div class="notice warning">{}</div>"#, xml_escape(reason));
            }
        }
        out.push_str("</section>");

        let _ = write!(
            out,
            "<section><details><summary>View Raw Data ({} of {} rows)</summary><table><tr>",
            preview.rows.len(),
            preview.total_rows
        );
        for col in &preview.columns {
            let _ = write!(out, "<th>{}</th>", xml_escape(col));
        }
        out.push_str("</tr>");
        for row in &preview.rows {
            out.push_str("<tr>");
            for cell in row {
                let _ = write!(out, "<td>{}</td>", xml_escape(display_cell(cell.as_deref())));
            }
            out.push_str("</tr>");
        }
        out.push_str("</table></details></section>");
        out
    }
}

/// Full page: notices, the rendered sections and a download link for the labeled CSV.
pub fn dashboard_page(
    cfg: &DashboardConfig,
    dashboard: &Dashboard,
    export_csv: &[u8],
    run_id: Uuid,
    now: DateTime<Utc>,
) -> String {
    let mut body = String::new();
    for notice in &dashboard.notices {
        let class = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
        };
        let _ = write!(body, r#"<div class="notice {class}">{}</div>"#, xml_escape(&notice.message));
    }
    body.push_str(&dashboard.render_with(&HtmlRenderer::new(cfg)));
    let _ = write!(
        body,
        r#"<section><a download="{name}" href="{href}">Download Analyzed CSV</a></section>"#,
        name = EXPORT_FILE_NAME,
        href = download_href(export_csv),
    );
    page(cfg, &body, Some(run_id), now)
}

/// Page with the error shown in place of the dashboard.
pub fn error_page(cfg: &DashboardConfig, message: &str, now: DateTime<Utc>) -> String {
    let body = format!(r#"<div class="notice error">{}</div>"#, xml_escape(message));
    page(cfg, &body, None, now)
}

fn page(cfg: &DashboardConfig, body: &str, run_id: Option<Uuid>, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>{title}</title><style>{STYLE}body {{ max-width: {width}px; }}</style></head><body>",
        title = xml_escape(&cfg.title),
        width = cfg.layout.max_width_px(),
    );
    let _ = write!(
        out,
        "<header><h1>{}</h1><p>{}</p></header>",
        xml_escape(&cfg.title),
        xml_escape(&cfg.subtitle)
    );
    let _ = write!(
        out,
        r#"<form method="post" action="/" enctype="multipart/form-data"><label>{} <input type="file" name="file" accept=".csv,text/csv"></label> <button type="submit">Analyze</button></form>"#,
        xml_escape(&cfg.upload_prompt)
    );
    out.push_str(body);

    let _ = write!(out, "<footer>Generated {}", now.format("%Y-%m-%d %H:%M:%S UTC"));
    if let Some(id) = run_id {
        let _ = write!(out, " &middot; run {id}");
    }
    out.push_str("</footer></body></html>");
    out
}

fn metric(out: &mut String, name: &str, value: &str) {
    let _ = write!(
        out,
        r#"<div class="metric"><div class="name">{}</div><div class="value">{}</div></div>"#,
        xml_escape(name),
        xml_escape(value)
    );
}

/// One bar per label, height in percent of labeled records.
fn bar_chart_svg(chart: &ChartData, cfg: &DashboardConfig) -> String {
    if chart.shares.is_empty() {
        return r#"<p>No records to chart.</p>"#.to_string();
    }
    let mut svg = String::new();
    if let Err(e) = draw_bars(&mut svg, chart, cfg) {
        warn!(error = %e, "bar chart rendering failed");
        return r#"<p>Chart unavailable.</p>"#.to_string();
    }
    svg
}

fn draw_bars(buf: &mut String, chart: &ChartData, cfg: &DashboardConfig) -> anyhow::Result<()> {
    let root = SVGBackend::with_string(buf, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let n = chart.shares.len();
    let label_of = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) => chart.shares.get(*i).map(|s| s.label.clone()).unwrap_or_default(),
        _ => String::new(),
    };
    let mut plot = ChartBuilder::on(&root)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0..n).into_segmented(), 0f64..110f64)?;
    plot.configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&label_of)
        .y_desc("Percentage")
        .draw()?;

    for (i, share) in chart.shares.iter().enumerate() {
        let color = hex_color(cfg.label_color(&share.label, i)).unwrap_or(BLUE);
        plot.draw_series(std::iter::once(Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), share.percent)],
            color.filled(),
        )))?;
        plot.draw_series(std::iter::once(Text::new(
            share.percent_display(),
            (SegmentValue::CenterOf(i), share.percent + 3.0),
            ("sans-serif", 14),
        )))?;
    }
    root.present()?;
    Ok(())
}

/// `#rrggbb` to a plotters colour.
fn hex_color(hex: &str) -> Option<RGBColor> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

fn download_href(csv: &[u8]) -> String {
    format!("data:{EXPORT_MIME};charset=utf-8,{}", urlencoding::encode_binary(csv))
}
