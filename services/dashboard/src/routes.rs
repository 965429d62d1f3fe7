use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use chrono::Utc;
use dataset::{load_csv, load_sample, to_csv_bytes, DataSource, EXPORT_FILE_NAME, EXPORT_MIME};
use insights::{run_pipeline, Analysis, Dashboard, Notice, PipelineError};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::html::{dashboard_page, error_page};
use crate::state::SharedState;

pub const SAMPLE_NOTICE: &str = "No file uploaded. Using sample sentiment dataset instead.";

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Could not fetch sample dataset: {0:#}")]
    Sample(anyhow::Error),

    #[error("Invalid upload: {0}")]
    Multipart(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RunError {
    pub fn status(&self) -> StatusCode {
        match self {
            RunError::Pipeline(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RunError::Sample(_) => StatusCode::BAD_GATEWAY,
            RunError::Multipart(_) => StatusCode::BAD_REQUEST,
            RunError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RunError::Pipeline(e) => e.kind(),
            RunError::Sample(_) => "sample",
            RunError::Multipart(_) => "upload",
            RunError::Internal(_) => "internal",
        }
    }
}

pub type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(e: RunError) -> ApiError {
    (e.status(), Json(json!({"error": e.to_string(), "kind": e.kind()})))
}

pub struct Upload {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub run_id: Uuid,
    #[serde(flatten)]
    pub dashboard: Dashboard,
}

pub fn router(state: SharedState) -> Router {
    let limit = state.config.max_upload_bytes;
    Router::new()
        .route("/", get(get_index).post(post_index))
        .route("/api/analyze", post(post_analyze))
        .route("/api/export", post(post_export))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn get_index(State(state): State<SharedState>) -> Response {
    render_page(&state, None).await
}

async fn post_index(State(state): State<SharedState>, mp: Multipart) -> Response {
    match read_upload(mp).await {
        Ok(upload) => render_page(&state, upload).await,
        Err(e) => html_error(&state, e),
    }
}

pub async fn post_analyze(
    State(state): State<SharedState>,
    mp: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let upload = read_upload(mp).await.map_err(api_error)?;
    let (run_id, analysis) = analyze(&state, upload).await.map_err(api_error)?;
    Ok(Json(AnalyzeResponse { run_id, dashboard: analysis.dashboard }))
}

pub async fn post_export(
    State(state): State<SharedState>,
    mp: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let upload = read_upload(mp).await.map_err(api_error)?;
    let (_, analysis) = analyze(&state, upload).await.map_err(api_error)?;
    let body = to_csv_bytes(&analysis.dataset)
        .map_err(|e| api_error(RunError::Internal(e.to_string())))?;

    Ok((
        [
            (header::CONTENT_TYPE, EXPORT_MIME.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{EXPORT_FILE_NAME}\"")),
        ],
        body,
    ))
}

/// First `file` field; an absent or empty file means "use the sample".
async fn read_upload(mut mp: Multipart) -> Result<Option<Upload>, RunError> {
    while let Some(field) = mp.next_field().await.map_err(|e| RunError::Multipart(e.to_string()))? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().filter(|n| !n.is_empty()).map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| RunError::Multipart(e.to_string()))?;
        if bytes.is_empty() {
            return Ok(None);
        }
        return Ok(Some(Upload { file_name, bytes }));
    }
    Ok(None)
}

/// Ingest the upload (or the sample) and run the pipeline off the async runtime.
pub async fn analyze(state: &SharedState, upload: Option<Upload>) -> Result<(Uuid, Analysis), RunError> {
    let run_id = Uuid::new_v4();
    let (bytes, source) = match upload {
        Some(u) => {
            let file_name = u.file_name.unwrap_or_else(|| "upload.csv".to_string());
            (u.bytes, DataSource::Upload { file_name })
        }
        None => {
            let bytes = state.sample.fetch().await.map_err(RunError::Sample)?;
            (bytes, DataSource::Sample { url: state.sample.url().to_string() })
        }
    };
    let from_sample = matches!(source, DataSource::Sample { .. });
    info!(%run_id, bytes = bytes.len(), sample = from_sample, "analysis started");

    let st = state.clone();
    let mut analysis = tokio::task::spawn_blocking(move || -> Result<Analysis, PipelineError> {
        let ds = match source {
            DataSource::Sample { url } => load_sample(&bytes, &url)?,
            other => load_csv(&bytes, other)?,
        };
        run_pipeline(ds, st.scorer.as_ref(), &st.dashboard.pipeline_options())
    })
    .await
    .map_err(|e| RunError::Internal(e.to_string()))??;

    if from_sample {
        analysis.dashboard.notices.insert(0, Notice::info(SAMPLE_NOTICE));
    }
    info!(
        %run_id,
        rows = analysis.dashboard.summary.total_records,
        fingerprint = %analysis.dashboard.summary.fingerprint,
        "analysis finished"
    );
    Ok((run_id, analysis))
}

async fn render_page(state: &SharedState, upload: Option<Upload>) -> Response {
    let (run_id, analysis) = match analyze(state, upload).await {
        Ok(done) => done,
        Err(e) => return html_error(state, e),
    };
    let export = match to_csv_bytes(&analysis.dataset) {
        Ok(b) => b,
        Err(e) => return html_error(state, RunError::Internal(e.to_string())),
    };
    Html(dashboard_page(&state.dashboard, &analysis.dashboard, &export, run_id, Utc::now())).into_response()
}

fn html_error(state: &SharedState, e: RunError) -> Response {
    error!(kind = e.kind(), error = %e, "dashboard run failed");
    (e.status(), Html(error_page(&state.dashboard, &e.to_string(), Utc::now()))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::sample_source::StaticSampleSource;
    use crate::state::AppState;
    use polarity::SentimentIntensityAnalyzer;
    use std::sync::Arc;

    const SAMPLE: &str = "id,label,tweet\n\
        1,0,@user when a father is dysfunctional and is so selfish\n\
        2,0,thanks for #lyft credit i can't use cause they don't offer\n\
        3,1,we won!!! love the land!!! #allin #cavs #champions\n";

    fn state() -> SharedState {
        let cfg = AppConfig::from_lookup(|_| None).unwrap();
        Arc::new(AppState::new(
            cfg,
            Arc::new(StaticSampleSource::new("memory://train.csv", SAMPLE)),
            Arc::new(SentimentIntensityAnalyzer::new()),
        ))
    }

    fn upload(body: &str) -> Option<Upload> {
        Some(Upload { file_name: Some("reviews.csv".into()), bytes: Bytes::from(body.to_string()) })
    }

    #[tokio::test]
    async fn test_sample_fallback() {
        let (_, analysis) = analyze(&state(), None).await.unwrap();
        let dash = &analysis.dashboard;
        assert_eq!(dash.notices[0].message, SAMPLE_NOTICE);
        assert_eq!(analysis.dataset.columns(), ["Tweet", "Sentiment"]);
        assert_eq!(dash.summary.total_records, 3);
        assert_eq!(dash.summary.most_frequent_label.as_deref(), Some("0"));
        // sample labels are 0/1, so nothing is "Positive"
        assert!(dash.word_cloud.cloud().is_none());
    }

    #[tokio::test]
    async fn test_upload_is_labeled() {
        let (_, analysis) =
            analyze(&state(), upload("Review\n\"I love this product, it is amazing and wonderful\"\n"))
                .await
                .unwrap();
        assert_eq!(analysis.dashboard.chart.percent_of("Positive"), Some(100.0));
        assert!(analysis.dashboard.notices.iter().all(|n| n.message != SAMPLE_NOTICE));
        let csv = String::from_utf8(to_csv_bytes(&analysis.dataset).unwrap()).unwrap();
        assert_eq!(csv, "Review,Sentiment\n\"I love this product, it is amazing and wonderful\",Positive\n");
    }

    #[tokio::test]
    async fn test_schema_error_maps_to_422() {
        let err = analyze(&state(), upload("Notes\ngood\nbad\n")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.kind(), "schema");

        let (status, Json(body)) = api_error(err);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["kind"], "schema");
        assert!(body["error"].as_str().unwrap().contains("No text-like column found"));
    }

    #[tokio::test]
    async fn test_blank_header_maps_to_ingestion_error() {
        let err = analyze(&state(), upload(",,\n1,2,3\n")).await.unwrap_err();
        assert_eq!(err.kind(), "ingestion");
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_sample_error_is_bad_gateway() {
        let err = RunError::Sample(anyhow::anyhow!("connection refused"));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "Could not fetch sample dataset: connection refused");
    }

    #[tokio::test]
    async fn test_analyze_response_json() {
        let (run_id, analysis) = analyze(&state(), upload("Text\nwhat a great day out\n")).await.unwrap();
        let json = serde_json::to_value(AnalyzeResponse { run_id, dashboard: analysis.dashboard }).unwrap();
        assert_eq!(json["run_id"], run_id.to_string());
        assert_eq!(json["summary"]["total_records"], 1);
        assert_eq!(json["chart"]["shares"][0]["label"], "Positive");
        assert_eq!(json["word_cloud"]["status"], "rendered");
    }
}
