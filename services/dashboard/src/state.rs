use std::sync::Arc;

use polarity::PolarityScorer;

use crate::config::{AppConfig, DashboardConfig};
use crate::sample_source::SampleSource;

pub type SharedState = Arc<AppState>;

/// Read-only after startup; each request works on its own upload.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub dashboard: DashboardConfig,
    pub sample: Arc<dyn SampleSource>,
    pub scorer: Arc<dyn PolarityScorer>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        sample: Arc<dyn SampleSource>,
        scorer: Arc<dyn PolarityScorer>,
    ) -> Self {
        let dashboard = DashboardConfig::from_app(&config);
        Self { config, dashboard, sample, scorer }
    }
}
