use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::FromRef;
use stockdash_core::{MarketDataSource, Warehouse};

/// Where the fallback series comes from when the provider has nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SampleSource {
    /// The CSV compiled into the binary.
    #[default]
    Bundled,
    /// A CSV on disk; skipped when the file is missing.
    File(PathBuf),
    Disabled,
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub warehouse: Warehouse,
    pub provider: Arc<dyn MarketDataSource>,
    pub sample_data: SampleSource,
    pub legacy_error_status: bool,
}

impl AppState {
    pub fn new(warehouse: Warehouse, provider: Arc<dyn MarketDataSource>) -> Self {
        Self {
            warehouse,
            provider,
            sample_data: SampleSource::default(),
            legacy_error_status: false,
        }
    }

    pub fn with_sample_data(mut self, path: impl Into<PathBuf>) -> Self {
        self.sample_data = SampleSource::File(path.into());
        self
    }

    pub fn without_sample_data(mut self) -> Self {
        self.sample_data = SampleSource::Disabled;
        self
    }

    pub fn with_legacy_error_status(mut self, enabled: bool) -> Self {
        self.legacy_error_status = enabled;
        self
    }
}

impl FromRef<AppState> for Warehouse {
    fn from_ref(app_state: &AppState) -> Warehouse {
        app_state.warehouse.clone()
    }
}
