//! Shared application state
//!
//! The model is loaded once before the server starts. Its outcome, loaded or
//! failed, never changes afterwards and is shared read-only by every request.

use metrics_exporter_prometheus::PrometheusHandle;
use sentiserve_classifiers::{load_model, Predictor};
use sentiserve_core::Error;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// Outcome of the startup model load
pub enum ModelState {
    Loaded(Arc<dyn Predictor>),
    Failed(Error),
}

impl ModelState {
    /// Run the loader once; failures are kept, not raised
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        info!("Loading model from {}", path.display());

        match load_model(path) {
            Ok(predictor) => {
                info!("Model '{}' ready", predictor.name());
                Self::Loaded(predictor)
            }
            Err(e) => {
                error!("Model load failed: {}", e);
                Self::Failed(e)
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Startup model load result
    pub model: Arc<ModelState>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(model: ModelState) -> Self {
        Self {
            model: Arc::new(model),
            metrics_handle: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}
