//! Predictor trait and the optional probability capability

use async_trait::async_trait;
use sentiserve_core::{Label, Result};

/// Trait for all loaded models
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Predict one label per input, in input order
    async fn predict(&self, inputs: &[String]) -> Result<Vec<Label>>;

    /// Probability capability, if this predictor has one.
    ///
    /// Queried at call time; predictors without class probabilities keep the
    /// default.
    fn probabilities(&self) -> Option<&dyn ProbabilityEstimator> {
        None
    }

    /// Get the predictor name
    fn name(&self) -> &str;
}

/// Optional capability: per-class probabilities
#[async_trait]
pub trait ProbabilityEstimator: Send + Sync {
    /// One probability vector per input, in label order
    async fn predict_proba(&self, inputs: &[String]) -> Result<Vec<Vec<f64>>>;
}
