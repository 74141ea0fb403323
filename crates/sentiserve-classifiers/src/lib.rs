//! SentiServe Classifiers
//!
//! Sentiment predictors and the loader that reconstructs them from a model
//! file.
//!
//! A model file is decoded by an ordered list of named strategies:
//! - `json` (always available)
//! - `yaml` (behind the default `yaml` feature)
//!
//! Decoded documents become one of two predictor kinds:
//! - `linear`: bag-of-words linear model with class probabilities
//! - `lexicon`: keyword lexicon with labels only

pub mod artifact;
pub mod lexicon;
pub mod linear;
pub mod loader;
pub mod predictor;

pub use artifact::ModelArtifact;
pub use lexicon::{LexiconModel, LexiconSpec};
pub use linear::{LinearModel, LinearSpec};
#[cfg(feature = "yaml")]
pub use loader::YamlStrategy;
pub use loader::{
    load_model, JsonStrategy, LoadStrategy, ModelInspection, ModelLoader, StrategyOutcome,
};
pub use predictor::{Predictor, ProbabilityEstimator};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::loader::{load_model, ModelLoader};
    pub use crate::predictor::{Predictor, ProbabilityEstimator};
}
