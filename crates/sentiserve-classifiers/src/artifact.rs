//! Serialized model documents

use crate::lexicon::{LexiconModel, LexiconSpec};
use crate::linear::{LinearModel, LinearSpec};
use crate::predictor::Predictor;
use sentiserve_core::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A decoded model file, tagged by `kind`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelArtifact {
    Linear(LinearSpec),
    Lexicon(LexiconSpec),
}

impl ModelArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Linear(_) => "linear",
            Self::Lexicon(_) => "lexicon",
        }
    }

    /// Validate the document and build its predictor
    pub fn into_predictor(self) -> Result<Arc<dyn Predictor>> {
        Ok(match self {
            Self::Linear(spec) => Arc::new(LinearModel::from_spec(spec)?),
            Self::Lexicon(spec) => Arc::new(LexiconModel::from_spec(spec)?),
        })
    }
}
