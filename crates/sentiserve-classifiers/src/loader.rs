//! Model loading with ordered fallback strategies
//!
//! The model file is read once and handed to each registered strategy in
//! order. The first strategy that decodes a valid model wins; every failure
//! is kept, by strategy name, so a failed load reports all of them.

use crate::artifact::ModelArtifact;
use crate::predictor::Predictor;
use sentiserve_core::{Error, LoadFailure, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One named way of decoding model bytes
pub trait LoadStrategy: Send + Sync {
    /// Name used as the key in load failure details
    fn name(&self) -> &str;

    /// Decode raw file bytes into a model document
    fn decode(&self, bytes: &[u8]) -> Result<ModelArtifact>;
}

/// Primary strategy: JSON documents
pub struct JsonStrategy;

impl LoadStrategy for JsonStrategy {
    fn name(&self) -> &str {
        "json"
    }

    fn decode(&self, bytes: &[u8]) -> Result<ModelArtifact> {
        serde_json::from_slice(bytes).map_err(|e| Error::decode(e.to_string()))
    }
}

/// Alternate strategy: YAML documents
#[cfg(feature = "yaml")]
pub struct YamlStrategy;

#[cfg(feature = "yaml")]
impl LoadStrategy for YamlStrategy {
    fn name(&self) -> &str {
        "yaml"
    }

    fn decode(&self, bytes: &[u8]) -> Result<ModelArtifact> {
        serde_yaml::from_slice(bytes).map_err(|e| Error::decode(e.to_string()))
    }
}

/// Loads a predictor by trying each strategy in order
pub struct ModelLoader {
    strategies: Vec<Box<dyn LoadStrategy>>,
}

impl ModelLoader {
    /// Create a loader with an explicit strategy order
    pub fn new(strategies: Vec<Box<dyn LoadStrategy>>) -> Self {
        Self { strategies }
    }

    /// Append a strategy after the existing ones
    pub fn with_strategy(mut self, strategy: impl LoadStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Names of the registered strategies, in attempt order
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Load a predictor from a local model file
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Arc<dyn Predictor>> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ModelNotFound {
                path: path.to_path_buf(),
            });
        }

        let bytes = std::fs::read(path)?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());

        let mut failure = LoadFailure::new();
        for strategy in &self.strategies {
            match Self::attempt(strategy.as_ref(), &bytes) {
                Ok(predictor) => {
                    info!(
                        "Loaded model '{}' from {} with {} strategy",
                        predictor.name(),
                        path.display(),
                        strategy.name()
                    );
                    return Ok(predictor);
                }
                Err(e) => {
                    warn!("{} strategy failed for {}: {}", strategy.name(), path.display(), e);
                    failure.record(strategy.name(), e.to_string());
                }
            }
        }

        Err(Error::Load(failure))
    }

    /// Try every strategy against a model file without stopping at the first
    /// success.
    ///
    /// Never fails as a whole: a missing or unreadable file shows up as the
    /// error of each strategy.
    pub fn inspect(&self, path: impl AsRef<Path>) -> ModelInspection {
        let path = path.as_ref();
        let size_bytes = std::fs::metadata(path).ok().map(|m| m.len());
        let contents = size_bytes.map(|_| std::fs::read(path));

        let outcomes = self
            .strategies
            .iter()
            .map(|strategy| {
                let result = match &contents {
                    None => Err(Error::ModelNotFound {
                        path: path.to_path_buf(),
                    }),
                    Some(Err(e)) => Err(Error::Io(std::io::Error::new(e.kind(), e.to_string()))),
                    Some(Ok(bytes)) => Self::attempt(strategy.as_ref(), bytes),
                };

                match &result {
                    Ok(predictor) => {
                        info!("{} strategy loaded '{}'", strategy.name(), predictor.name())
                    }
                    Err(e) => {
                        warn!("{} strategy failed for {}: {}", strategy.name(), path.display(), e)
                    }
                }

                StrategyOutcome {
                    strategy: strategy.name().to_string(),
                    result,
                }
            })
            .collect();

        ModelInspection {
            path: path.to_path_buf(),
            size_bytes,
            outcomes,
        }
    }

    fn attempt(strategy: &dyn LoadStrategy, bytes: &[u8]) -> Result<Arc<dyn Predictor>> {
        let artifact = strategy.decode(bytes)?;
        debug!("{} strategy decoded a {} model", strategy.name(), artifact.kind());
        artifact.into_predictor()
    }
}

/// Result of one strategy during an inspection
pub struct StrategyOutcome {
    pub strategy: String,
    pub result: Result<Arc<dyn Predictor>>,
}

impl StrategyOutcome {
    /// Whether the loaded model answers `predict_proba`
    pub fn has_probabilities(&self) -> bool {
        self.result
            .as_ref()
            .is_ok_and(|predictor| predictor.probabilities().is_some())
    }
}

/// Every strategy's verdict on one model file
pub struct ModelInspection {
    pub path: PathBuf,

    /// File size, `None` when the path does not exist
    pub size_bytes: Option<u64>,

    pub outcomes: Vec<StrategyOutcome>,
}

impl ModelInspection {
    pub fn exists(&self) -> bool {
        self.size_bytes.is_some()
    }

    /// At least one strategy produced a predictor
    pub fn is_loadable(&self) -> bool {
        self.outcomes.iter().any(|o| o.result.is_ok())
    }

    pub fn outcome(&self, strategy: &str) -> Option<&StrategyOutcome> {
        self.outcomes.iter().find(|o| o.strategy == strategy)
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        let loader = Self::new(vec![Box::new(JsonStrategy)]);
        #[cfg(feature = "yaml")]
        let loader = loader.with_strategy(YamlStrategy);
        loader
    }
}

/// Load a predictor with the default strategies
pub fn load_model(path: impl AsRef<Path>) -> Result<Arc<dyn Predictor>> {
    ModelLoader::default().load(path)
}
