//! Linear bag-of-words sentiment model
//!
//! Each class has a bias and every known token carries one weight per class.
//! A text's class scores are the bias plus the weights of each token
//! occurrence; probabilities are the softmax of those scores.

use crate::predictor::{Predictor, ProbabilityEstimator};
use async_trait::async_trait;
use sentiserve_core::{Error, Label, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Serialized form of a linear model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSpec {
    #[serde(default)]
    pub name: Option<String>,

    /// Class labels, in score order
    pub labels: Vec<Label>,

    /// Per-class bias
    pub bias: Vec<f64>,

    /// Token to per-class weight
    #[serde(default)]
    pub weights: HashMap<String, Vec<f64>>,

    /// Lowercase text before tokenizing
    #[serde(default = "default_true")]
    pub lowercase: bool,
}

fn default_true() -> bool {
    true
}

pub struct LinearModel {
    name: String,
    labels: Vec<Label>,
    bias: Vec<f64>,
    weights: HashMap<String, Vec<f64>>,
    lowercase: bool,
}

impl LinearModel {
    pub fn from_spec(spec: LinearSpec) -> Result<Self> {
        let classes = spec.labels.len();
        if classes == 0 {
            return Err(Error::invalid_model("linear model has no labels"));
        }
        if spec.bias.len() != classes {
            return Err(Error::invalid_model(format!(
                "bias has {} entries, expected {}",
                spec.bias.len(),
                classes
            )));
        }
        if let Some((token, w)) = spec.weights.iter().find(|(_, w)| w.len() != classes) {
            return Err(Error::invalid_model(format!(
                "weights for token '{}' have {} entries, expected {}",
                token,
                w.len(),
                classes
            )));
        }

        // Keys must match tokenizer output
        let weights = if spec.lowercase {
            let mut lowered: HashMap<String, Vec<f64>> = HashMap::with_capacity(spec.weights.len());
            for (token, w) in spec.weights {
                let entry = lowered
                    .entry(token.to_lowercase())
                    .or_insert_with(|| vec![0.0; classes]);
                for (acc, v) in entry.iter_mut().zip(w) {
                    *acc += v;
                }
            }
            lowered
        } else {
            spec.weights
        };

        Ok(Self {
            name: spec.name.unwrap_or_else(|| "sentiment-linear".to_string()),
            labels: spec.labels,
            bias: spec.bias,
            weights,
            lowercase: spec.lowercase,
        })
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    fn scores(&self, text: &str) -> Vec<f64> {
        let mut scores = self.bias.clone();
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        for token in tokenize(&text) {
            if let Some(w) = self.weights.get(token) {
                for (score, weight) in scores.iter_mut().zip(w) {
                    *score += weight;
                }
            }
        }
        scores
    }

    fn best_label(&self, scores: &[f64]) -> &Label {
        let mut best = 0;
        for (i, score) in scores.iter().enumerate().skip(1) {
            if *score > scores[best] {
                best = i;
            }
        }
        &self.labels[best]
    }
}

/// Split on anything that is not alphanumeric, keeping inner apostrophes
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[async_trait]
impl Predictor for LinearModel {
    async fn predict(&self, inputs: &[String]) -> Result<Vec<Label>> {
        Ok(inputs
            .iter()
            .map(|text| self.best_label(&self.scores(text)).clone())
            .collect())
    }

    fn probabilities(&self) -> Option<&dyn ProbabilityEstimator> {
        Some(self)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl ProbabilityEstimator for LinearModel {
    async fn predict_proba(&self, inputs: &[String]) -> Result<Vec<Vec<f64>>> {
        Ok(inputs
            .iter()
            .map(|text| softmax(&self.scores(text)))
            .collect())
    }
}
