//! Keyword lexicon sentiment model
//!
//! Counts case-insensitive positive and negative keyword hits. Keywords and
//! input are both lowercased (full Unicode) before matching. It produces
//! labels only and has no probability capability.

use crate::predictor::Predictor;
use aho_corasick::AhoCorasick;
use async_trait::async_trait;
use sentiserve_core::{Error, Label, Result};
use serde::{Deserialize, Serialize};

/// Serialized form of a lexicon model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconSpec {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub positive: Vec<String>,

    #[serde(default)]
    pub negative: Vec<String>,

    #[serde(default = "default_positive_label")]
    pub positive_label: Label,

    #[serde(default = "default_negative_label")]
    pub negative_label: Label,
}

fn default_positive_label() -> Label {
    Label::from("positive")
}

fn default_negative_label() -> Label {
    Label::from("negative")
}

pub struct LexiconModel {
    name: String,
    positive: AhoCorasick,
    negative: AhoCorasick,
    positive_label: Label,
    negative_label: Label,
}

impl LexiconModel {
    pub fn from_spec(spec: LexiconSpec) -> Result<Self> {
        if spec.positive.is_empty() && spec.negative.is_empty() {
            return Err(Error::invalid_model("lexicon has no keywords"));
        }

        let positive = AhoCorasick::new(lowercase_all(&spec.positive)).map_err(|e| {
            Error::invalid_model(format!("Failed to build positive keyword matcher: {e}"))
        })?;

        let negative = AhoCorasick::new(lowercase_all(&spec.negative)).map_err(|e| {
            Error::invalid_model(format!("Failed to build negative keyword matcher: {e}"))
        })?;

        Ok(Self {
            name: spec.name.unwrap_or_else(|| "sentiment-lexicon".to_string()),
            positive,
            negative,
            positive_label: spec.positive_label,
            negative_label: spec.negative_label,
        })
    }

    fn classify(&self, text: &str) -> &Label {
        let text = text.to_lowercase();
        let positive_hits = self.positive.find_iter(&text).count();
        let negative_hits = self.negative.find_iter(&text).count();

        if positive_hits >= negative_hits {
            &self.positive_label
        } else {
            &self.negative_label
        }
    }
}

fn lowercase_all(keywords: &[String]) -> Vec<String> {
    keywords.iter().map(|k| k.to_lowercase()).collect()
}

#[async_trait]
impl Predictor for LexiconModel {
    async fn predict(&self, inputs: &[String]) -> Result<Vec<Label>> {
        Ok(inputs
            .iter()
            .map(|text| self.classify(text).clone())
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
