//! Server configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Serialized model file loaded at startup
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted request body size
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> anyhow::Result<Self> {
        // A missing file means defaults; a malformed one is fatal
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content).map_err(|e| {
                anyhow::anyhow!("Failed to parse config file {}: {}", config_path, e)
            })?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(model) = &cli.model {
            config.model_path = model.clone();
        }

        if let Some(listen) = &cli.listen {
            config.listen = listen.clone();
        }

        if let Some(port) = cli.port {
            config.port = port;
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listen, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            listen: default_listen(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from("./sentiment_model.json")
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ServerConfig::load("/no/such/sentiserve.yaml", &Cli::default()).unwrap();
        assert_eq!(config.model_path, PathBuf::from("./sentiment_model.json"));
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.max_body_bytes, 65536);
    }

    #[test]
    fn test_file_then_cli_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sentiserve.yaml");
        std::fs::write(
            &path,
            "model_path: /srv/models/sentiment.json\nport: 8080\nmax_body_bytes: 1024\n",
        )
        .unwrap();
        let path = path.to_str().unwrap();

        let config = ServerConfig::load(path, &Cli::default()).unwrap();
        assert_eq!(config.model_path, PathBuf::from("/srv/models/sentiment.json"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.listen, "0.0.0.0");
        assert_eq!(config.max_body_bytes, 1024);

        let cli = Cli {
            model: Some(PathBuf::from("other.yaml")),
            port: Some(9000),
            listen: Some("127.0.0.1".to_string()),
            ..Default::default()
        };
        let config = ServerConfig::load(path, &cli).unwrap();
        assert_eq!(config.model_path, PathBuf::from("other.yaml"));
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sentiserve.yaml");
        std::fs::write(&path, "port: [not, a, number]\n").unwrap();

        let err = ServerConfig::load(path.to_str().unwrap(), &Cli::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
