use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "sentiserve")]
#[command(author, version, about = "Sentiment prediction service", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "sentiserve.yaml")]
    pub config: String,

    /// Serialized model file
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Serve predictions when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Try every load strategy against a model file and report the results
    CheckModel {
        /// Model file to inspect (defaults to the configured model path)
        path: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_is_the_default() {
        let cli = Cli::try_parse_from(["sentiserve", "-m", "model.json"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.model, Some(PathBuf::from("model.json")));
    }

    #[test]
    fn test_check_model_subcommand() {
        let cli = Cli::try_parse_from(["sentiserve", "check-model", "model.yaml"]).unwrap();
        match cli.command {
            Some(Commands::CheckModel { path }) => {
                assert_eq!(path, Some(PathBuf::from("model.yaml")))
            }
            other => panic!("Expected check-model, got {other:?}"),
        }

        let cli = Cli::try_parse_from(["sentiserve", "-c", "prod.yaml", "check-model"]).unwrap();
        assert_eq!(cli.config, "prod.yaml");
        assert!(matches!(cli.command, Some(Commands::CheckModel { path: None })));
    }
}
