//! SentiServe Server
//!
//! HTTP wrapper around a pre-trained sentiment model. The model is loaded
//! once at startup; `POST /predict` classifies form-encoded text with it.

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod routes;
pub mod state;
pub mod static_files;

pub use config::ServerConfig;
pub use routes::{create_router, PredictionResponse};
pub use state::{AppState, ModelState};
