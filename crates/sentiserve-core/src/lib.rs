//! SentiServe Core
//!
//! Core types shared across SentiServe components.
//!
//! This crate provides:
//! - The error taxonomy for model loading and prediction
//! - The `Label` type produced by predictors
//! - The `LoadFailure` record describing every failed load attempt

pub mod error;
pub mod types;

pub use error::{Error, LoadFailure, Result, StrategyFailure};
pub use types::Label;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, LoadFailure, Result};
    pub use crate::types::Label;
}
