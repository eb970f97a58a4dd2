//! Failure taxonomy for selection and composition
//!
//! Only `RenderFailure` ever leaves the core as an `Err`. The other kinds are
//! recovered where they occur and logged using their display text.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("invalid identifier '{0}', using 0")]
    InvalidIdentifier(String),

    #[error("no fragment for {category}/{asset}")]
    MissingFragment { category: String, asset: String },

    #[error("category '{0}' has no options")]
    EmptyCategoryTable(String),

    #[error("render failed: {0}")]
    RenderFailure(String),
}
