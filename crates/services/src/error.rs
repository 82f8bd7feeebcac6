//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use match_core::{CatalogError, DeckError, SessionError};

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {raw}")]
    InvalidUrl { var: &'static str, raw: String },
    #[error("{var} is not a valid number: {raw}")]
    InvalidNumber { var: &'static str, raw: String },
}

/// Errors from the hint collaborator. Never shown to the player; callers
/// replace them with fallback text.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HintError {
    #[error("hint generation is not configured")]
    Disabled,
    #[error("hint request timed out")]
    TimedOut,
    #[error("hint request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors from dispatching a session summary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    #[error("could not encode summary: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `GameService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameError {
    #[error("student name and class are required")]
    MissingStudent,
    #[error("could not read catalog {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
