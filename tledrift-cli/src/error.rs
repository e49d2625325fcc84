//! Error enum for the tledrift CLI.

use thiserror::Error;

use tledrift_core::DriftError;

/// All errors produced by the CLI layer.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Drift(#[from] DriftError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("Space-Track error: {0}")]
    SpaceTrack(String),
    #[error("DISCOS error: {0}")]
    Discos(String),
    #[error("{0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, CliError>;
