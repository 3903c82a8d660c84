use crate::config::{ConfigError, Provider};
use thiserror::Error;

// * Unified Error type for the orchestration layer and the summarizer collaborator.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("No endpoint configured for provider {0:?}")]
    MissingEndpoint(Provider),

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("Configuration unavailable: {0}")]
    Config(#[from] ConfigError),

    #[error("Connection failed: {0}")]
    Channel(String),

    #[error("AI analysis failed: {0}")]
    AnalysisFailed(Box<BackendError>),
}

impl BackendError {
    /// Wraps a collaborator failure the way it is reported to the user
    pub fn analysis_failed(inner: BackendError) -> Self {
        match inner {
            already @ BackendError::AnalysisFailed(_) => already,
            other => BackendError::AnalysisFailed(Box::new(other)),
        }
    }
}
