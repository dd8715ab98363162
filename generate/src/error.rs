//! Error types for generation runs.
//!
//! Covers configuration loading, template loading, collaborator transport
//! and API failures, and idea selection.

use std::path::PathBuf;

use ideagen_core::ResponseKind;
use thiserror::Error;

/// Errors that can occur while preparing or running a generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The API key environment variable is unset or empty.
    #[error("{env_var} not found in environment. Set it in .env file or environment variables.")]
    MissingApiKey { env_var: String },

    /// A prompt template file does not exist.
    #[error("prompt template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// The API answered 429.
    #[error("rate limit reached: {0}")]
    RateLimited(String),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The API answered with a body of unexpected shape.
    #[error("unexpected API response: {0}")]
    InvalidResponse(String),

    /// Refinement was requested with an empty selection.
    #[error("no ideas selected")]
    NoIdeasSelected,

    /// A selected idea identifier does not exist in the bundle.
    #[error("unknown idea: {0}")]
    UnknownIdea(String),

    /// A collaborator request for one response kind failed.
    #[error("failed to generate {kind}: {source}")]
    Request {
        kind: ResponseKind,
        #[source]
        source: Box<GenerateError>,
    },
}

impl GenerateError {
    /// Wraps `self` as the failure of a request for `kind`.
    pub fn for_kind(self, kind: ResponseKind) -> Self {
        Self::Request {
            kind,
            source: Box::new(self),
        }
    }

    /// Message suitable for showing to an end user.
    ///
    /// # Examples
    ///
    /// ```
    /// use ideagen_generate::GenerateError;
    ///
    /// let err = GenerateError::RateLimited("slow down".into());
    /// assert_eq!(err.user_message(), "Rate limit reached. Please wait a moment and try again.");
    /// ```
    pub fn user_message(&self) -> String {
        match self {
            Self::Request { source, .. } => source.user_message(),
            Self::RateLimited(_) | Self::Api { status: 429, .. } => {
                "Rate limit reached. Please wait a moment and try again.".to_string()
            }
            Self::MissingApiKey { .. } | Self::Api { status: 401, .. } => {
                "API key not configured. Please set OPENAI_API_KEY in your .env file.".to_string()
            }
            other => {
                let detail = other.to_string();
                let lowered = detail.to_lowercase();
                if lowered.contains("rate limit") || lowered.contains("rate_limit") {
                    "Rate limit reached. Please wait a moment and try again.".to_string()
                } else if lowered.contains("api key") || lowered.contains("api_key") {
                    "API key not configured. Please set OPENAI_API_KEY in your .env file."
                        .to_string()
                } else {
                    format!("Error: {detail}")
                }
            }
        }
    }
}

/// Convenience alias for results with [`GenerateError`].
pub type Result<T> = std::result::Result<T, GenerateError>;
