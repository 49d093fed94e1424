use thiserror::Error;

/// Errors produced by the story pipeline and its backends.
///
/// Soft image failures never show up here: they are reported as
/// `None` by [`fetch_image`](crate::imaging::fetch_image) and as
/// [`ImageOutcome::Missing`](crate::imaging::ImageOutcome) by the store.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Low-level HTTP transport failure (connection refused, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed at the serde level.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem failure outside the best-effort image store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required credential is not configured.
    #[error("{var} not found. Check your .env file.")]
    Config {
        /// Name of the missing environment variable.
        var: &'static str,
    },

    /// A configuration value is present but unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The structured story could not be produced.
    #[error("Error generating story: {0}")]
    Generation(String),

    /// An image prompt could not be refined.
    #[error("Error refining image prompt: {0}")]
    Refinement(String),

    /// HTTP error with status code and response body.
    ///
    /// Returned by [`Backend`](crate::backend::Backend) implementations when
    /// the provider returns a non-success status code.
    #[error("HTTP {status}: {body}")]
    HttpError {
        /// HTTP status code (e.g. 401, 429, 500).
        status: u16,
        /// Response body text.
        body: String,
    },

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(String),
}

impl PipelineError {
    /// Whether the failure is attributable to the request or its setup
    /// rather than to an internal fault.
    pub fn is_client_facing(&self) -> bool {
        matches!(self, PipelineError::Config { .. } | PipelineError::Generation(_))
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_names_variable() {
        let err = PipelineError::Config {
            var: "GOOGLE_API_KEY",
        };
        assert_eq!(
            err.to_string(),
            "GOOGLE_API_KEY not found. Check your .env file."
        );
        assert!(err.is_client_facing());
    }

    #[test]
    fn test_generation_error_is_client_facing() {
        let err = PipelineError::Generation("quota exceeded".into());
        assert_eq!(err.to_string(), "Error generating story: quota exceeded");
        assert!(err.is_client_facing());
    }

    #[test]
    fn test_internal_errors_are_not_client_facing() {
        assert!(!PipelineError::Other("boom".into()).is_client_facing());
        let err = PipelineError::Refinement("HTTP 500".into());
        assert!(!err.is_client_facing());
        assert_eq!(err.to_string(), "Error refining image prompt: HTTP 500");
    }
}
