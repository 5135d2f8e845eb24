//! Error types for the field-health pipeline.

use thiserror::Error;

/// Result type alias using FieldError.
pub type FieldResult<T> = Result<T, FieldError>;

/// Primary error type for field-health operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FieldError {
    // === Setup Errors ===
    #[error("Configuration error: {0}")]
    Configuration(String),

    // === Third-party Errors ===
    #[error("{context} failed with status {status}: {body}")]
    Upstream {
        context: String,
        status: u16,
        body: String,
    },

    #[error("{context} failed: {message}")]
    Transport { context: String, message: String },

    #[error("Request timeout: {0}")]
    Timeout(String),

    // === Input Errors ===
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // === Rendering Errors ===
    #[error("Render error: {0}")]
    Render(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FieldError {
    /// Short machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            FieldError::Configuration(_) => "ConfigurationError",
            FieldError::Upstream { .. } | FieldError::Transport { .. } => "UpstreamError",
            FieldError::Timeout(_) => "Timeout",
            FieldError::Validation(_) => "ValidationError",
            FieldError::NotFound(_) => "NotFound",
            FieldError::Conflict(_) => "Conflict",
            FieldError::Render(_) => "RenderError",
            FieldError::Internal(_) => "InternalError",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            FieldError::Validation(_) => 400,
            FieldError::NotFound(_) => 404,
            FieldError::Conflict(_) => 409,
            FieldError::Upstream { .. } | FieldError::Transport { .. } => 502,
            FieldError::Timeout(_) => 504,
            _ => 500,
        }
    }

    /// Whether the error should be shown to an end user only in generic form.
    ///
    /// Upstream failures carry provider bodies that belong in logs, not banners.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            FieldError::Upstream { .. } | FieldError::Transport { .. } | FieldError::Timeout(_)
        )
    }
}

impl From<serde_json::Error> for FieldError {
    fn from(err: serde_json::Error) -> Self {
        FieldError::Validation(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for FieldError {
    fn from(err: serde_yaml::Error) -> Self {
        FieldError::Configuration(format!("YAML error: {}", err))
    }
}

impl From<std::io::Error> for FieldError {
    fn from(err: std::io::Error) -> Self {
        FieldError::Internal(err.to_string())
    }
}
