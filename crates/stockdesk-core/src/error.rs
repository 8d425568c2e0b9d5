//! Error types for stockdesk-core
//!
//! Every failed API call is classified as a transport failure, a
//! non-success status, a body that could not be parsed, or a request that
//! could not be encoded. Callers get the typed variant; users get a single
//! notification line built from it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Network unreachable, timeout, connection reset
    TransportError,
    /// Server answered with a non-2xx status
    HttpStatus,
    /// Response body did not match the expected shape
    ParseError,
    /// Request body could not be serialized
    EncodeError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::TransportError => write!(f, "TRANSPORT_ERROR"),
            ErrorCode::HttpStatus => write!(f, "HTTP_STATUS"),
            ErrorCode::ParseError => write!(f, "PARSE_ERROR"),
            ErrorCode::EncodeError => write!(f, "ENCODE_ERROR"),
        }
    }
}

/// Detailed error information for logs and diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Operation failed but the next attempt may succeed
    Warning,
    /// Operation failed
    Error,
    /// Client and server disagree on the contract
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for API calls made by the controllers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("transport failure: {message}")]
    Transport { message: String },

    #[error("HTTP error! status: {status}")]
    Status { status: u16, body: String },

    #[error("invalid response body: {message}")]
    Parse { message: String },

    #[error("could not encode request: {message}")]
    Encode { message: String },
}

impl ClientError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            ClientError::Transport { .. } => ErrorCode::TransportError,
            ClientError::Status { .. } => ErrorCode::HttpStatus,
            ClientError::Parse { .. } => ErrorCode::ParseError,
            ClientError::Encode { .. } => ErrorCode::EncodeError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ClientError::Transport { .. } => ErrorSeverity::Warning,
            ClientError::Status { status, .. } if *status >= 500 => ErrorSeverity::Warning,
            ClientError::Status { .. } => ErrorSeverity::Error,
            ClientError::Parse { .. } => ErrorSeverity::Critical,
            ClientError::Encode { .. } => ErrorSeverity::Critical,
        }
    }

    /// Whether a later identical request could succeed.
    ///
    /// Nothing retries today; this is the hook a retry policy would key on.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport { .. } => true,
            ClientError::Status { status, .. } => *status >= 500 || *status == 429,
            ClientError::Parse { .. } | ClientError::Encode { .. } => false,
        }
    }

    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            ClientError::Transport { .. } => {
                details = details
                    .with_suggestion("Check that the API server is running.".to_string())
                    .with_suggestion(
                        "Verify api.base_url in your configuration.".to_string(),
                    );
            }
            ClientError::Status { status, body } => {
                details = details.with_detail(serde_json::json!({
                    "status": status,
                    "body": body,
                }));
                if *status == 404 {
                    details = details.with_suggestion(
                        "The record may have been deleted; refresh the list.".to_string(),
                    );
                }
            }
            ClientError::Parse { message } => {
                details = details
                    .with_detail(serde_json::json!({ "parse_message": message }))
                    .with_suggestion(
                        "The server response does not match the expected format.".to_string(),
                    );
            }
            ClientError::Encode { .. } => {}
        }

        details
    }
}

/// Result type with ClientError
pub type ClientResult<T> = Result<T, ClientError>;

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        ClientError::Parse {
            message: error.to_string(),
        }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed, e.g. "refresh"
    pub operation: String,
    /// Endpoint path the operation targeted
    pub path: Option<String>,
    /// Request token of the failed call
    pub token: Option<u64>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            path: None,
            token: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_token(mut self, token: u64) -> Self {
        self.token = Some(token);
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    /// Log an error
    fn log_error(&self, error: &ClientError, context: &ErrorContext);
    /// Log debug information
    fn log_debug(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Debug, Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &ClientError, context: &ErrorContext) {
        let details = error.to_details();
        match error.severity() {
            ErrorSeverity::Warning => log::warn!(
                target: "stockdesk::error",
                "[{}] {} - Operation: {} - Path: {:?} - Token: {:?}",
                details.code,
                details.message,
                context.operation,
                context.path,
                context.token
            ),
            ErrorSeverity::Error | ErrorSeverity::Critical => log::error!(
                target: "stockdesk::error",
                "[{}] {} - Operation: {} - Path: {:?} - Token: {:?}",
                details.code,
                details.message,
                context.operation,
                context.path,
                context.token
            ),
        }
    }

    fn log_debug(&self, message: &str, context: &ErrorContext) {
        log::debug!(
            target: "stockdesk::error",
            "DEBUG: {} - Operation: {} - Path: {:?}",
            message,
            context.operation,
            context.path
        );
    }
}

// ==================== Tests ====================
