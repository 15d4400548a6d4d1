//! Error types for agent-dispatch
//!
//! Per-tool failures are not errors: they come back as a failed
//! `ExecutionResult`. Only registry, configuration and usage problems
//! surface through `DispatchError`.

use thiserror::Error;

/// Main error type for the dispatcher
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Dispatch state machine transition errors
    #[error("Invalid dispatch transition from {from} on {event}")]
    InvalidTransition { from: String, event: String },

    /// Registry file could not be read or written
    #[error("Registry I/O error: {0}")]
    RegistryIo(#[from] std::io::Error),

    /// Registry file is not valid JSON for the expected layout
    #[error("Registry format error: {0}")]
    RegistryFormat(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Lookup of a tool name that is not registered
    #[error("Tool not found: {0}")]
    UnknownTool(String),

    /// A tool with the same (case-insensitive) name already exists
    #[error("A tool named '{0}' already exists")]
    DuplicateTool(String),

    /// Tool definition failed validation
    #[error("Invalid tool definition: {0}")]
    InvalidTool(String),

    /// Command template could not be turned into a process invocation
    #[error("Invalid command template '{template}': {reason}")]
    Template { template: String, reason: String },

    /// Generic errors with context
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for dispatcher operations
pub type Result<T> = std::result::Result<T, DispatchError>;

impl From<anyhow::Error> for DispatchError {
    fn from(err: anyhow::Error) -> Self {
        DispatchError::Generic(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DispatchError::UnknownTool("gemini".to_string());
        assert_eq!(err.to_string(), "Tool not found: gemini");
    }

    #[test]
    fn test_template_error() {
        let err = DispatchError::Template {
            template: "claude -p \"".to_string(),
            reason: "unbalanced quotes".to_string(),
        };
        assert!(err.to_string().contains("claude -p"));
        assert!(err.to_string().contains("unbalanced quotes"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DispatchError = io.into();
        assert!(matches!(err, DispatchError::RegistryIo(_)));
    }
}
