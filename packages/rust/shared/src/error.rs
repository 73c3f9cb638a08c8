//! Error types for Showtime.
//!
//! Library crates use [`ShowtimeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Showtime operations.
#[derive(Debug, thiserror::Error)]
pub enum ShowtimeError {
    /// A required document node was not found.
    #[error("element not found: {selector}")]
    ElementNotFound { selector: String },

    /// A schema selector could not be compiled.
    #[error("invalid selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },

    /// Raw date/time text did not match the configured pattern.
    #[error("cannot convert {value:?} with pattern {pattern:?}: {message}")]
    Conversion {
        value: String,
        pattern: String,
        message: String,
    },

    /// A showing or listing was recorded without its required parts.
    #[error("incomplete record: {message}")]
    IncompleteRecord { message: String },

    /// Schema file parsing or validation error.
    #[error("schema error: {message}")]
    Schema { message: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while loading a page or poster.
    #[error("network error: {0}")]
    Network(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Output serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ShowtimeError>;

impl ShowtimeError {
    /// Create a not-found error for the given selector description.
    pub fn not_found(selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a schema error from any displayable message.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema {
            message: msg.into(),
        }
    }

    /// Create an incomplete-record error from any displayable message.
    pub fn incomplete(msg: impl Into<String>) -> Self {
        Self::IncompleteRecord {
            message: msg.into(),
        }
    }

    /// Create a conversion error for `value` parsed with `pattern`.
    pub fn conversion(
        value: impl Into<String>,
        pattern: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Conversion {
            value: value.into(),
            pattern: pattern.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means "the element is absent" (recoverable for optional nodes).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = ShowtimeError::config("no sites configured");
        assert_eq!(err.to_string(), "config error: no sites configured");

        let err = ShowtimeError::conversion("25:99", "%H:%M", "input is out of range");
        assert!(err.to_string().contains("\"25:99\""));
        assert!(err.to_string().contains("%H:%M"));
    }

    #[test]
    fn only_element_not_found_is_recoverable() {
        assert!(ShowtimeError::not_found("class_name=film").is_not_found());
        assert!(!ShowtimeError::incomplete("no showings").is_not_found());
        assert!(!ShowtimeError::schema("bad").is_not_found());
    }
}
