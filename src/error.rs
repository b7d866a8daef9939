//! Error types for redmine-scroll
//!
//! This module defines the error hierarchy for the whole crate, from low level
//! body reads up to the fatal endpoint errors that stop a scroll operation.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for redmine-scroll
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Scroll Errors
    // ============================================================================
    /// Reading a response body failed before completion
    #[error("Failed to read response body: {message}")]
    IoRead { message: String },

    /// The response body does not match the expected page shape
    #[error("JSON decode error{}: {message}", status_suffix(.status))]
    JsonDecode {
        message: String,
        status: Option<u16>,
    },

    /// Transport-level failure reaching the server
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport-level failure that did not come from reqwest
    #[error("HTTP request failed: {message}")]
    HttpTransport { message: String },

    /// The endpoint URL cannot be built from the configured base URL
    #[error("Cannot build API endpoint url from '{url}': {message}")]
    ApiEndpointUrl { url: String, message: String },

    /// A page kept failing until the retry budget was spent
    #[error("Page {page} failed {attempts} times in a row, giving up")]
    RetriesExhausted { page: u32, attempts: u32 },

    /// The pagination metadata of a page points back at an already fetched page
    #[error("Pagination did not advance: page {page} points to page {next}")]
    PaginationStalled { page: u32, next: u32 },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[allow(clippy::ref_option)]
fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {code})"),
        None => String::new(),
    }
}

impl Error {
    /// Create a body read error
    pub fn io_read(message: impl Into<String>) -> Self {
        Self::IoRead {
            message: message.into(),
        }
    }

    /// Create a JSON decode error
    pub fn json_decode(message: impl Into<String>) -> Self {
        Self::JsonDecode {
            message: message.into(),
            status: None,
        }
    }

    /// Create a transport error from a message
    pub fn transport(message: impl Into<String>) -> Self {
        Self::HttpTransport {
            message: message.into(),
        }
    }

    /// Create a fatal endpoint url error
    pub fn endpoint_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ApiEndpointUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Attach the HTTP status of the response that produced a decode error
    #[must_use]
    pub fn with_status(self, code: u16) -> Self {
        match self {
            Self::JsonDecode { message, .. } => Self::JsonDecode {
                message,
                status: Some(code),
            },
            other => other,
        }
    }

    /// Check if this error ends a scroll operation
    ///
    /// A malformed endpoint url, an exhausted retry budget and pagination
    /// that stopped advancing are fatal, everything else leads to a retry of
    /// the same page.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ApiEndpointUrl { .. }
                | Error::RetriesExhausted { .. }
                | Error::PaginationStalled { .. }
                | Error::Config { .. }
                | Error::MissingConfigField { .. }
        )
    }

    /// Check if this error is transient in principle
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Http(_) | Error::HttpTransport { .. })
    }

    /// Short machine-friendly name of the error class
    pub fn kind(&self) -> &'static str {
        match self {
            Error::IoRead { .. } => "io_read",
            Error::JsonDecode { .. } => "json_decode",
            Error::Http(_) | Error::HttpTransport { .. } => "http",
            Error::ApiEndpointUrl { .. } => "api_endpoint_url",
            Error::RetriesExhausted { .. } => "retries_exhausted",
            Error::PaginationStalled { .. } => "pagination_stalled",
            Error::Config { .. } | Error::MissingConfigField { .. } => "config",
            Error::YamlParse(_) => "yaml",
            Error::Io(_) => "io",
        }
    }
}

/// Result type alias for redmine-scroll
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("api_token");
        assert_eq!(err.to_string(), "Missing required config field: api_token");

        let err = Error::json_decode("expected value at line 1 column 1");
        assert_eq!(
            err.to_string(),
            "JSON decode error: expected value at line 1 column 1"
        );

        let err = Error::json_decode("EOF while parsing").with_status(404);
        assert_eq!(err.to_string(), "JSON decode error (HTTP 404): EOF while parsing");

        let err = Error::RetriesExhausted {
            page: 3,
            attempts: 5,
        };
        assert_eq!(err.to_string(), "Page 3 failed 5 times in a row, giving up");

        let err = Error::PaginationStalled { page: 2, next: 2 };
        assert_eq!(
            err.to_string(),
            "Pagination did not advance: page 2 points to page 2"
        );
    }

    #[test]
    fn test_with_status_only_touches_decode_errors() {
        let err = Error::io_read("abort read").with_status(500);
        assert!(matches!(err, Error::IoRead { .. }));
    }

    #[test]
    fn test_is_fatal() {
        assert!(Error::endpoint_url("\n", "invalid").is_fatal());
        assert!(Error::RetriesExhausted {
            page: 1,
            attempts: 1
        }
        .is_fatal());
        assert!(Error::PaginationStalled { page: 2, next: 1 }.is_fatal());

        assert!(!Error::json_decode("bad").is_fatal());
        assert!(!Error::io_read("abort").is_fatal());
        assert!(!Error::transport("connection refused").is_fatal());
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::transport("connection refused").is_retryable());

        assert!(!Error::json_decode("bad").is_retryable());
        assert!(!Error::endpoint_url("x", "y").is_retryable());
    }

    #[test]
    fn test_kind() {
        assert_eq!(Error::io_read("x").kind(), "io_read");
        assert_eq!(Error::json_decode("x").kind(), "json_decode");
        assert_eq!(Error::transport("x").kind(), "http");
        assert_eq!(Error::endpoint_url("x", "y").kind(), "api_endpoint_url");
    }
}
