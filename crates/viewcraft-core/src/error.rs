//! Core error types for viewcraft.
//!
//! [`ViewcraftError`] covers configuration mistakes made when a view is
//! declared, failures raised while components run, and the handful of
//! request errors that must reach the client (an out-of-range page, for
//! example). Search input problems are deliberately absent: a malformed or
//! stale search token degrades to "no search" and never becomes an error.

use thiserror::Error;

/// The primary error type for viewcraft.
///
/// Each variant maps to an HTTP status code via [`ViewcraftError::status_code`].
#[derive(Error, Debug)]
pub enum ViewcraftError {
    // ── Components ───────────────────────────────────────────────────

    /// A component failed to build or run.
    #[error("Component error: {0}")]
    Component(String),

    /// A hook raised while the hook chain was running.
    #[error("Hook error: {0}")]
    Hook(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The search component was declared with an invalid field set.
    #[error("Search configuration error: {0}")]
    SearchConfig(String),

    // ── Search ───────────────────────────────────────────────────────

    /// A search state could not be encoded into a URL.
    #[error("Search encoding error: {0}")]
    SearchEncoding(String),

    // ── Requests ─────────────────────────────────────────────────────

    /// The requested page does not exist or is not a positive integer.
    #[error("Invalid page: {0}")]
    InvalidPage(String),

    /// HTTP 400 Bad Request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// HTTP 404 Not Found.
    #[error("Not found: {0}")]
    NotFound(String),

    // ── Serialization / IO ───────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ViewcraftError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `BadRequest` -> 400
    /// - `NotFound`, `InvalidPage` -> 404
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::NotFound(_) | Self::InvalidPage(_) => 404,
            Self::Component(_)
            | Self::Hook(_)
            | Self::Configuration(_)
            | Self::SearchConfig(_)
            | Self::SearchEncoding(_)
            | Self::Serialization(_)
            | Self::Io(_) => 500,
        }
    }

    /// Returns `true` for errors caused by how a view was declared rather
    /// than by the request being served.
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::SearchConfig(_))
    }
}

impl From<serde_json::Error> for ViewcraftError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// A convenience type alias for `Result<T, ViewcraftError>`.
pub type ViewcraftResult<T> = Result<T, ViewcraftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ViewcraftError::BadRequest("x".into()).status_code(), 400);
        assert_eq!(ViewcraftError::NotFound("x".into()).status_code(), 404);
        assert_eq!(ViewcraftError::InvalidPage("x".into()).status_code(), 404);
        assert_eq!(ViewcraftError::Component("x".into()).status_code(), 500);
        assert_eq!(ViewcraftError::Hook("x".into()).status_code(), 500);
        assert_eq!(ViewcraftError::Configuration("x".into()).status_code(), 500);
        assert_eq!(ViewcraftError::SearchConfig("x".into()).status_code(), 500);
        assert_eq!(ViewcraftError::SearchEncoding("x".into()).status_code(), 500);
    }

    #[test]
    fn test_display() {
        let err = ViewcraftError::InvalidPage("Page 9 does not exist".into());
        assert_eq!(err.to_string(), "Invalid page: Page 9 does not exist");
    }

    #[test]
    fn test_is_configuration() {
        assert!(ViewcraftError::Configuration("x".into()).is_configuration());
        assert!(ViewcraftError::SearchConfig("x".into()).is_configuration());
        assert!(!ViewcraftError::InvalidPage("x".into()).is_configuration());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: ViewcraftError = io_err.into();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn test_serde_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ViewcraftError = json_err.into();
        assert!(matches!(err, ViewcraftError::Serialization(_)));
    }
}
