//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// Field-level parse failures are deliberately NOT errors: the normalizers
/// in [`crate::parse`] return `Option` sentinels because an unparseable row
/// is an expected per-row outcome of a bank export, not an exceptional
/// condition. This type covers everything else: collaborator rejections,
/// bad configuration, invalid session state.
#[derive(Error, Debug)]
pub enum Error {
    /// The remote backend rejected a call (category/transaction/tenant service)
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::backend("connection refused");
        assert_eq!(err.to_string(), "Backend error: connection refused");

        let err = Error::validation("bad mapping");
        assert!(err.to_string().contains("Validation error"));
    }
}
