//! Typed errors for URL operations.
//!
//! Every variant carries the offending source URL so callers can report which
//! download failed without threading extra context themselves.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UrlOperationsError {
    /// The URL scheme is not registered to this handler. Fatal, never retried.
    #[error("URL scheme {scheme:?} is not supported by this handler (url: {url})")]
    SchemeMismatch { url: String, scheme: String },

    /// Non-200 from one of the API calls, with the server's detail when the
    /// body carried a JSON `message` field.
    #[error("authentication failed for {url} (HTTP {status}): {message}")]
    Authentication {
        url: String,
        status: u32,
        message: String,
    },

    /// The server violated the expected response shape: unparseable share
    /// link, archive with zero/multiple members, non-file archive member.
    /// Non-retryable; indicates a contract violation, not a transient fault.
    #[error("remote protocol error for {url}: {message}")]
    RemoteProtocol { url: String, message: String },

    /// Byte transfer to or from disk failed (curl error, non-2xx on the
    /// anonymous download link, or an I/O failure mid-copy).
    #[error("transfer failed for {url}: {cause:#}")]
    Transfer { url: String, cause: anyhow::Error },

    /// No usable credential for the dataset (store empty and no environment
    /// override).
    #[error("no credential available for {url}: {message}")]
    MissingCredential { url: String, message: String },
}

impl UrlOperationsError {
    /// The source URL the failed operation was invoked with.
    pub fn url(&self) -> &str {
        match self {
            UrlOperationsError::SchemeMismatch { url, .. }
            | UrlOperationsError::Authentication { url, .. }
            | UrlOperationsError::RemoteProtocol { url, .. }
            | UrlOperationsError::Transfer { url, .. }
            | UrlOperationsError::MissingCredential { url, .. } => url,
        }
    }

    /// HTTP status carried by authentication failures, if any.
    pub fn status_code(&self) -> Option<u32> {
        match self {
            UrlOperationsError::Authentication { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, UrlOperationsError>;
