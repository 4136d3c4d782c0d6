//! Error types for gallery API calls.
//!
//! The controller maps these onto user-facing notifications: only a
//! [`Error::Status`] carrying a server `detail` is shown verbatim, every other
//! failure becomes a generic localized message.

/// Result type for gallery API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while talking to the gallery server.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The request never produced a response (DNS, connect, reset, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server returned {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },

    /// The response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The configured base URL or a record id could not form a URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The selected upload file could not be turned into a request part.
    #[error("invalid file '{name}': {reason}")]
    InvalidFile { name: String, reason: String },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

impl Error {
    /// Create a status error without a server detail.
    pub fn status(status: u16) -> Self {
        Self::Status {
            status,
            detail: None,
        }
    }

    /// Create a status error carrying the server's `detail` message.
    pub fn status_with_detail(status: u16, detail: impl Into<String>) -> Self {
        Self::Status {
            status,
            detail: Some(detail.into()),
        }
    }

    /// Create a decode error.
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode(reason.into())
    }

    /// Create an invalid file error.
    pub fn invalid_file(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFile {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// The server-provided detail message, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of a server-reported failure.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the server reported the record as missing.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}
