#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("Invalid media server URL: {0}")]
    InvalidServerUrl(#[from] url::ParseError),

    #[error("Media server URL cannot carry a path: {0}")]
    NotABaseUrl(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),

    #[error("Image host returned an empty response")]
    EmptyUpload,

    #[error("Image host rejected the upload: {0}")]
    UploadRejected(String),
}

impl From<ThumbnailError> for String {
    fn from(e: ThumbnailError) -> Self {
        e.to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PresenceError {
    #[error("Presence service not available: {0}")]
    Unavailable(String),

    #[error("Presence handshake failed: {0}")]
    Handshake(String),

    #[error("Presence handshake timed out")]
    HandshakeTimeout,

    #[error("Failed to update activity: {0}")]
    Activity(String),
}

impl From<PresenceError> for String {
    fn from(e: PresenceError) -> Self {
        e.to_string()
    }
}
