use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectionError {
    // The raw URL is never echoed back; it may carry credentials.
    #[error("Invalid connection URL: {reason}")]
    InvalidUrl { reason: String },

    #[error("Unsupported connection URL scheme '{scheme}': expected postgres or postgresql")]
    UnsupportedScheme { scheme: String },
}
