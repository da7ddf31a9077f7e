//! Error types for the Hiroba client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the credentials or the token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Login failed for a reason other than the credentials
    #[error("Login error: {0}")]
    Login(String),

    /// The server URL cannot be used
    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),

    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),
}
