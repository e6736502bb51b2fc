//! Error types for publishing.

use thiserror::Error;

/// Errors from an upload session.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Failed to connect to {addr}: {reason}")]
    Connect { addr: String, reason: String },
    #[error("Login rejected for user {user}: {reason}")]
    Login { user: String, reason: String },
    #[error("Transfer to {remote_path} failed: {reason}")]
    Transfer { remote_path: String, reason: String },
    #[error("Failed to read local file")]
    Io(#[from] std::io::Error),
    #[error("Upload task failed: {0}")]
    Task(String),
}
