//! Error types for the library layer.

use std::fmt;

use crate::config::ConfigError;
use crate::publish::PublishError;
use crate::report::ReportError;

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding transform, file-system and upload failures.
#[derive(Debug)]
pub enum StockPageError {
    /// An error from the underlying API client.
    Api(twse_mis_api::Error),
    /// The configuration could not be loaded or is incomplete.
    Config(ConfigError),
    /// The payload could not be turned into report rows.
    Report(ReportError),
    /// Writing the page to disk failed.
    Io(std::io::Error),
    /// Uploading the page failed.
    Publish(PublishError),
}

impl fmt::Display for StockPageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Config(e) => write!(f, "Config error: {}", e),
            Self::Report(e) => write!(f, "Report error: {}", e),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Publish(e) => write!(f, "Publish error: {}", e),
        }
    }
}

impl std::error::Error for StockPageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Report(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Publish(e) => Some(e),
        }
    }
}

impl From<twse_mis_api::Error> for StockPageError {
    fn from(e: twse_mis_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<ConfigError> for StockPageError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ReportError> for StockPageError {
    fn from(e: ReportError) -> Self {
        Self::Report(e)
    }
}

impl From<std::io::Error> for StockPageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<PublishError> for StockPageError {
    fn from(e: PublishError) -> Self {
        Self::Publish(e)
    }
}
