//! Library layer for stockpage: configuration, the quote report transformer,
//! the HTML page writer and the FTP publisher.
//!
//! Wraps the `twse_mis_api` crate and composes the steps into a single
//! sequential [`pipeline::run`].

pub mod config;
pub mod error;
pub mod page;
pub mod pipeline;
pub mod publish;
pub mod report;

pub use twse_mis_api;
pub use twse_mis_api::types;
pub use twse_mis_api::{Client, Market, StockQuery};

pub use config::{AppConfig, ConfigError, PublishConfig};
pub use error::StockPageError;
pub use pipeline::RunSummary;
pub use publish::{FtpUploader, PublishError, Uploader};
pub use report::{PercentChange, ReportError, ReportRow};
