//! Publishing the rendered page to a remote host.
//!
//! [`Uploader`] is the seam the pipeline talks to; [`FtpUploader`] is the
//! production implementation. Uploads are blocking and run on tokio's
//! blocking pool.

pub mod error;
pub mod ftp;

use std::path::Path;

pub use error::PublishError;
pub use ftp::FtpUploader;

/// Sends a local file to its remote destination.
pub trait Uploader: Send + Sync + 'static {
    /// Uploads `local`, returning the number of bytes transferred.
    fn upload(&self, local: &Path) -> Result<u64, PublishError>;
}
