//! The end-to-end run: fetch, transform, write, publish.
//!
//! Steps run strictly one after another. Any failure aborts the run;
//! in particular a failed fetch returns before the output file is touched.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use twse_mis_api::Client;

use crate::config::AppConfig;
use crate::error::StockPageError;
use crate::page;
use crate::publish::{PublishError, Uploader};
use crate::report::{self, ReportRow};

/// What a completed run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub rows: usize,
    pub output_path: PathBuf,
    pub bytes_written: u64,
    /// Bytes uploaded, or `None` when publishing was skipped.
    pub uploaded_bytes: Option<u64>,
}

/// Fetches quotes for the configured watchlist and builds report rows.
pub async fn fetch_report(
    config: &AppConfig,
    client: &Client,
) -> Result<Vec<ReportRow>, StockPageError> {
    let offset = config.utc_offset()?;
    let query = config.query();
    tracing::debug!("Requesting ex_ch={}", query.ex_ch());
    tracing::info!("Fetching quotes for {} symbols", query.len());

    let body = client.fetch_raw(&query).await?;
    tracing::debug!("Response body: {}", body);

    let quotes = report::parse_payload(&body)?;
    let rows = report::build_report(&quotes, offset)?;
    tracing::info!("Built {} report rows", rows.len());
    Ok(rows)
}

/// Renders the report and writes it to `path`, replacing any existing file.
pub async fn write_report(
    title: &str,
    rows: &[ReportRow],
    path: &Path,
) -> Result<u64, StockPageError> {
    let html = page::render_report(title, rows);
    let path = path.to_path_buf();
    let bytes = tokio::task::spawn_blocking(move || page::write_page(&path, &html))
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))??;
    Ok(bytes)
}

/// Uploads the written page.
pub async fn publish<U: Uploader>(uploader: Arc<U>, path: &Path) -> Result<u64, StockPageError> {
    let path = path.to_path_buf();
    let bytes = tokio::task::spawn_blocking(move || uploader.upload(&path))
        .await
        .map_err(|e| PublishError::Task(e.to_string()))??;
    Ok(bytes)
}

/// Fetches, renders and writes the page without uploading it.
pub async fn run_without_publish(
    config: &AppConfig,
    client: &Client,
) -> Result<RunSummary, StockPageError> {
    let rows = fetch_report(config, client).await?;

    let output_path = config.output_path.clone();
    let bytes_written = write_report(&config.page_title, &rows, &output_path).await?;
    tracing::info!("Wrote {} bytes to {}", bytes_written, output_path.display());

    Ok(RunSummary {
        rows: rows.len(),
        output_path,
        bytes_written,
        uploaded_bytes: None,
    })
}

/// Runs the whole pipeline, uploading the written page last.
pub async fn run<U: Uploader>(
    config: &AppConfig,
    client: &Client,
    uploader: Arc<U>,
) -> Result<RunSummary, StockPageError> {
    let mut summary = run_without_publish(config, client).await?;
    summary.uploaded_bytes = Some(publish(uploader, &summary.output_path).await?);
    Ok(summary)
}
