//! HTTP client for the TWSE Market Information System (MIS) quote API.

use std::time::Duration;

use url::Url;

use crate::{
    query::{Query, StockQuery},
    types::StockInfoResponse,
    Error,
};

const STOCK_INFO_PATH: &str = "/stock/api/getStockInfo.jsp";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("stockpage/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the MIS quote endpoint.
///
/// Each request builds a fresh `reqwest::Client`. Requests are never retried.
pub struct Client {
    /// Base URL for the API. Defaults to `https://mis.twse.com.tw`.
    base_api_url: String,
    timeout: Duration,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the production MIS host.
    pub fn new() -> Self {
        Self::with_base_url("https://mis.twse.com.tw")
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn get_url(&self, path: &str, query: &impl Query) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })?;
        Ok(query.add_to_url(&url))
    }

    /// Performs the GET and returns the body as text.
    ///
    /// Any non-success status is an error; the body is not inspected.
    pub async fn fetch_raw(&self, query: &StockQuery) -> Result<String, Error> {
        let url = self.get_url(STOCK_INFO_PATH, query)?;
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        let resp = client
            .get(url)
            .header("accept", "application/json, text/plain, */*")
            .header("referer", "https://mis.twse.com.tw/stock/index.jsp")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get quotes: {}", e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(body)
    }

    /// Fetches and parses quotes for every symbol in the query.
    pub async fn get_stock_info(&self, query: &StockQuery) -> Result<StockInfoResponse, Error> {
        let body = self.fetch_raw(query).await?;
        StockInfoResponse::from_json(&body).map_err(|e| {
            tracing::error!("Failed to parse quotes: {} | body: {}", e, truncate_body(&body));
            e
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    match body.char_indices().nth(MAX) {
        None => body.to_string(),
        Some((idx, _)) => format!("{}...[truncated]", &body[..idx]),
    }
}
