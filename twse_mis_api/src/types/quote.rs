use serde::{Deserialize, Serialize};

use crate::Error;

/// Body of a `getStockInfo.jsp` response.
///
/// Only `msgArray` is required. The endpoint also sends query-time and
/// cache bookkeeping fields, which are ignored.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StockInfoResponse {
    #[serde(rename = "msgArray")]
    pub msg_array: Vec<Quote>,

    #[serde(default)]
    pub rtcode: Option<String>,

    #[serde(default)]
    pub rtmessage: Option<String>,
}

impl StockInfoResponse {
    /// Parses a raw response body.
    pub fn from_json(body: &str) -> Result<Self, Error> {
        serde_json::from_str(body).map_err(|e| Error::InvalidResponse(e.to_string()))
    }
}

/// One quote snapshot, as sent by MIS.
///
/// Every value arrives as a string. Prices hold `-` until the first trade
/// of the session, so nothing is converted at this layer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Quote {
    /// Ticker symbol.
    #[serde(rename = "c")]
    pub symbol: String,

    /// Company short name.
    #[serde(rename = "n")]
    pub short_name: String,

    /// Last traded price, or `-` before the open.
    #[serde(rename = "z")]
    pub last_price: String,

    /// Volume of the last trade.
    #[serde(rename = "tv")]
    pub volume: String,

    /// Cumulative volume for the session.
    #[serde(rename = "v")]
    pub cumulative_volume: String,

    #[serde(rename = "o")]
    pub open: String,

    #[serde(rename = "h")]
    pub high: String,

    #[serde(rename = "l")]
    pub low: String,

    /// Previous session's close.
    #[serde(rename = "y")]
    pub previous_close: String,

    /// Update time in milliseconds since the UTC epoch.
    #[serde(rename = "tlong")]
    pub update_epoch_ms: String,
}
