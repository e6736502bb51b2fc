//! Turns raw MIS quotes into display-ready report rows.
//!
//! Each [`Quote`] becomes one [`ReportRow`] with a derived percent change
//! and a local update time. Row order always follows quote order, which in
//! turn follows the order of the symbols in the request.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Serialize, Serializer};
use thiserror::Error;
use twse_mis_api::types::{Quote, StockInfoResponse};

/// Shown in place of a price or percent that cannot be computed.
pub const PLACEHOLDER: &str = "-";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Display labels, in column order.
pub const COLUMN_LABELS: [&str; 11] = [
    "股票代號",
    "公司簡稱",
    "成交價",
    "成交量",
    "累積成交量",
    "開盤價",
    "最高價",
    "最低價",
    "昨收價",
    "漲跌百分比",
    "資料更新時間",
];

/// Error types for the report transform.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Payload is not a valid quote response: {0}")]
    Payload(#[from] twse_mis_api::Error),
    #[error("{symbol}: field '{field}' is not a number: '{value}'")]
    InvalidNumber {
        symbol: String,
        field: &'static str,
        value: String,
    },
    #[error("{symbol}: invalid update timestamp '{value}'")]
    InvalidTimestamp { symbol: String, value: String },
}

/// Percent change against the previous close.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PercentChange {
    Value(f64),
    /// No trade yet, no previous close, or a change of exactly -100%.
    Unavailable,
}

impl fmt::Display for PercentChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentChange::Value(v) => write!(f, "{:.2}", v),
            PercentChange::Unavailable => f.write_str(PLACEHOLDER),
        }
    }
}

impl Serialize for PercentChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PercentChange::Value(v) => serializer.serialize_f64(*v),
            PercentChange::Unavailable => serializer.serialize_none(),
        }
    }
}

/// One rendered line of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub symbol: String,
    pub short_name: String,
    /// Last price as sent by the API, or [`PLACEHOLDER`] before the first trade.
    pub price: String,
    pub volume: String,
    pub cumulative_volume: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub previous_close: String,
    pub percent_change: PercentChange,
    /// Update time in the exchange's local time, `YYYY-MM-DD HH:MM:SS`.
    pub updated_at: String,
}

impl ReportRow {
    /// Cell values in [`COLUMN_LABELS`] order.
    pub fn cells(&self) -> [String; 11] {
        [
            self.symbol.clone(),
            self.short_name.clone(),
            self.price.clone(),
            self.volume.clone(),
            self.cumulative_volume.clone(),
            self.open.clone(),
            self.high.clone(),
            self.low.clone(),
            self.previous_close.clone(),
            self.percent_change.to_string(),
            self.updated_at.clone(),
        ]
    }
}

/// Result of the percent-change step for one quote.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceChange {
    pub price: String,
    pub previous_close: String,
    pub percent: PercentChange,
}

/// Computes `(price - prev) / prev * 100`.
///
/// A price that is not a number (MIS sends `-` until the first trade)
/// counts as 0.0 and is displayed as [`PLACEHOLDER`]. The previous close
/// must parse. A zero previous close, a result of exactly -100, or a result
/// too large to represent yields [`PercentChange::Unavailable`].
pub fn percent_change(
    symbol: &str,
    price: &str,
    previous_close: &str,
) -> Result<PriceChange, ReportError> {
    let last = parse_number(price).unwrap_or(0.0);
    let prev = parse_number(previous_close).ok_or_else(|| ReportError::InvalidNumber {
        symbol: symbol.to_string(),
        field: "previous_close",
        value: previous_close.to_string(),
    })?;

    let percent = if prev == 0.0 {
        PercentChange::Unavailable
    } else {
        let result = (last - prev) / prev * 100.0;
        if !result.is_finite() || result == -100.0 {
            PercentChange::Unavailable
        } else {
            PercentChange::Value(result)
        }
    };

    let price = if last == 0.0 {
        PLACEHOLDER.to_string()
    } else {
        price.trim().to_string()
    };

    Ok(PriceChange {
        price,
        previous_close: previous_close.trim().to_string(),
        percent,
    })
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Formats an epoch-millisecond timestamp at a fixed offset.
///
/// Sub-second precision is dropped. Returns `None` when the value is not
/// an integer or lies outside the representable range.
pub fn format_update_time(epoch_ms: &str, offset: FixedOffset) -> Option<String> {
    let ms = epoch_ms.trim().parse::<i64>().ok()?;
    let utc = DateTime::from_timestamp_millis(ms)?;
    Some(utc.with_timezone(&offset).format(TIME_FORMAT).to_string())
}

/// Parses a raw response body into quotes, keeping API order.
pub fn parse_payload(body: &str) -> Result<Vec<Quote>, ReportError> {
    Ok(StockInfoResponse::from_json(body)?.msg_array)
}

/// Builds one row per quote, in input order.
pub fn build_row(quote: &Quote, offset: FixedOffset) -> Result<ReportRow, ReportError> {
    let change = percent_change(&quote.symbol, &quote.last_price, &quote.previous_close)?;
    let updated_at = format_update_time(&quote.update_epoch_ms, offset).ok_or_else(|| {
        ReportError::InvalidTimestamp {
            symbol: quote.symbol.clone(),
            value: quote.update_epoch_ms.clone(),
        }
    })?;

    Ok(ReportRow {
        symbol: quote.symbol.clone(),
        short_name: quote.short_name.clone(),
        price: change.price,
        volume: quote.volume.clone(),
        cumulative_volume: quote.cumulative_volume.clone(),
        open: quote.open.clone(),
        high: quote.high.clone(),
        low: quote.low.clone(),
        previous_close: change.previous_close,
        percent_change: change.percent,
        updated_at,
    })
}

/// Builds the full report. Fails on the first quote that cannot be converted.
pub fn build_report(quotes: &[Quote], offset: FixedOffset) -> Result<Vec<ReportRow>, ReportError> {
    quotes.iter().map(|q| build_row(q, offset)).collect()
}
