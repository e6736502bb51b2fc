//! Shared query infrastructure: the [`Query`] trait and the [`Market`] segment.

use std::fmt;
use std::str::FromStr;

use url::Url;

/// Trait implemented by query builders. Provides URL serialization.
pub trait Query {
    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url;
}

/// Market segment a symbol trades on. Decides the `ex_ch` channel prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Market {
    /// Primary exchange listing (TWSE).
    Listed,
    /// Over-the-counter listing (TPEx).
    Otc,
}

impl Market {
    /// Channel prefix the MIS endpoint expects for this segment.
    pub fn prefix(&self) -> &'static str {
        match self {
            Market::Listed => "tse",
            Market::Otc => "otc",
        }
    }

    /// Formats a symbol as an MIS channel, e.g. `tse_2330.tw`.
    pub fn channel(&self, symbol: &str) -> String {
        format!("{}_{}.tw", self.prefix(), symbol)
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for Market {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tse" | "listed" => Ok(Market::Listed),
            "otc" => Ok(Market::Otc),
            _ => Err(()),
        }
    }
}
