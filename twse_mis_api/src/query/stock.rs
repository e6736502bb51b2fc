//! Query builder for the `getStockInfo.jsp` endpoint.

use url::Url;

use super::common::{Market, Query};

/// Builds the `ex_ch` channel list for a quote request.
///
/// Listed symbols always come first, followed by OTC symbols. Within each
/// segment symbols keep the order they were added in, and the endpoint
/// returns quotes in that same order. Symbols are not validated: a
/// malformed code simply yields an empty or garbage row from the API.
#[derive(Clone, Debug, Default)]
pub struct StockQuery {
    listed: Vec<String>,
    otc: Vec<String>,
}

impl StockQuery {
    /// Adds symbols traded on the primary exchange.
    pub fn with_listed<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.listed.extend(symbols.into_iter().map(Into::into));
        self
    }

    /// Adds symbols traded over the counter.
    pub fn with_otc<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.otc.extend(symbols.into_iter().map(Into::into));
        self
    }

    /// Adds a single symbol to the given segment.
    pub fn with_symbol(mut self, market: Market, symbol: &str) -> Self {
        match market {
            Market::Listed => self.listed.push(symbol.to_string()),
            Market::Otc => self.otc.push(symbol.to_string()),
        }
        self
    }

    /// Number of symbols in the query.
    pub fn len(&self) -> usize {
        self.listed.len() + self.otc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `|`-joined channel string, e.g. `tse_0050.tw|otc_6547.tw`.
    pub fn ex_ch(&self) -> String {
        let listed = self.listed.iter().map(|s| Market::Listed.channel(s));
        let otc = self.otc.iter().map(|s| Market::Otc.channel(s));
        listed.chain(otc).collect::<Vec<_>>().join("|")
    }
}

impl Query for StockQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut().append_pair("ex_ch", &self.ex_ch());
        url
    }
}
