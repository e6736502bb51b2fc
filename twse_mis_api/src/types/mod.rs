mod quote;
pub use self::quote::{Quote, StockInfoResponse};
