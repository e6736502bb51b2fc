mod common;
pub use self::common::{Market, Query};

mod stock;
pub use self::stock::StockQuery;
