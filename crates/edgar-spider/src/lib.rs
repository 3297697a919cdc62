//! Retrieval library for US stock data; the [SEC]'s full company registry,
//! entity profiles and filing histories, plus historical prices from
//! [Financial Modeling Prep].
//!
//! Every operation is a stateless fetch-and-shape pipeline: it consumes its
//! explicit arguments plus external I/O and returns an ordered [`Table`] of
//! rows. Nothing is cached, retried, or persisted.
//!
//! [SEC]: https://www.sec.gov/search-filings/edgar-application-programming-interfaces
//! [Financial Modeling Prep]: https://site.financialmodelingprep.com/developer/docs
//! [`Table`]: table::Table

pub mod error;
pub mod fmp;
pub mod fs;
pub mod sec;
pub mod table;

/// Shortcut for required API elements.
pub(crate) mod http;

pub use error::{Error, Result};
pub use fmp::{fetch_prices, PriceBar};
pub use sec::filings::{list_filings, FilingRecord};
pub use sec::profiles::{extract_profiles, EntityProfile};
pub use sec::tickers::{list_registry, RegistryEntry};
pub use table::Table;
