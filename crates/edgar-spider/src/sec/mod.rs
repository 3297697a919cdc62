//! US stock information from the [SEC]; the registered-company index, entity
//! profiles, and filings metadata.
//!
//! [SEC]: https://www.sec.gov/search-filings/edgar-application-programming-interfaces

pub(crate) mod common;

/// The full list of entities registered with the SEC; all tickers, titles
/// and CIK identifiers.
pub mod tickers;

/// One profile row per registered entity, shaped from locally stored EDGAR
/// submission documents.
pub mod profiles;

/// Complete filing histories per entity; the "recent" page reconciled with
/// any overflow shard files.
pub mod filings;
