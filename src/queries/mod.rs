//! Query modules for the yardstock SDK.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection) and exposes methods
//! returning `Result<T>` with typed model payloads.
//!
//! Time windows are resolved here in Rust (via [`chrono`]) and passed to
//! DuckDB as bound parameters, so queries are deterministic under an
//! explicit `as_of` anchor and tests never depend on the wall clock.

use chrono::{Months, NaiveDate, Utc};

pub mod needs;
pub mod offers;
pub mod prices;
pub mod search;
pub mod stock;

pub use needs::{NeedParams, NeedQuery};
pub use offers::OfferQuery;
pub use prices::{MoverParams, PriceQuery};
pub use search::SearchQuery;
pub use stock::{StockQuery, StockSearchParams};

// ---------------------------------------------------------------------------
// Window helpers
// ---------------------------------------------------------------------------

/// Resolve the anchor date for window arithmetic: the caller's `as_of` if
/// given, today (UTC) otherwise.
pub(crate) fn resolve_anchor(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| Utc::now().date_naive())
}

/// The first day of a window `months` calendar months before `anchor`.
/// Saturates at the minimum representable date instead of overflowing.
pub(crate) fn months_before(anchor: NaiveDate, months: u32) -> NaiveDate {
    anchor
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// Format a date as a SQL-bindable `YYYY-MM-DD` parameter.
pub(crate) fn date_param(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
