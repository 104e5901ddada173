//! Yardstock SDK for Rust.
//!
//! Provides a high-level client for auto-parts recycling demand data: which
//! motor codes sold recently, how urgently they need restocking, whose
//! prices are moving and what to pay for incoming lots. Snapshot data is
//! downloaded as parquet files, cached locally and queried in-process via
//! DuckDB; submitted offers persist in a local database file.
//!
//! # Quick start
//!
//! ```no_run
//! use yardstock_sdk::{NeedParams, YardstockSdk};
//!
//! let sdk = YardstockSdk::builder().build().unwrap();
//!
//! // Ranked needs (sales vs. stock, most urgent first)
//! let needs = sdk.ranked_needs(&NeedParams::default()).unwrap();
//!
//! // Fuzzy search understands breaker shorthand: "reno dci" finds RENAULT DIESEL
//! let hits = sdk.search().search("reno dci", &NeedParams::default()).unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod config;
pub mod connection;
pub mod error;
pub mod matching;
pub mod models;
pub mod pricing;
pub mod queries;
pub mod sql_builder;

#[cfg(feature = "async")]
pub use async_client::AsyncYardstockSdk;
pub use cache::{SnapshotStore, TtlCache};
pub use connection::Connection;
pub use error::{Result, YardstockError};
pub use models::{MatchCandidate, PartNeed, PriceKind, PriceMover, UrgencyTier};
pub use queries::{MoverParams, NeedParams, StockSearchParams};
pub use sql_builder::SqlBuilder;

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

// ---------------------------------------------------------------------------
// YardstockSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`YardstockSdk`] instance.
///
/// Use [`YardstockSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](YardstockSdkBuilder::build) to create the SDK.
pub struct YardstockSdkBuilder {
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    snapshot_url: Option<String>,
    aggregate_ttl: Duration,
}

impl Default for YardstockSdkBuilder {
    fn default() -> Self {
        Self {
            cache_dir: None,
            offline: false,
            timeout: Duration::from_secs(120),
            snapshot_url: None,
            aggregate_ttl: Duration::from_secs(config::DEFAULT_AGGREGATE_TTL_SECS),
        }
    }
}

impl YardstockSdkBuilder {
    /// Set a custom cache directory.
    ///
    /// If not set, the platform-appropriate default cache directory is used
    /// (e.g. `~/.cache/yardstock-sdk` on Linux). The local database file
    /// lives in the same directory.
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    ///
    /// When offline, the SDK never downloads snapshots and only uses
    /// previously cached data files. Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout for snapshot downloads.
    ///
    /// Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point the SDK at a different snapshot bucket (e.g. a self-hosted
    /// export). Defaults to the public bucket.
    pub fn snapshot_url<S: Into<String>>(mut self, url: S) -> Self {
        self.snapshot_url = Some(url.into());
        self
    }

    /// Set how long cached aggregate results (ranked needs, price movers)
    /// stay valid. Defaults to 300 seconds; zero disables reuse entirely.
    pub fn aggregate_ttl(mut self, ttl: Duration) -> Self {
        self.aggregate_ttl = ttl;
        self
    }

    /// Build the SDK, initializing the snapshot store and DuckDB database.
    ///
    /// This may trigger a staleness check against the bucket (unless offline
    /// mode is enabled) but does **not** download any data files eagerly --
    /// they are fetched lazily on first query.
    pub fn build(self) -> Result<YardstockSdk> {
        let store = SnapshotStore::new(
            self.cache_dir,
            self.offline,
            self.timeout,
            self.snapshot_url,
        )?;
        let conn = Connection::new(store)?;
        Ok(YardstockSdk {
            conn,
            need_cache: TtlCache::new(self.aggregate_ttl),
            mover_cache: TtlCache::new(self.aggregate_ttl),
        })
    }
}

// ---------------------------------------------------------------------------
// YardstockSdk
// ---------------------------------------------------------------------------

/// The main entry point for the yardstock SDK.
///
/// Wraps a [`Connection`] (which owns the [`SnapshotStore`] and the DuckDB
/// database) and exposes domain-specific query interfaces as lightweight
/// borrowing wrappers. The two heaviest aggregates, ranked needs and price
/// movers, are additionally memoized behind a TTL cache.
///
/// Created via [`YardstockSdk::builder()`].
pub struct YardstockSdk {
    conn: Connection,
    need_cache: TtlCache<NeedParams, Vec<PartNeed>>,
    mover_cache: TtlCache<MoverParams, Vec<PriceMover>>,
}

impl YardstockSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> YardstockSdkBuilder {
        YardstockSdkBuilder::default()
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the need aggregation interface.
    ///
    /// Returns a lightweight wrapper that borrows from the underlying
    /// connection. Calls through this accessor always hit DuckDB; use
    /// [`ranked_needs`](Self::ranked_needs) for the memoized path.
    pub fn needs(&self) -> queries::needs::NeedQuery<'_> {
        queries::needs::NeedQuery::new(&self.conn)
    }

    /// Access the free-text and plate search interface.
    pub fn search(&self) -> queries::search::SearchQuery<'_> {
        queries::search::SearchQuery::new(&self.conn)
    }

    /// Access the price trend interface.
    pub fn prices(&self) -> queries::prices::PriceQuery<'_> {
        queries::prices::PriceQuery::new(&self.conn)
    }

    /// Access the inventory interface.
    pub fn stock(&self) -> queries::stock::StockQuery<'_> {
        queries::stock::StockQuery::new(&self.conn)
    }

    /// Access the breaker/offer interface.
    ///
    /// Offers are written to the local database file and survive snapshot
    /// refreshes.
    pub fn offers(&self) -> queries::offers::OfferQuery<'_> {
        queries::offers::OfferQuery::new(&self.conn)
    }

    // -- Memoized aggregates -----------------------------------------------

    /// Ranked needs list, served from the TTL cache when an identical
    /// request was computed recently.
    pub fn ranked_needs(&self, params: &NeedParams) -> Result<Vec<PartNeed>> {
        if let Some(hit) = self.need_cache.get(params) {
            debug!(?params, "ranked needs served from cache");
            return Ok(hit);
        }
        let needs = self.needs().compute(params)?;
        self.need_cache.put(*params, needs.clone());
        Ok(needs)
    }

    /// Price movers, served from the TTL cache when an identical request
    /// was computed recently.
    pub fn price_movers(&self, params: &MoverParams) -> Result<Vec<PriceMover>> {
        if let Some(hit) = self.mover_cache.get(params) {
            debug!(?params, "price movers served from cache");
            return Ok(hit);
        }
        let movers = self.prices().movers(params)?;
        self.mover_cache.put(*params, movers.clone());
        Ok(movers)
    }

    /// Urgency-weighted purchase proposals for a batch of incoming lots.
    ///
    /// Convenience wrapper that feeds [`pricing::propose_prices`] with
    /// cached needs and the realized sale averages over the same window.
    pub fn propose_prices(
        &self,
        items: &[pricing::PriceReviewItem],
        params: &NeedParams,
        knobs: &pricing::PricingKnobs,
    ) -> Result<Vec<pricing::PriceProposal>> {
        let needs = self.ranked_needs(params)?;
        let averages = self
            .prices()
            .sale_price_averages(params.sales_window_months, params.as_of)?;
        Ok(pricing::propose_prices(items, &needs, &averages, knobs))
    }

    // -- Metadata and utility methods --------------------------------------

    /// Load and return the snapshot manifest (generation stamp, sources).
    ///
    /// Fetches `manifest.json` from the cache (downloading if necessary)
    /// and returns the parsed JSON object.
    pub fn manifest(&self) -> Result<serde_json::Value> {
        self.conn.snapshots.borrow_mut().load_json("manifest")
    }

    /// Return the list of currently registered DuckDB view names.
    ///
    /// Views are registered lazily on first query, so this list grows as
    /// different query interfaces are used.
    pub fn views(&self) -> Vec<String> {
        self.conn.views()
    }

    /// Execute a raw SQL query against the DuckDB database.
    ///
    /// Provides escape-hatch access for queries not covered by the
    /// domain-specific interfaces.
    ///
    /// # Arguments
    ///
    /// * `query` - SQL string with `?` positional placeholders.
    /// * `params` - Parameter values corresponding to the placeholders.
    ///
    /// # Returns
    ///
    /// A vector of rows, each represented as a `HashMap<String, serde_json::Value>`.
    pub fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.conn.execute(query, params)
    }

    /// Check for newer snapshots and reset views if stale.
    ///
    /// The aggregate caches are dropped either way, so the next call
    /// recomputes from whatever data is current. Returns `true` if the
    /// snapshots were stale and views were reset (meaning subsequent
    /// queries will re-download data), or `false` if already up to date.
    pub fn refresh(&self) -> Result<bool> {
        self.need_cache.clear();
        self.mover_cache.clear();
        let stale = self.conn.snapshots.borrow_mut().is_stale()?;
        if stale {
            self.conn.snapshots.borrow().clear()?;
            self.conn.reset_views();
            debug!("snapshots were stale; cache cleared and views reset");
        }
        Ok(stale)
    }

    /// The anchor date aggregates use when no explicit `as_of` is given:
    /// today in UTC. Exposed so callers can pin reproducible windows.
    pub fn today(&self) -> NaiveDate {
        chrono::Utc::now().date_naive()
    }

    /// Consume the SDK and release all resources.
    ///
    /// Closes the DuckDB connection and HTTP client. This is called
    /// automatically when the SDK is dropped, but can be invoked explicitly
    /// for deterministic cleanup.
    pub fn close(self) {
        // Connection and SnapshotStore are dropped automatically
        drop(self);
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Return a mutable reference to the underlying [`Connection`].
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for YardstockSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let views = self.conn.views();
        let snapshots = self.conn.snapshots.borrow();
        write!(
            f,
            "YardstockSdk(cache_dir={}, views=[{}], offline={})",
            snapshots.cache_dir.display(),
            views.join(", "),
            snapshots.offline
        )
    }
}
