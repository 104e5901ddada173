//! Async wrapper around [`YardstockSdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all SDK operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//! DuckDB queries are CPU-bound but fast, making this approach efficient.
//!
//! # Example
//!
//! ```no_run
//! use yardstock_sdk::{AsyncYardstockSdk, NeedParams};
//!
//! #[tokio::main]
//! async fn main() {
//!     let sdk = AsyncYardstockSdk::builder().build().await.unwrap();
//!
//!     // Run any sync SDK method via closure
//!     let needs = sdk.run(|s| {
//!         s.ranked_needs(&NeedParams::default())
//!     }).await.unwrap();
//!
//!     // Convenience method for raw SQL
//!     let rows = sdk.sql("SELECT COUNT(*) FROM sales", &[]).await.unwrap();
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{Result, YardstockError};
use crate::YardstockSdk;

// ---------------------------------------------------------------------------
// AsyncYardstockSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncYardstockSdk`] instance.
pub struct AsyncYardstockSdkBuilder {
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    snapshot_url: Option<String>,
    aggregate_ttl: Option<Duration>,
}

impl Default for AsyncYardstockSdkBuilder {
    fn default() -> Self {
        Self {
            cache_dir: None,
            offline: false,
            timeout: Duration::from_secs(120),
            snapshot_url: None,
            aggregate_ttl: None,
        }
    }
}

impl AsyncYardstockSdkBuilder {
    /// Set a custom cache directory.
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout for snapshot downloads.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point the SDK at a different snapshot bucket.
    pub fn snapshot_url<S: Into<String>>(mut self, url: S) -> Self {
        self.snapshot_url = Some(url.into());
        self
    }

    /// Set the TTL of the aggregate caches.
    pub fn aggregate_ttl(mut self, ttl: Duration) -> Self {
        self.aggregate_ttl = Some(ttl);
        self
    }

    /// Build the async SDK, initializing the snapshot store and database.
    ///
    /// Initialization runs on the blocking thread pool so it won't block
    /// the async event loop.
    pub async fn build(self) -> Result<AsyncYardstockSdk> {
        tokio::task::spawn_blocking(move || {
            let mut builder = YardstockSdk::builder();
            if let Some(dir) = self.cache_dir {
                builder = builder.cache_dir(dir);
            }
            if let Some(url) = self.snapshot_url {
                builder = builder.snapshot_url(url);
            }
            if let Some(ttl) = self.aggregate_ttl {
                builder = builder.aggregate_ttl(ttl);
            }
            builder = builder.offline(self.offline).timeout(self.timeout);
            let sdk = builder.build()?;
            Ok(AsyncYardstockSdk {
                inner: Arc::new(Mutex::new(sdk)),
            })
        })
        .await
        .map_err(|e| YardstockError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncYardstockSdk
// ---------------------------------------------------------------------------

/// Async wrapper around [`YardstockSdk`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. The underlying [`YardstockSdk`] is
/// protected by a [`Mutex`] since it uses `RefCell` internally.
///
/// # Usage
///
/// Use [`run()`](Self::run) to execute any sync SDK method:
///
/// ```no_run
/// # use yardstock_sdk::AsyncYardstockSdk;
/// # async fn example() -> yardstock_sdk::Result<()> {
/// let sdk = AsyncYardstockSdk::builder().build().await?;
/// let totals = sdk.run(|s| s.stock().totals()).await?;
/// # Ok(())
/// # }
/// ```
pub struct AsyncYardstockSdk {
    inner: Arc<Mutex<YardstockSdk>>,
}

impl AsyncYardstockSdk {
    /// Create a new builder for configuring the async SDK.
    pub fn builder() -> AsyncYardstockSdkBuilder {
        AsyncYardstockSdkBuilder::default()
    }

    /// Run a sync SDK operation on the blocking thread pool.
    ///
    /// The closure receives an `&YardstockSdk` reference and should return
    /// a `Result<T>`. The operation runs on a dedicated blocking thread,
    /// keeping the async event loop free.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use yardstock_sdk::{AsyncYardstockSdk, NeedParams};
    /// # async fn example() -> yardstock_sdk::Result<()> {
    /// # let sdk = AsyncYardstockSdk::builder().build().await?;
    /// let hits = sdk.run(|s| {
    ///     s.search().search("reno dci", &NeedParams::default())
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&YardstockSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = sdk
                .lock()
                .map_err(|_| YardstockError::InvalidArgument("SDK lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| YardstockError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Execute a raw SQL query asynchronously.
    ///
    /// Convenience wrapper around [`run()`](Self::run) for
    /// [`YardstockSdk::sql()`].
    pub async fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let query = query.to_string();
        let params = params.to_vec();
        self.run(move |s| s.sql(&query, &params)).await
    }

    /// Load and return the snapshot manifest asynchronously.
    pub async fn manifest(&self) -> Result<serde_json::Value> {
        self.run(|s| s.manifest()).await
    }

    /// Check for newer snapshots and reset views if stale.
    pub async fn refresh(&self) -> Result<bool> {
        self.run(|s| s.refresh()).await
    }

    /// Return the list of currently registered DuckDB view names.
    pub async fn views(&self) -> Result<Vec<String>> {
        self.run(|s| Ok(s.views())).await
    }

    /// Close the SDK, releasing all resources.
    ///
    /// After calling this, subsequent operations will fail with a
    /// poisoned lock error.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            let sdk = self
                .inner
                .lock()
                .map_err(|_| YardstockError::InvalidArgument("SDK lock poisoned".into()))?;
            // Dropping the MutexGuard drops the SDK
            drop(sdk);
            Ok(())
        })
        .await
        .map_err(|e| YardstockError::InvalidArgument(format!("Task join error: {e}")))?
    }
}
