//! Snapshot download/cache management and the in-process aggregate cache.
//!
//! [`SnapshotStore`] mirrors the remote snapshot bucket on local disk: it
//! checks `manifest.json` for a new generation stamp and re-downloads stale
//! files. Individual snapshots are fetched lazily on first access.
//!
//! [`TtlCache`] is the small time-based cache the SDK layers over expensive
//! aggregate queries (ranked needs, price movers).

use crate::config;
use crate::error::{Result, YardstockError};
use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::hash::Hash;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// SnapshotStore
// ---------------------------------------------------------------------------

/// Downloads and caches yard snapshot files (parquet plus the manifest).
///
/// Staleness is decided by comparing the manifest's `generatedAt` stamp
/// against the locally recorded one. In offline mode nothing is ever
/// fetched; cached files are used as-is.
pub struct SnapshotStore {
    /// Directory where cached files (and the local database) live.
    pub cache_dir: PathBuf,
    /// If true, never touch the network (use cached files only).
    pub offline: bool,
    base_url: String,
    timeout: Duration,
    client: Option<Client>,
    remote_stamp: Option<String>,
}

impl SnapshotStore {
    /// Create a new snapshot store.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache
    /// directory. If `base_url` is `None`, uses the public snapshot bucket.
    /// Creates the cache directory if it does not exist.
    pub fn new(
        cache_dir: Option<PathBuf>,
        offline: bool,
        timeout: Duration,
        base_url: Option<String>,
    ) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            cache_dir: dir,
            offline,
            base_url: base_url.unwrap_or_else(|| config::SNAPSHOT_BASE.to_string()),
            timeout,
            client: None,
            remote_stamp: None,
        })
    }

    /// Lazy HTTP client, created on first use.
    pub fn client(&mut self) -> &Client {
        if self.client.is_none() {
            self.client = Some(
                Client::builder()
                    .timeout(self.timeout)
                    .redirect(reqwest::redirect::Policy::limited(10))
                    .build()
                    .expect("failed to build HTTP client"),
            );
        }
        self.client.as_ref().unwrap()
    }

    /// Read the locally recorded generation stamp from `version.txt`.
    fn local_stamp(&self) -> Option<String> {
        let stamp_file = self.cache_dir.join("version.txt");
        if stamp_file.exists() {
            fs::read_to_string(&stamp_file)
                .ok()
                .map(|s| s.trim().to_string())
        } else {
            None
        }
    }

    /// Record a generation stamp in `version.txt` in the cache directory.
    fn save_stamp(&self, stamp: &str) {
        let stamp_file = self.cache_dir.join("version.txt");
        let _ = fs::write(stamp_file, stamp);
    }

    /// Fetch the current generation stamp from the remote manifest.
    ///
    /// Returns the `generatedAt` string (e.g. `"2026-08-22T03:00:00Z"`), or
    /// `None` if offline or the bucket is unreachable. Caches the result for
    /// subsequent calls.
    pub fn remote_stamp(&mut self) -> Result<Option<String>> {
        if self.remote_stamp.is_some() {
            return Ok(self.remote_stamp.clone());
        }
        if self.offline {
            return Ok(None);
        }
        let url = format!("{}/manifest.json", self.base_url);
        let client = self.client().clone();
        match client.get(&url).send() {
            Ok(resp) => {
                let resp = resp.error_for_status()?;
                let data: serde_json::Value = resp.json()?;
                // Try generatedAt at the top level first, then under meta
                let stamp = data
                    .get("generatedAt")
                    .and_then(|v| v.as_str())
                    .or_else(|| {
                        data.get("meta")
                            .and_then(|m| m.get("generatedAt"))
                            .and_then(|v| v.as_str())
                    })
                    .map(|s| s.to_string());
                self.remote_stamp = stamp.clone();
                Ok(stamp)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "failed to fetch snapshot manifest");
                Ok(None)
            }
        }
    }

    /// Check if the local snapshot cache is out of date.
    ///
    /// Returns `true` if there is no local stamp or the bucket has a newer
    /// generation. Returns `false` if up to date or if the bucket is
    /// unreachable.
    pub fn is_stale(&mut self) -> Result<bool> {
        let local = self.local_stamp();
        match local {
            None => Ok(true),
            Some(local_stamp) => {
                let remote = self.remote_stamp()?;
                match remote {
                    None => Ok(false), // Can't check, assume fresh
                    Some(remote_stamp) => Ok(local_stamp != remote_stamp),
                }
            }
        }
    }

    /// Download a single file from the bucket.
    ///
    /// Downloads to a temp file first and renames on success, so an
    /// interrupted download never leaves a corrupt partial file behind.
    fn download_file(&mut self, filename: &str, dest: &Path) -> Result<()> {
        let url = format!("{}/{}", self.base_url, filename);
        debug!(url = %url, "downloading snapshot file");

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_dest = dest.with_extension(format!(
            "{}.tmp",
            dest.extension().and_then(|e| e.to_str()).unwrap_or("")
        ));

        let client = self.client().clone();
        let result = (|| -> Result<()> {
            let resp = client.get(&url).send()?.error_for_status()?;
            let bytes = resp.bytes()?;
            fs::write(&tmp_dest, &bytes)?;
            fs::rename(&tmp_dest, dest)?;
            Ok(())
        })();

        if result.is_err() {
            // Clean up partial temp file on any error
            let _ = fs::remove_file(&tmp_dest);
        }

        result
    }

    /// Ensure a parquet snapshot is cached locally, downloading if needed.
    ///
    /// # Arguments
    ///
    /// * `view_name` - Logical view name (e.g. `"sales"`, `"stock_units"`).
    ///
    /// # Returns
    ///
    /// Local filesystem path to the cached parquet file.
    pub fn ensure_snapshot(&mut self, view_name: &str) -> Result<PathBuf> {
        let snapshot_files = config::snapshot_files();
        let filename = snapshot_files
            .get(view_name)
            .ok_or_else(|| YardstockError::NotFound(format!("Unknown snapshot: {}", view_name)))?;

        let local_path = self.cache_dir.join(filename);

        if !local_path.exists() || self.is_stale()? {
            if self.offline {
                if local_path.exists() {
                    return Ok(local_path);
                }
                return Err(YardstockError::NotFound(format!(
                    "Snapshot file {} not cached and offline mode is enabled",
                    filename
                )));
            }
            self.download_file(filename, &local_path)?;
            // Update the stamp after a successful download
            if let Ok(Some(stamp)) = self.remote_stamp() {
                self.save_stamp(&stamp);
            }
        }

        Ok(local_path)
    }

    /// Ensure a JSON file is cached locally, downloading if needed.
    ///
    /// # Arguments
    ///
    /// * `name` - Logical file name (e.g. `"manifest"`).
    ///
    /// # Returns
    ///
    /// Local filesystem path to the cached JSON file.
    pub fn ensure_json(&mut self, name: &str) -> Result<PathBuf> {
        let json_files = config::json_files();
        let filename = json_files
            .get(name)
            .ok_or_else(|| YardstockError::NotFound(format!("Unknown JSON file: {}", name)))?;

        let local_path = self.cache_dir.join(filename);

        if !local_path.exists() || self.is_stale()? {
            if self.offline {
                if local_path.exists() {
                    return Ok(local_path);
                }
                return Err(YardstockError::NotFound(format!(
                    "JSON file {} not cached and offline mode is enabled",
                    filename
                )));
            }
            self.download_file(filename, &local_path)?;
            if let Ok(Some(stamp)) = self.remote_stamp() {
                self.save_stamp(&stamp);
            }
        }

        Ok(local_path)
    }

    /// Load and parse a JSON file (handles `.gz` transparently).
    ///
    /// If the cached file is corrupt (truncated download, disk error), it is
    /// deleted automatically so the next call re-downloads a fresh copy.
    pub fn load_json(&mut self, name: &str) -> Result<serde_json::Value> {
        let path = self.ensure_json(name)?;

        let parse_result = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
            let file = fs::File::open(&path)?;
            let reader = BufReader::new(file);
            let decoder = GzDecoder::new(reader);
            let mut buf_reader = BufReader::new(decoder);
            let mut contents = String::new();
            buf_reader.read_to_string(&mut contents)?;
            serde_json::from_str(&contents).map_err(YardstockError::from)
        } else {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents).map_err(YardstockError::from)
        };

        match parse_result {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt cache file, removing");
                let _ = fs::remove_file(&path);
                Err(YardstockError::NotFound(format!(
                    "Cache file '{}' was corrupt and has been removed. \
                     Retry to re-download. Original error: {}",
                    path.file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("unknown"),
                    e
                )))
            }
        }
    }

    /// Remove all cached snapshot artifacts.
    ///
    /// Only snapshot files, the manifest and the stamp are removed; the
    /// local database file stays, because it holds submitted offers.
    pub fn clear(&self) -> Result<()> {
        for filename in config::snapshot_files().values() {
            let _ = fs::remove_file(self.cache_dir.join(filename));
        }
        for filename in config::json_files().values() {
            let _ = fs::remove_file(self.cache_dir.join(filename));
        }
        let _ = fs::remove_file(self.cache_dir.join("version.txt"));
        Ok(())
    }

    /// Close the HTTP client, if open.
    pub fn close(&mut self) {
        self.client = None;
    }
}

// ---------------------------------------------------------------------------
// TtlCache
// ---------------------------------------------------------------------------

/// A keyed cache whose entries expire after a fixed time-to-live.
///
/// Used for aggregate query results, so repeated identical calls within the
/// TTL hit memory instead of DuckDB. Purely an optimization: expiry makes
/// results at most `ttl` old, never wrong in any other way.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RefCell<HashMap<K, (Instant, V)>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key` if present and not expired.
    /// Expired entries are dropped on the way out.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.borrow_mut();
        match entries.get(key) {
            Some((stored_at, value)) if stored_at.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, key: K, value: V) {
        self.entries
            .borrow_mut()
            .insert(key, (Instant::now(), value));
    }

    /// Drops every entry, expired or not.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}
