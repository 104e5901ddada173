use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// The async yardstock SDK instance. Handles dispatching blocking SDK
    /// operations to a thread pool internally.
    pub sdk: yardstock_sdk::AsyncYardstockSdk,

    /// In-memory cache of plate lookups, keyed by the plate as the client
    /// sent it. Vehicles do not change between snapshot generations, so a
    /// repeated lookup skips the whole needs recomputation.
    pub plate_cache: Mutex<HashMap<String, Value>>,
}
