use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/manifest
///
/// Returns the snapshot generation stamp and source tag.
pub async fn get_manifest(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let manifest = state.sdk.manifest().await?;

    let generated_at = manifest
        .get("generatedAt")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    let source = manifest
        .get("source")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");

    Ok(Json(json!({
        "generatedAt": generated_at,
        "source": source
    })))
}
