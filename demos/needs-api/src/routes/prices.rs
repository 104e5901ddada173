use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use yardstock_sdk::{MoverParams, PriceKind};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct MoversQuery {
    pub kind: Option<String>,
    pub min_count: Option<i64>,
}

/// GET /api/movers?kind=purchase&min_count=3
///
/// Part codes whose average price moved between the two most recent
/// comparison windows.
pub async fn movers(
    State(state): State<Arc<AppState>>,
    Query(q): Query<MoversQuery>,
) -> Result<Json<Value>, AppError> {
    let kind = match q.kind.as_deref() {
        None | Some("sale") => PriceKind::Sale,
        Some("purchase") => PriceKind::Purchase,
        Some(other) => {
            return Err(AppError::bad_request(format!(
                "Unknown price kind '{other}' (expected 'sale' or 'purchase')"
            )))
        }
    };

    let mut params = MoverParams::new(kind);
    if let Some(min_count) = q.min_count {
        params.min_count = min_count;
    }

    let movers = state.sdk.run(move |s| s.price_movers(&params)).await?;

    let count = movers.len();
    Ok(Json(json!({ "data": movers, "count": count })))
}
