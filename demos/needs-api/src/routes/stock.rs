use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/stock/totals
///
/// Available/sold/total unit counters across the whole yard.
pub async fn totals(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let totals = state.sdk.run(|s| s.stock().totals()).await?;
    Ok(Json(json!({ "data": totals })))
}

/// GET /api/stock/breakdown
///
/// Available units grouped by brand and fuel type.
pub async fn breakdown(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let rows = state.sdk.run(|s| s.stock().breakdown()).await?;

    let count = rows.len();
    Ok(Json(json!({ "data": rows, "count": count })))
}

/// GET /api/stock/{code}
///
/// Representative vehicle attributes plus the available unit count for one
/// part code.
pub async fn code_info(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<Value>, AppError> {
    let code_for_query = code.clone();
    let (info, available) = state
        .sdk
        .run(move |s| {
            let info = s.stock().code_info(&code_for_query)?;
            let available = s.stock().available_for(&code_for_query)?;
            Ok((info, available))
        })
        .await?;

    match info {
        Some(info) => Ok(Json(json!({ "data": info, "available": available }))),
        None => Err(AppError::not_found(format!(
            "No stock unit carries code '{code}'"
        ))),
    }
}
