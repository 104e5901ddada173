use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use yardstock_sdk::NeedParams;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListNeedsParams {
    pub window_months: Option<u32>,
    pub top_n: Option<usize>,
}

#[derive(Deserialize)]
pub struct SearchNeedsParams {
    pub q: Option<String>,
    pub window_months: Option<u32>,
}

#[derive(Deserialize)]
pub struct SuggestionsParams {
    pub count: Option<usize>,
}

fn need_params(window_months: Option<u32>, top_n: Option<usize>) -> NeedParams {
    let mut params = NeedParams::default();
    if let Some(months) = window_months {
        params.sales_window_months = months;
    }
    if let Some(n) = top_n {
        params.top_n = n;
    }
    params
}

/// GET /api/needs?window_months=3&top_n=20
///
/// The ranked needs list: codes selling faster than the yard restocks.
pub async fn list_needs(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ListNeedsParams>,
) -> Result<Json<Value>, AppError> {
    let params = need_params(q.window_months, q.top_n);
    let needs = state.sdk.run(move |s| s.ranked_needs(&params)).await?;

    let count = needs.len();
    Ok(Json(json!({ "data": needs, "count": count })))
}

/// GET /api/needs/search?q=reno+dci
///
/// Fuzzy search over the needs list, breaker shorthand included.
pub async fn search_needs(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchNeedsParams>,
) -> Result<Json<Value>, AppError> {
    let query = q
        .q
        .ok_or_else(|| AppError::bad_request("Missing required query parameter: q"))?;

    let params = need_params(q.window_months, None);
    let hits = state
        .sdk
        .run(move |s| s.search().search(&query, &params))
        .await?;

    let count = hits.len();
    Ok(Json(json!({ "data": hits, "count": count })))
}

/// GET /api/needs/plate/{plate}
///
/// Needs relevant to the vehicle behind a registration plate. Computed
/// once per plate, then served from an in-memory cache.
pub async fn needs_for_plate(
    State(state): State<Arc<AppState>>,
    Path(plate): Path<String>,
) -> Result<Json<Value>, AppError> {
    // 1. Check the in-memory cache.
    {
        let cache = state
            .plate_cache
            .lock()
            .map_err(|_| AppError::internal("Cache lock poisoned"))?;
        if let Some(cached) = cache.get(&plate) {
            return Ok(Json(json!({ "data": cached })));
        }
    }

    // 2. Look the vehicle up and narrow the needs list to it.
    let plate_for_query = plate.clone();
    let result = state
        .sdk
        .run(move |s| {
            s.search()
                .needs_for_plate(&plate_for_query, &NeedParams::default())
        })
        .await?;

    let Some(needs) = result else {
        return Err(AppError::not_found(format!(
            "No vehicle found for plate '{plate}'"
        )));
    };

    let payload =
        serde_json::to_value(&needs).map_err(|e| AppError::internal(e.to_string()))?;

    // 3. Cache and return.
    {
        let mut cache = state
            .plate_cache
            .lock()
            .map_err(|_| AppError::internal("Cache lock poisoned"))?;
        cache.insert(plate, payload.clone());
    }

    Ok(Json(json!({ "data": payload })))
}

/// GET /api/suggestions?count=5
///
/// Example queries for an idle search box, sampled from current needs.
pub async fn suggestions(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SuggestionsParams>,
) -> Result<Json<Value>, AppError> {
    let count = q.count.unwrap_or(5);
    let suggestions = state
        .sdk
        .run(move |s| s.search().suggestions(&NeedParams::default(), count))
        .await?;

    Ok(Json(json!({ "data": suggestions })))
}
