use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use yardstock_sdk::models::NewTargetedOffer;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SubmitTargetedBody {
    pub breaker: String,
    pub code: String,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub note: Option<String>,
    pub plate: Option<String>,
}

#[derive(Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

/// POST /api/offers/targeted
///
/// Submit a targeted offer. The breaker account is created on first use;
/// validation failures (blank code, non-positive price) come back as 400.
pub async fn submit_targeted(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubmitTargetedBody>,
) -> Result<Json<Value>, AppError> {
    let id = state
        .sdk
        .run(move |s| {
            let breaker = s.offers().get_or_create_breaker(&body.breaker)?;
            let offer = NewTargetedOffer {
                code: body.code,
                price: body.price,
                quantity: body.quantity.unwrap_or(1),
                note: body.note,
                plate: body.plate,
                ..Default::default()
            };
            s.offers().submit_targeted(breaker.id, &offer)
        })
        .await?;

    Ok(Json(json!({ "data": { "id": id } })))
}

/// GET /api/offers/recent?limit=10
///
/// The latest targeted offers, newest first, with breaker names joined in.
pub async fn recent(
    State(state): State<Arc<AppState>>,
    Query(q): Query<RecentQuery>,
) -> Result<Json<Value>, AppError> {
    let limit = q.limit.unwrap_or(20);
    let offers = state
        .sdk
        .run(move |s| s.offers().recent_targeted(limit))
        .await?;

    let count = offers.len();
    Ok(Json(json!({ "data": offers, "count": count })))
}
