use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Breaker — a registered supplier identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breaker {
    pub id: i64,
    pub name: String,
    pub created_at: Option<String>,
}

// ---------------------------------------------------------------------------
// TargetedOffer — an offer against a specific part code
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetedOffer {
    pub id: i64,
    pub breaker_id: i64,
    /// Supplier name, joined in by the listing queries.
    #[serde(default)]
    pub breaker_name: Option<String>,
    pub code: String,
    pub brand: Option<String>,
    pub fuel_type: Option<String>,
    pub model_name: Option<String>,
    pub model_variant: Option<String>,
    pub model_year: Option<String>,
    pub price: Option<f64>,
    pub quantity: i64,
    pub note: Option<String>,
    pub plate: Option<String>,
    pub vin: Option<String>,
    pub created_at: Option<String>,
}

/// Payload for submitting a targeted offer. Only the part code is
/// mandatory; everything else is context the supplier chose to give.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTargetedOffer {
    pub code: String,
    pub brand: Option<String>,
    pub fuel_type: Option<String>,
    pub model_name: Option<String>,
    pub model_variant: Option<String>,
    pub model_year: Option<String>,
    /// Asking price. `Some(0.0)` is stored as no price quoted.
    pub price: Option<f64>,
    pub quantity: i64,
    pub note: Option<String>,
    pub plate: Option<String>,
    pub vin: Option<String>,
}

impl Default for NewTargetedOffer {
    fn default() -> Self {
        Self {
            code: String::new(),
            brand: None,
            fuel_type: None,
            model_name: None,
            model_variant: None,
            model_year: None,
            price: None,
            quantity: 1,
            note: None,
            plate: None,
            vin: None,
        }
    }
}

// ---------------------------------------------------------------------------
// FreeOffer — a free-text offer with no mapped part code
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeOffer {
    pub id: i64,
    pub breaker_id: i64,
    #[serde(default)]
    pub breaker_name: Option<String>,
    pub text: String,
    pub price: Option<f64>,
    pub note: Option<String>,
    pub plate: Option<String>,
    pub vin: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFreeOffer {
    /// What the supplier has, in their own words. Mandatory.
    pub text: String,
    pub price: Option<f64>,
    pub note: Option<String>,
    pub plate: Option<String>,
    pub vin: Option<String>,
}

// ---------------------------------------------------------------------------
// BreakerDailyStats — one supplier's activity for a single day
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakerDailyStats {
    pub targeted: i64,
    pub free: i64,
    pub total: i64,
}
