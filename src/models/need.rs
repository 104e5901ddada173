use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PartNeed — aggregate demand for one part code
// ---------------------------------------------------------------------------

/// One row of the ranked needs list: a part code that sold recently, how
/// often, what is left on the shelf and what was historically paid for it.
///
/// Needs are derived on the fly from the sales, stock and purchase
/// snapshots; they carry no persistent identity of their own. The part code
/// is the key for any UI state layered on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartNeed {
    pub code: String,
    pub brand: Option<String>,
    pub fuel_type: Option<String>,
    pub model_name: Option<String>,
    pub model_variant: Option<String>,
    pub model_year: Option<String>,
    pub recent_sales_count: i64,
    #[serde(default)]
    pub available_stock_count: i64,
    pub avg_purchase_price_3m: Option<f64>,
    pub avg_purchase_price_6m: Option<f64>,
    pub avg_purchase_price_12m: Option<f64>,
    /// `recentSalesCount / (availableStockCount + 1)`, rounded to two
    /// decimals. Computed after the fetch, not stored in any snapshot.
    #[serde(default)]
    pub urgency_score: f64,
}

impl PartNeed {
    /// Urgency band for display purposes.
    pub fn urgency_tier(&self) -> UrgencyTier {
        if self.urgency_score > 5.0 {
            UrgencyTier::VeryUrgent
        } else if self.urgency_score > 2.0 {
            UrgencyTier::Urgent
        } else {
            UrgencyTier::Normal
        }
    }

    /// Short human description of the need, suitable for a supplier-facing
    /// request: brand, coarse fuel family, model and year. Falls back to
    /// the raw code when no descriptive attributes are known.
    pub fn describe(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(brand) = self.brand.as_deref() {
            if !brand.is_empty() {
                parts.push(brand);
            }
        }
        let fuel_family = self.fuel_type.as_deref().map(str::to_uppercase);
        match fuel_family.as_deref() {
            Some(f) if f.contains("DIESEL") || f.contains("DCI") || f.contains("HDI") => {
                parts.push("Diesel");
            }
            Some(f) if f.contains("ESSENCE") || f.contains("TSI") || f.contains("TCE") => {
                parts.push("Essence");
            }
            _ => {}
        }
        for attr in [
            self.model_name.as_deref(),
            self.model_variant.as_deref(),
            self.model_year.as_deref(),
        ]
        .into_iter()
        .flatten()
        {
            if !attr.is_empty() {
                parts.push(attr);
            }
        }
        if parts.is_empty() {
            self.code.clone()
        } else {
            parts.join(" ")
        }
    }
}

// ---------------------------------------------------------------------------
// UrgencyTier — display banding of the urgency score
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UrgencyTier {
    /// Score above 5: selling much faster than stock can cover.
    VeryUrgent,
    /// Score above 2.
    Urgent,
    Normal,
}

// ---------------------------------------------------------------------------
// MatchCandidate — a need paired with its fuzzy-match score
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchCandidate {
    #[serde(flatten)]
    pub need: PartNeed,
    pub score: i32,
}
