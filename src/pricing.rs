//! Purchase price proposals for incoming part lots.
//!
//! Pure arithmetic over data the query layer already produced: no database
//! access, no clock. Feed it the current needs, the realized sale averages
//! and the lots under review; get back a price and a recommendation per
//! lot.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{PartNeed, SalePriceAvg};

// ---------------------------------------------------------------------------
// PricingKnobs — the three dials of the margin model
// ---------------------------------------------------------------------------

/// Margin model parameters, all expressed as fractions.
///
/// The effective margin starts at `target_margin`, shrinks by up to
/// `urgency_bonus` for parts selling fast (pay more, win the lot) and grows
/// by up to `overstock_malus` for parts already piling up (pay less).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingKnobs {
    pub target_margin: f64,
    pub urgency_bonus: f64,
    pub overstock_malus: f64,
}

impl Default for PricingKnobs {
    fn default() -> Self {
        Self {
            target_margin: 0.35,
            urgency_bonus: 0.08,
            overstock_malus: 0.05,
        }
    }
}

// ---------------------------------------------------------------------------
// PriceReviewItem — one lot under review
// ---------------------------------------------------------------------------

/// A lot someone wants to sell to the yard: a label for display, the part
/// code it was mapped to (if any) and the price currently on the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceReviewItem {
    pub label: String,
    /// Mapped part code, uppercased by the caller. `None` means the mapping
    /// step failed and no data-driven price is possible.
    pub code: Option<String>,
    pub current_price: Option<f64>,
}

// ---------------------------------------------------------------------------
// PriceDecision / PriceProposal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceDecision {
    /// No part code mapped; nothing to price against.
    Unmapped,
    /// Mapped, but no realized sale average to anchor a price on.
    NoRecentSales,
    /// Demand outruns stock; worth paying up.
    Raise,
    /// Stock piles up while sales stall; bid down.
    Lower,
    Hold,
}

/// Priced review result for one lot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceProposal {
    pub label: String,
    pub code: Option<String>,
    pub recent_sales_count: i64,
    pub available_stock_count: i64,
    pub urgency_score: f64,
    /// Realized sale average the proposal anchors on.
    pub avg_sale_price: Option<f64>,
    pub current_price: Option<f64>,
    /// Margin actually applied after the urgency and overstock adjustments.
    pub effective_margin: f64,
    /// `avg_sale_price * (1 - effective_margin)`, rounded to whole units.
    /// `None` whenever there is no sale average.
    pub proposed_price: Option<f64>,
    pub decision: PriceDecision,
}

// ---------------------------------------------------------------------------
// Proposal engine
// ---------------------------------------------------------------------------

/// Price every lot in `items` against current demand and realized prices.
///
/// Lots whose code is missing from `needs` are treated as having zero
/// sales, zero stock and zero urgency; lots missing from `sale_averages`
/// get no proposed price. Output order follows input order.
pub fn propose_prices(
    items: &[PriceReviewItem],
    needs: &[PartNeed],
    sale_averages: &[SalePriceAvg],
    knobs: &PricingKnobs,
) -> Vec<PriceProposal> {
    let needs_by_code: HashMap<&str, &PartNeed> =
        needs.iter().map(|n| (n.code.as_str(), n)).collect();
    let avg_by_code: HashMap<&str, f64> = sale_averages
        .iter()
        .map(|a| (a.code.as_str(), a.avg_sale_price))
        .collect();

    items
        .iter()
        .map(|item| {
            let need = item
                .code
                .as_deref()
                .and_then(|code| needs_by_code.get(code).copied());
            let sales = need.map(|n| n.recent_sales_count).unwrap_or(0);
            let stock = need.map(|n| n.available_stock_count).unwrap_or(0);
            let urgency = need.map(|n| n.urgency_score).unwrap_or(0.0);
            let avg_sale = item
                .code
                .as_deref()
                .and_then(|code| avg_by_code.get(code).copied());

            let urgency_factor = (urgency / 8.0).clamp(0.0, 1.0);
            let overstock_factor =
                (stock as f64 / (sales as f64 + 1.0) / 5.0).clamp(0.0, 1.0);
            let effective_margin = (knobs.target_margin - knobs.urgency_bonus * urgency_factor
                + knobs.overstock_malus * overstock_factor)
                .clamp(0.05, 0.90);

            let proposed_price = avg_sale
                .filter(|avg| *avg > 0.0)
                .map(|avg| (avg * (1.0 - effective_margin)).round());

            let decision = if item.code.is_none() {
                PriceDecision::Unmapped
            } else if proposed_price.is_none() {
                PriceDecision::NoRecentSales
            } else if urgency >= 5.0 {
                PriceDecision::Raise
            } else if stock >= 3 && sales <= 1 {
                PriceDecision::Lower
            } else {
                PriceDecision::Hold
            };

            PriceProposal {
                label: item.label.clone(),
                code: item.code.clone(),
                recent_sales_count: sales,
                available_stock_count: stock,
                urgency_score: urgency,
                avg_sale_price: avg_sale,
                current_price: item.current_price,
                effective_margin,
                proposed_price,
                decision,
            }
        })
        .collect()
}
