use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PlateInfo — what the plate registry knows about one vehicle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateInfo {
    /// Plate as stored in the registry, separators included.
    pub plate: String,
    pub part_code: Option<String>,
    pub brand: Option<String>,
    pub model_name: Option<String>,
    pub model_year: Option<String>,
    pub fuel_type: Option<String>,
}
