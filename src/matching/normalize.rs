//! Canonical text forms for part codes, descriptions and plates.

// ---------------------------------------------------------------------------
// Free-text normalization
// ---------------------------------------------------------------------------

/// Normalizes free text for matching: uppercases, replaces `-`, `_` and `.`
/// with spaces, collapses whitespace runs and trims the ends.
///
/// The function is idempotent: `normalize(normalize(s)) == normalize(s)`.
///
/// ```
/// use yardstock_sdk::matching::normalize;
///
/// assert_eq!(normalize("  k9k   diesel "), "K9K DIESEL");
/// assert_eq!(normalize("1.6-hdi"), "1 6 HDI");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(text: &str) -> String {
    let replaced: String = text
        .to_uppercase()
        .chars()
        .map(|c| match c {
            '-' | '_' | '.' => ' ',
            other => other,
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Part codes
// ---------------------------------------------------------------------------

/// Cleans a raw part code as found in exports: trims, uppercases, and undoes
/// spreadsheet float damage (`"8200112.0"` becomes `"8200112"`, `"8,0"`
/// becomes `"8"`). Codes that do not look numeric pass through unchanged
/// apart from trim and case.
pub fn normalize_part_code(raw: &str) -> String {
    let mut code = raw.trim().to_uppercase();
    if let Some(stripped) = code.strip_suffix(".0") {
        code = stripped.to_string();
    }
    if let Ok(value) = code.replace(',', ".").parse::<f64>() {
        if value.is_finite() && value.fract() == 0.0 {
            return format!("{}", value as i64);
        }
    }
    code
}

// ---------------------------------------------------------------------------
// Registration plates
// ---------------------------------------------------------------------------

/// Normalizes a registration plate for lookups: uppercases and strips spaces
/// and dashes, so `"ab-123-cd"` and `"AB 123 CD"` compare equal.
pub fn normalize_plate(raw: &str) -> String {
    raw.to_uppercase()
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect()
}
