//! Domain synonym table and query-variant expansion.
//!
//! The table maps canonical tokens (brands, fuels, technical terms) to the
//! abbreviations breakers actually type. Expansion works on normalized text
//! and swaps whole substrings in both directions, so `"RENO DCI"` also
//! yields `"RENAULT DCI"` and `"RENO DIESEL"`.

use super::normalize::normalize;

// ---------------------------------------------------------------------------
// Synonym table
// ---------------------------------------------------------------------------

/// Canonical token -> known abbreviations, in a fixed iteration order.
///
/// Single-letter entries like `"R"` or `"D"` are deliberate: they mirror the
/// shorthand seen in real queries, and substring replacement keeps them from
/// being treated as whole words. That is the intended trade-off; matching
/// tolerates the occasional odd variant because variants only ever add score.
static SYNONYMS: &[(&str, &[&str])] = &[
    ("RENAULT", &["REN", "RENO", "R"]),
    ("PEUGEOT", &["PEU", "PSA", "P"]),
    ("CITROEN", &["CIT", "CITRO", "C"]),
    ("VOLKSWAGEN", &["VW", "VOLKS"]),
    ("MERCEDES", &["MERC", "MB", "MERCEDES-BENZ"]),
    ("BMW", &["BM"]),
    ("AUDI", &["AUD"]),
    ("FORD", &["F"]),
    ("OPEL", &["OP"]),
    ("FIAT", &["FIA"]),
    ("DIESEL", &["GASOIL", "GAZOLE", "HDI", "DCI", "TDI", "CDI", "TDCI", "D"]),
    ("ESSENCE", &["ESS", "E", "TSI", "TFSI", "TCE"]),
    ("ELECTRIQUE", &["ELEC", "EV", "ELECTRIC"]),
    ("HYBRIDE", &["HYB", "HYBRID"]),
    ("TURBO", &["T", "TURB"]),
    ("INJECTION", &["INJ", "I"]),
    ("COMMON RAIL", &["CR", "COMMONRAIL"]),
    ("BOITE", &["BV", "BA", "GEARBOX"]),
    ("AUTOMATIQUE", &["AUTO", "AT", "BVA"]),
    ("MANUELLE", &["MAN", "MT", "BVM"]),
];

/// Returns the full synonym table. Exposed so callers can render help text
/// or build their own expansions on top of it.
pub fn synonym_table() -> &'static [(&'static str, &'static [&'static str])] {
    SYNONYMS
}

// ---------------------------------------------------------------------------
// Variant expansion
// ---------------------------------------------------------------------------

/// Expands a query into its normalized form plus every synonym rewrite.
///
/// For each table entry, an abbreviation found in the normalized query is
/// replaced by its canonical token (all occurrences), and a canonical token
/// found in the query is replaced by each of its abbreviations. Duplicates
/// are dropped; the normalized query always comes first. An empty input
/// yields no variants at all.
pub fn expand_variants(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let norm = normalize(text);
    let mut variants = vec![norm.clone()];
    for (canonical, abbrevs) in SYNONYMS {
        for abbrev in *abbrevs {
            if norm.contains(abbrev) {
                push_unique(&mut variants, norm.replace(abbrev, canonical));
            }
        }
        if norm.contains(canonical) {
            for abbrev in *abbrevs {
                push_unique(&mut variants, norm.replace(canonical, abbrev));
            }
        }
    }
    variants
}

fn push_unique(variants: &mut Vec<String>, candidate: String) {
    if !variants.iter().any(|v| v == &candidate) {
        variants.push(candidate);
    }
}
