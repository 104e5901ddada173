//! Fuzzy ranking of part needs against a free-text query.

use crate::models::{MatchCandidate, PartNeed, PlateInfo};

use super::normalize::normalize;
use super::synonyms::expand_variants;

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Scores one need against a query. Higher is better; zero or less means
/// no evidence of a match.
///
/// The score is additive:
/// - `+100` when the normalized query is a substring of the need's
///   composite description,
/// - `+50` for every distinct synonym variant found in the description,
/// - `+10` for every pair of a query word and a description word where either
///   contains the other; query words shorter than two characters are skipped,
/// - `+200` when the normalized query is a substring of the uppercased raw
///   part code, which makes exact code hits dominate.
pub fn score_need(query: &str, need: &PartNeed) -> i32 {
    let query_norm = normalize(query);
    let variants = expand_variants(query);
    score_with(&query_norm, &variants, need)
}

fn score_with(query_norm: &str, variants: &[String], need: &PartNeed) -> i32 {
    let composite = normalize(&composite_text(need));
    let mut score = 0;

    if composite.contains(query_norm) {
        score += 100;
    }

    for variant in variants {
        if !variant.is_empty() && composite.contains(variant.as_str()) {
            score += 50;
        }
    }

    // Single-character query words match almost anything, so they are
    // skipped. Description-side single characters (the halves of "1.5"
    // after normalization) still pair with longer query words.
    for query_word in query_norm.split_whitespace() {
        if query_word.chars().count() < 2 {
            continue;
        }
        for composite_word in composite.split_whitespace() {
            if composite_word.contains(query_word) || query_word.contains(composite_word) {
                score += 10;
            }
        }
    }

    if need.code.to_uppercase().contains(query_norm) {
        score += 200;
    }

    score
}

/// Everything we know about a need, joined into one searchable string.
fn composite_text(need: &PartNeed) -> String {
    [
        need.code.as_str(),
        need.brand.as_deref().unwrap_or(""),
        need.fuel_type.as_deref().unwrap_or(""),
        need.model_name.as_deref().unwrap_or(""),
        need.model_variant.as_deref().unwrap_or(""),
        need.model_year.as_deref().unwrap_or(""),
    ]
    .join(" ")
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Ranks candidates against a query, keeping only positive scores, best
/// first. Ties keep their input order, so a stable upstream ordering (for
/// example by urgency) survives the ranking.
///
/// A blank query or an empty candidate list short-circuits: every candidate
/// comes back unchanged with a score of zero.
pub fn rank_candidates(query: &str, candidates: &[PartNeed]) -> Vec<MatchCandidate> {
    if query.trim().is_empty() || candidates.is_empty() {
        return candidates
            .iter()
            .map(|need| MatchCandidate {
                need: need.clone(),
                score: 0,
            })
            .collect();
    }

    let query_norm = normalize(query);
    let variants = expand_variants(query);

    let mut scored: Vec<MatchCandidate> = candidates
        .iter()
        .map(|need| MatchCandidate {
            score: score_with(&query_norm, &variants, need),
            need: need.clone(),
        })
        .filter(|candidate| candidate.score > 0)
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Like [`rank_candidates`] but discards the scores, returning the matching
/// needs in rank order. Blank queries return the candidates untouched.
pub fn match_needs(query: &str, candidates: &[PartNeed]) -> Vec<PartNeed> {
    if query.trim().is_empty() || candidates.is_empty() {
        return candidates.to_vec();
    }
    rank_candidates(query, candidates)
        .into_iter()
        .map(|candidate| candidate.need)
        .collect()
}

// ---------------------------------------------------------------------------
// Plate-driven filtering
// ---------------------------------------------------------------------------

/// Narrows a need list using what a plate lookup told us about the vehicle.
///
/// An exact part-code match wins outright. Otherwise the list is filtered by
/// brand and fuel substring, and if that leaves nothing the original list
/// comes back, so the caller always has something to show.
pub fn filter_needs_by_plate(needs: &[PartNeed], plate: &PlateInfo) -> Vec<PartNeed> {
    if needs.is_empty() {
        return Vec::new();
    }

    if let Some(code) = plate
        .part_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
    {
        let code_upper = code.to_uppercase();
        let exact: Vec<PartNeed> = needs
            .iter()
            .filter(|need| need.code.to_uppercase() == code_upper)
            .cloned()
            .collect();
        if !exact.is_empty() {
            return exact;
        }
    }

    let brand = plate
        .brand
        .as_deref()
        .map(str::to_uppercase)
        .unwrap_or_default();
    let fuel = plate
        .fuel_type
        .as_deref()
        .map(str::to_uppercase)
        .unwrap_or_default();

    let mut filtered: Vec<PartNeed> = needs.to_vec();
    if !brand.is_empty() {
        filtered.retain(|need| {
            need.brand
                .as_deref()
                .map(|b| b.to_uppercase().contains(&brand))
                .unwrap_or(false)
        });
    }
    if !fuel.is_empty() {
        filtered.retain(|need| {
            need.fuel_type
                .as_deref()
                .map(|f| f.to_uppercase().contains(&fuel))
                .unwrap_or(false)
        });
    }

    if filtered.is_empty() {
        needs.to_vec()
    } else {
        filtered
    }
}
