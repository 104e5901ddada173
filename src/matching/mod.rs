//! Pure text-matching core: normalization, synonym expansion and fuzzy
//! ranking of part needs against free-text supplier queries.
//!
//! Nothing in this module touches the database; every function takes its
//! data as explicit parameters, so the same code serves both the SDK query
//! layer and callers that already hold a need list in memory.

pub mod matcher;
pub mod normalize;
pub mod synonyms;

pub use matcher::{filter_needs_by_plate, match_needs, rank_candidates, score_need};
pub use normalize::{normalize, normalize_part_code, normalize_plate};
pub use synonyms::{expand_variants, synonym_table};
