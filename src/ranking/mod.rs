//! Ranking strategies: popularity ordering, questionnaire profile matching
//! and note-overlap similarity.
//!
//! All three are pure functions over catalog snapshots and the interaction
//! log. Nothing here is persisted; rankings are derived on every call.

pub mod profile_match;
pub mod similar;

pub use profile_match::{match_catalog, project, ProfileMatch};
pub use similar::{similar_to, similarity_score, SimilarPerfume};

use crate::core::{Perfume, ScentProfile};
use crate::interactions::InteractionLog;

/// How a catalog subset should be ordered
#[derive(Debug, Clone, Copy)]
pub enum RankMode<'a> {
    /// Descending derived popularity
    Popularity,
    /// Ascending distance to a questionnaire profile
    Profile(&'a ScentProfile),
    /// Descending similarity to a reference perfume, at most k results
    SimilarTo(&'a Perfume, usize),
}

/// Order a filtered catalog subset by the given mode.
///
/// This is the plain-sequence entry point; callers that need distances or
/// similarity scores use [`match_catalog`] and [`similar_to`] directly.
pub fn rank(perfumes: Vec<Perfume>, log: &InteractionLog, mode: RankMode<'_>) -> Vec<Perfume> {
    match mode {
        RankMode::Popularity => rank_by_popularity(perfumes, log),
        RankMode::Profile(profile) => match_catalog(profile, perfumes, log)
            .into_iter()
            .map(|matched| matched.perfume)
            .collect(),
        RankMode::SimilarTo(reference, k) => similar_to(reference, &perfumes, log, k)
            .into_iter()
            .map(|similar| similar.perfume)
            .collect(),
    }
}

/// Order perfumes by derived popularity, most popular first.
///
/// Ties break on name ascending, then id ascending, so the ordering is
/// total and stable across runs.
pub fn rank_by_popularity(mut perfumes: Vec<Perfume>, log: &InteractionLog) -> Vec<Perfume> {
    let scores = log.score_all();
    perfumes.sort_by(|a, b| {
        let score_a = scores.get(&a.id).copied().unwrap_or(0);
        let score_b = scores.get(&b.id).copied().unwrap_or(0);
        score_b
            .cmp(&score_a)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
    perfumes
}
