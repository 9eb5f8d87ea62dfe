//! Note-overlap similarity: find catalog entries that smell like a
//! reference perfume.

use std::collections::HashSet;

use crate::core::{Perfume, ScentType};
use crate::interactions::InteractionLog;

/// A candidate scored against the reference perfume
#[derive(Debug, Clone)]
pub struct SimilarPerfume {
    pub perfume: Perfume,
    pub score: u32,
}

/// Score how alike two perfumes are.
///
/// Shared notes count per pyramid tier, weighted top 3 / heart 2 / base 1,
/// plus 3 for a shared classified scent family and 2 for compatible
/// genders. Unclassified never counts as a shared family.
pub fn similarity_score(a: &Perfume, b: &Perfume) -> u32 {
    let mut score = 3 * tier_overlap(&a.top_notes, &b.top_notes)
        + 2 * tier_overlap(&a.heart_notes, &b.heart_notes)
        + tier_overlap(&a.base_notes, &b.base_notes);

    if a.scent_type == b.scent_type && a.scent_type != ScentType::Unclassified {
        score += 3;
    }
    if a.gender.compatible_with(b.gender) {
        score += 2;
    }
    score
}

/// The candidates most similar to `reference`, best first, at most `k`.
///
/// The reference itself and zero-score candidates are dropped. Ties on
/// score break on popularity descending, then id ascending.
pub fn similar_to(
    reference: &Perfume,
    candidates: &[Perfume],
    log: &InteractionLog,
    k: usize,
) -> Vec<SimilarPerfume> {
    let popularity = log.score_all();
    let mut scored: Vec<SimilarPerfume> = candidates
        .iter()
        .filter(|candidate| candidate.id != reference.id)
        .map(|candidate| SimilarPerfume {
            score: similarity_score(reference, candidate),
            perfume: candidate.clone(),
        })
        .filter(|similar| similar.score > 0)
        .collect();
    scored.sort_by(|a, b| {
        let pop_a = popularity.get(&a.perfume.id).copied().unwrap_or(0);
        let pop_b = popularity.get(&b.perfume.id).copied().unwrap_or(0);
        b.score
            .cmp(&a.score)
            .then_with(|| pop_b.cmp(&pop_a))
            .then_with(|| a.perfume.id.cmp(&b.perfume.id))
    });
    scored.truncate(k);
    scored
}

/// Distinct shared notes between two tiers, case-insensitive
fn tier_overlap(a: &[String], b: &[String]) -> u32 {
    let normalize = |notes: &[String]| -> HashSet<String> {
        notes
            .iter()
            .map(|note| note.trim().to_lowercase())
            .filter(|note| !note.is_empty())
            .collect()
    };
    normalize(a).intersection(&normalize(b)).count() as u32
}
