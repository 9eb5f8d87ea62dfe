//! Questionnaire matching: project each perfume onto the five preference
//! axes and rank the catalog by distance to the user's profile.

use crate::core::{Gender, Perfume, ScentProfile};
use crate::interactions::InteractionLog;

/// Greatest possible profile distance: five axes, four apart each
pub const MAX_DISTANCE: u8 = 20;

/// Accord keywords that push an axis above the midpoint. A perfume's
/// vocabulary entry counts once per axis when it contains any keyword.
const INTENSITY_HIGH: [&str; 8] = [
    "oriental", "leather", "wood", "intense", "strong", "amber", "oud", "spicy",
];
const INTENSITY_LOW: [&str; 6] = ["fresh", "citrus", "green", "light", "soft", "delicate"];

const WARMTH_HIGH: [&str; 9] = [
    "oriental", "gourmand", "wood", "warm", "intense", "amber", "vanilla", "spicy", "musk",
];
const WARMTH_LOW: [&str; 6] = ["fresh", "citrus", "green", "aquatic", "marine", "ozonic"];

const SWEETNESS_HIGH: [&str; 7] = [
    "gourmand", "floral", "sweet", "vanilla", "fruity", "honey", "caramel",
];
const SWEETNESS_LOW: [&str; 7] = ["green", "wood", "fresh", "dry", "leather", "smoky", "herbal"];

/// One catalog entry scored against a questionnaire profile
#[derive(Debug, Clone)]
pub struct ProfileMatch {
    pub perfume: Perfume,
    /// Manhattan distance between the perfume projection and the profile
    pub distance: u8,
    /// Inverted distance, so bigger means better
    pub score: u8,
}

/// Project a perfume onto the five questionnaire axes.
///
/// The three scent axes start at the midpoint and move one step per
/// matched vocabulary entry, up and down, before clamping to 1-5. The
/// occasion axis leans on the day/night profile and the character axis is
/// the gender classification alone.
pub fn project(perfume: &Perfume) -> [u8; 5] {
    let vocabulary = perfume.accord_vocabulary();
    let axis = |high: &[&str], low: &[&str]| -> u8 {
        let highs = count_matches(&vocabulary, high);
        let lows = count_matches(&vocabulary, low);
        clamp_axis(3 + highs - lows)
    };

    let intensity = axis(&INTENSITY_HIGH, &INTENSITY_LOW);
    let warmth = axis(&WARMTH_HIGH, &WARMTH_LOW);
    let sweetness = axis(&SWEETNESS_HIGH, &SWEETNESS_LOW);
    let occasion = clamp_axis(3 + perfume.occasion.night as i64 - perfume.occasion.day as i64);
    let character = match perfume.gender {
        Gender::Female => 1,
        Gender::Unisex => 3,
        Gender::Male => 5,
    };

    [intensity, warmth, sweetness, occasion, character]
}

/// Rank a catalog snapshot against a profile, best match first.
///
/// Ties on distance break on popularity descending, then id ascending.
pub fn match_catalog(
    profile: &ScentProfile,
    perfumes: Vec<Perfume>,
    log: &InteractionLog,
) -> Vec<ProfileMatch> {
    let popularity = log.score_all();
    let mut matches: Vec<ProfileMatch> = perfumes
        .into_iter()
        .map(|perfume| {
            let distance = profile.distance_to(project(&perfume));
            ProfileMatch {
                distance,
                score: MAX_DISTANCE - distance,
                perfume,
            }
        })
        .collect();
    matches.sort_by(|a, b| {
        let pop_a = popularity.get(&a.perfume.id).copied().unwrap_or(0);
        let pop_b = popularity.get(&b.perfume.id).copied().unwrap_or(0);
        a.distance
            .cmp(&b.distance)
            .then_with(|| pop_b.cmp(&pop_a))
            .then_with(|| a.perfume.id.cmp(&b.perfume.id))
    });
    matches
}

/// Vocabulary entries containing at least one keyword
fn count_matches(vocabulary: &[String], keywords: &[&str]) -> i64 {
    vocabulary
        .iter()
        .filter(|entry| keywords.iter().any(|keyword| entry.contains(*keyword)))
        .count() as i64
}

fn clamp_axis(value: i64) -> u8 {
    value.clamp(1, 5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Accord, InteractionEvent, InteractionKind, OccasionProfile, ScentType};

    fn fresh_aquatic() -> Perfume {
        let mut perfume = Perfume::new("p_aqua", "Sea Mist", "Acqua");
        perfume.main_accords = vec![
            Accord::new("fresh", 1.0),
            Accord::new("aquatic", 0.9),
            Accord::new("fruity", 0.8),
        ];
        perfume.scent_type = ScentType::Aquatic;
        perfume.gender = Gender::Unisex;
        perfume.occasion = OccasionProfile { day: 5, night: 3 };
        perfume
    }

    fn intense_oriental() -> Perfume {
        let mut perfume = Perfume::new("p_orient", "Dusk", "Noir");
        perfume.main_accords = vec![
            Accord::new("oriental", 1.0),
            Accord::new("spicy", 0.9),
            Accord::new("woody", 0.8),
            Accord::new("leather", 0.7),
        ];
        perfume.scent_type = ScentType::Oriental;
        perfume.gender = Gender::Female;
        perfume.occasion = OccasionProfile { day: 1, night: 5 };
        perfume
    }

    #[test]
    fn test_neutral_perfume_projects_to_midpoints() {
        let perfume = Perfume::new("p1", "Plain", "None");
        assert_eq!(project(&perfume), [3, 3, 3, 3, 3]);
    }

    #[test]
    fn test_fresh_aquatic_projection() {
        assert_eq!(project(&fresh_aquatic()), [2, 1, 3, 1, 3]);
    }

    #[test]
    fn test_intense_oriental_projection() {
        assert_eq!(project(&intense_oriental()), [5, 5, 1, 5, 1]);
    }

    #[test]
    fn test_match_orders_by_distance() {
        let profile = ScentProfile::from_answers([5, 5, 1, 5, 1]).unwrap();
        let log = InteractionLog::new();
        let matches = match_catalog(&profile, vec![fresh_aquatic(), intense_oriental()], &log);

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].perfume.id, "p_orient");
        assert_eq!(matches[0].distance, 0);
        assert_eq!(matches[0].score, MAX_DISTANCE);
        assert_eq!(matches[1].perfume.id, "p_aqua");
        assert_eq!(matches[1].distance, 15);
        assert_eq!(matches[1].score, 5);
    }

    #[test]
    fn test_distance_ties_break_on_popularity_then_id() {
        let first = Perfume::new("p_b", "Twin", "Brand");
        let second = Perfume::new("p_a", "Twin", "Brand");
        let profile = ScentProfile::from_answers([3, 3, 3, 3, 3]).unwrap();

        let quiet = InteractionLog::new();
        let matches = match_catalog(&profile, vec![first.clone(), second.clone()], &quiet);
        let ids: Vec<&str> = matches.iter().map(|m| m.perfume.id.as_str()).collect();
        assert_eq!(ids, vec!["p_a", "p_b"]);

        let log = InteractionLog::from_events(vec![InteractionEvent::new(
            "p_b",
            InteractionKind::View,
        )]);
        let matches = match_catalog(&profile, vec![first, second], &log);
        let ids: Vec<&str> = matches.iter().map(|m| m.perfume.id.as_str()).collect();
        assert_eq!(ids, vec!["p_b", "p_a"]);
    }
}
