use crate::error::{Result, ScentEngineError};

/// Names of the five questionnaire axes, in answer order
pub const AXES: [&str; 5] = ["intensity", "warmth", "sweetness", "occasion", "character"];

/// A user's scent preferences: five bipolar axes, each 1-5.
///
/// Axis poles: Subtle-Strong, Fresh-Warm, Dry-Sweet, Daily-Evening,
/// Feminine-Masculine. Built from one questionnaire pass and consumed
/// once; submissions are independent and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScentProfile {
    pub intensity: u8,
    pub warmth: u8,
    pub sweetness: u8,
    pub occasion: u8,
    pub character: u8,
}

impl ScentProfile {
    /// Validate raw questionnaire answers, in `AXES` order.
    ///
    /// Out-of-range values are rejected at this boundary, never coerced.
    pub fn from_answers(answers: [i64; 5]) -> Result<Self> {
        for (axis, &value) in AXES.iter().zip(answers.iter()) {
            if !(1..=5).contains(&value) {
                return Err(ScentEngineError::InvalidAnswer { axis, value });
            }
        }
        Ok(Self {
            intensity: answers[0] as u8,
            warmth: answers[1] as u8,
            sweetness: answers[2] as u8,
            occasion: answers[3] as u8,
            character: answers[4] as u8,
        })
    }

    /// Axis values in `AXES` order
    pub fn as_array(&self) -> [u8; 5] {
        [
            self.intensity,
            self.warmth,
            self.sweetness,
            self.occasion,
            self.character,
        ]
    }

    /// Sum of absolute per-axis differences against a projected vector.
    ///
    /// Each axis differs by at most 4, so the result lies in [0, 20].
    pub fn distance_to(&self, projection: [u8; 5]) -> u8 {
        self.as_array()
            .iter()
            .zip(projection.iter())
            .map(|(a, b)| a.abs_diff(*b))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_answers_valid() {
        let profile = ScentProfile::from_answers([2, 1, 3, 1, 3]).unwrap();
        assert_eq!(profile.as_array(), [2, 1, 3, 1, 3]);
    }

    #[test]
    fn test_from_answers_rejects_out_of_range() {
        let err = ScentProfile::from_answers([2, 1, 6, 1, 3]).unwrap_err();
        match err {
            ScentEngineError::InvalidAnswer { axis, value } => {
                assert_eq!(axis, "sweetness");
                assert_eq!(value, 6);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(ScentProfile::from_answers([0, 1, 1, 1, 1]).is_err());
        assert!(ScentProfile::from_answers([1, 1, 1, 1, -2]).is_err());
    }

    #[test]
    fn test_distance_bounds() {
        let low = ScentProfile::from_answers([1, 1, 1, 1, 1]).unwrap();
        let high = ScentProfile::from_answers([5, 5, 5, 5, 5]).unwrap();
        assert_eq!(low.distance_to(high.as_array()), 20);
        assert_eq!(low.distance_to(low.as_array()), 0);
        assert_eq!(high.distance_to([3, 3, 3, 3, 3]), 10);
    }
}
