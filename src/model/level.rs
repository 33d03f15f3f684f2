/// Level and remaining experience derived from a player's experience points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progression {
    pub level: i64,
    pub until_next_level: i64,
}

impl Progression {
    /// `level = floor((sqrt(2500 + 200 * xp) - 50) / 100)` and the experience
    /// still needed to reach `level + 1`.
    ///
    /// The square root is taken in `f64`; the integer results match the
    /// closed form exactly across the whole valid experience range.
    pub fn from_experience(experience: i64) -> Self {
        let root = (2500.0 + 200.0 * experience as f64).sqrt();
        let level = ((root - 50.0) / 100.0).floor() as i64;
        let until_next_level = 50 * (level + 1) * (level + 2) - experience;

        Self {
            level,
            until_next_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_player_is_level_zero() {
        assert_eq!(
            Progression::from_experience(0),
            Progression {
                level: 0,
                until_next_level: 100
            }
        );
    }

    #[test]
    fn known_values() {
        assert_eq!(Progression::from_experience(750).level, 3);
        assert_eq!(Progression::from_experience(750).until_next_level, 250);
        assert_eq!(Progression::from_experience(99).level, 0);
        assert_eq!(Progression::from_experience(100).level, 1);
        assert_eq!(Progression::from_experience(300).level, 2);
        assert_eq!(Progression::from_experience(10_000_000).level, 446);
    }

    #[test]
    fn thresholds_land_exactly_on_the_next_level() {
        for level in 0..=446_i64 {
            let threshold = 50 * level * (level + 1);
            let progression = Progression::from_experience(threshold);
            assert_eq!(progression.level, level, "threshold {threshold}");
            if threshold > 0 {
                assert_eq!(Progression::from_experience(threshold - 1).level, level - 1);
            }
        }
    }

    #[test]
    fn monotone_and_never_negative_remaining() {
        let mut previous = 0;
        for experience in (0..=10_000_000_i64).step_by(997).chain([10_000_000]) {
            let progression = Progression::from_experience(experience);
            assert!(progression.level >= previous);
            assert!(progression.until_next_level > 0);
            previous = progression.level;
        }
    }
}
