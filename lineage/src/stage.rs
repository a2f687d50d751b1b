//! The closed set of processing stages and their one safe order (spec §4.10).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, EnumCount)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Analysis,
    Restoration,
    GainStaging,
    Eq,
    Dynamics,
    Limiting,
    Stereo,
    Dither,
    FormatConversion,
}

/// The single safe ordering every processing chain is validated against.
pub const SAFE_ORDER: [Stage; Stage::COUNT] = [
    Stage::Analysis,
    Stage::Restoration,
    Stage::GainStaging,
    Stage::Eq,
    Stage::Dynamics,
    Stage::Limiting,
    Stage::Stereo,
    Stage::Dither,
    Stage::FormatConversion,
];

/// Stages that must never appear more than once in a chain.
pub const NON_REPEATABLE: [Stage; 3] = [Stage::Limiting, Stage::Dither, Stage::FormatConversion];

impl Stage {
    /// This stage's position in [`SAFE_ORDER`].
    #[must_use]
    pub fn order_index(self) -> usize {
        SAFE_ORDER.iter().position(|&s| s == self).expect("SAFE_ORDER covers every Stage variant")
    }

    #[must_use]
    pub fn is_non_repeatable(self) -> bool {
        NON_REPEATABLE.contains(&self)
    }
}

/// Sorts a multiset of stages into [`SAFE_ORDER`] order, stably. A
/// permutation of the input, never a dedup.
#[must_use]
pub fn build_optimal_order(stages: &[Stage]) -> Vec<Stage> {
    let mut sorted = stages.to_vec();
    sorted.sort_by_key(|stage| stage.order_index());
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_stage_appears_exactly_once_in_safe_order() {
        use strum::IntoEnumIterator;
        for stage in Stage::iter() {
            assert_eq!(SAFE_ORDER.iter().filter(|&&s| s == stage).count(), 1);
        }
    }

    #[test]
    fn build_optimal_order_sorts_into_safe_order() {
        let input = vec![Stage::Limiting, Stage::Analysis, Stage::Eq];
        assert_eq!(build_optimal_order(&input), vec![Stage::Analysis, Stage::Eq, Stage::Limiting]);
    }

    #[test]
    fn build_optimal_order_is_idempotent() {
        let input = vec![Stage::Dither, Stage::GainStaging, Stage::Dynamics];
        let once = build_optimal_order(&input);
        let twice = build_optimal_order(&once);
        assert_eq!(once, twice);
    }
}
