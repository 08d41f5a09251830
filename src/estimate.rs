use serde::Deserialize;

use crate::{Moments, Tally};

/// Domain-informed expectation of a success ratio, worth `weight` virtual
/// attempts.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct Prior {
    pub mean: f64,
    pub weight: f64,
}

impl Prior {
    pub const fn new(mean: f64, weight: f64) -> Prior {
        Prior { mean, weight }
    }

    pub fn smooth(self, tally: Tally) -> f64 {
        smooth(tally.success, tally.total, self.mean, self.weight)
    }
}

/// Success ratio pulled towards `prior_mean`, so that small samples yield a
/// believable estimate. Without attempts this is exactly `prior_mean`.
#[inline]
pub fn smooth(success: u64, total: u64, prior_mean: f64, prior_weight: f64) -> f64 {
    (success as f64 + prior_mean * prior_weight) / (total as f64 + prior_weight)
}

/// Stability of per-match success ratios in `[0, 1]`: one minus the
/// coefficient of variation of the ratios of all matches with attempts.
///
/// With fewer than two such matches there is not enough evidence to
/// penalize, so the result is `1.0`.
pub fn consistency<I>(per_match: I) -> f64
where
    I: IntoIterator<Item = Tally>,
{
    let ratios: Vec<f64> = per_match.into_iter().filter_map(Tally::ratio).collect();
    stability(&ratios)
}

/// Stability of per-match activity volumes in `[0, 1]`, like
/// [`consistency`], but over raw per-match values (every match counts, even
/// ones with no activity).
pub fn activity_consistency(per_match: &[f64]) -> f64 {
    stability(per_match)
}

fn stability(samples: &[f64]) -> f64 {
    let [first, rest @ ..] = samples else {
        return 1.0;
    };
    if rest.is_empty() {
        return 1.0;
    }
    if rest.iter().all(|sample| sample == first) {
        return if *first == 0.0 { 0.0 } else { 1.0 };
    }
    let moments = Moments::of(samples);
    if moments.mean == 0.0 {
        return 0.0;
    }
    (1.0 - moments.std_dev / moments.mean).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_ground_duel_scenario() {
        let prior = Prior::new(0.4, 20.0);
        let smoothed = prior.smooth(Tally::new(8, 10));
        assert!((smoothed - 16.0 / 30.0).abs() < 1e-12);

        let score = consistency([Tally::new(5, 5), Tally::new(3, 5)]);
        let expected = 1.0 - (0.08f64).sqrt() / 0.8;
        assert!((score - expected).abs() < 1e-12);
        assert!((score - 0.646).abs() < 1e-3);
    }

    #[test]
    fn test_smooth_without_attempts_is_prior() {
        assert_eq!(smooth(0, 0, 0.75, 30.0), 0.75);
        assert_eq!(Prior::new(0.4, 20.0).smooth(Tally::default()), 0.4);
    }

    #[test]
    fn test_consistency_edge_cases() {
        assert_eq!(consistency([]), 1.0);
        assert_eq!(consistency([Tally::new(1, 4)]), 1.0);
        // Matches without attempts do not count.
        assert_eq!(consistency([Tally::new(1, 4), Tally::default()]), 1.0);
        // Never successful.
        assert_eq!(consistency([Tally::new(0, 4), Tally::new(0, 2)]), 0.0);
        assert_eq!(consistency([Tally::new(1, 2), Tally::new(2, 4), Tally::new(3, 6)]), 1.0);
        // Wildly erratic.
        assert_eq!(consistency([Tally::new(0, 9), Tally::new(0, 9), Tally::new(1, 1)]), 0.0);
    }

    #[test]
    fn test_activity_consistency() {
        assert_eq!(activity_consistency(&[4.0]), 1.0);
        assert_eq!(activity_consistency(&[0.0, 0.0]), 0.0);
        assert_eq!(activity_consistency(&[3.0, 3.0, 3.0]), 1.0);
        let score = activity_consistency(&[2.0, 4.0]);
        assert!((score - (1.0 - 2.0f64.sqrt() / 3.0)).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_perfect_record_is_between_prior_and_one(
            total in 1u64..10_000,
            prior_mean in 0.0f64..0.99,
            prior_weight in 0.1f64..100.0,
        ) {
            let smoothed = smooth(total, total, prior_mean, prior_weight);
            prop_assert!(smoothed > prior_mean);
            prop_assert!(smoothed < 1.0);
        }

        #[test]
        fn prop_consistency_is_bounded(
            matches in prop::collection::vec((0u64..20, 0u64..20), 0..30),
        ) {
            let tallies = matches
                .into_iter()
                .map(|(success, extra)| Tally::new(success, success + extra));
            let score = consistency(tallies);
            prop_assert!((0.0..=1.0).contains(&score));
        }

        #[test]
        fn prop_equal_ratios_are_perfectly_consistent(
            success in 1u64..10,
            extra in 0u64..10,
            scales in prop::collection::vec(1u64..5, 2..10),
        ) {
            let tallies = scales
                .into_iter()
                .map(|scale| Tally::new(success * scale, (success + extra) * scale));
            prop_assert_eq!(consistency(tallies), 1.0);
        }
    }
}
