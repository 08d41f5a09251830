use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{component::Scale, Moments, PeerGroup, PlayerId};

/// How scaled component values are combined into a raw score.
#[derive(Debug, Copy, Clone, PartialEq, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompositeStrategy {
    /// Weighted sum of scaled component values.
    #[default]
    WeightedSum,
    /// Weighted sum of component z-scores across all candidates, each
    /// multiplied by `games / (games + prior_games)` so that short careers
    /// are pulled towards the population mean.
    Standardized { prior_games: f64 },
}

/// Reward for playing time: `penalty` below `min_games`, then growing
/// linearly up to `max_bonus` at `full_effect_games`.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct GamesTerm {
    pub min_games: u32,
    pub penalty: f64,
    pub full_effect_games: u32,
    pub max_bonus: f64,
    #[serde(default = "unit_weight")]
    pub weight: f64,
}

fn unit_weight() -> f64 {
    1.0
}

impl GamesTerm {
    pub fn value(&self, games: u32) -> f64 {
        if games < self.min_games {
            self.penalty
        } else if games >= self.full_effect_games {
            self.max_bonus
        } else {
            self.max_bonus * f64::from(games) / f64::from(self.full_effect_games)
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.penalty.is_finite()
            && self.max_bonus.is_finite()
            && self.weight.is_finite()
            && self.full_effect_games > 0
    }
}

/// A player that passed eligibility, with raw component values in
/// component order.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub player: PlayerId,
    pub peer_group: PeerGroup,
    pub games: u32,
    pub components: Vec<f64>,
}

/// Weight and scale of one component, as seen by the scorer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Weighting {
    pub weight: f64,
    pub scale: Scale,
}

/// Applies component scales in place.
pub fn scale_components(weightings: &[Weighting], candidates: &mut [Candidate]) {
    for (k, weighting) in weightings.iter().enumerate() {
        match weighting.scale {
            Scale::Identity => (),
            Scale::Fixed { denominator } => {
                for candidate in candidates.iter_mut() {
                    candidate.components[k] /= denominator;
                }
            }
            Scale::Capped { cap, denominator } => {
                for candidate in candidates.iter_mut() {
                    candidate.components[k] = candidate.components[k].min(cap) / denominator;
                }
            }
            Scale::PopulationMax => {
                let max = candidates
                    .iter()
                    .map(|c| c.components[k])
                    .fold(0.0, f64::max);
                for candidate in candidates.iter_mut() {
                    candidate.components[k] = ratio_to_max(candidate.components[k], max);
                }
            }
            Scale::PeerMax => {
                let mut maxima: FxHashMap<PeerGroup, f64> = FxHashMap::default();
                for candidate in candidates.iter() {
                    let max = maxima.entry(candidate.peer_group.clone()).or_insert(0.0);
                    *max = max.max(candidate.components[k]);
                }
                for candidate in candidates.iter_mut() {
                    let max = maxima.get(&candidate.peer_group).copied().unwrap_or(0.0);
                    candidate.components[k] = ratio_to_max(candidate.components[k], max);
                }
            }
        }
    }
}

fn ratio_to_max(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        value / max
    } else {
        0.0
    }
}

/// Raw composite score of each candidate, in candidate order. Components
/// must already be scaled.
pub fn raw_scores(
    strategy: CompositeStrategy,
    weightings: &[Weighting],
    games_term: Option<&GamesTerm>,
    candidates: &[Candidate],
) -> Vec<f64> {
    let mut scores: Vec<f64> = match strategy {
        CompositeStrategy::WeightedSum => candidates
            .iter()
            .map(|candidate| {
                weightings
                    .iter()
                    .zip(&candidate.components)
                    .map(|(weighting, value)| weighting.weight * value)
                    .sum()
            })
            .collect(),
        CompositeStrategy::Standardized { prior_games } => {
            let columns: Vec<Moments> = (0..weightings.len())
                .map(|k| {
                    let column: Vec<f64> = candidates.iter().map(|c| c.components[k]).collect();
                    Moments::of(&column)
                })
                .collect();
            candidates
                .iter()
                .map(|candidate| {
                    let games = f64::from(candidate.games);
                    let reliability = games / (games + prior_games);
                    weightings
                        .iter()
                        .zip(&columns)
                        .zip(&candidate.components)
                        .map(|((weighting, moments), value)| {
                            // No spread means every candidate sits at the mean.
                            let spread = if moments.std_dev > 0.0 { moments.std_dev } else { 1.0 };
                            weighting.weight * (value - moments.mean) / spread * reliability
                        })
                        .sum()
                })
                .collect()
        }
    };

    if let Some(term) = games_term {
        for (score, candidate) in scores.iter_mut().zip(candidates) {
            *score += term.weight * term.value(candidate.games);
        }
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(player: u64, group: &str, games: u32, components: &[f64]) -> Candidate {
        Candidate {
            player: PlayerId(player),
            peer_group: PeerGroup(group.into()),
            games,
            components: components.to_vec(),
        }
    }

    #[test]
    fn test_games_term() {
        let term = GamesTerm {
            min_games: 5,
            penalty: -0.25,
            full_effect_games: 30,
            max_bonus: 0.3,
            weight: 0.3,
        };
        assert_eq!(term.value(4), -0.25);
        assert!((term.value(15) - 0.15).abs() < 1e-12);
        assert_eq!(term.value(30), 0.3);
        assert_eq!(term.value(80), 0.3);
    }

    #[test]
    fn test_scales() {
        let weightings = [
            Weighting { weight: 1.0, scale: Scale::Fixed { denominator: 5.0 } },
            Weighting { weight: 1.0, scale: Scale::Capped { cap: 6.0, denominator: 5.0 } },
            Weighting { weight: 1.0, scale: Scale::PopulationMax },
            Weighting { weight: 1.0, scale: Scale::PeerMax },
        ];
        let mut candidates = vec![
            candidate(1, "DF", 10, &[2.5, 9.0, 4.0, 1.0]),
            candidate(2, "DF", 10, &[5.0, 3.0, 2.0, 2.0]),
            candidate(3, "FW", 10, &[0.0, 0.0, 0.0, 0.0]),
        ];
        scale_components(&weightings, &mut candidates);
        assert_eq!(candidates[0].components, [0.5, 1.2, 1.0, 0.5]);
        assert_eq!(candidates[1].components, [1.0, 0.6, 0.5, 1.0]);
        // A peer group where nobody has any volume.
        assert_eq!(candidates[2].components, [0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_weighted_sum() {
        let weightings = [
            Weighting { weight: 0.6, scale: Scale::Identity },
            Weighting { weight: -0.1, scale: Scale::Identity },
        ];
        let term = GamesTerm {
            min_games: 5,
            penalty: -0.2,
            full_effect_games: 50,
            max_bonus: 0.7,
            weight: 1.0,
        };
        let candidates = [candidate(1, "All", 3, &[0.5, 1.0]), candidate(2, "All", 25, &[1.0, 0.0])];
        let scores = raw_scores(CompositeStrategy::WeightedSum, &weightings, Some(&term), &candidates);
        assert!((scores[0] - (0.3 - 0.1 - 0.2)).abs() < 1e-12);
        assert!((scores[1] - (0.6 + 0.35)).abs() < 1e-12);
    }

    #[test]
    fn test_standardized() {
        let weightings = [Weighting { weight: 1.0, scale: Scale::Identity }];
        let candidates = [
            candidate(1, "All", 15, &[1.0]),
            candidate(2, "All", 15, &[3.0]),
            candidate(3, "All", 45, &[3.0]),
        ];
        let scores = raw_scores(
            CompositeStrategy::Standardized { prior_games: 15.0 },
            &weightings,
            None,
            &candidates,
        );
        let mean = 7.0 / 3.0;
        let std_dev = ((4.0 / 3.0f64).powi(2) + 2.0 * (2.0 / 3.0f64).powi(2)) / 2.0;
        let std_dev = std_dev.sqrt();
        assert!((scores[0] - (1.0 - mean) / std_dev * 0.5).abs() < 1e-12);
        assert!((scores[1] - (3.0 - mean) / std_dev * 0.5).abs() < 1e-12);
        assert!((scores[2] - (3.0 - mean) / std_dev * 0.75).abs() < 1e-12);
        assert!(scores[2] > scores[1]);

        // Without spread, everybody is average.
        let flat = [candidate(1, "All", 15, &[2.0]), candidate(2, "All", 15, &[2.0])];
        let scores = raw_scores(
            CompositeStrategy::Standardized { prior_games: 15.0 },
            &weightings,
            None,
            &flat,
        );
        assert_eq!(scores, [0.0, 0.0]);
    }
}
