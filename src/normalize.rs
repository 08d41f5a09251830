use rustc_hash::FxHashMap;
use serde::Deserialize;
use tracing::debug;

use crate::{Moments, PeerGroup, Rating};

/// How raw composite scores are mapped onto the rating scale.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rescale {
    /// Standardize against the (anchored) statistics of the peer group.
    #[default]
    PeerZScore,
    /// The raw score is already standardized: `target_mean + target_spread
    /// * raw`.
    Direct,
}

#[derive(Debug, Clone)]
pub struct PeerNormalizerBuilder {
    target_mean: f64,
    target_spread: f64,
    anchor_weight: f64,
    shrinkage: f64,
    rescale: Rescale,
}

impl Default for PeerNormalizerBuilder {
    fn default() -> PeerNormalizerBuilder {
        PeerNormalizerBuilder::new()
    }
}

impl PeerNormalizerBuilder {
    pub fn new() -> PeerNormalizerBuilder {
        PeerNormalizerBuilder {
            target_mean: 65.0,
            target_spread: 10.0,
            anchor_weight: 0.0,
            shrinkage: 0.0,
            rescale: Rescale::PeerZScore,
        }
    }

    pub fn target_mean(&mut self, target_mean: f64) -> &mut Self {
        assert!((Rating::MIN.0..=Rating::MAX.0).contains(&target_mean));
        self.target_mean = target_mean;
        self
    }

    pub fn target_spread(&mut self, target_spread: f64) -> &mut Self {
        assert!(target_spread >= 0.0 && target_spread.is_finite());
        self.target_spread = target_spread;
        self
    }

    /// Weight given to the global statistics when blending them with the
    /// peer group's.
    pub fn anchor_weight(&mut self, anchor_weight: f64) -> &mut Self {
        assert!((0.0..=1.0).contains(&anchor_weight));
        self.anchor_weight = anchor_weight;
        self
    }

    /// Number of virtual games at `target_mean` mixed into every rating.
    pub fn shrinkage(&mut self, shrinkage: f64) -> &mut Self {
        assert!(shrinkage >= 0.0 && shrinkage.is_finite());
        self.shrinkage = shrinkage;
        self
    }

    pub fn rescale(&mut self, rescale: Rescale) -> &mut Self {
        self.rescale = rescale;
        self
    }

    pub fn build(&self) -> PeerNormalizer {
        PeerNormalizer {
            target_mean: self.target_mean,
            target_spread: self.target_spread,
            anchor_weight: self.anchor_weight,
            shrinkage: self.shrinkage,
            rescale: self.rescale,
        }
    }
}

/// Maps raw composite scores onto the rating scale, relative to peers, and
/// shrinks ratings of players with few games towards the target mean.
#[derive(Debug, Clone)]
pub struct PeerNormalizer {
    target_mean: f64,
    target_spread: f64,
    anchor_weight: f64,
    shrinkage: f64,
    rescale: Rescale,
}

impl Default for PeerNormalizer {
    fn default() -> PeerNormalizer {
        PeerNormalizer::new()
    }
}

/// Raw score of a single candidate, as seen by the normalizer.
#[derive(Debug, Copy, Clone)]
pub struct RawScore<'a> {
    pub peer_group: &'a PeerGroup,
    pub raw: f64,
    pub games: u32,
}

impl PeerNormalizer {
    pub fn builder() -> PeerNormalizerBuilder {
        PeerNormalizerBuilder::default()
    }

    pub fn new() -> PeerNormalizer {
        PeerNormalizer::builder().build()
    }

    pub fn target_mean(&self) -> f64 {
        self.target_mean
    }

    pub fn target_spread(&self) -> f64 {
        self.target_spread
    }

    pub fn anchor_weight(&self) -> f64 {
        self.anchor_weight
    }

    pub fn shrinkage(&self) -> f64 {
        self.shrinkage
    }

    pub fn rescale(&self) -> Rescale {
        self.rescale
    }

    /// Final ratings, in input order.
    pub fn normalize(&self, scores: &[RawScore<'_>]) -> Vec<Rating> {
        let normalized: Vec<f64> = match self.rescale {
            Rescale::Direct => scores
                .iter()
                .map(|score| self.clamp(self.target_mean + self.target_spread * score.raw))
                .collect(),
            Rescale::PeerZScore => self.peer_z_scores(scores),
        };

        scores
            .iter()
            .zip(normalized)
            .map(|(score, normalized)| self.shrink(normalized, score.games))
            .collect()
    }

    fn peer_z_scores(&self, scores: &[RawScore<'_>]) -> Vec<f64> {
        let all: Vec<f64> = scores.iter().map(|score| score.raw).collect();
        let global = Moments::of(&all);

        let mut groups: FxHashMap<&PeerGroup, Vec<f64>> = FxHashMap::default();
        for score in scores {
            groups.entry(score.peer_group).or_default().push(score.raw);
        }
        let group_moments: FxHashMap<&PeerGroup, Moments> = groups
            .into_iter()
            .map(|(group, raws)| {
                let moments = Moments::of(&raws);
                debug!(
                    peer_group = %group,
                    size = moments.count,
                    mean = moments.mean,
                    std_dev = moments.std_dev,
                    "peer group"
                );
                (group, moments)
            })
            .collect();

        scores
            .iter()
            .map(|score| match group_moments.get(score.peer_group) {
                Some(moments) if moments.count >= 2 => {
                    let anchored = moments.blend(global, self.anchor_weight);
                    self.clamp(self.target_mean + self.target_spread * anchored.z_score(score.raw))
                }
                // Lone members have nobody to be compared with.
                _ => self.target_mean,
            })
            .collect()
    }

    fn clamp(&self, value: f64) -> f64 {
        Rating::clamped_or(value, Rating(self.target_mean)).0
    }

    fn shrink(&self, normalized: f64, games: u32) -> Rating {
        let games = f64::from(games);
        if games + self.shrinkage <= 0.0 {
            return Rating(normalized);
        }
        Rating::clamped_or(
            (games * normalized + self.shrinkage * self.target_mean) / (games + self.shrinkage),
            Rating(self.target_mean),
        )
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn group(name: &str) -> PeerGroup {
        PeerGroup(name.into())
    }

    #[test]
    fn test_lone_member_gets_target_mean() {
        let normalizer = PeerNormalizer::new();
        let gk = group("GK");
        let ratings = normalizer.normalize(&[RawScore { peer_group: &gk, raw: 0.93, games: 30 }]);
        assert_eq!(ratings, [Rating(65.0)]);
    }

    #[test]
    fn test_empty() {
        assert!(PeerNormalizer::new().normalize(&[]).is_empty());
    }

    #[test]
    fn test_peer_z_score() {
        let normalizer = PeerNormalizer::new();
        let df = group("DF");
        let ratings = normalizer.normalize(&[
            RawScore { peer_group: &df, raw: 1.0, games: 10 },
            RawScore { peer_group: &df, raw: 3.0, games: 10 },
        ]);
        // Sample standard deviation of [1, 3] is sqrt(2).
        let z = 1.0 / 2.0f64.sqrt();
        assert!((ratings[0].0 - (65.0 - 10.0 * z)).abs() < 1e-9);
        assert!((ratings[1].0 - (65.0 + 10.0 * z)).abs() < 1e-9);
    }

    #[test]
    fn test_anchoring() {
        let normalizer = PeerNormalizer::builder().anchor_weight(0.2).build();
        let df = group("DF");
        let fw = group("FW");
        let ratings = normalizer.normalize(&[
            RawScore { peer_group: &df, raw: 1.0, games: 10 },
            RawScore { peer_group: &df, raw: 3.0, games: 10 },
            RawScore { peer_group: &fw, raw: 5.0, games: 10 },
            RawScore { peer_group: &fw, raw: 7.0, games: 10 },
        ]);
        let global = Moments::of(&[1.0, 3.0, 5.0, 7.0]);
        let anchored_mean = 0.8 * 2.0 + 0.2 * global.mean;
        let anchored_sd = 0.8 * 2.0f64.sqrt() + 0.2 * global.std_dev;
        let expected = 65.0 + 10.0 * (3.0 - anchored_mean) / anchored_sd;
        assert!((ratings[1].0 - expected).abs() < 1e-9);
    }

    #[test]
    fn test_shrinkage() {
        let normalizer = PeerNormalizer::builder().shrinkage(20.0).build();
        let gk = group("GK");
        let df = group("DF");
        let ratings = normalizer.normalize(&[
            RawScore { peer_group: &gk, raw: 0.5, games: 10 },
            RawScore { peer_group: &df, raw: 0.0, games: 20 },
            RawScore { peer_group: &df, raw: 1.0, games: 20 },
        ]);
        assert_eq!(ratings[0], Rating(65.0));
        let normalized = 65.0 + 10.0 / 2.0f64.sqrt();
        assert!((ratings[2].0 - (20.0 * normalized + 20.0 * 65.0) / 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_direct() {
        let normalizer = PeerNormalizer::builder().rescale(Rescale::Direct).build();
        let all = group("All");
        let ratings = normalizer.normalize(&[
            RawScore { peer_group: &all, raw: 0.8, games: 5 },
            RawScore { peer_group: &all, raw: 9.0, games: 5 },
        ]);
        assert!((ratings[0].0 - 73.0).abs() < 1e-9);
        assert_eq!(ratings[1], Rating::MAX);
    }

    #[test]
    #[should_panic]
    fn test_invalid_anchor_weight() {
        PeerNormalizer::builder().anchor_weight(1.5);
    }

    proptest! {
        #[test]
        fn prop_ratings_are_bounded(
            raws in prop::collection::vec((-1e6f64..1e6, 0u32..100, 0usize..3), 0..40),
            anchor_weight in 0.0f64..=1.0,
            shrinkage in 0.0f64..50.0,
        ) {
            let groups = [group("DF"), group("MD"), group("FW")];
            let scores: Vec<RawScore<'_>> = raws
                .iter()
                .map(|&(raw, games, g)| RawScore { peer_group: &groups[g], raw, games })
                .collect();
            let normalizer = PeerNormalizer::builder()
                .anchor_weight(anchor_weight)
                .shrinkage(shrinkage)
                .build();
            for rating in normalizer.normalize(&scores) {
                prop_assert!(rating.is_valid());
            }
        }

        #[test]
        fn prop_more_games_move_away_from_target(
            normalized in 0.0f64..=100.0,
            games in 1u32..200,
            shrinkage in 0.1f64..50.0,
        ) {
            let normalizer = PeerNormalizer::builder().shrinkage(shrinkage).build();
            let fewer = normalizer.shrink(normalized, games).0;
            let more = normalizer.shrink(normalized, games + 1).0;
            prop_assert!((more - 65.0).abs() >= (fewer - 65.0).abs() - 1e-9);
            prop_assert!((more - normalized).abs() <= (fewer - normalized).abs() + 1e-9);
        }
    }
}
