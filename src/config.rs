use std::{fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    ComponentSpec, CompositeStrategy, EventFilter, GamesTerm, MetricDefinition, PeerGrouping,
    PeerNormalizer, Rescale, SortKey,
};

/// The rating families with a built-in preset.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingKind {
    Passing,
    Crossing,
    LongPassing,
    Tackling,
    Creativity,
    Pace,
}

impl RatingKind {
    pub const ALL: [RatingKind; 6] = [
        RatingKind::Passing,
        RatingKind::Crossing,
        RatingKind::LongPassing,
        RatingKind::Tackling,
        RatingKind::Creativity,
        RatingKind::Pace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RatingKind::Passing => "passing",
            RatingKind::Crossing => "crossing",
            RatingKind::LongPassing => "long_passing",
            RatingKind::Tackling => "tackling",
            RatingKind::Creativity => "creativity",
            RatingKind::Pace => "pace",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown rating kind")]
pub struct UnknownRatingKind;

impl FromStr for RatingKind {
    type Err = UnknownRatingKind;

    fn from_str(s: &str) -> Result<RatingKind, UnknownRatingKind> {
        RatingKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.replace('-', "_"))
            .ok_or(UnknownRatingKind)
    }
}

impl fmt::Display for RatingKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of the peer normalizer, as they appear in configuration
/// files.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    pub target_mean: f64,
    pub target_spread: f64,
    /// Weight of the global statistics blended into each peer group's.
    pub anchor_weight: f64,
    /// Virtual games at the target mean mixed into every rating.
    pub shrinkage: f64,
    pub rescale: Rescale,
}

impl Default for NormalizerConfig {
    fn default() -> NormalizerConfig {
        NormalizerConfig {
            target_mean: 65.0,
            target_spread: 10.0,
            anchor_weight: 0.0,
            shrinkage: 0.0,
            rescale: Rescale::PeerZScore,
        }
    }
}

impl NormalizerConfig {
    pub fn build(&self) -> Result<PeerNormalizer, ConfigError> {
        if !(0.0..=100.0).contains(&self.target_mean) {
            return Err(ConfigError::InvalidNormalizer("target mean outside 0..=100"));
        }
        if !(self.target_spread >= 0.0 && self.target_spread.is_finite()) {
            return Err(ConfigError::InvalidNormalizer("negative target spread"));
        }
        if !(0.0..=1.0).contains(&self.anchor_weight) {
            return Err(ConfigError::InvalidNormalizer("anchor weight outside 0..=1"));
        }
        if !(self.shrinkage >= 0.0 && self.shrinkage.is_finite()) {
            return Err(ConfigError::InvalidNormalizer("negative shrinkage"));
        }
        Ok(PeerNormalizer::builder()
            .target_mean(self.target_mean)
            .target_spread(self.target_spread)
            .anchor_weight(self.anchor_weight)
            .shrinkage(self.shrinkage)
            .rescale(self.rescale)
            .build())
    }
}

/// Complete, static description of one rating type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RatingConfig {
    pub name: Box<str>,
    pub metrics: Vec<MetricDefinition>,
    /// Events that count towards games played. Events failing this filter
    /// are ignored altogether.
    #[serde(default = "any_event")]
    pub appearance: EventFilter,
    pub components: Vec<ComponentSpec>,
    #[serde(default)]
    pub strategy: CompositeStrategy,
    #[serde(default)]
    pub games_term: Option<GamesTerm>,
    #[serde(default)]
    pub peer_grouping: PeerGrouping,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    #[serde(default = "one_game")]
    pub min_games: u32,
    /// Players without a single attempt of this metric are not rated.
    #[serde(default)]
    pub required_metric: Option<Box<str>>,
    #[serde(default)]
    pub sort: SortKey,
}

fn any_event() -> EventFilter {
    EventFilter::Any
}

fn one_game() -> u32 {
    1
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("duplicate metric {0:?}")]
    DuplicateMetric(Box<str>),
    #[error("duplicate component {0:?}")]
    DuplicateComponent(Box<str>),
    #[error("component {component:?} references unknown metric {metric:?}")]
    UnknownMetric { component: Box<str>, metric: Box<str> },
    #[error("component {component:?} needs per-match counters of metric {metric:?}")]
    NotPerMatch { component: Box<str>, metric: Box<str> },
    #[error("required metric {0:?} is not defined")]
    UnknownRequiredMetric(Box<str>),
    #[error("component {0:?} has a non-finite weight")]
    NonFiniteWeight(Box<str>),
    #[error("component {0:?} has an invalid prior (weight must be positive, mean in 0..=1)")]
    InvalidPrior(Box<str>),
    #[error("component {0:?} has an invalid scale")]
    InvalidScale(Box<str>),
    #[error("invalid games term")]
    InvalidGamesTerm,
    #[error("invalid composite strategy")]
    InvalidStrategy,
    #[error("invalid normalizer: {0}")]
    InvalidNormalizer(&'static str),
    #[error("rating defines no components")]
    NoComponents,
}
