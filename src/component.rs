use serde::Deserialize;

use crate::{
    estimate::{activity_consistency, consistency},
    Aggregates, CareerAggregate, Classifier, ConfigError, MetricId, PlayerId, Prior,
};

/// A scalar feature of a player, computed from the aggregates once
/// ingestion is complete.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Feature {
    /// Smoothed success ratio.
    Ratio { metric: Box<str>, prior: Prior },
    /// One minus the smoothed success ratio.
    Turnover { metric: Box<str>, prior: Prior },
    /// Attempts per game played.
    PerGame { metric: Box<str> },
    /// Attempts of `metric` per attempt of `over`, `0.0` if there are none.
    Rate { metric: Box<str>, over: Box<str> },
    /// Average travel in yards of attempts with known positions.
    MeanTravel { metric: Box<str> },
    /// Stability of per-match success ratios.
    Consistency { metric: Box<str> },
    /// Stability of the per-match number of attempts, summed over several
    /// metrics.
    ActivityConsistency { metrics: Vec<Box<str>> },
}

/// How a feature is brought onto a comparable scale before weighting.
#[derive(Debug, Copy, Clone, PartialEq, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Scale {
    #[default]
    Identity,
    /// Divide by a fixed denominator representing full credit.
    Fixed { denominator: f64 },
    /// Cap, then divide by a fixed denominator.
    Capped { cap: f64, denominator: f64 },
    /// Divide by the maximum across all rated players.
    PopulationMax,
    /// Divide by the maximum within the player's peer group.
    PeerMax,
}

/// A named, weighted feature of a rating.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComponentSpec {
    pub name: Box<str>,
    pub feature: Feature,
    pub weight: f64,
    #[serde(default)]
    pub scale: Scale,
}

impl ComponentSpec {
    pub fn new(name: &str, feature: Feature, weight: f64) -> ComponentSpec {
        ComponentSpec {
            name: name.into(),
            feature,
            weight,
            scale: Scale::Identity,
        }
    }

    #[must_use]
    pub fn scaled(mut self, scale: Scale) -> ComponentSpec {
        self.scale = scale;
        self
    }
}

impl Feature {
    pub fn ratio(metric: &str, prior: Prior) -> Feature {
        Feature::Ratio {
            metric: metric.into(),
            prior,
        }
    }

    pub fn turnover(metric: &str, prior: Prior) -> Feature {
        Feature::Turnover {
            metric: metric.into(),
            prior,
        }
    }

    pub fn per_game(metric: &str) -> Feature {
        Feature::PerGame {
            metric: metric.into(),
        }
    }

    pub fn rate(metric: &str, over: &str) -> Feature {
        Feature::Rate {
            metric: metric.into(),
            over: over.into(),
        }
    }

    pub fn mean_travel(metric: &str) -> Feature {
        Feature::MeanTravel {
            metric: metric.into(),
        }
    }

    pub fn consistency(metric: &str) -> Feature {
        Feature::Consistency {
            metric: metric.into(),
        }
    }

    pub fn activity_consistency(metrics: &[&str]) -> Feature {
        Feature::ActivityConsistency {
            metrics: metrics.iter().map(|&metric| metric.into()).collect(),
        }
    }

    pub(crate) fn compile(
        &self,
        component: &str,
        classifier: &Classifier,
    ) -> Result<CompiledFeature, ConfigError> {
        let lookup = |metric: &str| {
            classifier
                .find(metric)
                .ok_or_else(|| ConfigError::UnknownMetric {
                    component: component.into(),
                    metric: metric.into(),
                })
        };
        let per_match = |metric: &str| {
            let id = lookup(metric)?;
            if classifier.metric(id).per_match {
                Ok(id)
            } else {
                Err(ConfigError::NotPerMatch {
                    component: component.into(),
                    metric: metric.into(),
                })
            }
        };
        let check_prior = |prior: &Prior| {
            if prior.weight > 0.0 && prior.weight.is_finite() && (0.0..=1.0).contains(&prior.mean) {
                Ok(*prior)
            } else {
                Err(ConfigError::InvalidPrior(component.into()))
            }
        };

        Ok(match self {
            Feature::Ratio { metric, prior } => CompiledFeature::Ratio(lookup(metric)?, check_prior(prior)?),
            Feature::Turnover { metric, prior } => {
                CompiledFeature::Turnover(lookup(metric)?, check_prior(prior)?)
            }
            Feature::PerGame { metric } => CompiledFeature::PerGame(lookup(metric)?),
            Feature::Rate { metric, over } => CompiledFeature::Rate(lookup(metric)?, lookup(over)?),
            Feature::MeanTravel { metric } => CompiledFeature::MeanTravel(lookup(metric)?),
            Feature::Consistency { metric } => CompiledFeature::Consistency(per_match(metric)?),
            Feature::ActivityConsistency { metrics } => CompiledFeature::ActivityConsistency(
                metrics
                    .iter()
                    .map(|metric| per_match(metric))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) enum CompiledFeature {
    Ratio(MetricId, Prior),
    Turnover(MetricId, Prior),
    PerGame(MetricId),
    Rate(MetricId, MetricId),
    MeanTravel(MetricId),
    Consistency(MetricId),
    ActivityConsistency(Vec<MetricId>),
}

impl CompiledFeature {
    pub(crate) fn evaluate(
        &self,
        aggregates: &Aggregates,
        player: PlayerId,
        career: &CareerAggregate,
    ) -> f64 {
        match self {
            CompiledFeature::Ratio(metric, prior) => prior.smooth(career.tally(*metric)),
            CompiledFeature::Turnover(metric, prior) => 1.0 - prior.smooth(career.tally(*metric)),
            CompiledFeature::PerGame(metric) => match career.games_played() {
                0 => 0.0,
                games => career.tally(*metric).total as f64 / f64::from(games),
            },
            CompiledFeature::Rate(metric, over) => match career.tally(*over).total {
                0 => 0.0,
                over => career.tally(*metric).total as f64 / over as f64,
            },
            CompiledFeature::MeanTravel(metric) => career
                .tally(*metric)
                .mean_travel()
                .map_or(0.0, f64::from),
            CompiledFeature::Consistency(metric) => {
                consistency(aggregates.match_tallies(player, *metric))
            }
            CompiledFeature::ActivityConsistency(metrics) => {
                let mut activity: Vec<f64> = Vec::new();
                for metric in metrics {
                    let tallies = aggregates.match_tallies(player, *metric);
                    activity.resize(tallies.len(), 0.0);
                    for (volume, tally) in activity.iter_mut().zip(tallies) {
                        *volume += tally.total as f64;
                    }
                }
                activity_consistency(&activity)
            }
        }
    }
}

impl Scale {
    pub(crate) fn is_valid(self) -> bool {
        match self {
            Scale::Identity | Scale::PopulationMax | Scale::PeerMax => true,
            Scale::Fixed { denominator } => denominator > 0.0 && denominator.is_finite(),
            Scale::Capped { cap, denominator } => {
                denominator > 0.0 && denominator.is_finite() && !cap.is_nan()
            }
        }
    }
}
