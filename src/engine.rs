use rayon::prelude::*;
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use crate::{
    component::CompiledFeature,
    composite::{raw_scores, scale_components, Candidate, Weighting},
    normalize::RawScore,
    Aggregates, Aggregator, Classifier, CompositeStrategy, ConfigError, Event, GamesTerm,
    MetricId, PeerGrouping, PeerNormalizer, RatingConfig, RatingRecord, RatingTable, RosterLookup,
    SortKey,
};

struct Component {
    name: Box<str>,
    feature: CompiledFeature,
    weighting: Weighting,
}

/// Validated rating configuration, bound to the roster of a run.
pub struct RatingEngine<'a, R: ?Sized> {
    name: Box<str>,
    classifier: Classifier,
    components: Vec<Component>,
    strategy: CompositeStrategy,
    games_term: Option<GamesTerm>,
    peer_grouping: PeerGrouping,
    normalizer: PeerNormalizer,
    min_games: u32,
    required_metric: Option<MetricId>,
    sort: SortKey,
    roster: &'a R,
}

impl<'a, R: RosterLookup + ?Sized> RatingEngine<'a, R> {
    pub fn new(config: RatingConfig, roster: &'a R) -> Result<RatingEngine<'a, R>, ConfigError> {
        let mut names = FxHashSet::default();
        for metric in &config.metrics {
            if !names.insert(&*metric.name) {
                return Err(ConfigError::DuplicateMetric(metric.name.clone()));
            }
        }

        if config.components.is_empty() {
            return Err(ConfigError::NoComponents);
        }

        let classifier = Classifier::new(config.metrics, config.appearance);

        let mut component_names = FxHashSet::default();
        let mut components = Vec::with_capacity(config.components.len());
        for spec in config.components {
            if !component_names.insert(spec.name.clone()) {
                return Err(ConfigError::DuplicateComponent(spec.name));
            }
            if !spec.weight.is_finite() {
                return Err(ConfigError::NonFiniteWeight(spec.name));
            }
            if !spec.scale.is_valid() {
                return Err(ConfigError::InvalidScale(spec.name));
            }
            let feature = spec.feature.compile(&spec.name, &classifier)?;
            components.push(Component {
                feature,
                weighting: Weighting {
                    weight: spec.weight,
                    scale: spec.scale,
                },
                name: spec.name,
            });
        }

        if let CompositeStrategy::Standardized { prior_games } = config.strategy {
            if !(prior_games >= 0.0 && prior_games.is_finite()) {
                return Err(ConfigError::InvalidStrategy);
            }
        }
        if let Some(term) = &config.games_term {
            if !term.is_valid() {
                return Err(ConfigError::InvalidGamesTerm);
            }
        }

        let required_metric = match config.required_metric {
            Some(name) => Some(
                classifier
                    .find(&name)
                    .ok_or(ConfigError::UnknownRequiredMetric(name))?,
            ),
            None => None,
        };

        Ok(RatingEngine {
            name: config.name,
            normalizer: config.normalizer.build()?,
            classifier,
            components,
            strategy: config.strategy,
            games_term: config.games_term,
            peer_grouping: config.peer_grouping,
            min_games: config.min_games.max(1),
            required_metric,
            sort: config.sort,
            roster,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn component_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.components.iter().map(|component| &*component.name)
    }

    pub fn aggregator(&self) -> Aggregator<'_, R> {
        Aggregator::new(&self.classifier, self.roster)
    }

    pub fn aggregate<'e, I>(&self, events: I) -> Aggregates
    where
        I: IntoIterator<Item = &'e Event>,
    {
        let mut aggregator = self.aggregator();
        aggregator.ingest_all(events);
        let aggregates = aggregator.finish();
        log_stats(&self.name, &aggregates);
        aggregates
    }

    /// Aggregates independent shards (typically one per source file) in
    /// parallel, then merges the partial results.
    pub fn par_aggregate<S>(&self, shards: &[S]) -> Aggregates
    where
        S: AsRef<[Event]> + Sync,
        R: Sync,
    {
        let aggregates = shards
            .par_iter()
            .map(|shard| {
                let mut aggregator = self.aggregator();
                aggregator.ingest_all(shard.as_ref());
                aggregator.finish()
            })
            .reduce(
                || Aggregates::new(self.classifier.num_metrics()),
                |mut left, right| {
                    left.merge(right);
                    left
                },
            );
        log_stats(&self.name, &aggregates);
        aggregates
    }

    /// Scores every eligible player. An empty aggregate yields an empty
    /// table.
    pub fn rate(&self, aggregates: &Aggregates) -> RatingTable {
        let mut table = RatingTable::new(&self.name, self.component_names().map(Box::from).collect());

        let mut candidates = Vec::new();
        let mut ineligible = 0usize;
        for player in aggregates.players() {
            let (Some(career), Some(info)) = (aggregates.career(player), self.roster.player(player))
            else {
                continue;
            };
            let games = career.games_played();
            let required = self
                .required_metric
                .map_or(true, |metric| career.tally(metric).total > 0);
            if games < self.min_games || !required {
                ineligible += 1;
                continue;
            }
            candidates.push(Candidate {
                player,
                peer_group: self.peer_grouping.group_of(info),
                games,
                components: self
                    .components
                    .iter()
                    .map(|component| component.feature.evaluate(aggregates, player, career))
                    .collect(),
            });
        }

        debug!(rating = %self.name, candidates = candidates.len(), ineligible, "eligibility");
        if candidates.is_empty() {
            warn!(rating = %self.name, "no eligible players");
            return table;
        }

        // Raw component values are reported, scaled ones are scored.
        let raw_components: Vec<Vec<f64>> = candidates.iter().map(|c| c.components.clone()).collect();
        let weightings: Vec<Weighting> = self.components.iter().map(|c| c.weighting).collect();
        scale_components(&weightings, &mut candidates);
        let raw = raw_scores(self.strategy, &weightings, self.games_term.as_ref(), &candidates);

        let scores: Vec<RawScore<'_>> = candidates
            .iter()
            .zip(&raw)
            .map(|(candidate, &raw)| RawScore {
                peer_group: &candidate.peer_group,
                raw,
                games: candidate.games,
            })
            .collect();
        let ratings = self.normalizer.normalize(&scores);

        table.records = candidates
            .into_iter()
            .zip(raw_components)
            .zip(ratings)
            .map(|((candidate, components), final_score)| RatingRecord {
                name: self
                    .roster
                    .player(candidate.player)
                    .map(|info| info.name.clone())
                    .unwrap_or_default(),
                player: candidate.player,
                peer_group: candidate.peer_group,
                games_played: candidate.games,
                components,
                final_score,
            })
            .collect();
        table.sort_by(self.sort);

        info!(rating = %self.name, players = table.len(), "rated");
        table
    }

    pub fn run<'e, I>(&self, events: I) -> RatingTable
    where
        I: IntoIterator<Item = &'e Event>,
    {
        self.rate(&self.aggregate(events))
    }
}

fn log_stats(name: &str, aggregates: &Aggregates) {
    let stats = aggregates.stats();
    info!(
        rating = name,
        events = stats.events,
        players = aggregates.num_players(),
        contributions = stats.contributions,
        "aggregated"
    );
    if stats.missing_ids > 0 {
        warn!(rating = name, count = stats.missing_ids, "skipped events without player or match id");
    }
    if stats.unknown_players > 0 {
        warn!(rating = name, count = stats.unknown_players, "skipped events of unknown players");
    }
    debug!(rating = name, count = stats.not_appearing, "events outside appearance filter");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ComponentSpec, EventFilter, Feature, MatchId, MetricDefinition, PlayerId, PlayerInfo,
        Prior, Roster, TagId,
    };

    fn config() -> RatingConfig {
        RatingConfig {
            name: "test".into(),
            metrics: vec![MetricDefinition::ratio(
                "duel",
                EventFilter::event("Duel"),
                EventFilter::tag(TagId::ACCURATE),
            )
            .per_match()],
            appearance: EventFilter::Any,
            components: vec![
                ComponentSpec::new("accuracy", Feature::ratio("duel", Prior::new(0.4, 20.0)), 1.0),
                ComponentSpec::new("consistency", Feature::consistency("duel"), 0.5),
            ],
            strategy: CompositeStrategy::WeightedSum,
            games_term: None,
            peer_grouping: PeerGrouping::Global,
            normalizer: Default::default(),
            min_games: 1,
            required_metric: None,
            sort: SortKey::ScoreDescending,
        }
    }

    #[test]
    fn test_invalid_configs() {
        let roster = Roster::new();

        let mut duplicate = config();
        duplicate.metrics.push(duplicate.metrics[0].clone());
        assert!(matches!(
            RatingEngine::new(duplicate, &roster),
            Err(ConfigError::DuplicateMetric(_))
        ));

        let mut weight = config();
        weight.components[0].weight = f64::NAN;
        assert!(matches!(
            RatingEngine::new(weight, &roster),
            Err(ConfigError::NonFiniteWeight(_))
        ));

        let mut unknown = config();
        unknown.components.push(ComponentSpec::new("shots", Feature::per_game("shot"), 1.0));
        assert!(matches!(
            RatingEngine::new(unknown, &roster),
            Err(ConfigError::UnknownMetric { .. })
        ));

        let mut required = config();
        required.required_metric = Some("shot".into());
        assert!(matches!(
            RatingEngine::new(required, &roster),
            Err(ConfigError::UnknownRequiredMetric(_))
        ));

        let mut anchor = config();
        anchor.normalizer.anchor_weight = -0.1;
        assert!(matches!(
            RatingEngine::new(anchor, &roster),
            Err(ConfigError::InvalidNormalizer(_))
        ));
    }

    #[test]
    fn test_empty_source() {
        let roster = Roster::new();
        let engine = RatingEngine::new(config(), &roster).unwrap();
        let table = engine.run(std::iter::empty());
        assert!(table.is_empty());
        assert_eq!(table.component_names.len(), 2);
    }

    #[test]
    fn test_parallel_equals_sequential() {
        let roster: Roster = (1..=4)
            .map(|id| (PlayerId(id), PlayerInfo { name: format!("P{id}"), ..PlayerInfo::default() }))
            .collect();
        let engine = RatingEngine::new(config(), &roster).unwrap();

        let shards: Vec<Vec<Event>> = (0..3u64)
            .map(|shard| {
                (0..40u64)
                    .map(|i| {
                        let event = Event::new(
                            Some(PlayerId(1 + (i + shard) % 4)),
                            Some(MatchId(shard * 10 + i % 3 + 1)),
                            "Duel",
                            "Ground defending duel",
                        );
                        if (i * 7 + shard) % 3 == 0 {
                            event.with_tags([TagId::ACCURATE])
                        } else {
                            event
                        }
                    })
                    .collect()
            })
            .collect();

        let sequential = engine.aggregate(shards.iter().flatten());
        let parallel = engine.par_aggregate(&shards);
        assert_eq!(sequential, parallel);
        assert_eq!(engine.rate(&sequential), engine.rate(&parallel));
    }
}
