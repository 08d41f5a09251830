use std::ops::{Add, AddAssign};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{Classifier, Contribution, Event, MatchId, MetricId, PlayerId, RosterLookup, Yards};

/// Success and attempt counters of one metric.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Tally {
    pub success: u64,
    pub total: u64,
    /// Accumulated travel of attempts with known positions, in thousandths
    /// of a yard.
    pub travel_millis: u64,
    /// Number of attempts with known positions.
    pub travelled: u64,
}

impl Tally {
    pub fn new(success: u64, total: u64) -> Tally {
        debug_assert!(success <= total);
        Tally {
            success,
            total,
            ..Tally::default()
        }
    }

    #[inline]
    fn record(&mut self, contribution: &Contribution) {
        self.total += 1;
        if contribution.success {
            self.success += 1;
        }
        if let Some(travel) = contribution.travel {
            self.travel_millis += travel.to_millis();
            self.travelled += 1;
        }
    }

    /// Unsmoothed success ratio, undefined without attempts.
    pub fn ratio(self) -> Option<f64> {
        (self.total > 0).then(|| self.success as f64 / self.total as f64)
    }

    /// Average travel of attempts with known positions.
    pub fn mean_travel(self) -> Option<Yards> {
        (self.travelled > 0)
            .then(|| Yards(Yards::from_millis(self.travel_millis).0 / self.travelled as f64))
    }
}

impl Add for Tally {
    type Output = Tally;

    #[inline]
    fn add(self, rhs: Tally) -> Tally {
        Tally {
            success: self.success + rhs.success,
            total: self.total + rhs.total,
            travel_millis: self.travel_millis + rhs.travel_millis,
            travelled: self.travelled + rhs.travelled,
        }
    }
}

impl AddAssign for Tally {
    #[inline]
    fn add_assign(&mut self, rhs: Tally) {
        *self = *self + rhs;
    }
}

fn add_tallies(into: &mut Vec<Tally>, from: &[Tally]) {
    if into.len() < from.len() {
        into.resize(from.len(), Tally::default());
    }
    for (into, from) in into.iter_mut().zip(from) {
        *into += *from;
    }
}

/// Cumulative counters of one player over all ingested events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CareerAggregate {
    tallies: Vec<Tally>,
    matches: FxHashSet<MatchId>,
}

impl CareerAggregate {
    fn new(num_metrics: usize) -> CareerAggregate {
        CareerAggregate {
            tallies: vec![Tally::default(); num_metrics],
            matches: FxHashSet::default(),
        }
    }

    pub fn tally(&self, MetricId(id): MetricId) -> Tally {
        self.tallies.get(id).copied().unwrap_or_default()
    }

    /// Number of distinct matches with at least one qualifying event.
    pub fn games_played(&self) -> u32 {
        self.matches.len() as u32
    }

    pub fn matches(&self) -> &FxHashSet<MatchId> {
        &self.matches
    }

    fn merge(&mut self, other: CareerAggregate) {
        add_tallies(&mut self.tallies, &other.tallies);
        self.matches.extend(other.matches);
    }
}

/// Counters of data quality conditions met during ingestion.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct IngestStats {
    pub events: u64,
    /// Events without player or match id.
    pub missing_ids: u64,
    /// Events of players not found in the roster.
    pub unknown_players: u64,
    /// Events not qualifying as an appearance for this rating.
    pub not_appearing: u64,
    pub contributions: u64,
}

impl AddAssign for IngestStats {
    fn add_assign(&mut self, rhs: IngestStats) {
        self.events += rhs.events;
        self.missing_ids += rhs.missing_ids;
        self.unknown_players += rhs.unknown_players;
        self.not_appearing += rhs.not_appearing;
        self.contributions += rhs.contributions;
    }
}

/// Career and per-match aggregates of all players, once ingestion is
/// complete.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregates {
    num_metrics: usize,
    careers: FxHashMap<PlayerId, CareerAggregate>,
    per_match: FxHashMap<(PlayerId, MatchId), Vec<Tally>>,
    stats: IngestStats,
}

impl Aggregates {
    pub fn new(num_metrics: usize) -> Aggregates {
        Aggregates {
            num_metrics,
            ..Aggregates::default()
        }
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    pub fn num_players(&self) -> usize {
        self.careers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.careers.is_empty()
    }

    pub fn career(&self, player: PlayerId) -> Option<&CareerAggregate> {
        self.careers.get(&player)
    }

    /// Counters of a metric in a single match. Only kept for metrics
    /// flagged as per-match.
    pub fn match_tally(&self, player: PlayerId, match_id: MatchId, MetricId(id): MetricId) -> Tally {
        self.per_match
            .get(&(player, match_id))
            .and_then(|tallies| tallies.get(id))
            .copied()
            .unwrap_or_default()
    }

    /// Per-match counters of a metric, one per match the player appeared
    /// in, in ascending match order.
    pub fn match_tallies(&self, player: PlayerId, metric: MetricId) -> Vec<Tally> {
        let mut matches: Vec<MatchId> = self
            .careers
            .get(&player)
            .map(|career| career.matches.iter().copied().collect())
            .unwrap_or_default();
        matches.sort_unstable();
        matches
            .into_iter()
            .map(|match_id| self.match_tally(player, match_id, metric))
            .collect()
    }

    /// Players with a career aggregate, in ascending id order.
    pub fn players(&self) -> Vec<PlayerId> {
        let mut players: Vec<PlayerId> = self.careers.keys().copied().collect();
        players.sort_unstable();
        players
    }

    /// Adds another partial aggregate key by key. Merging is associative
    /// and commutative, so shards can be combined in any order.
    pub fn merge(&mut self, other: Aggregates) {
        self.num_metrics = self.num_metrics.max(other.num_metrics);
        for (player, career) in other.careers {
            match self.careers.get_mut(&player) {
                Some(existing) => existing.merge(career),
                None => {
                    self.careers.insert(player, career);
                }
            }
        }
        for (key, tallies) in other.per_match {
            add_tallies(self.per_match.entry(key).or_default(), &tallies);
        }
        self.stats += other.stats;
    }
}

/// Accumulates events of one shard into [`Aggregates`].
pub struct Aggregator<'a, R: ?Sized> {
    classifier: &'a Classifier,
    roster: &'a R,
    per_match: Vec<bool>,
    aggregates: Aggregates,
}

impl<'a, R: RosterLookup + ?Sized> Aggregator<'a, R> {
    pub fn new(classifier: &'a Classifier, roster: &'a R) -> Aggregator<'a, R> {
        Aggregator {
            classifier,
            roster,
            per_match: classifier.metrics().iter().map(|m| m.per_match).collect(),
            aggregates: Aggregates::new(classifier.num_metrics()),
        }
    }

    pub fn ingest(&mut self, event: &Event) {
        let stats = &mut self.aggregates.stats;
        stats.events += 1;

        // Providers write 0 for ids they do not know.
        let player = event.player.filter(|&PlayerId(id)| id != 0);
        let match_id = event.match_id.filter(|&MatchId(id)| id != 0);
        let (Some(player), Some(match_id)) = (player, match_id) else {
            stats.missing_ids += 1;
            return;
        };

        if !self.roster.contains(player) {
            stats.unknown_players += 1;
            return;
        }

        if !self.classifier.is_appearance(event) {
            stats.not_appearing += 1;
            return;
        }

        let num_metrics = self.classifier.num_metrics();
        let career = self
            .aggregates
            .careers
            .entry(player)
            .or_insert_with(|| CareerAggregate::new(num_metrics));
        career.matches.insert(match_id);

        for contribution in self.classifier.classify(event) {
            let MetricId(id) = contribution.metric;
            career.tallies[id].record(&contribution);
            stats.contributions += 1;

            if self.per_match[id] {
                self.aggregates
                    .per_match
                    .entry((player, match_id))
                    .or_insert_with(|| vec![Tally::default(); num_metrics])[id]
                    .record(&contribution);
            }
        }
    }

    pub fn ingest_all<'e, I>(&mut self, events: I)
    where
        I: IntoIterator<Item = &'e Event>,
    {
        for event in events {
            self.ingest(event);
        }
    }

    pub fn finish(self) -> Aggregates {
        self.aggregates
    }
}
