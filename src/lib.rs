//! Composite player ratings from tagged football match events.
//!
//! Events are classified into metrics, accumulated into per-player career
//! and per-match aggregates, turned into smoothed features, combined into
//! a raw composite score and finally normalized against peers onto a
//! `0.0..=100.0` scale:
//!
//! ```
//! use pitchrate::{RatingConfig, RatingEngine, RatingKind, Roster};
//!
//! let roster = Roster::new();
//! let engine = RatingEngine::new(RatingConfig::preset(RatingKind::Tackling), &roster)?;
//! let table = engine.run(std::iter::empty());
//! assert!(table.is_empty());
//! # Ok::<_, pitchrate::ConfigError>(())
//! ```

mod aggregate;
mod classify;
mod component;
mod composite;
mod config;
mod engine;
pub mod estimate;
mod event;
mod filter;
mod metric;
mod moments;
mod normalize;
mod presets;
mod rating;
mod roster;
mod table;

pub use aggregate::{Aggregates, Aggregator, CareerAggregate, IngestStats, Tally};
pub use classify::{Classifier, Contribution};
pub use component::{ComponentSpec, Feature, Scale};
pub use composite::{CompositeStrategy, GamesTerm};
pub use config::{ConfigError, NormalizerConfig, RatingConfig, RatingKind, UnknownRatingKind};
pub use engine::RatingEngine;
pub use estimate::{consistency, smooth, Prior};
pub use event::{Event, MatchId, PlayerId, Point, TagId, TeamId, Yards, PITCH_LENGTH, PITCH_WIDTH};
pub use filter::EventFilter;
pub use metric::{MetricDefinition, MetricId};
pub use moments::Moments;
pub use normalize::{PeerNormalizer, PeerNormalizerBuilder, RawScore, Rescale};
pub use rating::Rating;
pub use roster::{InvalidRole, PeerGroup, PeerGrouping, PlayerInfo, Role, Roster, RosterLookup};
pub use table::{InvalidSortKey, RatingRecord, RatingTable, ReportRenderer, SortKey};
