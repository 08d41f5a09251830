use std::{fmt, str::FromStr};

use ordered_float::OrderedFloat;
use serde::Deserialize;
use thiserror::Error;

use crate::{PeerGroup, PlayerId, Rating};

#[derive(Debug, Clone, PartialEq)]
pub struct RatingRecord {
    pub player: PlayerId,
    pub name: String,
    pub peer_group: PeerGroup,
    pub games_played: u32,
    /// Raw component values, in the order of
    /// [`RatingTable::component_names`].
    pub components: Vec<f64>,
    pub final_score: Rating,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    ScoreDescending,
    NameAscending,
    PlayerId,
}

#[derive(Debug, Error)]
#[error("invalid sort key")]
pub struct InvalidSortKey;

impl FromStr for SortKey {
    type Err = InvalidSortKey;

    fn from_str(s: &str) -> Result<SortKey, InvalidSortKey> {
        Ok(match s {
            "score" => SortKey::ScoreDescending,
            "name" => SortKey::NameAscending,
            "player" | "id" => SortKey::PlayerId,
            _ => return Err(InvalidSortKey),
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            SortKey::ScoreDescending => "score",
            SortKey::NameAscending => "name",
            SortKey::PlayerId => "player",
        })
    }
}

/// Ratings of one kind, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RatingTable {
    pub name: Box<str>,
    pub component_names: Vec<Box<str>>,
    pub records: Vec<RatingRecord>,
}

impl RatingTable {
    pub fn new(name: &str, component_names: Vec<Box<str>>) -> RatingTable {
        RatingTable {
            name: name.into(),
            component_names,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, player: PlayerId) -> Option<&RatingRecord> {
        self.records.iter().find(|record| record.player == player)
    }

    /// Sorts records. The sort is stable, so ties keep their current order.
    pub fn sort_by(&mut self, key: SortKey) {
        match key {
            SortKey::ScoreDescending => self
                .records
                .sort_by_key(|record| OrderedFloat(-record.final_score.0)),
            SortKey::NameAscending => self.records.sort_by(|a, b| a.name.cmp(&b.name)),
            SortKey::PlayerId => self.records.sort_by_key(|record| record.player),
        }
    }
}

/// Output surface for rating tables.
pub trait ReportRenderer {
    type Error;

    fn render(&mut self, table: &RatingTable) -> Result<(), Self::Error>;
}
