use std::ops::{Add, AddAssign};

use serde::Deserialize;

/// Canonical player identifier, as assigned by the data provider.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl From<PlayerId> for u64 {
    #[inline]
    fn from(PlayerId(id): PlayerId) -> u64 {
        id
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub u64);

impl From<MatchId> for u64 {
    #[inline]
    fn from(MatchId(id): MatchId) -> u64 {
        id
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u64);

impl From<TeamId> for u64 {
    #[inline]
    fn from(TeamId(id): TeamId) -> u64 {
        id
    }
}

/// Categorical annotation attached to an event, denoting an outcome or
/// context.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize)]
#[serde(transparent)]
pub struct TagId(pub u32);

impl From<TagId> for u32 {
    #[inline]
    fn from(TagId(tag): TagId) -> u32 {
        tag
    }
}

impl TagId {
    pub const GOAL: TagId = TagId(101);
    pub const OPPORTUNITY: TagId = TagId(201);
    pub const ASSIST: TagId = TagId(301);
    pub const KEY_PASS: TagId = TagId(302);
    pub const ANTICIPATED: TagId = TagId(601);
    pub const FREE_KICK: TagId = TagId(801);
    pub const THROUGH: TagId = TagId(901);
    pub const FEINT: TagId = TagId(1301);
    pub const ACCURATE: TagId = TagId(1801);
    pub const COUNTER_ATTACK: TagId = TagId(1901);
}

/// Distance on the pitch.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
pub struct Yards(pub f64);

impl From<Yards> for f64 {
    #[inline]
    fn from(Yards(yards): Yards) -> f64 {
        yards
    }
}

impl From<f64> for Yards {
    #[inline]
    fn from(yards: f64) -> Yards {
        Yards(yards)
    }
}

impl Add for Yards {
    type Output = Yards;

    #[inline]
    fn add(self, rhs: Yards) -> Yards {
        Yards(self.0 + rhs.0)
    }
}

impl AddAssign for Yards {
    #[inline]
    fn add_assign(&mut self, rhs: Yards) {
        self.0 += rhs.0;
    }
}

impl Yards {
    /// Whole thousandths of a yard. Integer units keep accumulated distances
    /// exactly independent of summation order.
    #[inline]
    pub fn to_millis(self) -> u64 {
        if self.0.is_finite() && self.0 > 0.0 {
            (self.0 * 1000.0).round() as u64
        } else {
            0
        }
    }

    #[inline]
    pub fn from_millis(millis: u64) -> Yards {
        Yards(millis as f64 / 1000.0)
    }
}

/// Pitch length in yards, corresponding to `x == 100`.
pub const PITCH_LENGTH: f64 = 120.0;

/// Pitch width in yards, corresponding to `y == 100`.
pub const PITCH_WIDTH: f64 = 80.0;

/// A location on the pitch, with both coordinates given as percentages of
/// the pitch length and width, in `0.0..=100.0`.
#[derive(Debug, Copy, Clone, PartialEq, Default, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    pub fn distance_to(self, other: Point) -> Yards {
        let dx = (other.x - self.x) * PITCH_LENGTH / 100.0;
        let dy = (other.y - self.y) * PITCH_WIDTH / 100.0;
        Yards(dx.hypot(dy))
    }

    /// Within a fifth of the pitch width from either touchline.
    pub fn is_wide(self) -> bool {
        self.y <= 20.0 || self.y >= 80.0
    }
}

/// A single tagged action, as delivered by an event source. Identifiers are
/// optional because sources may deliver incomplete records; such events
/// are skipped during aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub player: Option<PlayerId>,
    pub match_id: Option<MatchId>,
    pub team: Option<TeamId>,
    pub event_name: Box<str>,
    pub sub_event_name: Box<str>,
    tags: Box<[TagId]>,
    positions: Box<[Point]>,
}

impl Event {
    pub fn new(
        player: Option<PlayerId>,
        match_id: Option<MatchId>,
        event_name: &str,
        sub_event_name: &str,
    ) -> Event {
        Event {
            player,
            match_id,
            team: None,
            event_name: event_name.into(),
            sub_event_name: sub_event_name.into(),
            tags: Box::default(),
            positions: Box::default(),
        }
    }

    #[must_use]
    pub fn with_team(mut self, team: TeamId) -> Event {
        self.team = Some(team);
        self
    }

    #[must_use]
    pub fn with_tags<I: IntoIterator<Item = TagId>>(mut self, tags: I) -> Event {
        let mut tags: Vec<TagId> = tags.into_iter().collect();
        tags.sort_unstable();
        tags.dedup();
        self.tags = tags.into_boxed_slice();
        self
    }

    /// Sets the positions of the event. Only the first and the last point
    /// are kept.
    #[must_use]
    pub fn with_positions<I: IntoIterator<Item = Point>>(mut self, positions: I) -> Event {
        let mut positions = positions.into_iter();
        self.positions = match (positions.next(), positions.last()) {
            (Some(start), Some(end)) => vec![start, end],
            (Some(start), None) => vec![start],
            (None, _) => Vec::new(),
        }
        .into_boxed_slice();
        self
    }

    #[inline]
    pub fn has_tag(&self, tag: TagId) -> bool {
        self.tags.binary_search(&tag).is_ok()
    }

    pub fn tags(&self) -> &[TagId] {
        &self.tags
    }

    /// Recorded positions, at most two.
    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    pub fn start(&self) -> Option<Point> {
        self.positions.first().copied()
    }

    /// Distance between the first and the last position, if the event has
    /// both.
    pub fn travel(&self) -> Option<Yards> {
        match *self.positions {
            [start, end] => Some(start.distance_to(end)),
            _ => None,
        }
    }
}
