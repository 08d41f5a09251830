use serde::Deserialize;

use crate::{Event, TagId, Yards};

/// Predicate over a single event, used to decide which events count as an
/// attempt or a success of a metric.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventFilter {
    /// Matches every event.
    Any,
    EventName {
        name: Box<str>,
    },
    SubEventName {
        name: Box<str>,
    },
    /// Matches an `(event_name, sub_event_name)` tuple.
    Kind {
        event: Box<str>,
        sub_event: Box<str>,
    },
    Tag {
        tag: TagId,
    },
    /// Matches events with two positions at least `yards` apart.
    MinTravel {
        yards: f64,
    },
    /// Matches events with two recorded positions.
    HasTravel,
    /// Matches events starting close to a touchline.
    WideStart,
    All {
        of: Vec<EventFilter>,
    },
    AnyOf {
        of: Vec<EventFilter>,
    },
    Not {
        filter: Box<EventFilter>,
    },
}

impl EventFilter {
    pub fn event(name: &str) -> EventFilter {
        EventFilter::EventName { name: name.into() }
    }

    pub fn sub_event(name: &str) -> EventFilter {
        EventFilter::SubEventName { name: name.into() }
    }

    pub fn kind(event: &str, sub_event: &str) -> EventFilter {
        EventFilter::Kind {
            event: event.into(),
            sub_event: sub_event.into(),
        }
    }

    /// Matches any of the given `(event_name, sub_event_name)` tuples.
    pub fn kinds(kinds: &[(&str, &str)]) -> EventFilter {
        EventFilter::any_of(
            kinds
                .iter()
                .map(|&(event, sub_event)| EventFilter::kind(event, sub_event)),
        )
    }

    pub fn tag(tag: TagId) -> EventFilter {
        EventFilter::Tag { tag }
    }

    pub fn min_travel(Yards(yards): Yards) -> EventFilter {
        EventFilter::MinTravel { yards }
    }

    pub fn all<I: IntoIterator<Item = EventFilter>>(filters: I) -> EventFilter {
        EventFilter::All {
            of: filters.into_iter().collect(),
        }
    }

    pub fn any_of<I: IntoIterator<Item = EventFilter>>(filters: I) -> EventFilter {
        EventFilter::AnyOf {
            of: filters.into_iter().collect(),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(filter: EventFilter) -> EventFilter {
        EventFilter::Not {
            filter: Box::new(filter),
        }
    }

    pub fn matches(&self, event: &Event) -> bool {
        match self {
            EventFilter::Any => true,
            EventFilter::EventName { name } => event.event_name == *name,
            EventFilter::SubEventName { name } => event.sub_event_name == *name,
            EventFilter::Kind { event: e, sub_event } => {
                event.event_name == *e && event.sub_event_name == *sub_event
            }
            EventFilter::Tag { tag } => event.has_tag(*tag),
            EventFilter::MinTravel { yards } => event
                .travel()
                .is_some_and(|travel| f64::from(travel) >= *yards),
            EventFilter::HasTravel => event.travel().is_some(),
            EventFilter::WideStart => event.start().is_some_and(|start| start.is_wide()),
            EventFilter::All { of } => of.iter().all(|filter| filter.matches(event)),
            EventFilter::AnyOf { of } => of.iter().any(|filter| filter.matches(event)),
            EventFilter::Not { filter } => !filter.matches(event),
        }
    }
}
