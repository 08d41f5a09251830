use serde::Deserialize;

use crate::EventFilter;

/// A named statistic counted from events.
///
/// Every event matching `attempt` counts towards the total of the metric.
/// Events that additionally match `success` count as successes. Metrics
/// without a success predicate are pure counts (goals, fouls, ...).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricDefinition {
    pub name: Box<str>,
    pub attempt: EventFilter,
    #[serde(default)]
    pub success: Option<EventFilter>,
    /// Whether to also keep per-match counters, as needed by consistency
    /// features.
    #[serde(default)]
    pub per_match: bool,
}

impl MetricDefinition {
    pub fn ratio(name: &str, attempt: EventFilter, success: EventFilter) -> MetricDefinition {
        MetricDefinition {
            name: name.into(),
            attempt,
            success: Some(success),
            per_match: false,
        }
    }

    pub fn count(name: &str, attempt: EventFilter) -> MetricDefinition {
        MetricDefinition {
            name: name.into(),
            attempt,
            success: None,
            per_match: false,
        }
    }

    #[must_use]
    pub fn per_match(mut self) -> MetricDefinition {
        self.per_match = true;
        self
    }

    pub fn is_count(&self) -> bool {
        self.success.is_none()
    }
}

/// Position of a metric in the configured metric list.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MetricId(pub usize);

impl From<MetricId> for usize {
    #[inline]
    fn from(MetricId(id): MetricId) -> usize {
        id
    }
}
