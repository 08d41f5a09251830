use crate::{Event, EventFilter, MetricDefinition, MetricId, Yards};

/// A single event's contribution to one metric.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Contribution {
    pub metric: MetricId,
    pub success: bool,
    pub travel: Option<Yards>,
}

/// Maps events to metric contributions. Classification is a pure function
/// of the event and the configured metrics.
#[derive(Debug, Clone)]
pub struct Classifier {
    metrics: Vec<MetricDefinition>,
    appearance: EventFilter,
}

impl Classifier {
    pub fn new(metrics: Vec<MetricDefinition>, appearance: EventFilter) -> Classifier {
        Classifier {
            metrics,
            appearance,
        }
    }

    pub fn metrics(&self) -> &[MetricDefinition] {
        &self.metrics
    }

    pub fn metric(&self, MetricId(id): MetricId) -> &MetricDefinition {
        &self.metrics[id]
    }

    pub fn num_metrics(&self) -> usize {
        self.metrics.len()
    }

    pub fn find(&self, name: &str) -> Option<MetricId> {
        self.metrics
            .iter()
            .position(|metric| &*metric.name == name)
            .map(MetricId)
    }

    /// Whether the event qualifies as an appearance of its player, i.e.
    /// whether its match counts towards games played.
    pub fn is_appearance(&self, event: &Event) -> bool {
        self.appearance.matches(event)
    }

    pub fn classify<'a>(&'a self, event: &'a Event) -> impl Iterator<Item = Contribution> + 'a {
        let travel = event.travel();
        self.metrics
            .iter()
            .enumerate()
            .filter(move |(_, metric)| metric.attempt.matches(event))
            .map(move |(id, metric)| Contribution {
                metric: MetricId(id),
                success: metric
                    .success
                    .as_ref()
                    .is_some_and(|success| success.matches(event)),
                travel,
            })
    }
}
