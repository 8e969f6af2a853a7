//! Cycle-scoped topic bus.
//!
//! The bus is the only channel between pipeline stages: producers and
//! enrichers append ID batches to named topics, downstream stages read them.
//! A bus is built fresh for every cycle (and for every retry attempt of the
//! produce/enrich phase), so no state leaks across cycles or across failed
//! attempts.

use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use catalog_indexer_shared::Watermark;

/// Write-once-per-stage key/value relay between pipeline stages within one
/// cycle. Owned exclusively by the orchestrator; stages receive it by
/// reference.
#[derive(Debug)]
pub struct TopicBus {
    /// The watermark committed by the previous cycle; producers filter
    /// against this, never against the in-flight candidate.
    previous_watermark: Watermark,
    topics: HashMap<&'static str, Vec<Vec<Uuid>>>,
}

impl TopicBus {
    /// Create an empty bus for a new cycle.
    pub fn new(previous_watermark: Watermark) -> Self {
        Self {
            previous_watermark,
            topics: HashMap::new(),
        }
    }

    /// The watermark committed by the previous cycle.
    pub fn previous_watermark(&self) -> Watermark {
        self.previous_watermark
    }

    /// Append a batch of IDs to a topic. Empty batches are dropped so that
    /// "no topic entry" stays the single representation of "no work".
    pub fn append(&mut self, topic: &'static str, ids: Vec<Uuid>) {
        if ids.is_empty() {
            return;
        }
        self.topics.entry(topic).or_default().push(ids);
    }

    /// All batches appended to a topic this cycle, in append order.
    pub fn batches(&self, topic: &str) -> &[Vec<Uuid>] {
        self.topics.get(topic).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The deduplicated union of every batch on a topic, preserving
    /// first-seen order. This is the changed-ID set a merger works from.
    pub fn collect_unique(&self, topic: &str) -> Vec<Uuid> {
        let mut seen = HashSet::new();
        self.batches(topic)
            .iter()
            .flatten()
            .filter(|id| seen.insert(**id))
            .copied()
            .collect()
    }

    /// Whether nothing was appended to a topic this cycle.
    pub fn is_empty(&self, topic: &str) -> bool {
        self.batches(topic).is_empty()
    }
}
