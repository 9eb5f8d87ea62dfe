//! Append-only interaction log and the popularity scores derived from it.
//!
//! Popularity is never stored. It is recomputed from the full event history
//! on demand, so replaying the same log always yields the same scores.

use std::collections::HashMap;

use crate::core::{InteractionEvent, InteractionKind};

#[derive(Debug, Clone, Default)]
pub struct InteractionLog {
    events: Vec<InteractionEvent>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn from_events(events: Vec<InteractionEvent>) -> Self {
        Self { events }
    }

    /// Append one event. The log never rejects or rewrites history.
    pub fn record(&mut self, event: InteractionEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[InteractionEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Popularity of one perfume: the weighted sum of its events
    pub fn score_of(&self, perfume_id: &str) -> u32 {
        self.events
            .iter()
            .filter(|event| event.perfume_id == perfume_id)
            .map(|event| event.kind.weight())
            .sum()
    }

    /// Popularity of every perfume seen in the log, in one pass.
    /// Ids without events are absent; treat them as score zero.
    pub fn score_all(&self) -> HashMap<String, u32> {
        let mut scores: HashMap<String, u32> = HashMap::new();
        for event in &self.events {
            *scores.entry(event.perfume_id.clone()).or_insert(0) += event.kind.weight();
        }
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(perfume_id: &str, kind: InteractionKind) -> InteractionEvent {
        InteractionEvent::new(perfume_id, kind)
    }

    #[test]
    fn test_weighted_popularity() {
        let log = InteractionLog::from_events(vec![
            event("p1", InteractionKind::View),
            event("p1", InteractionKind::View),
            event("p1", InteractionKind::Click),
            event("p1", InteractionKind::AddToInventory),
        ]);
        // 1 + 1 + 2 + 5
        assert_eq!(log.score_of("p1"), 9);
    }

    #[test]
    fn test_score_of_unknown_id_is_zero() {
        let log = InteractionLog::new();
        assert_eq!(log.score_of("nope"), 0);
    }

    #[test]
    fn test_score_all_agrees_with_score_of() {
        let log = InteractionLog::from_events(vec![
            event("p1", InteractionKind::Favorite),
            event("p2", InteractionKind::View),
            event("p1", InteractionKind::Click),
        ]);
        let all = log.score_all();
        assert_eq!(all.get("p1").copied(), Some(log.score_of("p1")));
        assert_eq!(all.get("p2").copied(), Some(log.score_of("p2")));
        assert_eq!(all.get("p3"), None);
    }

    #[test]
    fn test_recording_only_increases_scores() {
        let mut log = InteractionLog::new();
        let mut last = 0;
        for kind in InteractionKind::ALL {
            log.record(event("p1", kind));
            let score = log.score_of("p1");
            assert!(score > last);
            last = score;
        }
        assert_eq!(log.len(), 4);
    }
}
