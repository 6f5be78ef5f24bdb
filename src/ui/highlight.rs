//! Per-index highlights fed by buffer observer events
//!
//! Each event marks the slots it touched with a [`Highlight`] that fades
//! after a fixed lifetime (100 ms for plain accesses, 200 ms for compares
//! and writes). A live mark is only replaced by one of equal or higher
//! priority, so a write stays visible while the following reads go by.

use crate::buffer::BufferEvent;
use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};

/// Which buffer a mark belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Primary,
    Scratch,
}

/// Ordered by display priority, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Highlight {
    Access,
    Compare,
    Change,
}

impl Highlight {
    pub fn lifetime(self) -> Duration {
        match self {
            Highlight::Access => Duration::from_millis(100),
            Highlight::Compare | Highlight::Change => Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Default)]
pub struct Highlights {
    marks: FxHashMap<(Pane, usize), (Highlight, Instant)>,
}

impl Highlights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record<T>(&mut self, pane: Pane, event: &BufferEvent<T>, now: Instant) {
        match event {
            BufferEvent::Access { index, .. } => self.mark(pane, *index, Highlight::Access, now),
            BufferEvent::Change { index, .. } => self.mark(pane, *index, Highlight::Change, now),
            BufferEvent::Compare { a, b, .. } => {
                self.mark(pane, *a, Highlight::Compare, now);
                if let Some(b) = b {
                    self.mark(pane, *b, Highlight::Compare, now);
                }
            }
        }
    }

    fn mark(&mut self, pane: Pane, index: usize, kind: Highlight, now: Instant) {
        let entry = self.marks.entry((pane, index)).or_insert((kind, now));
        let (current, since) = *entry;
        let live = now.duration_since(since) < current.lifetime();
        if !live || kind >= current {
            *entry = (kind, now);
        }
    }

    /// The live mark on `index`, if any
    pub fn get(&self, pane: Pane, index: usize, now: Instant) -> Option<Highlight> {
        self.marks
            .get(&(pane, index))
            .filter(|(kind, since)| now.duration_since(*since) < kind.lifetime())
            .map(|(kind, _)| *kind)
    }

    /// Forget every faded mark
    pub fn expire(&mut self, now: Instant) {
        self.marks
            .retain(|_, (kind, since)| now.duration_since(*since) < kind.lifetime());
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_fades_before_change() {
        let start = Instant::now();
        let mut marks = Highlights::new();
        marks.record(Pane::Primary, &BufferEvent::Access { index: 0, value: Some(1) }, start);
        marks.record(
            Pane::Primary,
            &BufferEvent::Change { index: 1, old: Some(1), new: Some(2) },
            start,
        );

        let later = start + Duration::from_millis(150);
        assert_eq!(marks.get(Pane::Primary, 0, later), None);
        assert_eq!(marks.get(Pane::Primary, 1, later), Some(Highlight::Change));

        marks.expire(later);
        assert_eq!(marks.len(), 1);
    }

    #[test]
    fn test_live_change_not_downgraded() {
        let start = Instant::now();
        let mut marks = Highlights::new();
        marks.record(
            Pane::Scratch,
            &BufferEvent::Change { index: 3, old: None, new: Some(9) },
            start,
        );
        marks.record(Pane::Scratch, &BufferEvent::Access { index: 3, value: Some(9) }, start);
        assert_eq!(marks.get(Pane::Scratch, 3, start), Some(Highlight::Change));
        assert_eq!(marks.get(Pane::Primary, 3, start), None);
    }

    #[test]
    fn test_compare_marks_both_operands() {
        let now = Instant::now();
        let mut marks = Highlights::new();
        marks.record(
            Pane::Primary,
            &BufferEvent::Compare { a: 2, b: Some(5), value_a: Some(1), value_b: Some(0) },
            now,
        );
        assert_eq!(marks.get(Pane::Primary, 2, now), Some(Highlight::Compare));
        assert_eq!(marks.get(Pane::Primary, 5, now), Some(Highlight::Compare));
    }
}
