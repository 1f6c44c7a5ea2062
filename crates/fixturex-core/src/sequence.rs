//! Sequence counter table
//!
//! Counters are keyed by the attribute that asks for them: blueprint name,
//! definition generation and the attribute path of the computed node. A
//! computed node returned by another computed node at the same path gets its
//! own `hop`. The callback passed to `sequence` is recreated on every
//! evaluation, so it cannot serve as the key.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Identity of one sequence counter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceKey {
    blueprint: String,
    generation: u64,
    path: String,
    hop: u32,
}

impl SequenceKey {
    pub fn new(blueprint: impl Into<String>, generation: u64, path: impl Into<String>) -> Self {
        Self {
            blueprint: blueprint.into(),
            generation,
            path: path.into(),
            hop: 0,
        }
    }

    /// Key of the `hop`-th computed node chained at the same path
    pub fn with_hop(mut self, hop: u32) -> Self {
        self.hop = hop;
        self
    }

    pub fn blueprint(&self) -> &str {
        &self.blueprint
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn hop(&self) -> u32 {
        self.hop
    }
}

/// Monotonic counters, starting at 1
///
/// Never reset implicitly; see [`SequenceTable::reset`].
#[derive(Debug, Default)]
pub struct SequenceTable {
    counters: Mutex<HashMap<SequenceKey, u64>>,
}

impl SequenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn counters(&self) -> MutexGuard<'_, HashMap<SequenceKey, u64>> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current value for `key`, advancing the counter
    pub fn next(&self, key: &SequenceKey) -> u64 {
        let mut counters = self.counters();
        let slot = counters.entry(key.clone()).or_insert(1);
        let current = *slot;
        *slot += 1;
        current
    }

    /// Value the next call to [`SequenceTable::next`] would return
    pub fn peek(&self, key: &SequenceKey) -> u64 {
        self.counters().get(key).copied().unwrap_or(1)
    }

    /// Drop every counter
    pub fn reset(&self) {
        self.counters().clear();
    }

    /// Drop the counters of `blueprint` left by generations other than `current`
    pub fn retain_generation(&self, blueprint: &str, current: u64) {
        self.counters()
            .retain(|key, _| key.blueprint != blueprint || key.generation == current);
    }

    pub fn len(&self) -> usize {
        self.counters().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_starts_at_one_and_increments() {
        let table = SequenceTable::new();
        let key = SequenceKey::new("author", 1, "email");

        assert_eq!(table.peek(&key), 1);
        assert_eq!(table.next(&key), 1);
        assert_eq!(table.next(&key), 2);
        assert_eq!(table.next(&key), 3);
        assert_eq!(table.peek(&key), 4);
    }

    #[test]
    fn test_counters_are_independent() {
        let table = SequenceTable::new();
        let email = SequenceKey::new("author", 1, "email");
        let handle = SequenceKey::new("author", 1, "handle");
        let redefined = SequenceKey::new("author", 2, "email");
        let chained = SequenceKey::new("author", 1, "email").with_hop(1);

        assert_eq!(table.next(&email), 1);
        assert_eq!(table.next(&email), 2);
        assert_eq!(table.next(&handle), 1);
        assert_eq!(table.next(&redefined), 1);
        assert_eq!(table.next(&chained), 1);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_reset() {
        let table = SequenceTable::new();
        let author = SequenceKey::new("author", 1, "email");
        let redefined = SequenceKey::new("author", 2, "email");
        let book = SequenceKey::new("book", 1, "isbn");
        table.next(&author);
        table.next(&redefined);
        table.next(&book);

        table.retain_generation("author", 2);
        assert_eq!(table.peek(&author), 1);
        assert_eq!(table.peek(&redefined), 2);
        assert_eq!(table.peek(&book), 2);
        assert_eq!(table.len(), 2);

        table.reset();
        assert!(table.is_empty());
    }
}
