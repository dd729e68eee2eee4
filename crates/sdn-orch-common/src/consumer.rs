//! Ordered event consumer.

use std::collections::VecDeque;
use std::fmt::Debug;

/// Configuration for a Consumer.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Name of the event stream (e.g., "CONTROLLER_EVENTS")
    pub name: String,
    /// Maximum number of entries handed out by one `pop_batch()`
    pub batch_size: usize,
}

impl ConsumerConfig {
    /// Creates a new consumer config.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            batch_size: 128,
        }
    }

    /// Sets the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

/// Queue of pending events for one Orch.
///
/// Unlike a keyed table consumer, entries are never merged or reordered:
/// topology events only make sense in the order they were observed, so the
/// queue is strictly first-in first-out.
pub struct Consumer<T> {
    config: ConsumerConfig,
    pending: VecDeque<T>,
}

impl<T> Consumer<T> {
    /// Creates a new consumer with the given configuration.
    pub fn new(config: ConsumerConfig) -> Self {
        Self {
            config,
            pending: VecDeque::new(),
        }
    }

    /// Returns true if there are pending entries.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Appends a single entry.
    pub fn push(&mut self, entry: T) {
        self.pending.push_back(entry);
    }

    /// Removes and returns up to `batch_size` entries from the front.
    pub fn pop_batch(&mut self) -> Vec<T> {
        let n = self.config.batch_size.min(self.pending.len());
        self.pending.drain(..n).collect()
    }
}

impl<T: Debug> Consumer<T> {
    /// Dumps pending entries for debugging.
    pub fn dump(&self) -> Vec<String> {
        self.pending
            .iter()
            .map(|e| format!("{}: {:?}", self.config.name, e))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_consumer_basic() {
        let mut consumer = Consumer::new(ConsumerConfig::new("EVENTS"));
        assert!(!consumer.has_pending());

        consumer.push(1);
        assert!(consumer.has_pending());
        assert_eq!(consumer.pop_batch(), vec![1]);
        assert!(!consumer.has_pending());
    }

    #[test]
    fn test_consumer_keeps_arrival_order_and_duplicates() {
        let mut consumer = Consumer::new(ConsumerConfig::new("EVENTS"));
        for event in ["link 1-2", "link 2-3", "link 1-2", "mac on 3"] {
            consumer.push(event);
        }

        assert_eq!(
            consumer.pop_batch(),
            vec!["link 1-2", "link 2-3", "link 1-2", "mac on 3"]
        );
    }

    #[test]
    fn test_pop_batch() {
        let mut consumer = Consumer::new(ConsumerConfig::new("EVENTS").with_batch_size(2));
        for n in 1..=5 {
            consumer.push(n);
        }

        assert_eq!(consumer.pop_batch(), vec![1, 2]);
        assert_eq!(consumer.pop_batch(), vec![3, 4]);
        assert_eq!(consumer.pop_batch(), vec![5]);
        assert!(consumer.pop_batch().is_empty());
    }

    #[test]
    fn test_zero_batch_size_is_clamped() {
        let mut consumer = Consumer::new(ConsumerConfig::new("EVENTS").with_batch_size(0));
        consumer.push('a');
        assert_eq!(consumer.pop_batch(), vec!['a']);
    }

    #[test]
    fn test_dump() {
        let mut consumer = Consumer::new(ConsumerConfig::new("EVENTS"));
        consumer.push(42);
        assert_eq!(consumer.dump(), vec!["EVENTS: 42".to_string()]);

        consumer.pop_batch();
        assert!(consumer.dump().is_empty());
    }
}
