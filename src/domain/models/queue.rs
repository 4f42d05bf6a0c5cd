//! FIFO queue of capabilities awaiting processing.

use std::collections::VecDeque;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Capability;

/// An ordered sequence of capabilities awaiting processing.
///
/// Each stage invocation owns exactly one queue. A capability enters the
/// queue at most once (duplicates are dropped on push) and leaves it exactly
/// once, at the moment its outcome becomes final. Dequeuing from an empty
/// queue is a protocol violation.
///
/// # Examples
///
/// ```
/// use grantflow::domain::models::{Capability, PendingQueue};
///
/// let mut queue = PendingQueue::new();
/// queue.push_unique(Capability::camera());
/// queue.push_unique(Capability::record_audio());
/// queue.push_unique(Capability::camera()); // duplicate, dropped
///
/// assert_eq!(queue.len(), 2);
/// assert_eq!(queue.pop().unwrap(), Capability::camera());
/// assert_eq!(queue.pop().unwrap(), Capability::record_audio());
/// assert!(queue.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PendingQueue {
    items: VecDeque<Capability>,
}

impl PendingQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Seed a queue from an ordered list, dropping duplicates.
    pub fn seeded(capabilities: impl IntoIterator<Item = Capability>) -> Self {
        let mut queue = Self::new();
        for capability in capabilities {
            queue.push_unique(capability);
        }
        queue
    }

    /// Append a capability unless it is already queued.
    ///
    /// Returns `true` if the capability was added.
    pub fn push_unique(&mut self, capability: Capability) -> bool {
        if self.items.contains(&capability) {
            return false;
        }
        self.items.push_back(capability);
        true
    }

    /// The capability at the head of the queue, if any.
    pub fn peek(&self) -> Option<&Capability> {
        self.items.front()
    }

    /// Remove and return the head of the queue.
    ///
    /// # Errors
    /// [`DomainError::EmptyQueue`] if the queue is empty; this is a protocol
    /// violation (asserts in debug builds).
    pub fn pop(&mut self) -> DomainResult<Capability> {
        let head = self.items.pop_front();
        debug_assert!(head.is_some(), "dequeue from an empty pending queue");
        head.ok_or(DomainError::EmptyQueue)
    }

    /// Whether a capability is currently queued.
    pub fn contains(&self, capability: &Capability) -> bool {
        self.items.contains(capability)
    }

    /// Number of queued capabilities.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_fifo_order() {
        let mut queue = PendingQueue::seeded([
            Capability::camera(),
            Capability::record_audio(),
            Capability::fine_location(),
        ]);
        assert_eq!(queue.pop().unwrap(), Capability::camera());
        assert_eq!(queue.pop().unwrap(), Capability::record_audio());
        assert_eq!(queue.pop().unwrap(), Capability::fine_location());
    }

    #[test]
    fn push_unique_drops_duplicates() {
        let mut queue = PendingQueue::new();
        assert!(queue.push_unique(Capability::camera()));
        assert!(!queue.push_unique(Capability::camera()));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn seeded_drops_duplicates() {
        let queue = PendingQueue::seeded([
            Capability::camera(),
            Capability::camera(),
            Capability::record_audio(),
        ]);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn pop_from_empty_queue_is_an_error() {
        // debug_assert fires in debug builds; verify the release-mode
        // defensive path through the error value.
        if cfg!(debug_assertions) {
            return;
        }
        let mut queue = PendingQueue::new();
        assert!(matches!(queue.pop(), Err(DomainError::EmptyQueue)));
    }

    #[test]
    fn peek_does_not_remove() {
        let mut queue = PendingQueue::seeded([Capability::camera()]);
        assert_eq!(queue.peek(), Some(&Capability::camera()));
        assert_eq!(queue.len(), 1);
        queue.pop().unwrap();
        assert_eq!(queue.peek(), None);
    }
}
