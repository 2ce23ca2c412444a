//! The simulation queue.
//!
//! A FIFO of node IDs whose values must be propagated. FIFO order is the
//! documented contract: it decides which value an oscillating net shows
//! at any point mid-drain, so two runs with the same stimulus always
//! dequeue in the same order.

use std::collections::{BTreeSet, VecDeque};

use crate::node::NodeId;

/// Worklist of nodes awaiting propagation.
///
/// With `dedupe` enabled a node that is already pending is not queued a
/// second time. The node's value is read when it is dequeued, so this
/// never changes the settled result, only the amount of work.
#[derive(Debug, Clone)]
pub struct Scheduler {
    queue: VecDeque<NodeId>,
    pending: BTreeSet<NodeId>,
    dedupe: bool,
}

impl Scheduler {
    /// Create an empty scheduler that dedupes pending entries.
    pub fn new() -> Self {
        Self::with_dedupe(true)
    }

    /// Create an empty scheduler, choosing whether to dedupe.
    pub fn with_dedupe(dedupe: bool) -> Self {
        Scheduler {
            queue: VecDeque::new(),
            pending: BTreeSet::new(),
            dedupe,
        }
    }

    /// Queue `node` for propagation.
    ///
    /// Returns `false` if the entry was dropped as a duplicate.
    pub fn enqueue(&mut self, node: NodeId) -> bool {
        if self.dedupe && !self.pending.insert(node) {
            return false;
        }
        self.queue.push_back(node);
        true
    }

    /// Pop the oldest pending node.
    pub fn pop_next(&mut self) -> Option<NodeId> {
        let node = self.queue.pop_front()?;
        if self.dedupe {
            self.pending.remove(&node);
        }
        Some(node)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Discard everything pending.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.pending.clear();
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(raw: u64) -> NodeId {
        NodeId::new(raw)
    }

    #[test]
    fn test_fifo_order() {
        let mut sched = Scheduler::new();
        sched.enqueue(n(3));
        sched.enqueue(n(1));
        sched.enqueue(n(2));

        assert_eq!(sched.pop_next(), Some(n(3)));
        assert_eq!(sched.pop_next(), Some(n(1)));
        assert_eq!(sched.pop_next(), Some(n(2)));
        assert_eq!(sched.pop_next(), None);
    }

    #[test]
    fn test_dedupe_while_pending() {
        let mut sched = Scheduler::new();
        assert!(sched.enqueue(n(1)));
        assert!(!sched.enqueue(n(1)));
        assert_eq!(sched.len(), 1);

        // Once dequeued the node may be queued again.
        sched.pop_next();
        assert!(sched.enqueue(n(1)));
    }

    #[test]
    fn test_multiset_without_dedupe() {
        let mut sched = Scheduler::with_dedupe(false);
        assert!(sched.enqueue(n(1)));
        assert!(sched.enqueue(n(1)));
        assert_eq!(sched.len(), 2);
        assert_eq!(sched.pop_next(), Some(n(1)));
        assert_eq!(sched.pop_next(), Some(n(1)));
        assert!(sched.is_empty());
    }

    #[test]
    fn test_empty_scheduler() {
        let mut sched = Scheduler::new();
        assert!(sched.is_empty());
        assert_eq!(sched.len(), 0);
        assert!(sched.pop_next().is_none());
    }

    #[test]
    fn test_clear() {
        let mut sched = Scheduler::new();
        sched.enqueue(n(1));
        sched.enqueue(n(2));
        sched.clear();
        assert!(sched.is_empty());
        assert!(sched.enqueue(n(1)));
    }
}
