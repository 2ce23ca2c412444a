//! TraceEntry: records every node the scheduler dequeued.

use crate::node::NodeId;
use crate::tick::Tick;
use crate::value::{display_signal, Signal};

/// A record of a single propagation step.
///
/// Appended by the simulation on every dequeue when tracing is enabled.
/// Useful for test assertions on dequeue order and for post-mortem
/// debugging of nets that refuse to settle.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceEntry {
    /// The drain this step belonged to.
    pub tick: Tick,
    /// 1-based step index within the drain.
    pub step: u64,
    /// The node that was dequeued.
    pub node: NodeId,
    /// The value it propagated.
    pub value: Signal,
}

impl std::fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} S=#{} {}] {}",
            self.tick,
            self.step,
            self.node,
            display_signal(self.value),
        )
    }
}
