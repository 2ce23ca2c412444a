//! `Node`: a typed value cell attached to one element.

use crate::value::{display_signal, BitWidth, Signal};

use super::id::{ElementId, NodeId};

/// Which way values flow through a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Read by the owning element's `resolve`; written by wire propagation.
    Input,
    /// Written by the owning element's `resolve`; never by propagation.
    Output,
    /// Wire junction: written by propagation and forwarded onwards.
    Internal,
}

/// A single-valued wire endpoint.
///
/// The node only holds state. Deciding who may write it and what
/// happens after a change is the job of the [`NodeStore`](super::NodeStore)
/// and the simulation loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) owner: ElementId,
    pub(crate) direction: Direction,
    pub(crate) width: BitWidth,
    pub(crate) value: Signal,
    pub(crate) connections: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(id: NodeId, owner: ElementId, direction: Direction, width: BitWidth) -> Self {
        Node {
            id,
            owner,
            direction,
            width,
            value: None,
            connections: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The element this node belongs to.
    pub fn owner(&self) -> ElementId {
        self.owner
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn width(&self) -> BitWidth {
        self.width
    }

    /// Current value, or `None` when unknown.
    pub fn value(&self) -> Signal {
        self.value
    }

    /// Nodes wired to this one, in connection order.
    pub fn connections(&self) -> &[NodeId] {
        &self.connections
    }

    /// Store `value`; returns `true` if it differs from the previous one.
    ///
    /// The caller has already checked that the value fits the width.
    pub(crate) fn set_value(&mut self, value: Signal) -> bool {
        let changed = self.value != value;
        self.value = value;
        changed
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}[{}:{}]={}",
            self.id,
            self.owner,
            self.width,
            display_signal(self.value)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_unknown() {
        let n = Node::new(NodeId::new(0), ElementId::new(0), Direction::Input, BitWidth::ONE);
        assert_eq!(n.value(), None);
        assert!(n.connections().is_empty());
    }

    #[test]
    fn test_set_value_reports_change() {
        let mut n = Node::new(NodeId::new(0), ElementId::new(0), Direction::Output, BitWidth::ONE);
        assert!(n.set_value(Some(1)));
        assert!(!n.set_value(Some(1)));
        assert!(n.set_value(None));
        assert!(!n.set_value(None));
    }

    #[test]
    fn test_display() {
        let mut n = Node::new(NodeId::new(4), ElementId::new(2), Direction::Output, BitWidth::ONE);
        assert_eq!(n.to_string(), "N4[E2:1]=x");
        n.set_value(Some(1));
        assert_eq!(n.to_string(), "N4[E2:1]=1");
    }
}
