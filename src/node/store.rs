//! `NodeStore`: the arena holding every node of a circuit.

use std::collections::BTreeMap;

use crate::error::{SimResult, SimulationError};
use crate::value::{BitWidth, Signal};

use super::cell::{Direction, Node};
use super::id::{ElementId, IdGen, NodeId};

/// Owns all nodes and the wires between them.
///
/// Wires are stored symmetrically: if `a` lists `b`, `b` lists `a`.
/// Removing a node removes every wire that terminates on it.
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    nodes: BTreeMap<NodeId, Node>,
    ids: IdGen,
}

impl NodeStore {
    pub fn new() -> Self {
        NodeStore {
            nodes: BTreeMap::new(),
            ids: IdGen::new(),
        }
    }

    /// Allocate a fresh, unconnected, unknown-valued node.
    pub(crate) fn alloc(&mut self, owner: ElementId, direction: Direction, width: BitWidth) -> NodeId {
        let id = NodeId::new(self.ids.next_raw());
        self.nodes.insert(id, Node::new(id, owner, direction, width));
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Like [`get`](Self::get) but reports a missing node as an error.
    pub fn node(&self, id: NodeId) -> SimResult<&Node> {
        self.nodes.get(&id).ok_or(SimulationError::NodeNotFound(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn value(&self, id: NodeId) -> SimResult<Signal> {
        Ok(self.node(id)?.value)
    }

    /// Write a value, enforcing the width invariant.
    ///
    /// Returns whether the stored value changed. Access control (who may
    /// write which node) is enforced by the callers in `element` and
    /// `simulation`, not here.
    pub(crate) fn write(&mut self, id: NodeId, value: Signal) -> SimResult<bool> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(SimulationError::NodeNotFound(id))?;
        if let Some(v) = value {
            if !node.width.fits(v) {
                return Err(SimulationError::ValueOutOfRange {
                    node: id,
                    value: v,
                    width: node.width.bits(),
                });
            }
        }
        Ok(node.set_value(value))
    }

    /// Add a wire between `a` and `b`. Connecting an already wired pair
    /// is a no-op.
    pub(crate) fn connect(&mut self, a: NodeId, b: NodeId) -> SimResult<()> {
        if a == b {
            return Err(SimulationError::SelfConnection(a));
        }
        let a_width = self.node(a)?.width;
        let b_width = self.node(b)?.width;
        if a_width != b_width {
            return Err(SimulationError::WidthMismatch {
                a,
                a_width: a_width.bits(),
                b,
                b_width: b_width.bits(),
            });
        }
        if self.nodes[&a].connections.contains(&b) {
            return Ok(());
        }
        if let Some(node) = self.nodes.get_mut(&a) {
            node.connections.push(b);
        }
        if let Some(node) = self.nodes.get_mut(&b) {
            node.connections.push(a);
        }
        Ok(())
    }

    /// Remove the wire between `a` and `b`. Returns `false` if there was none.
    pub(crate) fn disconnect(&mut self, a: NodeId, b: NodeId) -> bool {
        let mut removed = false;
        if let Some(node) = self.nodes.get_mut(&a) {
            let before = node.connections.len();
            node.connections.retain(|&n| n != b);
            removed = node.connections.len() != before;
        }
        if let Some(node) = self.nodes.get_mut(&b) {
            node.connections.retain(|&n| n != a);
        }
        removed
    }

    /// Remove a node and every wire terminating on it.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<Node> {
        let node = self.nodes.remove(&id)?;
        for peer in &node.connections {
            if let Some(p) = self.nodes.get_mut(peer) {
                p.connections.retain(|&n| n != id);
            }
        }
        Some(node)
    }

    /// All nodes in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(bits: u32) -> BitWidth {
        BitWidth::new(bits).unwrap()
    }

    #[test]
    fn test_alloc_and_write() {
        let mut store = NodeStore::new();
        let n = store.alloc(ElementId::new(0), Direction::Output, w(2));
        assert_eq!(store.value(n).unwrap(), None);
        assert!(store.write(n, Some(3)).unwrap());
        assert!(!store.write(n, Some(3)).unwrap());
        assert_eq!(store.value(n).unwrap(), Some(3));
    }

    #[test]
    fn test_write_out_of_range() {
        let mut store = NodeStore::new();
        let n = store.alloc(ElementId::new(0), Direction::Output, w(2));
        let err = store.write(n, Some(4)).unwrap_err();
        assert_eq!(
            err,
            SimulationError::ValueOutOfRange { node: n, value: 4, width: 2 }
        );
        assert_eq!(store.value(n).unwrap(), None);
    }

    #[test]
    fn test_connect_is_symmetric_and_idempotent() {
        let mut store = NodeStore::new();
        let a = store.alloc(ElementId::new(0), Direction::Output, w(1));
        let b = store.alloc(ElementId::new(1), Direction::Input, w(1));
        store.connect(a, b).unwrap();
        store.connect(b, a).unwrap();
        assert_eq!(store.get(a).unwrap().connections(), &[b]);
        assert_eq!(store.get(b).unwrap().connections(), &[a]);
    }

    #[test]
    fn test_connect_rejects_width_mismatch_and_self() {
        let mut store = NodeStore::new();
        let a = store.alloc(ElementId::new(0), Direction::Output, w(1));
        let b = store.alloc(ElementId::new(1), Direction::Input, w(4));
        assert!(matches!(
            store.connect(a, b),
            Err(SimulationError::WidthMismatch { .. })
        ));
        assert_eq!(store.connect(a, a), Err(SimulationError::SelfConnection(a)));
    }

    #[test]
    fn test_remove_detaches_wires() {
        let mut store = NodeStore::new();
        let a = store.alloc(ElementId::new(0), Direction::Output, w(1));
        let b = store.alloc(ElementId::new(1), Direction::Input, w(1));
        let c = store.alloc(ElementId::new(2), Direction::Input, w(1));
        store.connect(a, b).unwrap();
        store.connect(a, c).unwrap();

        store.remove(a).unwrap();
        assert!(!store.contains(a));
        assert!(store.get(b).unwrap().connections().is_empty());
        assert!(store.get(c).unwrap().connections().is_empty());
    }

    #[test]
    fn test_disconnect() {
        let mut store = NodeStore::new();
        let a = store.alloc(ElementId::new(0), Direction::Output, w(1));
        let b = store.alloc(ElementId::new(1), Direction::Input, w(1));
        store.connect(a, b).unwrap();
        assert!(store.disconnect(a, b));
        assert!(!store.disconnect(a, b));
    }

    #[test]
    fn test_ids_never_reused() {
        let mut store = NodeStore::new();
        let a = store.alloc(ElementId::new(0), Direction::Output, w(1));
        store.remove(a);
        let b = store.alloc(ElementId::new(0), Direction::Output, w(1));
        assert_ne!(a, b);
    }
}
