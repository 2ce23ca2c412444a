//! `Circuit`: owns all elements, their nodes and the wires between them.

use std::collections::BTreeMap;

use tracing::debug;

use crate::element::{Element, ResolveContext};
use crate::error::{SimResult, SimulationError};
use crate::hash::StateHasher;
use crate::node::id::IdGen;
use crate::node::{Direction, ElementId, Node, NodeId, NodeStore};
use crate::scheduler::Scheduler;
use crate::value::Signal;

/// An element together with the nodes allocated for its ports.
pub(crate) struct ElementSlot {
    pub(crate) element: Box<dyn Element>,
    /// One node per declared port, in port order.
    pub(crate) nodes: Vec<NodeId>,
}

impl Clone for ElementSlot {
    fn clone(&self) -> Self {
        ElementSlot {
            element: self.element.clone_element(),
            nodes: self.nodes.clone(),
        }
    }
}

/// The scope elements live in.
///
/// The circuit is an arena: elements and nodes are addressed by IDs that
/// are minted once and never reused. Nodes point back at their owner and
/// at their wired peers by ID only, so deleting an element is a matter of
/// dropping its slot and its nodes.
#[derive(Clone, Default)]
pub struct Circuit {
    pub(crate) nodes: NodeStore,
    pub(crate) elements: BTreeMap<ElementId, ElementSlot>,
    ids: IdGen,
    selected: Option<ElementId>,
}

impl Circuit {
    /// Most nodes a single element may own.
    ///
    /// Bounds decoders at a 20-bit selector (`2^20` lines plus the
    /// selector). Wider decoders are legal values but cannot be placed.
    pub const MAX_ELEMENT_NODES: u64 = 1 << 21;

    /// Create an empty circuit.
    pub fn new() -> Self {
        Circuit {
            nodes: NodeStore::new(),
            elements: BTreeMap::new(),
            ids: IdGen::new(),
            selected: None,
        }
    }

    // ── Elements ──────────────────────────────────────────────

    /// Add an element, allocating one node per declared port.
    ///
    /// Fails with `TooManyNodes` if the element declares more than
    /// [`MAX_ELEMENT_NODES`](Self::MAX_ELEMENT_NODES) ports.
    pub fn add<E: Element + 'static>(&mut self, element: E) -> SimResult<ElementId> {
        self.add_boxed(Box::new(element))
    }

    /// Add an already boxed element.
    pub fn add_boxed(&mut self, element: Box<dyn Element>) -> SimResult<ElementId> {
        let requested = element.port_count();
        if requested > Self::MAX_ELEMENT_NODES {
            return Err(SimulationError::TooManyNodes {
                object_type: element.object_type().to_string(),
                requested,
                limit: Self::MAX_ELEMENT_NODES,
            });
        }
        let id = ElementId::new(self.ids.next_raw());
        let nodes = element
            .ports()
            .into_iter()
            .map(|port| self.nodes.alloc(id, port.direction, port.width))
            .collect::<Vec<_>>();
        debug!(
            element = %id,
            object_type = element.object_type(),
            nodes = nodes.len(),
            "element added"
        );
        self.elements.insert(id, ElementSlot { element, nodes });
        Ok(id)
    }

    /// Delete an element, its nodes, and every wire ending on them.
    pub fn delete_element(&mut self, id: ElementId) -> SimResult<()> {
        let slot = self
            .elements
            .remove(&id)
            .ok_or(SimulationError::ElementNotFound(id))?;
        for node in &slot.nodes {
            self.nodes.remove(*node);
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        debug!(element = %id, object_type = slot.element.object_type(), "element deleted");
        Ok(())
    }

    /// Rebuild an element with a new width.
    ///
    /// The replacement is a new element at the same placement with fresh
    /// nodes; the old element is deleted along with its wires and the
    /// replacement becomes the selection. Returns `Ok(None)`, changing
    /// nothing, when the width is out of range, unchanged, or the element
    /// does not support resizing. A replacement too large to place fails
    /// with `TooManyNodes` and also leaves the circuit untouched.
    pub fn change_bit_width(&mut self, id: ElementId, bits: u32) -> SimResult<Option<ElementId>> {
        let slot = self
            .elements
            .get(&id)
            .ok_or(SimulationError::ElementNotFound(id))?;
        let Some(replacement) = slot.element.with_bit_width(bits) else {
            return Ok(None);
        };
        let new_id = self.add_boxed(replacement)?;
        self.delete_element(id)?;
        self.selected = Some(new_id);
        debug!(old = %id, new = %new_id, bits, "element rebuilt");
        Ok(Some(new_id))
    }

    /// Whether `id` names a live element.
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn element(&self, id: ElementId) -> Option<&dyn Element> {
        self.elements.get(&id).map(|slot| slot.element.as_ref())
    }

    /// Downcast an element reference for inspection.
    ///
    /// Returns `None` if the element is not live or has a different type.
    pub fn element_as<T: Element + 'static>(&self, id: ElementId) -> Option<&T> {
        self.elements.get(&id)?.element.as_any().downcast_ref::<T>()
    }

    /// Downcast a mutable element reference.
    pub fn element_as_mut<T: Element + 'static>(&mut self, id: ElementId) -> Option<&mut T> {
        self.elements
            .get_mut(&id)?
            .element
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Number of live elements.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// All live element IDs in deterministic (sorted) order.
    pub fn element_ids(&self) -> Vec<ElementId> {
        self.elements.keys().copied().collect()
    }

    // ── Selection ─────────────────────────────────────────────

    /// The element the editor currently has selected.
    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn select(&mut self, id: Option<ElementId>) -> SimResult<()> {
        if let Some(el) = id {
            if !self.contains(el) {
                return Err(SimulationError::ElementNotFound(el));
            }
        }
        self.selected = id;
        Ok(())
    }

    // ── Nodes ─────────────────────────────────────────────────

    /// All nodes of an element, in port order.
    pub fn ports(&self, id: ElementId) -> SimResult<&[NodeId]> {
        self.elements
            .get(&id)
            .map(|slot| slot.nodes.as_slice())
            .ok_or(SimulationError::ElementNotFound(id))
    }

    /// Node backing port `port` of element `id`.
    pub fn port(&self, id: ElementId, port: usize) -> SimResult<NodeId> {
        self.ports(id)?
            .get(port)
            .copied()
            .ok_or(SimulationError::ElementNotFound(id))
    }

    /// The element's input nodes, in port order.
    pub fn inputs(&self, id: ElementId) -> SimResult<Vec<NodeId>> {
        self.ports_with(id, Direction::Input)
    }

    /// The element's output nodes, in port order.
    pub fn outputs(&self, id: ElementId) -> SimResult<Vec<NodeId>> {
        self.ports_with(id, Direction::Output)
    }

    fn ports_with(&self, id: ElementId, direction: Direction) -> SimResult<Vec<NodeId>> {
        Ok(self
            .ports(id)?
            .iter()
            .copied()
            .filter(|&n| self.nodes.get(n).map(Node::direction) == Some(direction))
            .collect())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Read-only view of the node arena.
    pub fn node_store(&self) -> &NodeStore {
        &self.nodes
    }

    /// Current value of a node.
    pub fn value(&self, id: NodeId) -> SimResult<Signal> {
        self.nodes.value(id)
    }

    /// Current values of an element's outputs, in port order.
    pub fn output_values(&self, id: ElementId) -> SimResult<Vec<Signal>> {
        self.outputs(id)?
            .into_iter()
            .map(|n| self.nodes.value(n))
            .collect()
    }

    // ── Wires ─────────────────────────────────────────────────

    /// Wire two nodes of equal width together.
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> SimResult<()> {
        self.nodes.connect(a, b)
    }

    /// Remove the wire between two nodes. Returns `false` if there was none.
    pub fn disconnect(&mut self, a: NodeId, b: NodeId) -> bool {
        self.nodes.disconnect(a, b)
    }

    /// Wire output port `from_port` of `from` to input port `to_port` of `to`.
    pub fn wire(
        &mut self,
        from: ElementId,
        from_port: usize,
        to: ElementId,
        to_port: usize,
    ) -> SimResult<()> {
        let a = self.port(from, from_port)?;
        let b = self.port(to, to_port)?;
        self.connect(a, b)
    }

    // ── Resolution ────────────────────────────────────────────

    /// Resolve one element if it is currently resolvable.
    ///
    /// Returns whether `resolve` actually ran.
    pub(crate) fn resolve_element(
        &mut self,
        id: ElementId,
        scheduler: &mut Scheduler,
    ) -> SimResult<bool> {
        let slot = self
            .elements
            .get_mut(&id)
            .ok_or(SimulationError::ElementNotFound(id))?;
        let mut ctx = ResolveContext {
            element: id,
            ports: &slot.nodes,
            nodes: &mut self.nodes,
            scheduler,
        };
        if !slot.element.is_resolvable(&ctx) {
            return Ok(false);
        }
        slot.element.resolve(&mut ctx)?;
        Ok(true)
    }

    /// Deterministic hash over every node value and the element set.
    ///
    /// Two circuits built and driven identically hash identically.
    pub fn state_hash(&self) -> u64 {
        let mut h = StateHasher::new();
        for (id, slot) in &self.elements {
            h.write_u64(id.raw());
            h.write_bytes(slot.element.object_type().as_bytes());
        }
        for node in self.nodes.iter() {
            h.write_u64(node.id().raw());
            h.write_signal(node.value());
        }
        h.finish()
    }
}

impl std::fmt::Debug for Circuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let elements: Vec<String> = self
            .elements
            .iter()
            .map(|(id, slot)| format!("{}:{}", id, slot.element.object_type()))
            .collect();
        f.debug_struct("Circuit")
            .field("elements", &elements)
            .field("nodes", &self.nodes.len())
            .field("selected", &self.selected)
            .finish()
    }
}
