//! `ResolveContext`: what an element sees while it resolves.

use crate::error::{SimResult, SimulationError};
use crate::node::{Direction, ElementId, NodeId, NodeStore};
use crate::scheduler::Scheduler;
use crate::value::Signal;

/// Mutable context passed to [`Element::resolve`](super::Element::resolve).
///
/// Ports are addressed by their index in the element's declared port
/// list. The context enforces the write rule: an element may only write
/// its own output nodes. It borrows the scheduler mutably, so the only
/// way to wake downstream elements is through [`enqueue`](Self::enqueue)
/// and [`set`](Self::set).
pub struct ResolveContext<'a> {
    pub(crate) element: ElementId,
    pub(crate) ports: &'a [NodeId],
    pub(crate) nodes: &'a mut NodeStore,
    pub(crate) scheduler: &'a mut Scheduler,
}

impl<'a> ResolveContext<'a> {
    /// The element being resolved.
    #[inline]
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Number of ports (and nodes) the element owns.
    #[inline]
    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    /// Node backing port `port`, if the port exists.
    #[inline]
    pub fn node(&self, port: usize) -> Option<NodeId> {
        self.ports.get(port).copied()
    }

    /// Current value on `port`. Missing ports read as unknown.
    pub fn value(&self, port: usize) -> Signal {
        self.node(port)
            .and_then(|id| self.nodes.get(id))
            .and_then(|n| n.value())
    }

    /// Whether every input port currently carries a defined value.
    pub fn inputs_defined(&self) -> bool {
        self.ports.iter().all(|&id| match self.nodes.get(id) {
            Some(n) if n.direction() == Direction::Input => n.value().is_some(),
            _ => true,
        })
    }

    /// Write `value` to an output port without waking anything.
    ///
    /// Returns whether the value changed.
    pub fn write(&mut self, port: usize, value: Signal) -> SimResult<bool> {
        let id = self.writable(port)?;
        self.nodes.write(id, value)
    }

    /// Write `value` to an output port and enqueue it if it changed.
    pub fn set(&mut self, port: usize, value: Signal) -> SimResult<bool> {
        let id = self.writable(port)?;
        let changed = self.nodes.write(id, value)?;
        if changed {
            self.scheduler.enqueue(id);
        }
        Ok(changed)
    }

    /// Enqueue an output port unconditionally.
    pub fn enqueue(&mut self, port: usize) -> SimResult<()> {
        let id = self.writable(port)?;
        self.scheduler.enqueue(id);
        Ok(())
    }

    fn writable(&self, port: usize) -> SimResult<NodeId> {
        let id = self
            .node(port)
            .ok_or(SimulationError::ElementNotFound(self.element))?;
        let node = self.nodes.node(id)?;
        if node.owner() != self.element || node.direction() != Direction::Output {
            return Err(SimulationError::ForeignWrite {
                element: self.element,
                node: id,
            });
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::BitWidth;

    #[test]
    fn test_write_rules() {
        let me = ElementId::new(0);
        let mut nodes = NodeStore::new();
        let input = nodes.alloc(me, Direction::Input, BitWidth::ONE);
        let output = nodes.alloc(me, Direction::Output, BitWidth::ONE);
        let mut sched = Scheduler::new();
        let ports = [input, output];

        let mut ctx = ResolveContext {
            element: me,
            ports: &ports,
            nodes: &mut nodes,
            scheduler: &mut sched,
        };

        assert_eq!(
            ctx.set(0, Some(1)),
            Err(SimulationError::ForeignWrite { element: me, node: input })
        );
        assert!(ctx.set(1, Some(1)).unwrap());
        assert!(!ctx.set(1, Some(1)).unwrap());
        assert_eq!(ctx.value(1), Some(1));
        assert_eq!(ctx.value(7), None);
        assert!(!ctx.inputs_defined());

        assert_eq!(sched.pop_next(), Some(output));
        assert!(sched.is_empty());
    }

    #[test]
    fn test_write_does_not_enqueue() {
        let me = ElementId::new(3);
        let mut nodes = NodeStore::new();
        let output = nodes.alloc(me, Direction::Output, BitWidth::ONE);
        let mut sched = Scheduler::new();
        let ports = [output];

        let mut ctx = ResolveContext {
            element: me,
            ports: &ports,
            nodes: &mut nodes,
            scheduler: &mut sched,
        };
        assert!(ctx.write(0, Some(0)).unwrap());
        assert!(sched.is_empty());
    }
}
