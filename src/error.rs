//! Structured error types for the simulation core.
//!
//! All fallible public APIs return `Result<T, SimulationError>`. Local
//! conditions (an unknown input value) are absorbed by the elements
//! themselves; structural problems are rejected at the construction or
//! editing boundary; a drain that never settles is the only failure a
//! caller of [`Simulation::drain`](crate::Simulation::drain) should expect.

use crate::node::{ElementId, NodeId};

/// The top-level error type for the simulation core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    // ── Construction / editing ────────────────────────────

    /// A bit width outside `1..=32` was requested.
    #[error("invalid bit width {0}: expected 1..=32")]
    InvalidWidth(u32),

    /// An element ID was referenced but is not live in the circuit.
    #[error("element {0} not found")]
    ElementNotFound(ElementId),

    /// An element exists but is not of the type an operation needs.
    #[error("element {element} is not a {expected}")]
    ElementTypeMismatch { element: ElementId, expected: String },

    /// A node ID was referenced but is not live in the circuit.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// A wire was requested between nodes of different widths.
    #[error("cannot connect {a} ({a_width} bits) to {b} ({b_width} bits)")]
    WidthMismatch {
        a: NodeId,
        a_width: u8,
        b: NodeId,
        b_width: u8,
    },

    /// A gate was built with too few inputs.
    #[error("{object_type} cannot have {count} inputs")]
    InvalidInputCount { object_type: String, count: usize },

    /// An element would own more nodes than a circuit allows per element.
    #[error("{object_type} needs {requested} nodes, limit is {limit}")]
    TooManyNodes {
        object_type: String,
        requested: u64,
        limit: u64,
    },

    /// A node was wired to itself.
    #[error("cannot connect {0} to itself")]
    SelfConnection(NodeId),

    // ── Value writes ──────────────────────────────────────

    /// A value does not fit in the width of the node it was written to.
    #[error("value {value} does not fit in {width}-bit node {node}")]
    ValueOutOfRange { node: NodeId, value: u32, width: u8 },

    /// An element tried to write a node it does not drive.
    #[error("element {element} cannot write node {node}")]
    ForeignWrite { element: ElementId, node: NodeId },

    // ── Scheduling ────────────────────────────────────────

    /// A drain exceeded its step cap (combinational feedback loop).
    #[error("simulation did not settle within {limit} steps")]
    DrainNonTermination { limit: u64 },

    // ── Persistence ───────────────────────────────────────

    /// A saved element names a type this crate cannot rebuild.
    #[error("unknown element type {0:?}")]
    UnknownElementType(String),

    /// A saved circuit is structurally inconsistent.
    #[error("invalid save data: {0}")]
    InvalidSave(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for `Result<T, SimulationError>`.
pub type SimResult<T> = Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_width() {
        let e = SimulationError::InvalidWidth(33);
        assert_eq!(e.to_string(), "invalid bit width 33: expected 1..=32");
    }

    #[test]
    fn test_error_display_element_not_found() {
        let e = SimulationError::ElementNotFound(ElementId::new(4));
        assert_eq!(e.to_string(), "element E4 not found");
    }

    #[test]
    fn test_error_display_width_mismatch() {
        let e = SimulationError::WidthMismatch {
            a: NodeId::new(1),
            a_width: 2,
            b: NodeId::new(7),
            b_width: 3,
        };
        let s = e.to_string();
        assert!(s.contains("N1 (2 bits)"));
        assert!(s.contains("N7 (3 bits)"));
    }

    #[test]
    fn test_error_display_non_termination() {
        let e = SimulationError::DrainNonTermination { limit: 500 };
        assert!(e.to_string().contains("500 steps"));
    }

    #[test]
    fn test_error_display_too_many_nodes() {
        let e = SimulationError::TooManyNodes {
            object_type: "Decoder".into(),
            requested: 4_194_305,
            limit: 2_097_152,
        };
        assert_eq!(
            e.to_string(),
            "Decoder needs 4194305 nodes, limit is 2097152"
        );
    }

    #[test]
    fn test_error_is_std_error() {
        let e: Box<dyn std::error::Error> = Box::new(SimulationError::InvalidWidth(0));
        assert!(!e.to_string().is_empty());
    }
}
