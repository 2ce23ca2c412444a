//! Nodes: the value cells that elements read and write.
//!
//! Every node belongs to exactly one element and may be wired to any
//! number of nodes of the same width. Nodes never decide anything on
//! their own; propagation policy lives in the simulation loop.
//!
//! # Module structure
//!
//! | Sub-module | Contents |
//! |---|---|
//! | [`id`] | [`NodeId`], [`ElementId`] newtypes |
//! | [`cell`] | [`Node`], [`Direction`] |
//! | [`store`] | [`NodeStore`] arena |

pub mod cell;
pub mod id;
pub mod store;

pub use cell::{Direction, Node};
pub use id::{ElementId, NodeId};
pub use store::NodeStore;
