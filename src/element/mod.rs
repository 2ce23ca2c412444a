//! Circuit elements: polymorphic units that own nodes and resolve them.
//!
//! # Module structure
//!
//! | Sub-module | Contents |
//! |---|---|
//! | [`traits`] | [`Element`] trait, [`Port`] declarations |
//! | [`context`] | [`ResolveContext`] handed to `resolve` |
//! | [`placement`] | [`Placement`], [`Orientation`] |
//! | [`builtin`] | [`Decoder`], [`InputPin`], [`OutputPin`], [`Gate`], [`Junction`] |

pub mod builtin;
pub mod context;
pub mod placement;
pub mod traits;

pub use builtin::{Decoder, Gate, GateKind, InputPin, Junction, OutputPin};
pub use context::ResolveContext;
pub use placement::{Orientation, Placement};
pub use traits::{Element, Port};
