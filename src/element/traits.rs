//! `Element` trait and port declarations.

use crate::node::Direction;
use crate::persist::ConstructorParameters;
use crate::value::BitWidth;
use crate::verilog::VerilogExport;

use super::context::ResolveContext;
use super::placement::Placement;
use crate::error::SimResult;

// ── Port ──────────────────────────────────────────────────────────────

/// One node an element owns, declared before the node exists.
///
/// `group` names the port list the node belongs to in a save file
/// (e.g. `"input"`, `"output1"`); ports of the same group are saved in
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Port {
    pub group: &'static str,
    pub direction: Direction,
    pub width: BitWidth,
}

impl Port {
    pub fn input(group: &'static str, width: BitWidth) -> Self {
        Port { group, direction: Direction::Input, width }
    }

    pub fn output(group: &'static str, width: BitWidth) -> Self {
        Port { group, direction: Direction::Output, width }
    }

    pub fn internal(group: &'static str, width: BitWidth) -> Self {
        Port { group, direction: Direction::Internal, width }
    }
}

// ── Element ───────────────────────────────────────────────────────────

/// Trait implemented by every circuit element.
///
/// An element declares its ports once; the [`Circuit`](crate::Circuit)
/// allocates one node per port, in order, when the element is added.
/// From then on the element sees its nodes only through the
/// [`ResolveContext`] handed to `resolve`.
///
/// # Contract
///
/// Implementations **must**:
/// - Return the same port list for the lifetime of the value.
/// - Write only their own output ports, through the context.
/// - Be deterministic: equal inputs and state give equal outputs.
/// - Implement `clone_element` for dyn-safe cloning.
///
/// # Example
///
/// ```rust
/// use logicsim::element::{Element, Placement, Port, ResolveContext};
/// use logicsim::persist::ConstructorParameters;
/// use logicsim::{BitWidth, SimResult};
///
/// #[derive(Clone)]
/// struct Buffer { placement: Placement }
///
/// impl Element for Buffer {
///     fn object_type(&self) -> &'static str { "Buffer" }
///     fn ports(&self) -> Vec<Port> {
///         vec![Port::input("inp1", BitWidth::ONE), Port::output("output1", BitWidth::ONE)]
///     }
///     fn resolve(&mut self, ctx: &mut ResolveContext<'_>) -> SimResult<()> {
///         let v = ctx.value(0);
///         ctx.set(1, v)?;
///         Ok(())
///     }
///     fn placement(&self) -> Placement { self.placement }
///     fn bit_width(&self) -> BitWidth { BitWidth::ONE }
///     fn constructor_parameters(&self) -> ConstructorParameters {
///         ConstructorParameters::new(self.placement.direction, BitWidth::ONE)
///     }
///     fn as_any(&self) -> &dyn std::any::Any { self }
///     fn as_any_mut(&mut self) -> &mut dyn std::any::Any { self }
///     fn clone_element(&self) -> Box<dyn Element> { Box::new(self.clone()) }
/// }
/// ```
pub trait Element {
    /// Type name used in saves and logs (e.g. `"Decoder"`).
    fn object_type(&self) -> &'static str;

    /// The ports this element owns, in node-allocation order.
    ///
    /// A circuit only calls this once [`port_count`](Self::port_count) is
    /// within [`Circuit::MAX_ELEMENT_NODES`](crate::Circuit::MAX_ELEMENT_NODES).
    fn ports(&self) -> Vec<Port>;

    /// Number of ports, without building them.
    fn port_count(&self) -> u64 {
        self.ports().len() as u64
    }

    /// Recompute outputs from the current inputs.
    fn resolve(&mut self, ctx: &mut ResolveContext<'_>) -> SimResult<()>;

    /// Whether `resolve` should run right now.
    ///
    /// The default waits until every input is defined.
    fn is_resolvable(&self, ctx: &ResolveContext<'_>) -> bool {
        ctx.inputs_defined()
    }

    fn placement(&self) -> Placement;

    /// The element's principal width.
    fn bit_width(&self) -> BitWidth;

    /// Build a replacement with a different width.
    ///
    /// Returns `None` when `bits` is out of range, equal to the current
    /// width, or the element cannot be resized.
    fn with_bit_width(&self, _bits: u32) -> Option<Box<dyn Element>> {
        None
    }

    /// The arguments that rebuild this element from a save.
    fn constructor_parameters(&self) -> ConstructorParameters;

    /// Emit this element's Verilog and register any shared modules it needs.
    ///
    /// `nets` holds one net name per port. Returns `None` for elements
    /// that take no part in export.
    fn export_verilog(
        &self,
        _export: &mut VerilogExport,
        _instance: &str,
        _nets: &[String],
    ) -> Option<String> {
        None
    }

    /// Downcast support for `Circuit::element_as::<T>()`.
    fn as_any(&self) -> &dyn std::any::Any;
    /// Mutable downcast support.
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;

    /// Create a boxed clone of this element (dyn-safe cloning, used by `Circuit`'s `Clone`).
    fn clone_element(&self) -> Box<dyn Element>;
}
