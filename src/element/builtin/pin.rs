//! `InputPin` and `OutputPin`: the circuit's stimulus and observation points.

use crate::element::{Element, Placement, Port, ResolveContext};
use crate::error::{SimResult, SimulationError};
use crate::node::NodeId;
use crate::persist::ConstructorParameters;
use crate::value::{BitWidth, Signal};
use crate::verilog::VerilogExport;

// ── InputPin ──────────────────────────────────────────────────────────

/// A user-editable source.
///
/// The pin's `state` is the only value in a circuit that changes from
/// outside the simulation. Resolving the pin copies the state onto its
/// output and always wakes the output, so a re-seeded pin re-propagates
/// even when its value is unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPin {
    placement: Placement,
    bit_width: BitWidth,
    state: Signal,
}

impl InputPin {
    pub const OBJECT_TYPE: &'static str = "Input";

    /// Create a pin that starts at 0.
    pub fn new(placement: Placement, bits: u32) -> SimResult<Self> {
        Ok(InputPin {
            placement,
            bit_width: BitWidth::new(bits)?,
            state: Some(0),
        })
    }

    pub(crate) fn from_parameters(
        placement: Placement,
        params: &ConstructorParameters,
    ) -> SimResult<Self> {
        let mut pin = InputPin::new(placement, params.bit_width.into())?;
        if let Some(v) = params.state {
            if !pin.bit_width.fits(v) {
                return Err(SimulationError::InvalidSave(format!(
                    "input state {} does not fit {} bits",
                    v,
                    pin.bit_width.bits()
                )));
            }
        }
        pin.state = params.state;
        Ok(pin)
    }

    pub fn state(&self) -> Signal {
        self.state
    }

    /// Change the pin's state. Values wider than the pin are rejected.
    ///
    /// The new state takes effect when the pin is next resolved; use
    /// [`Simulation::set_input`](crate::Simulation::set_input) to change
    /// and propagate in one go.
    pub fn set_state(&mut self, pin_node: NodeId, state: Signal) -> SimResult<()> {
        if let Some(v) = state {
            if !self.bit_width.fits(v) {
                return Err(SimulationError::ValueOutOfRange {
                    node: pin_node,
                    value: v,
                    width: self.bit_width.bits(),
                });
            }
        }
        self.state = state;
        Ok(())
    }
}

impl Element for InputPin {
    fn object_type(&self) -> &'static str {
        Self::OBJECT_TYPE
    }

    fn ports(&self) -> Vec<Port> {
        vec![Port::output("output1", self.bit_width)]
    }

    fn resolve(&mut self, ctx: &mut ResolveContext<'_>) -> SimResult<()> {
        ctx.write(0, self.state)?;
        ctx.enqueue(0)
    }

    fn is_resolvable(&self, _ctx: &ResolveContext<'_>) -> bool {
        true
    }

    fn placement(&self) -> Placement {
        self.placement
    }

    fn bit_width(&self) -> BitWidth {
        self.bit_width
    }

    fn with_bit_width(&self, bits: u32) -> Option<Box<dyn Element>> {
        let width = BitWidth::new(bits).ok()?;
        if width == self.bit_width {
            return None;
        }
        Some(Box::new(InputPin {
            placement: self.placement,
            bit_width: width,
            state: Some(0),
        }))
    }

    fn constructor_parameters(&self) -> ConstructorParameters {
        ConstructorParameters::new(self.placement.direction, self.bit_width).with_state(self.state)
    }

    fn export_verilog(
        &self,
        export: &mut VerilogExport,
        _instance: &str,
        nets: &[String],
    ) -> Option<String> {
        export.add_port(&nets[0], "input", self.bit_width);
        Some(String::new())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn clone_element(&self) -> Box<dyn Element> {
        Box::new(self.clone())
    }
}

// ── OutputPin ─────────────────────────────────────────────────────────

/// An observation point: one input, no behavior. Its input node holds the observed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPin {
    placement: Placement,
    bit_width: BitWidth,
}

impl OutputPin {
    pub const OBJECT_TYPE: &'static str = "Output";

    pub fn new(placement: Placement, bits: u32) -> SimResult<Self> {
        Ok(OutputPin {
            placement,
            bit_width: BitWidth::new(bits)?,
        })
    }

    pub(crate) fn from_parameters(
        placement: Placement,
        params: &ConstructorParameters,
    ) -> SimResult<Self> {
        OutputPin::new(placement, params.bit_width.into())
    }
}

impl Element for OutputPin {
    fn object_type(&self) -> &'static str {
        Self::OBJECT_TYPE
    }

    fn ports(&self) -> Vec<Port> {
        vec![Port::input("inp1", self.bit_width)]
    }

    fn resolve(&mut self, _ctx: &mut ResolveContext<'_>) -> SimResult<()> {
        Ok(())
    }

    fn is_resolvable(&self, _ctx: &ResolveContext<'_>) -> bool {
        true
    }

    fn placement(&self) -> Placement {
        self.placement
    }

    fn bit_width(&self) -> BitWidth {
        self.bit_width
    }

    fn with_bit_width(&self, bits: u32) -> Option<Box<dyn Element>> {
        let width = BitWidth::new(bits).ok()?;
        if width == self.bit_width {
            return None;
        }
        Some(Box::new(OutputPin {
            placement: self.placement,
            bit_width: width,
        }))
    }

    fn constructor_parameters(&self) -> ConstructorParameters {
        ConstructorParameters::new(self.placement.direction, self.bit_width)
    }

    fn export_verilog(
        &self,
        export: &mut VerilogExport,
        _instance: &str,
        nets: &[String],
    ) -> Option<String> {
        export.add_port(&nets[0], "output", self.bit_width);
        Some(String::new())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn clone_element(&self) -> Box<dyn Element> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_pin_state_range() {
        let mut pin = InputPin::new(Placement::default(), 2).unwrap();
        assert_eq!(pin.state(), Some(0));
        pin.set_state(NodeId::new(0), Some(3)).unwrap();
        assert_eq!(pin.state(), Some(3));
        assert!(pin.set_state(NodeId::new(0), Some(4)).is_err());
        assert_eq!(pin.state(), Some(3));
        pin.set_state(NodeId::new(0), None).unwrap();
        assert_eq!(pin.state(), None);
    }

    #[test]
    fn test_constructor_parameters_carry_state() {
        let mut pin = InputPin::new(Placement::default(), 4).unwrap();
        pin.set_state(NodeId::new(0), Some(9)).unwrap();
        let params = pin.constructor_parameters();
        assert_eq!(params.state, Some(9));
        let rebuilt = InputPin::from_parameters(Placement::default(), &params).unwrap();
        assert_eq!(rebuilt, pin);
    }

    #[test]
    fn test_output_pin_ports() {
        let pin = OutputPin::new(Placement::default(), 8).unwrap();
        let ports = pin.ports();
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].width.bits(), 8);
    }
}
