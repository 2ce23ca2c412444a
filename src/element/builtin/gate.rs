//! Bitwise gates: AND, OR, NOT.

use crate::element::{Element, Placement, Port, ResolveContext};
use crate::error::{SimResult, SimulationError};
use crate::persist::ConstructorParameters;
use crate::value::BitWidth;
use crate::verilog::VerilogExport;

/// Which function a [`Gate`] computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    And,
    Or,
    Not,
}

impl GateKind {
    pub fn object_type(self) -> &'static str {
        match self {
            GateKind::And => "AndGate",
            GateKind::Or => "OrGate",
            GateKind::Not => "NotGate",
        }
    }

    pub fn from_object_type(name: &str) -> Option<Self> {
        match name {
            "AndGate" => Some(GateKind::And),
            "OrGate" => Some(GateKind::Or),
            "NotGate" => Some(GateKind::Not),
            _ => None,
        }
    }

    fn verilog_operator(self) -> &'static str {
        match self {
            GateKind::And => " & ",
            GateKind::Or => " | ",
            GateKind::Not => "~",
        }
    }
}

/// A bitwise gate over `inputs` operands of `bit_width` bits.
///
/// Ports `0..inputs` are inputs, the last port is the output. The gate
/// only runs once every input is known and wakes its output only when
/// the result changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    kind: GateKind,
    placement: Placement,
    bit_width: BitWidth,
    inputs: usize,
}

impl Gate {
    /// A two-input AND gate.
    pub fn and(placement: Placement, bits: u32) -> SimResult<Self> {
        Gate::new(GateKind::And, placement, bits, 2)
    }

    /// A two-input OR gate.
    pub fn or(placement: Placement, bits: u32) -> SimResult<Self> {
        Gate::new(GateKind::Or, placement, bits, 2)
    }

    pub fn not(placement: Placement, bits: u32) -> SimResult<Self> {
        Gate::new(GateKind::Not, placement, bits, 1)
    }

    /// Build a gate. NOT always has one input; AND/OR need at least two.
    pub fn new(kind: GateKind, placement: Placement, bits: u32, inputs: usize) -> SimResult<Self> {
        let inputs = match kind {
            GateKind::Not => 1,
            _ if inputs < 2 => {
                return Err(SimulationError::InvalidInputCount {
                    object_type: kind.object_type().to_string(),
                    count: inputs,
                })
            }
            _ => inputs,
        };
        Ok(Gate {
            kind,
            placement,
            bit_width: BitWidth::new(bits)?,
            inputs,
        })
    }

    pub(crate) fn from_parameters(
        kind: GateKind,
        placement: Placement,
        params: &ConstructorParameters,
    ) -> SimResult<Self> {
        Gate::new(
            kind,
            placement,
            params.bit_width.into(),
            params.input_length.unwrap_or(2),
        )
    }

    pub fn kind(&self) -> GateKind {
        self.kind
    }

    pub fn input_count(&self) -> usize {
        self.inputs
    }

    fn evaluate(&self, operands: &[u32]) -> u32 {
        let mask = self.bit_width.mask();
        match self.kind {
            GateKind::And => operands.iter().fold(mask, |acc, v| acc & v),
            GateKind::Or => operands.iter().fold(0, |acc, v| acc | v),
            GateKind::Not => !operands[0] & mask,
        }
    }
}

impl Element for Gate {
    fn object_type(&self) -> &'static str {
        self.kind.object_type()
    }

    fn ports(&self) -> Vec<Port> {
        let mut ports: Vec<Port> = (0..self.inputs)
            .map(|_| Port::input("inp", self.bit_width))
            .collect();
        ports.push(Port::output("output1", self.bit_width));
        ports
    }

    fn resolve(&mut self, ctx: &mut ResolveContext<'_>) -> SimResult<()> {
        let operands: Option<Vec<u32>> = (0..self.inputs).map(|p| ctx.value(p)).collect();
        let Some(operands) = operands else {
            return Ok(());
        };
        ctx.set(self.inputs, Some(self.evaluate(&operands)))?;
        Ok(())
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
        Some(Box::new(Gate {
            bit_width: width,
            ..self.clone()
        }))
    }

    fn constructor_parameters(&self) -> ConstructorParameters {
        let params = ConstructorParameters::new(self.placement.direction, self.bit_width);
        match self.kind {
            GateKind::Not => params,
            _ => params.with_input_length(self.inputs),
        }
    }

    fn export_verilog(
        &self,
        _export: &mut VerilogExport,
        _instance: &str,
        nets: &[String],
    ) -> Option<String> {
        let (operands, output) = nets.split_at(self.inputs);
        let expr = match self.kind {
            GateKind::Not => format!("~{}", operands[0]),
            kind => operands.join(kind.verilog_operator()),
        };
        Some(format!("  assign {} = {};\n", output[0], expr))
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
