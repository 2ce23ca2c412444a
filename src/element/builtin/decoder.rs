//! `Decoder`: asserts exactly one of `2^bitWidth` output lines.

use tracing::warn;

use crate::circuit::Circuit;
use crate::element::{Element, Orientation, Placement, Port, ResolveContext};
use crate::error::SimResult;
use crate::node::ElementId;
use crate::persist::ConstructorParameters;
use crate::value::BitWidth;
use crate::verilog::VerilogExport;

/// Port index of the selector input. Outputs follow at `1..=2^b`.
const INPUT: usize = 0;
const FIRST_OUTPUT: usize = 1;

/// One-hot decoder.
///
/// Port 0 is a `bitWidth`-bit selector; ports `1..=2^bitWidth` are
/// one-bit outputs, where output `k` sits at port `1 + k`. With a known
/// selector `k` exactly output `k` is high. With an unknown selector
/// every output is low.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoder {
    placement: Placement,
    bit_width: BitWidth,
}

impl Decoder {
    pub const OBJECT_TYPE: &'static str = "Decoder";

    /// Create a decoder. Fails with `InvalidWidth` outside `1..=32`.
    pub fn new(placement: Placement, bits: u32) -> SimResult<Self> {
        Ok(Decoder {
            placement,
            bit_width: BitWidth::new(bits)?,
        })
    }

    /// Build a decoder and place it in `scope`, the way a save file
    /// reconstructs one.
    pub fn create(
        scope: &mut Circuit,
        x: i32,
        y: i32,
        direction: Orientation,
        bits: u32,
    ) -> SimResult<ElementId> {
        let decoder = Decoder::new(Placement::new(x, y, direction), bits)?;
        scope.add(decoder)
    }

    pub(crate) fn from_parameters(
        placement: Placement,
        params: &ConstructorParameters,
    ) -> SimResult<Self> {
        Decoder::new(placement, params.bit_width.into())
    }

    /// Number of output lines (`2^bitWidth`).
    pub fn output_count(&self) -> u64 {
        self.bit_width.cardinality()
    }

    /// Port index of output line `line`.
    pub fn output_port(line: usize) -> usize {
        FIRST_OUTPUT + line
    }

    /// Verilog base type, e.g. `Decoder4` for a 2-bit selector.
    pub fn verilog_base_type(&self) -> String {
        format!("{}{}", Self::OBJECT_TYPE, self.output_count())
    }
}

impl Element for Decoder {
    fn object_type(&self) -> &'static str {
        Self::OBJECT_TYPE
    }

    fn ports(&self) -> Vec<Port> {
        let lines = usize::try_from(self.output_count()).unwrap_or(usize::MAX);
        let mut ports = Vec::with_capacity(FIRST_OUTPUT + lines);
        ports.push(Port::input("input", self.bit_width));
        ports.extend((0..lines).map(|_| Port::output("output1", BitWidth::ONE)));
        ports
    }

    fn port_count(&self) -> u64 {
        FIRST_OUTPUT as u64 + self.output_count()
    }

    fn resolve(&mut self, ctx: &mut ResolveContext<'_>) -> SimResult<()> {
        let lines = ctx.port_count() - FIRST_OUTPUT;
        for line in 0..lines {
            ctx.write(FIRST_OUTPUT + line, Some(0))?;
        }

        if let Some(k) = ctx.value(INPUT) {
            let k = k as usize;
            if k < lines {
                ctx.write(FIRST_OUTPUT + k, Some(1))?;
            } else {
                warn!(
                    element = %ctx.element(),
                    selector = k,
                    lines,
                    "decoder selector out of range, no line asserted"
                );
            }
        }

        // Every line is woken, changed or not.
        for line in 0..lines {
            ctx.enqueue(FIRST_OUTPUT + line)?;
        }
        Ok(())
    }

    /// An unknown selector is a defined case, so the decoder always runs.
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
        Some(Box::new(Decoder {
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
        instance: &str,
        nets: &[String],
    ) -> Option<String> {
        export.require_module(Self::OBJECT_TYPE, self.bit_width, module_verilog);

        // Module signature lists the outputs first, then `sel`.
        let mut args: Vec<&str> = nets[FIRST_OUTPUT..].iter().map(String::as_str).collect();
        args.push(&nets[INPUT]);
        Some(format!(
            "  {} {}({});\n",
            self.verilog_base_type(),
            instance,
            args.join(", ")
        ))
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

/// Shared module definition for a decoder with a `width`-bit selector.
pub fn module_verilog(width: BitWidth) -> String {
    let outputs = width.cardinality();
    let names: Vec<String> = (0..outputs).map(|j| format!("out{}", j)).collect();

    let mut s = String::new();
    s.push('\n');
    s.push_str(&format!("module Decoder{}({}, sel);\n", outputs, names.join(", ")));
    s.push_str(&format!("  output reg {};\n", names.join(", ")));
    s.push_str(&format!("  input [{}:0] sel;\n", width.bits() - 1));
    s.push_str("  \n");
    s.push_str("  always @ (*) begin\n");
    for name in &names {
        s.push_str(&format!("    {} = 0;\n", name));
    }
    s.push_str("    case (sel)\n");
    for (j, name) in names.iter().enumerate() {
        s.push_str(&format!("      {} : {} = 1;\n", j, name));
    }
    s.push_str("    endcase\n");
    s.push_str("  end\n");
    s.push_str("endmodule\n");
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulationError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_rejects_bad_width() {
        assert_eq!(
            Decoder::new(Placement::default(), 0),
            Err(SimulationError::InvalidWidth(0))
        );
        assert_eq!(
            Decoder::new(Placement::default(), 33),
            Err(SimulationError::InvalidWidth(33))
        );
    }

    #[test]
    fn test_ports_layout() {
        let d = Decoder::new(Placement::default(), 3).unwrap();
        let ports = d.ports();
        assert_eq!(ports.len(), 9);
        assert_eq!(ports[0], Port::input("input", BitWidth::new(3).unwrap()));
        assert!(ports[1..]
            .iter()
            .all(|p| *p == Port::output("output1", BitWidth::ONE)));
        assert_eq!(d.port_count(), 9);
    }

    #[test]
    fn test_port_count_at_full_width() {
        let d = Decoder::new(Placement::default(), 32).unwrap();
        assert_eq!(d.port_count(), 1 + (1u64 << 32));
    }

    #[test]
    fn test_with_bit_width_guards() {
        let d = Decoder::new(Placement::at(10, 20), 2).unwrap();
        assert!(d.with_bit_width(2).is_none());
        assert!(d.with_bit_width(0).is_none());
        assert!(d.with_bit_width(33).is_none());

        let rebuilt = d.with_bit_width(3).unwrap();
        assert_eq!(rebuilt.bit_width().bits(), 3);
        assert_eq!(rebuilt.placement(), Placement::at(10, 20));
    }

    #[test]
    fn test_verilog_base_type() {
        let d = Decoder::new(Placement::default(), 2).unwrap();
        assert_eq!(d.verilog_base_type(), "Decoder4");
    }

    #[test]
    fn test_module_verilog_one_bit() {
        let expected = "\nmodule Decoder2(out0, out1, sel);\n\
                        \x20 output reg out0, out1;\n\
                        \x20 input [0:0] sel;\n\
                        \x20 \n\
                        \x20 always @ (*) begin\n\
                        \x20   out0 = 0;\n\
                        \x20   out1 = 0;\n\
                        \x20   case (sel)\n\
                        \x20     0 : out0 = 1;\n\
                        \x20     1 : out1 = 1;\n\
                        \x20   endcase\n\
                        \x20 end\n\
                        endmodule\n";
        assert_eq!(module_verilog(BitWidth::ONE), expected);
    }
}
