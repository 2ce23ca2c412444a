//! `Junction`: a bare wire junction.

use crate::element::{Element, Placement, Port, ResolveContext};
use crate::error::SimResult;
use crate::persist::ConstructorParameters;
use crate::value::BitWidth;

/// A single internal node that lets one wire fan out to many.
///
/// The junction has no behavior of its own: the simulation loop copies
/// values into it and forwards them onwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Junction {
    placement: Placement,
    bit_width: BitWidth,
}

impl Junction {
    pub const OBJECT_TYPE: &'static str = "Junction";

    pub fn new(placement: Placement, bits: u32) -> SimResult<Self> {
        Ok(Junction {
            placement,
            bit_width: BitWidth::new(bits)?,
        })
    }

    pub(crate) fn from_parameters(
        placement: Placement,
        params: &ConstructorParameters,
    ) -> SimResult<Self> {
        Junction::new(placement, params.bit_width.into())
    }
}

impl Element for Junction {
    fn object_type(&self) -> &'static str {
        Self::OBJECT_TYPE
    }

    fn ports(&self) -> Vec<Port> {
        vec![Port::internal("node", self.bit_width)]
    }

    fn resolve(&mut self, _ctx: &mut ResolveContext<'_>) -> SimResult<()> {
        Ok(())
    }

    fn placement(&self) -> Placement {
        self.placement
    }

    fn bit_width(&self) -> BitWidth {
        self.bit_width
    }

    fn constructor_parameters(&self) -> ConstructorParameters {
        ConstructorParameters::new(self.placement.direction, self.bit_width)
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
