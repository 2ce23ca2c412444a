//! Built-in elements and the type registry used when loading saves.

pub mod decoder;
pub mod gate;
pub mod junction;
pub mod pin;

pub use decoder::Decoder;
pub use gate::{Gate, GateKind};
pub use junction::Junction;
pub use pin::{InputPin, OutputPin};

use crate::element::{Element, Placement};
use crate::error::{SimResult, SimulationError};
use crate::persist::ConstructorParameters;

/// Rebuild an element from its saved type name and constructor arguments.
pub fn build(
    object_type: &str,
    placement: Placement,
    params: &ConstructorParameters,
) -> SimResult<Box<dyn Element>> {
    if let Some(kind) = GateKind::from_object_type(object_type) {
        return Ok(Box::new(Gate::from_parameters(kind, placement, params)?));
    }
    match object_type {
        Decoder::OBJECT_TYPE => Ok(Box::new(Decoder::from_parameters(placement, params)?)),
        InputPin::OBJECT_TYPE => Ok(Box::new(InputPin::from_parameters(placement, params)?)),
        OutputPin::OBJECT_TYPE => Ok(Box::new(OutputPin::from_parameters(placement, params)?)),
        Junction::OBJECT_TYPE => Ok(Box::new(Junction::from_parameters(placement, params)?)),
        other => Err(SimulationError::UnknownElementType(other.to_string())),
    }
}
