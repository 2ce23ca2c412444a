//! # logicsim: event-driven digital logic simulation
//!
//! A circuit is an arena of elements (decoders, gates, pins) that own
//! value-carrying nodes. Wires join nodes of equal width. Changing a
//! node queues it; draining the queue copies values across wires and
//! re-resolves the elements downstream until nothing changes.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────┐
//! │          Simulation            │ ← drain loop, step cap, trace
//! │  ┌──────────────────────────┐ │
//! │  │        Scheduler          │ │ ← FIFO queue of NodeIds
//! │  └──────────────────────────┘ │
//! └──────────────┬────────────────┘
//!                │ &mut Circuit
//! ┌──────────────▼────────────────┐
//! │           Circuit              │ ← element arena, wiring, resize
//! │  ┌───────────┐ ┌────────────┐ │
//! │  │ Elements  │ │ NodeStore  │ │ ← Box<dyn Element> / value cells
//! │  └───────────┘ └────────────┘ │
//! └───────────────────────────────┘
//!        │ persist        │ verilog
//!        ▼                ▼
//!   CircuitSave      top module + shared modules
//! ```
//!
//! ## Example
//!
//! ```rust
//! use logicsim::{Circuit, Decoder, InputPin, Placement, Simulation};
//!
//! let mut circuit = Circuit::new();
//! let sel = circuit.add(InputPin::new(Placement::default(), 2)?)?;
//! let dec = circuit.add(Decoder::new(Placement::default(), 2)?)?;
//! circuit.wire(sel, 0, dec, 0)?;
//!
//! let mut sim = Simulation::new();
//! sim.settle(&mut circuit)?;
//! sim.set_input(&mut circuit, sel, Some(3))?;
//! assert_eq!(
//!     circuit.output_values(dec)?,
//!     vec![Some(0), Some(0), Some(0), Some(1)]
//! );
//! # Ok::<(), logicsim::SimulationError>(())
//! ```

pub mod circuit;
pub mod element;
pub mod error;
pub mod hash;
pub mod node;
pub mod persist;
pub mod scheduler;
pub mod simulation;
pub mod tick;
pub mod trace;
pub mod value;
pub mod verilog;


// Re-exports for convenience.
pub use circuit::Circuit;
pub use element::{
    Decoder, Element, Gate, GateKind, InputPin, Junction, Orientation, OutputPin, Placement,
    Port, ResolveContext,
};
pub use error::{SimResult, SimulationError};
pub use node::{Direction, ElementId, Node, NodeId, NodeStore};
pub use persist::{CircuitSave, ConstructorParameters, ElementSave, NodeSave};
pub use scheduler::Scheduler;
pub use simulation::{DrainReport, Simulation, SimulationConfig};
pub use tick::Tick;
pub use trace::TraceEntry;
pub use value::{BitWidth, Signal};
pub use verilog::VerilogExport;
