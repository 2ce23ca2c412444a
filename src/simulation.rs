//! Simulation execution loop.
//!
//! Drives the scheduler: pops nodes, copies their values across wires,
//! resolves the elements downstream, and repeats until nothing is left to
//! propagate. The loop is synchronous and single-threaded; a drain runs to
//! completion or to its step cap.

use tracing::{debug, trace, warn};

use crate::circuit::Circuit;
use crate::element::InputPin;
use crate::error::{SimResult, SimulationError};
use crate::node::{Direction, ElementId, NodeId};
use crate::scheduler::Scheduler;
use crate::tick::Tick;
use crate::trace::TraceEntry;
use crate::value::{display_signal, Signal};

// ── Configuration ────────────────────────────────────────────────────

/// Knobs for the drain loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(default))]
pub struct SimulationConfig {
    /// Dequeues allowed per drain before it is declared non-terminating.
    pub max_steps: u64,
    /// Skip enqueueing a node that is already pending.
    pub dedupe: bool,
    /// Append a [`TraceEntry`] for every dequeue.
    pub record_trace: bool,
}

impl SimulationConfig {
    /// Default settings with a custom step cap.
    pub fn strict(max_steps: u64) -> Self {
        SimulationConfig {
            max_steps,
            ..Self::default()
        }
    }

    /// Default settings with tracing on.
    pub fn traced() -> Self {
        SimulationConfig {
            record_trace: true,
            ..Self::default()
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            max_steps: 100_000,
            dedupe: true,
            record_trace: false,
        }
    }
}

// ── DrainReport ──────────────────────────────────────────────────────

/// Summary of one completed drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct DrainReport {
    pub tick: Tick,
    /// Nodes dequeued.
    pub steps: u64,
    /// Element resolves triggered by propagation.
    pub resolved: u64,
}

// ── Simulation ────────────────────────────────────────────────────────

/// Top-level simulation driver.
///
/// Owns the scheduler; the circuit is passed in to every call, so one
/// driver can never touch another circuit's queue. Seed the queue with
/// [`set_input`](Self::set_input), [`settle`](Self::settle),
/// [`resolve_element`](Self::resolve_element) or
/// [`schedule`](Self::schedule), then call [`drain`](Self::drain).
#[derive(Debug, Clone)]
pub struct Simulation {
    scheduler: Scheduler,
    config: SimulationConfig,
    tick: Tick,
    steps_processed: u64,
    trace: Vec<TraceEntry>,
}

impl Simulation {
    /// Create a driver with default settings.
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    pub fn with_config(config: SimulationConfig) -> Self {
        Simulation {
            scheduler: Scheduler::with_dedupe(config.dedupe),
            config,
            tick: Tick::ZERO,
            steps_processed: 0,
            trace: Vec::new(),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The last completed (or aborted) drain.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Total dequeues across all drains.
    pub fn steps_processed(&self) -> u64 {
        self.steps_processed
    }

    /// Propagation trace (empty unless `record_trace` is set).
    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }

    /// Number of nodes waiting in the queue.
    pub fn pending_count(&self) -> usize {
        self.scheduler.len()
    }

    /// Returns `true` if there is nothing to propagate.
    pub fn is_idle(&self) -> bool {
        self.scheduler.is_empty()
    }

    // ── Seeding ───────────────────────────────────────────────

    /// Queue a node for propagation.
    pub fn schedule(&mut self, node: NodeId) -> bool {
        self.scheduler.enqueue(node)
    }

    /// Resolve one element now, queueing whatever it wakes.
    ///
    /// Returns whether the element was resolvable.
    pub fn resolve_element(&mut self, circuit: &mut Circuit, id: ElementId) -> SimResult<bool> {
        circuit.resolve_element(id, &mut self.scheduler)
    }

    /// Change an input pin and propagate the change.
    pub fn set_input(
        &mut self,
        circuit: &mut Circuit,
        pin: ElementId,
        value: Signal,
    ) -> SimResult<DrainReport> {
        let node = circuit.port(pin, 0)?;
        circuit
            .element_as_mut::<InputPin>(pin)
            .ok_or(SimulationError::ElementTypeMismatch {
                element: pin,
                expected: InputPin::OBJECT_TYPE.to_string(),
            })?
            .set_state(node, value)?;
        self.resolve_element(circuit, pin)?;
        self.drain(circuit)
    }

    /// Bring a freshly built or loaded circuit to a stable state.
    ///
    /// Every resolvable element is resolved once, in ID order, then the
    /// queue is drained.
    pub fn settle(&mut self, circuit: &mut Circuit) -> SimResult<DrainReport> {
        for id in circuit.element_ids() {
            circuit.resolve_element(id, &mut self.scheduler)?;
        }
        self.drain(circuit)
    }

    // ── Draining ──────────────────────────────────────────────

    /// Run the queue to empty.
    ///
    /// Fails with [`SimulationError::DrainNonTermination`] once
    /// `max_steps` dequeues have happened and work is still pending. On
    /// any error the queue is cleared, so the driver is idle again and
    /// node values are left as they were at the failure.
    #[tracing::instrument(skip_all, fields(tick = %self.tick.next()))]
    pub fn drain(&mut self, circuit: &mut Circuit) -> SimResult<DrainReport> {
        let tick = self.tick.next();
        self.tick = tick;
        debug!(pending = self.scheduler.len(), "drain started");

        let mut steps = 0u64;
        let mut resolved = 0u64;
        let result = loop {
            let Some(node) = self.scheduler.pop_next() else {
                break Ok(());
            };
            if steps >= self.config.max_steps {
                warn!(
                    limit = self.config.max_steps,
                    pending = self.scheduler.len() + 1,
                    "drain did not settle"
                );
                break Err(SimulationError::DrainNonTermination {
                    limit: self.config.max_steps,
                });
            }
            steps += 1;
            match self.propagate(circuit, node, tick, steps) {
                Ok(n) => resolved += n,
                Err(e) => break Err(e),
            }
        };
        self.steps_processed += steps;

        if let Err(e) = result {
            self.scheduler.clear();
            return Err(e);
        }
        debug!(steps, resolved, "drain settled");
        Ok(DrainReport {
            tick,
            steps,
            resolved,
        })
    }

    /// Push one dequeued node's value across its wires and resolve the
    /// elements it feeds. Returns how many elements actually resolved.
    fn propagate(
        &mut self,
        circuit: &mut Circuit,
        node: NodeId,
        tick: Tick,
        step: u64,
    ) -> SimResult<u64> {
        // Nodes of deleted elements can still be pending.
        let Some(source) = circuit.nodes.get(node) else {
            trace!(%node, "skipping deleted node");
            return Ok(0);
        };
        let value = source.value();
        let peers = source.connections().to_vec();

        if self.config.record_trace {
            self.trace.push(TraceEntry {
                tick,
                step,
                node,
                value,
            });
        }
        trace!(%node, value = %display_signal(value), fanout = peers.len(), "propagate");

        let mut woken: Vec<ElementId> = Vec::new();
        for peer in peers {
            let Some(target) = circuit.nodes.get(peer) else {
                continue;
            };
            match target.direction() {
                // Outputs are driven by their element, never by a wire.
                Direction::Output => {}
                Direction::Input => {
                    let owner = target.owner();
                    // An input shared with other inputs forwards along its net.
                    let shared = target.connections().len() > 1;
                    if circuit.nodes.write(peer, value)? && shared {
                        self.scheduler.enqueue(peer);
                    }
                    if !woken.contains(&owner) {
                        woken.push(owner);
                    }
                }
                Direction::Internal => {
                    if circuit.nodes.write(peer, value)? {
                        self.scheduler.enqueue(peer);
                    }
                }
            }
        }

        let mut resolved = 0;
        for element in woken {
            if circuit.resolve_element(element, &mut self.scheduler)? {
                resolved += 1;
            }
        }
        Ok(resolved)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
