//! Save and load hooks for the persistence layer.
//!
//! A save lists every node once, by index, together with the indices it
//! is wired to. Elements refer to their nodes by those indices, grouped
//! by port group (`"input"`, `"output1"`, ...), and carry just the
//! arguments needed to construct them again. Node values are not saved:
//! settle the loaded circuit to recompute them.
//!
//! The JSON form follows the editor's save files:
//!
//! ```text
//! {
//!   "objectType": "Decoder", "x": 100, "y": 50,
//!   "constructorParamaters": ["RIGHT", 2],
//!   "nodes": { "input": 1, "output1": [2, 3, 4, 5] }
//! }
//! ```
//!
//! Gates save `[direction, inputLength, bitWidth]`, input pins add
//! `"values": { "state": .. }`, and a group holding a single node is
//! written as a bare index. Both forms of a group are accepted on load.

use std::collections::BTreeMap;

use crate::circuit::Circuit;
use crate::element::builtin;
use crate::element::{Orientation, Placement};
use crate::error::{SimResult, SimulationError};
use crate::node::NodeId;
use crate::value::BitWidth;

// ── Save records ──────────────────────────────────────────────────────

/// The arguments an element is rebuilt from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstructorParameters {
    pub direction: Orientation,
    pub bit_width: BitWidth,
    /// Operand count, for gates.
    pub input_length: Option<usize>,
    /// Current state, for input pins.
    pub state: Option<u32>,
}

impl ConstructorParameters {
    pub fn new(direction: Orientation, bit_width: BitWidth) -> Self {
        ConstructorParameters {
            direction,
            bit_width,
            input_length: None,
            state: None,
        }
    }

    pub fn with_input_length(mut self, inputs: usize) -> Self {
        self.input_length = Some(inputs);
        self
    }

    pub fn with_state(mut self, state: Option<u32>) -> Self {
        self.state = state;
        self
    }
}

/// One saved element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serialize",
    serde(from = "json::RawElement", into = "json::RawElement")
)]
pub struct ElementSave {
    pub object_type: String,
    pub x: i32,
    pub y: i32,
    pub constructor_parameters: ConstructorParameters,
    /// Port group → indices into [`CircuitSave::nodes`].
    pub nodes: BTreeMap<String, Vec<usize>>,
}

/// One saved node: the indices of the nodes wired to it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeSave {
    pub connections: Vec<usize>,
}

/// A whole saved circuit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct CircuitSave {
    pub nodes: Vec<NodeSave>,
    pub elements: Vec<ElementSave>,
}

// ── Circuit hooks ─────────────────────────────────────────────────────

impl Circuit {
    /// Snapshot the circuit's structure.
    pub fn save(&self) -> CircuitSave {
        let index: BTreeMap<NodeId, usize> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id(), i))
            .collect();

        let nodes = self
            .nodes
            .iter()
            .map(|node| NodeSave {
                connections: node
                    .connections()
                    .iter()
                    .filter_map(|peer| index.get(peer).copied())
                    .collect(),
            })
            .collect();

        let elements = self
            .elements
            .values()
            .map(|slot| {
                let placement = slot.element.placement();
                let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
                for (port, node) in slot.element.ports().iter().zip(&slot.nodes) {
                    if let Some(&i) = index.get(node) {
                        groups.entry(port.group.to_string()).or_default().push(i);
                    }
                }
                ElementSave {
                    object_type: slot.element.object_type().to_string(),
                    x: placement.x,
                    y: placement.y,
                    constructor_parameters: slot.element.constructor_parameters(),
                    nodes: groups,
                }
            })
            .collect();

        CircuitSave { nodes, elements }
    }

    /// Rebuild a circuit from a save.
    ///
    /// Element and node IDs in the result are fresh; only structure and
    /// wiring are restored.
    pub fn load(save: &CircuitSave) -> SimResult<Circuit> {
        let mut circuit = Circuit::new();
        let mut mapped: Vec<Option<NodeId>> = vec![None; save.nodes.len()];

        for (n, saved) in save.elements.iter().enumerate() {
            let params = &saved.constructor_parameters;
            let placement = Placement::new(saved.x, saved.y, params.direction);
            let element = builtin::build(&saved.object_type, placement, params)?;
            let id = circuit.add_boxed(element)?;
            let ports = circuit
                .element(id)
                .map(|el| el.ports())
                .unwrap_or_default();

            let declared: usize = saved.nodes.values().map(Vec::len).sum();
            if declared != ports.len() {
                return Err(SimulationError::InvalidSave(format!(
                    "element #{} ({}) lists {} nodes, expected {}",
                    n,
                    saved.object_type,
                    declared,
                    ports.len()
                )));
            }

            let allocated = circuit.ports(id)?.to_vec();
            let mut cursor: BTreeMap<&str, usize> = BTreeMap::new();
            for (port, node) in ports.iter().zip(allocated) {
                let k = cursor.entry(port.group).or_insert(0);
                let index = saved
                    .nodes
                    .get(port.group)
                    .and_then(|group| group.get(*k))
                    .copied()
                    .ok_or_else(|| {
                        SimulationError::InvalidSave(format!(
                            "element #{} has no node {}[{}]",
                            n, port.group, k
                        ))
                    })?;
                *k += 1;

                let slot = mapped.get_mut(index).ok_or_else(|| {
                    SimulationError::InvalidSave(format!("node index {} out of range", index))
                })?;
                if slot.is_some() {
                    return Err(SimulationError::InvalidSave(format!(
                        "node {} is claimed twice",
                        index
                    )));
                }
                *slot = Some(node);
            }
        }

        for (i, saved) in save.nodes.iter().enumerate() {
            let a = lookup(&mapped, i)?;
            for &peer in &saved.connections {
                let b = lookup(&mapped, peer)?;
                circuit.connect(a, b)?;
            }
        }

        Ok(circuit)
    }

    /// Serialize the circuit structure as pretty-printed JSON.
    #[cfg(feature = "serialize")]
    pub fn to_json(&self) -> SimResult<String> {
        serde_json::to_string_pretty(&self.save())
            .map_err(|e| SimulationError::Serialization(e.to_string()))
    }

    /// Rebuild a circuit from JSON produced by [`to_json`](Self::to_json).
    #[cfg(feature = "serialize")]
    pub fn from_json(json: &str) -> SimResult<Circuit> {
        let save: CircuitSave =
            serde_json::from_str(json).map_err(|e| SimulationError::Serialization(e.to_string()))?;
        Circuit::load(&save)
    }
}

fn lookup(mapped: &[Option<NodeId>], index: usize) -> SimResult<NodeId> {
    mapped
        .get(index)
        .copied()
        .flatten()
        .ok_or_else(|| SimulationError::InvalidSave(format!("node {} belongs to no element", index)))
}

// ── JSON layout ───────────────────────────────────────────────────────

#[cfg(feature = "serialize")]
mod json {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Serialize};

    use super::{ConstructorParameters, ElementSave};
    use crate::element::{InputPin, Orientation};
    use crate::BitWidth;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct RawElement {
        object_type: String,
        x: i32,
        y: i32,
        #[serde(rename = "constructorParamaters")]
        params: RawParams,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        values: Option<RawValues>,
        nodes: BTreeMap<String, RawNodes>,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum RawParams {
        Gate(Orientation, usize, BitWidth),
        Plain(Orientation, BitWidth),
    }

    #[derive(Serialize, Deserialize)]
    struct RawValues {
        state: Option<u32>,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum RawNodes {
        One(usize),
        Many(Vec<usize>),
    }

    impl From<ElementSave> for RawElement {
        fn from(save: ElementSave) -> Self {
            let p = save.constructor_parameters;
            let params = match p.input_length {
                Some(n) => RawParams::Gate(p.direction, n, p.bit_width),
                None => RawParams::Plain(p.direction, p.bit_width),
            };
            let values = (save.object_type == InputPin::OBJECT_TYPE)
                .then(|| RawValues { state: p.state });
            let nodes = save
                .nodes
                .into_iter()
                .map(|(group, indices)| match indices.as_slice() {
                    [one] => (group, RawNodes::One(*one)),
                    _ => (group, RawNodes::Many(indices)),
                })
                .collect();
            RawElement {
                object_type: save.object_type,
                x: save.x,
                y: save.y,
                params,
                values,
                nodes,
            }
        }
    }

    impl From<RawElement> for ElementSave {
        fn from(raw: RawElement) -> Self {
            let mut params = match raw.params {
                RawParams::Gate(direction, n, width) => {
                    ConstructorParameters::new(direction, width).with_input_length(n)
                }
                RawParams::Plain(direction, width) => ConstructorParameters::new(direction, width),
            };
            params.state = raw.values.and_then(|v| v.state);
            let nodes = raw
                .nodes
                .into_iter()
                .map(|(group, nodes)| match nodes {
                    RawNodes::One(i) => (group, vec![i]),
                    RawNodes::Many(v) => (group, v),
                })
                .collect();
            ElementSave {
                object_type: raw.object_type,
                x: raw.x,
                y: raw.y,
                constructor_parameters: params,
                nodes,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Decoder, Gate, InputPin, Orientation};
    use crate::simulation::Simulation;
    use crate::value::BitWidth;
    use pretty_assertions::assert_eq;

    fn sample() -> (Circuit, crate::node::ElementId) {
        let mut c = Circuit::new();
        let pin = c.add(InputPin::new(Placement::at(0, 0), 2).unwrap()).unwrap();
        let d = Decoder::create(&mut c, 100, 50, Orientation::Right, 2).unwrap();
        let and = c.add(Gate::and(Placement::at(200, 0), 1).unwrap()).unwrap();
        c.wire(pin, 0, d, 0).unwrap();
        c.wire(d, 3, and, 0).unwrap();
        c.wire(d, 4, and, 1).unwrap();
        (c, d)
    }

    #[test]
    fn test_save_decoder_record() {
        let (c, _) = sample();
        let save = c.save();
        let dec = save
            .elements
            .iter()
            .find(|e| e.object_type == "Decoder")
            .unwrap();
        assert_eq!(dec.x, 100);
        assert_eq!(dec.y, 50);
        assert_eq!(dec.constructor_parameters.direction, Orientation::Right);
        assert_eq!(dec.constructor_parameters.bit_width.bits(), 2);
        assert_eq!(dec.nodes["input"].len(), 1);
        assert_eq!(dec.nodes["output1"].len(), 4);

        // The selector is wired to the pin's output.
        let sel = dec.nodes["input"][0];
        assert_eq!(save.nodes[sel].connections.len(), 1);
    }

    #[test]
    fn test_load_restores_structure_and_behavior() {
        let (c, _) = sample();
        let save = c.save();
        let mut loaded = Circuit::load(&save).unwrap();
        assert_eq!(loaded.save(), save);

        let ids = loaded.element_ids();
        let (pin, d) = (ids[0], ids[1]);
        let mut sim = Simulation::new();
        sim.settle(&mut loaded).unwrap();
        sim.set_input(&mut loaded, pin, Some(2)).unwrap();
        assert_eq!(
            loaded.output_values(d).unwrap(),
            vec![Some(0), Some(0), Some(1), Some(0)]
        );
    }

    #[test]
    fn test_load_rejects_unknown_type() {
        let mut save = sample().0.save();
        save.elements[0].object_type = "Clock".into();
        assert_eq!(
            Circuit::load(&save).unwrap_err(),
            SimulationError::UnknownElementType("Clock".into())
        );
    }

    #[test]
    fn test_load_rejects_node_count_mismatch() {
        let mut save = sample().0.save();
        let dec = save
            .elements
            .iter_mut()
            .find(|e| e.object_type == "Decoder")
            .unwrap();
        dec.nodes.get_mut("output1").unwrap().pop();
        assert!(matches!(
            Circuit::load(&save),
            Err(SimulationError::InvalidSave(_))
        ));
    }

    #[test]
    fn test_load_rejects_orphan_node() {
        let mut save = sample().0.save();
        save.nodes.push(NodeSave::default());
        assert!(matches!(
            Circuit::load(&save),
            Err(SimulationError::InvalidSave(msg)) if msg.contains("no element")
        ));
    }

    #[test]
    fn test_load_rejects_oversized_pin_state() {
        let mut save = sample().0.save();
        assert_eq!(save.elements[0].object_type, "Input");
        save.elements[0].constructor_parameters.state = Some(9);
        assert!(matches!(
            Circuit::load(&save),
            Err(SimulationError::InvalidSave(msg)) if msg.contains("does not fit 2 bits")
        ));
    }

    #[test]
    fn test_load_keeps_undefined_pin_state() {
        let mut c = Circuit::new();
        let pin = c.add(InputPin::new(Placement::default(), 1).unwrap()).unwrap();
        let node = c.port(pin, 0).unwrap();
        c.element_as_mut::<InputPin>(pin)
            .unwrap()
            .set_state(node, None)
            .unwrap();

        let loaded = Circuit::load(&c.save()).unwrap();
        let id = loaded.element_ids()[0];
        assert_eq!(loaded.element_as::<InputPin>(id).unwrap().state(), None);
    }

    #[test]
    fn test_load_rejects_oversized_decoder() {
        let mut save = sample().0.save();
        let dec = save
            .elements
            .iter_mut()
            .find(|e| e.object_type == "Decoder")
            .unwrap();
        dec.constructor_parameters.bit_width = BitWidth::new(32).unwrap();
        assert!(matches!(
            Circuit::load(&save),
            Err(SimulationError::TooManyNodes { object_type, .. }) if object_type == "Decoder"
        ));
    }

    #[cfg(feature = "serialize")]
    #[test]
    fn test_json_round_trip_fields() {
        let (c, _) = sample();
        let json = c.to_json().unwrap();
        assert!(json.contains("\"objectType\": \"Decoder\""));
        assert!(json.contains("\"constructorParamaters\": [\n        \"RIGHT\",\n        2\n      ]"));
        assert!(json.contains("\"input\": 1,"));
        assert!(json.contains("\"output1\": [\n"));
        assert!(json.contains("\"state\": 0"));

        let loaded = Circuit::from_json(&json).unwrap();
        assert_eq!(loaded.save(), c.save());
    }

    #[cfg(feature = "serialize")]
    #[test]
    fn test_json_gate_parameters_carry_input_length() {
        let (c, _) = sample();
        let v: serde_json::Value = serde_json::from_str(&c.to_json().unwrap()).unwrap();
        let gate = v["elements"]
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["objectType"] == "AndGate")
            .unwrap();
        assert_eq!(gate["constructorParamaters"], serde_json::json!(["LEFT", 2, 1]));
        assert!(gate.get("values").is_none());
    }

    #[cfg(feature = "serialize")]
    #[test]
    fn test_json_loads_editor_save() {
        let json = r#"{
            "nodes": [
                { "connections": [1] },
                { "connections": [0] },
                { "connections": [] },
                { "connections": [] }
            ],
            "elements": [
                {
                    "objectType": "Input", "x": 0, "y": 0,
                    "constructorParamaters": ["RIGHT", 1],
                    "values": { "state": 1 },
                    "nodes": { "output1": 0 }
                },
                {
                    "objectType": "Decoder", "x": 60, "y": 0,
                    "constructorParamaters": ["LEFT", 1],
                    "nodes": { "input": 1, "output1": [2, 3] }
                }
            ]
        }"#;
        let mut c = Circuit::from_json(json).unwrap();
        let ids = c.element_ids();
        let (pin, d) = (ids[0], ids[1]);
        assert_eq!(c.element_as::<InputPin>(pin).unwrap().state(), Some(1));
        assert_eq!(c.element(d).unwrap().placement(), Placement::new(60, 0, Orientation::Left));

        Simulation::new().settle(&mut c).unwrap();
        assert_eq!(c.output_values(d).unwrap(), vec![Some(0), Some(1)]);
    }

    #[cfg(feature = "serialize")]
    #[test]
    fn test_json_rejects_invalid_width() {
        let (c, _) = sample();
        let json = c.to_json().unwrap().replace(
            "\"RIGHT\",\n        2\n",
            "\"RIGHT\",\n        33\n",
        );
        assert!(json.contains("33"));
        assert!(matches!(
            Circuit::from_json(&json),
            Err(SimulationError::Serialization(_))
        ));
    }
}
