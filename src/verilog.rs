//! Verilog export.
//!
//! Every wire-connected group of nodes becomes one net, named after its
//! lowest node ID (`n7`). Input and output pins become ports of the top
//! module; every other net is declared as a `wire`. Elements that need a
//! shared module definition register it with the [`VerilogExport`] pass,
//! which emits each `(kind, width)` pair once.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::circuit::Circuit;
use crate::node::NodeId;
use crate::value::BitWidth;

/// Emits the shared module definition for one width.
pub type ModuleEmitter = fn(BitWidth) -> String;

/// State for one export pass.
///
/// Keeps the shared module definitions required so far and the ports the
/// pins contributed. [`Circuit::export_verilog_with`] resets it first, so
/// a pass never sees definitions left over from the previous one.
#[derive(Debug, Default, Clone)]
pub struct VerilogExport {
    shared: BTreeMap<(&'static str, BitWidth), ModuleEmitter>,
    ports: Vec<(String, String, BitWidth)>,
}

impl VerilogExport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything registered by a previous pass.
    pub fn reset(&mut self) {
        self.shared.clear();
        self.ports.clear();
    }

    /// Register the shared module `kind` at `width`. Repeats are ignored.
    pub fn require_module(&mut self, kind: &'static str, width: BitWidth, emit: ModuleEmitter) {
        self.shared.entry((kind, width)).or_insert(emit);
    }

    /// Widths registered for `kind`, ascending.
    pub fn widths(&self, kind: &str) -> Vec<BitWidth> {
        self.shared
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, w)| *w)
            .collect()
    }

    /// Number of distinct shared modules registered.
    pub fn module_count(&self) -> usize {
        self.shared.len()
    }

    /// All shared module definitions, ordered by kind then width.
    pub fn module_definitions(&self) -> String {
        self.shared
            .iter()
            .map(|((_, width), emit)| emit(*width))
            .collect()
    }

    /// Declare `net` as a port of the top module.
    pub fn add_port(&mut self, net: &str, direction: &str, width: BitWidth) {
        if self.ports.iter().all(|(n, _, _)| n != net) {
            self.ports.push((net.to_string(), direction.to_string(), width));
        }
    }

    fn is_port(&self, net: &str) -> bool {
        self.ports.iter().any(|(n, _, _)| n == net)
    }
}

impl Circuit {
    /// Export the circuit as a Verilog top module named `top`, followed by
    /// the shared module definitions it needs.
    pub fn export_verilog(&self, top: &str) -> String {
        self.export_verilog_with(&mut VerilogExport::new(), top)
    }

    /// Like [`export_verilog`](Self::export_verilog), reusing `export`.
    pub fn export_verilog_with(&self, export: &mut VerilogExport, top: &str) -> String {
        export.reset();
        let nets = self.net_names();

        let mut body = String::new();
        let mut used: BTreeSet<&str> = BTreeSet::new();
        for (id, slot) in &self.elements {
            let names: Vec<String> = slot
                .nodes
                .iter()
                .map(|n| nets.get(n).cloned().unwrap_or_else(|| net_name(*n)))
                .collect();
            let instance = format!("{}_{}", slot.element.object_type().to_lowercase(), id.raw());
            if let Some(text) = slot.element.export_verilog(export, &instance, &names) {
                body.push_str(&text);
                used.extend(slot.nodes.iter().filter_map(|n| nets.get(n)).map(String::as_str));
            }
        }

        let mut out = String::new();
        let port_names: Vec<&str> = export.ports.iter().map(|(n, _, _)| n.as_str()).collect();
        out.push_str(&format!("module {}({});\n", top, port_names.join(", ")));
        for (net, direction, width) in &export.ports {
            out.push_str(&format!("  {} {}{};\n", direction, range(*width), net));
        }
        for net in used.iter().filter(|n| !export.is_port(n)) {
            let width = self
                .nodes
                .iter()
                .find(|node| nets.get(&node.id()).map(String::as_str) == Some(*net))
                .map(|node| node.width())
                .unwrap_or(BitWidth::ONE);
            out.push_str(&format!("  wire {}{};\n", range(width), net));
        }
        out.push_str(&body);
        out.push_str("endmodule\n");
        out.push_str(&export.module_definitions());
        out
    }

    /// Net name for every node, shared across each wired group.
    fn net_names(&self) -> BTreeMap<NodeId, String> {
        let mut names = BTreeMap::new();
        // Nodes iterate in ascending ID order, so the first unvisited node
        // of a group is its lowest.
        for node in self.nodes.iter() {
            if names.contains_key(&node.id()) {
                continue;
            }
            let name = net_name(node.id());
            let mut queue = VecDeque::from([node.id()]);
            while let Some(id) = queue.pop_front() {
                if names.contains_key(&id) {
                    continue;
                }
                names.insert(id, name.clone());
                if let Some(n) = self.nodes.get(id) {
                    queue.extend(n.connections().iter().copied());
                }
            }
        }
        names
    }
}

fn net_name(id: NodeId) -> String {
    format!("n{}", id.raw())
}

fn range(width: BitWidth) -> String {
    if width.bits() > 1 {
        format!("[{}:0] ", width.bits() - 1)
    } else {
        String::new()
    }
}
