//! Abstract node/edge graph built from the spec.
//!
//! One node per panel, device, and EOL, sized from the symbol table. Edge
//! topology depends on the routing mode:
//!
//! - **Chained** (no explicit coordinates anywhere): panel → d1 → … → dn →
//!   EOL, one edge per consecutive pair — series wiring, not a star.
//! - **Star-from-bus** (explicit coordinates): panel → virtual bus node,
//!   then one bus → device edge per device and bus → EOL.
//!
//! Devices on the reserved `"PANEL"` circuit are excluded from circuit
//! construction and get direct panel → device stub edges. A circuit bound
//! to a port the panel does not declare fails the whole compile here,
//! before any geometry exists.

use thiserror::Error;

use crate::spec::{Point, PortDef, RiserSpec, PANEL_CIRCUIT_ID};

/// Configuration faults that fail a compile outright.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CompileError {
    #[error("circuit {circuit} references missing panel port {port}")]
    MissingPort { circuit: String, port: String },
}

/// Which edge topology the graph was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyMode {
    Chained,
    StarFromBus,
}

/// Role of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Panel,
    Device,
    Eol,
    /// Synthetic invisible bus node (star mode only).
    Bus,
}

/// A node in the abstract graph, sized but not yet positioned.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub id: String,
    pub role: NodeRole,
    pub width: f64,
    pub height: f64,
    /// Explicit position to preserve verbatim, when the spec declares one.
    pub fixed: Option<Point>,
    /// Owning circuit id, if any.
    pub circuit: Option<String>,
    /// Symbol type name for sizing/rendering lookups.
    pub kind: Option<String>,
}

/// A directed edge between graph nodes.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Owning circuit id; `None` for panel-local stubs.
    pub circuit: Option<String>,
    /// Named panel port this edge originates from. Set only on the first
    /// hop out of the panel.
    pub source_port: Option<String>,
}

/// Abstract diagram graph: input to both layout strategies.
#[derive(Debug, Clone)]
pub struct DiagramGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Panel ports carried through for the engine adapter.
    pub ports: Vec<PortDef>,
    pub mode: TopologyMode,
}

impl DiagramGraph {
    /// Build the graph from a spec. Fails fast on configuration faults.
    pub fn from_spec(spec: &RiserSpec) -> Result<Self, CompileError> {
        // Port references are validated for every circuit, including empty
        // ones: a bad binding is a configuration fault, not dead geometry.
        for circuit in &spec.circuits {
            if let Some(port) = &circuit.from_port {
                if spec.panel.port(port).is_none() {
                    return Err(CompileError::MissingPort {
                        circuit: circuit.id.clone(),
                        port: port.clone(),
                    });
                }
            }
        }

        let mode = if spec.has_explicit_positions() {
            TopologyMode::StarFromBus
        } else {
            TopologyMode::Chained
        };

        let mut nodes = Vec::new();
        let mut edges = Vec::new();

        let (pw, ph) = spec.symbols.size("Panel");
        let panel_id = spec.panel.id.clone();
        nodes.push(GraphNode {
            id: panel_id.clone(),
            role: NodeRole::Panel,
            width: pw,
            height: ph,
            fixed: spec.panel.pos,
            circuit: None,
            kind: Some("Panel".into()),
        });

        for circuit in &spec.circuits {
            // Zero devices → no geometry, even with a dangling EOL entry.
            if circuit.devices.is_empty() {
                continue;
            }

            for device in &circuit.devices {
                let (w, h) = spec.symbols.size(&device.kind);
                nodes.push(GraphNode {
                    id: device.id.clone(),
                    role: NodeRole::Device,
                    width: w,
                    height: h,
                    fixed: device.pos,
                    circuit: Some(circuit.id.clone()),
                    kind: Some(device.kind.clone()),
                });
            }

            let eol_node_id = circuit.eol.as_ref().map(|eol| {
                let (w, h) = spec.symbols.size("EOL");
                let id = format!("{}::eol", circuit.id);
                nodes.push(GraphNode {
                    id: id.clone(),
                    role: NodeRole::Eol,
                    width: w,
                    height: h,
                    fixed: eol.pos(),
                    circuit: Some(circuit.id.clone()),
                    kind: Some("EOL".into()),
                });
                id
            });

            match mode {
                TopologyMode::Chained => {
                    // Series wiring: panel → d1 → d2 → … → dn → EOL.
                    let mut prev = panel_id.clone();
                    for (i, device) in circuit.devices.iter().enumerate() {
                        edges.push(GraphEdge {
                            id: format!("{}:{}", circuit.id, i),
                            source: prev,
                            target: device.id.clone(),
                            circuit: Some(circuit.id.clone()),
                            source_port: if i == 0 { circuit.from_port.clone() } else { None },
                        });
                        prev = device.id.clone();
                    }
                    if let Some(eol_id) = eol_node_id {
                        edges.push(GraphEdge {
                            id: format!("{}:eol", circuit.id),
                            source: prev,
                            target: eol_id,
                            circuit: Some(circuit.id.clone()),
                            source_port: None,
                        });
                    }
                }
                TopologyMode::StarFromBus => {
                    let bus_id = format!("{}::bus", circuit.id);
                    let (bus_x, bus_w) = bus_extent(circuit.devices.iter().filter_map(|d| d.pos));
                    nodes.push(GraphNode {
                        id: bus_id.clone(),
                        role: NodeRole::Bus,
                        width: bus_w,
                        height: 0.0,
                        fixed: bus_x.map(|x| Point::new(x, 0.0)),
                        circuit: Some(circuit.id.clone()),
                        kind: None,
                    });
                    edges.push(GraphEdge {
                        id: format!("{}:bus", circuit.id),
                        source: panel_id.clone(),
                        target: bus_id.clone(),
                        circuit: Some(circuit.id.clone()),
                        source_port: circuit.from_port.clone(),
                    });
                    for (i, device) in circuit.devices.iter().enumerate() {
                        edges.push(GraphEdge {
                            id: format!("{}:{}", circuit.id, i),
                            source: bus_id.clone(),
                            target: device.id.clone(),
                            circuit: Some(circuit.id.clone()),
                            source_port: None,
                        });
                    }
                    if let Some(eol_id) = eol_node_id {
                        edges.push(GraphEdge {
                            id: format!("{}:eol", circuit.id),
                            source: bus_id,
                            target: eol_id,
                            circuit: Some(circuit.id.clone()),
                            source_port: None,
                        });
                    }
                }
            }
        }

        // Panel-local equipment: plain panel → device stubs, no circuit tag.
        for device in &spec.panel_devices {
            let (w, h) = spec.symbols.size(&device.kind);
            nodes.push(GraphNode {
                id: device.id.clone(),
                role: NodeRole::Device,
                width: w,
                height: h,
                fixed: device.pos,
                circuit: None,
                kind: Some(device.kind.clone()),
            });
            edges.push(GraphEdge {
                id: format!("{}:{}", PANEL_CIRCUIT_ID, device.id),
                source: panel_id.clone(),
                target: device.id.clone(),
                circuit: None,
                source_port: None,
            });
        }

        Ok(DiagramGraph {
            nodes,
            edges,
            ports: spec.panel.ports.clone(),
            mode,
        })
    }
}

/// Horizontal extent (min x, width) of the positioned devices on a circuit.
fn bus_extent(positions: impl Iterator<Item = Point>) -> (Option<f64>, f64) {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for p in positions {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
    }
    if min_x.is_finite() {
        (Some(min_x), max_x - min_x)
    } else {
        (None, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::parse_spec;

    fn positioned_spec() -> RiserSpec {
        parse_spec(
            r#"{
                "panel": {"id": "FACP", "x": 100, "y": 40},
                "circuits": [{"id": "SLC1", "color": "red"}],
                "devices": [
                    {"id": "S1", "type": "Smoke", "circuit": "SLC1", "x": 30, "y": 100},
                    {"id": "P1", "type": "Pull", "circuit": "SLC1", "x": 60, "y": 100},
                    {"id": "CELL", "type": "Cell", "circuit": "PANEL", "x": 160, "y": 40}
                ],
                "eols": [{"circuit": "SLC1", "x": 60}]
            }"#,
        )
        .unwrap()
    }

    fn declarative_spec() -> RiserSpec {
        parse_spec(
            r#"{
                "panel": {"id": "FACP", "ports": [{"id": "p1", "side": "west"}]},
                "circuits": [{
                    "id": "SLC1", "color": "red",
                    "from": {"port": "p1"},
                    "devices": [
                        {"id": "S1", "type": "Smoke"},
                        {"id": "P1", "type": "Pull"}
                    ],
                    "eol": {}
                }]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn positioned_spec_builds_star_topology() {
        let graph = DiagramGraph::from_spec(&positioned_spec()).unwrap();
        assert_eq!(graph.mode, TopologyMode::StarFromBus);
        // Panel + 2 devices + eol + bus + panel-local cell.
        assert_eq!(graph.nodes.len(), 6);
        let bus_edges: Vec<_> = graph
            .edges
            .iter()
            .filter(|e| e.source == "SLC1::bus")
            .collect();
        assert_eq!(bus_edges.len(), 3); // two devices + eol
    }

    #[test]
    fn declarative_spec_builds_chained_topology() {
        let graph = DiagramGraph::from_spec(&declarative_spec()).unwrap();
        assert_eq!(graph.mode, TopologyMode::Chained);
        // panel→S1, S1→P1, P1→eol.
        assert_eq!(graph.edges.len(), 3);
        assert_eq!(graph.edges[0].source, "FACP");
        assert_eq!(graph.edges[1].source, "S1");
        assert_eq!(graph.edges[2].target, "SLC1::eol");
    }

    #[test]
    fn source_port_only_on_first_hop() {
        let graph = DiagramGraph::from_spec(&declarative_spec()).unwrap();
        assert_eq!(graph.edges[0].source_port.as_deref(), Some("p1"));
        assert!(graph.edges[1].source_port.is_none());
        assert!(graph.edges[2].source_port.is_none());
    }

    #[test]
    fn missing_port_fails_fast() {
        let spec = parse_spec(
            r#"{
                "panel": {"id": "FACP", "ports": [{"id": "p1", "side": "west"}]},
                "circuits": [{
                    "id": "SLC1", "color": "red",
                    "from": {"port": "nope"},
                    "devices": [{"id": "S1", "type": "Smoke"}]
                }]
            }"#,
        )
        .unwrap();
        let err = DiagramGraph::from_spec(&spec).unwrap_err();
        assert_eq!(
            err,
            CompileError::MissingPort {
                circuit: "SLC1".into(),
                port: "nope".into(),
            }
        );
    }

    #[test]
    fn empty_circuit_produces_no_nodes_or_edges() {
        let spec = parse_spec(
            r#"{
                "panel": {"id": "FACP", "x": 0, "y": 0},
                "circuits": [{"id": "SLC1", "color": "red"}],
                "devices": [],
                "eols": [{"circuit": "SLC1", "x": 10}]
            }"#,
        )
        .unwrap();
        let graph = DiagramGraph::from_spec(&spec).unwrap();
        assert_eq!(graph.nodes.len(), 1); // panel only
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn panel_devices_get_direct_stub_edges() {
        let graph = DiagramGraph::from_spec(&positioned_spec()).unwrap();
        let stub = graph
            .edges
            .iter()
            .find(|e| e.target == "CELL")
            .expect("panel-local device should have a stub edge");
        assert_eq!(stub.source, "FACP");
        assert!(stub.circuit.is_none());
    }

    #[test]
    fn unknown_device_type_sized_with_default() {
        let spec = parse_spec(
            r#"{
                "panel": {"id": "FACP", "x": 0, "y": 0},
                "circuits": [{"id": "C1", "color": "black"}],
                "devices": [{"id": "W1", "type": "Waterflow", "circuit": "C1", "x": 5, "y": 5}]
            }"#,
        )
        .unwrap();
        let graph = DiagramGraph::from_spec(&spec).unwrap();
        let node = graph.nodes.iter().find(|n| n.id == "W1").unwrap();
        assert_eq!((node.width, node.height), (20.0, 20.0));
    }
}
