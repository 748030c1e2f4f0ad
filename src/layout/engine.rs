//! Adapter for the external constraint-based layout engine.
//!
//! The engine itself is an opaque collaborator behind [`LayoutEngine`]:
//! callers hand an implementation to the pipeline, this module translates
//! the [`DiagramGraph`] into the engine's input shape, and normalizes the
//! engine's result back into a [`LayoutResult`]. Any engine error is
//! wrapped into an [`EngineError`] carrying a debug snapshot of the
//! offending graph and reported upward for the fallback policy to handle —
//! it never reaches the caller as a hard failure.

use thiserror::Error;

use crate::layout::graph::{DiagramGraph, GraphEdge, NodeRole};
use crate::layout::types::{LayoutResult, Node, RoutedPath};
use crate::spec::{Orientation, Point, RiserSpec, Side};

/// Partition index for west-routed nodes (left of the panel).
pub const PARTITION_WEST: i32 = 0;
/// Partition index for the panel and unoriented circuits.
pub const PARTITION_CENTER: i32 = 1;
/// Partition index for east-routed nodes (right of the panel).
pub const PARTITION_EAST: i32 = 2;

/// Node in the engine's input shape.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineNode {
    pub id: String,
    pub width: f64,
    pub height: f64,
    /// Position to pin when the engine runs in fixed mode.
    pub fixed: Option<(f64, f64)>,
    /// Left/center/right lane assignment, present when partitioning is on.
    pub partition: Option<i32>,
    pub ports: Vec<EnginePort>,
}

/// Declared attachment point on an engine node.
#[derive(Debug, Clone, PartialEq)]
pub struct EnginePort {
    pub id: String,
    pub side: Side,
}

/// Edge in the engine's input shape.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Source-port designation; set only on the first hop from the panel.
    pub source_port: Option<String>,
}

/// Complete engine input.
#[derive(Debug, Clone, Default)]
pub struct EngineGraph {
    pub nodes: Vec<EngineNode>,
    pub edges: Vec<EngineEdge>,
}

/// Global engine options. The algorithm family itself is the engine's
/// business; these options only constrain its output.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// Primary flow direction.
    pub direction: FlowDirection,
    /// Request orthogonal edge routing (always on for riser diagrams).
    pub orthogonal: bool,
    /// Enforce discrete left/center/right partitions.
    pub partitioned: bool,
    /// Pin nodes carrying fixed positions instead of placing them freely.
    pub fixed: bool,
    /// Gap between sibling nodes.
    pub node_spacing: f64,
    /// Gap between layers.
    pub layer_spacing: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDirection {
    Down,
    Right,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            direction: FlowDirection::Down,
            orthogonal: true,
            partitioned: true,
            fixed: false,
            node_spacing: 20.0,
            layer_spacing: 40.0,
        }
    }
}

/// One routed section of an engine edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSection {
    pub start: (f64, f64),
    pub bends: Vec<(f64, f64)>,
    pub end: (f64, f64),
}

/// Positioned node in the engine's result.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Routed edge in the engine's result.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEdge {
    pub id: String,
    pub sections: Vec<EngineSection>,
}

/// Complete engine result.
#[derive(Debug, Clone, Default)]
pub struct EngineLayout {
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<RoutedEdge>,
}

/// The external layout engine, treated as a black box. Implementations may
/// take non-trivial wall-clock time; callers own cancellation policy.
pub trait LayoutEngine {
    fn layout(
        &self,
        graph: &EngineGraph,
        options: &EngineOptions,
    ) -> Result<EngineLayout, Box<dyn std::error::Error + Send + Sync>>;
}

/// Engine invocation failure, with the offending graph attached for
/// diagnostics. Consumed by the fallback policy, never by end users.
#[derive(Error, Debug)]
#[error("layout engine failure: {message}")]
pub struct EngineError {
    pub message: String,
    /// Debug snapshot of the translated graph that made the engine fail.
    pub graph_snapshot: String,
}

/// Run the external engine over the graph and normalize its result.
pub fn layout_via_engine(
    engine: &dyn LayoutEngine,
    graph: &DiagramGraph,
    spec: &RiserSpec,
) -> Result<LayoutResult, EngineError> {
    let engine_graph = translate_graph(graph, spec);
    let options = EngineOptions {
        fixed: graph
            .nodes
            .iter()
            .any(|n| n.fixed.is_some() && n.role != NodeRole::Panel),
        ..EngineOptions::default()
    };

    let layout = engine.layout(&engine_graph, &options).map_err(|e| {
        let err = EngineError {
            message: e.to_string(),
            graph_snapshot: format!("{engine_graph:?}"),
        };
        log::warn!("{err}");
        err
    })?;

    Ok(extract_result(layout, graph))
}

/// Translate the internal graph into the engine's input shape.
pub fn translate_graph(graph: &DiagramGraph, spec: &RiserSpec) -> EngineGraph {
    let nodes = graph
        .nodes
        .iter()
        .map(|n| {
            let ports = if n.role == NodeRole::Panel {
                graph
                    .ports
                    .iter()
                    .map(|p| EnginePort {
                        id: p.id.clone(),
                        side: p.side,
                    })
                    .collect()
            } else {
                Vec::new()
            };
            EngineNode {
                id: n.id.clone(),
                width: n.width,
                height: n.height,
                fixed: n.fixed.map(|p| (p.x, p.y)),
                partition: Some(partition_for(n.role, n.circuit.as_deref(), spec)),
                ports,
            }
        })
        .collect();

    let edges = graph
        .edges
        .iter()
        .map(|e| EngineEdge {
            id: e.id.clone(),
            source: e.source.clone(),
            target: e.target.clone(),
            source_port: e.source_port.clone(),
        })
        .collect();

    EngineGraph { nodes, edges }
}

/// Lane assignment: west circuits sit in a lower partition than the panel,
/// east circuits in a higher one, guaranteeing left/right placement
/// regardless of the engine's internals.
fn partition_for(role: NodeRole, circuit: Option<&str>, spec: &RiserSpec) -> i32 {
    if role == NodeRole::Panel {
        return PARTITION_CENTER;
    }
    let orientation = circuit
        .and_then(|cid| spec.circuit(cid))
        .and_then(|c| c.orientation);
    match orientation {
        Some(Orientation::West) => PARTITION_WEST,
        Some(Orientation::East) => PARTITION_EAST,
        None => PARTITION_CENTER,
    }
}

/// Normalize the engine's result shape into a [`LayoutResult`].
///
/// Bend points are built by concatenating each section's start point,
/// interior bends, and end point, in that order — never reordered, never
/// deduplicated. Degenerate zero-length segments are the consumer's
/// problem by contract.
fn extract_result(layout: EngineLayout, graph: &DiagramGraph) -> LayoutResult {
    let nodes = layout
        .nodes
        .into_iter()
        .map(|n| Node {
            id: n.id,
            x: n.x,
            y: n.y,
            width: n.width,
            height: n.height,
        })
        .collect();

    let paths = layout
        .edges
        .into_iter()
        .map(|e| {
            let mut points = Vec::new();
            for section in &e.sections {
                points.push(Point::new(section.start.0, section.start.1));
                for &(x, y) in &section.bends {
                    points.push(Point::new(x, y));
                }
                points.push(Point::new(section.end.0, section.end.1));
            }
            let graph_edge = graph.edges.iter().find(|ge| ge.id == e.id);
            RoutedPath {
                id: e.id,
                source: graph_edge.map(|g| g.source.clone()).unwrap_or_default(),
                target: graph_edge.map(|g| g.target.clone()).unwrap_or_default(),
                circuit: graph_edge.and_then(edge_circuit),
                points,
            }
        })
        .collect();

    LayoutResult { nodes, paths }
}

fn edge_circuit(edge: &GraphEdge) -> Option<String> {
    edge.circuit.clone()
}
