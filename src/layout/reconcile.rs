//! Geometry reconciliation: one uniform result from either strategy.
//!
//! Attaches circuit identity, color, and the load-time dashed flag to every
//! routed path, and normalizes everything into [`DiagramGeometry`] with
//! downward-increasing y. Nothing present in the [`LayoutResult`] is ever
//! dropped: a path referencing a missing node is a data-integrity fault,
//! warned about and rendered with the missing endpoint at the origin — a
//! documented degenerate behavior, not a silent correction.

use std::collections::BTreeMap;

use crate::layout::types::{DiagramGeometry, LayoutResult, Node, NodeGeometry, PathGeometry};
use crate::spec::{Point, RiserSpec, PANEL_CIRCUIT_ID};

/// Stroke applied to paths with no owning circuit (panel-local stubs) or
/// an unknown circuit id.
const DEFAULT_COLOR: &str = "black";

/// Merge routed nodes and paths into the final styled geometry.
pub fn reconcile(result: LayoutResult, spec: &RiserSpec) -> DiagramGeometry {
    let mut nodes = BTreeMap::new();
    let node_centers: BTreeMap<&str, Point> = result
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), n.center()))
        .collect();
    for n in &result.nodes {
        nodes.insert(
            n.id.clone(),
            NodeGeometry {
                x: n.x,
                y: n.y,
                width: n.width,
                height: n.height,
            },
        );
    }

    let mut paths = BTreeMap::new();
    for path in result.paths {
        let (circuit, color, dashed) = style_for(spec, path.circuit.as_deref());

        let points = if path.points.is_empty() {
            // No routed vertices: fall back to endpoint centers, with a
            // missing node degrading to the origin.
            vec![
                endpoint_or_origin(&node_centers, &path.id, &path.source),
                endpoint_or_origin(&node_centers, &path.id, &path.target),
            ]
        } else {
            for endpoint in [&path.source, &path.target] {
                if !endpoint.is_empty() && !node_centers.contains_key(endpoint.as_str()) {
                    log::warn!("path {} references missing node {endpoint}", path.id);
                }
            }
            path.points.iter().map(|p| [p.x, p.y]).collect()
        };

        paths.insert(
            path.id,
            PathGeometry {
                points,
                circuit,
                color,
                dashed,
            },
        );
    }

    DiagramGeometry { nodes, paths }
}

fn style_for(spec: &RiserSpec, circuit: Option<&str>) -> (String, String, bool) {
    match circuit {
        Some(cid) => match spec.circuit(cid) {
            Some(c) => (cid.to_string(), c.color.clone(), c.dashed),
            None => (cid.to_string(), DEFAULT_COLOR.to_string(), false),
        },
        None => (PANEL_CIRCUIT_ID.to_string(), DEFAULT_COLOR.to_string(), false),
    }
}

fn endpoint_or_origin(
    centers: &BTreeMap<&str, Point>,
    path_id: &str,
    node_id: &str,
) -> [f64; 2] {
    match centers.get(node_id) {
        Some(p) => [p.x, p.y],
        None => {
            log::warn!("path {path_id} references missing node {node_id}; rendering from origin");
            [0.0, 0.0]
        }
    }
}
