//! Output and intermediate types for the layout compiler.
//!
//! [`DiagramGeometry`] is the sole contract consumed by downstream
//! renderers and export writers. Both maps are `BTreeMap` so that
//! serializing the same input twice yields byte-identical output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::spec::Point;

/// A positioned node: one per panel, device, EOL, and (manual mode only)
/// one synthetic invisible bus node per circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Node {
    /// Center of the node box.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A routed path before style reconciliation: ordered polyline vertices
/// plus the node and circuit identities needed downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedPath {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Owning circuit id; `None` for panel-local stubs.
    pub circuit: Option<String>,
    /// Polyline vertices in order. Duplicate consecutive points are legal
    /// and preserved; consumers must tolerate zero-length segments.
    pub points: Vec<Point>,
}

/// Raw result of either layout strategy, before reconciliation.
#[derive(Debug, Clone, Default)]
pub struct LayoutResult {
    pub nodes: Vec<Node>,
    pub paths: Vec<RoutedPath>,
}

/// Positioned node in the final geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Styled polyline in the final geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathGeometry {
    /// Ordered `[x, y]` vertices. Downward-increasing y.
    pub points: Vec<[f64; 2]>,
    /// Circuit identity (`"PANEL"` for panel-local stubs).
    pub circuit: String,
    pub color: String,
    pub dashed: bool,
}

/// Final geometry: node id → box, path id → styled polyline.
///
/// The one ground truth shared by the vector-canvas renderer and the
/// export writers. Y increases downward.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramGeometry {
    pub nodes: BTreeMap<String, NodeGeometry>,
    pub paths: BTreeMap<String, PathGeometry>,
}
