//! Deterministic manual router — the fallback reference algorithm.
//!
//! Computes circuit bus elevations, orders devices left-to-right, and
//! synthesizes orthogonal bend points without any external dependency.
//! Given the same spec this produces bit-for-bit identical geometry.
//!
//! Per circuit with at least one positioned device:
//!
//! 1. Bus elevation = max(device.y + bottom_offset(type)) + 5 — the
//!    horizontal bus sits just below the lowest symbol frame.
//! 2. Devices connect in ascending x order, never declaration order.
//! 3. One continuous polyline per circuit: panel attachment → down to the
//!    bus → across/drop/return per device → optional EOL drop.
//!
//! Devices without coordinates (engine unavailable or failed on a
//! declarative spec) degrade to the direct-connection layout: a
//! deterministic row per circuit below the panel and straight
//! panel-center → device-center segments, no bus, no bends.

use std::cmp::Ordering;

use crate::layout::types::{LayoutResult, Node, RoutedPath};
use crate::spec::{Circuit, Device, Orientation, Point, RiserSpec, Side, PANEL_CIRCUIT_ID};

/// Vertical clearance between the lowest symbol frame and the bus line.
pub const BUS_CLEARANCE: f64 = 5.0;

/// Row spacing for the direct-connection fallback placement.
const FALLBACK_ROW_GAP: f64 = 40.0;
/// Horizontal gap between fallback-placed devices.
const FALLBACK_DEVICE_GAP: f64 = 10.0;
/// Gap between the panel's bottom edge and the first fallback row.
const FALLBACK_TOP_GAP: f64 = 30.0;

/// Route the whole spec manually.
pub fn route_manually(spec: &RiserSpec) -> LayoutResult {
    let mut result = LayoutResult::default();

    let panel_origin = spec.panel.pos.unwrap_or(Point::new(0.0, 0.0));
    let (pw, ph) = spec.symbols.size("Panel");
    result.nodes.push(Node {
        id: spec.panel.id.clone(),
        x: panel_origin.x,
        y: panel_origin.y,
        width: pw,
        height: ph,
    });
    let panel_center = Point::new(panel_origin.x + pw / 2.0, panel_origin.y + ph / 2.0);

    for (row, circuit) in spec.circuits.iter().enumerate() {
        if circuit.devices.is_empty() {
            continue;
        }
        let attach = panel_attachment(spec, panel_origin, (pw, ph), circuit);
        if circuit.devices.iter().all(|d| d.pos.is_some()) {
            route_bus_circuit(spec, circuit, attach, &mut result);
        } else {
            route_direct_circuit(
                spec,
                circuit,
                panel_origin,
                (pw, ph),
                panel_center,
                row,
                &mut result,
            );
        }
    }

    route_panel_stubs(spec, panel_origin, (pw, ph), &mut result);

    result
}

/// Where a circuit's wiring leaves the panel: the bound port's side
/// midpoint, the declared orientation's side midpoint, or bottom-center.
fn panel_attachment(
    spec: &RiserSpec,
    origin: Point,
    (pw, ph): (f64, f64),
    circuit: &Circuit,
) -> Point {
    let side = circuit
        .from_port
        .as_deref()
        .and_then(|pid| spec.panel.port(pid))
        .map(|p| p.side)
        .or(match circuit.orientation {
            Some(Orientation::West) => Some(Side::West),
            Some(Orientation::East) => Some(Side::East),
            None => None,
        });
    match side {
        Some(Side::West) => Point::new(origin.x, origin.y + ph / 2.0),
        Some(Side::East) => Point::new(origin.x + pw, origin.y + ph / 2.0),
        Some(Side::North) => Point::new(origin.x + pw / 2.0, origin.y),
        Some(Side::South) | None => Point::new(origin.x + pw / 2.0, origin.y + ph),
    }
}

/// The bus algorithm proper, for a circuit whose devices all carry
/// explicit positions.
fn route_bus_circuit(
    spec: &RiserSpec,
    circuit: &Circuit,
    attach: Point,
    result: &mut LayoutResult,
) {
    // Explicit positions are respected verbatim.
    let mut devices: Vec<(&Device, Point)> = circuit
        .devices
        .iter()
        .filter_map(|d| d.pos.map(|p| (d, p)))
        .collect();
    // X order, never declaration order; ties broken by id so repeated
    // compiles stay byte-identical.
    devices.sort_by(|a, b| {
        a.1.x
            .partial_cmp(&b.1.x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.id.cmp(&b.0.id))
    });

    let bus_y = devices
        .iter()
        .map(|(d, p)| p.y + spec.symbols.bottom_offset(&d.kind))
        .fold(f64::NEG_INFINITY, f64::max)
        + BUS_CLEARANCE;

    for (device, pos) in &devices {
        let (w, h) = spec.symbols.size(&device.kind);
        result.nodes.push(Node {
            id: device.id.clone(),
            x: pos.x,
            y: pos.y,
            width: w,
            height: h,
        });
    }

    // Invisible bus node spanning the device extent.
    let min_x = devices[0].1.x;
    let max_x = devices[devices.len() - 1].1.x;
    result.nodes.push(Node {
        id: format!("{}::bus", circuit.id),
        x: min_x,
        y: bus_y,
        width: max_x - min_x,
        height: 0.0,
    });

    let mut points = vec![attach, Point::new(attach.x, bus_y)];
    for (i, (device, pos)) in devices.iter().enumerate() {
        let bottom = pos.y + spec.symbols.bottom_offset(&device.kind);
        points.push(Point::new(pos.x, bus_y));
        points.push(Point::new(pos.x, bottom));
        // The last device only returns to the bus when an EOL follows.
        if i + 1 < devices.len() || circuit.eol.is_some() {
            points.push(Point::new(pos.x, bus_y));
        }
    }

    let mut target = devices[devices.len() - 1].0.id.clone();
    if let Some(eol) = &circuit.eol {
        // A declared x wins; only an undeclared one lands at the rightmost
        // device.
        let eol_x = eol.x.unwrap_or(max_x);
        points.push(Point::new(eol_x, bus_y));
        points.push(Point::new(eol_x, bus_y + eol.drop_len));

        let (ew, eh) = spec.symbols.size("EOL");
        let eol_id = format!("{}::eol", circuit.id);
        result.nodes.push(Node {
            id: eol_id.clone(),
            x: eol_x - ew / 2.0,
            y: bus_y + eol.drop_len,
            width: ew,
            height: eh,
        });
        target = eol_id;
    }

    result.paths.push(RoutedPath {
        id: format!("{}:bus", circuit.id),
        source: spec.panel.id.clone(),
        target,
        circuit: Some(circuit.id.clone()),
        points,
    });
}

/// Last-resort direct-connection layout for a circuit lacking coordinates:
/// deterministic row placement, then straight panel-center → device-center
/// segments.
fn route_direct_circuit(
    spec: &RiserSpec,
    circuit: &Circuit,
    panel_origin: Point,
    (pw, ph): (f64, f64),
    panel_center: Point,
    row: usize,
    result: &mut LayoutResult,
) {
    let row_y = panel_origin.y + ph + FALLBACK_TOP_GAP + row as f64 * FALLBACK_ROW_GAP;

    let total_width: f64 = circuit
        .devices
        .iter()
        .map(|d| spec.symbols.size(&d.kind).0)
        .sum::<f64>()
        + FALLBACK_DEVICE_GAP * (circuit.devices.len().saturating_sub(1)) as f64;
    let mut cursor = panel_origin.x + pw / 2.0 - total_width / 2.0;

    for (i, device) in circuit.devices.iter().enumerate() {
        let (w, h) = spec.symbols.size(&device.kind);
        let pos = device.pos.unwrap_or(Point::new(cursor, row_y));
        cursor += w + FALLBACK_DEVICE_GAP;

        result.nodes.push(Node {
            id: device.id.clone(),
            x: pos.x,
            y: pos.y,
            width: w,
            height: h,
        });
        let device_center = Point::new(pos.x + w / 2.0, pos.y + h / 2.0);
        result.paths.push(RoutedPath {
            id: format!("{}:{}", circuit.id, i),
            source: spec.panel.id.clone(),
            target: device.id.clone(),
            circuit: Some(circuit.id.clone()),
            points: vec![panel_center, device_center],
        });
    }

    if let Some(eol) = &circuit.eol {
        let (ew, eh) = spec.symbols.size("EOL");
        let pos = eol.pos().unwrap_or(Point::new(cursor, row_y));
        let eol_id = format!("{}::eol", circuit.id);
        result.nodes.push(Node {
            id: eol_id.clone(),
            x: pos.x,
            y: pos.y,
            width: ew,
            height: eh,
        });
        result.paths.push(RoutedPath {
            id: format!("{}:eol", circuit.id),
            source: spec.panel.id.clone(),
            target: eol_id,
            circuit: Some(circuit.id.clone()),
            points: vec![panel_center, Point::new(pos.x + ew / 2.0, pos.y + eh / 2.0)],
        });
    }
}

/// Panel-local equipment bypasses bus construction: one three-point stub
/// per device, undashed and unstyled.
fn route_panel_stubs(
    spec: &RiserSpec,
    panel_origin: Point,
    (pw, ph): (f64, f64),
    result: &mut LayoutResult,
) {
    let attach = Point::new(panel_origin.x + pw / 2.0, panel_origin.y + ph);
    for (i, device) in spec.panel_devices.iter().enumerate() {
        let (w, h) = spec.symbols.size(&device.kind);
        let pos = device.pos.unwrap_or(Point::new(
            panel_origin.x + pw + 20.0 + i as f64 * (w + FALLBACK_DEVICE_GAP),
            panel_origin.y,
        ));
        result.nodes.push(Node {
            id: device.id.clone(),
            x: pos.x,
            y: pos.y,
            width: w,
            height: h,
        });
        result.paths.push(RoutedPath {
            id: format!("{}:{}", PANEL_CIRCUIT_ID, device.id),
            source: spec.panel.id.clone(),
            target: device.id.clone(),
            circuit: None,
            points: vec![
                attach,
                Point::new(attach.x, pos.y),
                Point::new(pos.x, pos.y),
            ],
        });
    }
}
