//! Spec input loading: JSON in, [`RiserSpec`] out.
//!
//! Two accepted input shapes:
//!
//! - **Legacy** — flat `devices` / `circuits` / `eols` arrays with explicit
//!   coordinates on every entry.
//! - **Declarative** — a panel with named ports, circuits carrying
//!   `from: {panel, port}` plus nested ordered device lists, and an optional
//!   `symbols` size table.
//!
//! Shape detection happens on the raw [`serde_json::Value`]: the declarative
//! shape is recognized by `panel.ports` together with `circuits[0].from`.
//! Anything malformed fails here with a [`SpecError`] before graph building
//! is attempted.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::spec::{
    Circuit, Device, Eol, Orientation, Panel, Point, PortDef, RiserSpec, Side, PANEL_CIRCUIT_ID,
};
use crate::symbols::SymbolTable;

#[derive(Error, Debug)]
pub enum SpecError {
    #[error("failed to read spec file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse spec JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("spec root must be a JSON object")]
    NotAnObject,
}

/// Load and parse a spec file.
pub fn load_spec_file(path: &Path) -> Result<RiserSpec, SpecError> {
    let source = std::fs::read_to_string(path)?;
    parse_spec(&source)
}

/// Parse a spec from JSON source text, detecting the input shape.
pub fn parse_spec(source: &str) -> Result<RiserSpec, SpecError> {
    let value: serde_json::Value = serde_json::from_str(source)?;
    spec_from_value(value)
}

/// Build a spec from an already-parsed JSON value.
pub fn spec_from_value(value: serde_json::Value) -> Result<RiserSpec, SpecError> {
    if !value.is_object() {
        return Err(SpecError::NotAnObject);
    }
    if is_declarative(&value) {
        let raw: DeclarativeSpec = serde_json::from_value(value)?;
        Ok(from_declarative(raw))
    } else {
        let raw: LegacySpec = serde_json::from_value(value)?;
        Ok(from_legacy(raw))
    }
}

/// Declarative shape marker: `panel.ports` present and `circuits[0].from`
/// present.
fn is_declarative(value: &serde_json::Value) -> bool {
    let has_ports = value
        .get("panel")
        .and_then(|p| p.get("ports"))
        .is_some_and(|p| p.is_array());
    let has_from = value
        .get("circuits")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("from"))
        .is_some();
    has_ports && has_from
}

// ---------------------------------------------------------------------------
// Legacy shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct LegacySpec {
    panel: LegacyPanel,
    #[serde(default)]
    circuits: Vec<LegacyCircuit>,
    #[serde(default)]
    devices: Vec<LegacyDevice>,
    #[serde(default)]
    eols: Vec<LegacyEol>,
}

#[derive(Debug, Deserialize)]
struct LegacyPanel {
    id: String,
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct LegacyCircuit {
    id: String,
    #[serde(default = "default_class")]
    class: String,
    #[serde(default = "default_color")]
    color: String,
    #[serde(default)]
    orientation: Option<Orientation>,
}

#[derive(Debug, Deserialize)]
struct LegacyDevice {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    circuit: String,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct LegacyEol {
    circuit: String,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    drop: Option<f64>,
}

fn default_class() -> String {
    "circuit".into()
}

fn default_color() -> String {
    "black".into()
}

fn from_legacy(raw: LegacySpec) -> RiserSpec {
    let panel = Panel {
        id: raw.panel.id,
        pos: Some(Point::new(raw.panel.x, raw.panel.y)),
        ports: Vec::new(),
    };

    let mut circuits: Vec<Circuit> = raw
        .circuits
        .into_iter()
        .map(|c| Circuit {
            dashed: Circuit::is_notification_id(&c.id),
            id: c.id,
            class: c.class,
            color: c.color,
            orientation: c.orientation,
            from_port: None,
            devices: Vec::new(),
            eol: None,
        })
        .collect();

    let mut panel_devices = Vec::new();
    for d in raw.devices {
        let device = Device {
            id: d.id,
            kind: d.kind,
            circuit: d.circuit.clone(),
            pos: point_from_parts(d.x, d.y),
        };
        if d.circuit == PANEL_CIRCUIT_ID {
            panel_devices.push(device);
            continue;
        }
        match circuits.iter_mut().find(|c| c.id == d.circuit) {
            Some(c) => c.devices.push(device),
            None => {
                // Device names a circuit with no declaration: materialize an
                // implicit one so the device still renders.
                circuits.push(Circuit {
                    dashed: Circuit::is_notification_id(&d.circuit),
                    id: d.circuit.clone(),
                    class: default_class(),
                    color: default_color(),
                    orientation: None,
                    from_port: None,
                    devices: vec![device],
                    eol: None,
                });
            }
        }
    }

    for e in raw.eols {
        // An EOL naming an unknown circuit is silently inert.
        if let Some(c) = circuits.iter_mut().find(|c| c.id == e.circuit) {
            if c.eol.is_none() {
                c.eol = Some(Eol {
                    circuit: e.circuit,
                    x: e.x,
                    y: e.y,
                    drop_len: Eol::drop_or_default(e.drop),
                });
            }
        }
    }

    RiserSpec {
        panel,
        circuits,
        panel_devices,
        symbols: SymbolTable::new(),
    }
}

fn point_from_parts(x: Option<f64>, y: Option<f64>) -> Option<Point> {
    match (x, y) {
        (Some(x), Some(y)) => Some(Point::new(x, y)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Declarative shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DeclarativeSpec {
    panel: DeclarativePanel,
    #[serde(default)]
    circuits: Vec<DeclarativeCircuit>,
    #[serde(default)]
    symbols: BTreeMap<String, (f64, f64)>,
}

#[derive(Debug, Deserialize)]
struct DeclarativePanel {
    id: String,
    #[serde(default)]
    ports: Vec<DeclarativePort>,
}

#[derive(Debug, Deserialize)]
struct DeclarativePort {
    id: String,
    side: Side,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeclarativeCircuit {
    id: String,
    #[serde(default = "default_class")]
    class: String,
    #[serde(default = "default_color")]
    color: String,
    #[serde(default)]
    orientation: Option<Orientation>,
    #[serde(default)]
    from: Option<FromRef>,
    #[serde(default)]
    devices: Vec<DeclarativeDevice>,
    #[serde(default)]
    eol: Option<DeclarativeEol>,
}

#[derive(Debug, Deserialize)]
struct FromRef {
    #[allow(dead_code)]
    #[serde(default)]
    panel: Option<String>,
    port: String,
}

#[derive(Debug, Deserialize)]
struct DeclarativeDevice {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DeclarativeEol {
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    drop: Option<f64>,
}

fn from_declarative(raw: DeclarativeSpec) -> RiserSpec {
    let ports: Vec<PortDef> = raw
        .panel
        .ports
        .into_iter()
        .map(|p| PortDef {
            id: p.id,
            side: p.side,
            label: p.label,
        })
        .collect();

    let panel = Panel {
        id: raw.panel.id,
        pos: None,
        ports,
    };

    let mut circuits = Vec::new();
    let mut panel_devices = Vec::new();
    for c in raw.circuits {
        let devices: Vec<Device> = c
            .devices
            .into_iter()
            .map(|d| Device {
                id: d.id,
                kind: d.kind,
                circuit: c.id.clone(),
                pos: point_from_parts(d.x, d.y),
            })
            .collect();

        if c.id == PANEL_CIRCUIT_ID {
            panel_devices.extend(devices);
            continue;
        }

        let from_port = c.from.map(|f| f.port);
        // When no explicit orientation is declared, the bound port's side
        // implies one for west/east ports.
        let orientation = c.orientation.or_else(|| {
            from_port
                .as_deref()
                .and_then(|pid| panel.port(pid))
                .and_then(|p| match p.side {
                    Side::West => Some(Orientation::West),
                    Side::East => Some(Orientation::East),
                    _ => None,
                })
        });

        let eol = c.eol.map(|e| Eol {
            circuit: c.id.clone(),
            x: e.x,
            y: e.y,
            drop_len: Eol::drop_or_default(e.drop),
        });

        circuits.push(Circuit {
            dashed: Circuit::is_notification_id(&c.id),
            id: c.id,
            class: c.class,
            color: c.color,
            orientation,
            from_port,
            devices,
            eol,
        });
    }

    RiserSpec {
        panel,
        circuits,
        panel_devices,
        symbols: SymbolTable::with_overrides(raw.symbols),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY: &str = r#"{
        "panel": {"id": "FACP", "x": 100, "y": 40},
        "circuits": [
            {"id": "SLC1", "class": "initiating", "color": "red", "orientation": "west"},
            {"id": "NAC1", "class": "notification", "color": "blue", "orientation": "east"}
        ],
        "devices": [
            {"id": "S1", "type": "Smoke", "circuit": "SLC1", "x": 30, "y": 100},
            {"id": "P1", "type": "Pull", "circuit": "SLC1", "x": 60, "y": 100},
            {"id": "H1", "type": "HornStrobe", "circuit": "NAC1", "x": 180, "y": 100},
            {"id": "CELL", "type": "Cell", "circuit": "PANEL", "x": 160, "y": 40}
        ],
        "eols": [
            {"circuit": "SLC1", "x": 60, "drop": 4},
            {"circuit": "GHOST", "x": 10}
        ]
    }"#;

    const DECLARATIVE: &str = r#"{
        "panel": {
            "id": "FACP",
            "ports": [
                {"id": "slc-out", "side": "west", "label": "SLC"},
                {"id": "nac-out", "side": "east"}
            ]
        },
        "circuits": [
            {
                "id": "SLC1", "class": "initiating", "color": "red",
                "from": {"panel": "FACP", "port": "slc-out"},
                "devices": [
                    {"id": "S1", "type": "Smoke"},
                    {"id": "P1", "type": "Pull"}
                ],
                "eol": {"drop": 6}
            },
            {
                "id": "NAC1", "class": "notification", "color": "blue",
                "from": {"panel": "FACP", "port": "nac-out"},
                "devices": [{"id": "H1", "type": "HornStrobe"}]
            }
        ],
        "symbols": {"Smoke": [20, 14]}
    }"#;

    #[test]
    fn legacy_shape_is_detected_and_loaded() {
        let spec = parse_spec(LEGACY).unwrap();
        assert_eq!(spec.panel.pos, Some(Point::new(100.0, 40.0)));
        assert!(spec.panel.ports.is_empty());
        assert_eq!(spec.circuits.len(), 2);
        assert_eq!(spec.circuits[0].devices.len(), 2);
        assert!(spec.has_explicit_positions());
    }

    #[test]
    fn legacy_panel_devices_are_split_out() {
        let spec = parse_spec(LEGACY).unwrap();
        assert_eq!(spec.panel_devices.len(), 1);
        assert_eq!(spec.panel_devices[0].id, "CELL");
        assert!(spec.circuits.iter().all(|c| c.id != PANEL_CIRCUIT_ID));
    }

    #[test]
    fn dangling_eol_is_inert() {
        let spec = parse_spec(LEGACY).unwrap();
        // The GHOST eol names no declared circuit and creates nothing.
        assert!(spec.circuit("GHOST").is_none());
        assert!(spec.circuit("SLC1").unwrap().eol.is_some());
        assert!(spec.circuit("NAC1").unwrap().eol.is_none());
    }

    #[test]
    fn eol_x_survives_without_y() {
        let spec = parse_spec(LEGACY).unwrap();
        let eol = spec.circuit("SLC1").unwrap().eol.as_ref().unwrap();
        assert_eq!(eol.x, Some(60.0));
        assert_eq!(eol.y, None);
        assert!(eol.pos().is_none());
    }

    #[test]
    fn dashed_flag_computed_at_load_time() {
        let spec = parse_spec(LEGACY).unwrap();
        assert!(!spec.circuit("SLC1").unwrap().dashed);
        assert!(spec.circuit("NAC1").unwrap().dashed);
    }

    #[test]
    fn declarative_shape_is_detected_and_loaded() {
        let spec = parse_spec(DECLARATIVE).unwrap();
        assert_eq!(spec.panel.ports.len(), 2);
        assert_eq!(spec.circuits.len(), 2);
        assert_eq!(spec.circuits[0].from_port.as_deref(), Some("slc-out"));
        assert!(!spec.has_explicit_positions());
        assert_eq!(spec.circuits[0].eol.as_ref().unwrap().drop_len, 6.0);
    }

    #[test]
    fn declarative_orientation_follows_port_side() {
        let spec = parse_spec(DECLARATIVE).unwrap();
        assert_eq!(spec.circuits[0].orientation, Some(Orientation::West));
        assert_eq!(spec.circuits[1].orientation, Some(Orientation::East));
    }

    #[test]
    fn declarative_symbol_overrides_are_kept() {
        let spec = parse_spec(DECLARATIVE).unwrap();
        assert_eq!(spec.symbols.size("Smoke"), (20.0, 14.0));
    }

    #[test]
    fn malformed_input_fails_before_layout() {
        assert!(parse_spec("not json").is_err());
        assert!(matches!(
            spec_from_value(serde_json::json!([1, 2, 3])),
            Err(SpecError::NotAnObject)
        ));
        // Missing panel entirely.
        assert!(parse_spec(r#"{"circuits": []}"#).is_err());
    }
}
