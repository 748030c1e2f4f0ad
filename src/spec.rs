//! Canonical in-memory model for riser diagram specifications.
//!
//! One [`RiserSpec`] is the immutable input for one compile: a panel, a set
//! of circuits with their devices, and optional end-of-line terminators.
//! The model is shape-agnostic — both accepted JSON input shapes (see
//! [`crate::loading`]) normalize into these types before any layout work
//! begins.

use serde::{Deserialize, Serialize};

use crate::symbols::SymbolTable;

/// Reserved circuit id for panel-local equipment (communicator, cell dialer).
/// Devices on this pseudo-circuit bypass bus construction entirely.
pub const PANEL_CIRCUIT_ID: &str = "PANEL";

/// Circuit-id prefix marking notification appliance circuits. Used exactly
/// once, at load time, to compute the dashed-stroke flag.
pub const NOTIFICATION_PREFIX: &str = "NAC";

/// Default vertical stub length from a circuit's bus line down to its EOL
/// terminator symbol.
pub const DEFAULT_EOL_DROP: f64 = 4.0;

/// Point in 2-D diagram space. Y increases downward throughout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Which side of the panel a declared port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    West,
    East,
    North,
    South,
}

/// A named attachment point declared on the panel (declarative shape only).
#[derive(Debug, Clone, PartialEq)]
pub struct PortDef {
    pub id: String,
    pub side: Side,
    pub label: Option<String>,
}

/// The fire-alarm control panel — the single fixed anchor of the diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub id: String,
    /// Explicit position (legacy shape). Absent in the declarative shape,
    /// where placement is solver- or fallback-assigned.
    pub pos: Option<Point>,
    /// Declared ports (declarative shape). Empty means the panel exposes one
    /// undifferentiated attachment point.
    pub ports: Vec<PortDef>,
}

impl Panel {
    /// Look up a declared port by id.
    pub fn port(&self, id: &str) -> Option<&PortDef> {
        self.ports.iter().find(|p| p.id == id)
    }
}

/// Routing side hint for a circuit, when declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    West,
    East,
}

/// A supervised circuit: ordered devices plus at most one EOL terminator.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    pub id: String,
    /// Display class, e.g. `"initiating"` or `"notification"`.
    pub class: String,
    /// Stroke color for every path belonging to this circuit.
    pub color: String,
    /// Which side the circuit must route toward, when declared.
    pub orientation: Option<Orientation>,
    /// Named panel port this circuit originates from (declarative shape).
    pub from_port: Option<String>,
    /// Devices in declaration order.
    pub devices: Vec<Device>,
    pub eol: Option<Eol>,
    /// Dashed stroke flag, computed once at load time from the circuit id.
    /// Never re-derived downstream.
    pub dashed: bool,
}

impl Circuit {
    /// Whether a circuit id denotes a notification circuit (dashed stroke).
    pub fn is_notification_id(id: &str) -> bool {
        id.starts_with(NOTIFICATION_PREFIX)
    }
}

/// A device attached to a circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub id: String,
    /// Symbol type name, looked up in the [`SymbolTable`].
    pub kind: String,
    /// Owning circuit id (may be the reserved [`PANEL_CIRCUIT_ID`]).
    pub circuit: String,
    /// Explicit position (anchor = top-left of the symbol box). When present,
    /// routing must respect it verbatim.
    pub pos: Option<Point>,
}

/// End-of-line terminator for a circuit.
///
/// Coordinates are stored independently: the canonical input declares only
/// an x (the bus supplies the elevation), so a lone x must survive loading.
#[derive(Debug, Clone, PartialEq)]
pub struct Eol {
    pub circuit: String,
    /// Declared horizontal position of the drop. Absent means the drop
    /// lands at the rightmost device's x.
    pub x: Option<f64>,
    /// Declared vertical position, rarely present outside fully explicit
    /// layouts.
    pub y: Option<f64>,
    /// Vertical stub length from the bus line to the terminator symbol.
    pub drop_len: f64,
}

impl Eol {
    /// Full explicit position, when both coordinates are declared.
    pub fn pos(&self) -> Option<Point> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        }
    }

    /// Coerce a raw drop length to a usable one: absent, non-positive, or
    /// non-finite input falls back to [`DEFAULT_EOL_DROP`].
    pub fn drop_or_default(raw: Option<f64>) -> f64 {
        match raw {
            Some(d) if d.is_finite() && d > 0.0 => d,
            _ => DEFAULT_EOL_DROP,
        }
    }
}

/// Complete riser diagram specification — immutable input for one compile.
#[derive(Debug, Clone)]
pub struct RiserSpec {
    pub panel: Panel,
    /// Circuits in declaration order. The reserved `"PANEL"` pseudo-circuit
    /// never appears here.
    pub circuits: Vec<Circuit>,
    /// Panel-local devices (circuit id `"PANEL"`), split out at load time.
    pub panel_devices: Vec<Device>,
    pub symbols: SymbolTable,
}

impl RiserSpec {
    /// Whether any device or EOL carries an explicit position. Drives
    /// strategy selection: explicit positions force manual routing.
    pub fn has_explicit_positions(&self) -> bool {
        self.circuits.iter().any(|c| {
            c.devices.iter().any(|d| d.pos.is_some())
                || c.eol.as_ref().is_some_and(|e| e.pos().is_some())
        }) || self.panel_devices.iter().any(|d| d.pos.is_some())
    }

    /// Look up a circuit by id.
    pub fn circuit(&self, id: &str) -> Option<&Circuit> {
        self.circuits.iter().find(|c| c.id == id)
    }
}
