//! Symbol sizing for riser diagram nodes.
//!
//! Every device type name maps to a [`SymbolKind`] — a closed variant set —
//! with a box size and a bottom-edge offset (where a wire must terminate to
//! sit flush with the symbol's visible frame). Unknown type names get a
//! documented 20×20 default rather than failing, so specs written against
//! newer device libraries still compile.

use std::collections::BTreeMap;

/// Box size applied to device types with no table entry.
pub const DEFAULT_SYMBOL_SIZE: (f64, f64) = (20.0, 20.0);

/// Closed set of known symbol kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Panel,
    /// Cellular communicator — panel-local equipment.
    Cell,
    Smoke,
    Heat,
    Pull,
    HornStrobe,
    Eol,
    /// Any type name not in the table. Renders as a plain box.
    Unknown,
}

impl SymbolKind {
    /// Map a device type name to a symbol kind. Matching is case-insensitive.
    pub fn from_type_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "panel" | "facp" => SymbolKind::Panel,
            "cell" | "communicator" => SymbolKind::Cell,
            "smoke" => SymbolKind::Smoke,
            "heat" => SymbolKind::Heat,
            "pull" => SymbolKind::Pull,
            "hornstrobe" | "horn_strobe" | "horn-strobe" => SymbolKind::HornStrobe,
            "eol" => SymbolKind::Eol,
            _ => SymbolKind::Unknown,
        }
    }

    /// Symbol box size (width, height).
    pub fn size(self) -> (f64, f64) {
        match self {
            SymbolKind::Panel => (40.0, 50.0),
            SymbolKind::Cell => (24.0, 20.0),
            SymbolKind::Smoke => (20.0, 14.0),
            SymbolKind::Heat => (20.0, 14.0),
            SymbolKind::Pull => (14.0, 12.0),
            SymbolKind::HornStrobe => (18.0, 16.0),
            SymbolKind::Eol => (10.0, 8.0),
            SymbolKind::Unknown => DEFAULT_SYMBOL_SIZE,
        }
    }

    /// Y offset below the device anchor at which a wire terminates flush
    /// with the symbol's visible frame.
    pub fn bottom_offset(self) -> f64 {
        match self {
            SymbolKind::Panel => 50.0,
            SymbolKind::Cell => 20.0,
            SymbolKind::Smoke => 14.0,
            SymbolKind::Heat => 14.0,
            SymbolKind::Pull => 12.0,
            SymbolKind::HornStrobe => 16.0,
            SymbolKind::Eol => 8.0,
            SymbolKind::Unknown => DEFAULT_SYMBOL_SIZE.1,
        }
    }

}

/// Symbol size table: spec-supplied overrides on top of the built-in kinds.
///
/// Read-only for the lifetime of a compile; the declarative input shape may
/// carry a `symbols` map that overrides built-in sizes per type name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    overrides: BTreeMap<String, (f64, f64)>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: BTreeMap<String, (f64, f64)>) -> Self {
        Self { overrides }
    }

    /// Box size for a device type name: override → built-in kind → default.
    pub fn size(&self, type_name: &str) -> (f64, f64) {
        if let Some(&wh) = self.overrides.get(type_name) {
            return wh;
        }
        SymbolKind::from_type_name(type_name).size()
    }

    /// Bottom-edge wire termination offset for a device type name. An
    /// override's height wins over the built-in offset.
    pub fn bottom_offset(&self, type_name: &str) -> f64 {
        if let Some(&(_, h)) = self.overrides.get(type_name) {
            return h;
        }
        SymbolKind::from_type_name(type_name).bottom_offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_kinds_resolve_case_insensitively() {
        assert_eq!(SymbolKind::from_type_name("Smoke"), SymbolKind::Smoke);
        assert_eq!(SymbolKind::from_type_name("SMOKE"), SymbolKind::Smoke);
        assert_eq!(SymbolKind::from_type_name("HornStrobe"), SymbolKind::HornStrobe);
    }

    #[test]
    fn unknown_kind_gets_default_size() {
        let table = SymbolTable::new();
        assert_eq!(table.size("Waterflow"), DEFAULT_SYMBOL_SIZE);
        assert_eq!(SymbolKind::from_type_name("Waterflow"), SymbolKind::Unknown);
    }

    #[test]
    fn smoke_bottom_offset_is_fourteen() {
        // Pinned by the worked example: bus elevation 100 + 14 + 5 = 119.
        let table = SymbolTable::new();
        assert_eq!(table.bottom_offset("Smoke"), 14.0);
    }

    #[test]
    fn overrides_win_over_builtins() {
        let mut map = BTreeMap::new();
        map.insert("Smoke".to_string(), (30.0, 18.0));
        let table = SymbolTable::with_overrides(map);
        assert_eq!(table.size("Smoke"), (30.0, 18.0));
        assert_eq!(table.bottom_offset("Smoke"), 18.0);
        assert_eq!(table.size("Pull"), SymbolKind::Pull.size());
    }
}
