//! Layout strategy selection and fallback policy.
//!
//! One explicit, testable policy instead of two ad hoc code paths:
//! author-specified positions must survive verbatim, so any explicit
//! coordinate forces the manual router. Declarative specs prefer the
//! external engine when one is supplied; a failing or absent engine always
//! degrades to the manual router, never to a caller-visible error.

use crate::spec::RiserSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Invoke the external constraint-based engine.
    Solver,
    /// Deterministic manual computation.
    Manual,
}

/// Pick the strategy for one compile.
pub fn select_strategy(spec: &RiserSpec, engine_available: bool) -> Strategy {
    let strategy = if spec.has_explicit_positions() {
        Strategy::Manual
    } else if engine_available {
        Strategy::Solver
    } else {
        Strategy::Manual
    };
    log::debug!(
        "selected {strategy:?} layout (explicit positions: {}, engine: {engine_available})",
        spec.has_explicit_positions()
    );
    strategy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loading::parse_spec;

    #[test]
    fn explicit_positions_force_manual() {
        let spec = parse_spec(
            r#"{
                "panel": {"id": "FACP", "x": 0, "y": 0},
                "circuits": [{"id": "SLC1", "color": "red"}],
                "devices": [{"id": "S1", "type": "Smoke", "circuit": "SLC1", "x": 1, "y": 2}]
            }"#,
        )
        .unwrap();
        assert_eq!(select_strategy(&spec, true), Strategy::Manual);
        assert_eq!(select_strategy(&spec, false), Strategy::Manual);
    }

    #[test]
    fn declarative_spec_prefers_the_engine_when_present() {
        let spec = parse_spec(
            r#"{
                "panel": {"id": "FACP", "ports": [{"id": "p", "side": "west"}]},
                "circuits": [{
                    "id": "SLC1", "color": "red", "from": {"port": "p"},
                    "devices": [{"id": "S1", "type": "Smoke"}]
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(select_strategy(&spec, true), Strategy::Solver);
        assert_eq!(select_strategy(&spec, false), Strategy::Manual);
    }
}
