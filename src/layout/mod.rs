//! The layout/routing compiler: abstract circuit/device graph in, concrete
//! 2-D geometry out.
//!
//! # Pipeline
//!
//! ```text
//! RiserSpec
//!   → DiagramGraph      (nodes sized from the symbol table, chained or
//!                        star-from-bus edge topology)
//!   → Strategy          (solver when declarative + engine supplied,
//!                        manual whenever positions are explicit)
//!   → LayoutResult      (external engine adapter, or the deterministic
//!                        manual router on selection/failure)
//!   → DiagramGeometry   (styled, reconciled, downward-increasing y)
//! ```
//!
//! One compile is side-effect-free and idempotent: the same spec yields
//! byte-identical serialized geometry.

pub mod engine;
pub mod graph;
pub mod manual;
pub mod reconcile;
pub mod strategy;
pub mod types;

pub use engine::{EngineError, EngineGraph, EngineLayout, EngineOptions, LayoutEngine};
pub use graph::{CompileError, DiagramGraph};
pub use strategy::Strategy;
pub use types::{DiagramGeometry, LayoutResult};

use crate::spec::RiserSpec;

/// Compile a spec into diagram geometry.
///
/// This is the main entry point. Configuration faults (a circuit bound to
/// a port the panel does not declare) fail the whole compile; engine
/// faults are recovered internally via the manual router and never
/// surface here.
pub fn compile_geometry(
    spec: &RiserSpec,
    engine: Option<&dyn LayoutEngine>,
) -> Result<DiagramGeometry, CompileError> {
    let graph = DiagramGraph::from_spec(spec)?;

    let result = match strategy::select_strategy(spec, engine.is_some()) {
        Strategy::Solver => engine
            .and_then(|e| engine::layout_via_engine(e, &graph, spec).ok())
            .unwrap_or_else(|| manual::route_manually(spec)),
        Strategy::Manual => manual::route_manually(spec),
    };

    Ok(reconcile::reconcile(result, spec))
}
