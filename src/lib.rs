//! RiserKernel — compile fire-alarm riser diagram specifications into
//! routed 2-D geometry for on-screen rendering and CAD export.
//!
//! # Modules
//!
//! - [`spec`] — canonical in-memory model (panel, circuits, devices, EOLs)
//! - [`loading`] — JSON input in two shapes (legacy flat, declarative ports)
//! - [`symbols`] — symbol size table and bottom-edge wire offsets
//! - [`layout`] — the layout/routing compiler (graph → strategy → geometry)
//! - [`dxf`] — DXF export of compiled geometry
//!
//! # Quick start
//!
//! ```
//! let spec = riserkernel::loading::parse_spec(r#"{
//!     "panel": {"id": "FACP", "x": 100, "y": 40},
//!     "circuits": [{"id": "SLC1", "color": "red"}],
//!     "devices": [
//!         {"id": "S1", "type": "Smoke", "circuit": "SLC1", "x": 30, "y": 100}
//!     ]
//! }"#).unwrap();
//! let geometry = riserkernel::compile_geometry(&spec, None).unwrap();
//! assert!(geometry.paths.contains_key("SLC1:bus"));
//! ```

pub mod dxf;
pub mod layout;
pub mod loading;
pub mod spec;
pub mod symbols;

pub use layout::{compile_geometry, CompileError, DiagramGeometry, LayoutEngine};
pub use loading::SpecError;
pub use spec::RiserSpec;
