use riserkernel::layout::DiagramGraph;
use riserkernel::loading;
use std::path::Path;
use std::process;

/// Load a spec and build its graph without producing geometry, reporting
/// input-shape and configuration faults.
pub fn run(spec_path: &str) {
    let spec = loading::load_spec_file(Path::new(spec_path)).unwrap_or_else(|e| {
        eprintln!("Error loading {spec_path}: {e}");
        process::exit(1);
    });

    let graph = DiagramGraph::from_spec(&spec).unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        process::exit(1);
    });

    let devices: usize = spec.circuits.iter().map(|c| c.devices.len()).sum();
    println!(
        "{}: {} circuits, {} devices, {} panel-local, {} graph nodes, {} edges",
        spec_path,
        spec.circuits.len(),
        devices,
        spec.panel_devices.len(),
        graph.nodes.len(),
        graph.edges.len()
    );
}
