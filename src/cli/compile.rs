use riserkernel::{compile_geometry, dxf, loading};
use std::path::Path;
use std::process;

pub fn run(spec_path: &str, output: Option<&str>, dxf_path: Option<&str>) {
    let spec = loading::load_spec_file(Path::new(spec_path)).unwrap_or_else(|e| {
        eprintln!("Error loading {spec_path}: {e}");
        process::exit(1);
    });

    // The CLI links no external engine; declarative specs take the
    // deterministic fallback placement.
    let geometry = compile_geometry(&spec, None).unwrap_or_else(|e| {
        eprintln!("Compile error: {e}");
        process::exit(1);
    });

    let json = serde_json::to_string_pretty(&geometry).unwrap_or_else(|e| {
        eprintln!("Error serializing geometry: {e}");
        process::exit(1);
    });

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &json) {
                eprintln!("Error writing {path}: {e}");
                process::exit(1);
            }
            eprintln!(
                "Wrote {} ({} nodes, {} paths)",
                path,
                geometry.nodes.len(),
                geometry.paths.len()
            );
        }
        None => println!("{json}"),
    }

    if let Some(path) = dxf_path {
        let doc = dxf::to_dxf(&geometry);
        if let Err(e) = std::fs::write(path, doc) {
            eprintln!("Error writing {path}: {e}");
            process::exit(1);
        }
        eprintln!("Wrote {path}");
    }
}
