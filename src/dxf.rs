//! DXF export from compiled diagram geometry.
//!
//! Emits a minimal ASCII DXF ENTITIES section — tag/value pairs — so the
//! same spec that drives the on-screen canvas can be dropped into CAD for
//! submittal drawings. The geometry compiler's output is the sole source
//! of every coordinate written here; there is no read path.
//!
//! Diagram geometry uses downward-increasing y; DXF model space is y-up,
//! so y is negated on the way out.

use std::fmt::Write;

use crate::layout::types::DiagramGeometry;

/// Text height for node labels, in drawing units.
const LABEL_HEIGHT: f64 = 4.0;

/// Map a stroke color name to an AutoCAD color index (ACI).
fn color_index(color: &str) -> u8 {
    match color {
        "red" => 1,
        "yellow" => 2,
        "green" => 3,
        "cyan" => 4,
        "blue" => 5,
        "magenta" => 6,
        _ => 7, // black/white and anything unrecognized
    }
}

/// One tag/value record.
fn record(out: &mut String, code: u16, value: impl std::fmt::Display) {
    let _ = writeln!(out, "{code}\n{value}");
}

/// Render geometry as a DXF document string.
pub fn to_dxf(geom: &DiagramGeometry) -> String {
    let mut out = String::new();
    record(&mut out, 0, "SECTION");
    record(&mut out, 2, "ENTITIES");

    // One lightweight polyline per path. Duplicate consecutive vertices
    // are emitted verbatim; AutoCAD tolerates repeated LWPOLYLINE points.
    for path in geom.paths.values() {
        record(&mut out, 0, "LWPOLYLINE");
        record(&mut out, 8, &path.circuit);
        record(&mut out, 62, color_index(&path.color));
        record(&mut out, 6, if path.dashed { "DASHED" } else { "CONTINUOUS" });
        record(&mut out, 90, path.points.len());
        record(&mut out, 70, 0);
        for [x, y] in &path.points {
            record(&mut out, 10, format_coord(*x));
            record(&mut out, 20, format_coord(-y));
        }
    }

    // A circle marker plus an id label per node.
    for (id, node) in &geom.nodes {
        let cx = node.x + node.width / 2.0;
        let cy = node.y + node.height / 2.0;
        let r = node.width.min(node.height) / 2.0;
        // Zero-size nodes (invisible bus spans) carry no marker.
        if r <= 0.0 {
            continue;
        }
        record(&mut out, 0, "CIRCLE");
        record(&mut out, 8, "SYMBOLS");
        record(&mut out, 10, format_coord(cx));
        record(&mut out, 20, format_coord(-cy));
        record(&mut out, 40, format_coord(r));

        record(&mut out, 0, "TEXT");
        record(&mut out, 8, "LABELS");
        record(&mut out, 10, format_coord(node.x));
        record(&mut out, 20, format_coord(-(node.y - LABEL_HEIGHT)));
        record(&mut out, 40, format_coord(LABEL_HEIGHT));
        record(&mut out, 1, id);
    }

    record(&mut out, 0, "ENDSEC");
    record(&mut out, 0, "EOF");
    out
}

fn format_coord(v: f64) -> String {
    format!("{v:.3}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::{NodeGeometry, PathGeometry};

    fn sample_geometry() -> DiagramGeometry {
        let mut geom = DiagramGeometry::default();
        geom.nodes.insert(
            "FACP".into(),
            NodeGeometry {
                x: 100.0,
                y: 40.0,
                width: 40.0,
                height: 50.0,
            },
        );
        geom.paths.insert(
            "NAC1:bus".into(),
            PathGeometry {
                points: vec![[120.0, 90.0], [120.0, 119.0], [180.0, 119.0]],
                circuit: "NAC1".into(),
                color: "blue".into(),
                dashed: true,
            },
        );
        geom
    }

    #[test]
    fn document_is_framed_by_section_and_eof() {
        let dxf = to_dxf(&sample_geometry());
        assert!(dxf.starts_with("0\nSECTION\n2\nENTITIES\n"));
        assert!(dxf.ends_with("0\nENDSEC\n0\nEOF\n"));
    }

    #[test]
    fn dashed_paths_get_the_dashed_linetype() {
        let dxf = to_dxf(&sample_geometry());
        assert!(dxf.contains("LWPOLYLINE"));
        assert!(dxf.contains("DASHED"));
        assert!(dxf.contains("\n5\n"), "blue should map to ACI 5");
    }

    #[test]
    fn y_axis_is_flipped_for_cad() {
        let dxf = to_dxf(&sample_geometry());
        assert!(dxf.contains("-119.000"), "bus y should be negated: {dxf}");
    }

    #[test]
    fn nodes_emit_marker_and_label() {
        let dxf = to_dxf(&sample_geometry());
        assert!(dxf.contains("CIRCLE"));
        assert!(dxf.contains("TEXT"));
        assert!(dxf.contains("FACP"));
    }
}
