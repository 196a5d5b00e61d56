//! STL input for mesh geometry.
//!
//! Figure scripts load printed-part geometry from STL files; the reader
//! welds the triangle soup into an indexed [`TriMesh`]. A small ASCII
//! writer exists for producing fixtures and exchanging cut geometry.

use nalgebra::Point3;
use std::fmt::Write as _;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::mesh::TriMesh;

/// Read an STL file (binary or ASCII) into a mesh.
pub fn read_stl<P: AsRef<Path>>(path: P) -> Result<TriMesh> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    let stl = stl_io::read_stl(&mut reader)?;

    let vertices: Vec<Point3<f64>> = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();
    let triangles: Vec<[usize; 3]> = stl
        .faces
        .iter()
        .map(|f| [f.vertices[0], f.vertices[1], f.vertices[2]])
        .collect();

    debug!(
        path = %path.display(),
        vertices = vertices.len(),
        triangles = triangles.len(),
        "Loaded STL geometry"
    );

    TriMesh::new(vertices, triangles)
}

/// Serialize a mesh as ASCII STL.
pub fn to_stl_ascii(mesh: &TriMesh, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "solid {}", name);
    for (i, tri) in mesh.triangles().iter().enumerate() {
        let n = mesh.face_normal(i);
        let _ = writeln!(out, "  facet normal {} {} {}", n.x, n.y, n.z);
        let _ = writeln!(out, "    outer loop");
        for &v in tri {
            let p = mesh.vertices()[v];
            let _ = writeln!(out, "      vertex {} {} {}", p.x, p.y, p.z);
        }
        let _ = writeln!(out, "    endloop");
        let _ = writeln!(out, "  endfacet");
    }
    let _ = writeln!(out, "endsolid {}", name);
    out
}
