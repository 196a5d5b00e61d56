//! Mesh filters: threshold, plane clip, and plane slice.
//!
//! These mirror the selection steps a figure script performs before
//! rendering: extract the cells carrying a field of interest, cut the
//! geometry open along a plane, or take a cross-section through it.

use nalgebra::{Point3, Unit, Vector3};

use crate::bounds::Bound;
use crate::error::{Result, TufteError};
use crate::mesh::TriMesh;

/// An oriented plane given by a unit normal and a point on the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Unit<Vector3<f64>>,
    origin: Point3<f64>,
}

impl Plane {
    /// Build a plane from a (not necessarily unit) normal and an origin.
    pub fn from_normal(normal: Vector3<f64>, origin: Point3<f64>) -> Result<Self> {
        let normal = Unit::try_new(normal, 1e-12).ok_or_else(|| TufteError::Mesh {
            message: "plane normal must be non-zero".to_string(),
        })?;
        Ok(Self { normal, origin })
    }

    pub fn normal(&self) -> Vector3<f64> {
        self.normal.into_inner()
    }

    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// Signed distance of a point, positive on the normal side.
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&(point - self.origin))
    }
}

/// A cross-section edge produced by [`slice`].
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSegment {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
    /// Mean of the interpolated endpoint scalars, when the mesh has any
    pub scalar: Option<f64>,
}

/// Keep the cells whose scalar falls inside `range`.
///
/// A triangle is kept when the mean of its vertex scalars lies in the
/// range, so cells straddling the range edge follow their dominant
/// value. Requires a scalar field.
pub fn threshold(mesh: &TriMesh, range: &Bound) -> Result<TriMesh> {
    let scalars = mesh.scalars().ok_or_else(|| TufteError::Mesh {
        message: "threshold requires a mesh with scalars".to_string(),
    })?;

    let mut remap = vec![usize::MAX; mesh.vertex_count()];
    let mut vertices = Vec::new();
    let mut values = Vec::new();
    let mut triangles = Vec::new();

    for tri in mesh.triangles() {
        let mean = (scalars[tri[0]] + scalars[tri[1]] + scalars[tri[2]]) / 3.0;
        if !range.contains(mean) {
            continue;
        }
        let mut out = [0usize; 3];
        for (slot, &v) in out.iter_mut().zip(tri.iter()) {
            if remap[v] == usize::MAX {
                remap[v] = vertices.len();
                vertices.push(mesh.vertices()[v]);
                values.push(scalars[v]);
            }
            *slot = remap[v];
        }
        triangles.push(out);
    }

    TriMesh::new(vertices, triangles)?.with_scalars(values)
}

/// Keep the part of the mesh on the positive side of `plane`.
///
/// Triangles crossing the plane are cut, with positions and scalars
/// interpolated along the cut edges.
pub fn clip(mesh: &TriMesh, plane: &Plane) -> Result<TriMesh> {
    let scalars = mesh.scalars();
    let mut vertices = Vec::new();
    let mut values = Vec::new();
    let mut triangles = Vec::new();

    for tri in mesh.triangles() {
        let corners: Vec<(Point3<f64>, f64)> = tri
            .iter()
            .map(|&v| (mesh.vertices()[v], scalars.map_or(0.0, |s| s[v])))
            .collect();

        // Clip the triangle against the plane, keeping d >= 0
        let mut kept: Vec<(Point3<f64>, f64)> = Vec::with_capacity(4);
        for i in 0..3 {
            let (p_curr, s_curr) = corners[i];
            let (p_next, s_next) = corners[(i + 1) % 3];
            let d_curr = plane.signed_distance(&p_curr);
            let d_next = plane.signed_distance(&p_next);

            if d_curr >= 0.0 {
                kept.push((p_curr, s_curr));
            }
            if (d_curr > 0.0 && d_next < 0.0) || (d_curr < 0.0 && d_next > 0.0) {
                let t = d_curr / (d_curr - d_next);
                let p = p_curr + (p_next - p_curr) * t;
                let s = s_curr + (s_next - s_curr) * t;
                kept.push((Point3::from(p), s));
            }
        }
        if kept.len() < 3 {
            continue;
        }

        // Fan-triangulate the clipped polygon (3 or 4 corners)
        let base = vertices.len();
        for (p, s) in &kept {
            vertices.push(*p);
            values.push(*s);
        }
        for i in 1..kept.len() - 1 {
            triangles.push([base, base + i, base + i + 1]);
        }
    }

    let clipped = TriMesh::new(vertices, triangles)?;
    if scalars.is_some() {
        clipped.with_scalars(values)
    } else {
        Ok(clipped)
    }
}

/// Cross-section of the surface along `plane`.
///
/// Every triangle crossing the plane contributes one segment; scalars
/// are interpolated to the crossing points when present.
pub fn slice(mesh: &TriMesh, plane: &Plane) -> Result<Vec<SectionSegment>> {
    let scalars = mesh.scalars();
    let mut segments = Vec::new();

    for tri in mesh.triangles() {
        let mut crossings: Vec<(Point3<f64>, f64)> = Vec::with_capacity(2);
        for i in 0..3 {
            let a = tri[i];
            let b = tri[(i + 1) % 3];
            let d_a = plane.signed_distance(&mesh.vertices()[a]);
            let d_b = plane.signed_distance(&mesh.vertices()[b]);
            if (d_a > 0.0 && d_b < 0.0) || (d_a < 0.0 && d_b > 0.0) {
                let t = d_a / (d_a - d_b);
                let p = mesh.vertices()[a] + (mesh.vertices()[b] - mesh.vertices()[a]) * t;
                let s = scalars.map_or(0.0, |s| s[a] + (s[b] - s[a]) * t);
                crossings.push((Point3::from(p), s));
            }
        }
        if crossings.len() == 2 {
            segments.push(SectionSegment {
                start: crossings[0].0,
                end: crossings[1].0,
                scalar: scalars.map(|_| (crossings[0].1 + crossings[1].1) / 2.0),
            });
        }
    }

    Ok(segments)
}
