//! Triangle meshes for 3D figure rendering.
//!
//! [`TriMesh`] is an indexed triangle surface with optional per-vertex
//! scalars (a solution field sampled on the geometry). Meshes come from
//! STL files or the procedural generators, pass through the filters in
//! [`ops`], and end up as raster screenshots via [`render`].

pub mod camera;
pub mod io;
pub mod ops;
pub mod render;

pub use camera::{Axis, CameraPose, Projection};
pub use ops::{clip, slice, threshold, Plane, SectionSegment};
pub use render::{render, MeshLayer, Paint, RenderSettings};

use nalgebra::{Point3, Vector3};

use crate::error::{Result, TufteError};

/// An indexed triangle mesh with optional per-vertex scalars.
#[derive(Debug, Clone, PartialEq)]
pub struct TriMesh {
    vertices: Vec<Point3<f64>>,
    triangles: Vec<[usize; 3]>,
    scalars: Option<Vec<f64>>,
}

impl TriMesh {
    /// Build a mesh from vertices and triangle indices.
    pub fn new(vertices: Vec<Point3<f64>>, triangles: Vec<[usize; 3]>) -> Result<Self> {
        for (i, tri) in triangles.iter().enumerate() {
            for &v in tri {
                if v >= vertices.len() {
                    return Err(TufteError::Mesh {
                        message: format!(
                            "triangle {} references vertex {} but the mesh has {} vertices",
                            i,
                            v,
                            vertices.len()
                        ),
                    });
                }
            }
        }
        Ok(Self {
            vertices,
            triangles,
            scalars: None,
        })
    }

    /// Attach a per-vertex scalar field.
    pub fn with_scalars(mut self, scalars: Vec<f64>) -> Result<Self> {
        if scalars.len() != self.vertices.len() {
            return Err(TufteError::Mesh {
                message: format!(
                    "scalar field has {} values for {} vertices",
                    scalars.len(),
                    self.vertices.len()
                ),
            });
        }
        self.scalars = Some(scalars);
        Ok(self)
    }

    /// Compute a per-vertex scalar field from vertex positions.
    pub fn with_scalars_from<F>(self, f: F) -> Self
    where
        F: Fn(&Point3<f64>) -> f64,
    {
        let scalars = self.vertices.iter().map(&f).collect();
        Self {
            scalars: Some(scalars),
            ..self
        }
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    pub fn scalars(&self) -> Option<&[f64]> {
        self.scalars.as_deref()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Uniformly scale the mesh about the origin (unit conversion).
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            vertices: self
                .vertices
                .iter()
                .map(|p| Point3::new(p.x * factor, p.y * factor, p.z * factor))
                .collect(),
            triangles: self.triangles.clone(),
            scalars: self.scalars.clone(),
        }
    }

    /// Axis-aligned bounding box, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        if self.vertices.is_empty() {
            return None;
        }
        let mut min = self.vertices[0];
        let mut max = self.vertices[0];
        for p in &self.vertices[1..] {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Some((min, max))
    }

    /// Unit normal of triangle `i`, zero for degenerate triangles.
    pub fn face_normal(&self, i: usize) -> Vector3<f64> {
        let [a, b, c] = self.triangles[i];
        let ab = self.vertices[b] - self.vertices[a];
        let ac = self.vertices[c] - self.vertices[a];
        let n = ab.cross(&ac);
        let len = n.norm();
        if len > 0.0 {
            n / len
        } else {
            Vector3::zeros()
        }
    }

    /// Axis-aligned box from a center and half extents.
    pub fn cuboid(center: Point3<f64>, half: Vector3<f64>) -> Self {
        let signs = [-1.0, 1.0];
        let mut vertices = Vec::with_capacity(8);
        for &sz in &signs {
            for &sy in &signs {
                for &sx in &signs {
                    vertices.push(Point3::new(
                        center.x + sx * half.x,
                        center.y + sy * half.y,
                        center.z + sz * half.z,
                    ));
                }
            }
        }
        // Outward-facing quads, split into triangle pairs
        let quads: [[usize; 4]; 6] = [
            [0, 2, 3, 1], // z-
            [4, 5, 7, 6], // z+
            [0, 1, 5, 4], // y-
            [2, 6, 7, 3], // y+
            [0, 4, 6, 2], // x-
            [1, 3, 7, 5], // x+
        ];
        let mut triangles = Vec::with_capacity(12);
        for q in quads {
            triangles.push([q[0], q[1], q[2]]);
            triangles.push([q[0], q[2], q[3]]);
        }
        Self {
            vertices,
            triangles,
            scalars: None,
        }
    }

    /// Torus around the z axis (a coil winding stand-in).
    pub fn torus(
        center: Point3<f64>,
        major_radius: f64,
        minor_radius: f64,
        major_segments: usize,
        minor_segments: usize,
    ) -> Self {
        let nu = major_segments.max(3);
        let nv = minor_segments.max(3);
        let mut vertices = Vec::with_capacity(nu * nv);
        for i in 0..nu {
            let u = std::f64::consts::TAU * i as f64 / nu as f64;
            for j in 0..nv {
                let v = std::f64::consts::TAU * j as f64 / nv as f64;
                let r = major_radius + minor_radius * v.cos();
                vertices.push(Point3::new(
                    center.x + r * u.cos(),
                    center.y + r * u.sin(),
                    center.z + minor_radius * v.sin(),
                ));
            }
        }
        let mut triangles = Vec::with_capacity(nu * nv * 2);
        for i in 0..nu {
            let i1 = (i + 1) % nu;
            for j in 0..nv {
                let j1 = (j + 1) % nv;
                let a = i * nv + j;
                let b = i1 * nv + j;
                let c = i1 * nv + j1;
                let d = i * nv + j1;
                triangles.push([a, b, c]);
                triangles.push([a, c, d]);
            }
        }
        Self {
            vertices,
            triangles,
            scalars: None,
        }
    }
}
