//! CPU rasterizer for mesh screenshots.
//!
//! Renders one or more mesh layers into a transparent RGBA image with a
//! z-buffer: geometry layers carry a solid color, solution layers map
//! per-vertex scalars through a colormap and color range. The output is
//! a screenshot-style raster meant for [`crate::autocrop`].

use image::{Rgba, RgbaImage};
use nalgebra::{Isometry3, Orthographic3, Perspective3, Point3, Vector3};
use tracing::debug;

use crate::bounds::Bound;
use crate::colormaps::Colormap;
use crate::error::{Result, TufteError};
use crate::mesh::camera::{CameraPose, Projection};
use crate::mesh::TriMesh;

/// Vertical field of view for perspective renders.
const FOV_Y: f64 = std::f64::consts::PI / 6.0;

/// Ambient and diffuse weights for the headlight shading model.
const AMBIENT: f64 = 0.35;
const DIFFUSE: f64 = 0.65;

/// How a mesh layer is colored.
#[derive(Debug)]
pub enum Paint<'a> {
    /// Uniform color for plain geometry
    Solid(Rgba<u8>),
    /// Per-vertex scalars through a colormap and color range
    Scalars {
        colormap: &'a Colormap,
        limits: Bound,
    },
}

/// One mesh plus its paint.
#[derive(Debug)]
pub struct MeshLayer<'a> {
    pub mesh: &'a TriMesh,
    pub paint: Paint<'a>,
}

/// Window and style settings for a render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Perspective for 3D views, parallel for section views
    pub projection: Projection,
    /// Headlight shading; disable for flat 2D-style figures
    pub lighting: bool,
    /// Canvas fill behind the geometry
    pub background: Rgba<u8>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            projection: Projection::Perspective,
            lighting: true,
            background: Rgba([0, 0, 0, 0]),
        }
    }
}

enum Projector {
    Perspective(Perspective3<f64>),
    Parallel(Orthographic3<f64>),
}

impl Projector {
    fn project(&self, p: &Point3<f64>) -> Point3<f64> {
        match self {
            Projector::Perspective(m) => m.project_point(p),
            Projector::Parallel(m) => m.project_point(p),
        }
    }
}

#[derive(Clone, Copy)]
struct ScreenVertex {
    x: f64,
    y: f64,
    depth: f64,
    valid: bool,
}

/// Render mesh layers from a camera pose into an RGBA image.
///
/// Layers draw in argument order but overlap is resolved by the
/// z-buffer, not the order.
pub fn render(
    layers: &[MeshLayer<'_>],
    camera: &CameraPose,
    settings: &RenderSettings,
) -> Result<RgbaImage> {
    if settings.width == 0 || settings.height == 0 {
        return Err(TufteError::InvalidParameter {
            param: "window_size".to_string(),
            message: format!(
                "render window must be non-empty, got {}x{}",
                settings.width, settings.height
            ),
        });
    }

    let (scene_min, scene_max) = scene_bounds(layers)?;
    let center = Point3::from((scene_min.coords + scene_max.coords) / 2.0);
    let radius = ((scene_max - scene_min).norm() / 2.0).max(1e-9);

    let view = Isometry3::look_at_rh(&camera.position, &camera.focal_point, &camera.view_up);

    // Depth range of the scene in front of the camera
    let center_depth = -(view.transform_point(&center)).z;
    let znear = (center_depth - radius).max(radius * 1e-3);
    let zfar = center_depth + radius * 2.0;

    let aspect = settings.width as f64 / settings.height as f64;
    let projector = match settings.projection {
        Projection::Perspective => {
            Projector::Perspective(Perspective3::new(aspect, FOV_Y, znear, zfar))
        }
        Projection::Parallel => {
            let half_h = if aspect >= 1.0 {
                radius * 1.05
            } else {
                radius * 1.05 / aspect
            };
            let half_w = half_h * aspect;
            Projector::Parallel(Orthographic3::new(
                -half_w, half_w, -half_h, half_h, znear, zfar,
            ))
        }
    };

    let mut image = RgbaImage::from_pixel(settings.width, settings.height, settings.background);
    let mut zbuffer = vec![f64::INFINITY; (settings.width * settings.height) as usize];

    let light = camera.view_direction()?;

    let mut triangles_drawn = 0usize;
    for layer in layers {
        let screen = project_vertices(layer.mesh, &view, &projector, settings, znear);
        triangles_drawn += draw_layer(
            layer,
            &screen,
            &light,
            settings,
            &mut image,
            &mut zbuffer,
        )?;
    }

    debug!(
        layers = layers.len(),
        triangles = triangles_drawn,
        width = settings.width,
        height = settings.height,
        projection = ?settings.projection,
        "Mesh render completed"
    );

    Ok(image)
}

fn scene_bounds(layers: &[MeshLayer<'_>]) -> Result<(Point3<f64>, Point3<f64>)> {
    let mut merged: Option<(Point3<f64>, Point3<f64>)> = None;
    for layer in layers {
        if let Some((min, max)) = layer.mesh.bounds() {
            merged = Some(match merged {
                None => (min, max),
                Some((m0, m1)) => (
                    Point3::new(m0.x.min(min.x), m0.y.min(min.y), m0.z.min(min.z)),
                    Point3::new(m1.x.max(max.x), m1.y.max(max.y), m1.z.max(max.z)),
                ),
            });
        }
    }
    merged.ok_or_else(|| TufteError::Render {
        message: "nothing to render: all layers are empty".to_string(),
    })
}

fn project_vertices(
    mesh: &TriMesh,
    view: &Isometry3<f64>,
    projector: &Projector,
    settings: &RenderSettings,
    znear: f64,
) -> Vec<ScreenVertex> {
    let w = settings.width as f64;
    let h = settings.height as f64;
    mesh.vertices()
        .iter()
        .map(|p| {
            let cam = view.transform_point(p);
            // Points at or behind the near plane cannot be projected
            if -cam.z < znear * 0.5 {
                return ScreenVertex {
                    x: 0.0,
                    y: 0.0,
                    depth: 0.0,
                    valid: false,
                };
            }
            let ndc = projector.project(&cam);
            ScreenVertex {
                x: (ndc.x + 1.0) * 0.5 * w,
                y: (1.0 - ndc.y) * 0.5 * h,
                depth: ndc.z,
                valid: true,
            }
        })
        .collect()
}

fn draw_layer(
    layer: &MeshLayer<'_>,
    screen: &[ScreenVertex],
    light: &Vector3<f64>,
    settings: &RenderSettings,
    image: &mut RgbaImage,
    zbuffer: &mut [f64],
) -> Result<usize> {
    let mesh = layer.mesh;
    let scalars = match &layer.paint {
        Paint::Scalars { .. } => Some(mesh.scalars().ok_or_else(|| TufteError::Mesh {
            message: "scalar paint requires a mesh with scalars".to_string(),
        })?),
        Paint::Solid(_) => None,
    };

    let mut drawn = 0usize;
    for (t, tri) in mesh.triangles().iter().enumerate() {
        let [a, b, c] = *tri;
        let (va, vb, vc) = (screen[a], screen[b], screen[c]);
        if !(va.valid && vb.valid && vc.valid) {
            continue;
        }

        let area = edge(va.x, va.y, vb.x, vb.y, vc.x, vc.y);
        if area.abs() < 1e-12 {
            continue;
        }

        // Headlight shading from the face normal; both sides lit
        let shade = if settings.lighting {
            let n = mesh.face_normal(t);
            AMBIENT + DIFFUSE * n.dot(light).abs()
        } else {
            1.0
        };

        let min_x = va.x.min(vb.x).min(vc.x).floor().max(0.0) as u32;
        let max_x = (va.x.max(vb.x).max(vc.x).ceil() as i64)
            .min(settings.width as i64 - 1)
            .max(0) as u32;
        let min_y = va.y.min(vb.y).min(vc.y).floor().max(0.0) as u32;
        let max_y = (va.y.max(vb.y).max(vc.y).ceil() as i64)
            .min(settings.height as i64 - 1)
            .max(0) as u32;

        let mut touched = false;
        for py in min_y..=max_y {
            for px in min_x..=max_x {
                let qx = px as f64 + 0.5;
                let qy = py as f64 + 0.5;
                let w0 = edge(vb.x, vb.y, vc.x, vc.y, qx, qy) / area;
                let w1 = edge(vc.x, vc.y, va.x, va.y, qx, qy) / area;
                let w2 = edge(va.x, va.y, vb.x, vb.y, qx, qy) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * va.depth + w1 * vb.depth + w2 * vc.depth;
                if !(-1.0..=1.0).contains(&depth) {
                    continue;
                }
                let idx = (py * settings.width + px) as usize;
                if depth >= zbuffer[idx] {
                    continue;
                }

                let color = match &layer.paint {
                    Paint::Solid(color) => *color,
                    Paint::Scalars { colormap, limits } => {
                        let s = scalars.map(|s| w0 * s[a] + w1 * s[b] + w2 * s[c]);
                        colormap.map(s.unwrap_or(f64::NAN), limits)
                    }
                };
                // Missing scalars leave the background visible
                if color[3] == 0 {
                    continue;
                }

                zbuffer[idx] = depth;
                image.put_pixel(px, py, shaded(color, shade));
                touched = true;
            }
        }
        if touched {
            drawn += 1;
        }
    }
    Ok(drawn)
}

fn edge(ax: f64, ay: f64, bx: f64, by: f64, cx: f64, cy: f64) -> f64 {
    (bx - ax) * (cy - ay) - (by - ay) * (cx - ax)
}

fn shaded(color: Rgba<u8>, shade: f64) -> Rgba<u8> {
    Rgba([
        (color[0] as f64 * shade).round().clamp(0.0, 255.0) as u8,
        (color[1] as f64 * shade).round().clamp(0.0, 255.0) as u8,
        (color[2] as f64 * shade).round().clamp(0.0, 255.0) as u8,
        color[3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([220, 30, 30, 255]);
    const BLUE: Rgba<u8> = Rgba([30, 30, 220, 255]);

    fn facing_triangle(z: f64) -> TriMesh {
        TriMesh::new(
            vec![
                Point3::new(-1.0, -1.0, z),
                Point3::new(1.0, -1.0, z),
                Point3::new(0.0, 1.0, z),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap()
    }

    fn front_camera() -> CameraPose {
        CameraPose::new(
            Point3::new(0.0, 0.0, 5.0),
            Point3::origin(),
            Vector3::y(),
        )
    }

    fn flat_settings() -> RenderSettings {
        RenderSettings {
            width: 64,
            height: 64,
            projection: Projection::Parallel,
            lighting: false,
            ..Default::default()
        }
    }

    fn opaque_rgb_sum(image: &RgbaImage) -> u64 {
        image
            .pixels()
            .filter(|p| p[3] > 0)
            .map(|p| p[0] as u64 + p[1] as u64 + p[2] as u64)
            .sum()
    }

    #[test]
    fn test_solid_triangle_covers_center() {
        let mesh = facing_triangle(0.0);
        let layers = [MeshLayer {
            mesh: &mesh,
            paint: Paint::Solid(RED),
        }];
        let img = render(&layers, &front_camera(), &flat_settings()).unwrap();

        assert_eq!(*img.get_pixel(32, 32), RED);
        // Corners outside the triangle stay transparent
        assert_eq!(img.get_pixel(1, 1)[3], 0);
        assert_eq!(img.get_pixel(62, 1)[3], 0);
    }

    #[test]
    fn test_zbuffer_prefers_near_geometry() {
        let far = facing_triangle(0.0);
        let near = facing_triangle(2.0);
        let layers = [
            MeshLayer {
                mesh: &near,
                paint: Paint::Solid(BLUE),
            },
            MeshLayer {
                mesh: &far,
                paint: Paint::Solid(RED),
            },
        ];
        let img = render(&layers, &front_camera(), &flat_settings()).unwrap();
        // The far layer draws last but loses the depth test
        assert_eq!(*img.get_pixel(32, 32), BLUE);
    }

    #[test]
    fn test_scalar_paint_maps_through_colormap() {
        let cmap = Colormap::by_name("viridis").unwrap();
        let mesh = facing_triangle(0.0)
            .with_scalars(vec![0.5, 0.5, 0.5])
            .unwrap();
        let layers = [MeshLayer {
            mesh: &mesh,
            paint: Paint::Scalars {
                colormap: &cmap,
                limits: Bound::new(0.0, 1.0),
            },
        }];
        let img = render(&layers, &front_camera(), &flat_settings()).unwrap();
        assert_eq!(*img.get_pixel(32, 32), cmap.sample(0.5));
    }

    #[test]
    fn test_scalar_paint_requires_scalars() {
        let cmap = Colormap::by_name("viridis").unwrap();
        let mesh = facing_triangle(0.0);
        let layers = [MeshLayer {
            mesh: &mesh,
            paint: Paint::Scalars {
                colormap: &cmap,
                limits: Bound::new(0.0, 1.0),
            },
        }];
        assert!(render(&layers, &front_camera(), &flat_settings()).is_err());
    }

    #[test]
    fn test_lighting_darkens_tilted_faces() {
        // A triangle tilted away from the headlight
        let mesh = TriMesh::new(
            vec![
                Point3::new(-1.0, -1.0, 0.0),
                Point3::new(1.0, -1.0, 0.0),
                Point3::new(0.0, 1.0, 1.5),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap();

        let flat = flat_settings();
        let lit = RenderSettings {
            lighting: true,
            ..flat
        };
        let layers = [MeshLayer {
            mesh: &mesh,
            paint: Paint::Solid(RED),
        }];

        let img_flat = render(&layers, &front_camera(), &flat).unwrap();
        let img_lit = render(&layers, &front_camera(), &lit).unwrap();
        assert!(opaque_rgb_sum(&img_lit) < opaque_rgb_sum(&img_flat));
    }

    #[test]
    fn test_perspective_smoke() {
        let mesh = facing_triangle(0.0);
        let layers = [MeshLayer {
            mesh: &mesh,
            paint: Paint::Solid(RED),
        }];
        let settings = RenderSettings {
            width: 64,
            height: 64,
            ..Default::default()
        };
        let img = render(&layers, &front_camera(), &settings).unwrap();
        assert!(img.pixels().any(|p| p[3] > 0));
    }

    #[test]
    fn test_empty_scene_is_an_error() {
        let mesh = TriMesh::new(Vec::new(), Vec::new()).unwrap();
        let layers = [MeshLayer {
            mesh: &mesh,
            paint: Paint::Solid(RED),
        }];
        assert!(render(&layers, &front_camera(), &flat_settings()).is_err());
    }

    #[test]
    fn test_window_size_validation() {
        let mesh = facing_triangle(0.0);
        let layers = [MeshLayer {
            mesh: &mesh,
            paint: Paint::Solid(RED),
        }];
        let settings = RenderSettings {
            width: 0,
            ..flat_settings()
        };
        assert!(render(&layers, &front_camera(), &settings).is_err());
    }
}
