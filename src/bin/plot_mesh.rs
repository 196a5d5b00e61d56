//! Mesh render demo: 3D field views and 2D section views.
//!
//! A coil (torus) and a core (plate) carry computed potential and field
//! scalars. The camera is framed once and replayed for every view, the
//! 2D sections come from a plane clip under parallel projection, and all
//! screenshots are autocropped to their content plus a fixed margin.

use anyhow::{Context, Result};
use image::Rgba;
use nalgebra::{Point3, Vector3};
use tracing::info;

use tufte::autocrop::autocrop_file;
use tufte::bounds::Bound;
use tufte::colormaps::Colormap;
use tufte::logging::{init_tracing, log_export_stats, log_timed_operation};
use tufte::mesh::{
    clip, render, slice, threshold, Axis, CameraPose, MeshLayer, Paint, Plane, Projection,
    RenderSettings, TriMesh,
};

const CROP_MARGIN: u32 = 25;

const GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);
const ORANGE: Rgba<u8> = Rgba([255, 165, 0, 255]);

fn main() -> Result<()> {
    init_tracing("info");

    let out_dir = std::path::Path::new("render");
    std::fs::create_dir_all(out_dir)?;

    // Load the geometry from the input directory when present,
    // otherwise build the stand-in shapes (units in millimeters)
    let mesh_dir = std::path::Path::new("mesh_data");
    let (coil, core) = if mesh_dir.is_dir() {
        (
            tufte::mesh::io::read_stl(mesh_dir.join("coil.stl"))?,
            tufte::mesh::io::read_stl(mesh_dir.join("core.stl"))?,
        )
    } else {
        (
            TriMesh::torus(Point3::origin(), 2.0, 0.35, 64, 24),
            TriMesh::cuboid(Point3::origin(), Vector3::new(1.1, 1.1, 1.5)),
        )
    };

    // Scale the units to meters
    let coil = coil.scale(0.001);
    let core = core.scale(0.001);

    // Winding potential: azimuthal position along the coil, in [0, 1]
    let solution = coil
        .clone()
        .with_scalars_from(|p| 0.5 + p.y.atan2(p.x) / std::f64::consts::TAU);

    // Core field: strongest in the midplane, fading toward the ends
    let (core_min, core_max) = core.bounds().context("core geometry is empty")?;
    let half_height = core_max.z.max(-core_min.z);
    let field = core
        .clone()
        .with_scalars_from(|p| 2.0 * (1.0 - p.z.abs() / half_height));

    // Extract the winding carrying the potential of interest
    let potential = threshold(&solution, &Bound::new(0.1, 1.0))?;

    let clim_potential = Bound::new(0.35, 0.65);
    let clim_field = Bound::new(0.0, 2.0);
    let cmap_potential = Colormap::by_name("viridis")?;
    let cmap_field = Colormap::by_name("magma")?;

    // Frame the camera once; every view replays this pose
    let scene_bounds = merged_bounds(&coil, &core)?;
    let cpos = CameraPose::fit(scene_bounds, Vector3::new(-1.0, -1.0, -0.5))?;
    let settings_3d = RenderSettings::default();

    // Winding potential, 3D
    render_view(
        out_dir.join("mesh_winding_3d.png"),
        &[
            MeshLayer {
                mesh: &potential,
                paint: Paint::Scalars {
                    colormap: &cmap_potential,
                    limits: clim_potential,
                },
            },
            MeshLayer {
                mesh: &core,
                paint: Paint::Solid(GRAY),
            },
        ],
        &cpos,
        &settings_3d,
    )?;

    // Core field, 3D
    render_view(
        out_dir.join("mesh_core_3d.png"),
        &[
            MeshLayer {
                mesh: &field,
                paint: Paint::Scalars {
                    colormap: &cmap_field,
                    limits: clim_field,
                },
            },
            MeshLayer {
                mesh: &coil,
                paint: Paint::Solid(ORANGE),
            },
        ],
        &cpos,
        &settings_3d,
    )?;

    // Section views: cut the geometry open along the xz plane and look
    // into the cut from the +y side, flat and parallel
    let cut_plane = Plane::from_normal(-Vector3::y(), Point3::origin())?;
    let potential_cut = clip(&potential, &cut_plane)?;
    let core_cut = clip(&core, &cut_plane)?;
    let field_cut = clip(&field, &cut_plane)?;
    let coil_cut = clip(&coil, &cut_plane)?;

    let section = slice(&potential, &cut_plane)?;
    info!(
        segments = section.len(),
        "Cross-section of the winding computed"
    );

    let cpos_2d = CameraPose::along_axis(Axis::Y, scene_bounds);
    let settings_2d = RenderSettings {
        projection: Projection::Parallel,
        lighting: false,
        ..RenderSettings::default()
    };

    // Winding potential, 2D
    render_view(
        out_dir.join("mesh_winding_2d.png"),
        &[
            MeshLayer {
                mesh: &potential_cut,
                paint: Paint::Scalars {
                    colormap: &cmap_potential,
                    limits: clim_potential,
                },
            },
            MeshLayer {
                mesh: &core_cut,
                paint: Paint::Solid(GRAY),
            },
        ],
        &cpos_2d,
        &settings_2d,
    )?;

    // Core field, 2D
    render_view(
        out_dir.join("mesh_core_2d.png"),
        &[
            MeshLayer {
                mesh: &field_cut,
                paint: Paint::Scalars {
                    colormap: &cmap_field,
                    limits: clim_field,
                },
            },
            MeshLayer {
                mesh: &coil_cut,
                paint: Paint::Solid(ORANGE),
            },
        ],
        &cpos_2d,
        &settings_2d,
    )?;

    Ok(())
}

fn merged_bounds(a: &TriMesh, b: &TriMesh) -> Result<(Point3<f64>, Point3<f64>)> {
    let (a_min, a_max) = a.bounds().context("demo geometry is empty")?;
    let (b_min, b_max) = b.bounds().context("demo geometry is empty")?;
    Ok((
        Point3::new(
            a_min.x.min(b_min.x),
            a_min.y.min(b_min.y),
            a_min.z.min(b_min.z),
        ),
        Point3::new(
            a_max.x.max(b_max.x),
            a_max.y.max(b_max.y),
            a_max.z.max(b_max.z),
        ),
    ))
}

/// Render, save, and crop one view.
fn render_view(
    path: std::path::PathBuf,
    layers: &[MeshLayer<'_>],
    cpos: &CameraPose,
    settings: &RenderSettings,
) -> Result<()> {
    let img = log_timed_operation("mesh_render", || render(layers, cpos, settings))?;
    img.save_with_format(&path, image::ImageFormat::Png)?;
    log_export_stats(&path, img.width(), img.height(), "screenshot");

    let (w, h) = autocrop_file(&path, CROP_MARGIN)?;
    info!(path = %path.display(), width = w, height = h, "View cropped");
    Ok(())
}
