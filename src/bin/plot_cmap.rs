//! Scatter/colorbar demo split into vector and raster layers.
//!
//! A 100k-point scatter would bloat any vector file, so the figure is
//! rendered twice: an SVG with the axes, labels, and colorbar, and a
//! transparent high-density PNG carrying only the dots. The raster
//! canvas is cloned from the vector figure's captured geometry so the
//! layers align when composited by the document tool.

use anyhow::Result;
use plotters::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::info;

use tufte::bounds::{linspace, Bound};
use tufte::colormaps::Colormap;
use tufte::config::Theme;
use tufte::geometry::{FigureGeometry, FigureSize};
use tufte::logging::{init_tracing, log_export_stats};
use tufte::raster::RasterCanvas;
use tufte::ticks::TickFormat;

const POINT_COUNT: usize = 100_000;
const RASTER_DPI: f64 = 500.0;

fn main() -> Result<()> {
    init_tracing("info");

    let theme = Theme::default();
    let out_dir = std::path::Path::new("render");
    std::fs::create_dir_all(out_dir)?;

    // Dummy payload: uniform points colored by a third coordinate
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let xs: Vec<f64> = (0..POINT_COUNT).map(|_| rng.gen::<f64>()).collect();
    let ys: Vec<f64> = (0..POINT_COUNT).map(|_| rng.gen::<f64>()).collect();
    let zs: Vec<f64> = (0..POINT_COUNT).map(|_| rng.gen::<f64>()).collect();

    let cmap = Colormap::by_name("viridis")?;

    let ticks = linspace(0.0, 1.0, 5);
    let x_bound = Bound::padded(&ticks, 0.1, 0.0)?;
    let y_bound = Bound::padded(&ticks, 0.1, 0.0)?;
    let c_bound = Bound::padded(&ticks, 0.1, 0.0)?;
    let tick_fmt = TickFormat::pattern("{:.2}")?;

    let size = FigureSize::new(3.5, 3.0, 200.0);
    let vector_path = out_dir.join("cmap_vector.svg");
    let raster_path = out_dir.join("cmap_raster.png");

    // Vector layer: decoration only, plus the geometry snapshot
    let geometry = {
        let (width_px, height_px) = size.px();
        let colorbar_px = 90u32;

        let root = SVGBackend::new(&vector_path, (width_px, height_px)).into_drawing_area();
        let (plot_area, cbar_area) = root.split_horizontally((width_px - colorbar_px) as i32);

        let mut chart = ChartBuilder::on(&plot_area)
            .caption(
                "Plot Title",
                (theme.font.family.as_str(), theme.font.title_size as i32),
            )
            .margin(theme.figure.margin_px as i32)
            .x_label_area_size(theme.figure.x_label_area_px as i32)
            .y_label_area_size(theme.figure.y_label_area_px as i32)
            .build_cartesian_2d(x_bound.range(), y_bound.range())?;

        chart
            .configure_mesh()
            .x_desc("x-axis (unit)")
            .y_desc("y-axis (unit)")
            .x_labels(ticks.len())
            .y_labels(ticks.len())
            .x_label_formatter(&|v| tick_fmt.label(*v))
            .y_label_formatter(&|v| tick_fmt.label(*v))
            .label_style((theme.font.family.as_str(), theme.font.label_size as i32))
            .axis_desc_style((theme.font.family.as_str(), theme.font.axis_size as i32))
            .bold_line_style(
                BLACK
                    .mix(theme.major_grid_alpha())
                    .stroke_width(theme.grid.major_width.round().max(1.0) as u32),
            )
            .light_line_style(BLACK.mix(theme.minor_grid_alpha()))
            .draw()?;

        draw_colorbar(&cbar_area, &cmap, &c_bound, &ticks, &tick_fmt, &theme)?;

        let geometry = FigureGeometry::capture(
            chart.plotting_area(),
            size.dpi,
            x_bound,
            y_bound,
            c_bound,
        );

        root.present()?;
        geometry
    };
    log_export_stats(&vector_path, size.px().0, size.px().1, "vector");

    // Raster layer: the payload alone, at matched physical size
    let mut canvas = RasterCanvas::new(geometry, RASTER_DPI)?;
    canvas.draw_scatter(&xs, &ys, &zs, &cmap, 4.0)?;
    canvas.save_png(&raster_path)?;

    info!(
        vector = %vector_path.display(),
        raster = %raster_path.display(),
        points = POINT_COUNT,
        "Split figure written"
    );
    Ok(())
}

/// Gradient strip with tick labels, drawn in pixel coordinates.
fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    cmap: &Colormap,
    c_bound: &Bound,
    ticks: &[f64],
    tick_fmt: &TickFormat,
    theme: &Theme,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let (_, area_h) = area.dim_in_pixel();
    let bar_x = 10i32;
    let bar_w = 14i32;
    let bar_top = 40i32;
    let bar_bottom = area_h as i32 - theme.figure.x_label_area_px as i32 - 10;
    let bar_h = bar_bottom - bar_top;

    area.draw(&Text::new(
        "c-axis (unit)",
        (bar_x - 4, bar_top - 24),
        (theme.font.family.as_str(), theme.font.axis_size as i32).into_font(),
    ))?;

    // Gradient strip, bottom = low end of the color range
    let steps = 64;
    for i in 0..steps {
        let t = 1.0 - (i as f64 + 0.5) / steps as f64;
        let c = cmap.sample(t);
        let y0 = bar_top + (i * bar_h) / steps;
        let y1 = bar_top + ((i + 1) * bar_h) / steps;
        area.draw(&Rectangle::new(
            [(bar_x, y0), (bar_x + bar_w, y1)],
            RGBColor(c[0], c[1], c[2]).filled(),
        ))?;
    }
    area.draw(&Rectangle::new(
        [(bar_x, bar_top), (bar_x + bar_w, bar_bottom)],
        BLACK.stroke_width(1),
    ))?;

    // Tick marks and labels on the right side of the strip
    for &tv in ticks {
        let y = bar_bottom - (c_bound.normalize(tv) * bar_h as f64).round() as i32;
        area.draw(&PathElement::new(
            vec![(bar_x + bar_w, y), (bar_x + bar_w + 4, y)],
            BLACK.stroke_width(1),
        ))?;
        area.draw(&Text::new(
            tick_fmt.label(tv),
            (bar_x + bar_w + 7, y - 6),
            (theme.font.family.as_str(), theme.font.label_size as i32).into_font(),
        ))?;
    }
    Ok(())
}
