//! Error plot demo: error bars over a filled error band.
//!
//! A quadratic trend with a relative error, drawn twice: the shaded
//! band covers y ± e and the error bars repeat the same interval on top
//! of the line and markers. Exported as SVG.

use anyhow::Result;
use plotters::prelude::*;
use tracing::info;

use tufte::bounds::{linspace, Bound};
use tufte::config::Theme;
use tufte::geometry::FigureSize;
use tufte::logging::{init_tracing, log_export_stats};
use tufte::ticks::TickFormat;

fn main() -> Result<()> {
    init_tracing("info");

    let theme = Theme::default();
    let out_dir = std::path::Path::new("render");
    std::fs::create_dir_all(out_dir)?;

    // Dummy data: quadratic trend with a relative error
    let x = linspace(0.0, 2.0, 11);
    let y: Vec<f64> = x.iter().map(|&v| 2.0 + 2.0 * v.powi(2)).collect();
    let e: Vec<f64> = y.iter().map(|&v| 0.1 + 0.1 * v).collect();

    let xticks = linspace(0.0, 2.0, 4);
    let yticks = linspace(2.0, 11.0, 5);
    let x_bound = Bound::padded(&xticks, 0.1, 0.0)?;
    let y_bound = Bound::padded(&yticks, 1.0, 0.0)?;

    let tick_fmt = TickFormat::pattern("{:.2}")?;

    let size = FigureSize::new(3.5, 3.0, 200.0);
    let path = out_dir.join("error.svg");

    let root = SVGBackend::new(&path, size.px()).into_drawing_area();
    let mut chart = ChartBuilder::on(&root)
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
        .x_labels(xticks.len())
        .y_labels(yticks.len())
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

    // Error band: upper edge forward, lower edge back
    let band: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter().zip(e.iter()))
        .map(|(&xv, (&yv, &ev))| (xv, yv + ev))
        .chain(
            x.iter()
                .zip(y.iter().zip(e.iter()))
                .rev()
                .map(|(&xv, (&yv, &ev))| (xv, yv - ev)),
        )
        .collect();
    chart.draw_series(std::iter::once(Polygon::new(band, GREEN.mix(0.2).filled())))?;

    // Line, markers, and the error bars on top
    let points: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    chart.draw_series(LineSeries::new(points.clone(), GREEN.stroke_width(2)))?;
    chart.draw_series(points.iter().map(|&p| Circle::new(p, 3, GREEN.filled())))?;
    chart.draw_series(x.iter().zip(y.iter().zip(e.iter())).map(
        |(&xv, (&yv, &ev))| {
            ErrorBar::new_vertical(xv, yv - ev, yv, yv + ev, RED.stroke_width(1), 6)
        },
    ))?;

    root.present()?;
    log_export_stats(&path, size.px().0, size.px().1, "vector");
    info!(path = %path.display(), "Error figure written");
    Ok(())
}
