//! Line plot demo: logarithmic y axis and custom axis ticks.
//!
//! Two quadratic/quartic curves over reference levels, with a pattern
//! tick format on the linear x axis and a closure format on the log y
//! axis. The figure is exported as SVG for downstream editing.

use anyhow::Result;
use plotters::prelude::*;
use tracing::info;

use tufte::bounds::{linspace, logspace, Bound};
use tufte::config::Theme;
use tufte::geometry::FigureSize;
use tufte::logging::{init_tracing, log_export_stats};
use tufte::ticks::TickFormat;

fn main() -> Result<()> {
    init_tracing("info");

    let theme = Theme::default();
    let out_dir = std::path::Path::new("render");
    std::fs::create_dir_all(out_dir)?;

    // Dummy data: one quadratic and one quartic branch
    let x = linspace(0.0, 2.0, 11);
    let y_1: Vec<f64> = x.iter().map(|&v| 1e4 + 0.5e6 * v.powi(2)).collect();
    let y_2: Vec<f64> = x.iter().map(|&v| 1e4 + 0.5e6 * v.powi(4)).collect();

    // Axis ticks and padded bounds
    let xticks = linspace(0.0, 2.0, 4);
    let yticks = logspace(4.0, 7.0, 4);
    let x_bound = Bound::padded(&xticks, 0.1, 0.0)?;
    let y_bound = Bound::padded(&yticks, 0.0, 1.0)?;

    // Tick formats: pattern on x, closure on y
    let x_fmt = TickFormat::pattern("{:.2}")?;
    let y_fmt = TickFormat::func(|v| {
        let near = |level: f64| (v / level - 1.0).abs() < 1e-9;
        let tag = if near(1e5) || near(1e6) { "bnd" } else { "out" };
        format!("{} / 10^{:.0}", tag, v.log10())
    });

    let size = FigureSize::new(3.5, 3.0, 200.0);
    let path = out_dir.join("line.svg");

    let root = SVGBackend::new(&path, size.px()).into_drawing_area();
    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Plot Title",
            (theme.font.family.as_str(), theme.font.title_size as i32),
        )
        .margin(theme.figure.margin_px as i32)
        .x_label_area_size(theme.figure.x_label_area_px as i32)
        .y_label_area_size(theme.figure.y_label_area_px as i32)
        .build_cartesian_2d(x_bound.range(), y_bound.range().log_scale())?;

    chart
        .configure_mesh()
        .x_desc("x-axis (unit)")
        .y_desc("y-axis (unit)")
        .x_labels(xticks.len())
        .y_labels(yticks.len())
        .x_label_formatter(&|v| x_fmt.label(*v))
        .y_label_formatter(&|v| y_fmt.label(*v))
        .label_style((theme.font.family.as_str(), theme.font.label_size as i32))
        .axis_desc_style((theme.font.family.as_str(), theme.font.axis_size as i32))
        .bold_line_style(
            BLACK
                .mix(theme.major_grid_alpha())
                .stroke_width(theme.grid.major_width.round().max(1.0) as u32),
        )
        .light_line_style(BLACK.mix(theme.minor_grid_alpha()))
        .draw()?;

    // Reference levels and the band between them
    chart.draw_series(std::iter::once(Rectangle::new(
        [(x_bound.min, 1e5), (x_bound.max, 1e6)],
        RGBColor(255, 165, 0).mix(0.2).filled(),
    )))?;
    for level in [1e5, 1e6] {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x_bound.min, level), (x_bound.max, level)],
            BLACK.stroke_width(1),
        )))?;
    }

    // Data curves with point markers
    for (y, color, label) in [(&y_1, RED, "label 1"), (&y_2, BLUE, "label 2")] {
        let points: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
            .label(label)
            .legend(move |(lx, ly)| {
                PathElement::new(vec![(lx, ly), (lx + 16, ly)], color.stroke_width(2))
            });
        chart.draw_series(points.iter().map(|&p| Circle::new(p, 3, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .border_style(BLACK)
        .background_style(WHITE)
        .label_font((theme.font.family.as_str(), theme.font.legend_size as i32))
        .draw()?;

    root.present()?;
    log_export_stats(&path, size.px().0, size.px().1, "vector");
    info!(path = %path.display(), "Line figure written");
    Ok(())
}
