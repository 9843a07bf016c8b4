//! Rasterizes [`ChartData`] with plotters.
//!
//! The image gets an opaque white background before anything is drawn, so exported files
//! never have transparent areas. The output format follows the file extension (png, jpg, bmp).
use crate::plotting::chart_data::{ChartData, SeriesStyle};
use crate::plotting::color::parse_hex_color;
use crate::plotting::export::ExportError;
use log::info;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub size: (u32, u32),
    /// axis tick labels and the X/Y titles; needs a usable system font
    pub axis_labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            size: (800, 600),
            axis_labels: true,
        }
    }
}

fn render_error<E: std::fmt::Display>(e: E) -> ExportError {
    ExportError::Render(e.to_string())
}

/// plotters needs a non-empty increasing range
fn axis_range((a, b): (f64, f64)) -> Range<f64> {
    if a < b {
        a..b
    } else if a > b {
        b..a
    } else {
        a - 1.0..a + 1.0
    }
}

fn series_color(color: Option<&str>) -> RGBColor {
    color
        .and_then(parse_hex_color)
        .map(|(r, g, b)| RGBColor(r, g, b))
        .unwrap_or(BLACK)
}

pub fn render_chart(
    chart: &ChartData,
    path: &Path,
    options: &RenderOptions,
) -> Result<(), ExportError> {
    let root = BitMapBackend::new(path, options.size).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(10);
    if options.axis_labels {
        builder.x_label_area_size(30).y_label_area_size(40);
    }
    let mut ctx = builder
        .build_cartesian_2d(axis_range(chart.x_bounds), axis_range(chart.y_bounds))
        .map_err(render_error)?;
    if options.axis_labels {
        ctx.configure_mesh()
            .x_desc("X")
            .y_desc("Y")
            .draw()
            .map_err(render_error)?;
    }

    for dataset in &chart.datasets {
        let radius = dataset.style.point_radius() as i32;
        if dataset.style == SeriesStyle::Line {
            let color = series_color(dataset.color_of(0));
            ctx.draw_series(LineSeries::new(
                dataset.points.iter().map(|p| (p.x, p.y)),
                color.stroke_width(2),
            ))
            .map_err(render_error)?;
        }
        ctx.draw_series(dataset.points.iter().enumerate().map(|(i, p)| {
            let color = series_color(dataset.color_of(i));
            Circle::new((p.x, p.y), radius, color.filled())
        }))
        .map_err(render_error)?;
    }

    root.present().map_err(render_error)?;
    info!("chart saved to {}", path.display());
    Ok(())
}
