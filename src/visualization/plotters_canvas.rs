use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use super::canvas::{Canvas, CanvasError};
use super::frame::{Frame, Marker, SeriesKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }
}

/// Canvas that renders every shown frame to its own image file.
pub struct PlottersCanvas {
    output_dir: PathBuf,
    prefix: String,
    format: OutputFormat,
    size: (u32, u32),
    frames_written: usize,
    current: Frame,
}

impl PlottersCanvas {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            prefix: "generation".to_string(),
            format: OutputFormat::Png,
            size: (800, 600),
            frames_written: 0,
            current: Frame::default(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    // <dir>/<prefix>_<index>.<ext>, index zero-padded to four digits
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.output_dir.join(format!("{}_{:04}.{}", self.prefix, index, self.format.extension()))
    }
}

impl Canvas for PlottersCanvas {
    fn frame(&self) -> &Frame {
        &self.current
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.current
    }

    fn present(&mut self, frame: &Frame) -> Result<(), CanvasError> {
        create_dir_all(&self.output_dir)
            .map_err(|err| CanvasError::OutputDirectory { reason: err.to_string() })?;

        let path = self.frame_path(self.frames_written);

        match self.format {
            OutputFormat::Png => {
                let root = BitMapBackend::new(&path, self.size).into_drawing_area();
                render_frame(&root, frame)?;
            }
            OutputFormat::Svg => {
                let root = SVGBackend::new(&path, self.size).into_drawing_area();
                render_frame(&root, frame)?;
            }
        }

        self.frames_written += 1;
        debug!(path = %path.display(), "rendered frame");

        Ok(())
    }
}

fn drawing_error<E: std::fmt::Display>(err: E) -> CanvasError {
    CanvasError::Drawing { reason: err.to_string() }
}

// Plotters refuses empty ranges, widen them around the single value
fn padded_range((min, max): (f64, f64)) -> (f64, f64) {
    if (max - min).abs() < f64::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    }
}

// Five-pointed star around `center`, outer radius `size`
fn star_points(center: (i32, i32), size: u32) -> Vec<(i32, i32)> {
    let outer = size as f64;
    let inner = outer * 0.4;

    (0..10)
        .map(|k| {
            let radius = if k % 2 == 0 { outer } else { inner };
            let angle = std::f64::consts::PI * (k as f64) / 5.0 - std::f64::consts::FRAC_PI_2;
            (
                center.0 + (radius * angle.cos()).round() as i32,
                center.1 + (radius * angle.sin()).round() as i32,
            )
        })
        .collect()
}

fn render_frame<'a, DB>(root: &'a DrawingArea<DB, Shift>, frame: &Frame) -> Result<(), CanvasError>
where
    DB: DrawingBackend + 'a,
{
    root.fill(&WHITE).map_err(drawing_error)?;

    let (x_min, x_max) = padded_range(frame.x_extent().unwrap_or((0.0, 1.0)));
    let (y_min, y_max) = padded_range(frame.y_extent().unwrap_or((0.0, 1.0)));

    let mut builder = ChartBuilder::on(root);
    builder.margin(10).x_label_area_size(30).y_label_area_size(50);

    if let Some(title) = &frame.title {
        builder.caption(title, ("sans-serif", 30).into_font());
    }

    let mut chart = builder
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(drawing_error)?;

    chart.configure_mesh().draw().map_err(drawing_error)?;

    for series in &frame.series {
        let color = RGBColor(series.color.r, series.color.g, series.color.b).mix(series.color.alpha);
        let points = series.points.iter().copied();

        let anno = match series.kind {
            SeriesKind::Line => {
                let style = color.stroke_width(2);
                let anno = chart.draw_series(LineSeries::new(points, style)).map_err(drawing_error)?;
                anno.legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
                anno
            }
            SeriesKind::Scatter { marker: Marker::Circle, size } => {
                let style = color.filled();
                let anno = chart
                    .draw_series(points.map(|p| Circle::new(p, size, style)))
                    .map_err(drawing_error)?;
                anno.legend(move |(x, y)| Circle::new((x + 10, y), size, style));
                anno
            }
            SeriesKind::Scatter { marker: Marker::Star, size } => {
                let style = color.filled();
                let anno = chart
                    .draw_series(points.map(|p| EmptyElement::at(p) + Polygon::new(star_points((0, 0), size), style)))
                    .map_err(drawing_error)?;
                anno.legend(move |(x, y)| Polygon::new(star_points((x + 10, y), size), style));
                anno
            }
        };

        if let Some(label) = &series.label {
            anno.label(label.as_str());
        }
    }

    // Only labelled series show up in the legend
    if frame.legend && frame.series.iter().any(|series| series.label.is_some()) {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(drawing_error)?;
    }

    root.present().map_err(drawing_error)?;

    Ok(())
}
