/// Drawing accumulated on a canvas until it is shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub series: Vec<Series>,
    pub y_range: Option<(f64, f64)>,
    pub title: Option<String>,
    pub legend: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: Option<String>,
    pub points: Vec<(f64, f64)>,
    pub kind: SeriesKind,
    pub color: SeriesColor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesKind {
    Line,
    Scatter { marker: Marker, size: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Star,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

impl SeriesColor {
    pub const BLACK: SeriesColor = SeriesColor::rgb(0, 0, 0);
    pub const BLUE: SeriesColor = SeriesColor::rgb(0, 0, 255);
    pub const RED: SeriesColor = SeriesColor::rgb(255, 0, 0);
    pub const PURPLE: SeriesColor = SeriesColor::rgb(128, 0, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }
}

impl Frame {
    pub fn plot_line(&mut self, points: Vec<(f64, f64)>, color: SeriesColor, label: Option<&str>) {
        self.series.push(Series {
            label: label.map(str::to_string),
            points,
            kind: SeriesKind::Line,
            color,
        });
    }

    pub fn scatter(&mut self, points: Vec<(f64, f64)>, marker: Marker, size: u32, color: SeriesColor, label: Option<&str>) {
        self.series.push(Series {
            label: label.map(str::to_string),
            points,
            kind: SeriesKind::Scatter { marker, size },
            color,
        });
    }

    pub fn set_y_range(&mut self, min: f64, max: f64) {
        self.y_range = Some((min, max));
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn enable_legend(&mut self) {
        self.legend = true;
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty() && self.title.is_none()
    }

    pub fn series_labelled(&self, label: &str) -> Option<&Series> {
        self.series.iter().find(|series| series.label.as_deref() == Some(label))
    }

    // Span of all x coordinates, None for a frame without points
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        extent(self.series.iter().flat_map(|series| series.points.iter().map(|p| p.0)))
    }

    // Explicit y range if set, otherwise the span of all y coordinates
    pub fn y_extent(&self) -> Option<(f64, f64)> {
        self.y_range.or_else(|| extent(self.series.iter().flat_map(|series| series.points.iter().map(|p| p.1))))
    }
}

// Finite min/max of the values, NaN and infinities ignored
pub fn extent<I: Iterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}
