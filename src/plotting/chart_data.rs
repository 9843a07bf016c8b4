//! Data handed to the chart surface: x labels plus one dataset per series.
use crate::plotting::critical_points::CriticalPoint;
use crate::plotting::grid::Grid;
use crate::plotting::sampler::Sample;
use crate::plotting::viewport::Viewport;
use strum_macros::{Display, EnumIter};

pub const CRITICAL_POINTS_LABEL: &str = "Critical points";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum SeriesStyle {
    /// continuous line through the samples
    #[strum(serialize = "line")]
    Line,
    /// unconnected markers
    #[strum(serialize = "points")]
    Points,
}

impl SeriesStyle {
    pub fn point_radius(&self) -> u32 {
        match self {
            SeriesStyle::Line => 5,
            SeriesStyle::Points => 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub points: Vec<Sample>,
    /// one color for the whole series, or one per point
    pub colors: Vec<String>,
    pub style: SeriesStyle,
}

impl Dataset {
    pub fn line(label: &str, points: Vec<Sample>, color: &str) -> Self {
        Self {
            label: label.to_string(),
            points,
            colors: vec![color.to_string()],
            style: SeriesStyle::Line,
        }
    }

    pub fn critical_points(points: &[CriticalPoint]) -> Self {
        Self {
            label: CRITICAL_POINTS_LABEL.to_string(),
            points: points.iter().map(|p| Sample { x: p.x, y: p.y }).collect(),
            colors: points.iter().map(|p| p.color.clone()).collect(),
            style: SeriesStyle::Points,
        }
    }

    /// color of the i-th point, falling back to the series color
    pub fn color_of(&self, index: usize) -> Option<&str> {
        self.colors
            .get(index)
            .or_else(|| self.colors.first())
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub labels: Vec<f64>,
    pub datasets: Vec<Dataset>,
    pub x_bounds: (f64, f64),
    pub y_bounds: (f64, f64),
}

impl ChartData {
    /// Chart with the grid as labels and the viewport as axis bounds
    pub fn new(grid: Option<&Grid>, viewport: &Viewport) -> Self {
        Self {
            labels: grid.map(Grid::points).unwrap_or_default(),
            datasets: Vec::new(),
            x_bounds: viewport.x_range(),
            y_bounds: viewport.y_range(),
        }
    }

    pub fn push(&mut self, dataset: Dataset) {
        self.datasets.push(dataset);
    }

    pub fn total_points(&self) -> usize {
        self.datasets.iter().map(|d| d.points.len()).sum()
    }
}
