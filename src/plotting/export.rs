//! Saving the current chart: raster image (see `render`) and samples as CSV.
use crate::plotting::chart_data::ChartData;
use csv::Writer;
use log::info;
use std::fmt;
use std::path::Path;

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Csv(csv::Error),
    /// error reported by the drawing backend
    Render(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "export failed: {}", e),
            ExportError::Csv(e) => write!(f, "csv export failed: {}", e),
            ExportError::Render(msg) => write!(f, "rendering failed: {}", msg),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Csv(e)
    }
}

/// Writes every point of every dataset as `series,x,y`.
pub fn save_samples_to_csv(chart: &ChartData, path: &Path) -> Result<(), ExportError> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(["series", "x", "y"])?;
    for dataset in &chart.datasets {
        for point in &dataset.points {
            writer.write_record([
                dataset.label.clone(),
                point.x.to_string(),
                point.y.to_string(),
            ])?;
        }
    }
    writer.flush()?;
    info!(
        "{} point(s) of {} series saved to {}",
        chart.total_points(),
        chart.datasets.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plotting::chart_data::Dataset;
    use crate::plotting::sampler::Sample;
    use crate::plotting::viewport::Viewport;
    use tempfile::tempdir;

    #[test]
    fn test_save_samples_to_csv() {
        let mut chart = ChartData::new(None, &Viewport::default());
        chart.push(Dataset::line(
            "x^2",
            vec![Sample { x: 1.0, y: 1.0 }, Sample { x: 2.0, y: 4.0 }],
            "#ff0000",
        ));
        let dir = tempdir().unwrap();
        let path = dir.path().join("samples.csv");
        save_samples_to_csv(&chart, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "series,x,y\nx^2,1,1\nx^2,2,4\n");
    }

    #[test]
    fn test_unwritable_path() {
        let chart = ChartData::new(None, &Viewport::default());
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("samples.csv");
        assert!(save_samples_to_csv(&chart, &path).is_err());
    }
}
