//! sampling, critical point search and chart output
/// ordered x-values of the sampling interval
pub mod grid;
/// formula + grid -> polyline, skipping points where the formula is undefined
///# Example
/// ```
/// use RustedGrapher::plotting::grid::Grid;
/// use RustedGrapher::plotting::sampler::sample;
/// use RustedGrapher::symbolic::evaluator::SymbolicEvaluator;
/// let grid = Grid::new(-1.0, 1.0, 0.5).unwrap();
/// let samples = sample(&SymbolicEvaluator::default(), "1/x", &grid);
/// assert_eq!(samples.len(), 4);
/// ```
pub mod sampler;
/// grid points where the derivative is within 1e-5 of zero
pub mod critical_points;
/// pannable view rectangle
pub mod viewport;
/// seeded random colors
pub mod color;
/// rendering boundary: labels and datasets
pub mod chart_data;
/// raster image export with plotters
pub mod render;
/// csv export and export errors
pub mod export;
