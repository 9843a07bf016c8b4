//! Approximate critical points: grid points where the first derivative is close to zero.
//!
//! This is a proximity heuristic, not a root finder. A stationary point that falls between
//! two grid points is missed, and a plateau flatter than the tolerance is reported at every
//! grid point it covers.
use crate::plotting::color::ColorGenerator;
use crate::plotting::grid::Grid;
use crate::plotting::sampler::{PointResult, evaluate_point, normalize_formula};
use crate::symbolic::evaluator::{Evaluator, FormulaError};
use log::{debug, info, warn};

/// absolute tolerance on |f'(x)|, independent of step and of the function scale
pub const CRITICAL_TOLERANCE: f64 = 1e-5;

#[derive(Debug, Clone, PartialEq)]
pub struct CriticalPoint {
    pub x: f64,
    /// value of the original function (not of the derivative)
    pub y: f64,
    pub color: String,
}

/// Symbolic first derivative of `formula` with respect to `x`.
pub fn derivative_of<E: Evaluator>(evaluator: &E, formula: &str) -> Result<String, FormulaError> {
    evaluator.differentiate(&normalize_formula(formula), "x")
}

/// Scans `grid` for points where `|derivative(x)| < CRITICAL_TOLERANCE`.
///
/// Grid points where the derivative cannot be evaluated are skipped. For a flagged point the
/// original formula is evaluated to get `y`; if that fails or is not finite the point is
/// skipped as well, since it cannot be drawn. Every reported point gets its own color.
pub fn scan<E: Evaluator>(
    evaluator: &E,
    formula: &str,
    derivative: &str,
    grid: &Grid,
    colors: &mut ColorGenerator,
) -> Result<Vec<CriticalPoint>, FormulaError> {
    let function = evaluator.parse(&normalize_formula(formula))?;
    let derivative = evaluator.parse(derivative)?;
    let mut points = Vec::new();
    for x in grid {
        let slope = match evaluate_point(evaluator, &derivative, x) {
            PointResult::Value(slope) => slope,
            PointResult::Skip(reason) => {
                debug!("error evaluating derivative at x={}: {}", x, reason);
                continue;
            }
        };
        if slope.abs() >= CRITICAL_TOLERANCE {
            continue;
        }
        match evaluate_point(evaluator, &function, x) {
            PointResult::Value(y) => points.push(CriticalPoint {
                x,
                y,
                color: colors.next_color(),
            }),
            PointResult::Skip(reason) => {
                warn!(
                    "derivative of '{}' vanishes at x={} but the function is undefined there: {}",
                    formula, x, reason
                );
            }
        }
    }
    Ok(points)
}

/// Differentiates `formula` and scans `grid` for its critical points.
pub fn find_critical_points<E: Evaluator>(
    evaluator: &E,
    formula: &str,
    grid: &Grid,
    colors: &mut ColorGenerator,
) -> Result<Vec<CriticalPoint>, FormulaError> {
    let derivative = derivative_of(evaluator, formula)?;
    let points = scan(evaluator, formula, &derivative, grid, colors)?;
    info!(
        "{} critical point(s) of '{}' (derivative {}) on [{}, {}]",
        points.len(),
        formula,
        derivative,
        grid.x_min(),
        grid.x_max()
    );
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::evaluator::SymbolicEvaluator;

    #[test]
    fn test_parabola_vertex() {
        let evaluator = SymbolicEvaluator::default();
        let grid = Grid::new(-3.0, 3.0, 0.5).unwrap();
        let mut colors = ColorGenerator::seeded(1);
        let derivative = derivative_of(&evaluator, "x^2").unwrap();
        assert_eq!(derivative, "(2 * x)");
        let points = scan(&evaluator, "x^2", &derivative, &grid, &mut colors).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].x, 0.0);
        assert_eq!(points[0].y, 0.0);
        assert!(points.iter().all(|p| p.x != 0.5));
    }

    #[test]
    fn test_cubic_has_two_critical_points() {
        let evaluator = SymbolicEvaluator::default();
        let grid = Grid::new(-2.0, 2.0, 0.5).unwrap();
        let mut colors = ColorGenerator::seeded(1);
        let points = find_critical_points(&evaluator, "x^3 - 3*x", &grid, &mut colors).unwrap();
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![-1.0, 1.0]);
        assert_eq!(points[0].y, 2.0);
        assert_eq!(points[1].y, -2.0);
    }

    #[test]
    fn test_missed_between_grid_points() {
        // vertex at x = 0.25 is not on the grid
        let evaluator = SymbolicEvaluator::default();
        let grid = Grid::new(-1.0, 1.0, 0.5).unwrap();
        let mut colors = ColorGenerator::seeded(1);
        let points =
            find_critical_points(&evaluator, "(x - 0.25)^2", &grid, &mut colors).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_plateau_reports_every_point() {
        let evaluator = SymbolicEvaluator::default();
        let grid = Grid::new(0.0, 2.0, 0.5).unwrap();
        let mut colors = ColorGenerator::seeded(1);
        let points = find_critical_points(&evaluator, "5", &grid, &mut colors).unwrap();
        assert_eq!(points.len(), 5);
        assert!(points.iter().all(|p| p.y == 5.0));
    }

    #[test]
    fn test_each_point_gets_a_color() {
        let evaluator = SymbolicEvaluator::default();
        let grid = Grid::new(0.0, 2.0, 0.5).unwrap();
        let mut colors = ColorGenerator::seeded(3);
        let points = find_critical_points(&evaluator, "1", &grid, &mut colors).unwrap();
        let mut expected = ColorGenerator::seeded(3);
        for point in &points {
            assert_eq!(point.color, expected.next_color());
        }
    }

    #[test]
    fn test_undefined_function_value_is_skipped() {
        // derivative 0 everywhere, but log(x - x) is undefined
        let evaluator = SymbolicEvaluator::default();
        let grid = Grid::new(0.0, 1.0, 0.5).unwrap();
        let mut colors = ColorGenerator::seeded(1);
        let points = scan(&evaluator, "log(x - x)", "0", &grid, &mut colors).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_invalid_formula_is_rejected() {
        let evaluator = SymbolicEvaluator::default();
        let grid = Grid::new(0.0, 1.0, 0.5).unwrap();
        let mut colors = ColorGenerator::seeded(1);
        assert!(matches!(
            find_critical_points(&evaluator, "sin(", &grid, &mut colors),
            Err(FormulaError::Differentiate { .. })
        ));
    }

    #[test]
    fn test_user_log_notation() {
        // d/dx (x*ln(x) - x) = ln(x), zero at x = 1
        let evaluator = SymbolicEvaluator::default();
        let grid = Grid::new(0.5, 2.0, 0.5).unwrap();
        let mut colors = ColorGenerator::seeded(1);
        let points =
            find_critical_points(&evaluator, "x*ln(x) - x", &grid, &mut colors).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].x, 1.0);
        assert_eq!(points[0].y, -1.0);
    }
}
