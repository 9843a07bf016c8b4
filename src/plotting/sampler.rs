//! Turns one formula and a [`Grid`] into a renderable polyline.
//!
//! Sampling is best effort: a point where the formula cannot be evaluated, or evaluates to
//! something that is not a finite real number, is skipped and the rest of the curve is still
//! produced, so `1/x` renders on both sides of its singularity.
use crate::plotting::grid::Grid;
use crate::symbolic::evaluator::Evaluator;
use log::debug;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// user-facing natural logarithm call, also right after a factor (`2ln(x)`);
/// the evaluator spells it `log`
static NATURAL_LOG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ln(\s*\()").expect("natural log pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl From<Sample> for (f64, f64) {
    fn from(sample: Sample) -> Self {
        (sample.x, sample.y)
    }
}

/// Why a grid point produced no sample
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    EvalFailed(String),
    NonFinite(f64),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SkipReason::EvalFailed(reason) => write!(f, "{}", reason),
            SkipReason::NonFinite(value) => write!(f, "value is not finite ({})", value),
        }
    }
}

/// Outcome of evaluating a formula at a single grid point
#[derive(Debug, Clone, PartialEq)]
pub enum PointResult {
    Value(f64),
    Skip(SkipReason),
}

impl PointResult {
    pub fn value(&self) -> Option<f64> {
        match self {
            PointResult::Value(v) => Some(*v),
            PointResult::Skip(_) => None,
        }
    }
}

/// Rewrites user notation into evaluator notation (`ln(x)` -> `log(x)`).
pub fn normalize_formula(formula: &str) -> String {
    NATURAL_LOG
        .replace_all(formula.trim(), "log${1}")
        .into_owned()
}

/// Evaluate a parsed formula at `x`, folding evaluation errors and non-finite values into
/// [`PointResult::Skip`].
pub fn evaluate_point<E: Evaluator>(evaluator: &E, parsed: &E::Parsed, x: f64) -> PointResult {
    match evaluator.evaluate(parsed, x) {
        Ok(y) if y.is_finite() => PointResult::Value(y),
        Ok(y) => PointResult::Skip(SkipReason::NonFinite(y)),
        Err(e) => PointResult::Skip(SkipReason::EvalFailed(e.to_string())),
    }
}

/// Samples `formula` on every point of `grid`.
///
/// The output is ordered by x, may be shorter than the grid and may be empty, e.g. when the
/// formula is undefined on the whole interval or cannot be parsed at all. Errors never
/// reach the caller; skipped points are traced at debug level.
pub fn sample<E: Evaluator>(evaluator: &E, formula: &str, grid: &Grid) -> Vec<Sample> {
    let normalized = normalize_formula(formula);
    let parsed = match evaluator.parse(&normalized) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("formula '{}' skipped entirely: {}", formula, e);
            return Vec::new();
        }
    };
    let mut samples = Vec::with_capacity(grid.len());
    for x in grid {
        match evaluate_point(evaluator, &parsed, x) {
            PointResult::Value(y) => samples.push(Sample { x, y }),
            PointResult::Skip(reason) => {
                debug!("error evaluating '{}' at x={}: {}", formula, x, reason)
            }
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::evaluator::SymbolicEvaluator;
    use approx::assert_relative_eq;

    fn xs(samples: &[Sample]) -> Vec<f64> {
        samples.iter().map(|s| s.x).collect()
    }

    #[test]
    fn test_division_singularity_is_skipped() {
        let grid = Grid::new(-1.0, 1.0, 0.5).unwrap();
        let samples = sample(&SymbolicEvaluator::default(), "1/x", &grid);
        assert_eq!(xs(&samples), vec![-1.0, -0.5, 0.5, 1.0]);
        assert_relative_eq!(samples[1].y, -2.0);
    }

    #[test]
    fn test_natural_log_domain() {
        let grid = Grid::new(-2.0, 2.0, 1.0).unwrap();
        let samples = sample(&SymbolicEvaluator::default(), "ln(x)", &grid);
        assert_eq!(xs(&samples), vec![1.0, 2.0]);
        assert_eq!(samples[0].y, 0.0);
        assert_relative_eq!(samples[1].y, 2.0_f64.ln());
    }

    #[test]
    fn test_sampling_is_idempotent() {
        let evaluator = SymbolicEvaluator::default();
        let grid = Grid::new(-3.0, 3.0, 0.25).unwrap();
        let first = sample(&evaluator, "sin(x)/x + sqrt(x)", &grid);
        let second = sample(&evaluator, "sin(x)/x + sqrt(x)", &grid);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_undefined_everywhere_is_empty() {
        let grid = Grid::new(-5.0, -1.0, 0.5).unwrap();
        let samples = sample(&SymbolicEvaluator::default(), "log(x)", &grid);
        assert!(samples.is_empty());
    }

    #[test]
    fn test_unparseable_formula_is_empty() {
        let grid = Grid::new(0.0, 1.0, 0.5).unwrap();
        assert!(sample(&SymbolicEvaluator::default(), "x +* 2", &grid).is_empty());
    }

    #[test]
    fn test_normalize_formula() {
        assert_eq!(normalize_formula(" ln(x) + 2*ln(x^2) "), "log(x) + 2*log(x^2)");
        assert_eq!(normalize_formula("log(x)"), "log(x)");
        assert_eq!(normalize_formula("2ln(x)"), "2log(x)");
        assert_eq!(normalize_formula("x ln (x)"), "x log (x)");
        assert_eq!(normalize_formula("sin(x)*ln(x)"), "sin(x)*log(x)");
    }

    #[test]
    fn test_log_after_implicit_factor() {
        let grid = Grid::new(1.0, 2.0, 1.0).unwrap();
        let evaluator = SymbolicEvaluator::default();
        let samples = sample(&evaluator, "2ln(x)", &grid);
        assert_eq!(xs(&samples), vec![1.0, 2.0]);
        assert_relative_eq!(samples[1].y, 2.0 * 2.0_f64.ln());
        let samples = sample(&evaluator, "x ln(x)", &grid);
        assert_relative_eq!(samples[1].y, 2.0 * 2.0_f64.ln());
    }

    #[test]
    fn test_evaluate_point_reasons() {
        let evaluator = SymbolicEvaluator::default();
        let parsed = evaluator.parse("log(x)").unwrap();
        assert_eq!(evaluate_point(&evaluator, &parsed, 1.0), PointResult::Value(0.0));
        assert_eq!(
            evaluate_point(&evaluator, &parsed, 0.0),
            PointResult::Skip(SkipReason::NonFinite(f64::NEG_INFINITY))
        );
        assert!(matches!(
            evaluate_point(&evaluator, &parsed, -1.0),
            PointResult::Skip(SkipReason::EvalFailed(_))
        ));
        assert_eq!(evaluate_point(&evaluator, &parsed, 1.0).value(), Some(0.0));
    }
}
