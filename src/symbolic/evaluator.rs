//! Evaluator capability used by the sampler and the critical point scanner.
//!
//! The plotting code never touches the expression tree directly: it asks an [`Evaluator`] to
//! parse a formula once, evaluate the parsed form at a point and differentiate a formula
//! into a new formula string. [`SymbolicEvaluator`] is the implementation backed by the
//! symbolic engine of this crate.
use crate::symbolic::parse_expr::{ParseExprError, parse_expression};
use crate::symbolic::symbolic_engine::{EvalError, Expr};
use log::debug;
use std::fmt;

/// A formula that cannot be plotted at all. Shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaError {
    /// nothing was typed
    Empty,
    Parse { formula: String, reason: String },
    Differentiate { formula: String, reason: String },
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FormulaError::Empty => write!(f, "Error: a function must be entered"),
            FormulaError::Parse { formula, reason } => {
                write!(f, "Error: cannot parse '{}': {}", formula, reason)
            }
            FormulaError::Differentiate { formula, reason } => {
                write!(f, "Error: cannot differentiate '{}': {}", formula, reason)
            }
        }
    }
}

impl std::error::Error for FormulaError {}

/// Trait for the external expression evaluation capability
pub trait Evaluator {
    /// parsed, ready to evaluate form of a formula
    type Parsed;

    /// Parse a formula; fails with [`FormulaError`] if the evaluator does not accept it
    fn parse(&self, formula: &str) -> Result<Self::Parsed, FormulaError>;

    /// Check a formula without keeping the parsed form
    fn validate(&self, formula: &str) -> Result<(), FormulaError> {
        self.parse(formula).map(|_| ())
    }

    /// Evaluate a parsed formula at a point of the free variable
    fn evaluate(&self, parsed: &Self::Parsed, x: f64) -> Result<f64, EvalError>;

    /// Symbolic derivative of `formula` with respect to `var`, returned as a formula string
    fn differentiate(&self, formula: &str, var: &str) -> Result<String, FormulaError>;
}

/// Evaluator backed by the crate's own symbolic engine.
///
/// Formulas must be functions of a single variable (`x` by default): any other free
/// variable makes the formula invalid instead of failing at every point later on.
#[derive(Debug, Clone)]
pub struct SymbolicEvaluator {
    variable: String,
}

impl Default for SymbolicEvaluator {
    fn default() -> Self {
        Self::new("x")
    }
}

impl SymbolicEvaluator {
    pub fn new(variable: &str) -> Self {
        Self {
            variable: variable.to_string(),
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    fn parse_checked(&self, formula: &str) -> Result<Expr, ParseExprError> {
        let expr = parse_expression(formula)?;
        if let Some(unknown) = expr
            .free_variables()
            .into_iter()
            .find(|name| name != &self.variable)
        {
            return Err(ParseExprError::Syntax {
                position: formula.find(unknown.as_str()).unwrap_or(0),
                near: unknown,
            });
        }
        Ok(expr)
    }
}

impl Evaluator for SymbolicEvaluator {
    type Parsed = Expr;

    fn parse(&self, formula: &str) -> Result<Expr, FormulaError> {
        self.parse_checked(formula).map_err(|e| match e {
            ParseExprError::Empty => FormulaError::Empty,
            other => FormulaError::Parse {
                formula: formula.trim().to_string(),
                reason: other.to_string(),
            },
        })
    }

    fn evaluate(&self, parsed: &Expr, x: f64) -> Result<f64, EvalError> {
        parsed.eval_at(&self.variable, x)
    }

    fn differentiate(&self, formula: &str, var: &str) -> Result<String, FormulaError> {
        let expr = self
            .parse_checked(formula)
            .map_err(|e| FormulaError::Differentiate {
                formula: formula.trim().to_string(),
                reason: e.to_string(),
            })?;
        let derivative = expr.diff(var).simplify();
        debug!("d/d{} {} = {}", var, expr, derivative);
        Ok(derivative.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_foreign_variables() {
        let evaluator = SymbolicEvaluator::default();
        assert!(evaluator.validate("x^2 + 1").is_ok());
        assert!(matches!(
            evaluator.validate("x + y"),
            Err(FormulaError::Parse { .. })
        ));
        assert_eq!(evaluator.validate(""), Err(FormulaError::Empty));
    }

    #[test]
    fn test_differentiate_returns_parseable_formula() {
        let evaluator = SymbolicEvaluator::default();
        let derivative = evaluator.differentiate("x^2", "x").unwrap();
        assert_eq!(derivative, "(2 * x)");
        let parsed = evaluator.parse(&derivative).unwrap();
        assert_relative_eq!(evaluator.evaluate(&parsed, 1.5).unwrap(), 3.0);
    }

    #[test]
    fn test_differentiate_invalid_formula() {
        let evaluator = SymbolicEvaluator::default();
        assert!(matches!(
            evaluator.differentiate("sin(", "x"),
            Err(FormulaError::Differentiate { .. })
        ));
    }

    #[test]
    fn test_custom_variable() {
        let evaluator = SymbolicEvaluator::new("t");
        let parsed = evaluator.parse("t^3").unwrap();
        assert_relative_eq!(evaluator.evaluate(&parsed, 2.0).unwrap(), 8.0);
        assert!(evaluator.validate("x").is_err());
    }
}
