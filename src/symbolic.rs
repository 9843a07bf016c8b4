/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedGrapher::symbolic::parse_expr::parse_expression;
/// let parsed_expression = parse_expression("x^2 + log(x)").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// 1) expression tree, checked evaluation at a point
/// 2) analytical derivatives and simplification
/// 3) turns a symbolic expression into a re-parseable string
///# Example#
/// ```
/// use RustedGrapher::symbolic::parse_expr::parse_expression;
/// let f = parse_expression("x^3 - 3*x").unwrap();
/// let df_dx = f.diff("x").simplify();
/// println!("df_dx = {}", df_dx);
/// assert_eq!(df_dx.eval_at("x", 1.0).unwrap(), 0.0);
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
#[cfg(test)]
mod symbolic_engine_tests;
///________________________________________________________________________________________________________________________________________________
/// evaluator capability: parse, validate, evaluate and differentiate formulas
/// Example#
/// ```
/// use RustedGrapher::symbolic::evaluator::{Evaluator, SymbolicEvaluator};
/// let evaluator = SymbolicEvaluator::default();
/// let parsed = evaluator.parse("sin(x)").unwrap();
/// let value = evaluator.evaluate(&parsed, 0.0).unwrap();
/// assert_eq!(value, 0.0);
/// let derivative = evaluator.differentiate("sin(x)", "x").unwrap();
/// assert_eq!(derivative, "cos(x)");
/// ```
pub mod evaluator;
