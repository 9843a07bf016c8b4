use crate::symbolic::parse_expr::parse_expression;
use crate::symbolic::symbolic_engine::{EvalError, Expr};
use std::f64;
//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    /// central difference, used to check analytical derivatives
    fn numerical_derivative(expr: &Expr, at: f64) -> f64 {
        let h = 1e-6;
        (expr.eval_at("x", at + h).unwrap() - expr.eval_at("x", at - h).unwrap()) / (2.0 * h)
    }

    #[test]
    fn test_neg() {
        let neg_expr = -x();
        let expected = Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(x()));
        assert_eq!(neg_expr, expected);
    }

    #[test]
    fn test_display() {
        let expr = (x() + Expr::Const(2.0)) * Expr::Ln(x().boxed());
        assert_eq!(expr.to_string(), "((x + 2) * log(x))");
    }

    #[test]
    fn test_diff_polynomial() {
        let f = x().pow(Expr::Const(2.0));
        assert_eq!(f.diff("x").simplify(), Expr::Const(2.0) * x());
        let f = parse_expression("3*x^3 - 2*x + 7").unwrap();
        let df = f.diff("x").simplify();
        assert_relative_eq!(df.eval_at("x", 2.0).unwrap(), 34.0);
    }

    #[test]
    fn test_diff_matches_numerical() {
        let cases = [
            "sin(x)*exp(x)",
            "log(x^2 + 1)",
            "x / (1 + x^2)",
            "tan(x)",
            "cot(x)",
            "arcsin(x/2)",
            "arccos(x/2)",
            "arctg(x)",
            "arcctg(x)",
            "2^x",
            "x^x",
            "sqrt(x)",
            "cos(3x)",
        ];
        for case in cases {
            let f = parse_expression(case).unwrap();
            let df = f.diff("x").simplify();
            for at in [0.3, 0.7, 1.1] {
                assert_relative_eq!(
                    df.eval_at("x", at).unwrap(),
                    numerical_derivative(&f, at),
                    epsilon = 1e-5
                );
            }
        }
    }

    #[test]
    fn test_diff_other_variable_is_constant() {
        let f = Expr::Var("a".to_string()) * x();
        assert_eq!(f.diff("a").simplify(), x());
        assert_eq!(f.diff("y").simplify(), Expr::Const(0.0));
    }

    #[test]
    fn test_second_derivative() {
        let f = parse_expression("x^3").unwrap();
        let d2 = f.n_th_derivative1D("x", 2);
        assert_relative_eq!(d2.eval_at("x", 2.0).unwrap(), 12.0);
    }

    #[test]
    fn test_simplify_rules() {
        assert_eq!((Expr::Const(0.0) + x()).simplify(), x());
        assert_eq!((x() * Expr::Const(1.0)).simplify(), x());
        assert_eq!((x() * Expr::Const(0.0)).simplify(), Expr::Const(0.0));
        assert_eq!((x() - x()).simplify(), Expr::Const(0.0));
        assert_eq!(x().pow(Expr::Const(1.0)).simplify(), x());
        assert_eq!(
            (Expr::Const(2.0) * (Expr::Const(3.0) * x())).simplify(),
            Expr::Const(6.0) * x()
        );
        assert_eq!(
            (x() * Expr::Const(4.0)).simplify(),
            Expr::Const(4.0) * x()
        );
        assert_eq!(
            Expr::sin(Box::new(Expr::Const(0.0))).simplify(),
            Expr::Const(0.0)
        );
    }

    #[test]
    fn test_simplify_keeps_non_finite_folding_unfolded() {
        let expr = Expr::Ln(Box::new(Expr::Const(0.0)));
        assert_eq!(expr.simplify(), expr);
        let expr = Expr::Const(1.0) / Expr::Const(0.0);
        assert_eq!(expr.simplify(), expr);
    }

    #[test]
    fn test_eval_errors() {
        let log = parse_expression("log(x)").unwrap();
        assert!(matches!(
            log.eval_at("x", -1.0),
            Err(EvalError::DomainError { function: "log", .. })
        ));
        assert_eq!(log.eval_at("x", 0.0).unwrap(), f64::NEG_INFINITY);

        let inv = parse_expression("1/x").unwrap();
        assert_eq!(inv.eval_at("x", 0.0), Err(EvalError::DivisionByZero));

        let asin = parse_expression("asin(x)").unwrap();
        assert!(asin.eval_at("x", 2.0).is_err());

        let root = parse_expression("sqrt(x)").unwrap();
        assert!(root.eval_at("x", -4.0).is_err());

        let cube = parse_expression("x^3").unwrap();
        assert_relative_eq!(cube.eval_at("x", -2.0).unwrap(), -8.0);

        let other = parse_expression("y + 1").unwrap();
        assert_eq!(
            other.eval_at("x", 1.0),
            Err(EvalError::UnknownVariable("y".to_string()))
        );
    }

    #[test]
    fn test_free_variables() {
        let expr = parse_expression("x*y + sin(x) + z").unwrap();
        assert_eq!(expr.free_variables(), vec!["x", "y", "z"]);
        assert!(expr.contains_var("y"));
        assert!(!expr.contains_var("w"));
    }
}
