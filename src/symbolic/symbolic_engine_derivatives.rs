//! # Symbolic Engine Derivatives Module
//!
//! Analytical differentiation and algebraic simplification of [`Expr`] trees.
//!
//! ## Key Methods
//! - `diff(var)` - analytical derivative using product, quotient, power and chain rules
//! - `simplify()` - constant folding and removal of neutral elements, applied to derivatives
//!   so that `d/dx x^2` reads `(2 * x)` instead of `((2 * (x ^ (2 - 1))) * 1)`
//! - `n_th_derivative1D(var, n)` - repeated differentiation

use crate::symbolic::symbolic_engine::Expr;

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// - Power rule: d/dx(u^n) = n*u^(n-1)*u' when the exponent does not depend on `var`
    /// - Exponential rule: d/dx(a^v) = a^v*ln(a)*v' when only the exponent depends on `var`
    /// - General power: d/dx(u^v) = u^v*(v'*ln(u) + v*u'/u)
    /// - Product rule: d/dx(f*g) = f'*g + f*g'
    /// - Quotient rule: d/dx(f/g) = (f'*g - g'*f)/g^2
    /// - Chain rule for every elementary function
    ///
    /// # Examples
    /// ```rust, ignore
    /// let f = Expr::var("x").pow(Expr::Const(2.0)); // x^2
    /// let df_dx = f.diff("x").simplify(); // 2*x
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(Box::new(rhs.diff(var)), lhs.clone())),
                )),
                Box::new(Expr::Pow(rhs.clone(), Box::new(Expr::Const(2.0)))),
            ),
            Expr::Pow(base, exp) => {
                if !exp.contains_var(var) {
                    Expr::Mul(
                        Box::new(Expr::Mul(
                            exp.clone(),
                            Box::new(Expr::Pow(
                                base.clone(),
                                Box::new(Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0)))),
                            )),
                        )),
                        Box::new(base.diff(var)),
                    )
                } else if !base.contains_var(var) {
                    Expr::Mul(
                        Box::new(Expr::Mul(
                            Box::new(self.clone()),
                            Box::new(Expr::Ln(base.clone())),
                        )),
                        Box::new(exp.diff(var)),
                    )
                } else {
                    Expr::Mul(
                        Box::new(self.clone()),
                        Box::new(Expr::Add(
                            Box::new(Expr::Mul(
                                Box::new(exp.diff(var)),
                                Box::new(Expr::Ln(base.clone())),
                            )),
                            Box::new(Expr::Div(
                                Box::new(Expr::Mul(exp.clone(), Box::new(base.diff(var)))),
                                base.clone(),
                            )),
                        )),
                    )
                }
            }
            Expr::Exp(expr) => {
                Expr::Mul(Box::new(Expr::Exp(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::Ln(expr) => Expr::Div(Box::new(expr.diff(var)), expr.clone()),
            Expr::sin(expr) => {
                Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::sin(expr.clone())),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::tg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(
                    Box::new(Expr::cos(expr.clone())),
                    Box::new(Expr::Const(2.0)),
                )),
            ),
            Expr::ctg(expr) => Expr::Div(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(expr.diff(var)),
                )),
                Box::new(Expr::Pow(
                    Box::new(Expr::sin(expr.clone())),
                    Box::new(Expr::Const(2.0)),
                )),
            ),
            Expr::arcsin(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arccos(expr) => Expr::Div(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(expr.diff(var)),
                )),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arctg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
            Expr::arcctg(expr) => Expr::Div(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(expr.diff(var)),
                )),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
        }
    } // end of diff

    /// Computes the nth derivative, simplifying after every step.
    pub fn n_th_derivative1D(&self, var_name: &str, n: usize) -> Expr {
        let mut expr = self.clone();
        for _ in 0..n {
            expr = expr.diff(var_name).simplify();
        }
        expr
    }

    //___________________________________SIMPLIFICATION____________________________________

    /// Bottom-up simplification: folds operations on constants and removes neutral elements.
    ///
    /// - `0 + a = a`, `a - 0 = a`, `a - a = 0`
    /// - `0 * a = 0`, `1 * a = a`, `0 / a = 0`, `a / 1 = a`
    /// - `a ^ 1 = a`, `a ^ 0 = 1`
    /// - functions of constants are evaluated
    ///
    /// Folding is skipped when the folded value would not be finite, so that the result
    /// still evaluates (and fails) the same way the original tree does.
    pub fn simplify(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => {
                let (l, r) = (lhs.simplify(), rhs.simplify());
                match (&l, &r) {
                    (Expr::Const(a), Expr::Const(b)) => fold(a + b, l.clone() + r.clone()),
                    _ if l.is_zero() => r,
                    _ if r.is_zero() => l,
                    _ => l + r,
                }
            }
            Expr::Sub(lhs, rhs) => {
                let (l, r) = (lhs.simplify(), rhs.simplify());
                match (&l, &r) {
                    (Expr::Const(a), Expr::Const(b)) => fold(a - b, l.clone() - r.clone()),
                    _ if r.is_zero() => l,
                    _ if l == r => Expr::Const(0.0),
                    _ if l.is_zero() => simplify_neg(r),
                    _ => l - r,
                }
            }
            Expr::Mul(lhs, rhs) => {
                let (l, r) = (lhs.simplify(), rhs.simplify());
                match (&l, &r) {
                    (Expr::Const(a), Expr::Const(b)) => fold(a * b, l.clone() * r.clone()),
                    _ if l.is_zero() || r.is_zero() => Expr::Const(0.0),
                    _ if l.is_one() => r,
                    _ if r.is_one() => l,
                    // keep constants on the left: x*2 -> 2*x
                    (_, Expr::Const(_)) => r * l,
                    // 2*(3*x) -> 6*x
                    (Expr::Const(a), Expr::Mul(inner_l, inner_r)) => match inner_l.as_ref() {
                        Expr::Const(b) => Expr::Const(a * b) * inner_r.as_ref().clone(),
                        _ => l.clone() * r.clone(),
                    },
                    _ => l * r,
                }
            }
            Expr::Div(lhs, rhs) => {
                let (l, r) = (lhs.simplify(), rhs.simplify());
                match (&l, &r) {
                    (Expr::Const(a), Expr::Const(b)) if *b != 0.0 => {
                        fold(a / b, l.clone() / r.clone())
                    }
                    _ if l.is_zero() && !r.is_zero() => Expr::Const(0.0),
                    _ if r.is_one() => l,
                    _ => l / r,
                }
            }
            Expr::Pow(base, exp) => {
                let (b, e) = (base.simplify(), exp.simplify());
                match (&b, &e) {
                    (Expr::Const(x), Expr::Const(y)) => fold(x.powf(*y), b.clone().pow(e.clone())),
                    _ if e.is_one() => b,
                    _ if e.is_zero() => Expr::Const(1.0),
                    _ => b.pow(e),
                }
            }
            Expr::Exp(expr) => fold_unary(expr, Expr::Exp, f64::exp),
            Expr::Ln(expr) => fold_unary(expr, Expr::Ln, f64::ln),
            Expr::sin(expr) => fold_unary(expr, Expr::sin, f64::sin),
            Expr::cos(expr) => fold_unary(expr, Expr::cos, f64::cos),
            Expr::tg(expr) => fold_unary(expr, Expr::tg, f64::tan),
            Expr::ctg(expr) => fold_unary(expr, Expr::ctg, |v| 1.0 / v.tan()),
            Expr::arcsin(expr) => fold_unary(expr, Expr::arcsin, f64::asin),
            Expr::arccos(expr) => fold_unary(expr, Expr::arccos, f64::acos),
            Expr::arctg(expr) => fold_unary(expr, Expr::arctg, f64::atan),
            Expr::arcctg(expr) => {
                fold_unary(expr, Expr::arcctg, |v| std::f64::consts::FRAC_PI_2 - v.atan())
            }
        }
    } // end of simplify
}

fn fold(value: f64, unfolded: Expr) -> Expr {
    if value.is_finite() {
        Expr::Const(value)
    } else {
        unfolded
    }
}

fn fold_unary(inner: &Expr, wrap: fn(Box<Expr>) -> Expr, op: fn(f64) -> f64) -> Expr {
    let inner = inner.simplify();
    match inner {
        Expr::Const(v) => fold(op(v), wrap(Box::new(Expr::Const(v)))),
        other => wrap(Box::new(other)),
    }
}

fn simplify_neg(expr: Expr) -> Expr {
    match expr {
        Expr::Const(v) => Expr::Const(-v),
        other => -other,
    }
}
