//! # Symbolic Engine Module
//!
//! Expression tree used by the grapher to represent the formulas typed by the user.
//! A formula is parsed once (see `parse_expr`) into an [`Expr`], then evaluated at every
//! grid point and, for the critical point scan, differentiated analytically.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - the free variable of the formula, normally "x"
//! - **Constants**: `Const(f64)` - numerical constants (pi and e are folded into constants)
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow`
//! - **Functions**: `Exp`, `Ln`, `sin`, `cos`, `tg`, `ctg`, `arcsin`, `arccos`, `arctg`, `arcctg`
//!
//! ### Key Methods
//! - `eval_at(var, value)` - checked evaluation, domain violations become [`EvalError`]
//! - `diff(var)` - analytical derivative (in `symbolic_engine_derivatives`)
//! - `simplify()` - constant folding and neutral element removal
//! - `free_variables()` - names of all variables found in the tree
//!
//! The `Display` output is fully parenthesized and is accepted back by the parser, so a
//! derivative can travel as a plain string through the evaluator boundary.

#![allow(non_camel_case_types)]

use std::f64::consts::PI;
use std::fmt;

/// Core symbolic expression enum representing a formula as an abstract syntax tree.
///
/// # Examples
/// ```rust, ignore
/// use RustedGrapher::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm, written `log(x)` in evaluator notation
    Ln(Box<Expr>),
    sin(Box<Expr>),
    cos(Box<Expr>),
    /// Tangent, mathematical notation 'tg'
    tg(Box<Expr>),
    /// Cotangent, mathematical notation 'ctg'
    ctg(Box<Expr>),
    arcsin(Box<Expr>),
    arccos(Box<Expr>),
    arctg(Box<Expr>),
    arcctg(Box<Expr>),
}

/// Failure of a single numeric evaluation.
///
/// These never reach the user: the sampler turns them into skipped points.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// function argument outside of its real domain (log of a negative number, asin(2), ...)
    DomainError { function: &'static str, argument: f64 },
    DivisionByZero,
    UnknownVariable(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvalError::DomainError { function, argument } => {
                write!(f, "{} is undefined for argument {}", function, argument)
            }
            EvalError::DivisionByZero => write!(f, "division by zero"),
            EvalError::UnknownVariable(name) => write!(f, "unknown variable '{}'", name),
        }
    }
}

impl std::error::Error for EvalError {}

/// Pretty printing in evaluator notation, re-parseable by `parse_expr`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Exp(expr) => write!(f, "exp({})", expr),
            Expr::Ln(expr) => write!(f, "log({})", expr),
            Expr::sin(expr) => write!(f, "sin({})", expr),
            Expr::cos(expr) => write!(f, "cos({})", expr),
            Expr::tg(expr) => write!(f, "tg({})", expr),
            Expr::ctg(expr) => write!(f, "ctg({})", expr),
            Expr::arcsin(expr) => write!(f, "arcsin({})", expr),
            Expr::arccos(expr) => write!(f, "arccos({})", expr),
            Expr::arctg(expr) => write!(f, "arctg({})", expr),
            Expr::arcctg(expr) => write!(f, "arcctg({})", expr),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(v) if *v == 0.0)
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Const(v) if *v == 1.0)
    }

    /// true if the variable occurs anywhere in the tree
    pub fn contains_var(&self, var: &str) -> bool {
        match self {
            Expr::Var(name) => name == var,
            Expr::Const(_) => false,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => lhs.contains_var(var) || rhs.contains_var(var),
            Expr::Exp(expr)
            | Expr::Ln(expr)
            | Expr::sin(expr)
            | Expr::cos(expr)
            | Expr::tg(expr)
            | Expr::ctg(expr)
            | Expr::arcsin(expr)
            | Expr::arccos(expr)
            | Expr::arctg(expr)
            | Expr::arcctg(expr) => expr.contains_var(var),
        }
    }

    /// Collects the names of all variables of the expression, sorted and deduplicated.
    pub fn free_variables(&self) -> Vec<String> {
        fn collect(expr: &Expr, acc: &mut Vec<String>) {
            match expr {
                Expr::Var(name) => acc.push(name.clone()),
                Expr::Const(_) => {}
                Expr::Add(lhs, rhs)
                | Expr::Sub(lhs, rhs)
                | Expr::Mul(lhs, rhs)
                | Expr::Div(lhs, rhs)
                | Expr::Pow(lhs, rhs) => {
                    collect(lhs, acc);
                    collect(rhs, acc);
                }
                Expr::Exp(inner)
                | Expr::Ln(inner)
                | Expr::sin(inner)
                | Expr::cos(inner)
                | Expr::tg(inner)
                | Expr::ctg(inner)
                | Expr::arcsin(inner)
                | Expr::arccos(inner)
                | Expr::arctg(inner)
                | Expr::arcctg(inner) => collect(inner, acc),
            }
        }
        let mut vars = Vec::new();
        collect(self, &mut vars);
        vars.sort();
        vars.dedup();
        vars
    }

    /// DIRECT EXPRESSION EVALUATION

    /// Evaluates the expression with `var` bound to `value`.
    ///
    /// Unlike plain `f64` arithmetic, arguments outside of a function's real domain and
    /// division by an exact zero are reported as [`EvalError`] instead of silently producing
    /// NaN. Results that are merely non-finite (`log(0)`, `0^-1`, overflow) are returned as is;
    /// the caller decides what to do with them.
    pub fn eval_at(&self, var: &str, value: f64) -> Result<f64, EvalError> {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Ok(value)
                } else {
                    Err(EvalError::UnknownVariable(name.clone()))
                }
            }
            Expr::Const(val) => Ok(*val),
            Expr::Add(lhs, rhs) => Ok(lhs.eval_at(var, value)? + rhs.eval_at(var, value)?),
            Expr::Sub(lhs, rhs) => Ok(lhs.eval_at(var, value)? - rhs.eval_at(var, value)?),
            Expr::Mul(lhs, rhs) => Ok(lhs.eval_at(var, value)? * rhs.eval_at(var, value)?),
            Expr::Div(lhs, rhs) => {
                let numerator = lhs.eval_at(var, value)?;
                let denominator = rhs.eval_at(var, value)?;
                if denominator == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(numerator / denominator)
            }
            Expr::Pow(base, exp) => {
                let base_val = base.eval_at(var, value)?;
                let exp_val = exp.eval_at(var, value)?;
                if base_val < 0.0 && exp_val.fract() != 0.0 {
                    return Err(EvalError::DomainError {
                        function: "pow",
                        argument: base_val,
                    });
                }
                Ok(base_val.powf(exp_val))
            }
            Expr::Exp(expr) => Ok(expr.eval_at(var, value)?.exp()),
            Expr::Ln(expr) => {
                let arg = expr.eval_at(var, value)?;
                if arg < 0.0 {
                    return Err(EvalError::DomainError {
                        function: "log",
                        argument: arg,
                    });
                }
                Ok(arg.ln())
            }
            Expr::sin(expr) => Ok(expr.eval_at(var, value)?.sin()),
            Expr::cos(expr) => Ok(expr.eval_at(var, value)?.cos()),
            Expr::tg(expr) => Ok(expr.eval_at(var, value)?.tan()),
            Expr::ctg(expr) => {
                let tan = expr.eval_at(var, value)?.tan();
                if tan == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(1.0 / tan)
            }
            Expr::arcsin(expr) => {
                let arg = expr.eval_at(var, value)?;
                if !(-1.0..=1.0).contains(&arg) {
                    return Err(EvalError::DomainError {
                        function: "arcsin",
                        argument: arg,
                    });
                }
                Ok(arg.asin())
            }
            Expr::arccos(expr) => {
                let arg = expr.eval_at(var, value)?;
                if !(-1.0..=1.0).contains(&arg) {
                    return Err(EvalError::DomainError {
                        function: "arccos",
                        argument: arg,
                    });
                }
                Ok(arg.acos())
            }
            Expr::arctg(expr) => Ok(expr.eval_at(var, value)?.atan()),
            Expr::arcctg(expr) => Ok(PI / 2.0 - expr.eval_at(var, value)?.atan()),
        }
    } // end of eval_at
}
