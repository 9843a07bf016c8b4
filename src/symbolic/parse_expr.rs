/// a module turns a String expression into a symbolic expression
///# Example
/// ```
/// use RustedGrapher::symbolic::parse_expr::parse_expression;
/// let parsed = parse_expression("x^2 + sin(2x)").unwrap();
/// assert_eq!(parsed.eval_at("x", 0.0).unwrap(), 0.0);
/// ```
//  grammar (lowest precedence first)
//      expression := term (('+' | '-') term)*
//      term       := unary (('*' | '/') unary | implicit_factor)*
//      unary      := ('-' | '+') unary | power
//      power      := atom (('^' | '**') unary)?        right associative
//      atom       := number | '(' expression ')' | name '(' expression ')' | name
//  implicit multiplication is accepted between a factor and a following name or bracket:
//  "2x", "3(x+1)", "x sin(x)"
use crate::symbolic::symbolic_engine::Expr;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit0, digit1, multispace0, one_of},
    combinator::{all_consuming, map_res, opt, recognize},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{delimited, pair, preceded},
};
use std::f64::consts::{E, PI};
use std::fmt;

/// Why a formula could not be turned into an expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseExprError {
    Empty,
    UnknownFunction(String),
    /// unexpected input, `position` is a character offset into the trimmed formula
    Syntax { position: usize, near: String },
}

impl fmt::Display for ParseExprError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseExprError::Empty => write!(f, "empty expression"),
            ParseExprError::UnknownFunction(name) => write!(f, "unknown function '{}'", name),
            ParseExprError::Syntax { position, near } => {
                if near.is_empty() {
                    write!(f, "unexpected end of expression at position {}", position)
                } else {
                    write!(f, "unexpected '{}' at position {}", near, position)
                }
            }
        }
    }
}

impl std::error::Error for ParseExprError {}

/// maps a function name to the expression node it builds; `None` for unknown names
fn function_from_name(name: &str, arg: Expr) -> Option<Expr> {
    let arg = Box::new(arg);
    let expr = match name {
        "exp" => Expr::Exp(arg),
        // natural logarithm, evaluator notation
        "log" => Expr::Ln(arg),
        "sqrt" => Expr::Pow(arg, Box::new(Expr::Const(0.5))),
        "sin" => Expr::sin(arg),
        "cos" => Expr::cos(arg),
        "tg" | "tan" => Expr::tg(arg),
        "ctg" | "cot" => Expr::ctg(arg),
        "arcsin" | "asin" => Expr::arcsin(arg),
        "arccos" | "acos" => Expr::arccos(arg),
        "arctg" | "arctan" | "atan" => Expr::arctg(arg),
        "arcctg" | "arccot" | "acot" => Expr::arcctg(arg),
        _ => return None,
    };
    Some(expr)
}

fn ws<'a, O, P>(inner: P) -> impl Parser<&'a str, Output = O, Error = Error<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

/// decimal number with optional fraction and exponent: 2, 2.5, .5, 1e-3
fn number(input: &str) -> IResult<&str, Expr> {
    let mantissa = alt((
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        recognize(pair(char('.'), digit1)),
    ));
    let exponent = opt((one_of("eE"), opt(one_of("+-")), digit1));
    map_res(recognize(pair(mantissa, exponent)), |s: &str| {
        s.parse::<f64>().map(Expr::Const)
    })
    .parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(alpha1, many0(alt((alphanumeric1, tag("_")))))).parse(input)
}

/// function call `name(expr)` or a bare name (variable or named constant)
fn call_or_symbol(input: &str) -> IResult<&str, Expr> {
    let (rest, name) = identifier(input)?;
    let (after_ws, _) = multispace0(rest)?;
    if let Ok((after_bracket, _)) = char::<&str, Error<&str>>('(').parse(after_ws) {
        let (rest, arg) = expression(after_bracket)?;
        let (rest, _) = preceded(multispace0, char(')')).parse(rest)?;
        return match function_from_name(name, arg) {
            Some(expr) => Ok((rest, expr)),
            // cut: there is no other reading of `name(...)`
            None => Err(nom::Err::Failure(Error::new(input, ErrorKind::Verify))),
        };
    }
    let expr = match name {
        "pi" => Expr::Const(PI),
        "e" => Expr::Const(E),
        _ => Expr::Var(name.to_string()),
    };
    Ok((rest, expr))
}

fn parenthesized(input: &str) -> IResult<&str, Expr> {
    delimited(char('('), expression, preceded(multispace0, char(')'))).parse(input)
}

fn atom(input: &str) -> IResult<&str, Expr> {
    preceded(multispace0, alt((number, parenthesized, call_or_symbol))).parse(input)
}

fn power(input: &str) -> IResult<&str, Expr> {
    let (rest, base) = atom(input)?;
    let (rest, exponent) = opt(preceded(ws(alt((tag("**"), tag("^")))), unary)).parse(rest)?;
    match exponent {
        Some(exponent) => Ok((rest, base.pow(exponent))),
        None => Ok((rest, base)),
    }
}

fn unary(input: &str) -> IResult<&str, Expr> {
    let (rest, _) = multispace0(input)?;
    if let Ok((after, sign)) = one_of::<&str, &str, Error<&str>>("+-").parse(rest) {
        let (after, operand) = unary(after)?;
        let expr = match (sign, operand) {
            ('-', Expr::Const(v)) => Expr::Const(-v),
            ('-', other) => -other,
            (_, other) => other,
        };
        return Ok((after, expr));
    }
    power(rest)
}

fn term(input: &str) -> IResult<&str, Expr> {
    let (mut rest, mut acc) = unary(input)?;
    loop {
        if let Ok((after, op)) = ws(one_of::<&str, &str, Error<&str>>("*/")).parse(rest) {
            // "**" belongs to power, which has already consumed it when valid
            let (after, rhs) = unary(after)?;
            acc = if op == '*' { acc * rhs } else { acc / rhs };
            rest = after;
            continue;
        }
        let (peek, _) = multispace0(rest)?;
        match peek.chars().next() {
            Some(c) if c.is_alphabetic() || c == '(' => {
                let (after, rhs) = power(peek)?;
                acc = acc * rhs;
                rest = after;
            }
            _ => break,
        }
    }
    Ok((rest, acc))
}

fn expression(input: &str) -> IResult<&str, Expr> {
    let (mut rest, mut acc) = term(input)?;
    loop {
        match ws(one_of::<&str, &str, Error<&str>>("+-")).parse(rest) {
            Ok((after, op)) => {
                let (after, rhs) = term(after)?;
                acc = if op == '+' { acc + rhs } else { acc - rhs };
                rest = after;
            }
            Err(_) => break,
        }
    }
    Ok((rest, acc))
}

/// Parses a formula into an expression tree.
///
/// The whole input must be consumed; trailing garbage is a syntax error.
pub fn parse_expression(input: &str) -> Result<Expr, ParseExprError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseExprError::Empty);
    }
    match all_consuming(ws(expression)).parse(trimmed) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let position = trimmed.chars().count() - e.input.chars().count();
            if e.code == ErrorKind::Verify {
                if let Ok((_, name)) = identifier(e.input) {
                    return Err(ParseExprError::UnknownFunction(name.to_string()));
                }
            }
            Err(ParseExprError::Syntax {
                position,
                near: e.input.chars().take(8).collect(),
            })
        }
        Err(nom::Err::Incomplete(_)) => Err(ParseExprError::Syntax {
            position: trimmed.chars().count(),
            near: String::new(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn eval(input: &str, x: f64) -> f64 {
        parse_expression(input).unwrap().eval_at("x", x).unwrap()
    }

    #[test]
    fn test_precedence() {
        assert_relative_eq!(eval("1 + 2 * 3", 0.0), 7.0);
        assert_relative_eq!(eval("(1 + 2) * 3", 0.0), 9.0);
        assert_relative_eq!(eval("10 - 4 - 3", 0.0), 3.0);
        assert_relative_eq!(eval("8 / 4 / 2", 0.0), 1.0);
        assert_relative_eq!(eval("2^3^2", 0.0), 512.0);
        assert_relative_eq!(eval("2**3", 0.0), 8.0);
    }

    #[test]
    fn test_unary_minus() {
        assert_relative_eq!(eval("-x^2", 3.0), -9.0);
        assert_relative_eq!(eval("2^-1", 0.0), 0.5);
        assert_relative_eq!(eval("-(x+1)", 1.0), -2.0);
        assert_relative_eq!(eval("3 - -x", 2.0), 5.0);
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_relative_eq!(eval("2x", 4.0), 8.0);
        assert_relative_eq!(eval("3(x+1)", 1.0), 6.0);
        assert_relative_eq!(eval("2 pi", 0.0), 2.0 * PI);
    }

    #[test]
    fn test_functions_and_constants() {
        assert_relative_eq!(eval("sin(pi/2)", 0.0), 1.0);
        assert_relative_eq!(eval("log(e)", 0.0), 1.0);
        assert_relative_eq!(eval("sqrt(x)", 9.0), 3.0);
        assert_relative_eq!(eval("tan(x) - tg(x)", 0.3), 0.0);
        assert_relative_eq!(eval("exp( x )", 0.0), 1.0);
        assert_relative_eq!(eval("1.5e2 + .5", 0.0), 150.5);
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_expression("   "), Err(ParseExprError::Empty));
        assert_eq!(
            parse_expression("foo(x)"),
            Err(ParseExprError::UnknownFunction("foo".to_string()))
        );
        assert!(matches!(
            parse_expression("x +"),
            Err(ParseExprError::Syntax { .. })
        ));
        assert!(matches!(
            parse_expression("(x + 1"),
            Err(ParseExprError::Syntax { .. })
        ));
        assert!(matches!(
            parse_expression("x + 1)"),
            Err(ParseExprError::Syntax { .. })
        ));
    }

    #[test]
    fn test_display_is_reparseable() {
        let expr = parse_expression("x^2*sin(x) - log(x)/3").unwrap();
        let reparsed = parse_expression(&expr.to_string()).unwrap();
        assert_eq!(expr, reparsed);
    }
}
