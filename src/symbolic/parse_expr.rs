//! Turns expression text into an `Expr`.
//!
//! Recursive descent built from `nom` combinators. Grammar, loosest binding first:
//!
//! ```text
//! expression = term (("+" | "-") term)*
//! term       = unary (("*" | "/") unary)*
//! unary      = "-" unary | "+" unary | power
//! power      = atom ("^" unary)?            right associative, binds tighter than unary minus
//! atom       = number | "(" expression ")" | "|" expression "|" | function argument | name
//! argument   = "(" expression ")" | "|" expression "|"
//! ```
//!
//! `pi`, `e` and `inf`/`infinity` are constants, `e^u` becomes `exp(u)`, `log` is the
//! natural logarithm. There is no implicit multiplication: `2x` is rejected.
use crate::errors::ParseError;
use crate::symbolic::symbolic_engine::{Expr, Func};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit0, digit1, multispace0, one_of},
    combinator::{all_consuming, cut, map, opt, recognize},
    error::ErrorKind,
    multi::many0,
    sequence::{delimited, pair, preceded},
};
use std::f64::consts::{E, PI};

/// nom error carrying an optional human readable message
#[derive(Debug, Clone, PartialEq)]
struct ExprError<'a> {
    input: &'a str,
    message: Option<String>,
}

impl<'a> ExprError<'a> {
    fn with_message(input: &'a str, message: String) -> Self {
        ExprError {
            input,
            message: Some(message),
        }
    }
}

impl<'a> nom::error::ParseError<&'a str> for ExprError<'a> {
    fn from_error_kind(input: &'a str, _kind: ErrorKind) -> Self {
        ExprError {
            input,
            message: None,
        }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

type PResult<'a, O> = IResult<&'a str, O, ExprError<'a>>;

fn ws<'a, O, P>(inner: P) -> impl Parser<&'a str, Output = O, Error = ExprError<'a>>
where
    P: Parser<&'a str, Output = O, Error = ExprError<'a>>,
{
    delimited(multispace0, inner, multispace0)
}

/// Consumes `c` or fails without backtracking.
fn closing<'a>(c: char) -> impl FnMut(&'a str) -> PResult<'a, char> {
    move |input: &'a str| {
        let parsed: PResult<'a, char> = ws(char(c)).parse(input);
        match parsed {
            Ok(ok) => Ok(ok),
            Err(_) => Err(nom::Err::Failure(ExprError::with_message(
                input.trim_start(),
                format!("expected '{}'", c),
            ))),
        }
    }
}

/// digits with optional fraction and exponent, no sign
fn float_text(input: &str) -> PResult<'_, &str> {
    let mantissa = alt((
        recognize((digit1, opt((char('.'), digit0)))),
        recognize((char('.'), digit1)),
    ));
    let exponent = opt((one_of("eE"), opt(one_of("+-")), digit1));
    recognize((mantissa, exponent)).parse(input)
}

fn number(input: &str) -> PResult<'_, Expr> {
    let (rest, text) = float_text(input)?;
    match text.parse::<f64>() {
        Ok(val) => Ok((rest, Expr::Const(val))),
        Err(_) => Err(nom::Err::Failure(ExprError::with_message(
            input,
            format!("malformed number '{}'", text),
        ))),
    }
}

fn identifier(input: &str) -> PResult<'_, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

fn parenthesized(input: &str) -> PResult<'_, Expr> {
    let (input, inner) = preceded(char('('), cut(expression)).parse(input)?;
    let (input, _) = closing(')')(input)?;
    Ok((input, inner))
}

fn absolute(input: &str) -> PResult<'_, Expr> {
    let (input, inner) = preceded(char('|'), cut(expression)).parse(input)?;
    let (input, _) = closing('|')(input)?;
    Ok((input, Expr::abs(inner.boxed())))
}

/// A function application, a named constant or a variable.
fn name_or_call(input: &str) -> PResult<'_, Expr> {
    let (rest, name) = identifier(input)?;
    let after_ws = rest.trim_start();
    let opens_argument = after_ws.starts_with('(') || after_ws.starts_with('|');
    if let Some(func) = Func::from_name(name) {
        if !opens_argument {
            return Err(nom::Err::Failure(ExprError::with_message(
                input,
                format!("function '{}' needs a parenthesised argument", name),
            )));
        }
        // ln|x| applies the function to abs(x)
        let (rest, arg) = alt((parenthesized, absolute)).parse(after_ws)?;
        return Ok((rest, func.apply_to(arg)));
    }
    if after_ws.starts_with('(') {
        return Err(nom::Err::Failure(ExprError::with_message(
            input,
            format!("unknown function '{}'", name),
        )));
    }
    let expr = match name {
        "pi" => Expr::Const(PI),
        "e" => Expr::Const(E),
        "inf" | "infinity" => Expr::Const(f64::INFINITY),
        _ => Expr::Var(name.to_string()),
    };
    Ok((rest, expr))
}

fn atom(input: &str) -> PResult<'_, Expr> {
    let input = input.trim_start();
    alt((number, parenthesized, absolute, name_or_call)).parse(input)
}

fn power(input: &str) -> PResult<'_, Expr> {
    let (input, base) = atom(input)?;
    let (input, exponent) = opt(preceded(ws(char('^')), cut(unary))).parse(input)?;
    let expr = match exponent {
        None => base,
        Some(exponent) if base == Expr::Const(E) => exponent.exp(),
        Some(exponent) => base.pow(exponent),
    };
    Ok((input, expr))
}

fn unary(input: &str) -> PResult<'_, Expr> {
    alt((
        map(preceded(ws(char('-')), cut(unary)), |e| -e),
        preceded(ws(char('+')), cut(unary)),
        power,
    ))
    .parse(input)
}

fn term(input: &str) -> PResult<'_, Expr> {
    let (input, first) = unary(input)?;
    let (input, rest) = many0(pair(ws(one_of("*/")), cut(unary))).parse(input)?;
    let expr = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        '*' => acc * rhs,
        _ => acc / rhs,
    });
    Ok((input, expr))
}

fn expression(input: &str) -> PResult<'_, Expr> {
    let (input, first) = term(input)?;
    let (input, rest) = many0(pair(ws(one_of("+-")), cut(term))).parse(input)?;
    let expr = rest.into_iter().fold(first, |acc, (op, rhs)| match op {
        '+' => acc + rhs,
        _ => acc - rhs,
    });
    Ok((input, expr))
}

fn describe_unexpected(rest: &str) -> String {
    match rest.trim_start().chars().next() {
        Some(c) => format!("unexpected '{}'", c),
        None => "unexpected end of input".to_string(),
    }
}

/// Parses `input` into an expression tree.
pub fn parse_expression_func(input: &str) -> Result<Expr, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::new("empty expression", 0));
    }
    match all_consuming(ws(expression)).parse(input) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => {
            let rest = err.input.trim_start();
            let position = input.len() - rest.len();
            let message = err.message.unwrap_or_else(|| describe_unexpected(rest));
            Err(ParseError::new(message, position))
        }
        Err(nom::Err::Incomplete(_)) => Err(ParseError::new(
            "unexpected end of input",
            input.len(),
        )),
    }
}

impl Expr {
    /// ```
    /// use RustedIntegral::symbolic::symbolic_engine::Expr;
    /// let expr = Expr::parse_expression("3*x^2 + 2*x").unwrap();
    /// assert_eq!(expr.to_string(), "3 * x^2 + 2 * x");
    /// ```
    pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
        parse_expression_func(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::var("x")
    }
    fn c(val: f64) -> Expr {
        Expr::Const(val)
    }

    #[test]
    fn test_parse_constant() {
        assert_eq!(parse_expression_func("42").unwrap(), c(42.0));
        assert_eq!(parse_expression_func("1.5e-3").unwrap(), c(1.5e-3));
        assert_eq!(parse_expression_func(".5").unwrap(), c(0.5));
        assert_eq!(parse_expression_func("2E+2").unwrap(), c(200.0));
    }

    #[test]
    fn test_parse_variable() {
        assert_eq!(parse_expression_func("x").unwrap(), x());
        assert_eq!(parse_expression_func("  t_1 ").unwrap(), Expr::var("t_1"));
    }

    #[test]
    fn test_parse_named_constants() {
        assert_eq!(parse_expression_func("pi").unwrap(), c(PI));
        assert_eq!(parse_expression_func("e").unwrap(), c(E));
        assert_eq!(parse_expression_func("inf").unwrap(), c(f64::INFINITY));
    }

    #[test]
    fn test_parse_precedence() {
        let expr = parse_expression_func("1 + 2 * x").unwrap();
        assert_eq!(expr, c(1.0) + c(2.0) * x());
        let expr = parse_expression_func("x - 1 - 2").unwrap();
        assert_eq!(expr, (x() - c(1.0)) - c(2.0));
        let expr = parse_expression_func("x / 2 / 3").unwrap();
        assert_eq!(expr, (x() / c(2.0)) / c(3.0));
        let expr = parse_expression_func("(1 + x) * 2").unwrap();
        assert_eq!(expr, (c(1.0) + x()) * c(2.0));
    }

    #[test]
    fn test_parse_power_is_right_associative() {
        let expr = parse_expression_func("x^2^3").unwrap();
        assert_eq!(expr, x().pow(c(2.0).pow(c(3.0))));
    }

    #[test]
    fn test_parse_unary_minus() {
        // -x^2 is -(x^2)
        let expr = parse_expression_func("-x^2").unwrap();
        assert_eq!(expr, -(x().pow(c(2.0))));
        let expr = parse_expression_func("x^-1").unwrap();
        assert_eq!(expr, x().pow(c(-1.0)));
        let expr = parse_expression_func("2 * -x").unwrap();
        assert_eq!(expr, c(2.0) * -x());
        assert_eq!(parse_expression_func("-3").unwrap(), c(-3.0));
    }

    #[test]
    fn test_parse_functions() {
        let expr = parse_expression_func("sin(x) + log(x)").unwrap();
        assert_eq!(expr, Expr::sin(x().boxed()) + Expr::Ln(x().boxed()));
        let expr = parse_expression_func("arctan(x)").unwrap();
        assert_eq!(expr, Expr::arctg(x().boxed()));
        let expr = parse_expression_func("tg(2*x)").unwrap();
        assert_eq!(expr, Expr::tg((c(2.0) * x()).boxed()));
        let expr = parse_expression_func("sqrt(1 - x^2)").unwrap();
        assert_eq!(expr, Expr::sqrt((c(1.0) - x().pow(c(2.0))).boxed()));
    }

    #[test]
    fn test_parse_e_power_is_exp() {
        let expr = parse_expression_func("e^x").unwrap();
        assert_eq!(expr, x().exp());
        let expr = parse_expression_func("e^(-x^2)").unwrap();
        assert_eq!(expr, (-(x().pow(c(2.0)))).exp());
        // e alone stays a constant
        let expr = parse_expression_func("2*e").unwrap();
        assert_eq!(expr, c(2.0) * c(E));
    }

    #[test]
    fn test_parse_absolute_value() {
        let expr = parse_expression_func("|x - 1|").unwrap();
        assert_eq!(expr, Expr::abs((x() - c(1.0)).boxed()));
        let expr = parse_expression_func("ln|x|").unwrap();
        assert_eq!(expr, Expr::Ln(Expr::abs(x().boxed()).boxed()));
        let expr = parse_expression_func("|x| * |x|").unwrap();
        assert_eq!(expr, Expr::abs(x().boxed()) * Expr::abs(x().boxed()));
    }

    #[test]
    fn test_display_parses_back() {
        for text in [
            "3*x^2 + 2*x",
            "-ln|cos(x)|",
            "1/(1 + x^2)",
            "x - (x - 1)",
            "(-x)^2",
            "exp(-x^2)",
            "2^x / ln(2)",
            "x^(-1)",
        ] {
            let expr = parse_expression_func(text).unwrap();
            let again = parse_expression_func(&expr.to_string()).unwrap();
            assert_eq!(expr, again, "{}", text);
        }
    }

    #[test]
    fn test_parse_errors() {
        let err = parse_expression_func("").unwrap_err();
        assert_eq!(err.message, "empty expression");

        let err = parse_expression_func("x +").unwrap_err();
        assert_eq!(err.message, "unexpected end of input");
        assert_eq!(err.position, 3);

        let err = parse_expression_func("(x + 1").unwrap_err();
        assert_eq!(err.message, "expected ')'");
        assert_eq!(err.position, 6);

        let err = parse_expression_func("x + 1)").unwrap_err();
        assert_eq!(err.message, "unexpected ')'");
        assert_eq!(err.position, 5);

        let err = parse_expression_func("foo(x)").unwrap_err();
        assert_eq!(err.message, "unknown function 'foo'");
        assert_eq!(err.position, 0);

        let err = parse_expression_func("1 + sin x").unwrap_err();
        assert_eq!(err.message, "function 'sin' needs a parenthesised argument");
        assert_eq!(err.position, 4);

        assert!(parse_expression_func("2x").is_err());
        assert!(parse_expression_func("x ** 2").is_err());
        assert!(parse_expression_func("x # 2").is_err());
    }
}
