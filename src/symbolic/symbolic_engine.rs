//! # Symbolic Engine Module
//!
//! The expression tree every other part of the crate works on.
//!
//! ## Purpose
//!
//! An `Expr` is an immutable formula in one (or, before validation, several) variables.
//! It is produced by the parser, evaluated pointwise by `symbolic_eval`, simplified,
//! differentiated, and matched against the antiderivative rules.
//!
//! ## Main Structures and Methods
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)`
//! - **Constants**: `Const(f64)`
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow`
//! - **Functions**: `Exp`, `Ln`, `sqrt`, `abs`, `sin`, `cos`, `tg`, `ctg`, the inverse
//!   trigonometric functions and `sinh`, `cosh`, `tanh`
//!
//! ### `Func` Enum
//! A flat, copyable tag for the one-argument functions. The parser maps names to it,
//! the evaluator applies it, `Display` prints it. `Expr::as_function` views a function
//! node as `(Func, &argument)` so that code which treats all functions alike does not
//! have to list every variant.
//!
//! ## Notes
//!
//! - Negation has no variant of its own: `-x` is `Mul(Const(-1), x)`.
//! - Mathematical names are kept for the variants (`tg`, `ctg`, `arctg`, `arcctg`),
//!   printing uses the common ones (`tan`, `cot`, `arctan`, `arccot`).
//! - `Display` inserts parentheses only where precedence needs them, so the printed
//!   text parses back into an equal tree.

#![allow(non_camel_case_types)]

use std::collections::BTreeSet;
use std::f64::consts::{E, PI};
use std::fmt;
use strum_macros::EnumIter;

/// Core symbolic expression enum: an abstract syntax tree over `f64`.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x", "t")
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
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    sqrt(Box<Expr>),
    abs(Box<Expr>),
    sin(Box<Expr>),
    cos(Box<Expr>),
    /// tangent
    tg(Box<Expr>),
    /// cotangent
    ctg(Box<Expr>),
    arcsin(Box<Expr>),
    arccos(Box<Expr>),
    /// arctangent
    arctg(Box<Expr>),
    /// arccotangent
    arcctg(Box<Expr>),
    sinh(Box<Expr>),
    cosh(Box<Expr>),
    tanh(Box<Expr>),
}

/// One-argument functions known to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum Func {
    Exp,
    Ln,
    Sqrt,
    Abs,
    Sin,
    Cos,
    Tg,
    Ctg,
    Arcsin,
    Arccos,
    Arctg,
    Arcctg,
    Sinh,
    Cosh,
    Tanh,
}

impl Func {
    /// name used when printing
    pub fn name(self) -> &'static str {
        match self {
            Func::Exp => "exp",
            Func::Ln => "ln",
            Func::Sqrt => "sqrt",
            Func::Abs => "abs",
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tg => "tan",
            Func::Ctg => "cot",
            Func::Arcsin => "arcsin",
            Func::Arccos => "arccos",
            Func::Arctg => "arctan",
            Func::Arcctg => "arccot",
            Func::Sinh => "sinh",
            Func::Cosh => "cosh",
            Func::Tanh => "tanh",
        }
    }

    /// Looks a function up by any of the names the parser accepts.
    /// `log` is the natural logarithm.
    pub fn from_name(name: &str) -> Option<Func> {
        let func = match name {
            "exp" => Func::Exp,
            "ln" | "log" => Func::Ln,
            "sqrt" => Func::Sqrt,
            "abs" => Func::Abs,
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" | "tg" => Func::Tg,
            "cot" | "ctg" => Func::Ctg,
            "asin" | "arcsin" => Func::Arcsin,
            "acos" | "arccos" => Func::Arccos,
            "atan" | "arctan" | "arctg" => Func::Arctg,
            "acot" | "arccot" | "arcctg" => Func::Arcctg,
            "sinh" => Func::Sinh,
            "cosh" => Func::Cosh,
            "tanh" => Func::Tanh,
            _ => return None,
        };
        Some(func)
    }

    /// Builds the expression node `self(arg)`.
    pub fn apply_to(self, arg: Expr) -> Expr {
        let arg = arg.boxed();
        match self {
            Func::Exp => Expr::Exp(arg),
            Func::Ln => Expr::Ln(arg),
            Func::Sqrt => Expr::sqrt(arg),
            Func::Abs => Expr::abs(arg),
            Func::Sin => Expr::sin(arg),
            Func::Cos => Expr::cos(arg),
            Func::Tg => Expr::tg(arg),
            Func::Ctg => Expr::ctg(arg),
            Func::Arcsin => Expr::arcsin(arg),
            Func::Arccos => Expr::arccos(arg),
            Func::Arctg => Expr::arctg(arg),
            Func::Arcctg => Expr::arcctg(arg),
            Func::Sinh => Expr::sinh(arg),
            Func::Cosh => Expr::cosh(arg),
            Func::Tanh => Expr::tanh(arg),
        }
    }
}

// precedence levels used by Display
const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_NEG: u8 = 3;
const PREC_POWER: u8 = 4;
const PREC_ATOM: u8 = 5;

fn format_const(val: f64) -> String {
    if val == PI {
        "pi".to_string()
    } else if val == E {
        "e".to_string()
    } else if val.is_infinite() {
        if val > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else {
        format!("{}", val)
    }
}

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(..) | Expr::Sub(..) => PREC_SUM,
            Expr::Mul(lhs, _) if lhs.is_minus_one() => PREC_NEG,
            Expr::Mul(..) | Expr::Div(..) => PREC_PRODUCT,
            Expr::Const(val) if val.is_sign_negative() => PREC_NEG,
            Expr::Pow(..) => PREC_POWER,
            _ => PREC_ATOM,
        }
    }

    /// Prints `self` as an operand of an operator with precedence `parent`.
    /// `strict` also wraps operands of equal precedence (right side of `-`, `/`, ...).
    fn operand(&self, parent: u8, strict: bool) -> String {
        let own = self.precedence();
        if own < parent || (strict && own == parent) {
            format!("({})", self)
        } else {
            format!("{}", self)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", format_const(*val)),
            Expr::Add(lhs, rhs) => write!(
                f,
                "{} + {}",
                lhs.operand(PREC_SUM, false),
                rhs.operand(PREC_SUM, false)
            ),
            Expr::Sub(lhs, rhs) => write!(
                f,
                "{} - {}",
                lhs.operand(PREC_SUM, false),
                rhs.operand(PREC_SUM, true)
            ),
            Expr::Mul(lhs, rhs) if lhs.is_minus_one() => {
                write!(f, "-{}", rhs.operand(PREC_NEG, true))
            }
            Expr::Mul(lhs, rhs) => write!(
                f,
                "{} * {}",
                lhs.operand(PREC_PRODUCT, false),
                rhs.operand(PREC_PRODUCT, true)
            ),
            Expr::Div(lhs, rhs) => write!(
                f,
                "{} / {}",
                lhs.operand(PREC_PRODUCT, false),
                rhs.operand(PREC_PRODUCT, true)
            ),
            Expr::Pow(base, exp) => write!(
                f,
                "{}^{}",
                base.operand(PREC_POWER, true),
                exp.operand(PREC_ATOM, false)
            ),
            Expr::abs(arg) => write!(f, "|{}|", arg),
            other => match other.as_function() {
                // ln|x| rather than ln(|x|)
                Some((func, arg)) if matches!(arg, Expr::abs(_)) => write!(f, "{}{}", func.name(), arg),
                Some((func, arg)) => write!(f, "{}({})", func.name(), arg),
                None => unreachable!("every remaining variant is a function node"),
            },
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
        match self {
            Expr::Const(val) => Expr::Const(-val),
            other => Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(other)),
        }
    }
}

impl Expr {
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Shorthand for `Expr::Var(name.to_string())`.
    pub fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 1.0)
    }

    pub fn is_minus_one(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == -1.0)
    }

    /// Views a one-argument function node as `(func, argument)`.
    pub fn as_function(&self) -> Option<(Func, &Expr)> {
        let pair = match self {
            Expr::Exp(arg) => (Func::Exp, arg),
            Expr::Ln(arg) => (Func::Ln, arg),
            Expr::sqrt(arg) => (Func::Sqrt, arg),
            Expr::abs(arg) => (Func::Abs, arg),
            Expr::sin(arg) => (Func::Sin, arg),
            Expr::cos(arg) => (Func::Cos, arg),
            Expr::tg(arg) => (Func::Tg, arg),
            Expr::ctg(arg) => (Func::Ctg, arg),
            Expr::arcsin(arg) => (Func::Arcsin, arg),
            Expr::arccos(arg) => (Func::Arccos, arg),
            Expr::arctg(arg) => (Func::Arctg, arg),
            Expr::arcctg(arg) => (Func::Arcctg, arg),
            Expr::sinh(arg) => (Func::Sinh, arg),
            Expr::cosh(arg) => (Func::Cosh, arg),
            Expr::tanh(arg) => (Func::Tanh, arg),
            _ => return None,
        };
        Some((pair.0, &**pair.1))
    }

    /// Checks if the expression depends on `var_name` anywhere in the tree.
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Const(_) => false,
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.contains_variable(var_name) || rhs.contains_variable(var_name)
            }
            other => other
                .as_function()
                .is_some_and(|(_, arg)| arg.contains_variable(var_name)),
        }
    }

    /// Names of all variables in the tree, sorted and without repetitions.
    pub fn free_variables(&self) -> Vec<String> {
        let mut found = BTreeSet::new();
        self.collect_variables(&mut found);
        found.into_iter().collect()
    }

    fn collect_variables(&self, found: &mut BTreeSet<String>) {
        match self {
            Expr::Var(name) => {
                found.insert(name.clone());
            }
            Expr::Const(_) => {}
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => {
                lhs.collect_variables(found);
                rhs.collect_variables(found);
            }
            other => {
                if let Some((_, arg)) = other.as_function() {
                    arg.collect_variables(found);
                }
            }
        }
    }

    /// Replaces every occurrence of the variable `var` with `value`.
    pub fn substitute_variable(&self, var: &str, value: &Expr) -> Expr {
        match self {
            Expr::Var(name) if name == var => value.clone(),
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => {
                lhs.substitute_variable(var, value) + rhs.substitute_variable(var, value)
            }
            Expr::Sub(lhs, rhs) => {
                lhs.substitute_variable(var, value) - rhs.substitute_variable(var, value)
            }
            Expr::Mul(lhs, rhs) => {
                lhs.substitute_variable(var, value) * rhs.substitute_variable(var, value)
            }
            Expr::Div(lhs, rhs) => {
                lhs.substitute_variable(var, value) / rhs.substitute_variable(var, value)
            }
            Expr::Pow(base, exp) => base
                .substitute_variable(var, value)
                .pow(exp.substitute_variable(var, value)),
            other => match other.as_function() {
                Some((func, arg)) => func.apply_to(arg.substitute_variable(var, value)),
                None => other.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn test_operators_build_nodes() {
        let expr = x() + Expr::Const(2.0);
        assert_eq!(expr, Expr::Add(x().boxed(), Expr::Const(2.0).boxed()));
        let expr = x() / Expr::Const(2.0);
        assert_eq!(expr, Expr::Div(x().boxed(), Expr::Const(2.0).boxed()));
    }

    #[test]
    fn test_neg() {
        assert_eq!(-x(), Expr::Mul(Expr::Const(-1.0).boxed(), x().boxed()));
        assert_eq!(-Expr::Const(3.0), Expr::Const(-3.0));
    }

    #[test]
    fn test_display_precedence() {
        let expr = Expr::Const(3.0) * x().pow(Expr::Const(2.0)) + Expr::Const(2.0) * x();
        assert_eq!(expr.to_string(), "3 * x^2 + 2 * x");
        let expr = x() - (x() + Expr::Const(1.0));
        assert_eq!(expr.to_string(), "x - (x + 1)");
        let expr = Expr::Const(1.0) / (Expr::Const(1.0) + x().pow(Expr::Const(2.0)));
        assert_eq!(expr.to_string(), "1 / (1 + x^2)");
        let expr = (-x()).pow(Expr::Const(2.0));
        assert_eq!(expr.to_string(), "(-x)^2");
        let expr = -(x().pow(Expr::Const(2.0)));
        assert_eq!(expr.to_string(), "-x^2");
        let expr = x().pow(Expr::Const(-1.0));
        assert_eq!(expr.to_string(), "x^(-1)");
    }

    #[test]
    fn test_display_functions() {
        let expr = -Expr::Ln(Expr::abs(Expr::cos(x().boxed()).boxed()).boxed());
        assert_eq!(expr.to_string(), "-ln|cos(x)|");
        let expr = Expr::arctg(x().boxed()) * Expr::Const(PI);
        assert_eq!(expr.to_string(), "arctan(x) * pi");
        assert_eq!(x().exp().to_string(), "exp(x)");
    }

    #[test]
    fn test_func_names_round_trip() {
        for func in Func::iter() {
            assert_eq!(Func::from_name(func.name()), Some(func));
            let node = func.apply_to(x());
            let (back, arg) = node.as_function().unwrap();
            assert_eq!(back, func);
            assert_eq!(arg, &x());
        }
        assert_eq!(Func::from_name("log"), Some(Func::Ln));
        assert_eq!(Func::from_name("tg"), Some(Func::Tg));
        assert_eq!(Func::from_name("foo"), None);
    }

    #[test]
    fn test_variables() {
        let expr = Expr::sin(x().boxed()) * Expr::var("a") + Expr::var("a");
        assert!(expr.contains_variable("x"));
        assert!(!expr.contains_variable("y"));
        assert_eq!(expr.free_variables(), vec!["a".to_string(), "x".to_string()]);
        assert!(Expr::Const(1.0).free_variables().is_empty());
    }

    #[test]
    fn test_substitute_variable() {
        let expr = Expr::cos(x().boxed()) + x();
        let replaced = expr.substitute_variable("x", &Expr::Const(0.0));
        assert_eq!(
            replaced,
            Expr::cos(Expr::Const(0.0).boxed()) + Expr::Const(0.0)
        );
    }
}
