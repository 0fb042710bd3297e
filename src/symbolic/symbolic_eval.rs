//! Pointwise evaluation with domain checking.
//!
//! Two entry points that always agree bit for bit:
//! - `Expr::eval_at` walks the tree once for a single value;
//! - `Expr::lambdify_checked` compiles the tree into a boxed closure once and is what the
//!   quadrature loops call many times.
//!
//! Every intermediate result is checked: a NaN or an infinity is reported as
//! `DomainError::NonFinite`, undefined operations get their own `DomainError` kind.
use crate::errors::DomainError;
use crate::symbolic::symbolic_engine::{Expr, Func};
use std::f64::consts::FRAC_PI_2;

/// compiled integrand: one variable in, checked value out
pub type CheckedFn = Box<dyn Fn(f64) -> Result<f64, DomainError> + Send + Sync>;

#[inline]
fn finite(val: f64) -> Result<f64, DomainError> {
    if val.is_finite() {
        Ok(val)
    } else {
        Err(DomainError::NonFinite)
    }
}

#[inline]
fn checked_div(num: f64, den: f64) -> Result<f64, DomainError> {
    if den == 0.0 {
        return Err(DomainError::DivisionByZero);
    }
    finite(num / den)
}

#[inline]
fn checked_pow(base: f64, exponent: f64) -> Result<f64, DomainError> {
    if base == 0.0 && exponent < 0.0 {
        return Err(DomainError::DivisionByZero);
    }
    // no real value for a negative base and a fractional exponent
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(DomainError::OutOfDomain {
            function: "pow",
            argument: base,
        });
    }
    finite(base.powf(exponent))
}

impl Func {
    /// Applies the function to a finite argument.
    pub fn eval(self, x: f64) -> Result<f64, DomainError> {
        let out_of_domain = |function: &'static str| {
            Err(DomainError::OutOfDomain {
                function,
                argument: x,
            })
        };
        match self {
            Func::Exp => finite(x.exp()),
            Func::Ln => {
                if x <= 0.0 {
                    Err(DomainError::LogOfNonPositive(x))
                } else {
                    Ok(x.ln())
                }
            }
            Func::Sqrt => {
                if x < 0.0 {
                    Err(DomainError::SqrtOfNegative(x))
                } else {
                    Ok(x.sqrt())
                }
            }
            Func::Abs => Ok(x.abs()),
            Func::Sin => Ok(x.sin()),
            Func::Cos => Ok(x.cos()),
            // no double hits a pole of tan or cot exactly; a cosine (sine) below one
            // ulp of the other factor means x is the double nearest to the pole
            Func::Tg => {
                if x.cos().abs() <= f64::EPSILON * x.sin().abs() {
                    out_of_domain("tan")
                } else {
                    finite(x.tan())
                }
            }
            Func::Ctg => {
                let s = x.sin();
                if s.abs() <= f64::EPSILON * x.cos().abs() {
                    out_of_domain("cot")
                } else {
                    finite(x.cos() / s)
                }
            }
            Func::Arcsin => {
                if x.abs() > 1.0 {
                    out_of_domain("arcsin")
                } else {
                    Ok(x.asin())
                }
            }
            Func::Arccos => {
                if x.abs() > 1.0 {
                    out_of_domain("arccos")
                } else {
                    Ok(x.acos())
                }
            }
            Func::Arctg => Ok(x.atan()),
            Func::Arcctg => Ok(FRAC_PI_2 - x.atan()),
            Func::Sinh => finite(x.sinh()),
            Func::Cosh => finite(x.cosh()),
            Func::Tanh => Ok(x.tanh()),
        }
    }
}

impl Expr {
    /// Evaluates the expression with `var` bound to `value`.
    ///
    /// Any other variable in the tree is an `UnboundVariable` error.
    pub fn eval_at(&self, var: &str, value: f64) -> Result<f64, DomainError> {
        match self {
            Expr::Var(name) if name == var => Ok(value),
            Expr::Var(name) => Err(DomainError::UnboundVariable(name.clone())),
            Expr::Const(val) => finite(*val),
            Expr::Add(lhs, rhs) => finite(lhs.eval_at(var, value)? + rhs.eval_at(var, value)?),
            Expr::Sub(lhs, rhs) => finite(lhs.eval_at(var, value)? - rhs.eval_at(var, value)?),
            Expr::Mul(lhs, rhs) => finite(lhs.eval_at(var, value)? * rhs.eval_at(var, value)?),
            Expr::Div(lhs, rhs) => {
                checked_div(lhs.eval_at(var, value)?, rhs.eval_at(var, value)?)
            }
            Expr::Pow(base, exp) => {
                checked_pow(base.eval_at(var, value)?, exp.eval_at(var, value)?)
            }
            other => match other.as_function() {
                Some((func, arg)) => func.eval(arg.eval_at(var, value)?),
                None => unreachable!("every remaining variant is a function node"),
            },
        }
    }

    /// Compiles the expression into a closure of `var`.
    ///
    /// The closure is `Send + Sync` and gives exactly the values `eval_at` gives.
    pub fn lambdify_checked(&self, var: &str) -> CheckedFn {
        match self {
            Expr::Var(name) if name == var => Box::new(|x: f64| Ok(x)),
            Expr::Var(name) => {
                let name = name.clone();
                Box::new(move |_| Err(DomainError::UnboundVariable(name.clone())))
            }
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| finite(val))
            }
            Expr::Add(lhs, rhs) => {
                let lf = lhs.lambdify_checked(var);
                let rf = rhs.lambdify_checked(var);
                Box::new(move |x| finite(lf(x)? + rf(x)?))
            }
            Expr::Sub(lhs, rhs) => {
                let lf = lhs.lambdify_checked(var);
                let rf = rhs.lambdify_checked(var);
                Box::new(move |x| finite(lf(x)? - rf(x)?))
            }
            Expr::Mul(lhs, rhs) => {
                let lf = lhs.lambdify_checked(var);
                let rf = rhs.lambdify_checked(var);
                Box::new(move |x| finite(lf(x)? * rf(x)?))
            }
            Expr::Div(lhs, rhs) => {
                let lf = lhs.lambdify_checked(var);
                let rf = rhs.lambdify_checked(var);
                Box::new(move |x| checked_div(lf(x)?, rf(x)?))
            }
            Expr::Pow(base, exp) => {
                let bf = base.lambdify_checked(var);
                let ef = exp.lambdify_checked(var);
                Box::new(move |x| checked_pow(bf(x)?, ef(x)?))
            }
            other => match other.as_function() {
                Some((func, arg)) => {
                    let f = arg.lambdify_checked(var);
                    Box::new(move |x| func.eval(f(x)?))
                }
                None => unreachable!("every remaining variant is a function node"),
            },
        }
    }

    /// Value of an expression without variables, e.g. a bound written as `pi/2`.
    pub fn eval_constant(&self) -> Result<f64, DomainError> {
        match self.free_variables().first() {
            Some(name) => Err(DomainError::UnboundVariable(name.clone())),
            None => self.eval_at("", 0.0),
        }
    }
}
