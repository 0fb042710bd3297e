//! # Symbolic Expression Simplification Module
//!
//! Light algebraic clean-up applied to derivatives and antiderivatives before they are
//! compared or printed: constant folding, neutral elements, constants collected on the
//! left of products, and adding a negative turned into a subtraction.
//!
//! There is no term collection and no function folding: `ln(2)` stays `ln(2)`.
//! Rules like `0 * u = 0` assume `u` is defined; the integrand itself is never
//! simplified before it is evaluated.

use crate::symbolic::symbolic_engine::Expr;

fn fold_pow(base: f64, exponent: f64) -> Option<f64> {
    if base < 0.0 && exponent.fract() != 0.0 {
        return None;
    }
    let val = base.powf(exponent);
    val.is_finite().then_some(val)
}

impl Expr {
    //___________________________________SIMPLIFICATION____________________________________

    /// Returns a simplified copy of the expression.
    ///
    /// # Examples
    /// - `0 + x * 1` → `x`
    /// - `2 * (3 * x)` → `6 * x`
    /// - `x + (-1) * y` → `x - y`
    pub fn simplify(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => {
                let lhs = lhs.simplify();
                let rhs = rhs.simplify();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a + b), // (a) + (b) = (a + b)
                    _ if lhs.is_zero() => rhs,                              // 0 + x = x
                    _ if rhs.is_zero() => lhs,                              // x + 0 = x
                    (_, Expr::Const(b)) if *b < 0.0 => {
                        // x + (-b) = x - b
                        let b = -*b;
                        Expr::Sub(lhs.boxed(), Expr::Const(b).boxed())
                    }
                    (_, Expr::Mul(factor, inner)) if factor.is_minus_one() => {
                        // x + (-1) * y = x - y
                        let inner = inner.clone();
                        Expr::Sub(lhs.boxed(), inner)
                    }
                    _ => Expr::Add(lhs.boxed(), rhs.boxed()),
                }
            }
            Expr::Sub(lhs, rhs) => {
                let lhs = lhs.simplify();
                let rhs = rhs.simplify();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a - b), // (a) - (b) = (a - b)
                    _ if rhs.is_zero() => lhs,                              // x - 0 = x
                    _ if lhs.is_zero() => -rhs,                             // 0 - x = -x
                    _ if lhs == rhs => Expr::Const(0.0),                    // x - x = 0
                    (_, Expr::Const(b)) if *b < 0.0 => {
                        let b = -*b;
                        Expr::Add(lhs.boxed(), Expr::Const(b).boxed())
                    }
                    (_, Expr::Mul(factor, inner)) if factor.is_minus_one() => {
                        // x - (-1) * y = x + y
                        let inner = inner.clone();
                        Expr::Add(lhs.boxed(), inner)
                    }
                    _ => Expr::Sub(lhs.boxed(), rhs.boxed()),
                }
            }
            Expr::Mul(lhs, rhs) => {
                let lhs = lhs.simplify();
                let rhs = rhs.simplify();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) => Expr::Const(a * b), // (a) * (b) = (a * b)
                    _ if lhs.is_zero() || rhs.is_zero() => Expr::Const(0.0), // 0 * x = 0
                    _ if lhs.is_one() => rhs,                                // 1 * x = x
                    _ if rhs.is_one() => lhs,                                // x * 1 = x
                    // x * c = c * x
                    (_, Expr::Const(_)) => Expr::Mul(rhs.boxed(), lhs.boxed()).simplify(),
                    // a * (b * x) = (a * b) * x
                    (Expr::Const(a), Expr::Mul(inner_lhs, inner_rhs)) => {
                        match inner_lhs.as_ref() {
                            Expr::Const(b) => {
                                let k = a * b;
                                if k == 1.0 {
                                    inner_rhs.as_ref().clone()
                                } else {
                                    Expr::Mul(Expr::Const(k).boxed(), inner_rhs.clone())
                                }
                            }
                            _ => Expr::Mul(lhs.boxed(), rhs.boxed()),
                        }
                    }
                    _ => Expr::Mul(lhs.boxed(), rhs.boxed()),
                }
            }
            Expr::Div(lhs, rhs) => {
                let lhs = lhs.simplify();
                let rhs = rhs.simplify();
                match (&lhs, &rhs) {
                    (Expr::Const(a), Expr::Const(b)) if *b != 0.0 => Expr::Const(a / b),
                    _ if rhs.is_one() => lhs,                                      // x / 1 = x
                    _ if lhs.is_zero() && !rhs.is_zero() => Expr::Const(0.0),      // 0 / x = 0
                    _ => Expr::Div(lhs.boxed(), rhs.boxed()),
                }
            }
            Expr::Pow(base, exp) => {
                let base = base.simplify();
                let exp = exp.simplify();
                match (&base, &exp) {
                    (Expr::Const(a), Expr::Const(b)) => match fold_pow(*a, *b) {
                        Some(val) => Expr::Const(val),
                        None => base.pow(exp),
                    },
                    _ if exp.is_one() => base,            // x ^ 1 = x
                    _ if exp.is_zero() => Expr::Const(1.0), // x ^ 0 = 1
                    _ if base.is_one() => Expr::Const(1.0), // 1 ^ x = 1
                    _ => base.pow(exp),
                }
            }
            other => match other.as_function() {
                Some((func, arg)) => func.apply_to(arg.simplify()),
                None => other.clone(),
            },
        }
    }
}
