//! Analytical differentiation.
//!
//! Used by the integration rules (`f'(x)/f(x)` recognition) and by the tests that check
//! an antiderivative by differentiating it back.
use crate::symbolic::symbolic_engine::Expr;

impl Expr {
    /// Derivative with respect to `var`, unsimplified.
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
            Expr::Add(lhs, rhs) => lhs.diff(var) + rhs.diff(var),
            Expr::Sub(lhs, rhs) => lhs.diff(var) - rhs.diff(var),
            Expr::Mul(lhs, rhs) => {
                lhs.diff(var) * rhs.as_ref().clone() + lhs.as_ref().clone() * rhs.diff(var)
            }
            Expr::Div(lhs, rhs) => {
                let (u, v) = (lhs.as_ref().clone(), rhs.as_ref().clone());
                (lhs.diff(var) * v.clone() - rhs.diff(var) * u) / v.pow(Expr::Const(2.0))
            }
            Expr::Pow(base, exp) => {
                let (b, e) = (base.as_ref().clone(), exp.as_ref().clone());
                if !exp.contains_variable(var) {
                    // d(u^n) = n u^(n-1) u'
                    e.clone() * b.pow(e - Expr::Const(1.0)) * base.diff(var)
                } else if !base.contains_variable(var) {
                    // d(c^v) = c^v ln(c) v'
                    b.clone().pow(e) * b.ln() * exp.diff(var)
                } else {
                    // d(u^v) = u^v (v' ln(u) + v u'/u)
                    b.clone().pow(e.clone())
                        * (exp.diff(var) * b.clone().ln() + e * base.diff(var) / b)
                }
            }
            Expr::Exp(arg) => arg.as_ref().clone().exp() * arg.diff(var),
            Expr::Ln(arg) => arg.diff(var) / arg.as_ref().clone(),
            Expr::sqrt(arg) => {
                arg.diff(var) / (Expr::Const(2.0) * Expr::sqrt(arg.clone()))
            }
            Expr::abs(arg) => {
                arg.as_ref().clone() * arg.diff(var) / Expr::abs(arg.clone())
            }
            Expr::sin(arg) => Expr::cos(arg.clone()) * arg.diff(var),
            Expr::cos(arg) => -Expr::sin(arg.clone()) * arg.diff(var),
            Expr::tg(arg) => {
                arg.diff(var) / Expr::cos(arg.clone()).pow(Expr::Const(2.0))
            }
            Expr::ctg(arg) => {
                -arg.diff(var) / Expr::sin(arg.clone()).pow(Expr::Const(2.0))
            }
            Expr::arcsin(arg) => {
                arg.diff(var) / Expr::sqrt(one_minus_square(arg).boxed())
            }
            Expr::arccos(arg) => {
                -arg.diff(var) / Expr::sqrt(one_minus_square(arg).boxed())
            }
            Expr::arctg(arg) => arg.diff(var) / one_plus_square(arg),
            Expr::arcctg(arg) => -arg.diff(var) / one_plus_square(arg),
            Expr::sinh(arg) => Expr::cosh(arg.clone()) * arg.diff(var),
            Expr::cosh(arg) => Expr::sinh(arg.clone()) * arg.diff(var),
            Expr::tanh(arg) => {
                arg.diff(var) / Expr::cosh(arg.clone()).pow(Expr::Const(2.0))
            }
        }
    }
}

fn one_minus_square(arg: &Expr) -> Expr {
    Expr::Const(1.0) - arg.clone().pow(Expr::Const(2.0))
}

fn one_plus_square(arg: &Expr) -> Expr {
    Expr::Const(1.0) + arg.clone().pow(Expr::Const(2.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// central difference of the parsed expression
    fn numeric_derivative(expr: &Expr, x: f64) -> f64 {
        let h = 1e-6;
        let f = expr.lambdify_checked("x");
        (f(x + h).unwrap() - f(x - h).unwrap()) / (2.0 * h)
    }

    #[test]
    fn test_diff_simple() {
        let expr = Expr::parse_expression("3*x^2 + 2*x").unwrap();
        assert_eq!(expr.diff("x").simplify().to_string(), "6 * x + 2");
        let expr = Expr::parse_expression("sin(x)").unwrap();
        assert_eq!(expr.diff("x").simplify().to_string(), "cos(x)");
        let expr = Expr::parse_expression("1 + x^2").unwrap();
        assert_eq!(expr.diff("x").simplify().to_string(), "2 * x");
        let expr = Expr::parse_expression("y^2").unwrap();
        assert_eq!(expr.diff("x").simplify(), Expr::Const(0.0));
    }

    #[test]
    fn test_diff_against_finite_differences() {
        let texts = [
            "x^3 - 2*x",
            "exp(-x^2)",
            "ln(x)",
            "sqrt(x)",
            "tan(x)",
            "cot(x)",
            "arcsin(x / 2)",
            "arccos(x / 2)",
            "arctan(x)",
            "arccot(x)",
            "sinh(x) + cosh(x) + tanh(x)",
            "x^x",
            "2^x",
            "|x - 3|",
            "sin(x) / (1 + x^2)",
        ];
        for text in texts {
            let expr = Expr::parse_expression(text).unwrap();
            let derivative = expr.diff("x");
            for x in [0.4, 0.9, 1.3] {
                let exact = derivative.eval_at("x", x).unwrap();
                assert_relative_eq!(exact, numeric_derivative(&expr, x), epsilon = 1e-5, max_relative = 1e-5);
            }
        }
    }
}
