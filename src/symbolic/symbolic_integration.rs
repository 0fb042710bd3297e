//! Table of elementary antiderivatives over the expression tree.
//!
//! `Expr::integrate` recognises:
//! - constants, `x`, and linearity over `+` and `-`;
//! - constant factors in products and constant denominators;
//! - the power rule `u^n` and `1/u` for a linear `u = a*x + b` (`n = -1` gives `ln|u|`);
//! - `c^u` for a positive constant `c` and a linear `u`;
//! - `exp sin cos tan cot sinh cosh tanh ln sqrt` of a linear argument;
//! - `f'(x)/f(x) = ln|f(x)|`;
//! - the inverse trigonometric functions of the bare variable.
//!
//! There is no chain rule and no integration by parts beyond those table entries:
//! anything else is an `Err` carrying the reason, which the strategy chain logs and
//! moves past.
use crate::symbolic::symbolic_engine::Expr;

/// `expr / a`, or `expr` itself when `a == 1`
fn over_slope(expr: Expr, a: f64) -> Expr {
    if a == 1.0 { expr } else { expr / Expr::Const(a) }
}

fn ln_abs(expr: Expr) -> Expr {
    Expr::Ln(Expr::abs(expr.boxed()).boxed())
}

impl Expr {
    /// Coefficients `(a, b)` when the expression equals `a*var + b` with numeric `a`, `b`.
    pub fn linear_coefficients(&self, var: &str) -> Option<(f64, f64)> {
        if !self.contains_variable(var) {
            return self.eval_constant().ok().map(|c| (0.0, c));
        }
        match self {
            Expr::Var(_) => Some((1.0, 0.0)),
            Expr::Add(lhs, rhs) => {
                let (a1, b1) = lhs.linear_coefficients(var)?;
                let (a2, b2) = rhs.linear_coefficients(var)?;
                Some((a1 + a2, b1 + b2))
            }
            Expr::Sub(lhs, rhs) => {
                let (a1, b1) = lhs.linear_coefficients(var)?;
                let (a2, b2) = rhs.linear_coefficients(var)?;
                Some((a1 - a2, b1 - b2))
            }
            Expr::Mul(lhs, rhs) => {
                let (a1, b1) = lhs.linear_coefficients(var)?;
                let (a2, b2) = rhs.linear_coefficients(var)?;
                if a1 == 0.0 {
                    Some((b1 * a2, b1 * b2))
                } else if a2 == 0.0 {
                    Some((a1 * b2, b1 * b2))
                } else {
                    None
                }
            }
            Expr::Div(lhs, rhs) => {
                let (a2, b2) = rhs.linear_coefficients(var)?;
                if a2 != 0.0 || b2 == 0.0 {
                    return None;
                }
                let (a1, b1) = lhs.linear_coefficients(var)?;
                Some((a1 / b2, b1 / b2))
            }
            _ => None,
        }
    }

    /// slope of a linear argument, or the reason it is not one
    fn linear_slope(arg: &Expr, var: &str) -> Result<f64, String> {
        match arg.linear_coefficients(var) {
            Some((a, _)) if a != 0.0 && a.is_finite() => Ok(a),
            _ => Err(format!("argument {} is not linear in {}", arg, var)),
        }
    }

    /// SYMBOLIC INTEGRATION

    /// Indefinite integral with respect to `var`, without the constant of integration.
    ///
    /// # Example
    /// ```
    /// use RustedIntegral::symbolic::symbolic_engine::Expr;
    /// let f = Expr::parse_expression("cos(2*x)").unwrap();
    /// let antiderivative = f.integrate("x").unwrap().simplify();
    /// assert_eq!(antiderivative.to_string(), "sin(2 * x) / 2");
    /// ```
    pub fn integrate(&self, var: &str) -> Result<Expr, String> {
        let x = Expr::var(var);
        // ∫ c dx = c*x
        if !self.contains_variable(var) {
            return Ok(self.clone() * x);
        }
        match self {
            // ∫ x dx = x²/2
            Expr::Var(_) => Ok(x.pow(Expr::Const(2.0)) / Expr::Const(2.0)),

            // ∫ (f ± g) dx = ∫ f dx ± ∫ g dx
            Expr::Add(lhs, rhs) => Ok(lhs.integrate(var)? + rhs.integrate(var)?),
            Expr::Sub(lhs, rhs) => Ok(lhs.integrate(var)? - rhs.integrate(var)?),

            Expr::Mul(lhs, rhs) => self.integrate_multiplication(lhs, rhs, var),
            Expr::Div(lhs, rhs) => self.integrate_division(lhs, rhs, var),
            Expr::Pow(base, exp) => self.integrate_power(base, exp, var),

            // ∫ e^(ax+b) dx = e^(ax+b)/a
            Expr::Exp(arg) => {
                let a = Self::linear_slope(arg, var)?;
                Ok(over_slope(self.clone(), a))
            }
            // ∫ ln(u) dx = (u ln(u) - u)/a
            Expr::Ln(arg) => {
                let a = Self::linear_slope(arg, var)?;
                let u = arg.as_ref().clone();
                Ok(over_slope(u.clone() * self.clone() - u, a))
            }
            // ∫ sqrt(u) dx = 2 u^(3/2) / (3a)
            Expr::sqrt(arg) => {
                let a = Self::linear_slope(arg, var)?;
                let u = arg.as_ref().clone();
                Ok(Expr::Const(2.0) * u.pow(Expr::Const(1.5)) / Expr::Const(3.0 * a))
            }
            Expr::sin(arg) => {
                let a = Self::linear_slope(arg, var)?;
                Ok(over_slope(-Expr::cos(arg.clone()), a))
            }
            Expr::cos(arg) => {
                let a = Self::linear_slope(arg, var)?;
                Ok(over_slope(Expr::sin(arg.clone()), a))
            }
            // ∫ tan(u) dx = -ln|cos(u)|/a
            Expr::tg(arg) => {
                let a = Self::linear_slope(arg, var)?;
                Ok(over_slope(-ln_abs(Expr::cos(arg.clone())), a))
            }
            // ∫ cot(u) dx = ln|sin(u)|/a
            Expr::ctg(arg) => {
                let a = Self::linear_slope(arg, var)?;
                Ok(over_slope(ln_abs(Expr::sin(arg.clone())), a))
            }
            Expr::sinh(arg) => {
                let a = Self::linear_slope(arg, var)?;
                Ok(over_slope(Expr::cosh(arg.clone()), a))
            }
            Expr::cosh(arg) => {
                let a = Self::linear_slope(arg, var)?;
                Ok(over_slope(Expr::sinh(arg.clone()), a))
            }
            // ∫ tanh(u) dx = ln(cosh(u))/a
            Expr::tanh(arg) => {
                let a = Self::linear_slope(arg, var)?;
                Ok(over_slope(Expr::Ln(Expr::cosh(arg.clone()).boxed()), a))
            }
            Expr::arcsin(_) | Expr::arccos(_) | Expr::arctg(_) | Expr::arcctg(_) => {
                self.integrate_inverse_trig(var)
            }
            Expr::abs(_) => Err(format!("no rule for {}", self)),
            Expr::Const(_) => Ok(self.clone() * x),
        }
    }

    fn integrate_multiplication(&self, lhs: &Expr, rhs: &Expr, var: &str) -> Result<Expr, String> {
        // ∫ c f(x) dx = c ∫ f(x) dx
        if !lhs.contains_variable(var) {
            let rhs_int = rhs.integrate(var)?;
            return Ok(lhs.clone() * rhs_int);
        }
        if !rhs.contains_variable(var) {
            let lhs_int = lhs.integrate(var)?;
            return Ok(rhs.clone() * lhs_int);
        }
        Err(format!("product {} needs integration by parts", self))
    }

    fn integrate_division(&self, lhs: &Expr, rhs: &Expr, var: &str) -> Result<Expr, String> {
        // ∫ f(x)/c dx = (∫ f(x) dx)/c
        if !rhs.contains_variable(var) {
            let lhs_int = lhs.integrate(var)?;
            return Ok(lhs_int / rhs.clone());
        }
        // ∫ c/(ax+b) dx = c ln|ax+b| / a
        if !lhs.contains_variable(var) {
            if let Ok(a) = Self::linear_slope(rhs, var) {
                let log = ln_abs(rhs.clone());
                let scaled = if lhs.is_one() { log } else { lhs.clone() * log };
                return Ok(over_slope(scaled, a));
            }
        }
        // ∫ f'(x)/f(x) dx = ln|f(x)|
        if rhs.diff(var).simplify() == lhs.simplify() {
            return Ok(ln_abs(rhs.clone()));
        }
        Err(format!("no rule for quotient {}", self))
    }

    fn integrate_power(&self, base: &Expr, exp: &Expr, var: &str) -> Result<Expr, String> {
        if !exp.contains_variable(var) {
            // ∫ u^n dx = u^(n+1) / ((n+1) a), ∫ u^-1 dx = ln|u| / a
            let n = exp
                .eval_constant()
                .map_err(|e| format!("exponent {} is not numeric: {}", exp, e))?;
            let a = Self::linear_slope(base, var)?;
            if n == -1.0 {
                return Ok(over_slope(ln_abs(base.clone()), a));
            }
            return Ok(base.clone().pow(Expr::Const(n + 1.0)) / Expr::Const((n + 1.0) * a));
        }
        if !base.contains_variable(var) {
            // ∫ c^u dx = c^u / (ln(c) a)
            let c = base
                .eval_constant()
                .map_err(|e| format!("base {} is not numeric: {}", base, e))?;
            if c <= 0.0 || c == 1.0 {
                return Err(format!("no rule for base {}", c));
            }
            let a = Self::linear_slope(exp, var)?;
            return Ok(over_slope(self.clone() / base.clone().ln(), a));
        }
        Err(format!("no rule for {}", self))
    }

    fn integrate_inverse_trig(&self, var: &str) -> Result<Expr, String> {
        let x = Expr::var(var);
        let arg_is_var = self
            .as_function()
            .is_some_and(|(_, arg)| *arg == x);
        if !arg_is_var {
            return Err(format!("inverse trigonometric rule needs a bare {} in {}", var, self));
        }
        let one_minus_square = Expr::Const(1.0) - x.clone().pow(Expr::Const(2.0));
        let one_plus_square = Expr::Const(1.0) + x.clone().pow(Expr::Const(2.0));
        let half_log = Expr::Ln(one_plus_square.boxed()) / Expr::Const(2.0);
        match self {
            // ∫ arcsin(x) dx = x arcsin(x) + sqrt(1 - x²)
            Expr::arcsin(_) => Ok(x * self.clone() + Expr::sqrt(one_minus_square.boxed())),
            // ∫ arccos(x) dx = x arccos(x) - sqrt(1 - x²)
            Expr::arccos(_) => Ok(x * self.clone() - Expr::sqrt(one_minus_square.boxed())),
            // ∫ arctan(x) dx = x arctan(x) - ln(1 + x²)/2
            Expr::arctg(_) => Ok(x * self.clone() - half_log),
            // ∫ arccot(x) dx = x arccot(x) + ln(1 + x²)/2
            Expr::arcctg(_) => Ok(x * self.clone() + half_log),
            _ => Err(format!("{} is not an inverse trigonometric function", self)),
        }
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use approx::assert_relative_eq;

    fn antiderivative(text: &str) -> Expr {
        Expr::parse_expression(text)
            .unwrap()
            .integrate("x")
            .unwrap()
            .simplify()
    }

    /// d/dx F must give back f at a few points
    fn check_by_differentiation(text: &str, points: &[f64]) {
        let f = Expr::parse_expression(text).unwrap();
        let big_f = f.integrate("x").unwrap();
        let derivative = big_f.diff("x");
        for &p in points {
            assert_relative_eq!(
                derivative.eval_at("x", p).unwrap(),
                f.eval_at("x", p).unwrap(),
                epsilon = 1e-10,
                max_relative = 1e-10
            );
        }
    }

    #[test]
    fn test_polynomials() {
        assert_eq!(antiderivative("x^2").to_string(), "x^3 / 3");
        assert_eq!(antiderivative("x").to_string(), "x^2 / 2");
        assert_eq!(antiderivative("5").to_string(), "5 * x");
        check_by_differentiation("3*x^2 + 2*x", &[-1.0, 0.5, 2.0]);
        check_by_differentiation("x^-2 - 4*x^-3", &[0.5, 2.0]);
        check_by_differentiation("(2*x + 1)^3", &[-1.0, 0.3]);
    }

    #[test]
    fn test_reciprocal_gives_log_abs() {
        assert_eq!(antiderivative("1/x").to_string(), "ln|x|");
        assert_eq!(antiderivative("x^-1").to_string(), "ln|x|");
        assert_eq!(antiderivative("3/(2*x + 1)").to_string(), "3 * ln|2 * x + 1| / 2");
        check_by_differentiation("3/(2*x + 1)", &[0.0, 1.0]);
        check_by_differentiation("1/x", &[-2.0, 0.5]);
    }

    #[test]
    fn test_trigonometric() {
        assert_eq!(antiderivative("sin(x)").to_string(), "-cos(x)");
        assert_eq!(antiderivative("cos(x)").to_string(), "sin(x)");
        assert_eq!(antiderivative("tan(x)").to_string(), "-ln|cos(x)|");
        assert_eq!(antiderivative("cot(x)").to_string(), "ln|sin(x)|");
        check_by_differentiation("sin(3*x - 1)", &[0.1, 0.7]);
        check_by_differentiation("tan(x / 2)", &[0.3, 1.0]);
        check_by_differentiation("cot(2*x)", &[0.3, 1.0]);
    }

    #[test]
    fn test_exponential_and_log() {
        assert_eq!(antiderivative("e^x").to_string(), "exp(x)");
        assert_eq!(antiderivative("exp(2*x)").to_string(), "exp(2 * x) / 2");
        assert_eq!(antiderivative("2^x").to_string(), "2^x / ln(2)");
        check_by_differentiation("ln(x)", &[0.5, 3.0]);
        check_by_differentiation("log(3*x + 1)", &[0.5, 3.0]);
        check_by_differentiation("exp(-x/4)", &[0.5, 3.0]);
        check_by_differentiation("sqrt(2*x + 1)", &[0.5, 3.0]);
    }

    #[test]
    fn test_hyperbolic() {
        assert_eq!(antiderivative("sinh(x)").to_string(), "cosh(x)");
        assert_eq!(antiderivative("cosh(x)").to_string(), "sinh(x)");
        check_by_differentiation("tanh(x)", &[-0.5, 1.5]);
    }

    #[test]
    fn test_inverse_trigonometric() {
        for text in ["arcsin(x)", "arccos(x)"] {
            check_by_differentiation(text, &[-0.5, 0.2, 0.7]);
        }
        for text in ["arctan(x)", "arccot(x)"] {
            check_by_differentiation(text, &[-2.0, 0.2, 3.0]);
        }
        assert!(Expr::parse_expression("arcsin(2*x)").unwrap().integrate("x").is_err());
    }

    #[test]
    fn test_log_derivative_quotient() {
        assert_eq!(antiderivative("2*x/(1 + x^2)").to_string(), "ln|1 + x^2|");
        assert_eq!(antiderivative("cos(x)/sin(x)").to_string(), "ln|sin(x)|");
    }

    #[test]
    fn test_constant_factors() {
        assert_eq!(antiderivative("3*cos(x)").to_string(), "3 * sin(x)");
        assert_eq!(antiderivative("sin(x)/2").to_string(), "-cos(x) / 2");
        check_by_differentiation("pi*x^2", &[1.0]);
    }

    #[test]
    fn test_no_rule() {
        for text in ["exp(-x^2)", "1/(1 + x^2)", "x*sin(x)", "sin(x^2)", "|x|", "x^x"] {
            let f = Expr::parse_expression(text).unwrap();
            assert!(f.integrate("x").is_err(), "{}", text);
        }
    }

    #[test]
    fn test_linear_coefficients() {
        let expr = Expr::parse_expression("3*(x - 1)/2 + pi").unwrap();
        let (a, b) = expr.linear_coefficients("x").unwrap();
        assert_relative_eq!(a, 1.5);
        assert_relative_eq!(b, -1.5 + std::f64::consts::PI);
        assert!(Expr::parse_expression("x*x").unwrap().linear_coefficients("x").is_none());
        assert!(Expr::parse_expression("a*x").unwrap().linear_coefficients("x").is_none());
    }
}
