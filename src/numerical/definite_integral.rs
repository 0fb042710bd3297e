//! # Definite integrals
//!
//! Entry points of the crate:
//! - `integrate_definite`: adaptive Simpson over finite or infinite bounds;
//! - `evaluate`: the integrand at a single point;
//! - `integrate_indefinite`: the antiderivative strategy chain;
//! - `Integrator::solve`: the whole method menu driven by an `IntegrationRequest`.
//!
//! Every call parses its own expression and keeps no state between calls.
//!
//! ## Method selection
//! | method            | finite bounds                              | infinite bound        |
//! |-------------------|--------------------------------------------|-----------------------|
//! | `auto`            | closed form if found and safe, else Simpson | Simpson (tangent map) |
//! | `symbolic`        | closed form or `SymbolicNoMatch`           | `Unsupported`         |
//! | `adaptive-simpson`| Simpson                                    | Simpson (tangent map) |
//! | `gauss-legendre`  | Gauss–Legendre, degrees n and 2n           | same, tangent map     |
//!
//! "Safe" means the integrand is defined on a grid of probe points covering the
//! interval, the antiderivative is finite at both bounds and `F(b) - F(a)` agrees with a
//! Gauss-Legendre estimate. In `symbolic` mode a disagreement marks the value `Reduced`.
//!
//! ## Example
//! ```
//! use RustedIntegral::numerical::definite_integral::integrate_definite;
//! use RustedIntegral::numerical::improper::Bound;
//! let result = integrate_definite("x^2", "x", Bound::Finite(0.0), Bound::Finite(1.0), 1e-6).unwrap();
//! assert!((result.value - 1.0 / 3.0).abs() < 1e-6);
//! ```
use crate::errors::IntegrationError;
use crate::numerical::adaptive_simpson::{AdaptiveSimpson, Confidence, DEFAULT_MAX_DEPTH, DEFAULT_MAX_EVALUATIONS};
use crate::numerical::gauss_legendre::{DEFAULT_DEGREE, GaussLegendreRule};
use crate::numerical::improper::{Bound, IntervalMap};
use crate::symbolic::integration_strategies::{Antiderivative, closed_form, find_antiderivative};
use crate::symbolic::symbolic_engine::Expr;
use log::{debug, error, info, warn};
use std::cmp::Ordering;
use strum_macros::{Display, EnumIter, EnumString};

pub const DEFAULT_TOLERANCE: f64 = 1e-6;
/// grid the integrand must be defined on before a closed form is trusted
pub const DEFAULT_PROBE_POINTS: usize = 33;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum IntegrationMethod {
    /// symbolic first, adaptive Simpson when that is not possible
    #[default]
    #[strum(to_string = "auto")]
    Auto,
    #[strum(to_string = "symbolic")]
    Symbolic,
    #[strum(to_string = "adaptive-simpson", serialize = "simpson")]
    AdaptiveSimpson,
    #[strum(to_string = "gauss-legendre", serialize = "gauss")]
    GaussLegendre,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationRequest {
    pub expression: String,
    pub variable: String,
    pub lower: Bound,
    pub upper: Bound,
    pub tolerance: f64,
    pub max_depth: usize,
    pub method: IntegrationMethod,
}

impl IntegrationRequest {
    pub fn new(expression: &str, variable: &str, lower: Bound, upper: Bound) -> Self {
        IntegrationRequest {
            expression: expression.to_string(),
            variable: variable.to_string(),
            lower,
            upper,
            tolerance: DEFAULT_TOLERANCE,
            max_depth: DEFAULT_MAX_DEPTH,
            method: IntegrationMethod::Auto,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_method(mut self, method: IntegrationMethod) -> Self {
        self.method = method;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationResult {
    pub value: f64,
    pub confidence: Confidence,
    /// the method that produced the value, never `Auto`
    pub method: IntegrationMethod,
    pub evaluations: usize,
    pub deepest_level: usize,
    pub error_estimate: f64,
    /// set when the value comes from a closed form
    pub antiderivative: Option<Antiderivative>,
}

impl IntegrationResult {
    fn zero(method: IntegrationMethod) -> Self {
        IntegrationResult {
            value: 0.0,
            confidence: Confidence::Converged,
            method,
            evaluations: 0,
            deepest_level: 0,
            error_estimate: 0.0,
            antiderivative: None,
        }
    }
}

/// Solver settings that are not part of a single request.
#[derive(Debug, Clone)]
pub struct Integrator {
    pub max_evaluations: usize,
    pub gauss_degree: usize,
    pub probe_points: usize,
}

impl Default for Integrator {
    fn default() -> Self {
        Integrator {
            max_evaluations: DEFAULT_MAX_EVALUATIONS,
            gauss_degree: DEFAULT_DEGREE,
            probe_points: DEFAULT_PROBE_POINTS,
        }
    }
}

/// Parses `expression` and checks that `variable` is its only free variable.
pub fn parse_integrand(expression: &str, variable: &str) -> Result<Expr, IntegrationError> {
    if variable.is_empty() || !variable.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(IntegrationError::InvalidArgument(format!(
            "'{}' is not a variable name",
            variable
        )));
    }
    let expr = Expr::parse_expression(expression)?;
    let foreign: Vec<String> = expr
        .free_variables()
        .into_iter()
        .filter(|name| name != variable)
        .collect();
    if !foreign.is_empty() {
        return Err(IntegrationError::UnboundVariable {
            expected: variable.to_string(),
            found: foreign,
        });
    }
    Ok(expr)
}

impl Integrator {
    pub fn new() -> Self {
        Integrator::default()
    }

    pub fn solve(&self, request: &IntegrationRequest) -> Result<IntegrationResult, IntegrationError> {
        info!(
            "∫ {} d{} on [{}, {}], tol {}, method {}",
            request.expression,
            request.variable,
            request.lower,
            request.upper,
            request.tolerance,
            request.method
        );
        if !(request.tolerance.is_finite() && request.tolerance > 0.0) {
            return Err(IntegrationError::InvalidTolerance(request.tolerance));
        }
        if request.max_depth == 0 {
            return Err(IntegrationError::InvalidArgument(
                "max_depth must be at least 1".to_string(),
            ));
        }
        request.lower.validate()?;
        request.upper.validate()?;
        let integrand = parse_integrand(&request.expression, &request.variable)?;

        let result = match request.lower.partial_cmp(&request.upper) {
            Some(Ordering::Equal) => Ok(IntegrationResult::zero(self.numeric_method(request.method))),
            Some(Ordering::Greater) => {
                debug!("bounds swapped, result negated");
                self.solve_ordered(&integrand, request, request.upper, request.lower)
                    .map(|mut result| {
                        result.value = -result.value;
                        result
                    })
            }
            _ => self.solve_ordered(&integrand, request, request.lower, request.upper),
        };
        match &result {
            Ok(result) => info!(
                "= {} ({}, {}, {} evaluations)",
                result.value, result.method, result.confidence, result.evaluations
            ),
            Err(e) => error!("∫ {} d{} failed: {}", request.expression, request.variable, e),
        }
        result
    }

    fn numeric_method(&self, method: IntegrationMethod) -> IntegrationMethod {
        match method {
            IntegrationMethod::Auto => IntegrationMethod::AdaptiveSimpson,
            other => other,
        }
    }

    /// `lower < upper` from here on
    fn solve_ordered(
        &self,
        integrand: &Expr,
        request: &IntegrationRequest,
        lower: Bound,
        upper: Bound,
    ) -> Result<IntegrationResult, IntegrationError> {
        let var = request.variable.as_str();
        match request.method {
            IntegrationMethod::Auto => {
                if let (Bound::Finite(a), Bound::Finite(b)) = (lower, upper) {
                    if let Some(result) = self.try_closed_form(integrand, var, a, b, request.tolerance) {
                        return Ok(result);
                    }
                }
                self.simpson(integrand, request, lower, upper)
            }
            IntegrationMethod::Symbolic => match (lower, upper) {
                (Bound::Finite(a), Bound::Finite(b)) => {
                    // probe failures are hard errors here
                    self.probe(integrand, var, a, b)?;
                    let result = self
                        .fundamental_theorem(integrand, var, a, b)?
                        .ok_or_else(|| IntegrationError::SymbolicNoMatch(integrand.to_string()))?;
                    Ok(self.cross_check(integrand, var, a, b, request.tolerance, result))
                }
                _ => Err(IntegrationError::Unsupported(
                    "symbolic integration needs finite bounds".to_string(),
                )),
            },
            IntegrationMethod::AdaptiveSimpson => self.simpson(integrand, request, lower, upper),
            IntegrationMethod::GaussLegendre => self.gauss(integrand, request, lower, upper),
        }
    }

    /// closed form for `auto`: `None` sends the request on to quadrature
    fn try_closed_form(
        &self,
        integrand: &Expr,
        var: &str,
        a: f64,
        b: f64,
        tolerance: f64,
    ) -> Option<IntegrationResult> {
        if let Err(e) = self.probe(integrand, var, a, b) {
            debug!("closed form skipped: {}", e);
            return None;
        }
        let result = match self.fundamental_theorem(integrand, var, a, b) {
            Ok(result) => result?,
            Err(e) => {
                debug!("closed form skipped: {}", e);
                return None;
            }
        };
        let result = self.cross_check(integrand, var, a, b, tolerance, result);
        match result.confidence {
            Confidence::Converged => Some(result),
            Confidence::Reduced => None,
        }
    }

    /// Compares a closed-form value with Gauss-Legendre on the same interval. A pole
    /// between the probe points makes the two disagree; the result is then `Reduced`.
    fn cross_check(
        &self,
        integrand: &Expr,
        var: &str,
        a: f64,
        b: f64,
        tolerance: f64,
        mut result: IntegrationResult,
    ) -> IntegrationResult {
        // rounding of large values
        let allowed = tolerance.max(1e-10 * result.value.abs());
        let f = integrand.lambdify_checked(var);
        let map = IntervalMap::new(Bound::Finite(a), Bound::Finite(b));
        let discrepancy = match GaussLegendreRule::new(allowed)
            .with_degree(self.gauss_degree)
            .integrate(map.integrand(&f), a, b)
        {
            Ok(report) => {
                result.evaluations += report.evaluations;
                let discrepancy = (report.value - result.value).abs();
                if report.confidence == Confidence::Converged
                    && discrepancy <= allowed + report.error_estimate
                {
                    return result;
                }
                discrepancy.max(report.error_estimate)
            }
            Err(e) => {
                debug!("quadrature check failed: {}", e);
                f64::INFINITY
            }
        };
        warn!(
            "closed form {} on [{}, {}] is not confirmed by quadrature (difference {:e})",
            result.value, a, b, discrepancy
        );
        result.confidence = Confidence::Reduced;
        result.error_estimate = discrepancy;
        result
    }

    /// the integrand must be defined on an even grid over `[a, b]`
    fn probe(&self, integrand: &Expr, var: &str, a: f64, b: f64) -> Result<(), IntegrationError> {
        let f = integrand.lambdify_checked(var);
        let steps = self.probe_points.max(2) - 1;
        for i in 0..=steps {
            let x = a + (b - a) * (i as f64) / (steps as f64);
            f(x).map_err(|e| IntegrationError::at(x, e))?;
        }
        Ok(())
    }

    /// `F(b) - F(a)` when the strategy chain finds a closed form `F`
    fn fundamental_theorem(
        &self,
        integrand: &Expr,
        var: &str,
        a: f64,
        b: f64,
    ) -> Result<Option<IntegrationResult>, IntegrationError> {
        let Some((antiderivative, strategy)) = closed_form(integrand, var) else {
            return Ok(None);
        };
        let upper = antiderivative
            .eval_at(var, b)
            .map_err(|e| IntegrationError::at(b, e))?;
        let lower = antiderivative
            .eval_at(var, a)
            .map_err(|e| IntegrationError::at(a, e))?;
        debug!("F(x) = {} from {}", antiderivative, strategy);
        Ok(Some(IntegrationResult {
            value: upper - lower,
            confidence: Confidence::Converged,
            method: IntegrationMethod::Symbolic,
            evaluations: self.probe_points + 2,
            deepest_level: 0,
            error_estimate: 0.0,
            antiderivative: Some(Antiderivative::Closed {
                expr: antiderivative,
                strategy,
            }),
        }))
    }

    fn simpson(
        &self,
        integrand: &Expr,
        request: &IntegrationRequest,
        lower: Bound,
        upper: Bound,
    ) -> Result<IntegrationResult, IntegrationError> {
        let f = integrand.lambdify_checked(&request.variable);
        let map = IntervalMap::new(lower, upper);
        let (from, to) = map.interval();
        let report = AdaptiveSimpson::new(request.tolerance)
            .with_max_depth(request.max_depth)
            .with_max_evaluations(self.max_evaluations)
            .integrate(map.integrand(&f), from, to)?;
        Ok(IntegrationResult {
            value: report.value,
            confidence: report.confidence,
            method: IntegrationMethod::AdaptiveSimpson,
            evaluations: report.evaluations,
            deepest_level: report.deepest_level,
            error_estimate: report.error_estimate,
            antiderivative: None,
        })
    }

    fn gauss(
        &self,
        integrand: &Expr,
        request: &IntegrationRequest,
        lower: Bound,
        upper: Bound,
    ) -> Result<IntegrationResult, IntegrationError> {
        let f = integrand.lambdify_checked(&request.variable);
        let map = IntervalMap::new(lower, upper);
        let (from, to) = map.interval();
        let report = GaussLegendreRule::new(request.tolerance)
            .with_degree(self.gauss_degree)
            .integrate(map.integrand(&f), from, to)?;
        Ok(IntegrationResult {
            value: report.value,
            confidence: report.confidence,
            method: IntegrationMethod::GaussLegendre,
            evaluations: report.evaluations,
            deepest_level: 0,
            error_estimate: report.error_estimate,
            antiderivative: None,
        })
    }
}

/// Definite integral by adaptive Simpson quadrature with the default depth cap.
pub fn integrate_definite(
    expression: &str,
    variable: &str,
    lower: Bound,
    upper: Bound,
    tolerance: f64,
) -> Result<IntegrationResult, IntegrationError> {
    let request = IntegrationRequest::new(expression, variable, lower, upper)
        .with_tolerance(tolerance)
        .with_method(IntegrationMethod::AdaptiveSimpson);
    Integrator::new().solve(&request)
}

/// Value of `expression` at `variable = value`.
pub fn evaluate(expression: &str, variable: &str, value: f64) -> Result<f64, IntegrationError> {
    if !value.is_finite() {
        return Err(IntegrationError::InvalidArgument(format!(
            "cannot evaluate at non-finite value {}",
            value
        )));
    }
    let expr = parse_integrand(expression, variable)?;
    expr.eval_at(variable, value)
        .map_err(|e| IntegrationError::at(value, e))
}

/// Antiderivative of `expression`: a closed form or the unevaluated integral.
pub fn integrate_indefinite(expression: &str, variable: &str) -> Result<Antiderivative, IntegrationError> {
    let expr = parse_integrand(expression, variable)?;
    Ok(find_antiderivative(&expr, variable))
}
