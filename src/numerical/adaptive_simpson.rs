//! # Adaptive Simpson quadrature
//!
//! The interval is split in halves until the two half-panel Simpson estimates agree
//! with the whole-panel estimate:
//!
//! ```text
//! S(a,b) = (b - a)/6 * (f(a) + 4 f(m) + f(b)),   m = (a + b)/2
//! accept  left + right + (left + right - S)/15   when |left + right - S| <= 15 tol
//! ```
//!
//! otherwise each half is refined with `tol/2`. Function values at the shared points are
//! passed down, so every abscissa is evaluated once.
//!
//! Refinement of a panel stops early when
//! - the recursion reaches `max_depth`,
//! - the panel is too narrow to be split in floating point,
//! - the evaluation budget is spent.
//! The panel then keeps its current estimate and the result is `Confidence::Reduced`.
//! Any failed evaluation aborts the whole integration.
use crate::errors::{DomainError, IntegrationError};
use log::{debug, warn};
use strum_macros::Display;

pub const DEFAULT_MAX_DEPTH: usize = 50;
pub const DEFAULT_MAX_EVALUATIONS: usize = 1_000_000;

/// Whether the requested tolerance was reached everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Confidence {
    Converged,
    Reduced,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimpsonReport {
    pub value: f64,
    pub confidence: Confidence,
    /// number of integrand evaluations
    pub evaluations: usize,
    /// deepest refinement level reached, the whole interval is level 0
    pub deepest_level: usize,
    /// panels that stopped refining before meeting their tolerance
    pub capped_panels: usize,
    /// sum of the accepted |left + right - S| / 15
    pub error_estimate: f64,
}

#[derive(Debug, Clone)]
pub struct AdaptiveSimpson {
    pub tolerance: f64,
    pub max_depth: usize,
    pub max_evaluations: usize,
}

impl AdaptiveSimpson {
    pub fn new(tolerance: f64) -> Self {
        AdaptiveSimpson {
            tolerance,
            max_depth: DEFAULT_MAX_DEPTH,
            max_evaluations: DEFAULT_MAX_EVALUATIONS,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_evaluations(mut self, max_evaluations: usize) -> Self {
        self.max_evaluations = max_evaluations;
        self
    }

    /// Integrates `f` over `[a, b]`, `a < b`.
    pub fn integrate<F>(&self, f: F, a: f64, b: f64) -> Result<SimpsonReport, IntegrationError>
    where
        F: Fn(f64) -> Result<f64, IntegrationError>,
    {
        let mut run = Run {
            f: &f,
            settings: self,
            evaluations: 0,
            deepest_level: 0,
            capped_panels: 0,
            error_estimate: 0.0,
        };
        let m = 0.5 * (a + b);
        let fa = run.eval(a)?;
        let fm = run.eval(m)?;
        let fb = run.eval(b)?;
        let whole = simpson(a, b, fa, fm, fb);
        let value = run.refine(
            Panel {
                a,
                m,
                b,
                fa,
                fm,
                fb,
                whole,
            },
            self.tolerance,
            1,
        )?;
        let confidence = if run.capped_panels == 0 {
            Confidence::Converged
        } else {
            warn!(
                "adaptive Simpson: {} panel(s) on [{}, {}] stopped before reaching tolerance {}",
                run.capped_panels, a, b, self.tolerance
            );
            Confidence::Reduced
        };
        debug!(
            "adaptive Simpson: {} evaluations, deepest level {}",
            run.evaluations, run.deepest_level
        );
        Ok(SimpsonReport {
            value,
            confidence,
            evaluations: run.evaluations,
            deepest_level: run.deepest_level,
            capped_panels: run.capped_panels,
            error_estimate: run.error_estimate,
        })
    }
}

#[inline]
fn simpson(a: f64, b: f64, fa: f64, fm: f64, fb: f64) -> f64 {
    (b - a) / 6.0 * (fa + 4.0 * fm + fb)
}

/// a panel with its three samples and Simpson estimate
#[derive(Clone, Copy)]
struct Panel {
    a: f64,
    m: f64,
    b: f64,
    fa: f64,
    fm: f64,
    fb: f64,
    whole: f64,
}

struct Run<'a, F> {
    f: &'a F,
    settings: &'a AdaptiveSimpson,
    evaluations: usize,
    deepest_level: usize,
    capped_panels: usize,
    error_estimate: f64,
}

impl<'a, F> Run<'a, F>
where
    F: Fn(f64) -> Result<f64, IntegrationError>,
{
    fn eval(&mut self, x: f64) -> Result<f64, IntegrationError> {
        self.evaluations += 1;
        (self.f)(x)
    }

    fn refine(&mut self, p: Panel, tol: f64, level: usize) -> Result<f64, IntegrationError> {
        let lm = 0.5 * (p.a + p.m);
        let rm = 0.5 * (p.m + p.b);
        if !(p.a < lm && lm < p.m && p.m < rm && rm < p.b) {
            // no room left between the abscissas
            self.capped_panels += 1;
            return Ok(p.whole);
        }
        let flm = self.eval(lm)?;
        let frm = self.eval(rm)?;
        self.deepest_level = self.deepest_level.max(level);

        let left = simpson(p.a, p.m, p.fa, flm, p.fm);
        let right = simpson(p.m, p.b, p.fm, frm, p.fb);
        let sum = left + right;
        if !sum.is_finite() {
            return Err(IntegrationError::at(p.m, DomainError::NonFinite));
        }
        let delta = sum - p.whole;
        let estimate = sum + delta / 15.0;
        if delta.abs() <= 15.0 * tol {
            self.error_estimate += delta.abs() / 15.0;
            return Ok(estimate);
        }
        if level >= self.settings.max_depth || self.evaluations >= self.settings.max_evaluations {
            self.capped_panels += 1;
            self.error_estimate += delta.abs() / 15.0;
            return Ok(estimate);
        }
        let left_panel = Panel {
            a: p.a,
            m: lm,
            b: p.m,
            fa: p.fa,
            fm: flm,
            fb: p.fm,
            whole: left,
        };
        let right_panel = Panel {
            a: p.m,
            m: rm,
            b: p.b,
            fa: p.fm,
            fm: frm,
            fb: p.fb,
            whole: right,
        };
        let left_value = self.refine(left_panel, 0.5 * tol, level + 1)?;
        let right_value = self.refine(right_panel, 0.5 * tol, level + 1)?;
        Ok(left_value + right_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn checked(f: fn(f64) -> f64) -> impl Fn(f64) -> Result<f64, IntegrationError> {
        move |x| Ok(f(x))
    }

    #[test]
    fn test_exact_for_cubics() {
        let report = AdaptiveSimpson::new(1e-10)
            .integrate(checked(|x| x * x * x - 2.0 * x), 0.0, 2.0)
            .unwrap();
        assert_abs_diff_eq!(report.value, 0.0, epsilon = 1e-14);
        assert_eq!(report.confidence, Confidence::Converged);
        // one refinement: 3 + 2 evaluations
        assert_eq!(report.evaluations, 5);
        assert_eq!(report.deepest_level, 1);
    }

    #[test]
    fn test_smooth_integrands() {
        let simpson = AdaptiveSimpson::new(1e-8);
        let report = simpson.integrate(checked(f64::sin), 0.0, PI).unwrap();
        assert_abs_diff_eq!(report.value, 2.0, epsilon = 1e-8);
        assert_eq!(report.confidence, Confidence::Converged);
        let report = simpson.integrate(checked(f64::exp), 0.0, 1.0).unwrap();
        assert_abs_diff_eq!(report.value, 1f64.exp() - 1.0, epsilon = 1e-8);
        assert!(report.error_estimate <= 1e-8);
    }

    #[test]
    fn test_depth_cap_reduces_confidence() {
        let report = AdaptiveSimpson::new(1e-14)
            .with_max_depth(3)
            .integrate(checked(f64::sqrt), 0.0, 1.0)
            .unwrap();
        assert_eq!(report.confidence, Confidence::Reduced);
        assert!(report.capped_panels > 0);
        assert_eq!(report.deepest_level, 3);
        assert_abs_diff_eq!(report.value, 2.0 / 3.0, epsilon = 1e-2);
    }

    #[test]
    fn test_evaluation_budget() {
        let report = AdaptiveSimpson::new(1e-15)
            .with_max_evaluations(50)
            .integrate(checked(f64::sqrt), 0.0, 1.0)
            .unwrap();
        assert_eq!(report.confidence, Confidence::Reduced);
        assert!(report.evaluations < 120);
    }

    #[test]
    fn test_collapsed_panel() {
        let a = 1.0;
        let b = a + 2.0 * f64::EPSILON;
        let report = AdaptiveSimpson::new(1e-300)
            .integrate(checked(|x| x.sin()), a, b)
            .unwrap();
        assert_eq!(report.confidence, Confidence::Reduced);
    }

    #[test]
    fn test_failure_aborts() {
        let f = |x: f64| {
            if x == 0.5 {
                Err(IntegrationError::at(x, DomainError::DivisionByZero))
            } else {
                Ok(1.0 / (x - 0.5))
            }
        };
        let err = AdaptiveSimpson::new(1e-6).integrate(f, 0.0, 1.0).unwrap_err();
        assert_eq!(err, IntegrationError::at(0.5, DomainError::DivisionByZero));
    }
}
