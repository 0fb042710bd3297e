//! Fixed-order Gauss–Legendre quadrature with a two-degree cross check.
//!
//! The nodes and weights come from `gauss_quad`. The integral is computed with `degree`
//! and with `2 * degree` nodes; the finer value is returned and the difference between
//! the two is the error estimate. Gauss nodes never touch the interval ends, which makes
//! this rule a useful second opinion for integrands singular at an endpoint.
use crate::errors::IntegrationError;
use crate::numerical::adaptive_simpson::Confidence;
use gauss_quad::GaussLegendre;
use log::{debug, warn};
use std::cell::RefCell;

pub const DEFAULT_DEGREE: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct GaussReport {
    pub value: f64,
    pub confidence: Confidence,
    pub evaluations: usize,
    /// |I(2n) - I(n)|
    pub error_estimate: f64,
}

#[derive(Debug, Clone)]
pub struct GaussLegendreRule {
    pub degree: usize,
    pub tolerance: f64,
}

impl GaussLegendreRule {
    pub fn new(tolerance: f64) -> Self {
        GaussLegendreRule {
            degree: DEFAULT_DEGREE,
            tolerance,
        }
    }

    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    fn integrate_with<F>(&self, degree: usize, f: &F, a: f64, b: f64) -> Result<f64, IntegrationError>
    where
        F: Fn(f64) -> Result<f64, IntegrationError>,
    {
        let quad = GaussLegendre::new(degree).map_err(|e| {
            IntegrationError::InvalidArgument(format!(
                "Failed to create Gauss-Legendre quadrature of degree {}: {:?}",
                degree, e
            ))
        })?;
        // the quadrature wants a plain f64 closure: keep the first failure aside
        let failure: RefCell<Option<IntegrationError>> = RefCell::new(None);
        let value = quad.integrate(a, b, |x| {
            if failure.borrow().is_some() {
                return 0.0;
            }
            match f(x) {
                Ok(val) => val,
                Err(e) => {
                    *failure.borrow_mut() = Some(e);
                    0.0
                }
            }
        });
        match failure.into_inner() {
            Some(e) => Err(e),
            None => Ok(value),
        }
    }

    /// Integrates `f` over `[a, b]`.
    pub fn integrate<F>(&self, f: F, a: f64, b: f64) -> Result<GaussReport, IntegrationError>
    where
        F: Fn(f64) -> Result<f64, IntegrationError>,
    {
        let coarse = self.integrate_with(self.degree, &f, a, b)?;
        let fine = self.integrate_with(2 * self.degree, &f, a, b)?;
        let error_estimate = (fine - coarse).abs();
        let confidence = if error_estimate <= self.tolerance {
            Confidence::Converged
        } else {
            warn!(
                "Gauss-Legendre: degrees {} and {} differ by {:e} on [{}, {}]",
                self.degree,
                2 * self.degree,
                error_estimate,
                a,
                b
            );
            Confidence::Reduced
        };
        debug!("Gauss-Legendre: I({}) = {}, I({}) = {}", self.degree, coarse, 2 * self.degree, fine);
        Ok(GaussReport {
            value: fine,
            confidence,
            evaluations: 3 * self.degree,
            error_estimate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_polynomials_are_exact() {
        let rule = GaussLegendreRule::new(1e-10).with_degree(5);
        let report = rule.integrate(|x: f64| Ok(x.powi(6) - x), -1.0, 2.0).unwrap();
        // x^7/7 - x^2/2 on [-1, 2]
        let exact = (128.0 + 1.0) / 7.0 - (4.0 - 1.0) / 2.0;
        assert_abs_diff_eq!(report.value, exact, epsilon = 1e-12);
        assert_eq!(report.confidence, Confidence::Converged);
        assert_eq!(report.evaluations, 15);
    }

    #[test]
    fn test_smooth_integrand() {
        let report = GaussLegendreRule::new(1e-10)
            .integrate(|x: f64| Ok(x.sin()), 0.0, PI)
            .unwrap();
        assert_abs_diff_eq!(report.value, 2.0, epsilon = 1e-12);
        assert_eq!(report.confidence, Confidence::Converged);
    }

    #[test]
    fn test_endpoint_singularity_is_reduced() {
        // 1/sqrt(x) is integrable on [0, 1] but converges slowly under Gauss rules
        let report = GaussLegendreRule::new(1e-8)
            .integrate(|x: f64| Ok(1.0 / x.sqrt()), 0.0, 1.0)
            .unwrap();
        assert_eq!(report.confidence, Confidence::Reduced);
        assert_abs_diff_eq!(report.value, 2.0, epsilon = 0.1);
    }

    #[test]
    fn test_failure_is_reported() {
        let err = GaussLegendreRule::new(1e-8)
            .integrate(|x: f64| Err(IntegrationError::at(x, DomainError::NonFinite)), 0.0, 1.0)
            .unwrap_err();
        assert!(matches!(
            err,
            IntegrationError::Domain {
                source: DomainError::NonFinite,
                ..
            }
        ));
    }

    #[test]
    fn test_bad_degree() {
        let err = GaussLegendreRule::new(1e-8)
            .with_degree(0)
            .integrate(|x: f64| Ok(x), 0.0, 1.0)
            .unwrap_err();
        assert!(matches!(err, IntegrationError::InvalidArgument(_)));
    }
}
