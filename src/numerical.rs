/// Bounds of integration, finite or infinite, and the map of an interval onto a finite one
pub mod improper;
/// Adaptive Simpson quadrature with a depth cap and an evaluation budget
///  Example#1
/// ```
/// use RustedIntegral::numerical::adaptive_simpson::{AdaptiveSimpson, Confidence};
/// let quad = AdaptiveSimpson::new(1e-8);
/// let report = quad.integrate(|x: f64| Ok(x.sin()), 0.0, std::f64::consts::PI).unwrap();
/// assert!((report.value - 2.0).abs() < 1e-8);
/// assert_eq!(report.confidence, Confidence::Converged);
/// ```
pub mod adaptive_simpson;
/// Gauss-Legendre quadrature, a fixed rule checked against one of double degree
pub mod gauss_legendre;
/// Definite and indefinite integrals of formulas given as text
///  Example#1
/// ```
/// use RustedIntegral::numerical::definite_integral::integrate_definite;
/// use RustedIntegral::numerical::improper::Bound;
/// let result = integrate_definite("exp(-x^2)", "x", Bound::NegInfinity, Bound::PosInfinity, 1e-6).unwrap();
/// println!("value = {}, confidence = {}", result.value, result.confidence);
/// ```
pub mod definite_integral;
