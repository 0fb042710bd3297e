//! Integration bounds and the change of variable for infinite intervals.
//!
//! An infinite end is removed with `x = c + tan(θ)`, `dx = (1 + tan²θ) dθ`:
//!
//! | interval   | c | θ range        |
//! |------------|---|----------------|
//! | (-∞, ∞)    | 0 | [-π/2, π/2]    |
//! | [a, ∞)     | a | [0, π/2]       |
//! | (-∞, b]    | b | [-π/2, 0]      |
//!
//! At `θ = ±π/2` the double `tan(θ)` is huge but finite, so the endpoints are sampled
//! like any other point. A sample there that overflows (`exp(x)`, `cosh(x)`, `x^20` at
//! `x ≈ 1.6e16`) stands for the integrand at `x = ±∞` and is taken as its limit, 0.
//! Inside the interval an overflow is still a domain error.
use crate::errors::{DomainError, IntegrationError};
use crate::symbolic::symbolic_engine::Expr;
use std::cmp::Ordering;
use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Finite(f64),
    PosInfinity,
    NegInfinity,
}

impl Bound {
    /// the bound as an extended real
    pub fn value(&self) -> f64 {
        match self {
            Bound::Finite(val) => *val,
            Bound::PosInfinity => f64::INFINITY,
            Bound::NegInfinity => f64::NEG_INFINITY,
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Bound::Finite(_))
    }

    /// NaN has no place on the extended real line
    pub fn validate(&self) -> Result<(), IntegrationError> {
        match self {
            Bound::Finite(val) if val.is_nan() => Err(IntegrationError::InvalidBound(val.to_string())),
            _ => Ok(()),
        }
    }
}

impl PartialOrd for Bound {
    fn partial_cmp(&self, other: &Bound) -> Option<Ordering> {
        self.value().partial_cmp(&other.value())
    }
}

impl From<f64> for Bound {
    fn from(val: f64) -> Self {
        if val == f64::INFINITY {
            Bound::PosInfinity
        } else if val == f64::NEG_INFINITY {
            Bound::NegInfinity
        } else {
            Bound::Finite(val)
        }
    }
}

impl FromStr for Bound {
    type Err = IntegrationError;

    /// `inf`, `+inf`, `infinity`, `∞` and their negatives, or any expression without
    /// variables (`2`, `-1.5e3`, `pi/2`).
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "inf" | "+inf" | "infinity" | "+infinity" | "∞" | "+∞" => {
                return Ok(Bound::PosInfinity);
            }
            "-inf" | "-infinity" | "-∞" => return Ok(Bound::NegInfinity),
            _ => {}
        }
        let invalid = || IntegrationError::InvalidBound(trimmed.to_string());
        let expr = Expr::parse_expression(trimmed).map_err(|_| invalid())?;
        let val = expr.eval_constant().map_err(|_| invalid())?;
        Ok(Bound::Finite(val))
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Bound::Finite(val) => write!(f, "{}", val),
            Bound::PosInfinity => write!(f, "inf"),
            Bound::NegInfinity => write!(f, "-inf"),
        }
    }
}

/// Map from the integration parameter `t` back to the original variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntervalMap {
    /// `x = t` on `[from, to]`
    Identity { from: f64, to: f64 },
    /// `x = offset + tan(t)` on `[from, to]` ⊂ `[-π/2, π/2]`
    Tangent { offset: f64, from: f64, to: f64 },
}

impl IntervalMap {
    /// Expects `lower < upper`.
    pub fn new(lower: Bound, upper: Bound) -> IntervalMap {
        match (lower, upper) {
            (Bound::Finite(a), Bound::Finite(b)) => IntervalMap::Identity { from: a, to: b },
            (Bound::Finite(a), _) => IntervalMap::Tangent {
                offset: a,
                from: 0.0,
                to: FRAC_PI_2,
            },
            (_, Bound::Finite(b)) => IntervalMap::Tangent {
                offset: b,
                from: -FRAC_PI_2,
                to: 0.0,
            },
            _ => IntervalMap::Tangent {
                offset: 0.0,
                from: -FRAC_PI_2,
                to: FRAC_PI_2,
            },
        }
    }

    /// parameter interval the quadrature runs over
    pub fn interval(&self) -> (f64, f64) {
        match *self {
            IntervalMap::Identity { from, to } => (from, to),
            IntervalMap::Tangent { from, to, .. } => (from, to),
        }
    }

    /// point in the original variable
    pub fn point(&self, t: f64) -> f64 {
        match *self {
            IntervalMap::Identity { .. } => t,
            IntervalMap::Tangent { offset, .. } => offset + t.tan(),
        }
    }

    /// Integrand in `t`: `f(x(t)) * dx/dt`. Failures carry the point in the original
    /// variable.
    pub fn integrand<'a, F>(self, f: &'a F) -> impl Fn(f64) -> Result<f64, IntegrationError> + 'a
    where
        F: Fn(f64) -> Result<f64, DomainError> + ?Sized,
    {
        move |t: f64| {
            let x = self.point(t);
            let val = match self {
                IntervalMap::Identity { .. } => f(x),
                IntervalMap::Tangent { .. } => {
                    let tan = t.tan();
                    f(x).and_then(|fx| {
                        let val = fx * (1.0 + tan * tan);
                        if val.is_finite() { Ok(val) } else { Err(DomainError::NonFinite) }
                    })
                }
            };
            match val {
                Err(DomainError::NonFinite) if self.at_infinity(t) => Ok(0.0),
                val => val.map_err(|e| IntegrationError::at(x, e)),
            }
        }
    }

    /// `t` is an end of the parameter interval that maps to an infinite bound
    pub fn at_infinity(&self, t: f64) -> bool {
        match *self {
            IntervalMap::Identity { .. } => false,
            IntervalMap::Tangent { .. } => t.abs() >= FRAC_PI_2,
        }
    }
}
