//! Error types shared by the parser, the evaluator and the integrators.
//!
//! `DomainError` is what a single evaluation of an expression can produce,
//! `IntegrationError` is what the public entry points return.
use thiserror::Error;

/// Failure of a single pointwise evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("logarithm of non-positive value {0}")]
    LogOfNonPositive(f64),
    #[error("square root of negative value {0}")]
    SqrtOfNegative(f64),
    #[error("{function} is undefined at {argument}")]
    OutOfDomain {
        function: &'static str,
        argument: f64,
    },
    #[error("result is not a finite number")]
    NonFinite,
    #[error("variable '{0}' has no value")]
    UnboundVariable(String),
}

/// Malformed expression text. `position` is a byte offset into the input.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// the integrand could not be evaluated at `point` (in the original variable)
    #[error("integrand is undefined at {point}: {source}")]
    Domain { point: f64, source: DomainError },
    #[error("tolerance must be a positive finite number, got {0}")]
    InvalidTolerance(f64),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid bound '{0}'")]
    InvalidBound(String),
    #[error("expression depends on {found:?}, but only '{expected}' is bound")]
    UnboundVariable {
        expected: String,
        found: Vec<String>,
    },
    #[error("no closed-form antiderivative found for {0}")]
    SymbolicNoMatch(String),
    #[error("unsupported request: {0}")]
    Unsupported(String),
    #[error("task file error: {0}")]
    Task(String),
}

impl IntegrationError {
    /// wraps a pointwise failure together with the abscissa it happened at
    pub fn at(point: f64, source: DomainError) -> Self {
        IntegrationError::Domain { point, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = IntegrationError::at(0.0, DomainError::DivisionByZero);
        assert_eq!(err.to_string(), "integrand is undefined at 0: division by zero");
        let err: IntegrationError = ParseError::new("unexpected ')'", 4).into();
        assert_eq!(err.to_string(), "parse error at position 4: unexpected ')'");
        assert_eq!(
            DomainError::OutOfDomain {
                function: "arcsin",
                argument: 2.0
            }
            .to_string(),
            "arcsin is undefined at 2"
        );
    }

    #[test]
    fn test_domain_error_is_source() {
        use std::error::Error as _;
        let err = IntegrationError::at(-1.0, DomainError::LogOfNonPositive(-1.0));
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("logarithm of non-positive value -1"));
    }
}
