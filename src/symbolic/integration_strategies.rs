//! Ordered chain of antiderivative strategies.
//!
//! The chain tries, in order:
//! 1. `RuleTable`: the tree rules of `Expr::integrate`;
//! 2. `PatternTable`: the anchored text patterns of `pattern_table`;
//! 3. `Unevaluated`: always succeeds with the integral sign itself.
//!
//! Every strategy reports a tagged `StrategyOutcome`, so the caller sees which one
//! produced the answer and the definite integrator can tell a closed form from a
//! symbolic placeholder.
use crate::symbolic::pattern_table::match_pattern;
use crate::symbolic::symbolic_engine::Expr;
use log::{debug, info};
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Strategy {
    RuleTable,
    PatternTable,
    Unevaluated,
}

/// Result of the indefinite integration of one integrand.
#[derive(Debug, Clone, PartialEq)]
pub enum Antiderivative {
    /// closed form, constant of integration left out
    Closed { expr: Expr, strategy: Strategy },
    /// no rule applies: `∫ integrand d(variable)`
    Unevaluated { integrand: Expr, variable: String },
}

impl Antiderivative {
    pub fn is_closed(&self) -> bool {
        matches!(self, Antiderivative::Closed { .. })
    }

    pub fn closed_form(&self) -> Option<&Expr> {
        match self {
            Antiderivative::Closed { expr, .. } => Some(expr),
            Antiderivative::Unevaluated { .. } => None,
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            Antiderivative::Closed { strategy, .. } => *strategy,
            Antiderivative::Unevaluated { .. } => Strategy::Unevaluated,
        }
    }
}

impl fmt::Display for Antiderivative {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Antiderivative::Closed { expr, .. } => write!(f, "{} + C", expr),
            Antiderivative::Unevaluated {
                integrand,
                variable,
            } => write!(f, "∫({}) d{}", integrand, variable),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StrategyOutcome {
    Found(Antiderivative),
    NoMatch,
}

impl Strategy {
    /// Runs this single strategy on `integrand`.
    pub fn attempt(self, integrand: &Expr, var: &str) -> StrategyOutcome {
        let closed = |expr: Expr| {
            StrategyOutcome::Found(Antiderivative::Closed {
                expr: expr.simplify(),
                strategy: self,
            })
        };
        match self {
            Strategy::RuleTable => match integrand.integrate(var) {
                Ok(expr) => closed(expr),
                Err(reason) => {
                    debug!("rule table: {}", reason);
                    StrategyOutcome::NoMatch
                }
            },
            Strategy::PatternTable => match match_pattern(&integrand.to_string(), var) {
                Some((name, expr)) => {
                    debug!("pattern table: rule '{}'", name);
                    closed(expr)
                }
                None => StrategyOutcome::NoMatch,
            },
            Strategy::Unevaluated => StrategyOutcome::Found(Antiderivative::Unevaluated {
                integrand: integrand.clone(),
                variable: var.to_string(),
            }),
        }
    }
}

/// Walks the strategy chain and returns the first answer.
pub fn find_antiderivative(integrand: &Expr, var: &str) -> Antiderivative {
    for strategy in Strategy::iter() {
        if let StrategyOutcome::Found(result) = strategy.attempt(integrand, var) {
            info!("∫ {} d{} = {} [{}]", integrand, var, result, strategy);
            return result;
        }
    }
    Antiderivative::Unevaluated {
        integrand: integrand.clone(),
        variable: var.to_string(),
    }
}

/// Like `find_antiderivative`, but only closed forms count.
pub fn closed_form(integrand: &Expr, var: &str) -> Option<(Expr, Strategy)> {
    match find_antiderivative(integrand, var) {
        Antiderivative::Closed { expr, strategy } => Some((expr, strategy)),
        Antiderivative::Unevaluated { .. } => None,
    }
}
