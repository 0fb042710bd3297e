//! Flat table of textbook antiderivatives matched on the expression text.
//!
//! Each rule is an anchored regular expression over the integrand with all whitespace
//! removed; `{v}` in a template stands for the (escaped) integration variable. The
//! table covers forms the tree rules in `symbolic_integration` have no entry for
//! (`1/(1+x^2)`, `1/sqrt(1-x^2)`, ...) together with the plain elementary ones.
//! The first matching rule wins.
use crate::symbolic::symbolic_engine::Expr;
use log::debug;
use regex::{Captures, Regex};

pub struct PatternRule {
    pub name: &'static str,
    template: &'static str,
    build: fn(&Captures, Expr) -> Option<Expr>,
}

impl PatternRule {
    fn regex(&self, var: &str) -> Result<Regex, regex::Error> {
        Regex::new(&self.template.replace("{v}", &regex::escape(var)))
    }
}

fn ln_abs(expr: Expr) -> Expr {
    Expr::Ln(Expr::abs(expr.boxed()).boxed())
}

pub const PATTERN_RULES: &[PatternRule] = &[
    PatternRule {
        name: "power",
        template: r"^{v}\^(\d+)$",
        build: |caps, x| {
            let n: f64 = caps[1].parse().ok()?;
            Some(x.pow(Expr::Const(n + 1.0)) / Expr::Const(n + 1.0))
        },
    },
    PatternRule {
        name: "sine",
        template: r"^sin\({v}\)$",
        build: |_, x| Some(-Expr::cos(x.boxed())),
    },
    PatternRule {
        name: "cosine",
        template: r"^cos\({v}\)$",
        build: |_, x| Some(Expr::sin(x.boxed())),
    },
    PatternRule {
        name: "tangent",
        template: r"^(tan|tg)\({v}\)$",
        build: |_, x| Some(-ln_abs(Expr::cos(x.boxed()))),
    },
    PatternRule {
        name: "exponential",
        template: r"^(e\^{v}|exp\({v}\))$",
        build: |_, x| Some(x.exp()),
    },
    PatternRule {
        name: "reciprocal",
        template: r"^1/{v}$",
        build: |_, x| Some(ln_abs(x)),
    },
    PatternRule {
        name: "arctangent",
        template: r"^1/\((1\+{v}\^2|{v}\^2\+1)\)$",
        build: |_, x| Some(Expr::arctg(x.boxed())),
    },
    PatternRule {
        name: "arcsine",
        template: r"^1/sqrt\(1-{v}\^2\)$",
        build: |_, x| Some(Expr::arcsin(x.boxed())),
    },
    PatternRule {
        name: "arccosine",
        template: r"^-1/sqrt\(1-{v}\^2\)$",
        build: |_, x| Some(Expr::arccos(x.boxed())),
    },
    PatternRule {
        name: "hyperbolic sine",
        template: r"^sinh\({v}\)$",
        build: |_, x| Some(Expr::cosh(x.boxed())),
    },
    PatternRule {
        name: "hyperbolic cosine",
        template: r"^cosh\({v}\)$",
        build: |_, x| Some(Expr::sinh(x.boxed())),
    },
    PatternRule {
        name: "hyperbolic tangent",
        template: r"^tanh\({v}\)$",
        build: |_, x| Some(Expr::Ln(Expr::cosh(x.boxed()).boxed())),
    },
];

/// The integrand as the table sees it: whitespace removed.
pub fn normalize(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Looks `text` up in the table. Returns the rule name and the antiderivative.
pub fn match_pattern(text: &str, var: &str) -> Option<(&'static str, Expr)> {
    let normalized = normalize(text);
    for rule in PATTERN_RULES {
        let regex = match rule.regex(var) {
            Ok(regex) => regex,
            Err(e) => {
                debug!("pattern '{}' skipped: {}", rule.name, e);
                continue;
            }
        };
        if let Some(caps) = regex.captures(&normalized) {
            if let Some(expr) = (rule.build)(&caps, Expr::var(var)) {
                debug!("pattern '{}' matched {}", rule.name, normalized);
                return Some((rule.name, expr));
            }
        }
    }
    None
}
