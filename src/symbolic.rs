#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedIntegral::symbolic::symbolic_engine::Expr;
/// let input = "3*x^2 + 2*x";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// // parse errors carry the position of the offending character
/// let err = Expr::parse_expression("sin(x").unwrap_err();
/// println!("{} at {}", err.message, err.position);
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) defines the expression tree of a formula of one variable
/// 2) builds expressions with the usual operators
/// 3) turns a symbolic expression into a string expression for printing and control results
///# Example#
/// ```
/// use RustedIntegral::symbolic::symbolic_engine::Expr;
/// let x = Expr::var("x");
/// let f = x.clone().pow(Expr::Const(2.0)) + x.exp();
/// assert_eq!(f.to_string(), "x^2 + exp(x)");
/// ```
pub mod symbolic_engine;
/// evaluation with domain checking: a value or the reason the point is outside the domain
///# Example#
/// ```
/// use RustedIntegral::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("ln(x)").unwrap();
/// assert!(f.eval_at("x", -1.0).is_err());
/// // the same checks, compiled once into a closure
/// let f = f.lambdify_checked("x");
/// assert_eq!(f(1.0), Ok(0.0));
/// ```
pub mod symbolic_eval;
/// algebraic simplification: constant folding, neutral elements, like terms
pub mod symbolic_simplify;
/// symbolic derivatives
///# Example#
/// ```
/// use RustedIntegral::symbolic::symbolic_engine::Expr;
/// let f = Expr::parse_expression("x^2 + sin(x)").unwrap();
/// let df_dx = f.diff("x").simplify();
/// println!("df_dx = {}", df_dx);
/// ```
pub mod symbolic_derivatives;
///______________________________________________________________________________________________________________________________________________
/// table of closed-form antiderivatives on the expression tree
pub mod symbolic_integration;
/// table of closed-form antiderivatives matched on the text of the integrand
pub mod pattern_table;
/// chain of integration strategies: rule table, pattern table, unevaluated integral
///# Example#
/// ```
/// use RustedIntegral::symbolic::symbolic_engine::Expr;
/// use RustedIntegral::symbolic::integration_strategies::find_antiderivative;
/// let f = Expr::parse_expression("1/(1 + x^2)").unwrap();
/// let antiderivative = find_antiderivative(&f, "x");
/// println!("{}", antiderivative);
/// assert!(antiderivative.is_closed());
/// ```
pub mod integration_strategies;
