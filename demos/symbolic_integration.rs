//! Parsing, derivatives and antiderivatives.
//! cargo run --example symbolic_integration
use RustedIntegral::numerical::definite_integral::{evaluate, integrate_indefinite};
use RustedIntegral::symbolic::symbolic_engine::Expr;

fn main() {
    for input in ["x^2", "sin(x)", "3*x^2 + 2*x", "1/(1 + x^2)", "exp(2*x + 1)", "x*sin(x)", "exp(-x^2)"] {
        match integrate_indefinite(input, "x") {
            Ok(antiderivative) => println!(
                "∫ {} dx = {}   [{}]",
                input,
                antiderivative,
                antiderivative.strategy()
            ),
            Err(e) => println!("{}: {}", input, e),
        }
    }

    let f = match Expr::parse_expression("x^3 * ln(x)") {
        Ok(f) => f,
        Err(e) => {
            println!("{}", e);
            return;
        }
    };
    println!("d/dx {} = {}", f, f.diff("x").simplify());

    for x in [2.0, 0.0, -1.0] {
        println!("sqrt(x) at {}: {:?}", x, evaluate("sqrt(x)", "x", x));
    }
    println!("{:?}", Expr::parse_expression("2 * (x + 1"));
}
