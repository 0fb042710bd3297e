//! Definite integrals with every method, finite and infinite bounds.
//! cargo run --example numerical_integration
use RustedIntegral::Utils::logger::init_logger;
use RustedIntegral::numerical::definite_integral::{IntegrationMethod, IntegrationRequest, Integrator};
use RustedIntegral::numerical::improper::Bound;
use simplelog::LevelFilter;
use strum::IntoEnumIterator;

fn main() {
    init_logger(LevelFilter::Info, false);
    let integrator = Integrator::new();
    let problems = [
        ("sqrt(1 - x^2)", Bound::Finite(0.0), Bound::Finite(1.0)),
        ("exp(-x^2)", Bound::NegInfinity, Bound::PosInfinity),
        ("1/x^2", Bound::Finite(1.0), Bound::PosInfinity),
        ("log(x)", Bound::Finite(1.0), Bound::Finite(10.0)),
    ];
    for (expression, lower, upper) in problems {
        for method in IntegrationMethod::iter() {
            let request = IntegrationRequest::new(expression, "x", lower, upper)
                .with_tolerance(1e-8)
                .with_method(method);
            match integrator.solve(&request) {
                Ok(result) => println!(
                    "∫ {} on [{}, {}] with {}: {} ({}, {} evaluations)",
                    expression, lower, upper, method, result.value, result.confidence, result.evaluations
                ),
                Err(e) => println!("∫ {} on [{}, {}] with {}: {}", expression, lower, upper, method, e),
            }
        }
    }
    // a pole inside the interval
    let request = IntegrationRequest::new("1/x", "x", Bound::Finite(-1.0), Bound::Finite(1.0));
    println!("{:?}", integrator.solve(&request));
}
