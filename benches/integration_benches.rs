use RustedIntegral::numerical::definite_integral::{IntegrationMethod, IntegrationRequest, Integrator};
use RustedIntegral::numerical::improper::Bound;
use RustedIntegral::symbolic::symbolic_engine::Expr;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_gaussian_over_real_line(c: &mut Criterion) {
    let integrator = Integrator::new();
    let mut group = c.benchmark_group("exp(-x^2) on (-inf, inf)");
    for method in [IntegrationMethod::AdaptiveSimpson, IntegrationMethod::GaussLegendre] {
        let request = IntegrationRequest::new("exp(-x^2)", "x", Bound::NegInfinity, Bound::PosInfinity)
            .with_tolerance(1e-6)
            .with_method(method);
        group.bench_function(method.to_string(), |b| {
            b.iter(|| integrator.solve(black_box(&request)))
        });
    }
    group.finish();
}

fn bench_closed_form(c: &mut Criterion) {
    let integrator = Integrator::new();
    let request = IntegrationRequest::new("3*x^2 + 2*x", "x", Bound::Finite(0.0), Bound::Finite(1.0));
    c.bench_function("polynomial, closed form", |b| {
        b.iter(|| integrator.solve(black_box(&request)))
    });
}

fn bench_checked_lambdify(c: &mut Criterion) {
    let f = Expr::parse_expression("sqrt(1 - x^2) * exp(-x) + ln(1 + x)")
        .unwrap()
        .lambdify_checked("x");
    c.bench_function("checked closure, 1000 points", |b| {
        b.iter(|| {
            (0..1000)
                .map(|i| f(black_box(i as f64 / 1000.0)).unwrap_or(0.0))
                .sum::<f64>()
        })
    });
}

criterion_group!(benches, bench_closed_form, bench_gaussian_over_real_line, bench_checked_lambdify);
criterion_main!(benches);
