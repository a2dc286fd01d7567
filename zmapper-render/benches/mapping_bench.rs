use criterion::{criterion_group, criterion_main, Criterion};

use zmapper_core::{Complex, Formula, GridSpec, ParamValues, ViewState};
use zmapper_render::{map_grid, rasterize};

fn bench_default_grid_mapping(c: &mut Criterion) {
    let input = GridSpec::default().sample().unwrap();
    let f = Formula::parse("a*sin(w*z) + c").unwrap();
    let function = f.compile().unwrap();
    let values = f.defaults().clone();

    c.bench_function("map_default_grid_sin", |b| {
        b.iter(|| map_grid(&input, &function, &values));
    });
}

fn bench_zeta_grid_mapping(c: &mut Criterion) {
    let input = GridSpec::zeta().sample().unwrap();
    let function = Formula::parse("zeta(z)").unwrap().compile().unwrap();
    let values = ParamValues::new();

    c.bench_function("map_zeta_grid", |b| {
        b.iter(|| map_grid(&input, &function, &values));
    });
}

fn bench_rasterize(c: &mut Criterion) {
    let input = GridSpec::default().sample().unwrap();
    let function = Formula::parse("exp(z)").unwrap().compile().unwrap();
    let output = map_grid(&input, &function, &ParamValues::new());
    let view = ViewState::new(Complex::ZERO, 0.01, 640, 480).unwrap();

    c.bench_function("rasterize_640x480", |b| {
        b.iter(|| rasterize(&output, &view, 1.0));
    });
}

criterion_group!(
    benches,
    bench_default_grid_mapping,
    bench_zeta_grid_mapping,
    bench_rasterize
);
criterion_main!(benches);
