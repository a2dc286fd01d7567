use zmapper_core::{Complex, Formula, GridSpec, LineKind, ParamValues, ParameterSet, SliderRange};

/// Evaluate every grid line through the formula.
fn map_grid(formula: &Formula, values: &ParamValues, spec: &GridSpec) -> Vec<Vec<Complex>> {
    let f = formula.compile().unwrap();
    let input = spec.sample().unwrap();
    input
        .lines()
        .iter()
        .map(|line| f.eval_many(&line.points, values))
        .collect()
}

fn small_grid() -> GridSpec {
    GridSpec {
        horizontal_lines: 6,
        vertical_lines: 8,
        points_per_line: 64,
        ..GridSpec::default()
    }
}

#[test]
fn identity_maps_grid_onto_itself() {
    let spec = small_grid();
    let formula = Formula::parse("z").unwrap();
    let mapped = map_grid(&formula, &ParamValues::new(), &spec);
    let input = spec.sample().unwrap();
    for (line, out) in input.lines().iter().zip(&mapped) {
        assert_eq!(&line.points, out);
    }
}

#[test]
fn parameter_change_matches_substitution() {
    let spec = small_grid();
    let formula = Formula::parse("a*sin(w*z)").unwrap();
    let mut params = ParameterSet::from_formula(&formula, SliderRange::default());
    let before_input = spec.sample().unwrap();

    params.set_value("a", Complex::new(2.0, 0.0));
    params.set_value("w", Complex::new(0.5, 0.25));
    let mapped = map_grid(&formula, &params.values(), &spec);

    let a = Complex::new(2.0, 0.0);
    let w = Complex::new(0.5, 0.25);
    for (line, out) in before_input.lines().iter().zip(&mapped) {
        for (z, fz) in line.points.iter().zip(out) {
            let expected = a * (w * *z).sin();
            assert!((expected - *fz).norm() < 1e-12);
        }
    }
    // The input pattern does not depend on parameters.
    assert_eq!(spec.sample().unwrap(), before_input);
}

#[test]
fn pole_inside_the_grid_does_not_panic() {
    // The default extent is symmetric, so z = 0 lies on the middle lines.
    let spec = GridSpec {
        horizontal_lines: 2,
        vertical_lines: 2,
        points_per_line: 3,
        ..GridSpec::default()
    };
    let formula = Formula::parse("1/z").unwrap();
    let mapped = map_grid(&formula, &ParamValues::new(), &spec);
    let non_finite = mapped.iter().flatten().filter(|v| !v.is_finite()).count();
    assert!(non_finite >= 1);
}

#[test]
fn zeta_preset_on_zeta_grid() {
    let spec = GridSpec::zeta();
    let formula = Formula::parse("zeta(k*(z - w))").unwrap();
    let mapped = map_grid(&formula, &formula.defaults().clone(), &spec);
    let input = spec.sample().unwrap();
    assert_eq!(mapped.len(), input.lines().len());
    let boundaries = input
        .lines()
        .iter()
        .filter(|l| matches!(l.kind, LineKind::Boundary(_)))
        .count();
    assert_eq!(boundaries, 4);
    // zeta(2) on the real axis, reached through the defaults k = 1, w = 0.
    let f = formula.compile().unwrap();
    let v = f.eval(Complex::from_real(2.0), &ParamValues::new());
    assert!((v.re - std::f64::consts::PI.powi(2) / 6.0).abs() < 1e-10);
}

#[test]
fn grid_spec_round_trips_through_json() {
    let spec = GridSpec::zeta();
    let json = serde_json::to_string(&spec).unwrap();
    let back: GridSpec = serde_json::from_str(&json).unwrap();
    assert_eq!(spec, back);
}
