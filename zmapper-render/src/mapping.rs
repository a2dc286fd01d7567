use rayon::prelude::*;

use zmapper_core::{CompiledFunction, Complex, GridInput, GridLine, ParamValues};

/// Evaluate `function` over every line of `input`, one rayon task per line.
///
/// The output has exactly the shape of the input: same line order, kinds and
/// point counts.
pub fn map_grid(input: &GridInput, function: &CompiledFunction, values: &ParamValues) -> GridInput {
    let slots = function.bind(values);
    let lines = input
        .lines
        .par_iter()
        .map(|line| GridLine {
            kind: line.kind,
            points: line
                .points
                .iter()
                .map(|&z| function.eval_bound(z, &slots))
                .collect(),
        })
        .collect();
    GridInput { lines }
}

/// Evaluate `function` along an arbitrary path.
pub fn map_points(points: &[Complex], function: &CompiledFunction, values: &ParamValues) -> Vec<Complex> {
    let slots = function.bind(values);
    points
        .par_iter()
        .map(|&z| function.eval_bound(z, &slots))
        .collect()
}

pub fn count_non_finite(grid: &GridInput) -> usize {
    grid.lines
        .iter()
        .flat_map(|l| l.points.iter())
        .filter(|z| !z.is_finite())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use zmapper_core::{Formula, GridSpec};

    #[test]
    fn output_has_input_shape() {
        let spec = GridSpec {
            horizontal_lines: 3,
            vertical_lines: 5,
            points_per_line: 17,
            ..GridSpec::default()
        };
        let input = spec.sample().unwrap();
        let f = Formula::parse("exp(z)").unwrap().compile().unwrap();
        let out = map_grid(&input, &f, &ParamValues::new());
        assert_eq!(out.lines.len(), input.lines.len());
        for (a, b) in input.lines.iter().zip(&out.lines) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.points.len(), b.points.len());
        }
        assert_eq!(count_non_finite(&out), 0);
    }

    #[test]
    fn map_points_preserves_order() {
        let f = Formula::parse("2*z").unwrap().compile().unwrap();
        let pts: Vec<_> = (0..100).map(|i| Complex::from_real(i as f64)).collect();
        let out = map_points(&pts, &f, &ParamValues::new());
        for (i, v) in out.iter().enumerate() {
            assert_eq!(*v, Complex::from_real(2.0 * i as f64));
        }
    }
}
