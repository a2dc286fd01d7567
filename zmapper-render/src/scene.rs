//! The render loop: formula, parameters and grid in, mapped frame out.
//!
//! Every setter bumps a revision counter; [`MappingScene::on_state_changed`]
//! recomputes only when the latest frame was built from older revisions.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use zmapper_core::{
    CompiledFunction, Complex, Formula, GridInput, GridPattern, GridSpec, ParameterSet,
    SliderRange,
};

use crate::mapping::{count_non_finite, map_grid};

/// Revision counters of the inputs a frame depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Revisions {
    pub formula: u64,
    pub params: u64,
    pub grid: u64,
}

/// Input pattern and its image, as published to both panes.
#[derive(Debug, Clone)]
pub struct MappedFrame {
    pub input: Arc<GridInput>,
    pub output: Arc<GridInput>,
    pub revisions: Revisions,
    /// Output is the identity image of the input.
    pub show_input: bool,
    pub elapsed: Duration,
    /// Output points that hit a pole or overflowed.
    pub non_finite: usize,
}

pub struct MappingScene {
    formula: Formula,
    function: CompiledFunction,
    params: ParameterSet,
    grid: GridSpec,
    input: Arc<GridInput>,
    input_revision: u64,
    show_input: bool,
    revisions: Revisions,
    frame: MappedFrame,
}

impl MappingScene {
    pub fn new(source: &str, grid: GridSpec, default_range: SliderRange) -> crate::Result<Self> {
        let formula = Formula::parse(source)?;
        let function = formula.compile()?;
        let params = ParameterSet::from_formula(&formula, default_range);
        let input = Arc::new(grid.sample()?);
        let frame = evaluate(&input, &function, &params, false, Revisions::default());
        info!(formula = %formula, "mapping scene ready");
        Ok(Self {
            formula,
            function,
            params,
            grid,
            input,
            input_revision: 0,
            show_input: false,
            revisions: Revisions::default(),
            frame,
        })
    }

    /// Parse and compile `source`; on failure the current formula stays.
    pub fn set_formula(&mut self, source: &str) -> crate::Result<()> {
        let formula = Formula::parse(source)?;
        self.install(formula)
    }

    /// Replace the formula by its derivative in `z`.
    pub fn differentiate(&mut self) -> crate::Result<()> {
        let derived = self.formula.derivative()?;
        self.install(derived)
    }

    fn install(&mut self, formula: Formula) -> crate::Result<()> {
        let function = formula.compile()?;
        self.params.sync_with(&formula);
        info!(formula = %formula, params = ?formula.params(), "formula changed");
        self.formula = formula;
        self.function = function;
        self.revisions.formula += 1;
        Ok(())
    }

    /// Returns `false` if `name` is not a parameter of the current formula.
    pub fn set_parameter(&mut self, name: &str, value: Complex) -> bool {
        let changed = self.params.get(name).is_some_and(|p| p.value != value);
        if !self.params.set_value(name, value) {
            return false;
        }
        if changed {
            self.revisions.params += 1;
        }
        true
    }

    /// Replace the slider ranges of one parameter, snapping its value into
    /// the new ranges.
    pub fn set_parameter_ranges(
        &mut self,
        name: &str,
        re_range: SliderRange,
        im_range: SliderRange,
    ) -> bool {
        let Some(p) = self.params.get_mut(name) else {
            return false;
        };
        p.re_range = re_range;
        p.im_range = im_range;
        let snapped = Complex::new(re_range.snap(p.value.re), im_range.snap(p.value.im));
        if snapped != p.value {
            p.value = snapped;
            self.revisions.params += 1;
        }
        true
    }

    pub fn reset_parameters(&mut self) {
        self.params.reset(&self.formula);
        self.revisions.params += 1;
    }

    pub fn set_default_range(&mut self, range: SliderRange) {
        self.params.set_default_range(range);
    }

    /// Validate and install a new grid; on failure the current grid stays.
    pub fn set_grid(&mut self, spec: GridSpec) -> crate::Result<()> {
        spec.validate()?;
        if spec != self.grid {
            self.grid = spec;
            self.revisions.grid += 1;
        }
        Ok(())
    }

    pub fn set_pattern(&mut self, pattern: GridPattern) -> crate::Result<()> {
        let spec = GridSpec {
            pattern,
            ..self.grid
        };
        self.set_grid(spec)
    }

    /// Show the identity image in the output pane instead of `f`.
    pub fn set_show_input(&mut self, show: bool) {
        if show != self.show_input {
            self.show_input = show;
            self.revisions.formula += 1;
        }
    }

    pub fn toggle_show_input(&mut self) {
        self.set_show_input(!self.show_input);
    }

    /// Bring the frame up to date with the current state and return it.
    pub fn on_state_changed(&mut self) -> crate::Result<&MappedFrame> {
        if self.frame.revisions == self.revisions {
            return Ok(&self.frame);
        }
        if self.input_revision != self.revisions.grid {
            self.input = Arc::new(self.grid.sample()?);
            self.input_revision = self.revisions.grid;
        }
        self.frame = evaluate(
            &self.input,
            &self.function,
            &self.params,
            self.show_input,
            self.revisions,
        );
        debug!(
            lines = self.frame.output.lines.len(),
            points = self.frame.output.point_count(),
            non_finite = self.frame.non_finite,
            elapsed_ms = self.frame.elapsed.as_secs_f64() * 1000.0,
            "recomputed mapping"
        );
        Ok(&self.frame)
    }

    /// Whether `frame` reflects the current formula, parameters and grid.
    pub fn is_current(&self, frame: &MappedFrame) -> bool {
        frame.revisions == self.revisions
    }

    /// Latest computed frame, possibly stale until the next
    /// [`on_state_changed`](Self::on_state_changed).
    pub fn frame(&self) -> &MappedFrame {
        &self.frame
    }

    /// Pane title, e.g. `f(z) = a*sin(w*z)`.
    pub fn title(&self) -> String {
        if self.show_input {
            "f(z) = z".to_string()
        } else {
            format!("f(z) = {}", self.formula)
        }
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    pub fn function(&self) -> &CompiledFunction {
        &self.function
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn show_input(&self) -> bool {
        self.show_input
    }

    pub fn revisions(&self) -> Revisions {
        self.revisions
    }
}

fn evaluate(
    input: &Arc<GridInput>,
    function: &CompiledFunction,
    params: &ParameterSet,
    show_input: bool,
    revisions: Revisions,
) -> MappedFrame {
    let start = Instant::now();
    let output = if show_input {
        Arc::clone(input)
    } else {
        Arc::new(map_grid(input, function, &params.values()))
    };
    let non_finite = count_non_finite(&output);
    MappedFrame {
        input: Arc::clone(input),
        output,
        revisions,
        show_input,
        elapsed: start.elapsed(),
        non_finite,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid() -> GridSpec {
        GridSpec {
            horizontal_lines: 4,
            vertical_lines: 4,
            points_per_line: 16,
            ..GridSpec::default()
        }
    }

    fn scene(src: &str) -> MappingScene {
        MappingScene::new(src, small_grid(), SliderRange::default()).unwrap()
    }

    #[test]
    fn unchanged_state_reuses_frame() {
        let mut s = scene("z^2");
        let first = Arc::clone(&s.on_state_changed().unwrap().output);
        let second = Arc::clone(&s.on_state_changed().unwrap().output);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn parameter_change_keeps_input() {
        let mut s = scene("a*z");
        let before = s.on_state_changed().unwrap().clone();
        assert!(s.set_parameter("a", Complex::new(0.0, 1.0)));
        assert!(!s.is_current(&before));
        let after = s.on_state_changed().unwrap().clone();
        assert!(Arc::ptr_eq(&before.input, &after.input));
        // Multiplying by i rotates every point a quarter turn.
        let z = after.input.lines[0].points[3];
        let w = after.output.lines[0].points[3];
        assert!((w - Complex::new(-z.im, z.re)).norm() < 1e-12);
    }

    #[test]
    fn invalid_formula_keeps_previous_state() {
        let mut s = scene("sin(z)");
        assert!(s.set_formula("sin(").is_err());
        assert!(s.set_formula("a + b").is_err());
        assert!(s.set_formula("nope(z)").is_err());
        assert_eq!(s.formula().source(), "sin(z)");
        let frame = s.on_state_changed().unwrap();
        assert_eq!(frame.revisions, Revisions::default());
    }

    #[test]
    fn invalid_grid_is_rejected() {
        let mut s = scene("z");
        let bad = GridSpec {
            points_per_line: 0,
            ..small_grid()
        };
        assert!(s.set_grid(bad).is_err());
        assert_eq!(*s.grid(), small_grid());
    }

    #[test]
    fn grid_change_resamples_input() {
        let mut s = scene("z");
        let before = s.on_state_changed().unwrap().input.point_count();
        s.set_grid(GridSpec {
            points_per_line: 32,
            ..small_grid()
        })
        .unwrap();
        let after = s.on_state_changed().unwrap().input.point_count();
        assert_eq!(after, before * 2);
    }

    #[test]
    fn show_input_gives_identity_output() {
        let mut s = scene("exp(z)");
        s.toggle_show_input();
        let frame = s.on_state_changed().unwrap();
        assert!(frame.show_input);
        assert_eq!(frame.input.lines, frame.output.lines);
        assert_eq!(s.title(), "f(z) = z");
    }

    #[test]
    fn differentiate_updates_title_and_params() {
        let mut s = scene("a*sin(w*z) + c");
        s.differentiate().unwrap();
        assert_eq!(s.title(), "f(z) = a*cos(w*z)*w");
        let names: Vec<_> = s.params().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "w"]);
    }

    #[test]
    fn unknown_parameter_is_reported() {
        let mut s = scene("z + a");
        let rev = s.revisions();
        assert!(!s.set_parameter("b", Complex::ONE));
        assert_eq!(s.revisions(), rev);
    }

    #[test]
    fn narrowing_ranges_snaps_value() {
        let mut s = scene("a*z");
        s.set_parameter("a", Complex::new(5.0, 0.0));
        let r = SliderRange::new(-1.0, 1.0, 201).unwrap();
        assert!(s.set_parameter_ranges("a", r, r));
        assert_eq!(s.params().get("a").unwrap().value, Complex::new(1.0, 0.0));
    }
}
