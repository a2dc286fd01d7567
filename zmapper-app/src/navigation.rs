use zmapper_core::{PlaneRect, ViewState};
use zmapper_render::plot::robust_bounds;
use zmapper_render::MappedFrame;

use crate::app::{ZMapperApp, FIT_MARGIN, PAN_FRACTION};

/// One of the two plot panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pane {
    /// Domain: the grid itself.
    Input,
    /// Range: the grid's image under `f`.
    Output,
}

impl Pane {
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Input => 0,
            Self::Output => 1,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Output => "Output",
        }
    }
}

impl ZMapperApp {
    pub(crate) fn view(&self, pane: Pane) -> &ViewState {
        match pane {
            Pane::Input => &self.input_view,
            Pane::Output => &self.output_view,
        }
    }

    pub(crate) fn view_mut(&mut self, pane: Pane) -> &mut ViewState {
        match pane {
            Pane::Input => &mut self.input_view,
            Pane::Output => &mut self.output_view,
        }
    }

    /// Move the view by a fraction of its size; positive `fy` moves up.
    pub(crate) fn pan_by_fraction(&mut self, pane: Pane, fx: f64, fy: f64) {
        let view = self.view_mut(pane);
        let (w, h) = (view.width as f64, view.height as f64);
        view.pan(-fx * w, fy * h);
    }

    pub(crate) fn zoom_center(&mut self, pane: Pane, factor: f64) {
        self.view_mut(pane).zoom_center(factor);
    }

    /// Zoom keeping the plane point under pixel `(px, py)` fixed.
    pub(crate) fn zoom_at(&mut self, pane: Pane, px: f64, py: f64, factor: f64) {
        self.view_mut(pane).zoom(factor, px, py);
    }

    /// Refit both panes on their next draw.
    pub(crate) fn reset_view(&mut self) {
        self.needs_fit = [true; 2];
    }

    /// Track the pane's on-screen size, keeping center and scale.
    pub(crate) fn check_resize(&mut self, pane: Pane, width: u32, height: u32) {
        let view = self.view_mut(pane);
        if width > 0 && height > 0 && (width != view.width || height != view.height) {
            view.resize(width, height);
        }
    }

    /// Apply a pending refit for `pane` using the latest frame.
    pub(crate) fn fit_if_needed(&mut self, pane: Pane, frame: &MappedFrame) {
        if !self.needs_fit[pane.index()] {
            return;
        }
        self.needs_fit[pane.index()] = false;
        let rect = self.fit_target(pane, frame);
        let view = self.view_mut(pane);
        if let Ok(fitted) = ViewState::fit_rect(rect, view.width, view.height, FIT_MARGIN) {
            *view = fitted;
        }
    }

    /// Rectangle a pane is framed on: the grid extent for the input, the bulk
    /// of the finite image points for the output.
    fn fit_target(&self, pane: Pane, frame: &MappedFrame) -> PlaneRect {
        let extent = self.scene.grid().extent;
        match pane {
            Pane::Input => extent,
            Pane::Output => robust_bounds(
                frame
                    .output
                    .lines
                    .iter()
                    .flat_map(|l| l.points.iter().copied()),
            )
            .unwrap_or(extent),
        }
    }

    pub(crate) fn pan_step(&mut self, fx: f64, fy: f64) {
        self.pan_by_fraction(self.active_pane, fx * PAN_FRACTION, fy * PAN_FRACTION);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::AppPreferences;
    use zmapper_core::{Complex, GridSpec};

    fn app() -> ZMapperApp {
        let prefs = AppPreferences {
            grid: GridSpec {
                horizontal_lines: 4,
                vertical_lines: 4,
                points_per_line: 16,
                ..GridSpec::default()
            },
            ..AppPreferences::default()
        };
        ZMapperApp::new(prefs).unwrap()
    }

    #[test]
    fn keyboard_pan_and_back() {
        let mut app = app();
        let before = app.output_view.center;
        app.pan_step(1.0, 0.0);
        assert!(app.output_view.center.re > before.re);
        app.pan_step(-1.0, 0.0);
        assert!((app.output_view.center - before).norm() < 1e-12);

        app.pan_step(0.0, 1.0);
        assert!(app.output_view.center.im > before.im);
    }

    #[test]
    fn panes_navigate_independently() {
        let mut app = app();
        let input_before = app.input_view;
        app.zoom_center(Pane::Output, 0.5);
        assert_eq!(app.input_view, input_before);
        assert!((app.output_view.scale - input_before.scale * 0.5).abs() < 1e-15);
    }

    #[test]
    fn zoom_at_keeps_pivot() {
        let mut app = app();
        let pivot = app.input_view.to_complex(30.0, 50.0);
        app.zoom_at(Pane::Input, 30.0, 50.0, 0.9);
        let after = app.input_view.to_complex(30.0, 50.0);
        assert!((after - pivot).norm() < 1e-12);
    }

    #[test]
    fn fit_frames_the_output() {
        let mut app = app();
        app.formula_buf = "10*z + 100".to_string();
        app.apply_formula();
        let frame = app.current_frame();
        app.check_resize(Pane::Output, 300, 200);
        app.fit_if_needed(Pane::Output, &frame);
        let visible = app.output_view.visible_rect();
        assert!(visible.contains(Complex::new(100.0, 0.0)));
        assert!(!app.needs_fit[Pane::Output.index()]);
    }
}
