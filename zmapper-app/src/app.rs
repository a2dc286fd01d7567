use eframe::egui;
use tracing::{info, warn};

use zmapper_core::{GridSpec, SliderRange, ViewState};
use zmapper_render::{MappedFrame, MappingScene};

use crate::navigation::Pane;
use crate::preferences::{AppPreferences, DEFAULT_FORMULA};
use crate::presets::{self, PRESETS};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Scale factor per wheel notch towards the user (zoom in).
pub(crate) const WHEEL_ZOOM_IN: f64 = 0.9;
/// Scale factor per wheel notch away from the user (zoom out).
pub(crate) const WHEEL_ZOOM_OUT: f64 = 1.1;
pub(crate) const PAN_FRACTION: f64 = 0.1;
/// Fraction of a pane left free around a fitted view.
pub(crate) const FIT_MARGIN: f64 = 0.05;
pub(crate) const HUD_MARGIN: f32 = 8.0;
pub(crate) const HUD_CORNER_RADIUS: f32 = 6.0;
/// Pane size assumed until the first layout pass.
const INITIAL_PANE_SIZE: u32 = 400;

// ---------------------------------------------------------------------------
// Application struct
// ---------------------------------------------------------------------------

pub(crate) struct ZMapperApp {
    pub(crate) scene: MappingScene,

    // Views, one per pane
    pub(crate) input_view: ViewState,
    pub(crate) output_view: ViewState,
    /// Refit the pane on its next draw.
    pub(crate) needs_fit: [bool; 2],
    /// Pane that keyboard navigation applies to.
    pub(crate) active_pane: Pane,
    pub(crate) cursor: Option<(Pane, zmapper_core::Complex)>,

    // Formula entry
    pub(crate) formula_buf: String,
    pub(crate) formula_error: Option<String>,
    pub(crate) preset_index: Option<usize>,
    /// Grid in effect before a preset replaced it.
    pub(crate) saved_grid: Option<GridSpec>,

    // Grid dialog
    pub(crate) show_grid_window: bool,
    pub(crate) grid_draft: GridSpec,
    pub(crate) grid_error: Option<String>,
    pub(crate) range_error: Option<String>,

    // Display
    pub(crate) line_width: f32,
    pub(crate) show_hud: bool,
    pub(crate) show_help: bool,
    pub(crate) show_about: bool,
    pub(crate) menu_bar_height: f32,
    pub(crate) status: Option<String>,

    pub(crate) preferences: AppPreferences,
}

impl ZMapperApp {
    pub(crate) fn new(prefs: AppPreferences) -> zmapper_render::Result<Self> {
        let source = if prefs.restore_last_session {
            prefs.last_formula.clone()
        } else {
            DEFAULT_FORMULA.to_string()
        };
        let mut scene = match MappingScene::new(&source, prefs.grid, prefs.slider_range) {
            Ok(scene) => scene,
            Err(e) => {
                warn!("Stored formula {source:?} rejected ({e}), using {DEFAULT_FORMULA:?}");
                MappingScene::new(DEFAULT_FORMULA, prefs.grid, prefs.slider_range)?
            }
        };
        if prefs.restore_last_session {
            for (name, value) in prefs.last_parameters.iter() {
                scene.set_parameter(name, value);
            }
        }

        let extent = scene.grid().extent;
        let view = ViewState::fit_rect(extent, INITIAL_PANE_SIZE, INITIAL_PANE_SIZE, FIT_MARGIN)?;
        let formula_buf = scene.formula().source().to_string();

        Ok(Self {
            preset_index: presets::find_by_formula(&formula_buf),
            formula_buf,
            formula_error: None,
            saved_grid: None,
            input_view: view,
            output_view: view,
            needs_fit: [true; 2],
            active_pane: Pane::Output,
            cursor: None,
            show_grid_window: false,
            grid_draft: *scene.grid(),
            grid_error: None,
            range_error: None,
            line_width: prefs.line_width,
            show_hud: prefs.show_hud,
            show_help: false,
            show_about: false,
            menu_bar_height: 0.0,
            status: None,
            scene,
            preferences: prefs,
        })
    }

    /// Bring the scene's frame up to date and return a cheap copy of it.
    pub(crate) fn current_frame(&mut self) -> MappedFrame {
        match self.scene.on_state_changed() {
            Ok(frame) => frame.clone(),
            Err(e) => {
                warn!("Mapping failed: {e}");
                self.status = Some(format!("Mapping failed: {e}"));
                self.scene.frame().clone()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Formula, preset and grid actions
// ---------------------------------------------------------------------------

impl ZMapperApp {
    /// Apply the text in the formula box. On failure the previous formula
    /// stays and the error is shown under the box.
    pub(crate) fn apply_formula(&mut self) {
        let source = self.formula_buf.trim().to_string();
        match self.scene.set_formula(&source) {
            Ok(()) => {
                self.formula_error = None;
                self.preset_index = presets::find_by_formula(&source);
                self.needs_fit[Pane::Output.index()] = true;
            }
            Err(e) => {
                warn!(formula = %source, "Rejected formula: {e}");
                self.formula_error = Some(e.to_string());
            }
        }
    }

    pub(crate) fn apply_preset(&mut self, index: usize) {
        let Some(preset) = PRESETS.get(index) else {
            return;
        };
        let grid = match preset.grid.spec() {
            Some(spec) => {
                if self.saved_grid.is_none() {
                    self.saved_grid = Some(*self.scene.grid());
                }
                Some(spec)
            }
            None => self.saved_grid.take(),
        };
        if let Some(spec) = grid {
            self.install_grid(spec);
        }
        self.formula_buf = preset.formula.to_string();
        self.apply_formula();
        info!(preset = preset.name, "Selected preset");
    }

    pub(crate) fn differentiate(&mut self) {
        match self.scene.differentiate() {
            Ok(()) => {
                self.formula_buf = self.scene.formula().source().to_string();
                self.formula_error = None;
                self.preset_index = None;
                self.needs_fit[Pane::Output.index()] = true;
            }
            Err(e) => {
                warn!("Cannot differentiate: {e}");
                self.formula_error = Some(e.to_string());
            }
        }
    }

    /// Install a grid chosen in the grid dialog.
    pub(crate) fn apply_grid_draft(&mut self) {
        let draft = self.grid_draft;
        if self.install_grid(draft) {
            self.saved_grid = None;
            self.show_grid_window = false;
        }
    }

    /// Slider range given to parameters that appear in later formulas.
    pub(crate) fn set_default_slider_range(&mut self, range: SliderRange) {
        match SliderRange::new(range.min, range.max, range.ticks) {
            Ok(range) => {
                self.range_error = None;
                self.scene.set_default_range(range);
                self.preferences.slider_range = range;
            }
            Err(e) => self.range_error = Some(e.to_string()),
        }
    }

    fn install_grid(&mut self, spec: GridSpec) -> bool {
        match self.scene.set_grid(spec) {
            Ok(()) => {
                self.grid_draft = spec;
                self.grid_error = None;
                self.needs_fit = [true; 2];
                true
            }
            Err(e) => {
                warn!("Rejected grid: {e}");
                self.grid_error = Some(e.to_string());
                false
            }
        }
    }

    fn store_session(&mut self) {
        self.preferences.last_formula = self.scene.formula().source().to_string();
        self.preferences.last_parameters = self.scene.params().values();
        self.preferences.grid = self.saved_grid.unwrap_or(*self.scene.grid());
        self.preferences.slider_range = self.scene.params().default_range();
        self.preferences.line_width = self.line_width;
        self.preferences.show_hud = self.show_hud;
    }
}

// ---------------------------------------------------------------------------
// eframe::App
// ---------------------------------------------------------------------------

impl eframe::App for ZMapperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::light());
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.preferences.window_width = rect.width();
            self.preferences.window_height = rect.height();
        }

        self.draw_menu_bar(ctx);
        self.show_controls_panel(ctx);

        let frame = self.current_frame();
        let current = self.scene.is_current(&frame);
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                self.draw_pane(&mut columns[0], Pane::Input, &frame, current);
                self.draw_pane(&mut columns[1], Pane::Output, &frame, current);
            });
        });

        self.handle_keyboard(ctx);

        self.show_hud(ctx, &frame);
        self.show_grid_window(ctx);
        self.show_help_window(ctx);
        self.draw_about_window(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.store_session();
        self.preferences.save();
        info!("Saved preferences on exit");
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub(crate) fn run() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting ZMapper");

    let prefs = AppPreferences::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("ZMapper")
            .with_inner_size([prefs.window_width, prefs.window_height]),
        ..Default::default()
    };

    eframe::run_native(
        "ZMapper",
        options,
        Box::new(move |cc| {
            egui_material_icons::initialize(&cc.egui_ctx);
            Ok(Box::new(ZMapperApp::new(prefs)?))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn bad_stored_formula_falls_back() {
        let prefs = AppPreferences {
            last_formula: "a + b".to_string(),
            ..AppPreferences::default()
        };
        let app = ZMapperApp::new(prefs).unwrap();
        assert_eq!(app.scene.formula().source(), DEFAULT_FORMULA);
    }

    #[test]
    fn invalid_formula_keeps_plot() {
        let mut app = app();
        app.formula_buf = "sin(".to_string();
        app.apply_formula();
        assert!(app.formula_error.is_some());
        assert_eq!(app.scene.formula().source(), DEFAULT_FORMULA);
    }

    #[test]
    fn zeta_preset_swaps_grid_and_back() {
        let mut app = app();
        let original = *app.scene.grid();
        let zeta = PRESETS.iter().position(|p| p.name == "Riemann zeta").unwrap();
        app.apply_preset(zeta);
        assert_eq!(*app.scene.grid(), GridSpec::zeta());
        assert_eq!(app.preset_index, Some(zeta));

        app.apply_preset(1);
        assert_eq!(*app.scene.grid(), original);
        assert_eq!(app.scene.formula().source(), "a*sin(w*z)");
        assert!(app.saved_grid.is_none());
    }

    #[test]
    fn differentiate_updates_entry() {
        let mut app = app();
        app.formula_buf = "z^3".to_string();
        app.apply_formula();
        app.differentiate();
        assert_eq!(app.formula_buf, "3*z^2");
        assert_eq!(app.preset_index, None);
    }

    #[test]
    fn default_slider_range_applies_to_new_parameters() {
        let mut app = app();
        let range = SliderRange::new(-2.0, 2.0, 41).unwrap();
        app.set_default_slider_range(range);
        assert_eq!(app.preferences.slider_range, range);

        app.formula_buf = "b*z".to_string();
        app.apply_formula();
        let b = app.scene.params().get("b").unwrap();
        assert_eq!(b.re_range, range);
        assert_eq!(b.im_range, range);

        app.set_default_slider_range(SliderRange {
            min: 1.0,
            max: -1.0,
            ticks: 10,
        });
        assert!(app.range_error.is_some());
        assert_eq!(app.scene.params().default_range(), range);
    }

    #[test]
    fn session_is_stored_in_preferences() {
        let mut app = app();
        app.formula_buf = "w/(z - a)".to_string();
        app.apply_formula();
        app.scene
            .set_parameter("a", zmapper_core::Complex::new(0.25, 0.0));
        app.store_session();
        assert_eq!(app.preferences.last_formula, "w/(z - a)");
        assert_eq!(
            app.preferences.last_parameters.get("a"),
            Some(zmapper_core::Complex::new(0.25, 0.0))
        );
    }
}
