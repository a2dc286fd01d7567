use eframe::egui;

use zmapper_core::{Complex, GridPattern, Parameter, SliderRange};

use crate::app::ZMapperApp;
use crate::presets::PRESETS;

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(200, 40, 40);

impl ZMapperApp {
    /// Left panel: formula entry, presets, parameter sliders and actions.
    pub(crate) fn show_controls_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.formula_section(ui);
                    ui.separator();
                    self.parameter_section(ui);
                    ui.separator();
                    self.actions_section(ui);
                });
            });
    }

    fn formula_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Formula");
        ui.horizontal(|ui| {
            ui.label("f(z) =");
            let resp = ui.add(
                egui::TextEdit::singleline(&mut self.formula_buf)
                    .desired_width(ui.available_width())
                    .font(egui::TextStyle::Monospace),
            );
            if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.apply_formula();
            }
        });
        if let Some(err) = &self.formula_error {
            ui.colored_label(ERROR_COLOR, err);
        }

        ui.add_space(4.0);
        let selected = self
            .preset_index
            .and_then(|i| PRESETS.get(i))
            .map_or("Custom", |p| p.name);
        let mut chosen = None;
        egui::ComboBox::from_id_salt("preset")
            .selected_text(selected)
            .width(ui.available_width() - 8.0)
            .show_ui(ui, |ui| {
                for (i, preset) in PRESETS.iter().enumerate() {
                    if ui
                        .selectable_label(self.preset_index == Some(i), preset.name)
                        .on_hover_text(preset.formula)
                        .clicked()
                    {
                        chosen = Some(i);
                    }
                }
            });
        if let Some(i) = chosen {
            self.apply_preset(i);
        }
    }

    fn parameter_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Parameters");
        egui::CollapsingHeader::new("Default slider range")
            .id_salt("default_range")
            .show(ui, |ui| {
                let mut range = self.scene.params().default_range();
                if range_editor(ui, "New", &mut range) {
                    self.set_default_slider_range(range);
                }
            });
        let params: Vec<Parameter> = self.scene.params().iter().cloned().collect();
        if let Some(err) = &self.range_error {
            ui.colored_label(ERROR_COLOR, err);
        }
        if params.is_empty() {
            ui.weak("The formula has no parameters.");
            return;
        }

        for p in &params {
            ui.add_space(2.0);
            ui.label(egui::RichText::new(&p.name).strong().monospace());
            let mut re = p.value.re;
            let mut im = p.value.im;
            let re_changed = ui
                .add(range_slider(&mut re, p.re_range, format!("Re({})", p.name)))
                .changed();
            let im_changed = ui
                .add(range_slider(&mut im, p.im_range, format!("Im({})", p.name)))
                .changed();
            if re_changed || im_changed {
                let value = Complex::new(p.re_range.snap(re), p.im_range.snap(im));
                self.scene.set_parameter(&p.name, value);
            }

            egui::CollapsingHeader::new("Slider range")
                .id_salt(("range", &p.name))
                .show(ui, |ui| {
                    let mut re_range = p.re_range;
                    let mut im_range = p.im_range;
                    let mut edited = range_editor(ui, "Re", &mut re_range);
                    edited |= range_editor(ui, "Im", &mut im_range);
                    if edited {
                        self.update_ranges(&p.name, re_range, im_range);
                    }
                });
        }

        ui.add_space(4.0);
        if ui.button("Reset parameters").clicked() {
            self.scene.reset_parameters();
        }
    }

    fn update_ranges(&mut self, name: &str, re: SliderRange, im: SliderRange) {
        let validated = SliderRange::new(re.min, re.max, re.ticks)
            .and_then(|re| SliderRange::new(im.min, im.max, im.ticks).map(|im| (re, im)));
        match validated {
            Ok((re, im)) => {
                self.range_error = None;
                self.scene.set_parameter_ranges(name, re, im);
            }
            Err(e) => self.range_error = Some(e.to_string()),
        }
    }

    fn actions_section(&mut self, ui: &mut egui::Ui) {
        use egui_material_icons::icons::*;

        ui.heading("Grid");
        let mut pattern = self.scene.grid().pattern;
        ui.horizontal(|ui| {
            ui.label("Pattern:");
            ui.selectable_value(&mut pattern, GridPattern::Cartesian, "Cartesian");
            ui.selectable_value(&mut pattern, GridPattern::Polar, "Polar");
        });
        if pattern != self.scene.grid().pattern {
            if let Err(e) = self.scene.set_pattern(pattern) {
                self.grid_error = Some(e.to_string());
            } else {
                self.grid_draft.pattern = pattern;
                self.reset_view();
            }
        }

        let toggle_label = if self.scene.show_input() {
            "Show mapped grid"
        } else {
            "Toggle grid input"
        };
        if ui.button(toggle_label).clicked() {
            self.scene.toggle_show_input();
        }
        if ui
            .button(format!("{ICON_SETTINGS} Set grid input…"))
            .clicked()
        {
            self.grid_draft = *self.scene.grid();
            self.grid_error = None;
            self.show_grid_window = true;
        }
        if ui.button("Differentiate").clicked() {
            self.differentiate();
        }
        if ui
            .button(format!("{ICON_RESTART_ALT} Reset view"))
            .clicked()
        {
            self.reset_view();
        }

        ui.add_space(6.0);
        ui.add(
            egui::Slider::new(&mut self.line_width, 0.5..=4.0)
                .text("Line width")
                .step_by(0.25),
        );
    }
}

fn range_slider(value: &mut f64, range: SliderRange, label: String) -> egui::Slider<'_> {
    egui::Slider::new(value, range.min..=range.max)
        .step_by(range.step())
        .clamping(egui::SliderClamping::Never)
        .text(label)
}

/// Min, max and tick count of one slider. Returns whether anything changed.
fn range_editor(ui: &mut egui::Ui, label: &str, range: &mut SliderRange) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        let mut changed = ui
            .add(egui::DragValue::new(&mut range.min).speed(0.1).prefix("min "))
            .changed();
        changed |= ui
            .add(egui::DragValue::new(&mut range.max).speed(0.1).prefix("max "))
            .changed();
        changed |= ui
            .add(
                egui::DragValue::new(&mut range.ticks)
                    .range(2..=100_000)
                    .prefix("ticks "),
            )
            .changed();
        changed
    })
    .inner
}
