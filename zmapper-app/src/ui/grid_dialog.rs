use eframe::egui;

use zmapper_core::grid::{MAX_LINES, MAX_POINTS_PER_LINE};
use zmapper_core::GridSpec;

use crate::app::ZMapperApp;

impl ZMapperApp {
    /// "Set grid input…" dialog editing a draft of the grid spec.
    pub(crate) fn show_grid_window(&mut self, ctx: &egui::Context) {
        if !self.show_grid_window {
            return;
        }

        let mut open = true;
        let mut apply = false;
        egui::Window::new("Grid input")
            .open(&mut open)
            .resizable(false)
            .collapsible(false)
            .default_width(280.0)
            .show(ctx, |ui| {
                let draft = &mut self.grid_draft;
                egui::Grid::new("grid_extent")
                    .num_columns(3)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("Re");
                        ui.add(egui::DragValue::new(&mut draft.extent.x_min).speed(0.05));
                        ui.add(egui::DragValue::new(&mut draft.extent.x_max).speed(0.05));
                        ui.end_row();
                        ui.label("Im");
                        ui.add(egui::DragValue::new(&mut draft.extent.y_min).speed(0.05));
                        ui.add(egui::DragValue::new(&mut draft.extent.y_max).speed(0.05));
                        ui.end_row();
                    });

                ui.add_space(4.0);
                egui::Grid::new("grid_resolution")
                    .num_columns(2)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        ui.label("Horizontal lines");
                        ui.add(egui::DragValue::new(&mut draft.horizontal_lines).range(1..=MAX_LINES));
                        ui.end_row();
                        ui.label("Vertical lines");
                        ui.add(egui::DragValue::new(&mut draft.vertical_lines).range(1..=MAX_LINES));
                        ui.end_row();
                        ui.label("Points per line");
                        ui.add(egui::DragValue::new(&mut draft.points_per_line).range(2..=MAX_POINTS_PER_LINE));
                        ui.end_row();
                    });

                if let Some(err) = &self.grid_error {
                    ui.colored_label(egui::Color32::from_rgb(200, 40, 40), err);
                }

                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    if ui.button("Apply").clicked() {
                        apply = true;
                    }
                    if ui.button("Default grid").clicked() {
                        self.grid_draft = GridSpec {
                            pattern: self.grid_draft.pattern,
                            ..GridSpec::default()
                        };
                    }
                    if ui.button("Zeta grid").clicked() {
                        self.grid_draft = GridSpec {
                            pattern: self.grid_draft.pattern,
                            ..GridSpec::zeta()
                        };
                    }
                });
            });

        if apply {
            self.apply_grid_draft();
        }
        if !open {
            self.show_grid_window = false;
        }
    }
}
