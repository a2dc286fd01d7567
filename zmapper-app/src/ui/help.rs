use eframe::egui;

use crate::app::ZMapperApp;

impl ZMapperApp {
    pub(crate) fn show_help_window(&mut self, ctx: &egui::Context) {
        if !self.show_help {
            return;
        }

        let mut open = true;
        egui::Window::new("Controls & Shortcuts")
            .open(&mut open)
            .resizable(false)
            .default_width(340.0)
            .show(ctx, |ui| {
                ui.heading("Keyboard");
                ui.add_space(2.0);
                help_grid(
                    ui,
                    "help_kb",
                    &[
                        ("W A S D / arrows", "Pan the pane under the mouse"),
                        ("R / +", "Zoom in"),
                        ("F / -", "Zoom out"),
                        ("G", "Toggle grid input"),
                        ("H", "Toggle HUD"),
                        ("Enter", "Apply the typed formula"),
                        ("Esc", "Close dialogs"),
                    ],
                );

                ui.add_space(8.0);
                ui.heading("Mouse");
                ui.add_space(2.0);
                help_grid(
                    ui,
                    "help_mouse",
                    &[
                        ("Left drag", "Pan"),
                        ("Scroll wheel", "Zoom at cursor"),
                        ("Double click", "Fit pane to its content"),
                    ],
                );

                ui.add_space(8.0);
                ui.heading("Formulas");
                ui.add_space(2.0);
                ui.label("Use z as the variable; any other name is a parameter with its own sliders.");
                ui.label("Constants: pi, E, I and imaginary literals such as 2j.");
                ui.label("Operators: + - * / and ** or ^ for powers.");
                ui.label(
                    "Functions: sin cos tan sec csc cot, their inverses and hyperbolic forms, \
                     exp log sqrt abs re im arg conj sinc gamma erf psi lambertw zeta eta.",
                );
            });

        if !open {
            self.show_help = false;
        }
    }
}

fn help_grid(ui: &mut egui::Ui, id: &str, rows: &[(&str, &str)]) {
    egui::Grid::new(id)
        .num_columns(2)
        .spacing([12.0, 2.0])
        .show(ui, |ui| {
            for &(k, d) in rows {
                ui.label(egui::RichText::new(k).strong());
                ui.label(d);
                ui.end_row();
            }
        });
}
