use eframe::egui;

use zmapper_render::MappedFrame;

use crate::app::{ZMapperApp, HUD_CORNER_RADIUS, HUD_MARGIN};
use crate::navigation::Pane;

impl ZMapperApp {
    pub(crate) fn show_hud(&mut self, ctx: &egui::Context, frame: &MappedFrame) {
        if !self.show_hud {
            return;
        }

        // -- Top-right: cursor position --
        let top_y = HUD_MARGIN + self.menu_bar_height;
        egui::Area::new(egui::Id::new("hud_cursor"))
            .anchor(egui::Align2::RIGHT_TOP, [-HUD_MARGIN, top_y])
            .interactable(false)
            .show(ctx, |ui| {
                hud_frame().show(ui, |ui| {
                    ui.style_mut().visuals.override_text_color =
                        Some(egui::Color32::from_rgb(220, 220, 220));
                    match self.cursor {
                        Some((pane, z)) => {
                            ui.label(format!("{}: {:.6} {:+.6}i", pane.label(), z.re, z.im));
                            if pane == Pane::Input && !self.scene.show_input() {
                                let values = self.scene.params().values();
                                let w = self.scene.function().eval(z, &values);
                                ui.label(format!("f(z): {:.6} {:+.6}i", w.re, w.im));
                            }
                        }
                        None => {
                            ui.weak("Hover a pane to read coordinates");
                        }
                    }
                });
            });

        // -- Bottom-centre: mapping stats --
        egui::Area::new(egui::Id::new("hud_stats"))
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -HUD_MARGIN])
            .interactable(false)
            .show(ctx, |ui| {
                hud_frame().show(ui, |ui| {
                    ui.style_mut().visuals.override_text_color =
                        Some(egui::Color32::from_rgb(200, 200, 200));
                    ui.style_mut().spacing.item_spacing.y = 2.0;

                    ui.label(format!(
                        "{} lines, {} points, {:.1} ms",
                        frame.output.lines.len(),
                        frame.output.point_count(),
                        frame.elapsed.as_secs_f64() * 1000.0,
                    ));
                    if frame.non_finite > 0 {
                        ui.colored_label(
                            egui::Color32::from_rgb(255, 180, 50),
                            format!("{} points at poles skipped", frame.non_finite),
                        );
                    }
                    if let Some(status) = &self.status {
                        ui.label(status);
                    }
                });
            });
    }
}

fn hud_frame() -> egui::Frame {
    egui::Frame::NONE
        .fill(egui::Color32::from_black_alpha(170))
        .inner_margin(egui::Margin::same(8))
        .corner_radius(HUD_CORNER_RADIUS)
}
