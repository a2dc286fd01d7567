use eframe::egui;

use crate::app::{ZMapperApp, WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT};
use crate::navigation::Pane;

impl ZMapperApp {
    pub(crate) fn handle_pane_input(
        &mut self,
        ctx: &egui::Context,
        pane: Pane,
        response: &egui::Response,
    ) {
        if let Some(pos) = response.hover_pos() {
            self.active_pane = pane;
            let p = pos - response.rect.min;
            let z = self.view(pane).to_complex(p.x as f64, p.y as f64);
            self.cursor = Some((pane, z));
        } else if self.cursor.is_some_and(|(p, _)| p == pane) {
            self.cursor = None;
        }

        let scroll_y = ctx.input(|i| i.raw_scroll_delta.y);
        if scroll_y.abs() > 0.0 && response.hovered() {
            if let Some(pos) = response.hover_pos() {
                let p = pos - response.rect.min;
                let factor = if scroll_y > 0.0 {
                    WHEEL_ZOOM_IN
                } else {
                    WHEEL_ZOOM_OUT
                };
                self.zoom_at(pane, p.x as f64, p.y as f64, factor);
            }
        }

        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            self.view_mut(pane).pan(delta.x as f64, delta.y as f64);
        }

        if response.double_clicked() {
            self.needs_fit[pane.index()] = true;
        }
    }

    pub(crate) fn handle_keyboard(&mut self, ctx: &egui::Context) {
        let text_editing = ctx.memory(|m| m.focused().is_some());

        ctx.input(|input| {
            if input.key_pressed(egui::Key::Escape) {
                if self.show_grid_window {
                    self.show_grid_window = false;
                } else if self.show_help {
                    self.show_help = false;
                } else {
                    self.show_about = false;
                }
            }

            if text_editing {
                return;
            }

            if input.key_pressed(egui::Key::ArrowLeft) || input.key_pressed(egui::Key::A) {
                self.pan_step(-1.0, 0.0);
            }
            if input.key_pressed(egui::Key::ArrowRight) || input.key_pressed(egui::Key::D) {
                self.pan_step(1.0, 0.0);
            }
            if input.key_pressed(egui::Key::ArrowUp) || input.key_pressed(egui::Key::W) {
                self.pan_step(0.0, 1.0);
            }
            if input.key_pressed(egui::Key::ArrowDown) || input.key_pressed(egui::Key::S) {
                self.pan_step(0.0, -1.0);
            }

            let pane = self.active_pane;
            if input.key_pressed(egui::Key::R)
                || input.key_pressed(egui::Key::Plus)
                || input.key_pressed(egui::Key::Equals)
            {
                self.zoom_center(pane, WHEEL_ZOOM_IN);
            }
            if input.key_pressed(egui::Key::F) || input.key_pressed(egui::Key::Minus) {
                self.zoom_center(pane, WHEEL_ZOOM_OUT);
            }

            if input.key_pressed(egui::Key::H) {
                self.show_hud = !self.show_hud;
            }
            if input.key_pressed(egui::Key::G) {
                self.scene.toggle_show_input();
            }
        });
    }
}
