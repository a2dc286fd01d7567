use eframe::egui;
use tracing::{error, info};

use zmapper_render::{export_png, rasterize, ExportMetadata};

use crate::app::ZMapperApp;
use crate::app_dir;

impl ZMapperApp {
    /// Top menu bar; drawn before the side and central panels so it keeps
    /// its row.
    pub(crate) fn draw_menu_bar(&mut self, ctx: &egui::Context) {
        let resp = egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                self.menu_file(ui, ctx);
                self.menu_view(ui);
                self.menu_help(ui);
            });
        });
        self.menu_bar_height = resp.response.rect.height();
    }

    fn menu_file(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.menu_button("File", |ui| {
            if ui.button("Save figure…").clicked() {
                ui.close();
                self.save_figure();
            }
            ui.separator();
            if ui.button("Quit").clicked() {
                ui.close();
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
    }

    fn menu_view(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("View", |ui| {
            if ui.add(shortcut_item("Toggle grid input", "G")).clicked() {
                ui.close();
                self.scene.toggle_show_input();
            }
            if ui.button("Reset view").clicked() {
                ui.close();
                self.reset_view();
            }
            ui.separator();
            if ui
                .add(shortcut_item(
                    if self.show_hud { "Hide HUD" } else { "Show HUD" },
                    "H",
                ))
                .clicked()
            {
                ui.close();
                self.show_hud = !self.show_hud;
            }
        });
    }

    fn menu_help(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("Help", |ui| {
            if ui.button("Keyboard Shortcuts").clicked() {
                ui.close();
                self.show_help = true;
            }
            ui.separator();
            if ui.button("About ZMapper").clicked() {
                ui.close();
                self.show_about = true;
            }
        });
    }

    /// Ask for a path and write the output pane, as currently framed, to a PNG.
    fn save_figure(&mut self) {
        let dir = app_dir::figures_directory();
        let mut dialog = rfd::FileDialog::new()
            .add_filter("PNG image", &["png"])
            .set_file_name("zmapper.png");
        if dir.is_dir() {
            dialog = dialog.set_directory(&dir);
        }
        let Some(path) = dialog.save_file() else {
            return;
        };

        let frame = self.current_frame();
        let view = self.output_view;
        let image = match rasterize(&frame.output, &view, self.line_width) {
            Ok(image) => image,
            Err(e) => {
                error!("Failed to draw figure: {e}");
                self.status = Some(format!("Save failed: {e}"));
                return;
            }
        };
        let mut meta = ExportMetadata::new(
            self.scene.formula().source(),
            self.scene.params().values(),
            self.scene.grid().extent,
        );
        meta.title = self.scene.title();
        meta.view = Some(view.visible_rect());

        match export_png(&image, &path, &meta) {
            Ok(()) => {
                info!("Saved figure to {}", path.display());
                self.status = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                error!("Failed to save figure: {e}");
                self.status = Some(format!("Save failed: {e}"));
            }
        }
    }

    pub(crate) fn draw_about_window(&mut self, ctx: &egui::Context) {
        if !self.show_about {
            return;
        }
        let mut open = true;
        egui::Window::new("About ZMapper")
            .open(&mut open)
            .resizable(false)
            .collapsible(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(4.0);
                    ui.heading(
                        egui::RichText::new("ZMapper")
                            .strong()
                            .color(egui::Color32::from_rgb(31, 119, 180)),
                    );
                    ui.add_space(4.0);
                    ui.label("See how a grid in the complex plane moves under f(z).");
                    ui.add_space(4.0);
                });
            });
        if !open {
            self.show_about = false;
        }
    }
}

/// Menu entry showing its key after the label.
fn shortcut_item(label: &str, shortcut: &str) -> egui::Button<'static> {
    let text = format!("{label}    {shortcut}");
    egui::Button::new(egui::RichText::new(text).size(13.0)).wrap_mode(egui::TextWrapMode::Extend)
}
