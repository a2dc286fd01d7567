mod app;
mod app_dir;
mod canvas;
mod input;
mod navigation;
mod preferences;
mod presets;
mod ui;

fn main() -> eframe::Result {
    app::run()
}
