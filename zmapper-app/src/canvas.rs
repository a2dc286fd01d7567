//! Painting the mapped grid into a pane with egui shapes.

use eframe::egui;

use zmapper_core::{Complex, GridInput, ViewState};
use zmapper_render::style::{AXES, BACKGROUND};
use zmapper_render::{polyline_runs, LineStyle, MappedFrame, Rgba};

use crate::app::ZMapperApp;
use crate::navigation::Pane;

const TITLE_COLOR: egui::Color32 = egui::Color32::from_rgb(40, 40, 40);

pub(crate) fn color32(c: Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3])
}

impl ZMapperApp {
    /// Draw one pane filling the available space. Stale frames are not
    /// drawn, only the background and axes.
    pub(crate) fn draw_pane(
        &mut self,
        ui: &mut egui::Ui,
        pane: Pane,
        frame: &MappedFrame,
        current: bool,
    ) {
        let available = ui.available_size();
        let (response, painter) = ui.allocate_painter(available, egui::Sense::click_and_drag());
        let rect = response.rect;

        self.check_resize(
            pane,
            rect.width().max(1.0) as u32,
            rect.height().max(1.0) as u32,
        );
        if current {
            self.fit_if_needed(pane, frame);
        }
        let view = *self.view(pane);

        painter.rect_filled(rect, 0.0, color32(BACKGROUND));
        paint_axes(&painter, rect, &view);
        if current {
            let grid = match pane {
                Pane::Input => &frame.input,
                Pane::Output => &frame.output,
            };
            paint_grid(&painter, rect, &view, grid, self.line_width);
        }

        let title = match pane {
            Pane::Input => "Input grid".to_string(),
            Pane::Output => self.scene.title(),
        };
        painter.text(
            rect.center_top() + egui::vec2(0.0, 6.0),
            egui::Align2::CENTER_TOP,
            title,
            egui::FontId::proportional(15.0),
            TITLE_COLOR,
        );
        painter.rect_stroke(
            rect,
            0.0,
            egui::Stroke::new(1.0, egui::Color32::from_gray(200)),
            egui::StrokeKind::Inside,
        );

        self.handle_pane_input(ui.ctx(), pane, &response);
    }
}

fn to_screen(rect: egui::Rect, p: (f64, f64)) -> egui::Pos2 {
    rect.min + egui::vec2(p.0 as f32, p.1 as f32)
}

fn paint_axes(painter: &egui::Painter, rect: egui::Rect, view: &ViewState) {
    let stroke = egui::Stroke::new(1.0, color32(AXES));
    let (ox, oy) = view.to_pixel(Complex::ZERO);
    if (0.0..=rect.width() as f64).contains(&ox) {
        let x = rect.min.x + ox as f32;
        painter.line_segment(
            [egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)],
            stroke,
        );
    }
    if (0.0..=rect.height() as f64).contains(&oy) {
        let y = rect.min.y + oy as f32;
        painter.line_segment(
            [egui::pos2(rect.min.x, y), egui::pos2(rect.max.x, y)],
            stroke,
        );
    }
}

fn paint_grid(
    painter: &egui::Painter,
    rect: egui::Rect,
    view: &ViewState,
    grid: &GridInput,
    line_width: f32,
) {
    for line in grid.lines() {
        let style = LineStyle::for_kind(line.kind, line_width);
        let stroke = egui::Stroke::new(style.width, color32(style.color));
        for run in polyline_runs(&line.points, view) {
            let points = run.into_iter().map(|p| to_screen(rect, p)).collect();
            painter.add(egui::Shape::line(points, stroke));
        }
    }
}
