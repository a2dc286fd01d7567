//! Scriptable plotting: render mappings to images without the GUI.
//!
//! ```no_run
//! use zmapper_core::{Formula, ParamValues};
//! use zmapper_render::plot::{grid_plot, PlotFormat};
//!
//! let f = Formula::parse("z^2").unwrap().compile().unwrap();
//! let image = grid_plot(&PlotFormat::default(), &f, &ParamValues::new()).unwrap();
//! assert_eq!(image.width(), 800);
//! ```

use std::path::Path;

use tracing::debug;

use zmapper_core::grid::MAX_LINES;
use zmapper_core::{
    CompiledFunction, Complex, CoreError, GridInput, GridSpec, ParamValues, PlaneRect, ViewState,
};

use crate::buffer::{Rgba, RenderBuffer, BLACK};
use crate::error::RenderError;
use crate::export::{export_png, ExportMetadata};
use crate::mapping::{map_grid, map_points};
use crate::polyline::{pixel_runs, polyline_runs};
use crate::style::{LineStyle, AXES, BACKGROUND, HORIZONTAL};

/// Fraction of the image left free around automatically framed plots.
const AUTO_MARGIN: f64 = 0.05;
/// Share of points allowed to fall outside automatic bounds at each end.
const AUTO_QUANTILE: f64 = 0.01;
/// Pixels between the panes of [`grid_plot_both`].
const PANE_GAP: u32 = 8;
const PATH_IMAGE: Rgba = [0, 255, 255, 255];
/// Automatic bounds are clamped to this magnitude so their span stays finite.
const AUTO_LIMIT: f64 = f64::MAX / 8.0;

pub const REAL_PART: Rgba = [255, 0, 0, 255];
pub const IMAG_PART: Rgba = [0, 0, 255, 255];
pub const MODULUS: Rgba = [128, 128, 128, 255];

/// Appearance and extent of a scripted plot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotFormat {
    pub title: String,
    /// Input rectangle whose grid is mapped.
    pub grid_boundaries: PlaneRect,
    /// Visible output rectangle; `None` frames the image automatically.
    pub plot_boundaries: Option<PlaneRect>,
    pub points_per_line: u32,
    /// Distance between neighbouring grid lines in plane units.
    pub spacing: f64,
    pub width: u32,
    pub height: u32,
    pub line_width: f32,
}

impl Default for PlotFormat {
    fn default() -> Self {
        Self {
            title: String::new(),
            grid_boundaries: PlaneRect::new(-5.0, 5.0, -5.0, 5.0),
            plot_boundaries: None,
            points_per_line: 100,
            spacing: 1.0,
            width: 800,
            height: 800,
            line_width: 1.0,
        }
    }
}

impl PlotFormat {
    /// The grid described by the boundaries and spacing.
    pub fn grid_spec(&self) -> crate::Result<GridSpec> {
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(CoreError::InvalidGrid {
                reason: format!("spacing must be positive, got {}", self.spacing),
            }
            .into());
        }
        let e = self.grid_boundaries;
        let lines = |span: f64| ((span / self.spacing).round().max(1.0) as u32).min(MAX_LINES);
        let spec = GridSpec {
            extent: e,
            horizontal_lines: lines(e.height()),
            vertical_lines: lines(e.width()),
            points_per_line: self.points_per_line,
            ..GridSpec::default()
        };
        spec.validate()?;
        Ok(spec)
    }

    fn check_dimensions(&self) -> crate::Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    fn view_for(&self, auto: Option<PlaneRect>) -> crate::Result<ViewState> {
        let view = match self.plot_boundaries {
            Some(rect) => ViewState::fit_rect(rect, self.width, self.height, 0.0)?,
            None => {
                let rect = auto.unwrap_or(self.grid_boundaries);
                ViewState::fit_rect(rect, self.width, self.height, AUTO_MARGIN)?
            }
        };
        Ok(view)
    }
}

/// Image of the grid under `function`.
pub fn grid_plot(
    format: &PlotFormat,
    function: &CompiledFunction,
    values: &ParamValues,
) -> crate::Result<RenderBuffer> {
    format.check_dimensions()?;
    let input = format.grid_spec()?.sample()?;
    let output = map_grid(&input, function, values);
    let auto = robust_bounds(output.lines.iter().flat_map(|l| l.points.iter().copied()));
    let view = format.view_for(auto)?;
    rasterize(&output, &view, format.line_width)
}

/// Domain grid on the left, its image on the right.
pub fn grid_plot_both(
    format: &PlotFormat,
    function: &CompiledFunction,
    values: &ParamValues,
) -> crate::Result<RenderBuffer> {
    format.check_dimensions()?;
    let input = format.grid_spec()?.sample()?;
    let domain_view = ViewState::fit_rect(
        format.grid_boundaries,
        format.width,
        format.height,
        AUTO_MARGIN,
    )?;
    let domain = rasterize(&input, &domain_view, format.line_width)?;
    let range = grid_plot(format, function, values)?;
    RenderBuffer::hstack(&domain, &range, PANE_GAP, BACKGROUND)
}

/// Image of the path `t ↦ path(t)` under `function`, optionally with the
/// path itself drawn in black underneath.
pub fn line_plot(
    t: &[f64],
    path: impl Fn(f64) -> Complex,
    function: &CompiledFunction,
    values: &ParamValues,
    format: &PlotFormat,
    show_identity: bool,
) -> crate::Result<RenderBuffer> {
    format.check_dimensions()?;
    let zs: Vec<Complex> = t.iter().map(|&t| path(t)).collect();
    let ws = map_points(&zs, function, values);
    let auto = if show_identity {
        robust_bounds(zs.iter().chain(&ws).copied())
    } else {
        robust_bounds(ws.iter().copied())
    };
    let view = format.view_for(auto)?;

    let mut buffer = RenderBuffer::filled(format.width, format.height, BACKGROUND)?;
    draw_axes(&mut buffer, &view);
    let image_color = if show_identity {
        for run in polyline_runs(&zs, &view) {
            buffer.draw_polyline(&run, BLACK, format.line_width);
        }
        PATH_IMAGE
    } else {
        HORIZONTAL
    };
    for run in polyline_runs(&ws, &view) {
        buffer.draw_polyline(&run, image_color, format.line_width);
    }
    Ok(buffer)
}

/// Real part, imaginary part and modulus of `function` along the path,
/// plotted against `t` in red, blue and grey.
///
/// The horizontal axis spans `t` exactly unless `format.plot_boundaries`
/// gives a `(t, value)` window.
pub fn values_along_path(
    t: &[f64],
    path: impl Fn(f64) -> Complex,
    function: &CompiledFunction,
    values: &ParamValues,
    format: &PlotFormat,
) -> crate::Result<RenderBuffer> {
    format.check_dimensions()?;
    let zs: Vec<Complex> = t.iter().map(|&t| path(t)).collect();
    let ws = map_points(&zs, function, values);
    let curves: [(fn(&Complex) -> f64, Rgba); 3] = [
        (|w: &Complex| w.re, REAL_PART),
        (|w: &Complex| w.im, IMAG_PART),
        (|w: &Complex| w.norm(), MODULUS),
    ];

    let window = match format.plot_boundaries {
        Some(rect) => rect,
        None => {
            let (Some(&t0), Some(&t1)) = (t.first(), t.last()) else {
                return Err(RenderError::InvalidPath {
                    reason: "no sample points".to_string(),
                });
            };
            let mut all: Vec<f64> = curves
                .iter()
                .flat_map(|(part, _)| ws.iter().map(part))
                .filter(|v| v.is_finite())
                .collect();
            all.sort_by(f64::total_cmp);
            let (lo, hi) = if all.is_empty() {
                (-1.0, 1.0)
            } else {
                quantile_span(&all)
            };
            let pad = (hi - lo) * AUTO_MARGIN;
            PlaneRect::new(t0, t1, lo - pad, hi + pad)
        }
    };
    if !window.is_valid() {
        return Err(RenderError::InvalidPath {
            reason: format!("cannot plot against the window {window:?}"),
        });
    }

    let (w, h) = (format.width as f64, format.height as f64);
    let project = |s: f64, v: f64| {
        (
            (s - window.x_min) / window.width() * w,
            (window.y_max - v) / window.height() * h,
        )
    };

    let mut buffer = RenderBuffer::filled(format.width, format.height, BACKGROUND)?;
    let (ox, oy) = project(0.0, 0.0);
    if (0.0..=w).contains(&ox) {
        buffer.draw_line((ox, 0.0), (ox, h), AXES, 1.0);
    }
    if (0.0..=h).contains(&oy) {
        buffer.draw_line((0.0, oy), (w, oy), AXES, 1.0);
    }
    for (part, color) in curves {
        let pixels = t.iter().zip(&ws).map(|(&s, wv)| {
            let v = part(wv);
            v.is_finite().then(|| project(s, v))
        });
        for run in pixel_runs(pixels, format.width, format.height) {
            buffer.draw_polyline(&run, color, format.line_width);
        }
    }
    Ok(buffer)
}

/// Write a scripted plot as PNG. The plot title, formula, parameters and
/// boundaries go into tEXt chunks.
pub fn save_plot(
    image: &RenderBuffer,
    path: &Path,
    format: &PlotFormat,
    formula: &str,
    values: &ParamValues,
) -> crate::Result<()> {
    let mut meta = ExportMetadata::new(formula, values.clone(), format.grid_boundaries);
    if !format.title.is_empty() {
        meta.title = format.title.clone();
    }
    meta.view = format.plot_boundaries;
    debug!(title = %meta.title, "saving scripted plot");
    export_png(image, path, &meta)
}

/// Parameter values in `t` where `function` vanishes along the path.
///
/// Local minima of `|f|` on the sampled path, the two ends included, are
/// refined by golden-section search between their neighbours and kept when
/// `|f|` drops below `tolerance`.
pub fn find_zeros_along_path(
    t: &[f64],
    path: impl Fn(f64) -> Complex,
    function: &CompiledFunction,
    values: &ParamValues,
    tolerance: f64,
) -> Vec<f64> {
    let slots = function.bind(values);
    let modulus = |s: f64| {
        let v = function.eval_bound(path(s), &slots).norm();
        if v.is_nan() {
            f64::INFINITY
        } else {
            v
        }
    };
    let samples: Vec<f64> = t.iter().map(|&s| modulus(s)).collect();

    let n = samples.len();
    if n < 2 {
        return t
            .iter()
            .copied()
            .filter(|&s| modulus(s) < tolerance)
            .collect();
    }

    let mut brackets = Vec::new();
    if samples[0] < samples[1] {
        brackets.push((0, 1));
    }
    for i in 1..n - 1 {
        if samples[i] <= samples[i - 1] && samples[i] < samples[i + 1] {
            brackets.push((i - 1, i + 1));
        }
    }
    if samples[n - 1] < samples[n - 2] {
        brackets.push((n - 2, n - 1));
    }

    brackets
        .into_iter()
        .map(|(lo, hi)| golden_section_min(&modulus, t[lo], t[hi]))
        .filter(|&s| modulus(s) < tolerance)
        .collect()
}

fn golden_section_min(f: &impl Fn(f64) -> f64, mut a: f64, mut b: f64) -> f64 {
    let inv_phi = (5.0f64.sqrt() - 1.0) / 2.0;
    let mut c = b - inv_phi * (b - a);
    let mut d = a + inv_phi * (b - a);
    let (mut fc, mut fd) = (f(c), f(d));
    for _ in 0..100 {
        if (b - a).abs() <= 1e-14 * (1.0 + a.abs() + b.abs()) {
            break;
        }
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - inv_phi * (b - a);
            fc = f(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + inv_phi * (b - a);
            fd = f(d);
        }
    }
    (a + b) / 2.0
}

/// Draw every line of `grid` as seen through `view`.
pub fn rasterize(
    grid: &GridInput,
    view: &ViewState,
    line_width: f32,
) -> crate::Result<RenderBuffer> {
    let mut buffer = RenderBuffer::filled(view.width, view.height, BACKGROUND)?;
    draw_axes(&mut buffer, view);
    for line in grid.lines() {
        let style = LineStyle::for_kind(line.kind, line_width);
        for run in polyline_runs(&line.points, view) {
            buffer.draw_polyline(&run, style.color, style.width);
        }
    }
    Ok(buffer)
}

/// Real and imaginary axes, where visible.
pub fn draw_axes(buffer: &mut RenderBuffer, view: &ViewState) {
    let (ox, oy) = view.to_pixel(Complex::ZERO);
    let (w, h) = (buffer.width() as f64, buffer.height() as f64);
    if (0.0..=w).contains(&ox) {
        buffer.draw_line((ox, 0.0), (ox, h), AXES, 1.0);
    }
    if (0.0..=h).contains(&oy) {
        buffer.draw_line((0.0, oy), (w, oy), AXES, 1.0);
    }
}

/// Bounds of the finite points with the outermost quantiles discarded, so
/// a handful of values near a pole do not shrink the rest to a dot.
pub fn robust_bounds(points: impl Iterator<Item = Complex>) -> Option<PlaneRect> {
    let (mut re, mut im): (Vec<f64>, Vec<f64>) = points
        .filter(|z| z.is_finite())
        .map(|z| (z.re, z.im))
        .unzip();
    if re.is_empty() {
        return None;
    }
    re.sort_by(f64::total_cmp);
    im.sort_by(f64::total_cmp);
    let (x_min, x_max) = quantile_span(&re);
    let (y_min, y_max) = quantile_span(&im);
    Some(PlaneRect::new(x_min, x_max, y_min, y_max))
}

fn quantile_span(sorted: &[f64]) -> (f64, f64) {
    let last = sorted.len() - 1;
    let k = (last as f64 * AUTO_QUANTILE).round() as usize;
    let lo = sorted[k].clamp(-AUTO_LIMIT, AUTO_LIMIT);
    let hi = sorted[last - k].clamp(-AUTO_LIMIT, AUTO_LIMIT);
    if hi > lo {
        (lo, hi)
    } else {
        // One unit, or a relative pad once one unit vanishes in rounding.
        let pad = lo.abs().max(1e6) * 1e-6;
        (lo - pad, hi + pad)
    }
}
