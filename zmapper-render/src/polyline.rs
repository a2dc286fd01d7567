//! Conversion of mapped points into drawable pixel-space runs.
//!
//! Mapped lines pass through poles, so a line is split wherever a value is
//! non-finite or lands absurdly far from the pane. Each run is then safe to
//! stroke as one connected polyline.

use zmapper_core::{Complex, ViewState};

/// Points further than this many pane sizes outside the pane break a line.
pub const CLIP_FACTOR: f64 = 64.0;

/// Split `points` into runs of at least two pixel positions.
pub fn polyline_runs(points: &[Complex], view: &ViewState) -> Vec<Vec<(f64, f64)>> {
    pixel_runs(
        points
            .iter()
            .map(|&z| z.is_finite().then(|| view.to_pixel(z))),
        view.width,
        view.height,
    )
}

/// Split already projected points into drawable runs for a `width`×`height`
/// image. `None` and far off-image positions break the line.
pub fn pixel_runs(
    pixels: impl IntoIterator<Item = Option<(f64, f64)>>,
    width: u32,
    height: u32,
) -> Vec<Vec<(f64, f64)>> {
    let w = width as f64;
    let h = height as f64;
    let (min_x, max_x) = (-CLIP_FACTOR * w, (CLIP_FACTOR + 1.0) * w);
    let (min_y, max_y) = (-CLIP_FACTOR * h, (CLIP_FACTOR + 1.0) * h);

    let mut runs = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    for p in pixels {
        match p {
            Some((px, py))
                if (min_x..=max_x).contains(&px) && (min_y..=max_y).contains(&py) =>
            {
                current.push((px, py));
            }
            _ => flush(&mut runs, &mut current),
        }
    }
    flush(&mut runs, &mut current);
    runs
}

fn flush(runs: &mut Vec<Vec<(f64, f64)>>, current: &mut Vec<(f64, f64)>) {
    let run = std::mem::take(current);
    if run.len() >= 2 {
        runs.push(run);
    }
}
