//! Stroke colours and widths per line kind.

use zmapper_core::{LineKind, Side};

use crate::buffer::Rgba;

pub const HORIZONTAL: Rgba = [31, 119, 180, 255];
pub const VERTICAL: Rgba = [255, 127, 14, 255];
pub const BOUNDARY_LEFT_RIGHT: Rgba = [255, 165, 0, 255];
pub const BOUNDARY_BOTTOM_TOP: Rgba = [0, 0, 139, 255];
pub const AXES: Rgba = [160, 160, 160, 255];
pub const BACKGROUND: Rgba = [255, 255, 255, 255];

/// Boundary strokes are this many times heavier than interior lines.
pub const BOUNDARY_WEIGHT: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Rgba,
    pub width: f32,
}

impl LineStyle {
    /// Style for `kind`, with interior lines drawn `base_width` pixels wide.
    pub fn for_kind(kind: LineKind, base_width: f32) -> Self {
        let heavy = base_width * BOUNDARY_WEIGHT;
        match kind {
            LineKind::Horizontal | LineKind::Circle => Self {
                color: HORIZONTAL,
                width: base_width,
            },
            LineKind::Vertical | LineKind::Ray => Self {
                color: VERTICAL,
                width: base_width,
            },
            LineKind::Boundary(Side::Left | Side::Right) => Self {
                color: BOUNDARY_LEFT_RIGHT,
                width: heavy,
            },
            LineKind::Boundary(Side::Bottom | Side::Top) | LineKind::Rim => Self {
                color: BOUNDARY_BOTTOM_TOP,
                width: heavy,
            },
        }
    }
}
