use tiny_skia::{
    Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

use crate::error::RenderError;

/// RGBA colour, 8 bits per channel.
pub type Rgba = [u8; 4];

pub const WHITE: Rgba = [255, 255, 255, 255];
pub const BLACK: Rgba = [0, 0, 0, 255];

/// An opaque RGBA canvas the mapped lines are stroked onto.
///
/// Backed by a [`tiny_skia::Pixmap`]. Every buffer starts from an opaque
/// fill, so the premultiplied pixel data is also plain RGBA.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBuffer {
    pixmap: Pixmap,
}

impl RenderBuffer {
    /// Create a new buffer filled with black (opaque).
    pub fn new(width: u32, height: u32) -> crate::Result<Self> {
        Self::filled(width, height, BLACK)
    }

    pub fn filled(width: u32, height: u32, color: Rgba) -> crate::Result<Self> {
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::InvalidDimensions { width, height })?;
        let [r, g, b, _] = color;
        pixmap.fill(Color::from_rgba8(r, g, b, 255));
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// RGBA pixel data, 4 bytes per pixel, row-major order.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Stroke a segment between two points in pixel coordinates.
    pub fn draw_line(&mut self, a: (f64, f64), b: (f64, f64), color: Rgba, width: f32) {
        self.draw_polyline(&[a, b], color, width);
    }

    /// Stroke connected, anti-aliased segments through `points`.
    pub fn draw_polyline(&mut self, points: &[(f64, f64)], color: Rgba, width: f32) {
        let mut pb = PathBuilder::new();
        let mut coords = points.iter().map(|&(x, y)| (x as f32, y as f32));
        let Some((x, y)) = coords.next() else {
            return;
        };
        pb.move_to(x, y);
        for (x, y) in coords {
            pb.line_to(x, y);
        }
        let Some(path) = pb.finish() else {
            return;
        };

        let mut paint = Paint::default();
        let [r, g, b, a] = color;
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;
        let stroke = Stroke {
            width: width.max(0.5),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Place two buffers side by side with a `gap`-pixel column between them.
    pub fn hstack(left: &Self, right: &Self, gap: u32, background: Rgba) -> crate::Result<Self> {
        let width = left.width() + gap + right.width();
        let height = left.height().max(right.height());
        let mut out = Self::filled(width, height, background)?;
        out.blit(left, 0, 0);
        out.blit(right, left.width() + gap, 0);
        Ok(out)
    }

    /// Copy `src` into this buffer with its top-left corner at `(x, y)`.
    pub fn blit(&mut self, src: &Self, x: u32, y: u32) {
        let (x, y) = (x.min(i32::MAX as u32) as i32, y.min(i32::MAX as u32) as i32);
        self.pixmap.draw_pixmap(
            x,
            y,
            src.pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [255, 0, 0, 255];

    fn reddish(px: Option<Rgba>) -> bool {
        matches!(px, Some([r, g, b, 255]) if r > 200 && g < 80 && b < 80)
    }

    #[test]
    fn new_buffer_is_black_opaque() {
        let buf = RenderBuffer::new(4, 4).unwrap();
        assert_eq!(buf.pixels().len(), 4 * 4 * 4);
        for chunk in buf.pixels().chunks_exact(4) {
            assert_eq!(chunk, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn zero_sized_buffer_is_rejected() {
        assert!(matches!(
            RenderBuffer::new(0, 3),
            Err(RenderError::InvalidDimensions {
                width: 0,
                height: 3
            })
        ));
    }

    #[test]
    fn horizontal_line_covers_its_row() {
        let mut buf = RenderBuffer::filled(10, 10, WHITE).unwrap();
        buf.draw_line((0.0, 5.0), (10.0, 5.0), RED, 2.0);
        for x in 1..9 {
            assert!(reddish(buf.pixel(x, 4)), "pixel {x} is {:?}", buf.pixel(x, 4));
            assert!(reddish(buf.pixel(x, 5)));
        }
        assert_eq!(buf.pixel(5, 0), Some(WHITE));
        assert_eq!(buf.pixel(5, 9), Some(WHITE));
    }

    #[test]
    fn far_away_endpoints_are_clipped() {
        let mut buf = RenderBuffer::filled(8, 8, WHITE).unwrap();
        buf.draw_line((-5e4, 4.0), (5e4, 4.0), RED, 2.0);
        assert!(reddish(buf.pixel(0, 4)));
        assert!(reddish(buf.pixel(7, 3)));
    }

    #[test]
    fn segment_outside_buffer_draws_nothing() {
        let mut buf = RenderBuffer::filled(8, 8, WHITE).unwrap();
        let before = buf.clone();
        buf.draw_line((-50.0, -50.0), (-20.0, 100.0), RED, 2.0);
        assert_eq!(buf, before);
    }

    #[test]
    fn hstack_places_buffers_side_by_side() {
        let left = RenderBuffer::filled(2, 2, RED).unwrap();
        let right = RenderBuffer::filled(3, 1, BLACK).unwrap();
        let out = RenderBuffer::hstack(&left, &right, 1, WHITE).unwrap();
        assert_eq!((out.width(), out.height()), (6, 2));
        assert_eq!(out.pixel(1, 1), Some(RED));
        assert_eq!(out.pixel(2, 0), Some(WHITE));
        assert_eq!(out.pixel(3, 0), Some(BLACK));
        assert_eq!(out.pixel(3, 1), Some(WHITE));
    }
}
