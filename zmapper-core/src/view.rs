use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;

/// Axis-aligned rectangle of the complex plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneRect {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl PlaneRect {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn center(&self) -> Complex {
        Complex::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    pub fn contains(&self, z: Complex) -> bool {
        (self.x_min..=self.x_max).contains(&z.re) && (self.y_min..=self.y_max).contains(&z.im)
    }

    /// Whether the bounds are finite and the rectangle has positive area.
    pub fn is_valid(&self) -> bool {
        [self.x_min, self.x_max, self.y_min, self.y_max]
            .iter()
            .all(|v| v.is_finite())
            && self.x_min < self.x_max
            && self.y_min < self.y_max
    }
}

/// The visible region of one plot pane.
///
/// Centred on `center`, with `scale` plane units per pixel. Pixel `(0, 0)` is
/// the top-left corner and pixel y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub center: Complex,

    /// Plane units per pixel.
    pub scale: f64,

    /// Pane width in pixels.
    pub width: u32,

    /// Pane height in pixels.
    pub height: u32,
}

impl ViewState {
    pub fn new(center: Complex, scale: f64, width: u32, height: u32) -> crate::Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidViewport {
                reason: format!("dimensions must be > 0, got {width}×{height}"),
            });
        }
        if scale <= 0.0 || !scale.is_finite() {
            return Err(CoreError::InvalidViewport {
                reason: format!("scale must be positive and finite, got {scale}"),
            });
        }
        Ok(Self {
            center,
            scale,
            width,
            height,
        })
    }

    /// Frame `rect` in a `width`×`height` pane, leaving `margin` (a fraction
    /// of the pane, per side) free around it.
    pub fn fit_rect(rect: PlaneRect, width: u32, height: u32, margin: f64) -> crate::Result<Self> {
        if !rect.is_valid() {
            return Err(CoreError::InvalidViewport {
                reason: format!("cannot frame a degenerate rectangle {rect:?}"),
            });
        }
        let usable = (1.0 - 2.0 * margin.clamp(0.0, 0.45)).max(f64::EPSILON);
        let w = width.max(1) as f64 * usable;
        let h = height.max(1) as f64 * usable;
        let scale = (rect.width() / w).max(rect.height() / h);
        Self::new(rect.center(), scale, width, height)
    }

    /// Map fractional pixel coordinates to a plane point.
    #[inline]
    pub fn to_complex(&self, px: f64, py: f64) -> Complex {
        let half_w = self.width as f64 / 2.0;
        let half_h = self.height as f64 / 2.0;
        Complex::new(
            self.center.re + (px - half_w) * self.scale,
            self.center.im - (py - half_h) * self.scale,
        )
    }

    /// Inverse of [`to_complex`](Self::to_complex).
    #[inline]
    pub fn to_pixel(&self, z: Complex) -> (f64, f64) {
        let half_w = self.width as f64 / 2.0;
        let half_h = self.height as f64 / 2.0;
        (
            (z.re - self.center.re) / self.scale + half_w,
            half_h - (z.im - self.center.im) / self.scale,
        )
    }

    /// Translate by a drag of `(dx, dy)` pixels; content follows the cursor.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.center.re -= dx * self.scale;
        self.center.im += dy * self.scale;
    }

    /// Multiply the scale by `factor`, keeping the plane point under the
    /// pivot pixel fixed. `factor < 1` zooms in. Non-positive or non-finite
    /// factors are ignored.
    pub fn zoom(&mut self, factor: f64, pivot_x: f64, pivot_y: f64) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        let anchor = self.to_complex(pivot_x, pivot_y);
        self.scale *= factor;
        let half_w = self.width as f64 / 2.0;
        let half_h = self.height as f64 / 2.0;
        self.center = Complex::new(
            anchor.re - (pivot_x - half_w) * self.scale,
            anchor.im + (pivot_y - half_h) * self.scale,
        );
    }

    /// Zoom around the pane centre.
    pub fn zoom_center(&mut self, factor: f64) {
        self.zoom(factor, self.width as f64 / 2.0, self.height as f64 / 2.0);
    }

    /// Change the pane size, keeping centre and scale. Zero sizes are
    /// clamped to one pixel.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    pub fn visible_rect(&self) -> PlaneRect {
        let w = self.complex_width() / 2.0;
        let h = self.complex_height() / 2.0;
        PlaneRect::new(
            self.center.re - w,
            self.center.re + w,
            self.center.im - h,
            self.center.im + h,
        )
    }

    /// The total extent of the view in plane units.
    pub fn complex_width(&self) -> f64 {
        self.width as f64 * self.scale
    }

    /// The total extent of the view in plane units.
    pub fn complex_height(&self) -> f64 {
        self.height as f64 * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    fn approx_eq(a: Complex, b: Complex) -> bool {
        (a.re - b.re).abs() < EPSILON && (a.im - b.im).abs() < EPSILON
    }

    #[test]
    fn to_complex_center() {
        let v = ViewState::new(Complex::new(1.0, -2.0), 0.01, 100, 100).unwrap();
        assert!(approx_eq(v.to_complex(50.0, 50.0), Complex::new(1.0, -2.0)));
    }

    #[test]
    fn to_complex_corners() {
        let v = ViewState::new(Complex::ZERO, 1.0, 100, 100).unwrap();
        // Top-left pixel → positive imaginary, negative real
        assert!(approx_eq(v.to_complex(0.0, 0.0), Complex::new(-50.0, 50.0)));
        assert!(approx_eq(v.to_complex(100.0, 100.0), Complex::new(50.0, -50.0)));
    }

    #[test]
    fn to_pixel_inverts_to_complex() {
        let v = ViewState::new(Complex::new(0.3, 0.7), 0.004, 640, 480).unwrap();
        let z = v.to_complex(123.25, 401.5);
        let (px, py) = v.to_pixel(z);
        assert!((px - 123.25).abs() < 1e-6);
        assert!((py - 401.5).abs() < 1e-6);
    }

    #[test]
    fn zoom_keeps_pivot_fixed() {
        let mut v = ViewState::new(Complex::new(-0.5, 0.25), 0.01, 800, 600).unwrap();
        let before = v.to_complex(200.0, 450.0);
        v.zoom(0.9, 200.0, 450.0);
        assert!(approx_eq(v.to_complex(200.0, 450.0), before));
        assert!((v.scale - 0.009).abs() < 1e-15);
        v.zoom(1.1, 200.0, 450.0);
        assert!(approx_eq(v.to_complex(200.0, 450.0), before));
    }

    #[test]
    fn bad_zoom_factor_is_ignored() {
        let mut v = ViewState::new(Complex::ZERO, 0.01, 100, 100).unwrap();
        let before = v;
        v.zoom(0.0, 10.0, 10.0);
        v.zoom(f64::NAN, 10.0, 10.0);
        assert_eq!(v, before);
    }

    #[test]
    fn pan_then_inverse_restores_center() {
        let mut v = ViewState::new(Complex::new(1.0, 1.0), 0.02, 300, 200).unwrap();
        v.pan(37.0, -12.5);
        assert!(!approx_eq(v.center, Complex::new(1.0, 1.0)));
        v.pan(-37.0, 12.5);
        assert!(approx_eq(v.center, Complex::new(1.0, 1.0)));
    }

    #[test]
    fn pan_moves_content_with_cursor() {
        let mut v = ViewState::new(Complex::ZERO, 0.1, 100, 100).unwrap();
        let z = v.to_complex(10.0, 10.0);
        v.pan(5.0, 5.0);
        assert!(approx_eq(v.to_complex(15.0, 15.0), z));
    }

    #[test]
    fn fit_rect_contains_rect() {
        let rect = PlaneRect::new(-1.5, 1.5, -1.0, 1.0);
        let v = ViewState::fit_rect(rect, 400, 400, 0.05).unwrap();
        let vis = v.visible_rect();
        assert!(vis.x_min <= rect.x_min && vis.x_max >= rect.x_max);
        assert!(vis.y_min <= rect.y_min && vis.y_max >= rect.y_max);
        assert!(approx_eq(v.center, Complex::ZERO));
    }

    #[test]
    fn resize_keeps_center_and_scale() {
        let mut v = ViewState::new(Complex::new(2.0, 3.0), 0.5, 10, 10).unwrap();
        v.resize(0, 40);
        assert_eq!((v.width, v.height), (1, 40));
        assert_eq!(v.center, Complex::new(2.0, 3.0));
        assert_eq!(v.scale, 0.5);
    }

    #[test]
    fn invalid_dimensions() {
        assert!(ViewState::new(Complex::ZERO, 0.01, 0, 100).is_err());
        assert!(ViewState::new(Complex::ZERO, 0.01, 100, 0).is_err());
    }

    #[test]
    fn invalid_scale() {
        assert!(ViewState::new(Complex::ZERO, 0.0, 100, 100).is_err());
        assert!(ViewState::new(Complex::ZERO, -1.0, 100, 100).is_err());
        assert!(ViewState::new(Complex::ZERO, f64::INFINITY, 100, 100).is_err());
    }
}
