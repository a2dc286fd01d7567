//! Sampling of the input pattern.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::complex::Complex;
use crate::error::CoreError;
use crate::view::PlaneRect;

/// Upper bound on the number of lines in either direction.
pub const MAX_LINES: u32 = 250;
/// Upper bound on the samples along one line.
pub const MAX_POINTS_PER_LINE: u32 = 20_000;

/// Edge of the grid extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Bottom,
    Right,
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Constant imaginary part.
    Horizontal,
    /// Constant real part.
    Vertical,
    Boundary(Side),
    /// Constant modulus around the extent centre.
    Circle,
    /// Constant argument around the extent centre.
    Ray,
    /// Outermost circle of the polar pattern.
    Rim,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GridPattern {
    #[default]
    Cartesian,
    Polar,
}

/// Extent and resolution of the input pattern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub extent: PlaneRect,
    pub horizontal_lines: u32,
    pub vertical_lines: u32,
    pub points_per_line: u32,
    #[serde(default)]
    pub pattern: GridPattern,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            extent: PlaneRect::new(-PI / 2.0, PI / 2.0, -PI / 3.0, PI / 3.0),
            horizontal_lines: 30,
            vertical_lines: 40,
            points_per_line: 1000,
            pattern: GridPattern::Cartesian,
        }
    }
}

impl GridSpec {
    /// Wider, coarser grid suited to the zeta function's critical strip.
    pub fn zeta() -> Self {
        Self {
            extent: PlaneRect::new(-8.0 * PI / 5.0, 8.0 * PI / 5.0, -PI, PI),
            horizontal_lines: 48,
            vertical_lines: 60,
            points_per_line: 250,
            pattern: GridPattern::Cartesian,
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        let e = &self.extent;
        if !e.is_valid() {
            return Err(CoreError::InvalidGrid {
                reason: format!(
                    "extent must satisfy x_min < x_max and y_min < y_max, got [{}, {}] × [{}, {}]",
                    e.x_min, e.x_max, e.y_min, e.y_max
                ),
            });
        }
        for (what, n) in [
            ("horizontal", self.horizontal_lines),
            ("vertical", self.vertical_lines),
        ] {
            if !(1..=MAX_LINES).contains(&n) {
                return Err(CoreError::InvalidGrid {
                    reason: format!("{what} line count must be in 1..={MAX_LINES}, got {n}"),
                });
            }
        }
        if !(2..=MAX_POINTS_PER_LINE).contains(&self.points_per_line) {
            return Err(CoreError::InvalidGrid {
                reason: format!(
                    "points per line must be in 2..={MAX_POINTS_PER_LINE}, got {}",
                    self.points_per_line
                ),
            });
        }
        Ok(())
    }

    /// Sample the pattern. Deterministic for a given spec.
    pub fn sample(&self) -> crate::Result<GridInput> {
        self.validate()?;
        let lines = match self.pattern {
            GridPattern::Cartesian => self.cartesian_lines(),
            GridPattern::Polar => self.polar_lines(),
        };
        let input = GridInput { lines };
        debug!(
            pattern = ?self.pattern,
            lines = input.lines.len(),
            points = input.point_count(),
            "sampled grid input"
        );
        Ok(input)
    }

    fn cartesian_lines(&self) -> Vec<GridLine> {
        let e = self.extent;
        let n = self.points_per_line as usize;
        let mut lines = Vec::with_capacity(
            (self.horizontal_lines + self.vertical_lines) as usize + 6,
        );

        let dy = e.height() / self.horizontal_lines as f64;
        for i in 0..=self.horizontal_lines {
            let y = e.y_min + i as f64 * dy;
            lines.push(GridLine::segment(
                LineKind::Horizontal,
                Complex::new(e.x_min, y),
                Complex::new(e.x_max, y),
                n,
            ));
        }
        let dx = e.width() / self.vertical_lines as f64;
        for i in 0..=self.vertical_lines {
            let x = e.x_min + i as f64 * dx;
            lines.push(GridLine::segment(
                LineKind::Vertical,
                Complex::new(x, e.y_min),
                Complex::new(x, e.y_max),
                n,
            ));
        }

        let (bl, br) = (Complex::new(e.x_min, e.y_min), Complex::new(e.x_max, e.y_min));
        let (tl, tr) = (Complex::new(e.x_min, e.y_max), Complex::new(e.x_max, e.y_max));
        for (side, from, to) in [
            (Side::Left, bl, tl),
            (Side::Bottom, bl, br),
            (Side::Right, br, tr),
            (Side::Top, tl, tr),
        ] {
            lines.push(GridLine::segment(LineKind::Boundary(side), from, to, n));
        }
        lines
    }

    fn polar_lines(&self) -> Vec<GridLine> {
        let e = self.extent;
        let c = e.center();
        let radius = e.width().min(e.height()) / 2.0;
        let n = self.points_per_line as usize;
        let mut lines = Vec::with_capacity((self.horizontal_lines + self.vertical_lines) as usize);

        let circles = self.horizontal_lines;
        for i in 1..=circles {
            let r = radius * i as f64 / circles as f64;
            let kind = if i == circles {
                LineKind::Rim
            } else {
                LineKind::Circle
            };
            let points = (0..n)
                .map(|k| c + Complex::from_polar(r, TAU * k as f64 / (n - 1) as f64))
                .collect();
            lines.push(GridLine { kind, points });
        }
        for j in 0..self.vertical_lines {
            let theta = TAU * j as f64 / self.vertical_lines as f64;
            let tip = c + Complex::from_polar(radius, theta);
            lines.push(GridLine::segment(LineKind::Ray, c, tip, n));
        }
        lines
    }
}

/// One sampled line of the input pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    pub kind: LineKind,
    pub points: Vec<Complex>,
}

impl GridLine {
    /// `n` evenly spaced points from `from` to `to`, both included.
    pub fn segment(kind: LineKind, from: Complex, to: Complex, n: usize) -> Self {
        let n = n.max(2);
        let step = (to - from) / (n - 1) as f64;
        let points = (0..n)
            .map(|i| {
                if i == n - 1 {
                    to
                } else {
                    from + step * i as f64
                }
            })
            .collect();
        Self { kind, points }
    }
}

/// The sampled input pattern, in drawing order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridInput {
    pub lines: Vec<GridLine>,
}

impl GridInput {
    pub fn lines(&self) -> &[GridLine] {
        &self.lines
    }

    pub fn point_count(&self) -> usize {
        self.lines.iter().map(|l| l.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
