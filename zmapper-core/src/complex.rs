use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// A complex number represented as two `f64` components.
///
/// This is a lightweight, `Copy` type used everywhere a point of the plane
/// travels: grid samples, parameter values, evaluation results.
/// We roll our own instead of using `num::Complex` so the pole behaviour of
/// every operation is under our control: nothing here panics, poles produce
/// [`Complex::INFINITY`] and indeterminate forms produce [`Complex::NAN`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };
    pub const ONE: Self = Self { re: 1.0, im: 0.0 };
    pub const I: Self = Self { re: 0.0, im: 1.0 };

    /// Complex infinity, the value of a function at a pole.
    pub const INFINITY: Self = Self {
        re: f64::INFINITY,
        im: 0.0,
    };

    /// Result of an indeterminate form such as `0 / 0`.
    pub const NAN: Self = Self {
        re: f64::NAN,
        im: f64::NAN,
    };

    #[inline]
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    #[inline]
    pub fn from_real(re: f64) -> Self {
        Self { re, im: 0.0 }
    }

    /// Build a number from polar coordinates.
    #[inline]
    pub fn from_polar(r: f64, theta: f64) -> Self {
        Self::new(r * theta.cos(), r * theta.sin())
    }

    /// Returns `re² + im²` without taking the square root.
    #[inline]
    pub fn norm_sq(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Returns `√(re² + im²)`.
    #[inline]
    pub fn norm(self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Principal argument in `(-π, π]`.
    #[inline]
    pub fn arg(self) -> f64 {
        self.im.atan2(self.re)
    }

    #[inline]
    pub fn conj(self) -> Self {
        Self::new(self.re, -self.im)
    }

    /// Both components are finite (neither infinite nor NaN).
    #[inline]
    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    #[inline]
    pub fn is_nan(self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }

    /// `1 / self`.
    #[inline]
    pub fn recip(self) -> Self {
        Self::ONE / self
    }

    pub fn exp(self) -> Self {
        if self.im == 0.0 {
            return Self::from_real(self.re.exp());
        }
        Self::from_polar(self.re.exp(), self.im)
    }

    /// Principal natural logarithm. `ln(0)` is `-∞ + 0i`.
    pub fn ln(self) -> Self {
        Self::new(self.norm().ln(), self.arg())
    }

    /// Principal square root (branch cut along the negative real axis).
    pub fn sqrt(self) -> Self {
        if self.is_zero() {
            return Self::ZERO;
        }
        let r = self.norm();
        let re = ((r + self.re) / 2.0).sqrt();
        let im = ((r - self.re) / 2.0).sqrt();
        Self::new(re, im.copysign(self.im))
    }

    /// `self^w` on the principal branch.
    pub fn powc(self, w: Self) -> Self {
        if self.is_zero() {
            return if w.is_zero() {
                Self::ONE
            } else if w.re > 0.0 {
                Self::ZERO
            } else {
                Self::INFINITY
            };
        }
        // Integer exponents keep exact results for things like `z**2` at real z.
        if w.im == 0.0 && w.re.fract() == 0.0 && w.re.abs() <= 64.0 {
            return self.powi(w.re as i32);
        }
        (w * self.ln()).exp()
    }

    /// `self^n` by repeated squaring.
    pub fn powi(self, n: i32) -> Self {
        if n < 0 {
            return self.powi(-n).recip();
        }
        let mut base = self;
        let mut exp = n as u32;
        let mut acc = Self::ONE;
        while exp > 0 {
            if exp & 1 == 1 {
                acc *= base;
            }
            base *= base;
            exp >>= 1;
        }
        acc
    }

    pub fn powf(self, x: f64) -> Self {
        self.powc(Self::from_real(x))
    }

    // -- Trigonometric ---------------------------------------------------

    pub fn sin(self) -> Self {
        Self::new(
            self.re.sin() * self.im.cosh(),
            self.re.cos() * self.im.sinh(),
        )
    }

    pub fn cos(self) -> Self {
        Self::new(
            self.re.cos() * self.im.cosh(),
            -self.re.sin() * self.im.sinh(),
        )
    }

    pub fn tan(self) -> Self {
        let (a2, b2) = (2.0 * self.re, 2.0 * self.im);
        // sinh/cosh overflow to inf/inf; the limit is ±i.
        if b2.abs() > 700.0 {
            return Self::new(0.0, b2.signum());
        }
        let den = a2.cos() + b2.cosh();
        if den == 0.0 {
            return Self::INFINITY;
        }
        Self::new(a2.sin() / den, b2.sinh() / den)
    }

    pub fn asin(self) -> Self {
        // -i ln(iz + √(1 - z²))
        let iz = Self::I * self;
        let root = (Self::ONE - self * self).sqrt();
        -Self::I * (iz + root).ln()
    }

    pub fn acos(self) -> Self {
        Self::from_real(FRAC_PI_2) - self.asin()
    }

    pub fn atan(self) -> Self {
        // (i/2) [ln(1 - iz) - ln(1 + iz)]
        let iz = Self::I * self;
        let half_i = Self::new(0.0, 0.5);
        half_i * ((Self::ONE - iz).ln() - (Self::ONE + iz).ln())
    }

    // -- Hyperbolic ------------------------------------------------------

    pub fn sinh(self) -> Self {
        Self::new(
            self.re.sinh() * self.im.cos(),
            self.re.cosh() * self.im.sin(),
        )
    }

    pub fn cosh(self) -> Self {
        Self::new(
            self.re.cosh() * self.im.cos(),
            self.re.sinh() * self.im.sin(),
        )
    }

    pub fn tanh(self) -> Self {
        // tanh(z) = -i tan(iz)
        let t = Self::new(-self.im, self.re).tan();
        Self::new(t.im, -t.re)
    }

    pub fn asinh(self) -> Self {
        (self + (self * self + Self::ONE).sqrt()).ln()
    }

    pub fn acosh(self) -> Self {
        (self + (self + Self::ONE).sqrt() * (self - Self::ONE).sqrt()).ln()
    }

    pub fn atanh(self) -> Self {
        ((Self::ONE + self).ln() - (Self::ONE - self).ln()) * 0.5
    }
}

impl From<f64> for Complex {
    fn from(re: f64) -> Self {
        Self::from_real(re)
    }
}

// -- Arithmetic operators --

impl Add for Complex {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl AddAssign for Complex {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.re += rhs.re;
        self.im += rhs.im;
    }
}

impl Sub for Complex {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            re: self.re - rhs.re,
            im: self.im - rhs.im,
        }
    }
}

impl SubAssign for Complex {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.re -= rhs.re;
        self.im -= rhs.im;
    }
}

impl Mul for Complex {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}

impl MulAssign for Complex {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

/// Smith's algorithm, with explicit pole handling.
///
/// `x / 0` is complex infinity for `x ≠ 0`, `0 / 0` is NaN, and a finite
/// value divided by an infinite one is zero.
impl Div for Complex {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        if rhs.is_zero() {
            return if self.is_zero() || self.is_nan() {
                Self::NAN
            } else {
                Self::INFINITY
            };
        }
        if self.is_finite() && (rhs.re.is_infinite() || rhs.im.is_infinite()) {
            return Self::ZERO;
        }
        if rhs.re.abs() >= rhs.im.abs() {
            let r = rhs.im / rhs.re;
            let d = rhs.re + rhs.im * r;
            Self::new((self.re + self.im * r) / d, (self.im - self.re * r) / d)
        } else {
            let r = rhs.re / rhs.im;
            let d = rhs.re * r + rhs.im;
            Self::new((self.re * r + self.im) / d, (self.im * r - self.re) / d)
        }
    }
}

impl Neg for Complex {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            re: -self.re,
            im: -self.im,
        }
    }
}

/// Scalar multiplication: `Complex * f64`.
impl Mul<f64> for Complex {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self {
            re: self.re * rhs,
            im: self.im * rhs,
        }
    }
}

impl Div<f64> for Complex {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f64) -> Self {
        self / Self::from_real(rhs)
    }
}

impl std::fmt::Display for Complex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.im >= 0.0 || self.im.is_nan() {
            write!(f, "{} + {}i", self.re, self.im)
        } else {
            write!(f, "{} - {}i", self.re, -self.im)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPSILON: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn capprox(a: Complex, b: Complex, tol: f64) -> bool {
        (a - b).norm() < tol
    }

    #[test]
    fn addition() {
        let a = Complex::new(1.0, 2.0);
        let b = Complex::new(3.0, 4.0);
        let c = a + b;
        assert!(approx_eq(c.re, 4.0));
        assert!(approx_eq(c.im, 6.0));
    }

    #[test]
    fn multiplication() {
        // (1 + 2i)(3 + 4i) = 3 + 4i + 6i + 8i² = -5 + 10i
        let c = Complex::new(1.0, 2.0) * Complex::new(3.0, 4.0);
        assert!(approx_eq(c.re, -5.0));
        assert!(approx_eq(c.im, 10.0));
    }

    #[test]
    fn division() {
        // (-5 + 10i) / (3 + 4i) = 1 + 2i
        let c = Complex::new(-5.0, 10.0) / Complex::new(3.0, 4.0);
        assert!(capprox(c, Complex::new(1.0, 2.0), EPSILON));
        // Same with the imaginary part dominating the denominator.
        let d = Complex::new(1.0, 0.0) / Complex::new(0.0, 2.0);
        assert!(capprox(d, Complex::new(0.0, -0.5), EPSILON));
    }

    #[test]
    fn division_by_zero_is_infinite() {
        let c = Complex::new(1.0, 1.0) / Complex::ZERO;
        assert!(!c.is_finite());
        assert!(!c.is_nan());
    }

    #[test]
    fn zero_over_zero_is_nan() {
        assert!((Complex::ZERO / Complex::ZERO).is_nan());
    }

    #[test]
    fn reciprocal_of_infinity_is_zero() {
        assert_eq!(Complex::INFINITY.recip(), Complex::ZERO);
    }

    #[test]
    fn norm_and_arg() {
        let a = Complex::new(3.0, 4.0);
        assert!(approx_eq(a.norm_sq(), 25.0));
        assert!(approx_eq(a.norm(), 5.0));
        assert!(approx_eq(Complex::new(-1.0, 0.0).arg(), PI));
    }

    #[test]
    fn euler_identity() {
        let e = Complex::new(0.0, PI).exp();
        assert!(capprox(e, Complex::new(-1.0, 0.0), 1e-12));
    }

    #[test]
    fn log_inverts_exp() {
        let z = Complex::new(0.3, -1.2);
        assert!(capprox(z.exp().ln(), z, 1e-12));
    }

    #[test]
    fn sqrt_of_negative_real() {
        let r = Complex::new(-4.0, 0.0).sqrt();
        assert!(capprox(r, Complex::new(0.0, 2.0), EPSILON));
        let r = Complex::new(-4.0, -0.0).sqrt();
        assert!(capprox(r, Complex::new(0.0, -2.0), EPSILON));
    }

    #[test]
    fn integer_powers_are_exact() {
        let z = Complex::new(1.0, 1.0);
        assert_eq!(z.powc(Complex::from_real(2.0)), Complex::new(0.0, 2.0));
        assert!(capprox(z.powi(-2), Complex::new(0.0, -0.5), EPSILON));
    }

    #[test]
    fn zero_to_negative_power_is_pole() {
        assert!(!Complex::ZERO.powf(-1.0).is_finite());
        assert_eq!(Complex::ZERO.powf(0.0), Complex::ONE);
    }

    #[test]
    fn pythagorean_identity() {
        let z = Complex::new(0.7, -0.4);
        let s = z.sin();
        let c = z.cos();
        assert!(capprox(s * s + c * c, Complex::ONE, 1e-12));
    }

    #[test]
    fn tan_far_from_real_axis() {
        let t = Complex::new(0.3, 1000.0).tan();
        assert!(capprox(t, Complex::I, 1e-12));
    }

    #[test]
    fn hyperbolic_matches_trig() {
        let z = Complex::new(0.2, 0.9);
        // sinh(z) = -i sin(iz)
        let lhs = z.sinh();
        let rhs = -Complex::I * (Complex::I * z).sin();
        assert!(capprox(lhs, rhs, 1e-12));
        let t = z.tanh();
        assert!(capprox(t, z.sinh() / z.cosh(), 1e-12));
    }

    #[test]
    fn inverse_functions_round_trip() {
        let z = Complex::new(0.3, 0.2);
        assert!(capprox(z.asin().sin(), z, 1e-12));
        assert!(capprox(z.acos().cos(), z, 1e-12));
        assert!(capprox(z.atan().tan(), z, 1e-12));
        assert!(capprox(z.asinh().sinh(), z, 1e-12));
        assert!(capprox(z.acosh().cosh(), z, 1e-12));
        assert!(capprox(z.atanh().tanh(), z, 1e-12));
    }
}
