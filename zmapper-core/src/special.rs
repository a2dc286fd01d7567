//! Special functions of a complex argument.
//!
//! None of these functions fail: at poles they return [`Complex::INFINITY`],
//! and out-of-range inputs degrade to non-finite values that the polyline
//! builder later skips.

use std::f64::consts::PI;
use std::sync::OnceLock;

use crate::complex::Complex;

/// Number of terms in the accelerated eta series.
pub const ETA_TERMS: usize = 128;

/// Accelerated Dirichlet eta series.
///
/// The alternating series `Σ (-1)^k / (k+1)^s` converges slowly, so every term
/// is weighted by `e_k = Σ_{j≥k} C(j, k) / 2^{j+1}` (Euler transform).  The
/// weights are computed once from a Pascal triangle of `ETA_TERMS` rows.
#[derive(Debug, Clone)]
pub struct EtaSeries {
    signed_coefficients: Vec<f64>,
}

impl EtaSeries {
    pub fn new(terms: usize) -> Self {
        let terms = terms.max(1);
        let mut coefficients = vec![0.0; terms];
        let mut row = vec![0.0f64; terms];
        for j in 0..terms {
            // Row j of Pascal's triangle, updated in place right to left.
            row[j] = 1.0;
            for k in (1..j).rev() {
                row[k] += row[k - 1];
            }
            row[0] = 1.0;
            let weight = 0.5f64.powi(j as i32 + 1);
            for k in 0..=j {
                coefficients[k] += row[k] * weight;
            }
        }
        let signed_coefficients = coefficients
            .into_iter()
            .enumerate()
            .map(|(k, c)| if k % 2 == 0 { c } else { -c })
            .collect();
        Self {
            signed_coefficients,
        }
    }

    pub fn eta(&self, s: Complex) -> Complex {
        let mut sum = Complex::ZERO;
        for (k, c) in self.signed_coefficients.iter().enumerate() {
            let ln_n = ((k + 1) as f64).ln();
            // (k+1)^-s = exp(-s ln(k+1))
            sum += (-s * ln_n).exp() * *c;
        }
        sum
    }

    pub fn zeta(&self, s: Complex) -> Complex {
        // 2^(1-s)
        let two_pow = ((Complex::ONE - s) * std::f64::consts::LN_2).exp();
        self.eta(s) / (Complex::ONE - two_pow)
    }
}

fn shared_series() -> &'static EtaSeries {
    static SERIES: OnceLock<EtaSeries> = OnceLock::new();
    SERIES.get_or_init(|| EtaSeries::new(ETA_TERMS))
}

/// Dirichlet eta function.
pub fn eta(s: Complex) -> Complex {
    shared_series().eta(s)
}

/// Riemann zeta function via its analytic continuation through eta.
pub fn zeta(s: Complex) -> Complex {
    shared_series().zeta(s)
}

fn is_non_positive_integer(z: Complex) -> bool {
    z.im == 0.0 && z.re <= 0.0 && z.re.fract() == 0.0
}

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Gamma function (Lanczos approximation, reflection for `Re z < 0.5`).
pub fn gamma(z: Complex) -> Complex {
    if is_non_positive_integer(z) {
        return Complex::INFINITY;
    }
    if z.re < 0.5 {
        let pi = Complex::from_real(PI);
        return pi / ((pi * z).sin() * gamma(Complex::ONE - z));
    }
    let z = z - Complex::ONE;
    let mut x = Complex::from_real(LANCZOS_COEFFICIENTS[0]);
    for (i, c) in LANCZOS_COEFFICIENTS.iter().enumerate().skip(1) {
        x += Complex::from_real(*c) / (z + Complex::from_real(i as f64));
    }
    let t = z + Complex::from_real(LANCZOS_G + 0.5);
    t.powc(z + Complex::from_real(0.5)) * (-t).exp() * x * (2.0 * PI).sqrt()
}

/// Digamma function `ψ(z) = Γ'(z) / Γ(z)`.
pub fn digamma(z: Complex) -> Complex {
    if is_non_positive_integer(z) {
        return Complex::INFINITY;
    }
    if z.re < 0.5 {
        // ψ(z) = ψ(1 - z) - π cot(πz)
        let pi = Complex::from_real(PI);
        return digamma(Complex::ONE - z) - pi / (pi * z).tan();
    }
    let mut z = z;
    let mut acc = Complex::ZERO;
    while z.re < 10.0 {
        acc -= z.recip();
        z += Complex::ONE;
    }
    let inv = z.recip();
    let inv2 = inv * inv;
    // ln z - 1/2z - Σ B_2k / (2k z^2k)
    let series = inv2
        * (Complex::from_real(1.0 / 12.0)
            - inv2
                * (Complex::from_real(1.0 / 120.0)
                    - inv2
                        * (Complex::from_real(1.0 / 252.0)
                            - inv2
                                * (Complex::from_real(1.0 / 240.0)
                                    - inv2 * Complex::from_real(1.0 / 132.0)))));
    acc + z.ln() - inv * 0.5 - series
}

const ERF_SERIES_RADIUS: f64 = 3.0;

/// Error function.
pub fn erf(z: Complex) -> Complex {
    if z.re < 0.0 {
        return -erf(-z);
    }
    if z.norm() <= ERF_SERIES_RADIUS {
        erf_series(z)
    } else {
        Complex::ONE - erfc_asymptotic(z)
    }
}

fn erf_series(z: Complex) -> Complex {
    // 2/√π Σ (-1)^n z^(2n+1) / (n! (2n+1))
    let z2 = z * z;
    let mut power = z;
    let mut sum = z;
    for n in 1..200 {
        power = -(power * z2) / n as f64;
        let term = power / (2 * n + 1) as f64;
        sum += term;
        if term.norm() < 1e-17 * sum.norm() {
            break;
        }
    }
    sum * (2.0 / PI.sqrt())
}

fn erfc_asymptotic(z: Complex) -> Complex {
    // e^{-z²}/(z√π) Σ (-1)^n (2n-1)!! / (2z²)^n, stopped at the smallest term.
    let two_z2 = z * z * 2.0;
    let mut term = Complex::ONE;
    let mut sum = Complex::ONE;
    let mut last_norm = f64::INFINITY;
    for n in 1..60 {
        let next = -(term * (2 * n - 1) as f64) / two_z2;
        let norm = next.norm();
        if norm >= last_norm {
            break;
        }
        term = next;
        sum += term;
        last_norm = norm;
    }
    (-(z * z)).exp() / (z * PI.sqrt()) * sum
}

/// Principal branch of the Lambert W function (`w e^w = z`).
pub fn lambert_w(z: Complex) -> Complex {
    if z.is_zero() {
        return Complex::ZERO;
    }
    if !z.is_finite() {
        return z;
    }
    let branch_point = Complex::from_real(-1.0 / std::f64::consts::E);
    let mut w = if (z - branch_point).norm() < 0.3 {
        let p = ((z * std::f64::consts::E + Complex::ONE) * 2.0).sqrt();
        Complex::from_real(-1.0) + p - p * p / 3.0
    } else if z.norm() < 3.0 {
        (Complex::ONE + z).ln()
    } else {
        let l1 = z.ln();
        l1 - l1.ln()
    };
    // Halley iteration.
    for _ in 0..64 {
        let ew = w.exp();
        let f = w * ew - z;
        if f.is_zero() {
            break;
        }
        let wp1 = w + Complex::ONE;
        let denom = ew * wp1 - (w + Complex::from_real(2.0)) * f / (wp1 * 2.0);
        let dw = f / denom;
        w -= dw;
        if !dw.is_finite() || dw.norm() < 1e-15 * (1.0 + w.norm()) {
            break;
        }
    }
    w
}

/// Unnormalised sinc: `sin(z) / z`, with `sinc(0) = 1`.
pub fn sinc(z: Complex) -> Complex {
    if z.is_zero() {
        Complex::ONE
    } else {
        z.sin() / z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Complex, b: Complex, tol: f64) -> bool {
        (a - b).norm() < tol
    }

    #[test]
    fn zeta_at_two() {
        let v = zeta(Complex::from_real(2.0));
        assert!(close(v, Complex::from_real(PI * PI / 6.0), 1e-9), "{v}");
    }

    #[test]
    fn zeta_at_zero_and_minus_one() {
        assert!(close(zeta(Complex::ZERO), Complex::from_real(-0.5), 1e-9));
        assert!(close(
            zeta(Complex::from_real(-1.0)),
            Complex::from_real(-1.0 / 12.0),
            1e-6
        ));
    }

    #[test]
    fn zeta_pole_at_one() {
        assert!(!zeta(Complex::ONE).is_finite());
    }

    #[test]
    fn zeta_first_nontrivial_zero() {
        let v = zeta(Complex::new(0.5, 14.134_725_141_734_693));
        assert!(v.norm() < 1e-6, "{v}");
    }

    #[test]
    fn eta_at_one_is_ln_two() {
        assert!(close(eta(Complex::ONE), Complex::from_real(2f64.ln()), 1e-10));
    }

    #[test]
    fn gamma_factorials() {
        assert!(close(gamma(Complex::from_real(5.0)), Complex::from_real(24.0), 1e-9));
        assert!(close(
            gamma(Complex::from_real(0.5)),
            Complex::from_real(PI.sqrt()),
            1e-12
        ));
    }

    #[test]
    fn gamma_reflection_and_poles() {
        // Γ(-0.5) = -2√π
        assert!(close(
            gamma(Complex::from_real(-0.5)),
            Complex::from_real(-2.0 * PI.sqrt()),
            1e-10
        ));
        assert!(!gamma(Complex::from_real(-2.0)).is_finite());
        assert!(!gamma(Complex::ZERO).is_finite());
    }

    #[test]
    fn digamma_at_one_is_minus_euler_gamma() {
        let v = digamma(Complex::ONE);
        assert!(close(v, Complex::from_real(-0.577_215_664_901_532_9), 1e-12), "{v}");
    }

    #[test]
    fn digamma_recurrence() {
        let z = Complex::new(-1.3, 0.4);
        let lhs = digamma(z + Complex::ONE);
        let rhs = digamma(z) + z.recip();
        assert!(close(lhs, rhs, 1e-10));
    }

    #[test]
    fn erf_real_values() {
        assert!(close(erf(Complex::from_real(1.0)), Complex::from_real(0.842_700_792_949_714_9), 1e-13));
        assert!(close(erf(Complex::from_real(-1.0)), Complex::from_real(-0.842_700_792_949_714_9), 1e-13));
        assert!(close(erf(Complex::from_real(4.0)), Complex::from_real(0.999_999_984_582_742_1), 1e-12));
        assert_eq!(erf(Complex::ZERO), Complex::ZERO);
    }

    #[test]
    fn erf_is_odd_off_axis() {
        let z = Complex::new(0.4, 1.1);
        assert!(close(erf(-z), -erf(z), 1e-14));
    }

    #[test]
    fn lambert_w_known_values() {
        assert!(close(lambert_w(Complex::ONE), Complex::from_real(0.567_143_290_409_783_8), 1e-12));
        assert!(close(
            lambert_w(Complex::from_real(std::f64::consts::E)),
            Complex::ONE,
            1e-12
        ));
        assert_eq!(lambert_w(Complex::ZERO), Complex::ZERO);
    }

    #[test]
    fn lambert_w_satisfies_definition_off_axis() {
        for z in [Complex::new(-2.0, 1.0), Complex::new(10.0, -5.0), Complex::new(-0.3, 0.01)] {
            let w = lambert_w(z);
            assert!(close(w * w.exp(), z, 1e-10), "z = {z}, w = {w}");
        }
    }

    #[test]
    fn sinc_at_zero() {
        assert_eq!(sinc(Complex::ZERO), Complex::ONE);
        assert!(close(sinc(Complex::from_real(PI)), Complex::ZERO, 1e-15));
    }
}
