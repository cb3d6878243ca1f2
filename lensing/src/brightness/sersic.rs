//! Circular Sersic surface-brightness profile.
//!
//! ```text
//! I(r) = I_e · exp(-b(n) · ((r / r_e)^(1/n) - 1))
//! ```
//!
//! `b(n)` is fixed by requiring `r_e` to enclose half of the total light,
//! i.e. `γ(2n, b) = Γ(2n) / 2`. It is evaluated with the asymptotic series of
//! Ciotti & Bertin (1999) for n > 0.36. Below that the series breaks down and
//! the half-light condition is solved directly; `b` then falls off like
//! `2^(-1/2n)` and is floored at the smallest normal `f64`, so `b > 0` for
//! every valid index and the profile is finite and non-negative everywhere.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::evaluate_brightness;
use crate::error::{LensingError, Result};

/// Lower validity limit of the Ciotti & Bertin expansion
const CIOTTI_BERTIN_MIN_N: f64 = 0.36;

/// Bisection steps for the small-index half-light solve
const HALF_LIGHT_ITERATIONS: usize = 200;

/// Lanczos approximation, g = 7
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

/// Sersic source parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SersicParams {
    /// Source centre x (arcsec)
    pub theta_x: f64,
    /// Source centre y (arcsec)
    pub theta_y: f64,
    /// Effective (half-light) radius in arcsec
    #[serde(rename = "theta_e_gal")]
    pub theta_e: f64,
    /// Sersic index
    #[serde(rename = "n_srsc")]
    pub n: f64,
    /// Surface brightness at the effective radius
    #[serde(rename = "I_gal")]
    pub intensity: f64,
}

impl SersicParams {
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("theta_e_gal", self.theta_e, self.theta_e > 0.0, "finite and > 0"),
            ("n_srsc", self.n, self.n > 0.0, "finite and > 0"),
            ("I_gal", self.intensity, self.intensity >= 0.0, "finite and >= 0"),
        ];
        for (name, value, in_range, expected) in checks {
            if !(value.is_finite() && in_range) {
                return Err(LensingError::ParameterOutOfRange {
                    kind: "Sersic",
                    name,
                    value,
                    expected,
                });
            }
        }
        Ok(())
    }

    /// Brightness at radius `r` (arcsec) from the source centre
    pub fn brightness_at_radius(&self, r: f64) -> f64 {
        let b = sersic_b(self.n);
        self.intensity * (-b * ((r / self.theta_e).powf(1.0 / self.n) - 1.0)).exp()
    }
}

/// Sersic normalization constant b(n)
pub fn sersic_b(n: f64) -> f64 {
    if n > CIOTTI_BERTIN_MIN_N {
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        2.0 * n - 1.0 / 3.0 + 4.0 / (405.0 * n) + 46.0 / (25_515.0 * n2)
            + 131.0 / (1_148_175.0 * n3)
            - 2_194_697.0 / (30_690_717_750.0 * n4)
    } else {
        half_light_b(n)
    }
}

/// Solve `P(2n, b) = 1/2` for `b` by bisection in `ln b`.
///
/// Valid for `2n <= 0.72`, where `P(2n, 1) > 1/2` brackets the root in
/// `b <= 1`.
fn half_light_b(n: f64) -> f64 {
    let a = 2.0 * n;
    let target = 0.5_f64.ln();

    // a · ln b alone already puts P below 1/4 here
    let mut lo = 2.0 * target / a;
    let mut hi = 0.0;
    for _ in 0..HALF_LIGHT_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if ln_regularized_gamma_p(a, mid) < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    (0.5 * (lo + hi)).exp().max(f64::MIN_POSITIVE)
}

/// `ln P(a, x)` at `x = e^u <= 1` from the power series of the lower
/// incomplete gamma function
fn ln_regularized_gamma_p(a: f64, u: f64) -> f64 {
    let x = u.exp();
    let mut term = 1.0;
    let mut sum = 1.0;
    for k in 1..100 {
        term *= x / (a + k as f64);
        sum += term;
        if term < sum * f64::EPSILON {
            break;
        }
    }
    a * u - x - ln_gamma(a + 1.0) + sum.ln()
}

/// `ln Γ(x)` for `x >= 1/2`
fn ln_gamma(x: f64) -> f64 {
    let x = x - 1.0;
    let t = x + LANCZOS_G + 0.5;
    let series = LANCZOS_COEFFICIENTS
        .iter()
        .enumerate()
        .skip(1)
        .fold(LANCZOS_COEFFICIENTS[0], |acc, (i, c)| acc + c / (x + i as f64));
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}

/// Sersic brightness over a coordinate mesh.
pub fn brightness_sersic(x: &Array2<f64>, y: &Array2<f64>, params: &SersicParams) -> Array2<f64> {
    let b = sersic_b(params.n);
    let inv_n = 1.0 / params.n;
    let p = *params;

    evaluate_brightness(x, y, move |xi, yi| {
        let r = (xi - p.theta_x).hypot(yi - p.theta_y);
        p.intensity * (-b * ((r / p.theta_e).powf(inv_n) - 1.0)).exp()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn source(n: f64) -> SersicParams {
        SersicParams {
            theta_x: 0.0,
            theta_y: 0.0,
            theta_e: 0.3,
            n,
            intensity: 1.0,
        }
    }

    /// Fraction of total light inside r_e, integrated numerically in ln r
    fn half_light_fraction(params: &SersicParams) -> f64 {
        let flux = |r_max: f64| {
            let (lo, hi) = ((1e-8 * params.theta_e).ln(), r_max.ln());
            let steps = 20_000;
            let h = (hi - lo) / steps as f64;
            (0..=steps)
                .map(|i| {
                    let r = (lo + i as f64 * h).exp();
                    let weight = if i == 0 || i == steps { 0.5 } else { 1.0 };
                    weight * params.brightness_at_radius(r) * r * r
                })
                .sum::<f64>()
                * h
        };
        flux(params.theta_e) / flux(1e4 * params.theta_e)
    }

    #[test]
    fn test_reference_b_values() {
        assert_relative_eq!(sersic_b(1.0), 1.678_35, max_relative = 1e-4);
        assert_relative_eq!(sersic_b(4.0), 7.669_25, max_relative = 1e-5);
        // Gaussian limit: b(0.5) = ln 2
        assert_relative_eq!(sersic_b(0.5), std::f64::consts::LN_2, max_relative = 1e-3);
    }

    #[test]
    fn test_exponential_disk_half_light() {
        // For n = 1 the enclosed fraction is 1 - e^{-b} (1 + b)
        let b = sersic_b(1.0);
        let fraction = 1.0 - (-b).exp() * (1.0 + b);
        assert_relative_eq!(fraction, 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_half_light_radius_numerically() {
        for n in [0.5, 1.0, 2.0] {
            let fraction = half_light_fraction(&source(n));
            assert_relative_eq!(fraction, 0.5, epsilon = 2e-3);
        }
    }

    #[test]
    fn test_ln_gamma() {
        assert_relative_eq!(ln_gamma(1.0), 0.0, epsilon = 1e-14);
        let half_sqrt_pi = (0.25 * std::f64::consts::PI).sqrt();
        assert_relative_eq!(ln_gamma(1.5), half_sqrt_pi.ln(), epsilon = 1e-14);
        assert_relative_eq!(ln_gamma(5.0), 24.0_f64.ln(), epsilon = 1e-13);
    }

    #[test]
    fn test_small_index_solve_reproduces_exact_limits() {
        // P(1, b) = 1 - e^{-b}, so n = 0.5 gives ln 2 exactly
        assert_relative_eq!(half_light_b(0.5), std::f64::consts::LN_2, max_relative = 1e-12);
        // joins the asymptotic series at the switch point
        assert_relative_eq!(half_light_b(0.36), sersic_b(0.360_000_1), max_relative = 1e-3);
        assert_relative_eq!(sersic_b(0.1), 0.020_746_339, max_relative = 1e-6);
    }

    #[test]
    fn test_small_index_b_is_positive_and_increasing() {
        let ns = [1e-6, 1e-3, 0.01, 0.045, 0.05, 0.055, 0.1, 0.2, 0.3, 0.36];
        for n in ns {
            assert!(sersic_b(n) > 0.0, "b({n}) not positive");
        }
        for pair in ns.windows(2) {
            assert!(sersic_b(pair[1]) >= sersic_b(pair[0]));
        }
        assert_relative_eq!(sersic_b(0.05), 5.933_911e-4, max_relative = 1e-5);
    }

    #[test]
    fn test_small_index_profile_finite_everywhere() {
        for n in [1e-4, 0.01, 0.045, 0.05, 0.055, 0.2, 0.36] {
            let params = source(n);
            assert!(params.validate().is_ok());
            for r in [0.0, 0.1, 0.3, 0.5, 1.0, 10.0, 1e6] {
                let value = params.brightness_at_radius(r);
                assert!(value.is_finite() && value >= 0.0, "I({r}) = {value} for n = {n}");
            }
            assert!(params.brightness_at_radius(1.0) <= params.brightness_at_radius(0.0));
        }
    }

    #[test]
    fn test_brightness_at_effective_radius() {
        let params = source(2.5);
        assert_relative_eq!(params.brightness_at_radius(0.3), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_centre_is_finite_and_peak() {
        for n in [0.3, 1.0, 4.0, 8.0] {
            let params = source(n);
            let centre = params.brightness_at_radius(0.0);
            assert!(centre.is_finite());
            assert_relative_eq!(centre, sersic_b(n).exp(), max_relative = 1e-12);
            assert!(centre > params.brightness_at_radius(0.01));
        }
    }

    #[test]
    fn test_field_non_negative_and_centred() {
        let x = array![[-1.0, 0.5, 2.0], [-1.0, 0.5, 2.0]];
        let y = array![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
        let params = SersicParams {
            theta_x: 0.5,
            theta_y: 0.0,
            theta_e: 0.4,
            n: 1.5,
            intensity: 2.0,
        };

        let image = brightness_sersic(&x, &y, &params);
        assert!(image.iter().all(|&v| v.is_finite() && v >= 0.0));
        assert_relative_eq!(image[[0, 1]], 2.0 * sersic_b(1.5).exp(), max_relative = 1e-12);
        assert_relative_eq!(image[[0, 0]], image[[0, 2]], max_relative = 1e-12);
        assert_relative_eq!(
            image[[1, 1]],
            params.brightness_at_radius(1.0),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_far_field_underflows_to_zero() {
        let params = source(0.5);
        let value = params.brightness_at_radius(1e3);
        assert!(value >= 0.0 && value < 1e-300);
    }

    #[test]
    fn test_validate() {
        assert!(source(1.0).validate().is_ok());

        let mut bad = source(1.0);
        bad.theta_e = 0.0;
        assert!(matches!(
            bad.validate(),
            Err(LensingError::ParameterOutOfRange { name: "theta_e_gal", .. })
        ));

        let mut bad = source(-1.0);
        bad.theta_e = 0.3;
        assert!(matches!(
            bad.validate(),
            Err(LensingError::ParameterOutOfRange { name: "n_srsc", .. })
        ));

        let mut bad = source(1.0);
        bad.intensity = f64::NAN;
        assert!(bad.validate().is_err());
    }
}
