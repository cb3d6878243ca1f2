//! Spatially flat ΛCDM background cosmology.
//!
//! Distances follow from the dimensionless Hubble rate
//!
//! ```text
//! E(z) = sqrt(Ωm (1+z)³ + ΩΛ),   ΩΛ = 1 - Ωm
//! D_C(z) = (c / H0) ∫₀^z dz' / E(z')
//! D_A(z) = D_C(z) / (1 + z)
//! ```
//!
//! The comoving integral is taken over `u = ln(1+z)`, where the integrand
//! `(1+z) / E(z)` is smooth and decays like `e^{-u/2}`. Since `u <= 710` for
//! any finite `z`, the Simpson interval count is bounded for every redshift.
//!
//! Radiation and massive neutrinos are neglected, which shifts distances by
//! well under a percent for the redshifts strong lenses live at.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::units::{
    Length, LengthExt, MassDensity, MassDensityExt, GRAVITATIONAL_CONSTANT,
    METERS_PER_MEGAPARSEC, SPEED_OF_LIGHT_KM_S,
};
use crate::{validate_redshift, Cosmology, Result};

/// Simpson intervals used per unit of ln(1+z) (always rounded up to even)
const INTERVALS_PER_UNIT_LN_Z: f64 = 512.0;
const MIN_INTERVALS: usize = 64;

/// Flat ΛCDM model parameterized by the Hubble constant and matter density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatLambdaCdm {
    /// Hubble constant in km/s/Mpc
    pub h0: f64,
    /// Present-day matter density parameter
    pub omega_m: f64,
}

impl Default for FlatLambdaCdm {
    fn default() -> Self {
        Self::PLANCK15
    }
}

impl FlatLambdaCdm {
    /// Planck 2015 (TT,TE,EE+lowP+lensing+ext) background parameters
    pub const PLANCK15: FlatLambdaCdm = FlatLambdaCdm {
        h0: 67.74,
        omega_m: 0.3075,
    };

    pub fn new(h0: f64, omega_m: f64) -> Self {
        Self { h0, omega_m }
    }

    /// Dark energy density parameter implied by flatness
    pub fn omega_lambda(&self) -> f64 {
        1.0 - self.omega_m
    }

    /// Hubble distance c / H0 in megaparsecs
    pub fn hubble_distance_mpc(&self) -> f64 {
        SPEED_OF_LIGHT_KM_S / self.h0
    }

    /// Dimensionless expansion rate E(z) = H(z) / H0
    pub fn efunc(&self, z: f64) -> f64 {
        let zp1 = 1.0 + z;
        (self.omega_m * zp1 * zp1 * zp1 + self.omega_lambda()).sqrt()
    }

    /// Line-of-sight comoving distance to redshift `z`
    pub fn comoving_distance(&self, z: f64) -> Result<Length> {
        let z = validate_redshift(z)?;
        let u_max = z.ln_1p();
        let integral = simpson(|u| self.log_integrand(u), 0.0, u_max, intervals_for(u_max));
        Ok(Length::from_megaparsecs(self.hubble_distance_mpc() * integral))
    }

    /// `(1+z) / E(z)` at `1+z = e^u`, written so it goes to 0 rather than
    /// NaN once `(1+z)³` overflows
    fn log_integrand(&self, u: f64) -> f64 {
        let zp1 = u.exp();
        1.0 / (self.omega_m * zp1 + self.omega_lambda() / (zp1 * zp1)).sqrt()
    }
}

impl Cosmology for FlatLambdaCdm {
    fn angular_diameter_distance(&self, z: f64) -> Result<Length> {
        let d_c = self.comoving_distance(z)?;
        Ok(d_c / (1.0 + z))
    }

    fn critical_density(&self, z: f64) -> Result<MassDensity> {
        let z = validate_redshift(z)?;
        // H0 in 1/s
        let h0_si = self.h0 * 1000.0 / METERS_PER_MEGAPARSEC;
        let h = h0_si * self.efunc(z);
        let rho = 3.0 * h * h / (8.0 * PI * GRAVITATIONAL_CONSTANT);
        Ok(MassDensity::from_kilograms_per_cubic_meter(rho))
    }
}

fn intervals_for(u: f64) -> usize {
    let n = ((u * INTERVALS_PER_UNIT_LN_Z).ceil() as usize).max(MIN_INTERVALS);
    n + n % 2
}

/// Composite Simpson's rule over `[a, b]` with `n` (even) intervals
fn simpson<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, n: usize) -> f64 {
    if b <= a {
        return 0.0;
    }

    let h = (b - a) / n as f64;
    let interior: f64 = (1..n)
        .map(|i| {
            let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
            weight * f(a + i as f64 * h)
        })
        .sum();

    (f(a) + f(b) + interior) * h / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CosmologyError;
    use approx::assert_relative_eq;

    #[test]
    fn test_simpson_polynomial_is_exact() {
        // Simpson integrates cubics exactly
        let result = simpson(|x| x * x * x - 2.0 * x + 1.0, 0.0, 2.0, 8);
        assert_relative_eq!(result, 4.0 - 4.0 + 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_intervals_are_even() {
        for z in [0.0, 0.013, 0.5, 1.37, 7.0] {
            let n = intervals_for(f64::ln_1p(z));
            assert_eq!(n % 2, 0);
            assert!(n >= MIN_INTERVALS);
        }
    }

    #[test]
    fn test_intervals_bounded_for_any_redshift() {
        let n = intervals_for(f64::MAX.ln_1p());
        assert!(n <= 400_000, "{n} intervals");
        assert_eq!(n % 2, 0);
    }

    #[test]
    fn test_extreme_redshifts_stay_finite() {
        let cosmo = FlatLambdaCdm::PLANCK15;

        // comoving distance converges to the particle horizon
        let d_c_9 = cosmo.comoving_distance(1e9).unwrap().as_megaparsecs();
        let d_c_17 = cosmo.comoving_distance(1e17).unwrap().as_megaparsecs();
        assert_relative_eq!(d_c_9, 14_480.6, max_relative = 1e-3);
        assert_relative_eq!(d_c_17, d_c_9, max_relative = 1e-4);

        for z in [1e17, 1e300, f64::MAX] {
            let d = cosmo.angular_diameter_distance(z).unwrap();
            assert!(d.as_meters().is_finite() && d.as_meters() >= 0.0, "D_A({z})");
        }
        assert!(cosmo.critical_density(1e17).is_ok());
    }

    #[test]
    fn test_distance_at_zero_redshift() {
        let cosmo = FlatLambdaCdm::PLANCK15;
        let d = cosmo.angular_diameter_distance(0.0).unwrap();
        assert_eq!(d.as_megaparsecs(), 0.0);
    }

    #[test]
    fn test_low_redshift_hubble_law() {
        let cosmo = FlatLambdaCdm::PLANCK15;
        let z = 1e-3;
        let d = cosmo.angular_diameter_distance(z).unwrap();
        assert_relative_eq!(
            d.as_megaparsecs(),
            cosmo.hubble_distance_mpc() * z,
            max_relative = 2e-3
        );
    }

    #[test]
    fn test_planck15_reference_distances() {
        let cosmo = FlatLambdaCdm::PLANCK15;

        let d_05 = cosmo.angular_diameter_distance(0.5).unwrap();
        assert_relative_eq!(d_05.as_megaparsecs(), 1297.7, max_relative = 1e-3);

        let d_10 = cosmo.angular_diameter_distance(1.0).unwrap();
        assert_relative_eq!(d_10.as_megaparsecs(), 1699.5, max_relative = 1e-3);
    }

    #[test]
    fn test_angular_diameter_distance_turns_over() {
        let cosmo = FlatLambdaCdm::PLANCK15;
        let d = |z: f64| cosmo.angular_diameter_distance(z).unwrap().as_megaparsecs();

        assert!(d(0.5) < d(1.0));
        assert!(d(1.0) < d(1.6));
        assert!(d(3.0) < d(1.6));
    }

    #[test]
    fn test_distance_between_lens_and_source() {
        let cosmo = FlatLambdaCdm::PLANCK15;
        let d_ls = cosmo.angular_diameter_distance_between(0.5, 1.0).unwrap();
        let d_l = cosmo.angular_diameter_distance(0.5).unwrap();
        let d_s = cosmo.angular_diameter_distance(1.0).unwrap();

        assert!(d_ls.as_meters() > 0.0);
        assert!(d_ls < d_s);

        // Comoving distances add along the line of sight in flat space
        let dm_ls = d_ls.as_megaparsecs() * 2.0;
        let dm_l = d_l.as_megaparsecs() * 1.5;
        let dm_s = d_s.as_megaparsecs() * 2.0;
        assert_relative_eq!(dm_l + dm_ls, dm_s, max_relative = 1e-9);
    }

    #[test]
    fn test_critical_density_today() {
        let cosmo = FlatLambdaCdm::PLANCK15;
        let rho = cosmo.critical_density(0.0).unwrap();

        // 1.8785e-26 h^2 kg/m^3
        let expected = 1.878_34e-26 * 0.6774 * 0.6774;
        assert_relative_eq!(rho.as_kilograms_per_cubic_meter(), expected, max_relative = 1e-3);
    }

    #[test]
    fn test_critical_density_grows_with_redshift() {
        let cosmo = FlatLambdaCdm::PLANCK15;
        let rho_0 = cosmo.critical_density(0.0).unwrap();
        let rho_1 = cosmo.critical_density(1.0).unwrap();
        let ratio = rho_1.as_kilograms_per_cubic_meter() / rho_0.as_kilograms_per_cubic_meter();
        assert_relative_eq!(ratio, cosmo.efunc(1.0).powi(2), max_relative = 1e-12);
    }

    #[test]
    fn test_negative_redshift_rejected() {
        let cosmo = FlatLambdaCdm::PLANCK15;
        assert_eq!(
            cosmo.angular_diameter_distance(-0.5),
            Err(CosmologyError::InvalidRedshift(-0.5))
        );
        assert!(cosmo.critical_density(f64::NAN).is_err());
    }

    #[test]
    fn test_deserialize_parameters() {
        let cosmo: FlatLambdaCdm =
            serde_json::from_str(r#"{"h0": 70.0, "omega_m": 0.3}"#).unwrap();
        assert_eq!(cosmo, FlatLambdaCdm::new(70.0, 0.3));
        assert_relative_eq!(cosmo.omega_lambda(), 0.7, epsilon = 1e-12);
    }
}
