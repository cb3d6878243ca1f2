//! Spherical Navarro-Frenk-White (NFW) halo deflection.
//!
//! The halo is specified by its mass `M200` (mass inside the radius where the
//! mean density is 200 ρ_crit) and concentration `c200 = r200 / r_s`. With
//! `x = θ / θ_s` the deflection magnitude is (Bartelmann 1996)
//!
//! ```text
//! α(x) = 4 κ_s θ_s h(x) / x
//! h(x) = ln(x/2) + F(x)
//! F(x) = arccosh(1/x) / sqrt(1 - x²)   x < 1
//!      = 1                             x = 1
//!      = arccos(1/x)  / sqrt(x² - 1)   x > 1
//! ```
//!
//! `F` has a removable singularity at `x = 1` and `h(x)/x → 0` as `x → 0`;
//! both limits are evaluated through their Taylor expansions.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::{evaluate_deflection, DeflectionField};
use crate::distances::LensingDistances;
use crate::error::{LensingError, Result};
use crate::units::{Angle, AngleExt, LengthExt, Mass, MassExt};

/// Half-width around x = 1 where F is replaced by its cubic expansion
const UNIT_SERIES_WIDTH: f64 = 1e-3;

/// Below this x, h(x) uses its small-argument expansion
const SMALL_X: f64 = 1e-4;

/// NFW halo parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NfwParams {
    /// Halo centre x (arcsec)
    pub theta_x: f64,
    /// Halo centre y (arcsec)
    pub theta_y: f64,
    /// Halo mass in solar masses
    #[serde(rename = "M200")]
    pub m200: f64,
    /// Concentration r200 / r_s
    pub c200: f64,
}

impl NfwParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.m200.is_finite() && self.m200 >= 0.0) {
            return Err(LensingError::ParameterOutOfRange {
                kind: "NFW",
                name: "M200",
                value: self.m200,
                expected: "finite and >= 0",
            });
        }
        if !(self.c200.is_finite() && self.c200 > 0.0) {
            return Err(LensingError::ParameterOutOfRange {
                kind: "NFW",
                name: "c200",
                value: self.c200,
                expected: "finite and > 0",
            });
        }
        Ok(())
    }
}

/// Angular scale radius and characteristic convergence of an NFW halo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NfwScales {
    /// Scale radius r_s / D_l in arcsec
    pub theta_s: f64,
    /// κ_s = ρ_s r_s / Σ_cr
    pub kappa_s: f64,
}

impl NfwScales {
    /// Convert mass and concentration into lensing scales.
    ///
    /// ```text
    /// r200 = (3 M200 / (800 π ρ_crit))^(1/3),   r_s = r200 / c
    /// ρ_s  = ρ_crit (200/3) c³ / (ln(1+c) - c/(1+c))
    /// ```
    pub fn new(params: &NfwParams, distances: &LensingDistances) -> Self {
        let mass = Mass::from_solar_masses(params.m200).as_kilograms();
        let rho_crit = distances.rho_critical();
        let c = params.c200;

        let r200 = (3.0 * mass / (800.0 * PI * rho_crit)).cbrt();
        let r_s = r200 / c;
        let delta_c = (200.0 / 3.0) * c.powi(3) / ((1.0 + c).ln() - c / (1.0 + c));
        let rho_s = delta_c * rho_crit;

        let kappa_s = rho_s * r_s / distances.sigma_critical();
        let theta_s = Angle::from_radians(r_s / distances.d_l.as_meters()).as_arcseconds();

        Self { theta_s, kappa_s }
    }

    /// True when the halo cannot deflect anything (zero mass, or no lensing
    /// geometry between lens and source)
    pub fn is_null(&self) -> bool {
        !(self.kappa_s > 0.0 && self.theta_s.is_finite() && self.theta_s > 0.0)
    }

    /// Deflection magnitude (arcsec) at angular radius `r` (arcsec)
    pub fn deflection_magnitude(&self, r: f64) -> f64 {
        if r == 0.0 || self.is_null() {
            return 0.0;
        }

        let x = r / self.theta_s;
        4.0 * self.kappa_s * self.theta_s * h_over_x(x)
    }
}

/// `F(x)` from the NFW lensing profile, continuous through x = 1
pub fn nfw_f(x: f64) -> f64 {
    let d = x - 1.0;
    if d.abs() < UNIT_SERIES_WIDTH {
        return 1.0 - 2.0 * d / 3.0 + 7.0 * d * d / 15.0 - 12.0 * d * d * d / 35.0;
    }

    if x < 1.0 {
        (1.0 / x).acosh() / (1.0 - x * x).sqrt()
    } else {
        (1.0 / x).acos() / (x * x - 1.0).sqrt()
    }
}

/// `h(x) = ln(x/2) + F(x)`, proportional to the projected mass inside x
pub fn nfw_h(x: f64) -> f64 {
    if x < SMALL_X {
        return 0.25 * x * x * (2.0 * (2.0 / x).ln() - 1.0);
    }
    (0.5 * x).ln() + nfw_f(x)
}

fn h_over_x(x: f64) -> f64 {
    if x < SMALL_X {
        return 0.25 * x * (2.0 * (2.0 / x).ln() - 1.0);
    }
    nfw_h(x) / x
}

/// Deflection at an offset `(dx, dy)` from the halo centre; zero at the centre.
pub fn nfw_deflection_at(dx: f64, dy: f64, scales: &NfwScales) -> (f64, f64) {
    let r = dx.hypot(dy);
    if r == 0.0 {
        return (0.0, 0.0);
    }

    let alpha = scales.deflection_magnitude(r);
    (alpha * dx / r, alpha * dy / r)
}

/// NFW deflection field over a coordinate mesh.
pub fn deflection_nfw(
    x: &Array2<f64>,
    y: &Array2<f64>,
    params: &NfwParams,
    distances: &LensingDistances,
) -> DeflectionField {
    let scales = NfwScales::new(params, distances);
    let (x0, y0) = (params.theta_x, params.theta_y);
    evaluate_deflection(x, y, move |xi, yi| {
        nfw_deflection_at(xi - x0, yi - y0, &scales)
    })
}
