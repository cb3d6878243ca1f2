//! Singular isothermal ellipsoid (SIE) deflection.
//!
//! Uses the closed form of Keeton (2001) with the major axis along x and
//! `b = θ_E`:
//!
//! ```text
//! q' = sqrt(1 - q²),   ψ = sqrt(q² x² + y²)
//! α_x = (b q / q') · atan(q' x / ψ)
//! α_y = (b q / q') · atanh(q' y / ψ)
//! ```
//!
//! The `1/q'` factor is a removable singularity at `q = 1`. Close to it the
//! arctangents are expanded to third order, which reduces exactly to the
//! singular isothermal sphere `α = θ_E (x, y) / r` at `q = 1`.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::{evaluate_deflection, DeflectionField};
use crate::error::{LensingError, Result};

/// Below this `q'` the series form is used (error ~ q'^4)
const SERIES_THRESHOLD: f64 = 1e-4;

/// Largest `atanh` argument; for very flat lenses `q'` rounds to 1.
const ATANH_LIMIT: f64 = 1.0 - f64::EPSILON;

/// SIE lens parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SieParams {
    /// Lens centre x (arcsec)
    pub theta_x: f64,
    /// Lens centre y (arcsec)
    pub theta_y: f64,
    /// Einstein radius (arcsec)
    #[serde(rename = "theta_E")]
    pub theta_e: f64,
    /// Axis ratio, 0 < q <= 1
    pub q: f64,
}

impl SieParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.q > 0.0 && self.q <= 1.0) {
            return Err(LensingError::ParameterOutOfRange {
                kind: "SIE",
                name: "q",
                value: self.q,
                expected: "0 < q <= 1",
            });
        }
        if !(self.theta_e.is_finite() && self.theta_e >= 0.0) {
            return Err(LensingError::ParameterOutOfRange {
                kind: "SIE",
                name: "theta_E",
                value: self.theta_e,
                expected: "finite and >= 0",
            });
        }
        Ok(())
    }
}

/// Deflection at an offset `(dx, dy)` from the lens centre.
///
/// Returns the zero vector exactly at the centre, where the direction of the
/// (finite) isothermal deflection is undefined.
pub fn sie_deflection_at(dx: f64, dy: f64, theta_e: f64, q: f64) -> (f64, f64) {
    let psi = (q * q * dx * dx + dy * dy).sqrt();
    if psi == 0.0 {
        return (0.0, 0.0);
    }

    let q_prime = (1.0 - q * q).max(0.0).sqrt();
    let scale = theta_e * q;

    if q_prime < SERIES_THRESHOLD {
        let u = dx / psi;
        let v = dy / psi;
        let tx = q_prime * u;
        let ty = q_prime * v;
        // atan(t)/q' ≈ (t - t³/3)/q',  atanh(t)/q' ≈ (t + t³/3)/q'
        return (
            scale * u * (1.0 - tx * tx / 3.0),
            scale * v * (1.0 + ty * ty / 3.0),
        );
    }

    let k = scale / q_prime;
    (
        k * (q_prime * dx / psi).atan(),
        k * (q_prime * dy / psi).clamp(-ATANH_LIMIT, ATANH_LIMIT).atanh(),
    )
}

/// SIE deflection field over a coordinate mesh.
pub fn deflection_sie(x: &Array2<f64>, y: &Array2<f64>, params: &SieParams) -> DeflectionField {
    let p = *params;
    evaluate_deflection(x, y, move |xi, yi| {
        sie_deflection_at(xi - p.theta_x, yi - p.theta_y, p.theta_e, p.q)
    })
}
