//! Deflection-angle fields for lens mass profiles.
//!
//! Every evaluator maps the sky coordinates of a grid (arcsec) to the angle
//! (arcsec) by which a light ray arriving at that position has been bent.
//! Fields from independent lenses superpose linearly, see
//! [`DeflectionField::accumulate`].

pub mod nfw;
pub mod sie;

use ndarray::{Array2, Zip};

pub use nfw::{deflection_nfw, NfwParams, NfwScales};
pub use sie::{deflection_sie, SieParams};

/// Vector deflection field (α_x, α_y) sampled on an observation grid
#[derive(Debug, Clone, PartialEq)]
pub struct DeflectionField {
    pub alpha_x: Array2<f64>,
    pub alpha_y: Array2<f64>,
}

impl DeflectionField {
    /// Field with no deflection anywhere
    pub fn zeros(shape: (usize, usize)) -> Self {
        Self {
            alpha_x: Array2::zeros(shape),
            alpha_y: Array2::zeros(shape),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.alpha_x.dim()
    }

    /// Add another field component-wise
    pub fn accumulate(&mut self, other: &DeflectionField) {
        self.alpha_x += &other.alpha_x;
        self.alpha_y += &other.alpha_y;
    }

    /// Deflection magnitude |α| at every pixel
    pub fn magnitude(&self) -> Array2<f64> {
        let mut out = Array2::zeros(self.shape());
        Zip::from(&mut out)
            .and(&self.alpha_x)
            .and(&self.alpha_y)
            .for_each(|m, &ax, &ay| *m = ax.hypot(ay));
        out
    }

    /// Source-plane positions `(x - α_x, y - α_y)` reached by rays traced
    /// back from the image-plane coordinates `x`, `y`.
    pub fn ray_trace(&self, x: &Array2<f64>, y: &Array2<f64>) -> (Array2<f64>, Array2<f64>) {
        (x - &self.alpha_x, y - &self.alpha_y)
    }
}

/// Evaluate a per-point deflection law over a coordinate mesh in parallel.
pub(crate) fn evaluate_deflection<F>(x: &Array2<f64>, y: &Array2<f64>, law: F) -> DeflectionField
where
    F: Fn(f64, f64) -> (f64, f64) + Sync + Send,
{
    let mut field = DeflectionField::zeros(x.dim());
    Zip::from(&mut field.alpha_x)
        .and(&mut field.alpha_y)
        .and(x)
        .and(y)
        .par_for_each(|ax, ay, &xi, &yi| {
            let (dx, dy) = law(xi, yi);
            *ax = dx;
            *ay = dy;
        });
    field
}
