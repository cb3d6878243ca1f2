//! Surface-brightness profiles for background sources.

pub mod sersic;

use ndarray::{Array2, Zip};

pub use sersic::{brightness_sersic, sersic_b, SersicParams};

/// Evaluate a per-point brightness law over a coordinate mesh in parallel.
pub(crate) fn evaluate_brightness<F>(x: &Array2<f64>, y: &Array2<f64>, law: F) -> Array2<f64>
where
    F: Fn(f64, f64) -> f64 + Sync + Send,
{
    let mut out = Array2::zeros(x.dim());
    Zip::from(&mut out)
        .and(x)
        .and(y)
        .par_for_each(|value, &xi, &yi| *value = law(xi, yi));
    out
}
