//! Background cosmology for lensing simulations
//!
//! This crate supplies the distance measures a lens model needs to turn
//! physical halo parameters into angular deflections. The lensing engine only
//! talks to the [`Cosmology`] trait, so any model (or a test stub) can be
//! injected in place of the bundled [`FlatLambdaCdm`].

use thiserror::Error;

pub mod flat_lcdm;
pub mod units;

pub use flat_lcdm::FlatLambdaCdm;
pub use units::{Length, LengthExt, MassDensity, MassDensityExt};

/// Error types for cosmological calculations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CosmologyError {
    #[error("Invalid redshift: {0} (must be finite and non-negative)")]
    InvalidRedshift(f64),

    #[error("Redshifts out of order: z1 = {0} must not exceed z2 = {1}")]
    UnorderedRedshifts(f64, f64),
}

pub type Result<T> = std::result::Result<T, CosmologyError>;

/// Check that a redshift is usable for distance lookups
pub fn validate_redshift(z: f64) -> Result<f64> {
    if z.is_finite() && z >= 0.0 {
        Ok(z)
    } else {
        Err(CosmologyError::InvalidRedshift(z))
    }
}

/// Capability interface for anything that can answer distance queries.
///
/// Implementations must be deterministic: the lensing engine looks distances
/// up once per simulation and caches them.
pub trait Cosmology: Send + Sync {
    /// Angular-diameter distance from the observer to redshift `z`.
    fn angular_diameter_distance(&self, z: f64) -> Result<Length>;

    /// Angular-diameter distance between two redshifts `z1 <= z2`.
    ///
    /// The default uses the spatially flat relation
    /// `D_12 = D_2 - D_1 (1 + z1) / (1 + z2)`, which follows from comoving
    /// distances adding along the line of sight.
    fn angular_diameter_distance_between(&self, z1: f64, z2: f64) -> Result<Length> {
        validate_redshift(z1)?;
        validate_redshift(z2)?;
        if z1 > z2 {
            return Err(CosmologyError::UnorderedRedshifts(z1, z2));
        }

        let d1 = self.angular_diameter_distance(z1)?;
        let d2 = self.angular_diameter_distance(z2)?;
        Ok(d2 - d1 * ((1.0 + z1) / (1.0 + z2)))
    }

    /// Critical density of the universe at redshift `z`.
    fn critical_density(&self, z: f64) -> Result<MassDensity>;
}
