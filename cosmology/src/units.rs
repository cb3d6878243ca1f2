//! Type-safe cosmological units
//!
//! Distances and densities cross the crate boundary as `uom` quantities so
//! the megaparsec/meter bookkeeping stays in one place.

use uom::si::length::meter;
use uom::si::mass_density::kilogram_per_cubic_meter;

/// Type alias for length measurements with convenient methods
pub type Length = uom::si::f64::Length;

/// Type alias for mass densities with convenient methods
pub type MassDensity = uom::si::f64::MassDensity;

/// Meters in one megaparsec (IAU 2015 parsec)
pub const METERS_PER_MEGAPARSEC: f64 = 3.085_677_581_491_367e22;

/// Speed of light in km/s
pub const SPEED_OF_LIGHT_KM_S: f64 = 299_792.458;

/// Newtonian gravitational constant in m^3 kg^-1 s^-2 (CODATA 2018)
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674_30e-11;

/// Extension trait for length conversions at cosmological scales
pub trait LengthExt {
    /// Create length from megaparsecs
    fn from_megaparsecs(mpc: f64) -> Self;

    /// Get length in megaparsecs
    fn as_megaparsecs(&self) -> f64;

    /// Create length from meters
    fn from_meters(m: f64) -> Self;

    /// Get length in meters
    fn as_meters(&self) -> f64;
}

/// Extension trait for mass density conversions
pub trait MassDensityExt {
    /// Create density from kg/m^3
    fn from_kilograms_per_cubic_meter(rho: f64) -> Self;

    /// Get density in kg/m^3
    fn as_kilograms_per_cubic_meter(&self) -> f64;
}

impl LengthExt for Length {
    fn from_megaparsecs(mpc: f64) -> Self {
        Length::new::<meter>(mpc * METERS_PER_MEGAPARSEC)
    }

    fn as_megaparsecs(&self) -> f64 {
        self.get::<meter>() / METERS_PER_MEGAPARSEC
    }

    fn from_meters(m: f64) -> Self {
        Length::new::<meter>(m)
    }

    fn as_meters(&self) -> f64 {
        self.get::<meter>()
    }
}

impl MassDensityExt for MassDensity {
    fn from_kilograms_per_cubic_meter(rho: f64) -> Self {
        MassDensity::new::<kilogram_per_cubic_meter>(rho)
    }

    fn as_kilograms_per_cubic_meter(&self) -> f64 {
        self.get::<kilogram_per_cubic_meter>()
    }
}
