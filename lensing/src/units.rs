//! Type-safe physical units for lens modelling
//!
//! Sky positions and deflections are handled as plain `f64` arcseconds inside
//! the pixel kernels. The `uom` types here are used wherever a value crosses
//! between angular and physical units (halo masses, distances, scale radii).

use uom::si::angle::radian;
use uom::si::mass::kilogram;

pub use cosmology::units::{
    Length, LengthExt, MassDensity, MassDensityExt, GRAVITATIONAL_CONSTANT,
    METERS_PER_MEGAPARSEC,
};

/// Type alias for angles with convenient methods
pub type Angle = uom::si::f64::Angle;

/// Type alias for masses with convenient methods
pub type Mass = uom::si::f64::Mass;

/// Speed of light in m/s
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Nominal solar mass in kg (IAU 2015 Resolution B3)
pub const SOLAR_MASS_KG: f64 = 1.988_409_87e30;

/// Radians in one arcsecond
pub const RADIANS_PER_ARCSECOND: f64 = std::f64::consts::PI / (180.0 * 3600.0);

/// Extension trait for angle conversions used on the sky
pub trait AngleExt {
    /// Create angle from arcseconds
    fn from_arcseconds(arcsec: f64) -> Self;

    /// Get angle in arcseconds
    fn as_arcseconds(&self) -> f64;

    /// Create angle from radians
    fn from_radians(rad: f64) -> Self;

    /// Get angle in radians
    fn as_radians(&self) -> f64;
}

/// Extension trait for astronomical masses
pub trait MassExt {
    /// Create mass from solar masses
    fn from_solar_masses(m_sun: f64) -> Self;

    /// Get mass in solar masses
    fn as_solar_masses(&self) -> f64;

    /// Get mass in kilograms
    fn as_kilograms(&self) -> f64;
}

impl AngleExt for Angle {
    fn from_arcseconds(arcsec: f64) -> Self {
        Angle::new::<radian>(arcsec * RADIANS_PER_ARCSECOND)
    }

    fn as_arcseconds(&self) -> f64 {
        self.get::<radian>() / RADIANS_PER_ARCSECOND
    }

    fn from_radians(rad: f64) -> Self {
        Angle::new::<radian>(rad)
    }

    fn as_radians(&self) -> f64 {
        self.get::<radian>()
    }
}

impl MassExt for Mass {
    fn from_solar_masses(m_sun: f64) -> Self {
        Mass::new::<kilogram>(m_sun * SOLAR_MASS_KG)
    }

    fn as_solar_masses(&self) -> f64 {
        self.get::<kilogram>() / SOLAR_MASS_KG
    }

    fn as_kilograms(&self) -> f64 {
        self.get::<kilogram>()
    }
}
