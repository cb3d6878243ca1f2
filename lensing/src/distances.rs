//! Cosmological distances for a single lens/source redshift pair.

use cosmology::Cosmology;
use log::warn;
use std::f64::consts::PI;

use crate::config::GlobalParameters;
use crate::error::Result;
use crate::units::{
    Length, LengthExt, MassDensity, MassDensityExt, GRAVITATIONAL_CONSTANT, SPEED_OF_LIGHT,
};

/// Angular-diameter distances and background density looked up once per
/// simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensingDistances {
    /// Observer to lens
    pub d_l: Length,
    /// Observer to source
    pub d_s: Length,
    /// Lens to source
    pub d_ls: Length,
    /// Critical density of the universe at the lens redshift
    pub critical_density: MassDensity,
}

impl LensingDistances {
    pub fn from_cosmology(global: &GlobalParameters, cosmology: &dyn Cosmology) -> Result<Self> {
        let d_l = cosmology.angular_diameter_distance(global.z_l)?;
        let d_s = cosmology.angular_diameter_distance(global.z_s)?;
        let d_ls = if global.z_l <= global.z_s {
            cosmology.angular_diameter_distance_between(global.z_l, global.z_s)?
        } else {
            warn!(
                "Source redshift {} is in front of lens redshift {}; mass profiles will not deflect",
                global.z_s, global.z_l
            );
            Length::from_meters(0.0)
        };
        let critical_density = cosmology.critical_density(global.z_l)?;

        Ok(Self {
            d_l,
            d_s,
            d_ls,
            critical_density,
        })
    }

    /// Critical surface density for lensing in kg/m²
    ///
    /// ```text
    /// Σ_cr = c² D_s / (4π G D_l D_ls)
    /// ```
    ///
    /// Infinite when the source does not lie behind the lens.
    pub fn sigma_critical(&self) -> f64 {
        SPEED_OF_LIGHT * SPEED_OF_LIGHT * self.d_s.as_meters()
            / (4.0 * PI * GRAVITATIONAL_CONSTANT * self.d_l.as_meters() * self.d_ls.as_meters())
    }

    /// Critical density at the lens redshift in kg/m³
    pub fn rho_critical(&self) -> f64 {
        self.critical_density.as_kilograms_per_cubic_meter()
    }
}
