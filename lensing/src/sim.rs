//! Strong-lensing image synthesis.
//!
//! [`LensingSim`] owns everything needed to render one observation: the
//! observation grid, the lens and source lists, and the cosmological
//! distances for the lens/source redshift pair. Construction does all of the
//! one-time work (grid meshes, distance lookups, parameter validation);
//! [`LensingSim::synthesize`] is then a pure function of that state.
//!
//! # Pipeline
//!
//! 1. Sum the deflection fields of all lenses on the full grid
//! 2. Ray-trace each pixel back to the source plane, `β = θ - α(θ)`
//! 3. Sum the brightness of all sources at the traced positions
//! 4. Add the isotropic background `A_iso`
//! 5. Scale by exposure and pixel area:
//!    `image = (lensed + A_iso) · exposure · pixel_area`
//!
//! Per-pixel kernels run in parallel, but every pixel is computed
//! independently and lenses/sources are accumulated in list order, so
//! repeated calls return bit-identical images.

use cosmology::Cosmology;
use log::debug;
use ndarray::Array2;

use crate::config::{GlobalParameters, ObservationParameters, SimulationConfig};
use crate::deflection::DeflectionField;
use crate::distances::LensingDistances;
use crate::error::Result;
use crate::grid::ObservationGrid;
use crate::profiles::{LensProfile, SourceProfile};
use crate::units::LengthExt;

/// Intermediate fields and final image of one synthesis
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    /// Total deflection of all lenses
    pub deflection: DeflectionField,
    /// Source brightness seen through the lenses, before background and
    /// photometric scaling
    pub lensed_brightness: Array2<f64>,
    /// Final image
    pub image: Array2<f64>,
}

/// Strong-lensing image simulator for a fixed lens/source configuration
#[derive(Debug, Clone)]
pub struct LensingSim {
    lenses: Vec<LensProfile>,
    sources: Vec<SourceProfile>,
    global: GlobalParameters,
    observation: ObservationParameters,
    grid: ObservationGrid,
    distances: LensingDistances,
}

impl LensingSim {
    /// Set up a simulator.
    ///
    /// Builds the observation grid, validates every profile and looks up the
    /// lens and source distances from `cosmology` once.
    pub fn new(
        lenses: Vec<LensProfile>,
        sources: Vec<SourceProfile>,
        global: GlobalParameters,
        observation: ObservationParameters,
        cosmology: &dyn Cosmology,
    ) -> Result<Self> {
        for lens in &lenses {
            lens.validate()?;
        }
        for source in &sources {
            source.validate()?;
        }
        observation.validate()?;

        let grid = observation.grid()?;
        let distances = LensingDistances::from_cosmology(&global, cosmology)?;

        debug!(
            "Lensing simulation: {} lenses, {} sources, {}x{} grid, pixel area {:.4e} arcsec²",
            lenses.len(),
            sources.len(),
            grid.nx(),
            grid.ny(),
            grid.pixel_area()
        );
        debug!(
            "  z_l = {}, z_s = {}, D_l = {:.2} Mpc, D_s = {:.2} Mpc, D_ls = {:.2} Mpc",
            global.z_l,
            global.z_s,
            distances.d_l.as_megaparsecs(),
            distances.d_s.as_megaparsecs(),
            distances.d_ls.as_megaparsecs()
        );

        Ok(Self {
            lenses,
            sources,
            global,
            observation,
            grid,
            distances,
        })
    }

    /// Set up a simulator from a parsed configuration
    pub fn from_config(config: &SimulationConfig, cosmology: &dyn Cosmology) -> Result<Self> {
        Self::new(
            config.lenses.clone(),
            config.sources.clone(),
            config.global,
            config.observation,
            cosmology,
        )
    }

    /// Total deflection field of all lenses on the observation grid
    pub fn deflection_field(&self) -> DeflectionField {
        let x = self.grid.x_mesh();
        let y = self.grid.y_mesh();

        let mut total = DeflectionField::zeros(self.grid.shape());
        for lens in &self.lenses {
            total.accumulate(&lens.deflection(x, y, &self.distances));
        }
        total
    }

    /// Summed source brightness evaluated at the ray-traced positions
    pub fn lensed_brightness(&self, deflection: &DeflectionField) -> Array2<f64> {
        let (beta_x, beta_y) = deflection.ray_trace(self.grid.x_mesh(), self.grid.y_mesh());
        self.source_brightness(&beta_x, &beta_y)
    }

    /// Summed source brightness without any lensing
    pub fn unlensed_brightness(&self) -> Array2<f64> {
        self.source_brightness(self.grid.x_mesh(), self.grid.y_mesh())
    }

    fn source_brightness(&self, x: &Array2<f64>, y: &Array2<f64>) -> Array2<f64> {
        let mut total = Array2::zeros(self.grid.shape());
        for source in &self.sources {
            total += &source.brightness(x, y);
        }
        total
    }

    /// Apply the isotropic background and photometric scaling
    pub fn compose_image(&self, brightness: &Array2<f64>) -> Array2<f64> {
        let scale = self.observation.exposure * self.grid.pixel_area();
        let background = self.observation.a_iso;
        brightness.mapv(|b| (b + background) * scale)
    }

    /// Lensed image with all intermediate fields
    pub fn synthesize_components(&self) -> SynthesisResult {
        let deflection = self.deflection_field();
        let lensed_brightness = self.lensed_brightness(&deflection);
        let image = self.compose_image(&lensed_brightness);

        SynthesisResult {
            deflection,
            lensed_brightness,
            image,
        }
    }

    /// Strongly lensed image
    pub fn synthesize(&self) -> Array2<f64> {
        self.synthesize_components().image
    }

    /// Image the same sources would produce with every lens removed
    pub fn synthesize_unlensed(&self) -> Array2<f64> {
        self.compose_image(&self.unlensed_brightness())
    }

    pub fn grid(&self) -> &ObservationGrid {
        &self.grid
    }

    pub fn distances(&self) -> &LensingDistances {
        &self.distances
    }

    pub fn lenses(&self) -> &[LensProfile] {
        &self.lenses
    }

    pub fn sources(&self) -> &[SourceProfile] {
        &self.sources
    }

    pub fn global(&self) -> &GlobalParameters {
        &self.global
    }

    pub fn observation(&self) -> &ObservationParameters {
        &self.observation
    }
}
