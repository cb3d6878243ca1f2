//! Simulation configuration: lens list, source list, global and observation
//! parameters.
//!
//! A configuration file is a JSON document of the form
//!
//! ```json
//! {
//!   "lenses":  [{"profile": "SIE", "theta_x": 0.0, "theta_y": 0.0, "theta_E": 1.0, "q": 1.0}],
//!   "sources": [{"profile": "Sersic", "theta_x": 0.0, "theta_y": 0.0,
//!                "theta_e_gal": 0.3, "n_srsc": 1.0, "I_gal": 1.0}],
//!   "global": {"z_s": 1.0, "z_l": 0.5},
//!   "observation": {"xlims": [-2.0, 2.0], "ylims": [-2.0, 2.0], "nx": 50, "ny": 50,
//!                   "exposure": 1.0, "A_iso": 0.0}
//! }
//! ```
//!
//! An optional `"cosmology": {"h0": ..., "omega_m": ...}` block overrides the
//! default Planck 2015 background.

use cosmology::FlatLambdaCdm;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{LensingError, Result};
use crate::grid::ObservationGrid;
use crate::profiles::{LensProfile, ProfileEntry, SourceProfile};

/// Redshifts of the lens and source planes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalParameters {
    pub z_s: f64,
    pub z_l: f64,
}

/// Detector field of view, resolution and photometric scaling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationParameters {
    /// Horizontal field-of-view limits (arcsec)
    pub xlims: [f64; 2],
    /// Vertical field-of-view limits (arcsec)
    pub ylims: [f64; 2],
    pub nx: usize,
    pub ny: usize,
    /// Exposure scale factor applied to the whole image
    pub exposure: f64,
    /// Isotropic background surface brightness
    #[serde(rename = "A_iso")]
    pub a_iso: f64,
}

impl ObservationParameters {
    /// Check the photometric scaling; the image is non-negative only when
    /// both `exposure` and `A_iso` are.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("exposure", self.exposure), ("A_iso", self.a_iso)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LensingError::ParameterOutOfRange {
                    kind: "observation",
                    name,
                    value,
                    expected: "finite and >= 0",
                });
            }
        }
        Ok(())
    }

    /// Build the observation grid described by these parameters
    pub fn grid(&self) -> Result<ObservationGrid> {
        ObservationGrid::new(self.xlims, self.ylims, self.nx, self.ny)
    }
}

/// Complete description of one simulated observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationConfig {
    pub lenses: Vec<LensProfile>,
    pub sources: Vec<SourceProfile>,
    pub global: GlobalParameters,
    pub observation: ObservationParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cosmology: Option<FlatLambdaCdm>,
}

/// Untyped form of [`SimulationConfig`] with profiles still as tagged
/// dictionaries
#[derive(Debug, Clone, Deserialize)]
struct RawSimulationConfig {
    #[serde(default)]
    lenses: Vec<ProfileEntry>,
    #[serde(default)]
    sources: Vec<ProfileEntry>,
    global: GlobalParameters,
    observation: ObservationParameters,
    #[serde(default)]
    cosmology: Option<FlatLambdaCdm>,
}

impl TryFrom<RawSimulationConfig> for SimulationConfig {
    type Error = LensingError;

    fn try_from(raw: RawSimulationConfig) -> Result<Self> {
        let lenses = raw
            .lenses
            .into_iter()
            .map(LensProfile::try_from)
            .collect::<Result<Vec<_>>>()?;
        let sources = raw
            .sources
            .into_iter()
            .map(SourceProfile::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            lenses,
            sources,
            global: raw.global,
            observation: raw.observation,
            cosmology: raw.cosmology,
        })
    }
}

impl SimulationConfig {
    /// Parse a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawSimulationConfig = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Load a JSON configuration file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Save as pretty-printed JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Background cosmology to use, Planck 2015 unless overridden
    pub fn cosmology(&self) -> FlatLambdaCdm {
        self.cosmology.unwrap_or_default()
    }

    /// Einstein-ring demonstration: a circular SIE centred on an aligned
    /// exponential-disk source, observed on a 4″ × 4″, 50 × 50 grid.
    pub fn einstein_ring() -> Self {
        use crate::brightness::SersicParams;
        use crate::deflection::SieParams;

        Self {
            lenses: vec![LensProfile::Sie(SieParams {
                theta_x: 0.0,
                theta_y: 0.0,
                theta_e: 1.0,
                q: 1.0,
            })],
            sources: vec![SourceProfile::Sersic(SersicParams {
                theta_x: 0.0,
                theta_y: 0.0,
                theta_e: 0.3,
                n: 1.0,
                intensity: 1.0,
            })],
            global: GlobalParameters { z_s: 1.0, z_l: 0.5 },
            observation: ObservationParameters {
                xlims: [-2.0, 2.0],
                ylims: [-2.0, 2.0],
                nx: 50,
                ny: 50,
                exposure: 1.0,
                a_iso: 0.0,
            },
            cosmology: None,
        }
    }
}
