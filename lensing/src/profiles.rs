//! Closed sets of lens and source profiles and their dispatch.
//!
//! Configuration arrives as tagged dictionaries (`{"profile": "SIE", ...}`).
//! A [`ProfileEntry`] holds one such dictionary; converting it into a
//! [`LensProfile`] or [`SourceProfile`] is the only place where an
//! unsupported tag can appear, and it fails there with an error naming it.

use ndarray::Array2;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::brightness::{brightness_sersic, SersicParams};
use crate::deflection::{deflection_nfw, deflection_sie, DeflectionField, NfwParams, SieParams};
use crate::distances::LensingDistances;
use crate::error::{LensingError, Result};

/// One tagged profile dictionary as found in configuration files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileEntry {
    pub profile: String,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl ProfileEntry {
    fn parse<T: serde::de::DeserializeOwned>(self) -> Result<T> {
        serde_json::from_value(Value::Object(self.params)).map_err(|source| {
            LensingError::InvalidProfileParameters {
                kind: self.profile,
                source,
            }
        })
    }
}

/// Lens mass profiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "profile")]
pub enum LensProfile {
    #[serde(rename = "SIE")]
    Sie(SieParams),
    #[serde(rename = "NFW")]
    Nfw(NfwParams),
}

impl LensProfile {
    /// Configuration tag of this profile
    pub fn kind(&self) -> &'static str {
        match self {
            LensProfile::Sie(_) => "SIE",
            LensProfile::Nfw(_) => "NFW",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            LensProfile::Sie(p) => p.validate(),
            LensProfile::Nfw(p) => p.validate(),
        }
    }

    /// Deflection field of this lens on the given mesh
    pub fn deflection(
        &self,
        x: &Array2<f64>,
        y: &Array2<f64>,
        distances: &LensingDistances,
    ) -> DeflectionField {
        match self {
            LensProfile::Sie(p) => deflection_sie(x, y, p),
            LensProfile::Nfw(p) => deflection_nfw(x, y, p, distances),
        }
    }
}

impl TryFrom<ProfileEntry> for LensProfile {
    type Error = LensingError;

    fn try_from(entry: ProfileEntry) -> Result<Self> {
        match entry.profile.as_str() {
            "SIE" => Ok(LensProfile::Sie(entry.parse()?)),
            "NFW" => Ok(LensProfile::Nfw(entry.parse()?)),
            _ => Err(LensingError::UnknownLensProfile(entry.profile)),
        }
    }
}

impl<'de> Deserialize<'de> for LensProfile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let entry = ProfileEntry::deserialize(deserializer)?;
        LensProfile::try_from(entry).map_err(serde::de::Error::custom)
    }
}

/// Source light profiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "profile")]
pub enum SourceProfile {
    Sersic(SersicParams),
}

impl SourceProfile {
    /// Configuration tag of this profile
    pub fn kind(&self) -> &'static str {
        match self {
            SourceProfile::Sersic(_) => "Sersic",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            SourceProfile::Sersic(p) => p.validate(),
        }
    }

    /// Surface brightness of this source at the given (source-plane) mesh
    pub fn brightness(&self, x: &Array2<f64>, y: &Array2<f64>) -> Array2<f64> {
        match self {
            SourceProfile::Sersic(p) => brightness_sersic(x, y, p),
        }
    }
}

impl TryFrom<ProfileEntry> for SourceProfile {
    type Error = LensingError;

    fn try_from(entry: ProfileEntry) -> Result<Self> {
        match entry.profile.as_str() {
            "Sersic" => Ok(SourceProfile::Sersic(entry.parse()?)),
            _ => Err(LensingError::UnknownSourceProfile(entry.profile)),
        }
    }
}

impl<'de> Deserialize<'de> for SourceProfile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let entry = ProfileEntry::deserialize(deserializer)?;
        SourceProfile::try_from(entry).map_err(serde::de::Error::custom)
    }
}
