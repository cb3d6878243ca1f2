//! Error types for lens model configuration and image synthesis

use cosmology::CosmologyError;
use thiserror::Error;

/// Errors that can occur while configuring or running a lensing simulation
#[derive(Error, Debug)]
pub enum LensingError {
    #[error("Unknown lens profile: {0:?}")]
    UnknownLensProfile(String),

    #[error("Unknown source profile: {0:?}")]
    UnknownSourceProfile(String),

    #[error("Invalid parameters for {kind} profile: {source}")]
    InvalidProfileParameters {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} parameter {name} = {value} is out of range ({expected})")]
    ParameterOutOfRange {
        kind: &'static str,
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("Invalid observation grid: {0}")]
    InvalidGrid(String),

    #[error("Cosmology error: {0}")]
    Cosmology(#[from] CosmologyError),

    #[error("Configuration parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, LensingError>;
