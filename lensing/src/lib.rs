//! Strong gravitational lensing image synthesis
//!
//! This crate renders what a telescope sees when background galaxies are
//! lensed by foreground mass distributions. Lenses deflect light rays
//! (singular isothermal ellipsoids, NFW halos), sources emit light (Sersic
//! profiles), and [`LensingSim`] ray-traces every detector pixel back to the
//! source plane to build the final image.

pub mod brightness;
pub mod config;
pub mod deflection;
pub mod distances;
pub mod error;
pub mod grid;
pub mod image_io;
pub mod profiles;
pub mod sim;
pub mod units;

// Re-exports for easier access
pub use brightness::{brightness_sersic, SersicParams};
pub use config::{GlobalParameters, ObservationParameters, SimulationConfig};
pub use cosmology::{Cosmology, FlatLambdaCdm};
pub use deflection::{deflection_nfw, deflection_sie, DeflectionField, NfwParams, SieParams};
pub use distances::LensingDistances;
pub use error::{LensingError, Result};
pub use grid::ObservationGrid;
pub use profiles::{LensProfile, ProfileEntry, SourceProfile};
pub use sim::{LensingSim, SynthesisResult};
