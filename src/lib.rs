//! Layer RTM computation
//!
//! Closed-form reflectance and transmittance of a scattering layer (e.g. a
//! snowpack) from its microphysics. The model lives in [`rtm`]; the optional
//! `python` feature builds a Python extension module on top of it.
//!
//! ```
//! use num_complex::Complex64;
//! use snow_rtm::{GreyLayerSolver, LowAbsorptionSpheres};
//!
//! let iops = LowAbsorptionSpheres::new(0.2, 300e-6, Complex64::new(1.31, 1e-9), 500e-9)?
//!     .optical_properties()?;
//! let snowpack = GreyLayerSolver::new(iops, 0.1, 0.2)?;
//! assert!(snowpack.diffuse_reflectance()? > 0.8);
//! # Ok::<(), snow_rtm::RtmError>(())
//! ```

pub mod error;
pub mod rtm;

#[cfg(feature = "python")]
mod python;

pub use error::RtmError;
pub use rtm::{
    escape_function, run_batch, BlackBaseTwoStream, GreyLayerSolver, LayerConfig, LayerOutputs,
    LowAbsorptionSpheres, OpticalProperties, ParticleModel,
};
