//! Analytic radiative transfer model for a plane-parallel particulate layer,
//! such as a snowpack.
//!
//! Microphysical inputs are turned into inherent optical properties by a
//! [`ParticleModel`], and the properties are fed into one of two closed-form
//! layer solutions:
//!
//! - [`BlackBaseTwoStream`], the two-stream solution over a black base
//! - [`GreyLayerSolver`], the asymptotic solution over a Lambertian base
//!
//! Everything here is a pure function of its inputs, so independent layers
//! can be evaluated concurrently; see [`run_batch`].

mod batch;
mod core;
mod grey_layer;
mod iops;
mod particle;
mod two_stream;


pub use self::batch::{build_pool, run_batch, run_batch_in, LayerConfig, LayerOutputs};
pub use self::core::escape_function;
pub use self::grey_layer::GreyLayerSolver;
pub use self::iops::OpticalProperties;
pub use self::particle::{LowAbsorptionSpheres, ParticleModel};
pub use self::two_stream::BlackBaseTwoStream;
