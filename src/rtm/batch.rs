//! Evaluation of many independent layers.

use log::{debug, info};
use rayon::prelude::*;

use super::grey_layer::GreyLayerSolver;
use super::particle::ParticleModel;
use super::two_stream::BlackBaseTwoStream;
use crate::error::RtmError;

/// Inputs for a single layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerConfig {
    /// Source of the layer's optical properties.
    pub model: ParticleModel,
    /// Geometrical thickness, in the length unit of the model.
    pub thickness: f64,
    /// Lambertian albedo of the base under the layer.
    pub bottom_albedo: f64,
}

/// Outputs from the RTM for a single layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerOutputs {
    /// Two-stream reflectivity over a black base.
    pub reflectivity: f64,
    /// Two-stream transmissivity over a black base.
    pub transmissivity: f64,
    /// Asymptotic diffuse reflectance over the grey base.
    pub diffuse_reflectance: f64,
    /// Asymptotic diffuse transmittance over the grey base.
    pub diffuse_transmittance: f64,
    /// Diffuse reflectance of the same medium if it were semi-infinite.
    pub semi_infinite_reflectance: f64,
}

impl LayerConfig {
    /// Bundle the layer inputs.
    pub fn new(model: impl Into<ParticleModel>, thickness: f64, bottom_albedo: f64) -> Self {
        Self {
            model: model.into(),
            thickness,
            bottom_albedo,
        }
    }

    /// Apply both solvers to this layer.
    ///
    /// The grey-base solver is always run, so a model with an asymmetry
    /// factor of exactly 1 fails with `InvalidParameter` here even though
    /// [`BlackBaseTwoStream`] alone would accept it.
    pub fn run(&self) -> Result<LayerOutputs, RtmError> {
        let iops = self.model.optical_properties()?;
        let two_stream = BlackBaseTwoStream::new(iops, self.thickness)?;
        let grey = GreyLayerSolver::new(iops, self.thickness, self.bottom_albedo)?;

        Ok(LayerOutputs {
            reflectivity: two_stream.reflectivity(),
            transmissivity: two_stream.transmissivity(),
            diffuse_reflectance: grey.diffuse_reflectance()?,
            diffuse_transmittance: grey.diffuse_transmittance()?,
            semi_infinite_reflectance: grey.semi_infinite_reflectance(),
        })
    }
}

/// Build the worker pool. `None` lets rayon pick the number of threads.
pub fn build_pool(num_threads: Option<usize>) -> Result<rayon::ThreadPool, RtmError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads.unwrap_or(0))
        .build()?;
    debug!("built pool with {} threads", pool.current_num_threads());
    Ok(pool)
}

/// Evaluate every layer in `configs` in parallel.
///
/// The outputs are in the same order as the inputs. The first error
/// encountered aborts the batch.
///
/// A new thread pool is built on every call. Callers evaluating many small
/// batches should build one with [`build_pool`] and use [`run_batch_in`].
pub fn run_batch(
    configs: &[LayerConfig],
    num_threads: Option<usize>,
) -> Result<Vec<LayerOutputs>, RtmError> {
    let pool = build_pool(num_threads)?;
    run_batch_in(&pool, configs)
}

/// Evaluate every layer in `configs` on an existing thread pool.
pub fn run_batch_in(
    pool: &rayon::ThreadPool,
    configs: &[LayerConfig],
) -> Result<Vec<LayerOutputs>, RtmError> {
    info!("Processing layer RTM for {} layers", configs.len());
    pool.install(|| configs.par_iter().map(LayerConfig::run).collect())
}
