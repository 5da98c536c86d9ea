//! Interface between Rust and Python.
//!
//! NOTE: the real work happens in [`crate::rtm`], which doesn't use `pyo3`;
//! it's only used here.

use std::{
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    time::{Duration, Instant},
};

use log::{debug, info};
use ndarray::Array1;
use num_complex::Complex64;
use numpy::prelude::*;
use numpy::{PyArray1, PyReadonlyArray1, ToPyArray};
use pyo3::exceptions::{PyArithmeticError, PyKeyboardInterrupt, PyValueError};
use pyo3::prelude::*;
use rayon::prelude::*;

use crate::error::RtmError;
use crate::rtm::{
    build_pool, BlackBaseTwoStream, GreyLayerSolver, LayerConfig, LayerOutputs,
    LowAbsorptionSpheres, OpticalProperties,
};

impl From<RtmError> for PyErr {
    fn from(e: RtmError) -> Self {
        match &e {
            RtmError::SingularConfiguration => PyArithmeticError::new_err(e.to_string()),
            RtmError::Cancelled => PyKeyboardInterrupt::new_err(e.to_string()),
            _ => PyValueError::new_err(e.to_string()),
        }
    }
}

/// Reject negative (or NaN) depths before they reach the model.
fn depth(geometrical_depth: f64) -> Result<f64, RtmError> {
    if geometrical_depth >= 0.0 {
        Ok(geometrical_depth)
    } else {
        Err(RtmError::invalid("geometrical_depth", geometrical_depth))
    }
}

/// Inherent optical properties of a layer.
#[pyclass(name = "OpticalProperties", frozen)]
#[derive(Debug, Clone)]
struct PyOpticalProperties(OpticalProperties);

#[pymethods]
impl PyOpticalProperties {
    #[new]
    fn new(
        absorption_coefficient: f64,
        scattering_coefficient: f64,
        asymmetry_factor: f64,
    ) -> PyResult<Self> {
        Ok(Self(OpticalProperties::new(
            absorption_coefficient,
            scattering_coefficient,
            asymmetry_factor,
        )?))
    }

    #[getter]
    fn absorption_coefficient(&self) -> f64 {
        self.0.absorption_coefficient()
    }

    #[getter]
    fn scattering_coefficient(&self) -> f64 {
        self.0.scattering_coefficient()
    }

    #[getter]
    fn asymmetry_factor(&self) -> f64 {
        self.0.asymmetry_factor()
    }

    fn single_scattering_albedo(&self) -> f64 {
        self.0.single_scattering_albedo()
    }

    fn extinction_coefficient(&self) -> f64 {
        self.0.extinction_coefficient()
    }

    fn optical_depth(&self, geometrical_depth: f64) -> PyResult<f64> {
        Ok(self.0.optical_depth(depth(geometrical_depth)?))
    }

    fn scaled_optical_depth(&self, geometrical_depth: f64) -> PyResult<f64> {
        Ok(self.0.scaled_optical_depth(depth(geometrical_depth)?))
    }

    fn __repr__(&self) -> String {
        format!(
            "OpticalProperties(absorption_coefficient={}, scattering_coefficient={}, asymmetry_factor={})",
            self.0.absorption_coefficient(),
            self.0.scattering_coefficient(),
            self.0.asymmetry_factor()
        )
    }
}

/// Two-stream layer over a black base.
#[pyclass(name = "BlackBaseTwoStream", frozen)]
#[derive(Debug, Clone)]
struct PyBlackBaseTwoStream(BlackBaseTwoStream);

#[pymethods]
impl PyBlackBaseTwoStream {
    #[new]
    fn new(iops: PyRef<'_, PyOpticalProperties>, thickness: f64) -> PyResult<Self> {
        Ok(Self(BlackBaseTwoStream::new(iops.0, thickness)?))
    }

    fn reflectivity(&self) -> f64 {
        self.0.reflectivity()
    }

    fn transmissivity(&self) -> f64 {
        self.0.transmissivity()
    }
}

/// Asymptotic layer over a grey Lambertian base.
#[pyclass(name = "GreyLayerSolver", frozen)]
#[derive(Debug, Clone)]
struct PyGreyLayerSolver(GreyLayerSolver);

#[pymethods]
impl PyGreyLayerSolver {
    #[new]
    fn new(
        iops: PyRef<'_, PyOpticalProperties>,
        thickness: f64,
        bottom_albedo: f64,
    ) -> PyResult<Self> {
        Ok(Self(GreyLayerSolver::new(iops.0, thickness, bottom_albedo)?))
    }

    fn absorption_probability(&self) -> f64 {
        self.0.absorption_probability()
    }

    fn similarity_parameter(&self) -> f64 {
        self.0.similarity_parameter()
    }

    fn diffusion_exponent(&self) -> f64 {
        self.0.diffusion_exponent()
    }

    fn escape_function(&self, mu: f64) -> PyResult<f64> {
        Ok(self.0.escape_function(mu)?)
    }

    fn black_base_reflectance(&self) -> f64 {
        self.0.black_base_reflectance()
    }

    fn black_base_transmittance(&self) -> f64 {
        self.0.black_base_transmittance()
    }

    fn semi_infinite_reflectance(&self) -> f64 {
        self.0.semi_infinite_reflectance()
    }

    fn diffuse_reflectance(&self) -> PyResult<f64> {
        Ok(self.0.diffuse_reflectance()?)
    }

    fn diffuse_transmittance(&self) -> PyResult<f64> {
        Ok(self.0.diffuse_transmittance()?)
    }

    fn transmission_function(&self, xi: f64, eta: f64) -> PyResult<f64> {
        Ok(self.0.transmission_function(xi, eta)?)
    }

    fn reflection_function(&self, xi: f64, eta: f64) -> PyResult<Option<f64>> {
        Ok(self.0.reflection_function(xi, eta)?)
    }
}

/// IOPs of weakly absorbing spherical grains.
///
/// `grain_radius` and `wavelength` must be in the same length unit; the
/// coefficients are returned in the inverse of that unit.
#[pyfunction]
fn low_absorption_spheres(
    volume_fraction: f64,
    grain_radius: f64,
    n_real: f64,
    n_imag: f64,
    wavelength: f64,
) -> PyResult<PyOpticalProperties> {
    let spheres = LowAbsorptionSpheres::new(
        volume_fraction,
        grain_radius,
        Complex64::new(n_real, n_imag),
        wavelength,
    )?;
    Ok(PyOpticalProperties(spheres.optical_properties()?))
}

/// Layer results.
///
/// This is just a container of multiple numpy arrays, each dimensioned as
/// (`num_layers`, ).
#[pyclass(frozen)]
#[derive(Debug)]
struct LayerResults {
    reflectivity: Array1<f64>,
    transmissivity: Array1<f64>,
    diffuse_reflectance: Array1<f64>,
    diffuse_transmittance: Array1<f64>,
    semi_infinite_reflectance: Array1<f64>,
}

/// Implement all the "getters" for the Python properties
#[pymethods]
impl LayerResults {
    #[getter]
    fn reflectivity<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.reflectivity.to_pyarray(py)
    }

    #[getter]
    fn transmissivity<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.transmissivity.to_pyarray(py)
    }

    #[getter]
    fn diffuse_reflectance<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.diffuse_reflectance.to_pyarray(py)
    }

    #[getter]
    fn diffuse_transmittance<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.diffuse_transmittance.to_pyarray(py)
    }

    #[getter]
    fn semi_infinite_reflectance<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.semi_infinite_reflectance.to_pyarray(py)
    }
}

impl LayerResults {
    fn new(outputs: &[LayerOutputs]) -> Self {
        let column = |f: fn(&LayerOutputs) -> f64| outputs.iter().map(f).collect::<Array1<_>>();
        Self {
            reflectivity: column(|o| o.reflectivity),
            transmissivity: column(|o| o.transmissivity),
            diffuse_reflectance: column(|o| o.diffuse_reflectance),
            diffuse_transmittance: column(|o| o.diffuse_transmittance),
            semi_infinite_reflectance: column(|o| o.semi_infinite_reflectance),
        }
    }
}

/// Compute the layer RTM for many independent layers.
///
/// All inputs are numpy arrays with shape (`num_layers`, ). Each layer is
/// made of weakly absorbing spherical grains.
///
/// `volume_fraction`: fraction of the layer volume occupied by grains
///
/// `grain_radius`: grain radius, in the same length unit as `wavelength`
///
/// `n_real`, `n_imag`: complex refractive index of the grain material
///
/// `wavelength`: vacuum wavelength
///
/// `thickness`: geometrical thickness of the layer, same length unit
///
/// `bottom_albedo`: Lambertian albedo of the base under the layer
///
/// The number of worker threads is controlled by `num_threads`. It must be a
/// positive integer, or `None` to automatically choose the number of threads.
#[pyfunction]
#[pyo3(signature = (volume_fraction, grain_radius, n_real, n_imag, wavelength, thickness, bottom_albedo, num_threads=None))]
#[allow(clippy::too_many_arguments)]
fn compute_layers(
    py: Python<'_>,
    volume_fraction: PyReadonlyArray1<'_, f64>,
    grain_radius: PyReadonlyArray1<'_, f64>,
    n_real: PyReadonlyArray1<'_, f64>,
    n_imag: PyReadonlyArray1<'_, f64>,
    wavelength: PyReadonlyArray1<'_, f64>,
    thickness: PyReadonlyArray1<'_, f64>,
    bottom_albedo: PyReadonlyArray1<'_, f64>,
    num_threads: Option<usize>,
) -> PyResult<LayerResults> {
    let num_layers = volume_fraction.len();

    let lengths = [
        grain_radius.len(),
        n_real.len(),
        n_imag.len(),
        wavelength.len(),
        thickness.len(),
        bottom_albedo.len(),
    ];
    if lengths.iter().any(|&len| len != num_layers) {
        return Err(RtmError::InconsistentInputs.into());
    }
    debug!("input shapes are consistent");

    // Ensure everything is contiguous
    let volume_fraction = volume_fraction.as_slice()?;
    let grain_radius = grain_radius.as_slice()?;
    let n_real = n_real.as_slice()?;
    let n_imag = n_imag.as_slice()?;
    let wavelength = wavelength.as_slice()?;
    let thickness = thickness.as_slice()?;
    let bottom_albedo = bottom_albedo.as_slice()?;

    let pool = build_pool(num_threads)?;
    let mut results = Vec::new();

    // These atomics keep track of how many layers have finished and whether
    // it's time to cancel the computation or not
    let num_completed = AtomicUsize::new(0);
    let cancelled = AtomicBool::new(false);

    info!("Processing layer RTM for {num_layers} layers");

    pool.in_place_scope(|s| -> Result<(), PyErr> {
        s.spawn(|_| {
            (0..num_layers)
                .into_par_iter()
                .map(|i| -> Result<_, RtmError> {
                    if cancelled.load(Ordering::Relaxed) {
                        return Err(RtmError::Cancelled);
                    }

                    let spheres = LowAbsorptionSpheres::new(
                        volume_fraction[i],
                        grain_radius[i],
                        Complex64::new(n_real[i], n_imag[i]),
                        wavelength[i],
                    )?;
                    LayerConfig::new(spheres, thickness[i], bottom_albedo[i]).run()
                })
                .inspect(|_| {
                    num_completed.fetch_add(1, Ordering::Relaxed);
                })
                .collect_into_vec(&mut results);
        });

        // The work is done in the thread pool, but back here in the main
        // thread, handle progress reporting and checking for early
        // cancellation
        let mut last_report = Instant::now();
        while !cancelled.load(Ordering::Relaxed) {
            if let Err(e) = py.check_signals() {
                cancelled.store(true, Ordering::Relaxed);
                return Err(e);
            }

            // All finished without cancelling early
            let num_completed = num_completed.load(Ordering::Relaxed);
            if num_completed == num_layers {
                break;
            }

            if last_report.elapsed() >= Duration::from_secs(5) {
                let progress = num_completed as f32 / num_layers as f32 * 100.;
                info!("Completed RTM for {num_completed}/{num_layers} layers ({progress:0.2}%)");
                last_report = Instant::now();
            }

            py.allow_threads(|| {
                std::thread::sleep(Duration::from_millis(50));
            });
        }

        Ok(())
    })?;

    debug!("copying RTM output");
    let outputs = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    Ok(LayerResults::new(&outputs))
}

/// A Python module implemented in Rust.
#[pymodule]
fn snow_rtm(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_function(wrap_pyfunction!(compute_layers, m)?)?;
    m.add_function(wrap_pyfunction!(low_absorption_spheres, m)?)?;
    m.add_class::<PyOpticalProperties>()?;
    m.add_class::<PyBlackBaseTwoStream>()?;
    m.add_class::<PyGreyLayerSolver>()?;
    m.add_class::<LayerResults>()?;
    Ok(())
}
