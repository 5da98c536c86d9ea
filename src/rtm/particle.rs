//! Particle models that map microphysics to inherent optical properties.

use num_complex::Complex64;

use super::core::{non_negative, positive};
use super::iops::OpticalProperties;
use crate::error::RtmError;

/// A closed-form approximation producing [`OpticalProperties`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum ParticleModel {
    /// Weakly absorbing spheres in the geometric-optics regime.
    LowAbsorptionSpheres(LowAbsorptionSpheres),
    /// IOPs computed elsewhere, e.g. by a Mie code.
    Prescribed(OpticalProperties),
}

impl ParticleModel {
    /// Optical properties for this model.
    pub fn optical_properties(&self) -> Result<OpticalProperties, RtmError> {
        match self {
            ParticleModel::LowAbsorptionSpheres(spheres) => spheres.optical_properties(),
            ParticleModel::Prescribed(iops) => Ok(*iops),
        }
    }
}

impl From<LowAbsorptionSpheres> for ParticleModel {
    fn from(spheres: LowAbsorptionSpheres) -> Self {
        ParticleModel::LowAbsorptionSpheres(spheres)
    }
}

impl From<OpticalProperties> for ParticleModel {
    fn from(iops: OpticalProperties) -> Self {
        ParticleModel::Prescribed(iops)
    }
}

/// Densely packed, weakly absorbing spherical grains.
///
/// Valid when the imaginary part of the refractive index is small, so that
/// absorption inside a grain is proportional to its volume and scattering is
/// set by the geometric cross section.
///
/// # References
///
/// C. F. Bohren and E. E. Clothiaux, "Fundamentals of Atmospheric Radiation",
/// Wiley, 2006.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowAbsorptionSpheres {
    /// Volume fraction occupied by grains, in (0, 1].
    volume_fraction: f64,
    /// Grain radius, in the same length unit as `wavelength`.
    grain_radius: f64,
    /// Complex refractive index of the grain material.
    refractive_index: Complex64,
    /// Vacuum wavelength.
    wavelength: f64,
}

impl LowAbsorptionSpheres {
    /// Asymmetry factor used for all grains, independent of size.
    pub const ASYMMETRY_FACTOR: f64 = 0.89;

    /// Validate the microphysical parameters.
    pub fn new(
        volume_fraction: f64,
        grain_radius: f64,
        refractive_index: Complex64,
        wavelength: f64,
    ) -> Result<Self, RtmError> {
        let volume_fraction = positive("volume_fraction", volume_fraction)?;
        if volume_fraction > 1.0 {
            return Err(RtmError::invalid("volume_fraction", volume_fraction));
        }
        non_negative("refractive_index.im", refractive_index.im)?;

        Ok(Self {
            volume_fraction,
            grain_radius: positive("grain_radius", grain_radius)?,
            refractive_index,
            wavelength: positive("wavelength", wavelength)?,
        })
    }

    /// Bulk absorption coefficient of the grain material, `4 pi n_i / lambda`.
    pub fn material_absorption_coefficient(&self) -> f64 {
        4.0 * std::f64::consts::PI * self.refractive_index.im / self.wavelength
    }

    /// Layer IOPs: absorption scales with the volume fraction, scattering
    /// with the specific surface area `3 f / (2 r)`.
    pub fn optical_properties(&self) -> Result<OpticalProperties, RtmError> {
        let absorption = self.volume_fraction * self.material_absorption_coefficient();
        let scattering = 1.5 * self.volume_fraction / self.grain_radius;
        OpticalProperties::new(absorption, scattering, Self::ASYMMETRY_FACTOR)
    }
}
