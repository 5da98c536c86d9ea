//! Two-stream solution for a scattering layer over a black base.

use log::debug;

use super::core::non_negative;
use super::iops::OpticalProperties;
use crate::error::RtmError;

/// Two-stream reflectivity and transmissivity of a homogeneous layer resting
/// on a perfectly absorbing base, under the similarity approximation.
///
/// Only the scaled optical depth `tau_s = (1 - g) tau` of the layer matters,
/// and the layer neither creates nor loses energy in this approximation:
/// reflectivity and transmissivity always sum to one.
///
/// # References
///
/// C. F. Bohren and E. E. Clothiaux, "Fundamentals of Atmospheric Radiation",
/// Wiley, 2006.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackBaseTwoStream {
    iops: OpticalProperties,
    thickness: f64,
}

impl BlackBaseTwoStream {
    /// Set up a layer of geometrical `thickness` (same length unit as the
    /// IOPs).
    pub fn new(iops: OpticalProperties, thickness: f64) -> Result<Self, RtmError> {
        let thickness = non_negative("thickness", thickness)?;
        debug!(
            "two-stream layer: thickness {thickness}, scaled optical depth {}",
            iops.scaled_optical_depth(thickness)
        );
        Ok(Self { iops, thickness })
    }

    /// Scaled optical depth of the layer.
    pub fn scaled_optical_depth(&self) -> f64 {
        self.iops.scaled_optical_depth(self.thickness)
    }

    /// Reflectivity, `tau_s / (2 + tau_s)`.
    pub fn reflectivity(&self) -> f64 {
        let tau_s = self.scaled_optical_depth();
        if tau_s.is_infinite() {
            return 1.0;
        }
        tau_s / (2.0 + tau_s)
    }

    /// Transmissivity, `2 / (2 + tau_s)`.
    pub fn transmissivity(&self) -> f64 {
        let tau_s = self.scaled_optical_depth();
        2.0 / (2.0 + tau_s)
    }
}
