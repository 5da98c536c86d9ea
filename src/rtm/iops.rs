//! Inherent optical properties of a particulate layer.

use super::core::{non_negative, within};
use crate::error::RtmError;

/// Inherent optical properties (IOPs) of a homogeneous medium.
///
/// Coefficients share whatever inverse length unit the caller uses; layer
/// thicknesses passed to the solvers must be in the matching length unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpticalProperties {
    /// Absorption coefficient, 1/length.
    absorption_coefficient: f64,
    /// Scattering coefficient, 1/length.
    scattering_coefficient: f64,
    /// Mean cosine of the scattering angle, in [-1, 1].
    asymmetry_factor: f64,
}

impl OpticalProperties {
    /// Validate and store the IOPs.
    ///
    /// Both coefficients must be finite and non-negative, and the asymmetry
    /// factor must lie in [-1, 1].
    pub fn new(
        absorption_coefficient: f64,
        scattering_coefficient: f64,
        asymmetry_factor: f64,
    ) -> Result<Self, RtmError> {
        Ok(Self {
            absorption_coefficient: non_negative("absorption_coefficient", absorption_coefficient)?,
            scattering_coefficient: non_negative("scattering_coefficient", scattering_coefficient)?,
            asymmetry_factor: within("asymmetry_factor", asymmetry_factor, -1.0, 1.0)?,
        })
    }

    /// Absorption coefficient, 1/length.
    pub fn absorption_coefficient(&self) -> f64 {
        self.absorption_coefficient
    }

    /// Scattering coefficient, 1/length.
    pub fn scattering_coefficient(&self) -> f64 {
        self.scattering_coefficient
    }

    /// Asymmetry factor g.
    pub fn asymmetry_factor(&self) -> f64 {
        self.asymmetry_factor
    }

    /// Fraction of extinguished light that is scattered.
    ///
    /// A medium that neither absorbs nor scatters is treated as having an
    /// albedo of 0, so that `1 - albedo` is always defined.
    pub fn single_scattering_albedo(&self) -> f64 {
        let extinction = self.extinction_coefficient();
        if self.scattering_coefficient <= 0.0 {
            0.0
        } else if extinction.is_finite() {
            self.scattering_coefficient / extinction
        } else {
            // The sum overflowed, so divide through by the scattering first
            1.0 / (1.0 + self.absorption_coefficient / self.scattering_coefficient)
        }
    }

    /// Extinction coefficient (absorption + scattering), 1/length.
    pub fn extinction_coefficient(&self) -> f64 {
        self.absorption_coefficient + self.scattering_coefficient
    }

    /// Optical depth of a layer with the given geometrical depth.
    ///
    /// `geometrical_depth` must be non-negative; the layer solvers check this
    /// when they are built. May be `inf` when the product overflows.
    pub fn optical_depth(&self, geometrical_depth: f64) -> f64 {
        debug_assert!(geometrical_depth >= 0.0, "negative depth {geometrical_depth}");
        if geometrical_depth == 0.0 {
            return 0.0;
        }
        self.extinction_coefficient() * geometrical_depth
    }

    /// Similarity-transformed optical depth, `(1 - g) * tau`.
    ///
    /// Same precondition as [`Self::optical_depth`].
    pub fn scaled_optical_depth(&self, geometrical_depth: f64) -> f64 {
        let weight = 1.0 - self.asymmetry_factor;
        if weight == 0.0 {
            return 0.0;
        }
        weight * self.optical_depth(geometrical_depth)
    }
}
