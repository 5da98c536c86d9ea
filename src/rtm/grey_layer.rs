//! Asymptotic solution for a weakly absorbing layer over a grey Lambertian
//! base ("grey on grey").
//!
//! The layer is first solved over a black base, where the diffuse reflectance
//! and transmittance reduce to ratios of hyperbolic sines of two diffusion
//! paths:
//!
//! - `x = gamma L`, the diffusion path through a layer of thickness `L`
//! - `y = 4 s`, the boundary term set by the similarity parameter `s`
//!
//! The grey base of albedo `A` is then added by summing the multiple
//! reflections between layer and base.
//!
//! # References
//!
//! A. A. Kokhanovsky, "Snow Optics", Springer, 2021, section 3.

use log::debug;

use super::core::{direction_cosine, escape_function, non_negative, sinh_ratio, within};
use super::iops::OpticalProperties;
use crate::error::RtmError;

/// Diffuse reflectance and transmittance of a finite layer over a Lambertian
/// base.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreyLayerSolver {
    iops: OpticalProperties,
    /// Geometrical thickness `L`.
    thickness: f64,
    /// Lambertian albedo `A` of the base.
    bottom_albedo: f64,
}

impl GreyLayerSolver {
    /// Set up a layer of geometrical `thickness` over a base of albedo
    /// `bottom_albedo`.
    ///
    /// The asymmetry factor must be below 1; a purely forward-scattering
    /// medium has no diffusion regime.
    pub fn new(
        iops: OpticalProperties,
        thickness: f64,
        bottom_albedo: f64,
    ) -> Result<Self, RtmError> {
        let thickness = non_negative("thickness", thickness)?;
        let bottom_albedo = within("bottom_albedo", bottom_albedo, 0.0, 1.0)?;
        if iops.asymmetry_factor() >= 1.0 {
            return Err(RtmError::invalid("asymmetry_factor", iops.asymmetry_factor()));
        }

        let solver = Self {
            iops,
            thickness,
            bottom_albedo,
        };
        debug!(
            "grey layer: thickness {thickness}, bottom albedo {bottom_albedo}, x = {}, y = {}",
            solver.x(),
            solver.y()
        );
        Ok(solver)
    }

    /// Probability of absorption per extinction event, `beta = 1 - omega_0`.
    pub fn absorption_probability(&self) -> f64 {
        1.0 - self.iops.single_scattering_albedo()
    }

    /// Similarity parameter, `s = sqrt(beta / (3 (1 - g)))`.
    pub fn similarity_parameter(&self) -> f64 {
        let g = self.iops.asymmetry_factor();
        f64::sqrt(self.absorption_probability() / (3.0 * (1.0 - g)))
    }

    /// Diffusion exponent, `k = sqrt(3 (1 - g) beta)`.
    pub fn diffusion_exponent(&self) -> f64 {
        let g = self.iops.asymmetry_factor();
        f64::sqrt(3.0 * (1.0 - g) * self.absorption_probability())
    }

    /// Diffusion attenuation coefficient, `gamma = k sigma_ext`, in
    /// 1/length.
    pub fn gamma(&self) -> f64 {
        self.diffusion_exponent() * self.iops.extinction_coefficient()
    }

    /// Diffusion path through the layer, `x = gamma L`.
    pub fn x(&self) -> f64 {
        if self.thickness == 0.0 {
            return 0.0;
        }
        self.gamma() * self.thickness
    }

    /// Boundary diffusion term, `y = 4 s`. Doesn't depend on thickness.
    pub fn y(&self) -> f64 {
        4.0 * self.similarity_parameter()
    }

    /// Escape function for the direction cosine `mu`.
    pub fn escape_function(&self, mu: f64) -> Result<f64, RtmError> {
        escape_function(mu)
    }

    /// Diffuse reflectance of the layer over a black base,
    /// `r = sinh(x) / sinh(x + y)`.
    ///
    /// Zero when both diffusion paths vanish (no absorption or no medium).
    pub fn black_base_reflectance(&self) -> f64 {
        let (x, y) = (self.x(), self.y());
        if x + y <= 0.0 {
            return 0.0;
        }
        if x.is_infinite() {
            return self.semi_infinite_reflectance();
        }
        sinh_ratio(x, x + y)
    }

    /// Diffuse transmittance of the layer over a black base,
    /// `t = sinh(y) / sinh(x + y)`.
    ///
    /// One when both diffusion paths vanish.
    pub fn black_base_transmittance(&self) -> f64 {
        let (x, y) = (self.x(), self.y());
        if x + y <= 0.0 {
            return 1.0;
        }
        if x.is_infinite() {
            return 0.0;
        }
        sinh_ratio(y, x + y)
    }

    /// Diffuse reflectance of a semi-infinite layer, `r_0 = exp(-y)`.
    ///
    /// This is the limit of [`Self::black_base_reflectance`] for an
    /// infinitely thick layer.
    pub fn semi_infinite_reflectance(&self) -> f64 {
        f64::exp(-self.y())
    }

    /// Diffuse reflectance over the grey base, `r + A t² / (1 - A r)`.
    pub fn diffuse_reflectance(&self) -> Result<f64, RtmError> {
        let r = self.black_base_reflectance();
        let t = self.black_base_transmittance();
        Ok(r + self.bottom_albedo * t.powi(2) / self.base_coupling(r)?)
    }

    /// Diffuse transmittance over the grey base, `t / (1 - A r)`.
    pub fn diffuse_transmittance(&self) -> Result<f64, RtmError> {
        let r = self.black_base_reflectance();
        let t = self.black_base_transmittance();
        Ok(t / self.base_coupling(r)?)
    }

    /// Transmission function for a source zenith cosine `xi` and observation
    /// cosine `eta`.
    ///
    /// Light crossing the layer directly plus light bounced between base and
    /// layer, `t + A r t / (1 - A r)`. Both terms are the angle-integrated
    /// black-base quantities, so the result does not yet depend on `xi` or
    /// `eta`; weighting by the escape function is left to the caller.
    pub fn transmission_function(&self, xi: f64, eta: f64) -> Result<f64, RtmError> {
        direction_cosine("xi", xi)?;
        direction_cosine("eta", eta)?;

        let a = self.bottom_albedo;
        let r = self.black_base_reflectance();
        let t = self.black_base_transmittance();
        Ok(t + a * r * t / self.base_coupling(r)?)
    }

    /// Reflection function for a source zenith cosine `xi` and observation
    /// cosine `eta`.
    ///
    /// There is no closed form for this at the current approximation order,
    /// so after validating the cosines this always returns `None`.
    pub fn reflection_function(&self, xi: f64, eta: f64) -> Result<Option<f64>, RtmError> {
        direction_cosine("xi", xi)?;
        direction_cosine("eta", eta)?;
        Ok(None)
    }

    /// Denominator `1 - A r` of the base/layer multiple-reflection series.
    pub(super) fn base_coupling(&self, r: f64) -> Result<f64, RtmError> {
        let coupling = 1.0 - self.bottom_albedo * r;
        if coupling <= 0.0 {
            return Err(RtmError::SingularConfiguration);
        }
        Ok(coupling)
    }
}
