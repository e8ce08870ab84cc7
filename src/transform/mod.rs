//! Point mappings between Cartesian space and (R, θ) acquisition space.
//!
//! [`SectorTransform`] holds the validated sector geometry and both mapping
//! directions. [`CartesianToPolar`] and [`PolarToCartesian`] wrap it as
//! single-direction [`PointTransform`]s: the former is what resampling needs
//! (output Cartesian point → source (R, θ) position), the latter places source
//! samples in Cartesian space. Each can hand out the other as its inverse.
//!
//! The mapping operates on two designated axes of a `D`-dimensional point;
//! every other axis passes through unchanged.

mod direction;
mod sector;

pub use direction::{CartesianToPolar, PolarToCartesian};
pub use sector::{CornerOffsets, SectorParams, SectorTransform};

use crate::error::{Result, ScanConvertError};
use nalgebra::{Point, SMatrix, SVector};

/// Capability surface of a `D`-dimensional point mapping.
///
/// Only points can be mapped. The mapping is not linear, so free and
/// covariant vectors have no meaning without a Jacobian, and no Jacobian is
/// provided; those entry points report an error instead of returning a
/// placeholder.
pub trait PointTransform<const D: usize> {
    fn transform_point(&self, point: &Point<f64, D>) -> Point<f64, D>;

    fn transform_vector(&self, _vector: &SVector<f64, D>) -> Result<SVector<f64, D>> {
        Err(ScanConvertError::UnsupportedOperation("transform_vector"))
    }

    fn transform_covariant_vector(&self, _vector: &SVector<f64, D>) -> Result<SVector<f64, D>> {
        Err(ScanConvertError::UnsupportedOperation(
            "transform_covariant_vector",
        ))
    }

    fn jacobian(&self, _point: &Point<f64, D>) -> Result<SMatrix<f64, D, D>> {
        Err(ScanConvertError::NotImplemented("jacobian"))
    }

    /// `T(aP + bQ) == aT(P) + bT(Q)` for all points. Never true here.
    fn is_linear(&self) -> bool {
        false
    }
}
