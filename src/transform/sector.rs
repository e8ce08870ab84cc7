//! Sector geometry and the two point mappings built on it.
//!
//! Axis convention: with `c_r = p[radius_axis]` and `c_t = p[angle_axis]`,
//! the polar angle is `atan2(c_t, c_r)`. θ = 0 points down the radius axis
//! (depth) and positive θ swings toward the positive angle axis. In polar
//! form the radius axis carries the physical radius measured from the centre
//! of rotation and the angle axis carries the fractional scan-line index.

use crate::angle::AngleTable;
use crate::error::{Result, ScanConvertError};
use log::{debug, warn};
use nalgebra::Point;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Everything needed to configure a [`SectorTransform`] in one call.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SectorParams {
    /// Axis carrying the radial component.
    pub radius_axis: usize,
    /// Axis carrying the angular component.
    pub angle_axis: usize,
    /// Distance from the centre of rotation to the first radial sample.
    pub r_min: f64,
    /// `r_min + size[radius_axis] * spacing[radius_axis]`.
    pub r_max: f64,
    /// Spacing the source grid assumed along the angle axis (radians/index).
    pub assumed_spacing: f64,
    /// Angle of every scan line, ascending, in radians.
    pub angles: Vec<f64>,
}

/// Offsets that place the Cartesian bounding box around the sector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CornerOffsets {
    /// `r_min * cos(max_abs_theta)`: radial-axis origin of the bounding box.
    pub near_radial: f64,
    /// `r_max * sin(max_abs_theta)`: half-width of the box along the angle axis.
    pub far_angular: f64,
}

/// Validated sector geometry mapping points between Cartesian and (R, θ).
///
/// A transform created with [`new`](Self::new) has its axes but no radius
/// bounds or angle table; it only becomes usable once both are supplied
/// (see [`is_valid`](Self::is_valid)). Until then the mappings produce NaN.
/// Every setter validates before applying anything and drops the cached
/// corner offsets, which are recomputed on the next access.
#[derive(Clone, Debug)]
pub struct SectorTransform<const D: usize> {
    radius_axis: usize,
    angle_axis: usize,
    r_min: f64,
    r_max: f64,
    table: AngleTable,
    corners: OnceLock<CornerOffsets>,
}

impl<const D: usize> SectorTransform<D> {
    /// Axes only; radius bounds and angle table still unset.
    pub fn new(radius_axis: usize, angle_axis: usize) -> Result<Self> {
        validate_axes::<D>(radius_axis, angle_axis)?;
        Ok(Self {
            radius_axis,
            angle_axis,
            r_min: f64::NAN,
            r_max: f64::NAN,
            table: AngleTable::default(),
            corners: OnceLock::new(),
        })
    }

    /// Validate and store the complete geometry, or fail without side effects.
    pub fn configure(params: &SectorParams) -> Result<Self> {
        validate_axes::<D>(params.radius_axis, params.angle_axis)?;
        validate_radius_bounds(params.r_min, params.r_max)?;
        let table = AngleTable::new(params.assumed_spacing, &params.angles)?;
        let transform = Self {
            radius_axis: params.radius_axis,
            angle_axis: params.angle_axis,
            r_min: params.r_min,
            r_max: params.r_max,
            table,
            corners: OnceLock::new(),
        };
        debug!(
            "SectorTransform::configure dims={} r_axis={} theta_axis={} r=[{:.4}, {:.4}] lines={} theta=[{:.4}, {:.4}]",
            D,
            transform.radius_axis,
            transform.angle_axis,
            transform.r_min,
            transform.r_max,
            transform.table.len(),
            transform.table.theta_min(),
            transform.table.theta_max()
        );
        warn_if_asymmetric(&transform.table);
        Ok(transform)
    }

    pub fn set_axes(&mut self, radius_axis: usize, angle_axis: usize) -> Result<()> {
        validate_axes::<D>(radius_axis, angle_axis)?;
        self.radius_axis = radius_axis;
        self.angle_axis = angle_axis;
        Ok(())
    }

    pub fn set_radius_bounds(&mut self, r_min: f64, r_max: f64) -> Result<()> {
        validate_radius_bounds(r_min, r_max)?;
        self.r_min = r_min;
        self.r_max = r_max;
        self.corners = OnceLock::new();
        Ok(())
    }

    /// Must precede [`set_angles`](Self::set_angles).
    pub fn set_assumed_spacing(&mut self, spacing: f64) -> Result<()> {
        self.table.set_assumed_spacing(spacing)
    }

    pub fn set_angles(&mut self, angles: &[f64]) -> Result<()> {
        self.table.set_angles(angles)?;
        self.corners = OnceLock::new();
        warn_if_asymmetric(&self.table);
        Ok(())
    }

    /// Radius bounds and angle table are both in place.
    pub fn is_valid(&self) -> bool {
        self.r_min.is_finite() && self.r_max.is_finite() && self.table.is_ready()
    }

    #[inline]
    pub fn radius_axis(&self) -> usize {
        self.radius_axis
    }

    #[inline]
    pub fn angle_axis(&self) -> usize {
        self.angle_axis
    }

    #[inline]
    pub fn r_min(&self) -> f64 {
        self.r_min
    }

    #[inline]
    pub fn r_max(&self) -> f64 {
        self.r_max
    }

    #[inline]
    pub fn angle_table(&self) -> &AngleTable {
        &self.table
    }

    /// Number of scan lines in the table.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.table.len()
    }

    /// Cached `(near_radial, far_angular)` offsets of the sector corners.
    pub fn corner_offsets(&self) -> CornerOffsets {
        *self.corners.get_or_init(|| {
            let max_abs_theta = self.table.max_abs_theta();
            CornerOffsets {
                near_radial: self.r_min * max_abs_theta.cos(),
                far_angular: self.r_max * max_abs_theta.sin(),
            }
        })
    }

    /// Cartesian point → (physical radius, fractional line index).
    ///
    /// Points off the sector are still mapped: the radius may fall outside
    /// `[r_min, r_max]` and the line index outside `[0, N - 1]`.
    pub fn cartesian_to_polar(&self, point: &Point<f64, D>) -> Point<f64, D> {
        let c_r = point[self.radius_axis];
        let c_t = point[self.angle_axis];
        let r = c_r.hypot(c_t);
        let theta = c_t.atan2(c_r);
        let mut out = *point;
        out[self.radius_axis] = r;
        out[self.angle_axis] = self.table.continuous_index(theta);
        out
    }

    /// (physical radius, fractional line index) → Cartesian point.
    pub fn polar_to_cartesian(&self, point: &Point<f64, D>) -> Point<f64, D> {
        let r = point[self.radius_axis];
        let theta = self.table.angle_at(point[self.angle_axis]);
        let (sin, cos) = theta.sin_cos();
        let mut out = *point;
        out[self.radius_axis] = r * cos;
        out[self.angle_axis] = r * sin;
        out
    }

    /// Whether a polar position lies on the acquired sector.
    #[inline]
    pub fn contains_polar(&self, polar: &Point<f64, D>) -> bool {
        let r = polar[self.radius_axis];
        let index = polar[self.angle_axis];
        let last = self.table.len().saturating_sub(1) as f64;
        (self.r_min..=self.r_max).contains(&r) && (0.0..=last).contains(&index)
    }
}

fn validate_axes<const D: usize>(radius_axis: usize, angle_axis: usize) -> Result<()> {
    if radius_axis >= D || angle_axis >= D {
        return Err(ScanConvertError::InvalidGeometry(format!(
            "axes ({radius_axis}, {angle_axis}) out of range for {D} dimensions"
        )));
    }
    if radius_axis == angle_axis {
        return Err(ScanConvertError::InvalidGeometry(format!(
            "radius and angle share axis {radius_axis}"
        )));
    }
    Ok(())
}

fn validate_radius_bounds(r_min: f64, r_max: f64) -> Result<()> {
    if !r_min.is_finite() || !r_max.is_finite() || r_min < 0.0 || r_min >= r_max {
        return Err(ScanConvertError::InvalidGeometry(format!(
            "radius bounds must satisfy 0 <= r_min < r_max, got [{r_min}, {r_max}]"
        )));
    }
    Ok(())
}

fn warn_if_asymmetric(table: &AngleTable) {
    let lo = table.theta_min().abs();
    let hi = table.theta_max().abs();
    if (lo - hi).abs() > 0.1 * lo.max(hi) {
        warn!(
            "angle table is asymmetric (|first|={:.4}, |last|={:.4}); the Cartesian box follows the wider side",
            lo, hi
        );
    }
}
