//! Table of scan-line angles for a curvilinear acquisition.
//!
//! Each line of an (R, θ) acquisition is fired at its own angle. The angles
//! ascend but are rarely uniform: probes typically space lines evenly on the
//! transducer face, which bunches the angles toward the sector edges. The
//! source image, however, was stored on a regular grid, so an *assumed*
//! spacing had to be attached to the angular axis. [`AngleTable`] keeps both
//! and answers the one question the transforms need: which two lines bracket
//! a query angle, and where between them it falls.
//!
//! Lookup
//! - A seed index comes from the assumed spacing corrected by
//!   `spacing_over_delta` (assumed spacing / real angular step near the
//!   centre of the table), i.e. a uniform-grid estimate.
//! - The seed is refined by a short local walk. Near the sector edges the
//!   estimate can be off by a few lines, which the walk absorbs. If the
//!   bracket still does not hold after [`MAX_LOCAL_STEPS`], a binary search
//!   over the table settles it.
//! - Queries outside the table clamp to the first or last interval.

use crate::error::{Result, ScanConvertError};
use std::f64::consts::FRAC_PI_2;

/// Upper bound on the local refinement walk before falling back to bisection.
pub const MAX_LOCAL_STEPS: usize = 8;

/// Two adjacent table entries surrounding a query angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bracket {
    pub lo: usize,
    pub hi: usize,
    /// Linear weight of `hi`, in `[0, 1]`.
    pub fraction: f64,
}

impl Bracket {
    /// Continuous index `lo + fraction`.
    #[inline]
    pub fn index(&self) -> f64 {
        self.lo as f64 + self.fraction
    }
}

/// Ascending, possibly non-uniform, per-line angles in radians.
///
/// The derived invariants (`max_abs_theta`, `theta_min`,
/// `spacing_over_delta`) are recomputed together with every accepted table or
/// spacing change; a rejected update leaves the previous state untouched.
#[derive(Clone, Debug, Default)]
pub struct AngleTable {
    angles: Vec<f64>,
    assumed_spacing: Option<f64>,
    max_abs_theta: f64,
    theta_min: f64,
    spacing_over_delta: f64,
}

impl AngleTable {
    /// Build a table in one step: assumed spacing first, then the angles.
    pub fn new(assumed_spacing: f64, angles: &[f64]) -> Result<Self> {
        let mut table = Self::default();
        table.set_assumed_spacing(assumed_spacing)?;
        table.set_angles(angles)?;
        Ok(table)
    }

    /// Nominal spacing (radians per index) the source grid was stored with.
    ///
    /// Must be supplied before [`set_angles`](Self::set_angles). Changing it
    /// on a populated table recomputes `spacing_over_delta`.
    pub fn set_assumed_spacing(&mut self, spacing: f64) -> Result<()> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(ScanConvertError::InvalidGeometry(format!(
                "assumed angular spacing must be positive and finite, got {spacing}"
            )));
        }
        if self.angles.len() >= 2 {
            self.spacing_over_delta = spacing / center_delta(&self.angles);
        }
        self.assumed_spacing = Some(spacing);
        Ok(())
    }

    /// Replace the table.
    pub fn set_angles(&mut self, angles: &[f64]) -> Result<()> {
        let spacing = self.assumed_spacing.ok_or_else(|| {
            ScanConvertError::PrecedenceViolation(
                "the assumed angular spacing must be set before the angle table".into(),
            )
        })?;
        validate_angles(angles)?;

        let first = angles[0];
        let last = angles[angles.len() - 1];
        self.max_abs_theta = first.abs().max(last.abs());
        self.theta_min = first;
        self.spacing_over_delta = spacing / center_delta(angles);
        self.angles = angles.to_vec();
        Ok(())
    }

    /// True once both the assumed spacing and a valid table are present.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.assumed_spacing.is_some() && self.angles.len() >= 2
    }

    #[inline]
    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.angles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    #[inline]
    pub fn assumed_spacing(&self) -> Option<f64> {
        self.assumed_spacing
    }

    /// `max(|angles[0]|, |angles[N-1]|)`.
    #[inline]
    pub fn max_abs_theta(&self) -> f64 {
        self.max_abs_theta
    }

    /// Angle of the first line.
    #[inline]
    pub fn theta_min(&self) -> f64 {
        self.theta_min
    }

    /// Angle of the last line.
    #[inline]
    pub fn theta_max(&self) -> f64 {
        self.angles.last().copied().unwrap_or(self.theta_min)
    }

    #[inline]
    pub fn spacing_over_delta(&self) -> f64 {
        self.spacing_over_delta
    }

    /// Find the two lines surrounding `theta`.
    ///
    /// Angles outside the table clamp to the first or last interval with
    /// `fraction` pinned to 0 or 1. Returns `None` while the table is unset.
    pub fn locate(&self, theta: f64) -> Option<Bracket> {
        if !self.is_ready() {
            return None;
        }
        let lo = self.bracket_lo(theta);
        let fraction = self.interval_fraction(lo, theta);
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        Some(Bracket {
            lo,
            hi: lo + 1,
            fraction,
        })
    }

    /// Fractional line index of `theta`.
    ///
    /// Inside the table this is `locate(theta).index()`. Outside it the end
    /// intervals are extrapolated linearly, so angles beyond the sector map
    /// to indices below 0 or above `N - 1`. NaN while the table is unset.
    pub fn continuous_index(&self, theta: f64) -> f64 {
        if !self.is_ready() {
            return f64::NAN;
        }
        let lo = self.bracket_lo(theta);
        lo as f64 + self.interval_fraction(lo, theta)
    }

    /// Angle at a fractional line index, interpolating between neighbours.
    ///
    /// Inverse of [`continuous_index`](Self::continuous_index), including the
    /// linear extrapolation beyond either end.
    pub fn angle_at(&self, index: f64) -> f64 {
        if !self.is_ready() || !index.is_finite() {
            return f64::NAN;
        }
        let last = self.angles.len() - 2;
        let lo = (index.floor().max(0.0) as usize).min(last);
        let fraction = index - lo as f64;
        let a0 = self.angles[lo];
        let a1 = self.angles[lo + 1];
        a0 + fraction * (a1 - a0)
    }

    #[inline]
    fn interval_fraction(&self, lo: usize, theta: f64) -> f64 {
        let a0 = self.angles[lo];
        let a1 = self.angles[lo + 1];
        (theta - a0) / (a1 - a0)
    }

    /// Lower index of the interval containing `theta`; requires `N >= 2`.
    fn bracket_lo(&self, theta: f64) -> usize {
        let a = &self.angles;
        let last = a.len() - 2;
        // Also catches NaN.
        if !(theta > a[0]) {
            return 0;
        }
        if theta >= a[a.len() - 1] {
            return last;
        }

        let step = self.assumed_spacing.unwrap_or(1.0) / self.spacing_over_delta;
        let seed = ((theta - self.theta_min) / step).floor();
        let mut lo = if seed.is_finite() {
            (seed.max(0.0) as usize).min(last)
        } else {
            0
        };

        // a[0] < theta < a[N-1] keeps both moves in range.
        for _ in 0..MAX_LOCAL_STEPS {
            if theta < a[lo] {
                lo -= 1;
            } else if theta > a[lo + 1] {
                lo += 1;
            } else {
                return lo;
            }
        }
        if a[lo] <= theta && theta <= a[lo + 1] {
            return lo;
        }
        let upper = a.partition_point(|&v| v <= theta);
        upper.saturating_sub(1).min(last)
    }
}

fn validate_angles(angles: &[f64]) -> Result<()> {
    if angles.len() < 2 {
        return Err(ScanConvertError::InvalidGeometry(format!(
            "angle table needs at least 2 entries, got {}",
            angles.len()
        )));
    }
    for (i, &theta) in angles.iter().enumerate() {
        if !theta.is_finite() || !(-FRAC_PI_2..=FRAC_PI_2).contains(&theta) {
            return Err(ScanConvertError::InvalidGeometry(format!(
                "angle[{i}] = {theta} lies outside [-pi/2, pi/2]"
            )));
        }
    }
    if let Some(i) = angles.windows(2).position(|w| w[1] <= w[0]) {
        return Err(ScanConvertError::InvalidGeometry(format!(
            "angles must be strictly ascending: angle[{}] = {} is not below angle[{}] = {}",
            i,
            angles[i],
            i + 1,
            angles[i + 1]
        )));
    }
    Ok(())
}

/// Angular step between the two entries straddling the table centre.
fn center_delta(angles: &[f64]) -> f64 {
    let c = ((angles.len() - 1) / 2).min(angles.len() - 2);
    angles[c + 1] - angles[c]
}
