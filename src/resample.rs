//! Inverse-mapped resampling from an (R, θ) source onto a Cartesian grid.
//!
//! Every output sample is pulled, never pushed: its physical position goes
//! through [`CartesianToPolar`], and the resulting (radius, line index) is
//! either interpolated from the source or, when it misses the acquired
//! sector, replaced by the default value. This is the only place where the
//! in/out-of-sector decision is made.
//!
//! Source grid conventions
//! - Radius axis: sample `i` lies at radius `r_min + i * spacing[radius_axis]`.
//! - Angle axis: sample `j` is scan line `j` of the angle table.
//! - Other axes: physical coordinates through the source geometry.

use crate::error::{Result, ScanConvertError};
use crate::image::{ImageGeometry, Volume};
use crate::interpolate::{Interpolation, Interpolator};
use crate::transform::{CartesianToPolar, PointTransform};
use log::debug;
use nalgebra::Point;
use serde::Serialize;

/// Cartesian grid bounding the sector along the radius and angle axes.
///
/// Both axes share one spacing so output pixels are square.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SectorGrid {
    pub radius_origin: f64,
    pub angle_origin: f64,
    pub spacing: f64,
    pub radius_size: usize,
    pub angle_size: usize,
}

/// Output geometry that exactly bounds the fan.
///
/// - spacing: the requested value, or twice the source spacing along the
///   angle axis; used on both polar axes.
/// - origin: `near_radial` along the radius axis, `-far_angular` along the
///   angle axis, which centres the sector.
/// - size: `ceil((r_max - near_radial) / spacing)` and
///   `ceil(|2 far_angular| / spacing)`.
pub fn plan_sector_grid<const D: usize>(
    transform: &CartesianToPolar<D>,
    source_angle_spacing: f64,
    requested_spacing: Option<f64>,
) -> Result<SectorGrid> {
    let spacing = requested_spacing.unwrap_or(2.0 * source_angle_spacing);
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(ScanConvertError::InvalidGeometry(format!(
            "output spacing must be positive and finite, got {spacing}"
        )));
    }

    let corners = transform.corner_offsets();
    let r_max = transform.sector().r_max();
    let grid = SectorGrid {
        radius_origin: corners.near_radial,
        angle_origin: -corners.far_angular,
        spacing,
        radius_size: ((r_max - corners.near_radial) / spacing).ceil() as usize,
        angle_size: (2.0 * corners.far_angular / spacing).abs().ceil() as usize,
    };
    debug!(
        "plan_sector_grid origin=({:.4}, {:.4}) spacing={:.4} size=({}, {})",
        grid.radius_origin, grid.angle_origin, grid.spacing, grid.radius_size, grid.angle_size
    );
    Ok(grid)
}

/// Fail unless `source` has one line per table entry and its radial extent
/// ends at `r_max`.
fn check_source<const D: usize>(
    transform: &CartesianToPolar<D>,
    source: &ImageGeometry<D>,
) -> Result<()> {
    let sector = transform.sector();
    let (r_axis, t_axis) = (sector.radius_axis(), sector.angle_axis());
    if source.size[t_axis] != sector.line_count() {
        return Err(ScanConvertError::InvalidGeometry(format!(
            "source has {} samples along axis {} but the angle table has {} lines",
            source.size[t_axis],
            t_axis,
            sector.line_count()
        )));
    }
    let expected = sector.r_min() + source.extent(r_axis);
    let tolerance = 1e-9 * sector.r_max().abs().max(1.0);
    if (sector.r_max() - expected).abs() > tolerance {
        return Err(ScanConvertError::InvalidGeometry(format!(
            "r_max {} does not match the source radial extent (r_min + {} x {} = {})",
            sector.r_max(),
            source.size[r_axis],
            source.spacing[r_axis],
            expected
        )));
    }
    Ok(())
}

/// Per-sample value policy for scan conversion.
///
/// Holds only read-only state, so one instance can serve any number of
/// threads; calls are idempotent.
pub struct ScanConversionResampler<'a, const D: usize, I = Interpolation> {
    transform: CartesianToPolar<D>,
    source: &'a Volume<D>,
    interpolator: I,
    default_value: f32,
}

impl<'a, const D: usize, I: Interpolator<D>> ScanConversionResampler<'a, D, I> {
    /// Fails with `InvalidGeometry` when `source` does not hold one sample per
    /// scan line along the angle axis or its radial extent disagrees with
    /// `r_max`.
    pub fn new(
        transform: CartesianToPolar<D>,
        source: &'a Volume<D>,
        interpolator: I,
    ) -> Result<Self> {
        check_source(&transform, source.geometry())?;
        Ok(Self {
            transform,
            source,
            interpolator,
            default_value: 0.0,
        })
    }

    /// Value returned for points outside the acquired sector.
    pub fn with_default_value(mut self, value: f32) -> Self {
        self.default_value = value;
        self
    }

    #[inline]
    pub fn default_value(&self) -> f32 {
        self.default_value
    }

    #[inline]
    pub fn transform(&self) -> &CartesianToPolar<D> {
        &self.transform
    }

    #[inline]
    pub fn source(&self) -> &Volume<D> {
        self.source
    }

    /// Output grid for this source: sector bounds on the two polar axes, the
    /// source geometry on every other axis.
    pub fn plan_output_grid(&self, requested_spacing: Option<f64>) -> Result<ImageGeometry<D>> {
        let sector = self.transform.sector();
        let (r_axis, t_axis) = (sector.radius_axis(), sector.angle_axis());
        let src = self.source.geometry();
        let grid = plan_sector_grid(&self.transform, src.spacing[t_axis], requested_spacing)?;

        let mut out = *src;
        out.origin[r_axis] = grid.radius_origin;
        out.origin[t_axis] = grid.angle_origin;
        out.spacing[r_axis] = grid.spacing;
        out.spacing[t_axis] = grid.spacing;
        out.size[r_axis] = grid.radius_size;
        out.size[t_axis] = grid.angle_size;
        Ok(out)
    }

    /// Interpolated source value at an output point, or `None` off-sector.
    pub fn sample(&self, point: &Point<f64, D>) -> Option<f32> {
        let sector = self.transform.sector();
        let polar = self.transform.transform_point(point);
        if !sector.contains_polar(&polar) {
            return None;
        }

        let geometry = self.source.geometry();
        let (r_axis, t_axis) = (sector.radius_axis(), sector.angle_axis());
        let mut index = [0f64; D];
        for (k, slot) in index.iter_mut().enumerate() {
            *slot = if k == r_axis {
                (polar[k] - sector.r_min()) / geometry.spacing[k]
            } else if k == t_axis {
                polar[k]
            } else {
                let c = (polar[k] - geometry.origin[k]) / geometry.spacing[k];
                // Passthrough axes keep nearest-sample coverage of the buffer.
                if !(c >= -0.5 && c < geometry.size[k] as f64 - 0.5) {
                    return None;
                }
                c
            };
        }
        Some(self.interpolator.interpolate(self.source, &index))
    }

    /// Value of one output sample: interpolated inside the sector, the
    /// default value everywhere else.
    #[inline]
    pub fn resample_sample(&self, point: &Point<f64, D>) -> f32 {
        self.sample(point).unwrap_or(self.default_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolate::{Linear, NearestNeighbor};
    use crate::transform::SectorParams;
    use std::f64::consts::FRAC_PI_4;

    fn quarter_pi_transform(lines: usize) -> CartesianToPolar<2> {
        let angles = (0..lines)
            .map(|i| -FRAC_PI_4 + 2.0 * FRAC_PI_4 * i as f64 / (lines - 1) as f64)
            .collect();
        CartesianToPolar::configure(&SectorParams {
            radius_axis: 0,
            angle_axis: 1,
            r_min: 10.0,
            r_max: 100.0,
            assumed_spacing: 0.5,
            angles,
        })
        .unwrap()
    }

    #[test]
    fn output_grid_sizes_match_hand_computation() {
        let t = quarter_pi_transform(64);
        let grid = plan_sector_grid(&t, 0.25, Some(0.5)).unwrap();
        // (100 - 10 cos(pi/4)) / 0.5 = 185.86
        assert_eq!(grid.radius_size, 186);
        // 2 * 100 sin(pi/4) / 0.5 = 282.84
        assert_eq!(grid.angle_size, 283);
        assert!((grid.radius_origin - 7.0710678).abs() < 1e-6);
        assert!((grid.angle_origin + 70.710678).abs() < 1e-5);
    }

    #[test]
    fn requested_spacing_sizes_both_axes() {
        let t = quarter_pi_transform(64);
        let grid = plan_sector_grid(&t, 0.5, Some(0.25)).unwrap();
        assert_eq!(grid.spacing, 0.25);
        // (100 - 7.0711) / 0.25 = 371.72
        assert_eq!(grid.radius_size, 372);
        // 141.42 / 0.25 = 565.69
        assert_eq!(grid.angle_size, 566);
    }

    #[test]
    fn spacing_defaults_to_twice_the_source_angle_spacing() {
        let t = quarter_pi_transform(64);
        let grid = plan_sector_grid(&t, 0.25, None).unwrap();
        assert_eq!(grid.spacing, 0.5);
        assert!(plan_sector_grid(&t, 0.0, None).is_err());
        assert!(plan_sector_grid(&t, 0.25, Some(-1.0)).is_err());
    }

    #[test]
    fn output_pixels_are_square() {
        let t = quarter_pi_transform(64);
        let source = Volume::new(ImageGeometry::new([0.0, 0.0], [0.5, 0.01], [180, 64]));
        let resampler = ScanConversionResampler::new(t, &source, Linear).unwrap();
        let out = resampler.plan_output_grid(None).unwrap();
        assert_eq!(out.spacing, [0.02, 0.02]);
        let out = resampler.plan_output_grid(Some(0.25)).unwrap();
        assert_eq!(out.spacing, [0.25, 0.25]);
        assert_eq!(out.size, [372, 566]);
    }

    #[test]
    fn mismatched_sources_are_rejected() {
        // Eight lines of data against a 64-line table.
        let narrow = Volume::new(ImageGeometry::new([0.0, 0.0], [0.5, 0.5], [180, 8]));
        let err = ScanConversionResampler::new(quarter_pi_transform(64), &narrow, Linear)
            .err()
            .unwrap();
        assert!(matches!(err, ScanConvertError::InvalidGeometry(_)));

        // 150 depth samples end at r = 85, not at r_max = 100.
        let short = Volume::new(ImageGeometry::new([0.0, 0.0], [0.5, 0.5], [150, 64]));
        assert!(matches!(
            ScanConversionResampler::new(quarter_pi_transform(64), &short, Linear),
            Err(ScanConvertError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn out_of_sector_points_get_the_default_value() {
        let t = quarter_pi_transform(64);
        let source = Volume::filled(ImageGeometry::new([0.0, 0.0], [0.5, 0.5], [180, 64]), 3.0);
        let resampler = ScanConversionResampler::new(t, &source, Linear)
            .unwrap()
            .with_default_value(-1.0);
        let out = resampler.plan_output_grid(Some(0.5)).unwrap();

        // Far corner of the bounding box: radius ~ 187 > r_max.
        let corner = out.index_to_physical(&[out.size[0] - 1, out.size[1] - 1]);
        assert_eq!(resampler.resample_sample(&corner), -1.0);
        // Near corner on the axis side: inside the box, closer than r_min.
        assert_eq!(resampler.resample_sample(&Point::from([8.0, 0.0])), -1.0);
        // Behind the centre of rotation.
        assert_eq!(resampler.resample_sample(&Point::from([-50.0, 0.0])), -1.0);
        // On the centre line, mid-depth.
        assert_eq!(resampler.resample_sample(&Point::from([50.0, 0.0])), 3.0);
    }

    #[test]
    fn nearest_reads_the_addressed_line() {
        let t = quarter_pi_transform(5);
        let geometry = ImageGeometry::new([0.0, 0.0], [1.0, 1.0], [90, 5]);
        let mut source = Volume::new(geometry);
        for j in 0..5 {
            for i in 0..90 {
                source.set(&[i, j], j as f32);
            }
        }
        let resampler = ScanConversionResampler::new(t, &source, NearestNeighbor).unwrap();
        // Line 3 sits at +pi/8.
        let theta = std::f64::consts::PI / 8.0;
        let p = Point::from([40.0 * theta.cos(), 40.0 * theta.sin()]);
        assert_eq!(resampler.resample_sample(&p), 3.0);
    }

    #[test]
    fn passthrough_axes_outside_the_source_are_off_sector() {
        let angles = vec![-0.5, 0.0, 0.5];
        let t = CartesianToPolar::<3>::configure(&SectorParams {
            radius_axis: 0,
            angle_axis: 1,
            r_min: 1.0,
            r_max: 11.0,
            assumed_spacing: 0.5,
            angles,
        })
        .unwrap();
        let source = Volume::filled(ImageGeometry::new([0.0; 3], [1.0; 3], [10, 3, 4]), 2.0);
        let resampler = ScanConversionResampler::new(t, &source, Interpolation::Linear).unwrap();
        assert_eq!(resampler.sample(&Point::from([5.0, 0.0, 3.0])), Some(2.0));
        assert_eq!(resampler.sample(&Point::from([5.0, 0.0, 3.6])), None);
        assert_eq!(resampler.sample(&Point::from([5.0, 0.0, -0.6])), None);
    }
}
