//! Whole-volume scan conversion driver.
//!
//! [`ScanConverter`] plans the Cartesian output grid around the sector and
//! fills it by invoking [`ScanConversionResampler::sample`] once per output
//! sample. Rows along axis 0 are independent; with the `parallel` feature
//! they are filled on the rayon pool, otherwise sequentially. Both paths
//! produce identical output.
//!
//! Typical usage:
//! ```no_run
//! use scan_convert::prelude::*;
//!
//! # fn example(source: Volume<2>, angles: Vec<f64>) -> scan_convert::Result<()> {
//! let transform = CartesianToPolar::configure(&SectorParams {
//!     radius_axis: 1,
//!     angle_axis: 0,
//!     r_min: 3.0,
//!     r_max: 3.0 + 512.0 * 0.05,
//!     assumed_spacing: 0.01,
//!     angles,
//! })?;
//! let converter = ScanConverter::new(transform, ConvertOptions::default());
//! let (image, report) = converter.convert(&source)?;
//! println!("coverage {:.1}%", 100.0 * report.coverage());
//! # Ok(())
//! # }
//! ```
use crate::diagnostics::{ConversionReport, TimingBreakdown};
use crate::error::Result;
use crate::image::{ImageGeometry, Volume};
use crate::interpolate::Interpolation;
use crate::resample::ScanConversionResampler;
use crate::transform::{CartesianToPolar, PointTransform};
use log::debug;
use nalgebra::Point;
use serde::Deserialize;
use std::time::Instant;

/// Output policy for a conversion run.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Value written outside the acquired sector.
    pub default_value: f32,
    /// Output spacing on both polar axes; twice the source angle-axis
    /// spacing if unset.
    pub output_spacing: Option<f64>,
    pub interpolation: Interpolation,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            default_value: 0.0,
            output_spacing: None,
            interpolation: Interpolation::Linear,
        }
    }
}

impl ConvertOptions {
    pub fn with_default_value(mut self, value: f32) -> Self {
        self.default_value = value;
        self
    }

    pub fn with_output_spacing(mut self, spacing: Option<f64>) -> Self {
        self.output_spacing = spacing;
        self
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }
}

pub struct ScanConverter<const D: usize> {
    transform: CartesianToPolar<D>,
    options: ConvertOptions,
}

impl<const D: usize> ScanConverter<D> {
    pub fn new(transform: CartesianToPolar<D>, options: ConvertOptions) -> Self {
        Self { transform, options }
    }

    #[inline]
    pub fn transform(&self) -> &CartesianToPolar<D> {
        &self.transform
    }

    #[inline]
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Scan-convert `source` onto a Cartesian grid bounding the sector.
    pub fn convert(&self, source: &Volume<D>) -> Result<(Volume<D>, ConversionReport)> {
        let total_start = Instant::now();
        let resampler =
            ScanConversionResampler::new(self.transform.clone(), source, self.options.interpolation)?
                .with_default_value(self.options.default_value);

        let plan_start = Instant::now();
        let geometry = resampler.plan_output_grid(self.options.output_spacing)?;
        let plan_ms = plan_start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "ScanConverter::convert source={:?} output={:?} interpolation={:?}",
            source.size(),
            geometry.size,
            self.options.interpolation
        );

        let fill_start = Instant::now();
        let mut output = Volume::new(geometry);
        let inside_samples = fill(&resampler, &geometry, output.data_mut());
        let fill_ms = fill_start.elapsed().as_secs_f64() * 1000.0;

        let sector = self.transform.sector();
        let mut timing = TimingBreakdown {
            total_ms: total_start.elapsed().as_secs_f64() * 1000.0,
            stages: Vec::new(),
        };
        timing.push("plan_output_grid", plan_ms);
        timing.push("resample", fill_ms);

        let report = ConversionReport {
            source_size: source.size().to_vec(),
            output_origin: geometry.origin.to_vec(),
            output_spacing: geometry.spacing.to_vec(),
            output_size: geometry.size.to_vec(),
            radius_axis: sector.radius_axis(),
            angle_axis: sector.angle_axis(),
            r_min: sector.r_min(),
            r_max: sector.r_max(),
            line_count: sector.line_count(),
            corners: self.transform.corner_offsets(),
            inside_samples,
            default_samples: geometry.len() - inside_samples,
            timing,
        };
        debug!(
            "ScanConverter::convert done inside={} default={} latency_ms={:.3}",
            report.inside_samples, report.default_samples, report.timing.total_ms
        );
        Ok((output, report))
    }

    /// Cartesian position of every source sample centre, in buffer order.
    pub fn forward_positions(&self, source: &ImageGeometry<D>) -> Vec<Point<f64, D>> {
        let inverse = self.transform.inverse();
        let sector = self.transform.sector();
        let (r_axis, t_axis) = (sector.radius_axis(), sector.angle_axis());
        (0..source.len())
            .map(|offset| {
                let index = source.index_from_linear(offset);
                let mut polar = source.index_to_physical(&index);
                polar[r_axis] = sector.r_min() + index[r_axis] as f64 * source.spacing[r_axis];
                polar[t_axis] = index[t_axis] as f64;
                inverse.transform_point(&polar)
            })
            .collect()
    }
}

/// Fill `data` row by row; returns the number of in-sector samples.
fn fill<const D: usize>(
    resampler: &ScanConversionResampler<'_, D>,
    geometry: &ImageGeometry<D>,
    data: &mut [f32],
) -> usize {
    let row_len = geometry.size[0];
    if row_len == 0 || data.is_empty() {
        return 0;
    }
    let default = resampler.default_value();
    let fill_row = |(row, values): (usize, &mut [f32])| -> usize {
        let mut index = geometry.index_from_linear(row * row_len);
        let mut inside = 0usize;
        for (x, value) in values.iter_mut().enumerate() {
            index[0] = x;
            let point = geometry.index_to_physical(&index);
            *value = match resampler.sample(&point) {
                Some(v) => {
                    inside += 1;
                    v
                }
                None => default,
            };
        }
        inside
    };

    fill_rows(data, row_len, fill_row)
}

#[cfg(feature = "parallel")]
fn fill_rows<F>(data: &mut [f32], row_len: usize, fill_row: F) -> usize
where
    F: Fn((usize, &mut [f32])) -> usize + Sync + Send,
{
    use rayon::prelude::*;
    data.par_chunks_mut(row_len).enumerate().map(fill_row).sum()
}

#[cfg(not(feature = "parallel"))]
fn fill_rows<F>(data: &mut [f32], row_len: usize, fill_row: F) -> usize
where
    F: Fn((usize, &mut [f32])) -> usize,
{
    data.chunks_mut(row_len).enumerate().map(fill_row).sum()
}
