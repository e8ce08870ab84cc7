#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod acquisition;
pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod resample;
pub mod transform;

// Building blocks, public for tools and tests.
pub mod angle;
pub mod config;
pub mod interpolate;

// --- High-level re-exports -------------------------------------------------

pub use crate::acquisition::{AcquisitionGeometry, MetaValue, MetadataDictionary};
pub use crate::angle::{AngleTable, Bracket};
pub use crate::convert::{ConvertOptions, ScanConverter};
pub use crate::diagnostics::ConversionReport;
pub use crate::error::{Result, ScanConvertError};
pub use crate::image::{ImageGeometry, Volume};
pub use crate::interpolate::{Interpolation, Interpolator, Linear, NearestNeighbor};
pub use crate::resample::{plan_sector_grid, ScanConversionResampler, SectorGrid};
pub use crate::transform::{
    CartesianToPolar, CornerOffsets, PointTransform, PolarToCartesian, SectorParams,
    SectorTransform,
};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use scan_convert::prelude::*;
///
/// # fn main() -> scan_convert::Result<()> {
/// let angles: Vec<f64> = (0..128).map(|i| -0.6 + 1.2 * i as f64 / 127.0).collect();
/// let source = Volume::filled(ImageGeometry::new([0.0, 0.0], [0.01, 0.1], [128, 400]), 0.5);
/// let transform = CartesianToPolar::configure(&SectorParams {
///     radius_axis: 1,
///     angle_axis: 0,
///     r_min: 5.0,
///     r_max: 5.0 + 400.0 * 0.1,
///     assumed_spacing: 0.01,
///     angles,
/// })?;
///
/// let (image, report) = ScanConverter::new(transform, ConvertOptions::default()).convert(&source)?;
/// println!("{:?} coverage={:.3}", image.size(), report.coverage());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ImageGeometry, Volume};
    pub use crate::interpolate::Interpolation;
    pub use crate::transform::{CartesianToPolar, PointTransform, PolarToCartesian, SectorParams};
    pub use crate::{ConvertOptions, ScanConverter};
}
