use super::{CornerOffsets, PointTransform, SectorParams, SectorTransform};
use crate::error::{Result, ScanConvertError};
use nalgebra::Point;

/// Output Cartesian point → source (R, θ) position. Drives resampling.
#[derive(Clone, Debug)]
pub struct CartesianToPolar<const D: usize> {
    sector: SectorTransform<D>,
}

/// Source (R, θ) position → Cartesian point. Places acquired samples.
#[derive(Clone, Debug)]
pub struct PolarToCartesian<const D: usize> {
    sector: SectorTransform<D>,
}

fn require_valid<const D: usize>(sector: &SectorTransform<D>) -> Result<()> {
    if sector.is_valid() {
        Ok(())
    } else {
        Err(ScanConvertError::PrecedenceViolation(
            "radius bounds and angle table must be supplied before mapping points".into(),
        ))
    }
}

impl<const D: usize> CartesianToPolar<D> {
    pub fn configure(params: &SectorParams) -> Result<Self> {
        Ok(Self {
            sector: SectorTransform::configure(params)?,
        })
    }

    /// Wrap a fully configured sector.
    pub fn from_sector(sector: SectorTransform<D>) -> Result<Self> {
        require_valid(&sector)?;
        Ok(Self { sector })
    }

    #[inline]
    pub fn sector(&self) -> &SectorTransform<D> {
        &self.sector
    }

    pub fn set_radius_bounds(&mut self, r_min: f64, r_max: f64) -> Result<()> {
        self.sector.set_radius_bounds(r_min, r_max)
    }

    pub fn set_angles(&mut self, assumed_spacing: f64, angles: &[f64]) -> Result<()> {
        // Stage on a copy so a rejected table leaves the spacing untouched too.
        let mut staged = self.sector.clone();
        staged.set_assumed_spacing(assumed_spacing)?;
        staged.set_angles(angles)?;
        self.sector = staged;
        Ok(())
    }

    #[inline]
    pub fn corner_offsets(&self) -> CornerOffsets {
        self.sector.corner_offsets()
    }

    pub fn inverse(&self) -> PolarToCartesian<D> {
        PolarToCartesian {
            sector: self.sector.clone(),
        }
    }
}

impl<const D: usize> PointTransform<D> for CartesianToPolar<D> {
    #[inline]
    fn transform_point(&self, point: &Point<f64, D>) -> Point<f64, D> {
        self.sector.cartesian_to_polar(point)
    }
}

impl<const D: usize> PolarToCartesian<D> {
    pub fn configure(params: &SectorParams) -> Result<Self> {
        Ok(Self {
            sector: SectorTransform::configure(params)?,
        })
    }

    pub fn from_sector(sector: SectorTransform<D>) -> Result<Self> {
        require_valid(&sector)?;
        Ok(Self { sector })
    }

    #[inline]
    pub fn sector(&self) -> &SectorTransform<D> {
        &self.sector
    }

    #[inline]
    pub fn corner_offsets(&self) -> CornerOffsets {
        self.sector.corner_offsets()
    }

    pub fn inverse(&self) -> CartesianToPolar<D> {
        CartesianToPolar {
            sector: self.sector.clone(),
        }
    }
}

impl<const D: usize> PointTransform<D> for PolarToCartesian<D> {
    #[inline]
    fn transform_point(&self, point: &Point<f64, D>) -> Point<f64, D> {
        self.sector.polar_to_cartesian(point)
    }
}
