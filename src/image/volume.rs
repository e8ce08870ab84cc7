//! Owned single-channel `f32` samples on an [`ImageGeometry`].
use super::geometry::ImageGeometry;
use crate::error::{Result, ScanConvertError};

#[derive(Clone, Debug)]
pub struct Volume<const D: usize> {
    geometry: ImageGeometry<D>,
    data: Vec<f32>,
}

impl<const D: usize> Volume<D> {
    /// Zero-initialised samples over `geometry`.
    pub fn new(geometry: ImageGeometry<D>) -> Self {
        Self::filled(geometry, 0.0)
    }

    pub fn filled(geometry: ImageGeometry<D>, value: f32) -> Self {
        Self {
            data: vec![value; geometry.len()],
            geometry,
        }
    }

    /// Wrap an existing buffer laid out with axis 0 fastest.
    pub fn from_data(geometry: ImageGeometry<D>, data: Vec<f32>) -> Result<Self> {
        if data.len() != geometry.len() {
            return Err(ScanConvertError::InvalidGeometry(format!(
                "buffer holds {} samples, grid {:?} needs {}",
                data.len(),
                geometry.size,
                geometry.len()
            )));
        }
        Ok(Self { geometry, data })
    }

    #[inline]
    pub fn geometry(&self) -> &ImageGeometry<D> {
        &self.geometry
    }

    #[inline]
    pub fn size(&self) -> [usize; D] {
        self.geometry.size
    }

    #[inline]
    pub fn get(&self, index: &[usize; D]) -> f32 {
        self.data[self.geometry.linear_offset(index)]
    }

    #[inline]
    pub fn set(&mut self, index: &[usize; D], value: f32) {
        let offset = self.geometry.linear_offset(index);
        self.data[offset] = value;
    }

    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Contiguous runs of samples along axis 0, in buffer order.
    pub fn rows(&self) -> std::slice::Chunks<'_, f32> {
        self.data.chunks(self.geometry.size[0].max(1))
    }
}
