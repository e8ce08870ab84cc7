//! Physical layout of a `D`-dimensional sample grid.
//!
//! Sample `i` along axis `k` sits at `origin[k] + i * spacing[k]`. Grid axes
//! are aligned with physical axes (no direction cosines). Linear offsets run
//! with axis 0 fastest, so a 2-D grid is row-major with axis 0 as `x`.

use nalgebra::Point;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageGeometry<const D: usize> {
    #[serde(with = "serde_arrays")]
    pub origin: [f64; D],
    #[serde(with = "serde_arrays")]
    pub spacing: [f64; D],
    #[serde(with = "serde_arrays")]
    pub size: [usize; D],
}

impl<const D: usize> ImageGeometry<D> {
    pub fn new(origin: [f64; D], spacing: [f64; D], size: [usize; D]) -> Self {
        Self {
            origin,
            spacing,
            size,
        }
    }

    /// Unit spacing, zero origin.
    pub fn with_size(size: [usize; D]) -> Self {
        Self::new([0.0; D], [1.0; D], size)
    }

    /// Total number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.size.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Physical extent `size * spacing` along `axis`.
    #[inline]
    pub fn extent(&self, axis: usize) -> f64 {
        self.size[axis] as f64 * self.spacing[axis]
    }

    #[inline]
    pub fn index_to_physical(&self, index: &[usize; D]) -> Point<f64, D> {
        Point::from(std::array::from_fn(|k| {
            self.origin[k] + index[k] as f64 * self.spacing[k]
        }))
    }

    /// Continuous (fractional) grid index of a physical point.
    #[inline]
    pub fn physical_to_continuous_index(&self, point: &Point<f64, D>) -> [f64; D] {
        std::array::from_fn(|k| (point[k] - self.origin[k]) / self.spacing[k])
    }

    /// Offset of `index` in a buffer laid out with axis 0 fastest.
    #[inline]
    pub fn linear_offset(&self, index: &[usize; D]) -> usize {
        let mut offset = 0;
        let mut stride = 1;
        for k in 0..D {
            offset += index[k] * stride;
            stride *= self.size[k];
        }
        offset
    }

    /// Inverse of [`linear_offset`](Self::linear_offset).
    #[inline]
    pub fn index_from_linear(&self, mut offset: usize) -> [usize; D] {
        let mut index = [0usize; D];
        for k in 0..D {
            let n = self.size[k].max(1);
            index[k] = offset % n;
            offset /= n;
        }
        index
    }
}

/// Serde support for const-generic arrays, which serde only covers up to
/// fixed lengths; encodes them as plain JSON sequences.
mod serde_arrays {
    use serde::de::{self, Deserialize, Deserializer};
    use serde::ser::{Serialize, Serializer};

    pub fn serialize<S, T, const D: usize>(value: &[T; D], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        value.as_slice().serialize(serializer)
    }

    pub fn deserialize<'de, De, T, const D: usize>(deserializer: De) -> Result<[T; D], De::Error>
    where
        De: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        let items = Vec::<T>::deserialize(deserializer)?;
        let len = items.len();
        items
            .try_into()
            .map_err(|_| de::Error::invalid_length(len, &format!("{D} elements").as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_offsets_run_axis_zero_fastest() {
        let g = ImageGeometry::with_size([4, 3, 2]);
        assert_eq!(g.linear_offset(&[1, 0, 0]), 1);
        assert_eq!(g.linear_offset(&[0, 1, 0]), 4);
        assert_eq!(g.linear_offset(&[0, 0, 1]), 12);
        for offset in 0..g.len() {
            assert_eq!(g.linear_offset(&g.index_from_linear(offset)), offset);
        }
    }

    #[test]
    fn physical_and_index_coordinates_agree() {
        let g = ImageGeometry::new([10.0, -5.0], [0.5, 2.0], [8, 8]);
        let p = g.index_to_physical(&[3, 2]);
        assert_eq!((p[0], p[1]), (11.5, -1.0));
        let c = g.physical_to_continuous_index(&p);
        assert_eq!(c, [3.0, 2.0]);
        assert_eq!(g.extent(1), 16.0);
    }

    #[test]
    fn deserializes_from_json_arrays() {
        let g: ImageGeometry<2> =
            serde_json::from_str(r#"{"origin":[0,1],"spacing":[0.5,0.5],"size":[3,4]}"#).unwrap();
        assert_eq!(g.size, [3, 4]);
        assert!(serde_json::from_str::<ImageGeometry<2>>(
            r#"{"origin":[0],"spacing":[0.5,0.5],"size":[3,4]}"#
        )
        .is_err());
    }
}
