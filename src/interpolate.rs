//! Interpolation policies over a [`Volume`] at continuous grid indices.
//!
//! Callers decide whether a position is inside the data; the policies only
//! clamp neighbour indices to the grid (replicate border), so a position a
//! fraction of a sample beyond the last row still reads the border value.

use crate::image::Volume;
use serde::Deserialize;

/// Value of a volume at a continuous grid index.
pub trait Interpolator<const D: usize>: Sync {
    fn interpolate(&self, volume: &Volume<D>, index: &[f64; D]) -> f32;
}

/// Value of the closest sample.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestNeighbor;

/// Multilinear blend of the `2^D` surrounding samples.
#[derive(Clone, Copy, Debug, Default)]
pub struct Linear;

/// Serializable choice between the built-in policies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    Nearest,
    #[default]
    Linear,
}

#[inline]
fn clamp_index(value: f64, len: usize) -> usize {
    let max = len.saturating_sub(1) as f64;
    value.clamp(0.0, max) as usize
}

impl<const D: usize> Interpolator<D> for NearestNeighbor {
    fn interpolate(&self, volume: &Volume<D>, index: &[f64; D]) -> f32 {
        let size = volume.size();
        let nearest: [usize; D] = std::array::from_fn(|k| clamp_index(index[k].round(), size[k]));
        volume.get(&nearest)
    }
}

impl<const D: usize> Interpolator<D> for Linear {
    fn interpolate(&self, volume: &Volume<D>, index: &[f64; D]) -> f32 {
        let size = volume.size();
        let mut lo = [0usize; D];
        let mut hi = [0usize; D];
        let mut frac = [0f64; D];
        for k in 0..D {
            let x = index[k].clamp(0.0, size[k].saturating_sub(1) as f64);
            let base = x.floor();
            lo[k] = base as usize;
            hi[k] = (lo[k] + 1).min(size[k].saturating_sub(1));
            frac[k] = x - base;
        }

        let mut acc = 0.0f64;
        let mut corner = [0usize; D];
        for mask in 0..(1usize << D) {
            let mut weight = 1.0f64;
            for k in 0..D {
                if mask & (1 << k) != 0 {
                    weight *= frac[k];
                    corner[k] = hi[k];
                } else {
                    weight *= 1.0 - frac[k];
                    corner[k] = lo[k];
                }
            }
            if weight != 0.0 {
                acc += weight * volume.get(&corner) as f64;
            }
        }
        acc as f32
    }
}

impl<const D: usize> Interpolator<D> for Interpolation {
    #[inline]
    fn interpolate(&self, volume: &Volume<D>, index: &[f64; D]) -> f32 {
        match self {
            Interpolation::Nearest => NearestNeighbor.interpolate(volume, index),
            Interpolation::Linear => Linear.interpolate(volume, index),
        }
    }
}
