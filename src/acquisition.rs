//! Acquisition geometry carried in image metadata.
//!
//! Curvilinear acquisitions ship two extra facts next to the sample grid:
//! the distance from the centre of rotation to the first radial sample, and
//! the angle of every scan line. Readers expose them in a key/value
//! dictionary, either as typed values (`Radius`, `Theta`) or as text
//! (`RadiusString`, `ThetaString`, the latter holding whitespace-separated
//! angles). Typed entries win when both are present.

use crate::error::{Result, ScanConvertError};
use crate::image::ImageGeometry;
use crate::transform::SectorParams;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const RADIUS_KEY: &str = "Radius";
pub const RADIUS_STRING_KEY: &str = "RadiusString";
pub const THETA_KEY: &str = "Theta";
pub const THETA_STRING_KEY: &str = "ThetaString";

/// One metadata entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Number(f64),
    Array(Vec<f64>),
    Text(String),
}

pub type MetadataDictionary = BTreeMap<String, MetaValue>;

/// Radius offset and per-line angles of a curvilinear acquisition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionGeometry {
    /// Distance from the centre of rotation to the first radial sample.
    pub radius: f64,
    /// Angle of every scan line in radians.
    pub angles: Vec<f64>,
}

impl AcquisitionGeometry {
    pub fn from_metadata(dict: &MetadataDictionary) -> Result<Self> {
        Ok(Self {
            radius: read_radius(dict)?,
            angles: read_angles(dict)?,
        })
    }

    /// Transform configuration for a source grid carrying this acquisition.
    ///
    /// `r_max = radius + size[radius_axis] * spacing[radius_axis]` and the
    /// grid spacing along `angle_axis` is the assumed angular spacing. The
    /// table must hold one angle per sample along `angle_axis`.
    pub fn sector_params<const D: usize>(
        &self,
        source: &ImageGeometry<D>,
        radius_axis: usize,
        angle_axis: usize,
    ) -> Result<SectorParams> {
        if radius_axis >= D || angle_axis >= D {
            return Err(ScanConvertError::InvalidGeometry(format!(
                "axes ({radius_axis}, {angle_axis}) out of range for {D} dimensions"
            )));
        }
        if self.angles.len() != source.size[angle_axis] {
            return Err(ScanConvertError::InvalidGeometry(format!(
                "{} angles for {} samples along axis {}",
                self.angles.len(),
                source.size[angle_axis],
                angle_axis
            )));
        }
        Ok(SectorParams {
            radius_axis,
            angle_axis,
            r_min: self.radius,
            r_max: self.radius + source.extent(radius_axis),
            assumed_spacing: source.spacing[angle_axis],
            angles: self.angles.clone(),
        })
    }
}

fn read_radius(dict: &MetadataDictionary) -> Result<f64> {
    match dict.get(RADIUS_KEY) {
        Some(MetaValue::Number(r)) => return Ok(*r),
        Some(other) => {
            return Err(ScanConvertError::Metadata(format!(
                "'{RADIUS_KEY}' must be a number, got {other:?}"
            )))
        }
        None => {}
    }
    match dict.get(RADIUS_STRING_KEY) {
        Some(MetaValue::Text(text)) => text.trim().parse::<f64>().map_err(|e| {
            ScanConvertError::Metadata(format!("cannot parse '{RADIUS_STRING_KEY}' = {text:?}: {e}"))
        }),
        Some(MetaValue::Number(r)) => Ok(*r),
        Some(other) => Err(ScanConvertError::Metadata(format!(
            "'{RADIUS_STRING_KEY}' must be text, got {other:?}"
        ))),
        None => Err(ScanConvertError::Metadata(format!(
            "could not find '{RADIUS_KEY}' or '{RADIUS_STRING_KEY}'"
        ))),
    }
}

fn read_angles(dict: &MetadataDictionary) -> Result<Vec<f64>> {
    match dict.get(THETA_KEY) {
        Some(MetaValue::Array(values)) => return Ok(values.clone()),
        Some(other) => {
            return Err(ScanConvertError::Metadata(format!(
                "'{THETA_KEY}' must be an array of numbers, got {other:?}"
            )))
        }
        None => {}
    }
    match dict.get(THETA_STRING_KEY) {
        Some(MetaValue::Text(text)) => parse_angle_list(text),
        Some(other) => Err(ScanConvertError::Metadata(format!(
            "'{THETA_STRING_KEY}' must be text, got {other:?}"
        ))),
        None => Err(ScanConvertError::Metadata(format!(
            "could not find '{THETA_KEY}' or '{THETA_STRING_KEY}'"
        ))),
    }
}

/// Parse whitespace-separated angles, e.g. `"-0.5 -0.25 0 0.25 0.5 "`.
pub fn parse_angle_list(text: &str) -> Result<Vec<f64>> {
    text.split_whitespace()
        .enumerate()
        .map(|(i, token)| {
            token.parse::<f64>().map_err(|e| {
                ScanConvertError::Metadata(format!("angle #{i} {token:?} is not a number: {e}"))
            })
        })
        .collect()
}
