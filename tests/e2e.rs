mod common;

use common::synthetic_image::{sector_source, smooth_field, warped_angles};
use scan_convert::acquisition::{RADIUS_STRING_KEY, THETA_STRING_KEY};
use scan_convert::image::io::{load_grayscale_volume, save_grayscale};
use scan_convert::prelude::*;
use scan_convert::{AcquisitionGeometry, MetaValue, MetadataDictionary, ScanConvertError};

const LINES: usize = 64;
const SAMPLES: usize = 400;
const MAX_THETA: f64 = 0.6;
const R_MIN: f64 = 5.0;
const DR: f64 = 0.1;
const DEFAULT: f32 = -1.0;

fn setup() -> (Vec<f64>, Volume<2>, CartesianToPolar<2>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let angles = warped_angles(LINES, MAX_THETA);
    let mut source = sector_source(&angles, SAMPLES, R_MIN, DR);
    let mut geometry = *source.geometry();
    geometry.spacing[0] = 2.0 * MAX_THETA / (LINES - 1) as f64;
    source = Volume::from_data(geometry, source.into_data()).unwrap();

    let transform = CartesianToPolar::configure(&SectorParams {
        radius_axis: 1,
        angle_axis: 0,
        r_min: R_MIN,
        r_max: R_MIN + SAMPLES as f64 * DR,
        assumed_spacing: geometry.spacing[0],
        angles: angles.clone(),
    })
    .unwrap();
    (angles, source, transform)
}

fn options() -> ConvertOptions {
    ConvertOptions::default()
        .with_default_value(DEFAULT)
        .with_output_spacing(Some(0.25))
}

#[test]
fn converted_image_reproduces_the_scanned_field() {
    let (_, source, transform) = setup();
    let (image, report) = ScanConverter::new(transform, options())
        .convert(&source)
        .unwrap();
    assert!(report.inside_samples > 0);

    let g = *image.geometry();
    let mut worst = 0.0f64;
    for offset in 0..g.len() {
        let index = g.index_from_linear(offset);
        let value = image.get(&index);
        if value == DEFAULT {
            continue;
        }
        let p = g.index_to_physical(&index);
        let err = (value as f64 - smooth_field(p[0], p[1])).abs();
        worst = worst.max(err);
    }
    assert!(worst < 1e-2, "worst interpolation error {worst:.5}");
}

#[test]
fn samples_outside_the_fan_hold_the_default_exactly() {
    let (angles, source, transform) = setup();
    let r_max = transform.sector().r_max();
    let (theta_min, theta_max) = (angles[0], angles[LINES - 1]);
    let (image, _) = ScanConverter::new(transform, options())
        .convert(&source)
        .unwrap();

    let g = *image.geometry();
    let (mut outside, mut inside) = (0usize, 0usize);
    for offset in 0..g.len() {
        let index = g.index_from_linear(offset);
        let p = g.index_to_physical(&index);
        let r = p[0].hypot(p[1]);
        let theta = p[0].atan2(p[1]);
        let value = image.get(&index);
        let eps = 1e-6;
        if r > r_max + eps || r < R_MIN - eps || theta > theta_max + eps || theta < theta_min - eps {
            assert_eq!(value, DEFAULT, "r={r:.3} theta={theta:.4}");
            outside += 1;
        } else if r > R_MIN + eps
            && r < r_max - eps
            && theta > theta_min + eps
            && theta < theta_max - eps
        {
            assert_ne!(value, DEFAULT, "r={r:.3} theta={theta:.4}");
            inside += 1;
        }
    }
    assert!(outside > 0 && inside > 0);
}

#[test]
fn output_grid_bounds_the_fan() {
    let (_, source, transform) = setup();
    let corners = transform.corner_offsets();
    let (image, report) = ScanConverter::new(transform, options())
        .convert(&source)
        .unwrap();
    let g = image.geometry();

    // Lateral axis is centred on the fan.
    assert!((g.origin[0] + corners.far_angular).abs() < 1e-12);
    assert_eq!(g.spacing[0], 0.25);
    assert_eq!(g.size[0], (2.0 * corners.far_angular / 0.25).ceil() as usize);
    // Depth axis starts at the near corner; pixels are square.
    assert!((g.origin[1] - R_MIN * MAX_THETA.cos()).abs() < 1e-9);
    assert_eq!(g.spacing[1], 0.25);
    assert_eq!(g.size[1], ((45.0 - corners.near_radial) / 0.25).ceil() as usize);
    assert_eq!(report.line_count, LINES);
    assert_eq!(report.output_size, g.size.to_vec());
}

#[test]
fn table_and_source_must_agree() {
    let (angles, source, _) = setup();
    // A table with fewer lines than the source has columns.
    let transform = CartesianToPolar::configure(&SectorParams {
        radius_axis: 1,
        angle_axis: 0,
        r_min: R_MIN,
        r_max: R_MIN + SAMPLES as f64 * DR,
        assumed_spacing: source.geometry().spacing[0],
        angles: angles[..8].to_vec(),
    })
    .unwrap();
    let result = ScanConverter::new(transform, options()).convert(&source);
    assert!(matches!(result, Err(ScanConvertError::InvalidGeometry(_))));
}

#[test]
fn source_samples_map_forward_and_back() {
    let (_, source, transform) = setup();
    let converter = ScanConverter::new(transform.clone(), options());
    let positions = converter.forward_positions(source.geometry());
    for (offset, p) in positions.iter().enumerate().step_by(97) {
        let index = source.geometry().index_from_linear(offset);
        let polar = transform.transform_point(p);
        assert!((polar[0] - index[0] as f64).abs() < 1e-9);
        assert!((polar[1] - (R_MIN + index[1] as f64 * DR)).abs() < 1e-9);
    }
}

#[test]
fn metadata_drives_the_same_conversion() {
    let (angles, source, transform) = setup();
    let theta_text: String = angles.iter().map(|a| format!("{a:?} ")).collect();
    let mut dict = MetadataDictionary::new();
    dict.insert(RADIUS_STRING_KEY.into(), MetaValue::Text(format!("{R_MIN}")));
    dict.insert(THETA_STRING_KEY.into(), MetaValue::Text(theta_text));

    let acquisition = AcquisitionGeometry::from_metadata(&dict).unwrap();
    let params = acquisition.sector_params(source.geometry(), 1, 0).unwrap();
    let from_metadata = CartesianToPolar::configure(&params).unwrap();

    let (a, _) = ScanConverter::new(transform, options())
        .convert(&source)
        .unwrap();
    let (b, _) = ScanConverter::new(from_metadata, options())
        .convert(&source)
        .unwrap();
    assert_eq!(a.geometry(), b.geometry());
    let max_diff = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0f32, f32::max);
    assert!(max_diff < 1e-5, "max diff {max_diff}");
}

#[test]
fn grayscale_png_round_trip() {
    let (_, source, transform) = setup();
    let (image, _) = ScanConverter::new(transform, options())
        .convert(&source)
        .unwrap();

    let path = std::env::temp_dir().join(format!("scan_convert_e2e_{}.png", std::process::id()));
    save_grayscale(&image, &path).unwrap();
    let loaded = load_grayscale_volume(&path, [0.0, 0.0], [1.0, 1.0]).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.size(), image.size());
    for (a, b) in loaded.data().iter().zip(image.data()) {
        assert!((a - b.clamp(0.0, 1.0)).abs() <= 1.0 / 255.0 + 1e-6);
    }
}
