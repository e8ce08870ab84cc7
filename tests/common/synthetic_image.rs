use scan_convert::{ImageGeometry, Volume};

/// Smooth test field in Cartesian space, bounded to [0.2, 0.8].
pub fn smooth_field(lateral: f64, depth: f64) -> f64 {
    0.5 + 0.3 * (lateral / 7.0).sin() * (depth / 9.0).cos()
}

/// Ascending, non-uniformly spaced line angles in [-max_theta, max_theta].
pub fn warped_angles(lines: usize, max_theta: f64) -> Vec<f64> {
    assert!(lines >= 2, "need at least two lines");
    (0..lines)
        .map(|j| {
            let u = 2.0 * j as f64 / (lines - 1) as f64 - 1.0;
            max_theta * (0.8 * u + 0.2 * u * u * u)
        })
        .collect()
}

/// Acquisition of [`smooth_field`]: lines along axis 0, depth along axis 1.
///
/// Sample `(j, i)` holds the field at radius `r_min + i * dr` on line `j`.
pub fn sector_source(angles: &[f64], samples: usize, r_min: f64, dr: f64) -> Volume<2> {
    let geometry = ImageGeometry::new([0.0, 0.0], [1.0, dr], [angles.len(), samples]);
    let mut volume = Volume::new(geometry);
    for i in 0..samples {
        let r = r_min + i as f64 * dr;
        for (j, &theta) in angles.iter().enumerate() {
            let (s, c) = theta.sin_cos();
            volume.set(&[j, i], smooth_field(r * s, r * c) as f32);
        }
    }
    volume
}
