//! Large-scale reference structures pooled with galaxies in the scaling fit.

use crate::domain::ScalingPoint;

/// `(label, R kpc, V km/s)`.
const FILAMENTS: [(&str, f64, f64); 3] = [
    ("Filament Core", 50.0, 110.0),
    ("HI Structure", 1700.0, 110.0),
    ("Full Filament", 15000.0, 110.0),
];

pub fn filament_points() -> Vec<ScalingPoint> {
    FILAMENTS
        .iter()
        .map(|&(label, r, v)| ScalingPoint::from_velocity(label, r, v))
        .collect()
}
