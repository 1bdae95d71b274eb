//! Pure zero-strip-track probabilities from the external strip calibration.
//!
//! Constants per (sector, crossing-angle bucket, era). Era 2017E spans two
//! detector configurations; its entries blend the early and late
//! measurements by the recorded-luminosity fraction of the early part.

use pps_core::{CrossingAngle, Era, Sector};

/// Luminosity fraction of the early 2017E configuration.
const E1_FRACTION: f64 = 7519.0 / (7519.0 + 1440.0);

fn blend_2017e(early: f64, late: f64) -> f64 {
    E1_FRACTION * early + (1.0 - E1_FRACTION) * late
}

/// Probability for a pure zero-strip track, or `None` when the combination
/// was not covered by the calibration.
pub fn pure0_prob(sector: Sector, angle: CrossingAngle, era: &Era) -> Option<f64> {
    let p = match (sector, angle.urad(), era.as_str()) {
        (Sector::S45, 120, "2017B") => 0.8605,
        (Sector::S45, 120, "2017C") => 0.8687,
        (Sector::S45, 120, "2017D") => 0.8665,
        (Sector::S45, 120, "2017E") => blend_2017e(1.0, 0.6945),
        (Sector::S45, 120, "2017F") => 0.6803,
        (Sector::S45, 130, "2017B") => 0.7749,
        (Sector::S45, 130, "2017C") => 0.7888,
        (Sector::S45, 130, "2017D") => 0.7920,
        (Sector::S45, 130, "2017E") => blend_2017e(1.0, 0.4680),
        (Sector::S45, 130, "2017F") => 0.4667,
        (Sector::S45, 140, "2017B") => 0.7137,
        (Sector::S45, 140, "2017C") => 0.7181,
        (Sector::S45, 140, "2017D") => 0.7353,
        (Sector::S45, 140, "2017E") => blend_2017e(1.0, 0.3556),
        (Sector::S45, 140, "2017F") => 0.3878,
        (Sector::S45, 150, "2017B") => 0.6359,
        (Sector::S45, 150, "2017C") => 0.6510,
        (Sector::S45, 150, "2017D") => 0.6713,
        (Sector::S45, 150, "2017E") => blend_2017e(1.0, 0.3493),
        (Sector::S45, 150, "2017F") => 0.3593,
        (Sector::S56, 120, "2017B") => 0.8412,
        (Sector::S56, 120, "2017C") => 0.8370,
        (Sector::S56, 120, "2017D") => 0.8273,
        (Sector::S56, 120, "2017E") => blend_2017e(0.6572, 0.6307),
        (Sector::S56, 120, "2017F") => 0.6053,
        (Sector::S56, 130, "2017B") => 0.7409,
        (Sector::S56, 130, "2017C") => 0.7400,
        (Sector::S56, 130, "2017D") => 0.7375,
        (Sector::S56, 130, "2017E") => blend_2017e(0.4822, 0.3976),
        (Sector::S56, 130, "2017F") => 0.3813,
        (Sector::S56, 140, "2017B") => 0.6752,
        (Sector::S56, 140, "2017C") => 0.6607,
        (Sector::S56, 140, "2017D") => 0.6729,
        (Sector::S56, 140, "2017E") => blend_2017e(0.3791, 0.2982),
        (Sector::S56, 140, "2017F") => 0.3100,
        (Sector::S56, 150, "2017B") => 0.5948,
        (Sector::S56, 150, "2017C") => 0.5896,
        (Sector::S56, 150, "2017D") => 0.6010,
        (Sector::S56, 150, "2017E") => blend_2017e(0.3467, 0.2904),
        (Sector::S56, 150, "2017F") => 0.2862,
        _ => return None,
    };
    Some(p)
}
