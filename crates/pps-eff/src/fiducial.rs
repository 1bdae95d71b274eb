//! Pixel-track fiducial acceptance.
//!
//! The validated acceptance is a per-(era, sector) rectangle in local
//! coordinates rotated by the 8° detector tilt, plus an angular cut on the
//! track slopes.

use pps_core::{Era, Sector};

/// Maximum accepted track slope magnitude in either transverse projection.
const MAX_TRACK_SLOPE: f64 = 0.02;

/// Detector tilt applied to local coordinates before the window test.
const TILT_DEG: f64 = -8.0;

struct Window {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

fn window(era: &Era, sector: Sector) -> Window {
    let early = matches!(era.as_str(), "2017B" | "2017C" | "2017D");
    match (early, sector) {
        (true, Sector::S45) => {
            // 2017B ran with a slightly shifted sector-45 pot position.
            if era.as_str() == "2017B" {
                Window { x_min: 1.995, x_max: 24.479, y_min: -11.098, y_max: 4.298 }
            } else {
                Window { x_min: 1.860, x_max: 24.334, y_min: -11.098, y_max: 4.298 }
            }
        }
        (true, Sector::S56) => Window { x_min: 2.422, x_max: 24.620, y_min: -10.698, y_max: 4.698 },
        (false, Sector::S45) => Window { x_min: 1.995, x_max: 24.479, y_min: -10.098, y_max: 4.998 },
        (false, Sector::S56) => Window { x_min: 2.422, x_max: 24.620, y_min: -9.698, y_max: 5.498 },
    }
}

/// Whether a pixel track lies inside the validated acceptance.
///
/// Total: any out-of-range geometry simply fails the test, it never errors.
/// Window bounds are inclusive.
pub fn in_fiducial(era: &Era, sector: Sector, x: f64, y: f64, slope_x: f64, slope_y: f64) -> bool {
    if slope_x.abs() > MAX_TRACK_SLOPE || slope_y.abs() > MAX_TRACK_SLOPE {
        return false;
    }

    let (sin_t, cos_t) = TILT_DEG.to_radians().sin_cos();
    let x_rot = x * cos_t - y * sin_t;
    let y_rot = x * sin_t + y * cos_t;

    let w = window(era, sector);
    x_rot >= w.x_min && x_rot <= w.x_max && y_rot >= w.y_min && y_rot <= w.y_max
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Local coordinates whose rotated image lands on `(x_rot, y_rot)`.
    fn unrotated(x_rot: f64, y_rot: f64) -> (f64, f64) {
        let (sin_t, cos_t) = TILT_DEG.to_radians().sin_cos();
        (x_rot * cos_t + y_rot * sin_t, -x_rot * sin_t + y_rot * cos_t)
    }

    #[test]
    fn steep_tracks_are_rejected_everywhere() {
        let era = Era::from("2017B");
        let (x, y) = unrotated(10.0, 0.0);
        assert!(in_fiducial(&era, Sector::S45, x, y, 0.0, 0.0));
        assert!(!in_fiducial(&era, Sector::S45, x, y, 0.021, 0.0));
        assert!(!in_fiducial(&era, Sector::S45, x, y, 0.0, -0.021));
        // The slope cut itself is inclusive.
        assert!(in_fiducial(&era, Sector::S45, x, y, 0.02, 0.02));
    }

    #[test]
    fn sector45_2017b_lower_x_edge() {
        let era = Era::from("2017B");
        // Just inside / just outside the shifted 2017B window at x = 1.995.
        let (x_in, y_in) = unrotated(1.9951, 0.0);
        assert!(in_fiducial(&era, Sector::S45, x_in, y_in, 0.0, 0.0));
        let (x_out, y_out) = unrotated(1.9949, 0.0);
        assert!(!in_fiducial(&era, Sector::S45, x_out, y_out, 0.0, 0.0));

        // The same point is accepted by the wider 2017C window.
        assert!(in_fiducial(&Era::from("2017C"), Sector::S45, x_out, y_out, 0.0, 0.0));
    }

    #[test]
    fn sectors_use_distinct_windows() {
        let era = Era::from("2017D");
        let (x, y) = unrotated(2.0, 0.0);
        assert!(in_fiducial(&era, Sector::S45, x, y, 0.0, 0.0));
        assert!(!in_fiducial(&era, Sector::S56, x, y, 0.0, 0.0));
    }

    #[test]
    fn late_eras_widen_the_y_window() {
        // y = 4.5 sits above the 2017B/C/D sector-45 ceiling of 4.298 but
        // inside the 4.998 ceiling used afterwards.
        let (x, y) = unrotated(10.0, 4.5);
        assert!(!in_fiducial(&Era::from("2017C"), Sector::S45, x, y, 0.0, 0.0));
        assert!(in_fiducial(&Era::from("2017E"), Sector::S45, x, y, 0.0, 0.0));
        assert!(in_fiducial(&Era::from("2017F"), Sector::S45, x, y, 0.0, 0.0));
    }
}
