//! Per-event proton candidates, grouped per arm and detection technology.

use serde::{Deserialize, Serialize};

/// One detected (or hypothesized) proton crossing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProtonCandidate {
    /// Fractional momentum loss.
    pub xi: f64,
    /// Local x (mm). Sentinel values at or below −90 mean unavailable.
    #[serde(default = "coord_na")]
    pub x: f64,
    /// Local y (mm).
    #[serde(default = "coord_na")]
    pub y: f64,
    /// Track slope in the x projection.
    #[serde(default)]
    pub slope_x: f64,
    /// Track slope in the y projection.
    #[serde(default)]
    pub slope_y: f64,
    /// Roman-pot station id.
    pub station: u32,
}

fn coord_na() -> f64 {
    -99.0
}

/// Candidates seen on one arm, split by detection technology.
///
/// Only presence matters downstream: the hypothesis logic treats "at least
/// one candidate" the same as exactly one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmObservation {
    /// Multi-track reconstructed candidates.
    #[serde(default)]
    pub multi: Vec<ProtonCandidate>,
    /// Pixel-station candidates.
    #[serde(default)]
    pub pixel: Vec<ProtonCandidate>,
    /// Strip-station candidates tied to the multi-track reconstruction;
    /// cleared together with `multi`.
    #[serde(default)]
    pub strip: Vec<ProtonCandidate>,
}

impl ArmObservation {
    /// Whether at least one multi-track candidate is present.
    pub fn has_multi(&self) -> bool {
        !self.multi.is_empty()
    }

    /// Whether at least one pixel candidate is present.
    pub fn has_pixel(&self) -> bool {
        !self.pixel.is_empty()
    }

    /// Drop the multi-track candidates and their strip companions.
    pub fn clear_multi(&mut self) {
        self.multi.clear();
        self.strip.clear();
    }

    /// Whether no candidates of any technology are present.
    pub fn is_empty(&self) -> bool {
        self.multi.is_empty() && self.pixel.is_empty() && self.strip.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(station: u32) -> ProtonCandidate {
        ProtonCandidate { xi: 0.05, x: 5.0, y: 0.0, slope_x: 0.0, slope_y: 0.0, station }
    }

    #[test]
    fn presence_ignores_counts() {
        let mut arm = ArmObservation::default();
        assert!(!arm.has_multi());
        arm.multi.push(candidate(3));
        arm.multi.push(candidate(23));
        assert!(arm.has_multi());
    }

    #[test]
    fn clearing_multi_takes_strips_along() {
        let mut arm = ArmObservation {
            multi: vec![candidate(3)],
            pixel: vec![candidate(23)],
            strip: vec![candidate(3)],
        };
        arm.clear_multi();
        assert!(arm.multi.is_empty());
        assert!(arm.strip.is_empty());
        assert!(arm.has_pixel());
    }

    #[test]
    fn unspecified_coordinates_default_to_unavailable() {
        let c: ProtonCandidate = serde_json::from_str(r#"{"xi": 0.04, "station": 3}"#).unwrap();
        assert!(c.x <= -90.0);
        assert!(c.y <= -90.0);
        assert_eq!(c.slope_x, 0.0);
    }
}
