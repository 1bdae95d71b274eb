//! JSON map-bundle schema types
//!
//! The bundle is the product of the external map-extraction step: every
//! calibrated object reduced to plain edges/values/errors arrays, tagged
//! with the key fields the repository resolves on.

use std::path::Path;

use pps_core::{CrossingAngle, Era, Result, Sector};
use serde::{Deserialize, Serialize};

/// A full set of efficiency maps for one run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapBundle {
    /// Per-station multi-track reconstruction efficiencies.
    #[serde(default)]
    pub multi_track: Vec<MultiTrackEntry>,
    /// Radiation-damage efficiency curves over ξ.
    #[serde(default)]
    pub radiation_damage: Vec<CurveEntry>,
    /// Inter-pot spatial efficiency surfaces. Sub-era surfaces (e.g.
    /// `2017C1`) are blended into their inclusive era at load time.
    #[serde(default)]
    pub interpot: Vec<SurfaceEntry>,
}

/// One per-station multi-track efficiency scalar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiTrackEntry {
    /// Sector the station sits in.
    pub sector: Sector,
    /// Data-taking era.
    pub era: Era,
    /// Roman-pot station id.
    pub station: u32,
    /// Reconstruction efficiency (point estimate).
    pub efficiency: f64,
}

/// One radiation-damage curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveEntry {
    /// Sector the curve was measured for.
    pub sector: Sector,
    /// Data-taking era.
    pub era: Era,
    /// Crossing-angle bucket of the calibration.
    pub angle: CrossingAngle,
    /// Bin edges over ξ.
    pub bin_edges: Vec<f64>,
    /// Per-bin efficiencies.
    pub values: Vec<f64>,
    /// Per-bin uncertainties.
    pub errors: Vec<f64>,
}

/// One inter-pot spatial efficiency surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceEntry {
    /// Sector the surface was measured for.
    pub sector: Sector,
    /// Data-taking era, or a sub-era label destined for blending.
    pub era: Era,
    /// X-axis bin edges (local x, mm).
    pub x_edges: Vec<f64>,
    /// Y-axis bin edges (local y, mm).
    pub y_edges: Vec<f64>,
    /// Per-bin efficiencies, row-major.
    pub values: Vec<f64>,
    /// Per-bin uncertainties, row-major.
    pub errors: Vec<f64>,
}

impl MapBundle {
    /// Parse a bundle from a JSON string.
    pub fn from_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a bundle from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fixture_bundle() {
        let bundle =
            MapBundle::from_str(include_str!("../../../tests/fixtures/pps_maps.json")).unwrap();
        assert_eq!(bundle.multi_track.len(), 2);
        assert!(!bundle.radiation_damage.is_empty());
        assert!(!bundle.interpot.is_empty());

        let mt = &bundle.multi_track[0];
        assert_eq!(mt.sector, Sector::S45);
        assert_eq!(mt.era.as_str(), "2017B");
        assert_eq!(mt.station, 3);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let bundle = MapBundle::from_str("{}").unwrap();
        assert!(bundle.multi_track.is_empty());
        assert!(bundle.radiation_damage.is_empty());
        assert!(bundle.interpot.is_empty());
    }

    #[test]
    fn unknown_sector_code_is_rejected() {
        let json = r#"{"multi_track":[{"sector":44,"era":"2017B","station":3,"efficiency":0.9}]}"#;
        assert!(MapBundle::from_str(json).is_err());
    }
}
