//! Common value types for the PPS tagging crates

use serde::{Deserialize, Serialize};
use std::fmt;

/// Spectrometer sector hosting the tagging stations.
///
/// Sector 45 instruments the positive arm, sector 56 the negative arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Sector {
    /// Sector 45.
    S45,
    /// Sector 56.
    S56,
}

impl Sector {
    /// Numeric sector code (45 or 56).
    pub fn code(self) -> u16 {
        match self {
            Sector::S45 => 45,
            Sector::S56 => 56,
        }
    }

    /// Sector a Roman-pot station belongs to. Station ids below 100 sit in
    /// sector 45, the rest in sector 56.
    pub fn from_station_id(id: u32) -> Self {
        if id < 100 { Sector::S45 } else { Sector::S56 }
    }
}

impl From<Sector> for u16 {
    fn from(sector: Sector) -> u16 {
        sector.code()
    }
}

impl TryFrom<u16> for Sector {
    type Error = String;

    fn try_from(code: u16) -> std::result::Result<Self, String> {
        match code {
            45 => Ok(Sector::S45),
            56 => Ok(Sector::S56),
            other => Err(format!("unknown sector code {other}")),
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Data-taking era label (e.g. `2017B`). Sub-era labels such as `2017C1`
/// appear only in loader input, never in lookup keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Era(String);

impl Era {
    /// Create an era label.
    pub fn new(label: impl Into<String>) -> Self {
        Era(label.into())
    }

    /// The label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Era {
    fn from(label: &str) -> Self {
        Era::new(label)
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Beam crossing-angle bucket in µrad under which a calibration was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrossingAngle(u16);

impl CrossingAngle {
    /// Buckets covered by the strip calibration campaign.
    pub const CALIBRATED: [u16; 4] = [120, 130, 140, 150];

    /// Create a crossing-angle bucket.
    pub fn new(urad: u16) -> Self {
        CrossingAngle(urad)
    }

    /// Bucket value in µrad.
    pub fn urad(self) -> u16 {
        self.0
    }
}

impl fmt::Display for CrossingAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
