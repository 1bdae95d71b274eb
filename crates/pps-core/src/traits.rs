//! Core traits for the PPS tagging crates
//!
//! The lookup trait decouples the efficiency evaluators from the concrete
//! map repository: evaluation logic depends only on a `key -> (value,
//! uncertainty)` contract, not on how the maps were loaded or stored.

use crate::types::{CrossingAngle, Era, Sector};
use crate::Result;

/// Read-only access to the calibrated efficiency maps.
///
/// All methods resolve to a `(value, uncertainty)` pair; a key with no
/// backing data yields [`Error::LookupMiss`](crate::Error::LookupMiss)
/// rather than a silent default.
pub trait EfficiencyLookup: Send + Sync {
    /// Per-station multi-track reconstruction efficiency. A point estimate:
    /// the uncertainty component is zero.
    fn multi_track(&self, sector: Sector, era: &Era, station: u32) -> Result<(f64, f64)>;

    /// Radiation-damage efficiency curve evaluated at fractional momentum
    /// loss `xi` with nearest-enclosing-bin semantics.
    fn radiation_damage(
        &self,
        sector: Sector,
        era: &Era,
        angle: CrossingAngle,
        xi: f64,
    ) -> Result<(f64, f64)>;

    /// Inter-pot spatial efficiency evaluated at local coordinates `(x, y)`.
    fn interpot(&self, sector: Sector, era: &Era, x: f64, y: f64) -> Result<(f64, f64)>;

    /// Probability for a pure zero-strip track, from the external strip
    /// calibration constants.
    fn pure_zero_strip(&self, sector: Sector, angle: CrossingAngle, era: &Era) -> Result<f64>;
}
