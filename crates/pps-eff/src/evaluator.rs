//! Per-proton tagging efficiency from the calibrated maps.

use pps_core::{CrossingAngle, EfficiencyLookup, Era, Result, Sector};

/// Coordinate value at or below which a local position is unavailable.
pub const COORD_NA: f64 = -90.0;

/// Stage selection for one efficiency evaluation.
///
/// The defaults match the standard correction chain: multi-track
/// reconstruction with the radiation-damage curve, the pure-zero-strip
/// probability and the inter-pot surface, but without the per-station
/// scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalFlags {
    /// Whether the candidate comes from the multi-track reconstruction.
    /// The pixel-only path is not calibrated yet and evaluates to
    /// `(1.0, 0.0)`.
    pub multi_track_reco: bool,
    /// Multiply in the per-station multi-track efficiency scalar.
    pub apply_station_factor: bool,
    /// Multiply in the pure-zero-strip probability and, when local
    /// coordinates are available, the inter-pot surface.
    pub apply_interpot_and_pure0: bool,
}

impl Default for EvalFlags {
    fn default() -> Self {
        EvalFlags {
            multi_track_reco: true,
            apply_station_factor: false,
            apply_interpot_and_pure0: true,
        }
    }
}

/// One proton-tag efficiency query.
#[derive(Debug, Clone, Copy)]
pub struct EfficiencyRequest<'a> {
    /// Data-taking era the candidate was recorded in.
    pub era: &'a Era,
    /// Beam crossing-angle bucket.
    pub angle: CrossingAngle,
    /// Fractional momentum loss of the candidate.
    pub xi: f64,
    /// Local x (mm); at or below [`COORD_NA`] means unavailable.
    pub x: f64,
    /// Local y (mm); at or below [`COORD_NA`] means unavailable.
    pub y: f64,
    /// Roman-pot station id; fixes the sector.
    pub station: u32,
}

/// Combines the calibrated per-stage efficiencies into one
/// `(efficiency, uncertainty)` pair per proton candidate.
///
/// Each stage is an independent multiplicative factor; the uncertainty is
/// `eff × sqrt(Σ (δf/f)²)` over the stages that carry one.
#[derive(Debug, Clone, Copy)]
pub struct ProtonEfficiencyEvaluator<'a, L: EfficiencyLookup + ?Sized> {
    maps: &'a L,
}

impl<'a, L: EfficiencyLookup + ?Sized> ProtonEfficiencyEvaluator<'a, L> {
    /// Create an evaluator over a shared map repository.
    pub fn new(maps: &'a L) -> Self {
        ProtonEfficiencyEvaluator { maps }
    }

    /// Evaluate the tagging efficiency for one candidate.
    ///
    /// Lookup misses propagate; they are never defaulted to a silent 1.0.
    pub fn evaluate(&self, req: &EfficiencyRequest<'_>, flags: EvalFlags) -> Result<(f64, f64)> {
        if !flags.multi_track_reco {
            // Pixel-only efficiency is not measured yet; treat the path as
            // fully efficient until the calibration lands.
            return Ok((1.0, 0.0));
        }

        let sector = Sector::from_station_id(req.station);
        let mut eff = 1.0;
        let mut rel_var = 0.0;

        if flags.apply_station_factor {
            let (station_eff, _) = self.maps.multi_track(sector, req.era, req.station)?;
            eff *= station_eff;
        }

        let (raddam, raddam_unc) =
            self.maps.radiation_damage(sector, req.era, req.angle, req.xi)?;
        eff *= raddam;
        if raddam > 0.0 {
            rel_var += (raddam_unc / raddam).powi(2);
        }

        if flags.apply_interpot_and_pure0 {
            eff *= self.maps.pure_zero_strip(sector, req.angle, req.era)?;

            if req.x > COORD_NA && req.y > COORD_NA {
                let (ip, ip_unc) = self.maps.interpot(sector, req.era, req.x, req.y)?;
                eff *= ip;
                if ip > 0.0 {
                    rel_var += (ip_unc / ip).powi(2);
                }
            }
        }

        Ok((eff, eff * rel_var.sqrt()))
    }
}
