//! Typed, immutable repository of calibrated efficiency maps.

use std::collections::HashMap;
use std::path::Path;

use pps_core::{CrossingAngle, EfficiencyLookup, Era, Error, Result, Sector};
use tracing::info;

use crate::blend::{blend_surfaces, SUB_ERAS_2017C, SUB_ERAS_2017F};
use crate::histogram::{Curve1D, Surface2D};
use crate::pure0::pure0_prob;
use crate::schema::MapBundle;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MultiTrackKey {
    sector: Sector,
    era: Era,
    station: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CurveKey {
    sector: Sector,
    era: Era,
    angle: CrossingAngle,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SurfaceKey {
    sector: Sector,
    era: Era,
}

/// All efficiency maps for one run configuration, resolved by typed keys.
///
/// Built once at startup and read-only afterwards; safe to share across
/// threads for per-event evaluation.
#[derive(Debug, Default)]
pub struct EfficiencyMapRepository {
    multi_track: HashMap<MultiTrackKey, f64>,
    raddam: HashMap<CurveKey, Curve1D>,
    interpot: HashMap<SurfaceKey, Surface2D>,
}

impl EfficiencyMapRepository {
    /// Build a repository from a parsed map bundle.
    ///
    /// Validates every object, rejects duplicate keys, and composes the
    /// inclusive 2017C/2017F inter-pot surfaces from sub-era surfaces when
    /// they are present and the inclusive era is not.
    pub fn from_bundle(bundle: MapBundle) -> Result<Self> {
        let mut repo = EfficiencyMapRepository::default();

        for entry in bundle.multi_track {
            if !entry.efficiency.is_finite() || entry.efficiency < 0.0 {
                return Err(Error::Validation(format!(
                    "multi-track efficiency for sector={} era={} station={} must be finite and >=0, got {}",
                    entry.sector, entry.era, entry.station, entry.efficiency
                )));
            }
            let key =
                MultiTrackKey { sector: entry.sector, era: entry.era, station: entry.station };
            if repo.multi_track.insert(key.clone(), entry.efficiency).is_some() {
                return Err(Error::Validation(format!(
                    "duplicate multi-track entry for sector={} era={} station={}",
                    key.sector, key.era, key.station
                )));
            }
        }

        for entry in bundle.radiation_damage {
            let name = format!(
                "raddam sector={} era={} angle={}",
                entry.sector, entry.era, entry.angle
            );
            let curve = Curve1D::new(name, entry.bin_edges, entry.values, entry.errors)?;
            let key = CurveKey { sector: entry.sector, era: entry.era, angle: entry.angle };
            if repo.raddam.insert(key.clone(), curve).is_some() {
                return Err(Error::Validation(format!(
                    "duplicate radiation-damage curve for sector={} era={} angle={}",
                    key.sector, key.era, key.angle
                )));
            }
        }

        for entry in bundle.interpot {
            let name = format!("interpot sector={} era={}", entry.sector, entry.era);
            let surface =
                Surface2D::new(name, entry.x_edges, entry.y_edges, entry.values, entry.errors)?;
            let key = SurfaceKey { sector: entry.sector, era: entry.era };
            if repo.interpot.insert(key.clone(), surface).is_some() {
                return Err(Error::Validation(format!(
                    "duplicate inter-pot surface for sector={} era={}",
                    key.sector, key.era
                )));
            }
        }

        repo.compose_inclusive_eras()?;

        info!(
            multi_track = repo.multi_track.len(),
            raddam = repo.raddam.len(),
            interpot = repo.interpot.len(),
            "loaded efficiency maps"
        );
        Ok(repo)
    }

    /// Read, parse and build a repository from a JSON bundle file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bundle(MapBundle::from_path(path)?)
    }

    fn compose_inclusive_eras(&mut self) -> Result<()> {
        for (inclusive, sub_eras) in [("2017C", SUB_ERAS_2017C), ("2017F", SUB_ERAS_2017F)] {
            for sector in [Sector::S45, Sector::S56] {
                let inclusive_key = SurfaceKey { sector, era: Era::from(inclusive) };
                if self.interpot.contains_key(&inclusive_key) {
                    continue;
                }
                let subs: Vec<&Surface2D> = sub_eras
                    .iter()
                    .filter_map(|(label, _)| {
                        self.interpot.get(&SurfaceKey { sector, era: Era::from(*label) })
                    })
                    .collect();
                if subs.len() != sub_eras.len() {
                    // Blending needs every sub-era; partial input keeps
                    // whatever the bundle declared.
                    continue;
                }
                let parts: Vec<(&Surface2D, f64)> =
                    subs.into_iter().zip(sub_eras.iter().map(|(_, w)| *w)).collect();
                let name = format!("interpot sector={sector} era={inclusive}");
                let blended = blend_surfaces(name, &parts)?;
                self.interpot.insert(inclusive_key, blended);
            }
        }
        Ok(())
    }

    /// Total number of loaded map objects.
    pub fn len(&self) -> usize {
        self.multi_track.len() + self.raddam.len() + self.interpot.len()
    }

    /// Whether the repository holds no maps at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The radiation-damage curve for a key, or `LookupMiss`.
    pub fn raddam_curve(
        &self,
        sector: Sector,
        era: &Era,
        angle: CrossingAngle,
    ) -> Result<&Curve1D> {
        self.raddam
            .get(&CurveKey { sector, era: era.clone(), angle })
            .ok_or_else(|| Error::LookupMiss(format!("raddam sector={sector} era={era} angle={angle}")))
    }

    /// The inter-pot surface for a key, or `LookupMiss`.
    pub fn interpot_surface(&self, sector: Sector, era: &Era) -> Result<&Surface2D> {
        self.interpot
            .get(&SurfaceKey { sector, era: era.clone() })
            .ok_or_else(|| Error::LookupMiss(format!("interpot sector={sector} era={era}")))
    }

    /// Keys of the loaded radiation-damage curves, in no particular order.
    pub fn raddam_keys(&self) -> impl Iterator<Item = (Sector, &Era, CrossingAngle)> {
        self.raddam.keys().map(|k| (k.sector, &k.era, k.angle))
    }
}

impl EfficiencyLookup for EfficiencyMapRepository {
    fn multi_track(&self, sector: Sector, era: &Era, station: u32) -> Result<(f64, f64)> {
        self.multi_track
            .get(&MultiTrackKey { sector, era: era.clone(), station })
            .map(|&eff| (eff, 0.0))
            .ok_or_else(|| {
                Error::LookupMiss(format!("multi-track sector={sector} era={era} station={station}"))
            })
    }

    fn radiation_damage(
        &self,
        sector: Sector,
        era: &Era,
        angle: CrossingAngle,
        xi: f64,
    ) -> Result<(f64, f64)> {
        Ok(self.raddam_curve(sector, era, angle)?.content_at(xi))
    }

    fn interpot(&self, sector: Sector, era: &Era, x: f64, y: f64) -> Result<(f64, f64)> {
        Ok(self.interpot_surface(sector, era)?.content_at(x, y))
    }

    fn pure_zero_strip(&self, sector: Sector, angle: CrossingAngle, era: &Era) -> Result<f64> {
        pure0_prob(sector, angle, era).ok_or_else(|| {
            Error::LookupMiss(format!("pure zero-strip sector={sector} angle={angle} era={era}"))
        })
    }
}
