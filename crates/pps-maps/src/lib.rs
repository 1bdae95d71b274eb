//! # pps-maps
//!
//! Calibrated proton-tagging efficiency maps: binned 1-D curves and 2-D
//! surfaces with paired uncertainties, the hard-coded pure-zero-strip
//! probability table, and the immutable repository resolving typed keys to
//! `(value, uncertainty)` pairs.
//!
//! Maps are loaded once from a JSON bundle at startup and shared read-only
//! across all per-event evaluations.
//!
//! ## Example
//!
//! ```no_run
//! use pps_core::{CrossingAngle, EfficiencyLookup, Era, Sector};
//! use pps_maps::EfficiencyMapRepository;
//!
//! let repo = EfficiencyMapRepository::from_path("maps.json").unwrap();
//! let (eff, unc) = repo
//!     .radiation_damage(Sector::S45, &Era::from("2017B"), CrossingAngle::new(120), 0.035)
//!     .unwrap();
//! println!("{eff} +/- {unc}");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod blend;
pub mod histogram;
pub mod pure0;
pub mod repository;
pub mod schema;

pub use blend::blend_surfaces;
pub use histogram::{Curve1D, Surface2D};
pub use pure0::pure0_prob;
pub use repository::EfficiencyMapRepository;
pub use schema::{CurveEntry, MapBundle, MultiTrackEntry, SurfaceEntry};
