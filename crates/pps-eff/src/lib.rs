//! # pps-eff
//!
//! Per-proton tagging efficiency and signal-hypothesis projection.
//!
//! Given the calibrated maps (see `pps-maps`), this crate evaluates the
//! tagging efficiency of one proton candidate, checks pixel tracks against
//! the validated acceptance, and reconciles an observed per-arm candidate
//! topology with a target signal hypothesis, producing the corrected
//! candidate snapshot and its event weight.
//!
//! Everything here is a pure function of its inputs plus the shared
//! read-only maps; per-event calls can run concurrently without locking.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod candidate;
pub mod evaluator;
pub mod fiducial;
pub mod hypothesis;
pub mod reconciler;

pub use candidate::{ArmObservation, ProtonCandidate};
pub use evaluator::{EfficiencyRequest, EvalFlags, ProtonEfficiencyEvaluator, COORD_NA};
pub use fiducial::in_fiducial;
pub use hypothesis::SignalHypothesis;
pub use reconciler::{project_final_state, ArmEfficiency, CorrectionResult};
