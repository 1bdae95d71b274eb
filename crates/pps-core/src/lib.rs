//! # pps-core
//!
//! Shared value types, error type and lookup traits for the PPS
//! proton-tagging crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use traits::EfficiencyLookup;
pub use types::{CrossingAngle, Era, Sector};
