//! Luminosity-weighted era averaging of inter-pot surfaces.
//!
//! Eras 2017C and 2017F were calibrated per sub-era; the inclusive-era
//! surface is the weighted sum of the sub-era surfaces, with weights fixed
//! by the recorded luminosity of each sub-era.

use pps_core::{Error, Result};

use crate::histogram::Surface2D;

/// Sub-era luminosity weights composing the inclusive 2017C surface.
pub const SUB_ERAS_2017C: &[(&str, f64)] = &[("2017C1", 0.62), ("2017C2", 0.38)];

/// Sub-era luminosity weights composing the inclusive 2017F surface.
pub const SUB_ERAS_2017F: &[(&str, f64)] = &[("2017F1", 0.13), ("2017F2", 0.59), ("2017F3", 0.28)];

/// Weighted sum of surfaces sharing one binning. Bin errors combine in
/// quadrature with the same weights.
pub fn blend_surfaces(name: impl Into<String>, parts: &[(&Surface2D, f64)]) -> Result<Surface2D> {
    let name = name.into();
    let (first, _) = parts
        .first()
        .ok_or_else(|| Error::Validation(format!("blend '{name}': no input surfaces")))?;

    for (s, _) in parts {
        if !first.same_binning(s) {
            return Err(Error::Validation(format!(
                "blend '{name}': binning mismatch between '{}' and '{}'",
                first.name, s.name
            )));
        }
    }

    let n = first.values.len();
    let mut values = vec![0.0; n];
    let mut var = vec![0.0; n];
    for (s, w) in parts {
        for i in 0..n {
            values[i] += w * s.values[i];
            var[i] += (w * s.errors[i]).powi(2);
        }
    }
    let errors = var.into_iter().map(f64::sqrt).collect();

    Surface2D::new(name, first.x_edges.clone(), first.y_edges.clone(), values, errors)
}
