//! Signal-hypothesis projection of an observed proton topology.
//!
//! Given the candidates seen on each arm and the per-arm strip-tagging
//! efficiency, the projection decides whether the observation is compatible
//! with a target hypothesis and, if so, what weight the event carries under
//! it. Inputs are never mutated; the returned snapshots reflect the assumed
//! topology.
//!
//! Incompatible combinations are not errors: a zero-weight result means the
//! event does not contribute under this hypothesis.

use crate::candidate::ArmObservation;
use crate::hypothesis::SignalHypothesis;

/// Strip-tagging efficiency of one arm, with its uncertainty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmEfficiency {
    /// Efficiency value.
    pub value: f64,
    /// Absolute uncertainty on the value.
    pub uncertainty: f64,
}

impl ArmEfficiency {
    /// A fully efficient arm with no uncertainty.
    pub fn unit() -> Self {
        ArmEfficiency { value: 1.0, uncertainty: 0.0 }
    }
}

/// Outcome of projecting one event onto one hypothesis.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionResult {
    /// Positive-arm candidates under the assumed topology.
    pub positive: ArmObservation,
    /// Negative-arm candidates under the assumed topology.
    pub negative: ArmObservation,
    /// Event weight under this hypothesis.
    pub weight: f64,
    /// Uncertainty as consumed downstream. Mirrors `weight`: the yield
    /// tables this feeds read the pair as `(weight, weight)`.
    pub weight_unc: f64,
    /// Stepwise-propagated uncertainty, `weight × sqrt(Σ (δf/f)²)` over the
    /// applied factors. Not what downstream consumes; see `weight_unc`.
    pub propagated_unc: f64,
}

impl CorrectionResult {
    fn rejected(positive: ArmObservation, negative: ArmObservation) -> Self {
        CorrectionResult { positive, negative, weight: 0.0, weight_unc: 0.0, propagated_unc: 0.0 }
    }
}

/// Project the observed per-arm candidates onto a signal hypothesis.
///
/// The decision table, evaluated once per event:
/// 1. a hypothesis wanting a multi-track tag without its pixel tag is
///    impossible: both arms empty, weight 0;
/// 2. pixel presence must match the hypothesis bit on each arm, positive
///    arm checked first; a mismatch clears that arm's pixels and rejects
///    without evaluating the other arm;
/// 3. per arm: a wanted, observed multi-track tag multiplies in the
///    survival probability `eff`; a wanted, unobserved tag zeroes the
///    weight; an unwanted tag is cleared and, when one was observed,
///    multiplies in the miss probability `1 − eff`.
pub fn project_final_state(
    positive: &ArmObservation,
    positive_eff: ArmEfficiency,
    negative: &ArmObservation,
    negative_eff: ArmEfficiency,
    hypothesis: SignalHypothesis,
) -> CorrectionResult {
    if !hypothesis.is_consistent() {
        return CorrectionResult::rejected(ArmObservation::default(), ArmObservation::default());
    }

    let mut pos = positive.clone();
    let mut neg = negative.clone();

    if hypothesis.pixel_positive() != pos.has_pixel() {
        pos.pixel.clear();
        return CorrectionResult::rejected(pos, neg);
    }
    if hypothesis.pixel_negative() != neg.has_pixel() {
        neg.pixel.clear();
        return CorrectionResult::rejected(pos, neg);
    }

    let mut weight = 1.0;
    let mut rel_var = 0.0;

    reconcile_arm(&mut pos, hypothesis.multi_positive(), positive_eff, &mut weight, &mut rel_var);
    reconcile_arm(&mut neg, hypothesis.multi_negative(), negative_eff, &mut weight, &mut rel_var);

    let propagated_unc = weight * rel_var.sqrt();

    CorrectionResult { positive: pos, negative: neg, weight, weight_unc: weight, propagated_unc }
}

/// Fold one arm's multi-track observation into the running weight.
fn reconcile_arm(
    arm: &mut ArmObservation,
    want_multi: bool,
    eff: ArmEfficiency,
    weight: &mut f64,
    rel_var: &mut f64,
) {
    let observed = arm.has_multi();
    if want_multi {
        if observed {
            if eff.value > 0.0 {
                // Survival probability for the observed tag.
                *weight *= eff.value;
                *rel_var += (eff.uncertainty / eff.value).powi(2);
            }
        } else {
            // The assumed topology has no matching observation.
            *weight = 0.0;
            *rel_var = 0.0;
            arm.clear_multi();
        }
    } else {
        // The hypothesis overrides what was observed.
        arm.clear_multi();
        if observed && eff.value < 1.0 {
            // A real tag was missed by the strip stations.
            *weight *= 1.0 - eff.value;
            *rel_var += (eff.uncertainty / (1.0 - eff.value)).powi(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::ProtonCandidate;
    use approx::assert_relative_eq;

    fn candidate(station: u32) -> ProtonCandidate {
        ProtonCandidate { xi: 0.05, x: 5.0, y: 0.0, slope_x: 0.0, slope_y: 0.0, station }
    }

    fn full_arm(station: u32) -> ArmObservation {
        ArmObservation {
            multi: vec![candidate(station)],
            pixel: vec![candidate(station + 20)],
            strip: vec![candidate(station)],
        }
    }

    fn eff(value: f64, uncertainty: f64) -> ArmEfficiency {
        ArmEfficiency { value, uncertainty }
    }

    #[test]
    fn impossible_hypotheses_reject_with_empty_arms() {
        for bits in [0b0010u8, 0b1000, 0b1010, 0b1011, 0b0110] {
            let h = SignalHypothesis::new(bits);
            assert!(!h.is_consistent());
            let r = project_final_state(&full_arm(3), eff(0.8, 0.08), &full_arm(103), eff(0.9, 0.09), h);
            assert_eq!(r.weight, 0.0);
            assert_eq!(r.weight_unc, 0.0);
            assert!(r.positive.is_empty());
            assert!(r.negative.is_empty());
        }
    }

    #[test]
    fn positive_pixel_mismatch_short_circuits() {
        // Hypothesis wants a positive pixel tag; none observed. The
        // negative arm is returned untouched even though it mismatches too.
        let pos = ArmObservation { multi: vec![candidate(3)], ..Default::default() };
        let neg = full_arm(103);
        let h = SignalHypothesis::new(0b0100);
        let r = project_final_state(&pos, eff(0.8, 0.08), &neg, eff(0.9, 0.09), h);
        assert_eq!(r.weight, 0.0);
        assert_eq!(r.weight_unc, 0.0);
        assert!(!r.positive.has_pixel());
        assert_eq!(r.negative, neg);
    }

    #[test]
    fn negative_pixel_mismatch_clears_only_pixels() {
        // Positive arm matches (no pixel wanted, none observed); the
        // negative arm has an unwanted pixel tag.
        let neg = full_arm(103);
        let h = SignalHypothesis::new(0b0000);
        let r = project_final_state(
            &ArmObservation::default(),
            eff(0.8, 0.08),
            &neg,
            eff(0.9, 0.09),
            h,
        );
        assert_eq!(r.weight, 0.0);
        assert!(!r.negative.has_pixel());
        assert!(r.negative.has_multi());
    }

    #[test]
    fn survival_factor_and_terminal_uncertainty_quirk() {
        // One observed positive multi-track tag, hypothesis wants it.
        let pos = full_arm(3);
        let h = SignalHypothesis::new(0b1100);
        let r = project_final_state(
            &pos,
            eff(0.8, 0.08),
            &ArmObservation::default(),
            ArmEfficiency::unit(),
            h,
        );
        assert_relative_eq!(r.weight, 0.8, max_relative = 1e-12);
        // The uncertainty channel mirrors the weight, not the propagated
        // value.
        assert_relative_eq!(r.weight_unc, 0.8, max_relative = 1e-12);
        assert_relative_eq!(r.propagated_unc, 0.8 * 0.1, max_relative = 1e-12);
        assert!(r.positive.has_multi());
    }

    #[test]
    fn wanted_but_unobserved_multi_zeroes_the_weight() {
        let pos = ArmObservation { pixel: vec![candidate(23)], ..Default::default() };
        let h = SignalHypothesis::new(0b1100);
        let r = project_final_state(
            &pos,
            eff(0.8, 0.08),
            &ArmObservation::default(),
            ArmEfficiency::unit(),
            h,
        );
        assert_eq!(r.weight, 0.0);
        assert_eq!(r.weight_unc, 0.0);
        assert!(!r.positive.has_multi());
        assert!(r.positive.has_pixel());
    }

    #[test]
    fn unwanted_observed_multi_downweights_by_miss_probability() {
        let pos = full_arm(3);
        // Pixel tag wanted on the positive arm, multi-track tag not.
        let h = SignalHypothesis::new(0b0100);
        let r = project_final_state(
            &pos,
            eff(0.8, 0.08),
            &ArmObservation::default(),
            ArmEfficiency::unit(),
            h,
        );
        assert_relative_eq!(r.weight, 0.2, max_relative = 1e-12);
        assert!(!r.positive.has_multi());
        assert!(r.positive.strip.is_empty());
        assert!(r.positive.has_pixel());
        assert_relative_eq!(r.propagated_unc, 0.2 * (0.08 / 0.2), max_relative = 1e-12);
    }

    #[test]
    fn both_arms_multiply() {
        let h = SignalHypothesis::new(0b1111);
        let r = project_final_state(&full_arm(3), eff(0.8, 0.08), &full_arm(103), eff(0.9, 0.09), h);
        assert_relative_eq!(r.weight, 0.8 * 0.9, max_relative = 1e-12);
        let rel = ((0.08f64 / 0.8).powi(2) + (0.09f64 / 0.9).powi(2)).sqrt();
        assert_relative_eq!(r.propagated_unc, 0.72 * rel, max_relative = 1e-12);
    }

    #[test]
    fn empty_event_under_empty_hypothesis_keeps_unit_weight() {
        let r = project_final_state(
            &ArmObservation::default(),
            ArmEfficiency::unit(),
            &ArmObservation::default(),
            ArmEfficiency::unit(),
            SignalHypothesis::new(0),
        );
        assert_eq!(r.weight, 1.0);
        assert_eq!(r.weight_unc, 1.0);
        assert!(r.positive.is_empty());
        assert!(r.negative.is_empty());
    }

    #[test]
    fn projection_is_idempotent_on_its_own_output() {
        let h = SignalHypothesis::new(0b1111);
        let first =
            project_final_state(&full_arm(3), eff(0.8, 0.08), &full_arm(103), eff(0.9, 0.09), h);
        let second = project_final_state(
            &first.positive,
            eff(0.8, 0.08),
            &first.negative,
            eff(0.9, 0.09),
            h,
        );
        assert_eq!(second.weight, first.weight);
        assert_eq!(second.positive, first.positive);
        assert_eq!(second.negative, first.negative);
    }

    #[test]
    fn zero_efficiency_survival_applies_no_factor() {
        // An observed tag with zero strip efficiency leaves the weight
        // untouched rather than zeroing it.
        let h = SignalHypothesis::new(0b1100);
        let r = project_final_state(
            &full_arm(3),
            eff(0.0, 0.0),
            &ArmObservation::default(),
            ArmEfficiency::unit(),
            h,
        );
        assert_eq!(r.weight, 1.0);
        assert!(r.positive.has_multi());
    }
}
