//! Stability model
//!
//! Stability is the inverse of rolling load volatility: a population standard
//! deviation of raw load over the last two weeks, scaled as `100 - 3σ`.

use crate::load::raw_loads;
use crate::types::{CheckIn, StabilityIndex};
use crate::window::{mean_or, round_to, score, std_dev, tail};

/// Window of check-ins considered by the stability score
pub const STABILITY_WINDOW: usize = 14;

/// Minimum number of check-ins before a score is reported
pub const MIN_STABILITY_SAMPLES: usize = 3;

/// Trend threshold (load points) between consecutive three-day means
const PROJECTION_THRESHOLD: f64 = 5.0;

/// Compute the stability index over the last 14 check-ins
pub fn compute_stability_index(check_ins: &[CheckIn]) -> StabilityIndex {
    if check_ins.len() < MIN_STABILITY_SAMPLES {
        return calibrating();
    }

    let loads = raw_loads(tail(check_ins, STABILITY_WINDOW));
    let sigma = std_dev(&loads);
    let score = score((100.0 - sigma * 3.0).max(0.0));

    let (label, description) = if score >= 70 {
        (
            "Stable",
            "Consistent cognitive load. Stability predicts sustained performance.",
        )
    } else if score >= 40 {
        (
            "Variable",
            "Some fluctuation. Moderate variability worth monitoring.",
        )
    } else {
        (
            "Volatile",
            "Significant fluctuation. Instability predicts burnout more than raw intensity.",
        )
    };

    StabilityIndex {
        score,
        label: label.to_string(),
        description: description.to_string(),
        volatility_index: round_to(sigma, 1),
        std_dev: sigma,
        pattern_regularity: pattern_regularity(sigma).to_string(),
        projection: project(&loads).to_string(),
    }
}

/// Regularity bucket for a load standard deviation
pub fn pattern_regularity(sigma: f64) -> &'static str {
    if sigma < 8.0 {
        "Regular"
    } else if sigma < 15.0 {
        "Variable"
    } else {
        "Irregular"
    }
}

/// Short-term projection: last three loads against the (up to) three before
fn project(loads: &[f64]) -> &'static str {
    if loads.len() < 5 {
        return "Maintaining current trajectory";
    }

    let (earlier, last_three) = loads.split_at(loads.len() - 3);
    let before = tail(earlier, 3);
    let delta = mean_or(last_three, 0.0) - mean_or(before, 0.0);

    if delta > PROJECTION_THRESHOLD {
        "Load trending upward — monitor closely"
    } else if delta < -PROJECTION_THRESHOLD {
        "Load trending downward — positive trajectory"
    } else {
        "Stable trajectory maintained"
    }
}

fn calibrating() -> StabilityIndex {
    StabilityIndex {
        score: 50,
        label: "Calibrating".to_string(),
        description: "Need at least 3 check-ins.".to_string(),
        volatility_index: 0.0,
        std_dev: 0.0,
        pattern_regularity: "Unknown".to_string(),
        projection: "Gathering data".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::tests::entry;
    use pretty_assertions::assert_eq;

    /// Check-in whose raw load is exactly `0.2 * (deadline + switching)`
    fn with_load(load: f64) -> CheckIn {
        entry(0.0, 8.0, load * 2.5, load * 2.5, 5.0)
    }

    #[test]
    fn test_two_entries_are_calibrating() {
        let result = compute_stability_index(&[with_load(90.0), with_load(5.0)]);
        assert_eq!(result.score, 50);
        assert_eq!(result.label, "Calibrating");
        assert!(result.is_calibrating());
        assert_eq!(result.pattern_regularity, "Unknown");
    }

    #[test]
    fn test_constant_load_is_fully_stable() {
        let result = compute_stability_index(&vec![with_load(30.0); 6]);
        assert_eq!(result.score, 100);
        assert_eq!(result.label, "Stable");
        assert_eq!(result.pattern_regularity, "Regular");
        assert_eq!(result.projection, "Stable trajectory maintained");
        assert_eq!(result.volatility_index, 0.0);
    }

    #[test]
    fn test_alternating_load_is_volatile() {
        // Alternating 20/60 has σ = 20, so score = 100 - 60 = 40
        let check_ins: Vec<_> = (0..8)
            .map(|i| with_load(if i % 2 == 0 { 20.0 } else { 60.0 }))
            .collect();
        let result = compute_stability_index(&check_ins);
        assert_eq!(result.score, 40);
        assert_eq!(result.label, "Variable");
        assert_eq!(result.pattern_regularity, "Irregular");
        assert!((result.std_dev - 20.0).abs() < 1e-9);

        let wilder: Vec<_> = (0..8)
            .map(|i| with_load(if i % 2 == 0 { 0.0 } else { 80.0 }))
            .collect();
        let result = compute_stability_index(&wilder);
        assert_eq!(result.score, 0);
        assert_eq!(result.label, "Volatile");
    }

    #[test]
    fn test_projection_directions() {
        let rising: Vec<_> = [20.0, 20.0, 20.0, 40.0, 40.0, 40.0]
            .into_iter()
            .map(with_load)
            .collect();
        assert_eq!(
            compute_stability_index(&rising).projection,
            "Load trending upward — monitor closely"
        );

        let falling: Vec<_> = rising.iter().rev().cloned().collect();
        assert_eq!(
            compute_stability_index(&falling).projection,
            "Load trending downward — positive trajectory"
        );

        let short: Vec<_> = [20.0, 40.0, 60.0, 80.0].into_iter().map(with_load).collect();
        assert_eq!(
            compute_stability_index(&short).projection,
            "Maintaining current trajectory"
        );
    }

    #[test]
    fn test_projection_with_five_points_uses_two_prior() {
        // last three mean 30, prior two mean 20
        let loads: Vec<_> = [20.0, 20.0, 30.0, 30.0, 30.0].into_iter().map(with_load).collect();
        assert_eq!(
            compute_stability_index(&loads).projection,
            "Load trending upward — monitor closely"
        );
    }
}
