//! Elasticity and model confidence
//!
//! Elasticity measures how quickly load falls back after a spike. Model
//! confidence bands are step functions of how many check-ins exist.

use crate::load::raw_loads;
use crate::types::{CheckIn, Elasticity, ModelConfidence};
use crate::window::{score, tail};

/// Window of check-ins scanned for spikes
pub const ELASTICITY_WINDOW: usize = 14;

/// Minimum number of check-ins before elasticity is reported
pub const MIN_ELASTICITY_SAMPLES: usize = 5;

/// Day-over-day rise (load points) that counts as a spike
const SPIKE_THRESHOLD: f64 = 15.0;

/// Drop below the spike value (load points) that counts as recovered
const RECOVERY_MARGIN: f64 = 10.0;

/// Assumed recovery time when no spike is present
const DEFAULT_RECOVERY_DAYS: f64 = 2.0;

/// Compute elasticity over the last 14 check-ins
pub fn compute_elasticity(check_ins: &[CheckIn]) -> Elasticity {
    if check_ins.len() < MIN_ELASTICITY_SAMPLES {
        return Elasticity {
            score: 50,
            label: "Calibrating".to_string(),
            interpretation: "Gathering data to measure cognitive elasticity.".to_string(),
            buffering: "Unknown".to_string(),
            recovery_velocity: 0,
        };
    }

    let recent = tail(check_ins, ELASTICITY_WINDOW);
    let loads = raw_loads(recent);
    let recoveries = spike_recoveries(&loads);

    let mean_recovery = if recoveries.is_empty() {
        DEFAULT_RECOVERY_DAYS
    } else {
        recoveries.iter().sum::<u32>() as f64 / recoveries.len() as f64
    };

    let score = score(100.0 - mean_recovery * 20.0);
    let (label, interpretation) = if score >= 70 {
        ("High", "Quick recovery from spikes — high adaptive capacity.")
    } else if score >= 40 {
        (
            "Moderate",
            "Moderate recovery rate — rebounds within expected parameters.",
        )
    } else {
        (
            "Low",
            "Slower recovery from spikes — consider protective strategies.",
        )
    };

    // A spike on the final day recovers in zero observed days
    let recovery_velocity = if recoveries.is_empty() {
        50
    } else if mean_recovery <= 0.0 {
        100
    } else {
        crate::window::score(100.0 / mean_recovery)
    };

    Elasticity {
        score,
        label: label.to_string(),
        interpretation: interpretation.to_string(),
        buffering: buffering(recent).to_string(),
        recovery_velocity,
    }
}

/// Days needed to recover from each spike in the series.
///
/// For a spike at `i`, days are counted from `i + 1` until a value drops below
/// `spike - 10` (that day included) or the series ends.
pub fn spike_recoveries(loads: &[f64]) -> Vec<u32> {
    (1..loads.len())
        .filter(|&i| loads[i] > loads[i - 1] + SPIKE_THRESHOLD)
        .map(|i| {
            let target = loads[i] - RECOVERY_MARGIN;
            let mut days = 0;
            for &later in &loads[i + 1..] {
                days += 1;
                if later < target {
                    break;
                }
            }
            days
        })
        .collect()
}

/// Buffering strength from the number of light days (low focus, low pressure)
fn buffering(recent: &[CheckIn]) -> &'static str {
    let light_days = recent
        .iter()
        .filter(|c| c.focus_hours < 5.0 && c.deadline_pressure < 30.0)
        .count();

    match light_days {
        0 => "Weak",
        1 | 2 => "Moderate",
        _ => "Strong",
    }
}

/// Data, pattern and projection confidence for a history of `n` check-ins
pub fn compute_model_confidence(check_ins: &[CheckIn]) -> ModelConfidence {
    let n = check_ins.len();

    let pattern = match n {
        0..=2 => 10,
        3..=6 => 35,
        7..=13 => 60,
        14..=20 => 80,
        _ => 95,
    };
    let projection = match n {
        0..=4 => 15,
        5..=9 => 40,
        10..=20 => 65,
        _ => 90,
    };

    ModelConfidence {
        data: score(n as f64 / 21.0 * 100.0),
        pattern,
        projection,
    }
}
