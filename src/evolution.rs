//! Longitudinal evolution level

use crate::elasticity::compute_elasticity;
use crate::stability::compute_stability_index;
use crate::types::{CheckIn, EvolutionLevel};
use crate::window::round_half_up;

/// Check-ins needed for full progress
const FULL_PROGRESS_SAMPLES: usize = 30;

/// Minimum history before half-over-half improvements are computed
const MIN_COMPARISON_SAMPLES: usize = 14;

const MILESTONES: [(usize, &str); 5] = [
    (1, "First check-in completed"),
    (7, "One week of data"),
    (14, "Archetype identified"),
    (21, "Full pattern confidence"),
    (30, "Longitudinal analysis available"),
];

/// (level, name, minimum check-ins, minimum stability score), highest first
const LEVELS: [(u8, &str, usize, u8); 4] = [
    (5, "Cognitive Strategist", 30, 70),
    (4, "Self-Regulating", 21, 55),
    (3, "Adaptive", 14, 40),
    (2, "Aware", 7, 0),
];

pub fn compute_evolution(check_ins: &[CheckIn]) -> EvolutionLevel {
    let n = check_ins.len();

    let milestones = MILESTONES
        .iter()
        .filter(|(required, _)| n >= *required)
        .map(|(_, label)| label.to_string())
        .collect();

    let (stability_improvement, volatility_reduction, recovery_strengthening) =
        if n >= MIN_COMPARISON_SAMPLES {
            let (first, second) = check_ins.split_at(n / 2);
            let (stab1, stab2) = (compute_stability_index(first), compute_stability_index(second));
            let (elast1, elast2) = (compute_elasticity(first), compute_elasticity(second));
            (
                stab2.score as i32 - stab1.score as i32,
                round_half_up((stab1.std_dev - stab2.std_dev) / stab1.std_dev.max(1.0) * 100.0)
                    as i32,
                elast2.score as i32 - elast1.score as i32,
            )
        } else {
            (0, 0, 0)
        };

    let stability = compute_stability_index(check_ins).score;
    let (level, name) = LEVELS
        .iter()
        .find(|&&(_, _, min_n, min_stability)| n >= min_n && stability >= min_stability)
        .map(|&(level, name, _, _)| (level, name))
        .unwrap_or((1, "Reactive"));

    EvolutionLevel {
        level,
        name: name.to_string(),
        progress: (round_half_up(n as f64 / FULL_PROGRESS_SAMPLES as f64 * 100.0)).min(100.0)
            as u8,
        stability_improvement,
        volatility_reduction,
        recovery_strengthening,
        milestones,
    }
}
