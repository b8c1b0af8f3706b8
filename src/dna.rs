//! Cognitive DNA: a long-run behavioral profile over the full history

use crate::elasticity::compute_elasticity;
use crate::load::raw_loads;
use crate::types::{CheckIn, CognitiveDna, Spectrum};
use crate::window::{mean, mean_or, round_half_up, score, std_dev, tail};

/// Window for the sleep, deadline and switching traits
const TRAIT_WINDOW: usize = 14;

/// Neutral value reported for traits without enough data
const NEUTRAL: u8 = 50;

pub fn compute_cognitive_dna(check_ins: &[CheckIn]) -> CognitiveDna {
    let loads = raw_loads(check_ins);
    let recent = tail(check_ins, TRAIT_WINDOW);

    let baseline_range = match (
        loads.iter().copied().reduce(f64::min),
        loads.iter().copied().reduce(f64::max),
    ) {
        (Some(low), Some(high)) => (round_half_up(low) as i32, round_half_up(high) as i32),
        _ => (30, 60),
    };
    let mean_load = mean(&loads).unwrap_or(45.0);
    let sigma = if loads.len() > 1 { std_dev(&loads) } else { 10.0 };

    let reactivity_index = if loads.len() > 1 {
        let swings: Vec<f64> = loads.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
        score(mean_or(&swings, 0.0) * 3.0)
    } else {
        NEUTRAL
    };

    let elasticity = compute_elasticity(check_ins);

    let deadline_amplification = if check_ins.len() >= 5 {
        let heavy = recent.iter().filter(|c| c.deadline_pressure > 60.0).count();
        score(heavy as f64 / recent.len() as f64 * 150.0)
    } else {
        NEUTRAL
    };

    let switching: Vec<f64> = recent.iter().map(|c| c.task_switching).collect();
    let task_switching_friction = score(mean_or(&switching, 40.0));

    let cognitive_age = round_half_up(
        25.0 + mean_load / 100.0 * 15.0 + sigma / 30.0 * 10.0
            - elasticity.score as f64 / 100.0 * 8.0,
    ) as i32;

    let spectrum = |label: &str, left: &str, right: &str, value: i32| Spectrum {
        label: label.to_string(),
        left: left.to_string(),
        right: right.to_string(),
        value,
    };
    let spectrums = vec![
        spectrum("Processing", "Reactor", "Stabilizer", 100 - reactivity_index as i32),
        spectrum("Focus", "Deep Diver", "Switcher", task_switching_friction as i32),
        spectrum("Resilience", "Elastic", "Brittle", 100 - elasticity.score as i32),
        spectrum("Pressure", "Thrives", "Fractures", 100 - deadline_amplification as i32),
    ];

    CognitiveDna {
        baseline_range,
        reactivity_index,
        recovery_velocity: elasticity.recovery_velocity,
        sleep_sensitivity: sleep_sensitivity(recent),
        deadline_amplification,
        task_switching_friction,
        cognitive_age,
        spectrums,
    }
}

/// Load gap between short-sleep (<6.5h) and rested (≥7h) days
fn sleep_sensitivity(recent: &[CheckIn]) -> u8 {
    if recent.len() < 5 {
        return NEUTRAL;
    }
    let loads_where = |keep: fn(f64) -> bool| -> Vec<f64> {
        recent
            .iter()
            .filter(|c| keep(c.sleep_hours))
            .map(crate::load::raw_load)
            .collect()
    };

    match (
        mean(&loads_where(|s| s < 6.5)),
        mean(&loads_where(|s| s >= 7.0)),
    ) {
        (Some(short), Some(rested)) => score((short - rested).abs() * 2.0),
        _ => NEUTRAL,
    }
}
