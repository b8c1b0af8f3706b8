//! Seven-day load simulation
//!
//! Projects the upcoming week from the recent baseline and a hypothetical
//! plan. Deadlines are spread over the week as a half-sine peaking mid-week,
//! and a small daily drift models accumulated fatigue.

use crate::load::raw_loads;
use crate::stability::compute_stability_index;
use crate::types::{CheckIn, LoadTier, RiskZone, ScenarioOutcome, SimulationInput, SimulationResult};
use crate::window::{mean, round_half_up, score, tail};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Days projected by every simulation
pub const SIMULATION_DAYS: usize = 7;

/// Window of real check-ins forming the baseline
const BASELINE_WINDOW: usize = 7;

/// Coefficients of the daily projection.
///
/// `daily_drift` has no derivation beyond matching observed weekly fatigue;
/// it is exposed so deployments can tune it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Load added per elapsed day
    pub daily_drift: f64,
    /// Baseline used when there are no check-ins
    pub default_baseline: f64,
    pub baseline_weight: f64,
    pub workload_weight: f64,
    pub sleep_weight: f64,
    /// Peak load added per major deadline
    pub deadline_weight: f64,
    pub recovery_weight: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            daily_drift: 1.5,
            default_baseline: 40.0,
            baseline_weight: 0.4,
            workload_weight: 35.0,
            sleep_weight: 25.0,
            deadline_weight: 12.0,
            recovery_weight: 15.0,
        }
    }
}

/// Preset plans compared side by side
pub const SCENARIO_PRESETS: [(&str, SimulationInput); 3] = [
    (
        "High Load",
        SimulationInput {
            expected_workload: 80.0,
            major_deadlines: 3,
            planned_sleep: 6.0,
            recovery_intention: 20.0,
        },
    ),
    (
        "High Recovery",
        SimulationInput {
            expected_workload: 30.0,
            major_deadlines: 1,
            planned_sleep: 8.5,
            recovery_intention: 80.0,
        },
    ),
    (
        "Balanced",
        SimulationInput {
            expected_workload: 50.0,
            major_deadlines: 2,
            planned_sleep: 7.5,
            recovery_intention: 50.0,
        },
    ),
];

/// Project the upcoming week with the default parameters
pub fn simulate_upcoming_week(check_ins: &[CheckIn], input: &SimulationInput) -> SimulationResult {
    simulate_upcoming_week_with(check_ins, input, &SimulationParams::default())
}

/// Project the upcoming week
pub fn simulate_upcoming_week_with(
    check_ins: &[CheckIn],
    input: &SimulationInput,
    params: &SimulationParams,
) -> SimulationResult {
    let baseline =
        mean(&raw_loads(tail(check_ins, BASELINE_WINDOW))).unwrap_or(params.default_baseline);
    let workload = input.expected_workload / 100.0;
    let sleep_deficit = ((8.0 - input.planned_sleep) / 8.0).max(0.0);
    let recovery = input.recovery_intention / 100.0;

    let projected_loads: Vec<u8> = (0..SIMULATION_DAYS)
        .map(|day| {
            let day = day as f64;
            let deadline_peak =
                (day / 6.0 * PI).sin() * input.major_deadlines as f64 * params.deadline_weight;
            score(
                baseline * params.baseline_weight
                    + workload * params.workload_weight
                    + sleep_deficit * params.sleep_weight
                    + deadline_peak
                    + day * params.daily_drift
                    - recovery * params.recovery_weight,
            )
        })
        .collect();

    let risk_zones: Vec<RiskZone> = projected_loads
        .iter()
        .enumerate()
        .map(|(i, &load)| RiskZone {
            day: i as u8 + 1,
            risk: LoadTier::from_score(load as f64),
        })
        .collect();

    let high_days = risk_zones.iter().filter(|z| z.risk == LoadTier::High).count();
    let peak_day = peak_day(&projected_loads);
    let risk_probability =
        round_half_up(high_days as f64 / SIMULATION_DAYS as f64 * 100.0) as u8;

    let stability = compute_stability_index(check_ins).score as f64;
    let projected_stability = round_half_up(stability + (recovery - 0.5) * 20.0 - workload * 10.0);
    let stability_shift = (projected_stability - stability) as i32;

    let outlook = match high_days {
        0 => "your upcoming week looks manageable. Maintain planned sleep to sustain this."
            .to_string(),
        1 | 2 => format!(
            "day {} may see elevated load. Consider lighter scheduling around that period.",
            peak_day
        ),
        n => format!(
            "{} days show high cognitive load risk. Consider reducing intensity or spacing deadlines.",
            n
        ),
    };

    tracing::debug!(peak_day, high_days, "simulated upcoming week");

    SimulationResult {
        projected_loads,
        risk_zones,
        summary: format!("Based on your patterns and planned inputs, {}", outlook),
        stability_shift,
        peak_day,
        risk_probability,
    }
}

/// 1-based index of the first maximum
fn peak_day(loads: &[u8]) -> u8 {
    let mut peak = 0;
    for (i, &load) in loads.iter().enumerate() {
        if load > loads[peak] {
            peak = i;
        }
    }
    peak as u8 + 1
}

/// Run every preset plan with the default parameters
pub fn simulate_scenarios(check_ins: &[CheckIn]) -> Vec<ScenarioOutcome> {
    simulate_scenarios_with(check_ins, &SimulationParams::default())
}

/// Run every preset plan
pub fn simulate_scenarios_with(
    check_ins: &[CheckIn],
    params: &SimulationParams,
) -> Vec<ScenarioOutcome> {
    SCENARIO_PRESETS
        .iter()
        .map(|(name, input)| {
            let result = simulate_upcoming_week_with(check_ins, input, params);
            ScenarioOutcome {
                name: name.to_string(),
                loads: result.projected_loads,
                risk: result.risk_probability,
            }
        })
        .collect()
}
