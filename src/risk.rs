//! Risk forecast and day-over-day system shift

use crate::load::{raw_load, raw_loads};
use crate::types::{CheckIn, RiskForecast, SystemShift};
use crate::window::{clamp_round, mean_or, round_half_up, round_to, score, std_dev, tail};

/// Window of check-ins the risk forecast looks at
pub const RISK_WINDOW: usize = 7;

/// Minimum number of check-ins before risks are estimated
pub const MIN_RISK_SAMPLES: usize = 3;

/// Ceiling for every risk percentage
const RISK_CEILING: f64 = 95.0;

/// Sleep (hours) below which a recovery deficit accrues
const SLEEP_TARGET: f64 = 7.0;

/// |Δload| above which the latest day is flagged as divergent
const DIVERGENCE_THRESHOLD: i32 = 20;

/// Burnout, instability and recovery-deficit estimates over the last week
pub fn compute_risk_forecast(check_ins: &[CheckIn]) -> RiskForecast {
    if check_ins.len() < MIN_RISK_SAMPLES {
        return RiskForecast {
            burnout_probability: 10,
            instability_risk: 15,
            recovery_deficit: 10,
        };
    }

    let recent = tail(check_ins, RISK_WINDOW);
    let loads = raw_loads(recent);
    let sigma = std_dev(&loads);
    let sleeps: Vec<f64> = recent.iter().map(|c| c.sleep_hours).collect();
    let sleep_shortfall = (SLEEP_TARGET - mean_or(&sleeps, SLEEP_TARGET)).max(0.0);

    let high_ratio = loads.iter().filter(|&&l| l > 65.0).count() as f64 / recent.len() as f64;
    let long_focus_days = recent.iter().filter(|c| c.focus_hours > 8.0).count() as f64;

    let capped = |value: f64| clamp_round(value, 0.0, RISK_CEILING) as u8;

    RiskForecast {
        burnout_probability: capped(high_ratio * 40.0 + sleep_shortfall * 10.0 + sigma * 0.8),
        instability_risk: capped(sigma * 3.5),
        recovery_deficit: capped(sleep_shortfall * 15.0 + long_focus_days * 8.0),
    }
}

/// Compare the two most recent check-ins
pub fn compute_system_shift(check_ins: &[CheckIn]) -> SystemShift {
    let n = check_ins.len();
    if n < 2 {
        return SystemShift {
            load_delta: 0,
            volatility_delta: 0.0,
            sleep_delta: 0.0,
            risk_forecast: 15,
            divergence_detected: false,
            increases: Vec::new(),
            decreases: Vec::new(),
        };
    }

    let (latest, previous) = (&check_ins[n - 1], &check_ins[n - 2]);
    let latest_load = raw_load(latest);
    let load_delta = round_half_up(latest_load - raw_load(previous)) as i32;

    let mut increases = Vec::new();
    let mut decreases = Vec::new();
    let mut track = |label: &str, now: f64, before: f64, threshold: f64| {
        if now > before + threshold {
            increases.push(label.to_string());
        }
        if now < before - threshold {
            decreases.push(label.to_string());
        }
    };
    track(
        "Deadline pressure",
        latest.deadline_pressure,
        previous.deadline_pressure,
        10.0,
    );
    track(
        "Task switching",
        latest.task_switching,
        previous.task_switching,
        10.0,
    );
    track("Sleep duration", latest.sleep_hours, previous.sleep_hours, 0.5);
    track(
        "Mental clarity",
        latest.mental_clarity,
        previous.mental_clarity,
        0.0,
    );

    // Compares today's swing with the swing two days earlier
    let volatility_delta = if n >= 4 {
        let earlier_swing = (raw_load(&check_ins[n - 3]) - raw_load(&check_ins[n - 4])).abs();
        round_to(load_delta.abs() as f64 - earlier_swing, 1)
    } else {
        0.0
    };

    let sleep_proxy = 100.0 - latest.sleep_hours * 12.0;
    let risk_forecast =
        score(latest_load * 0.6 + sleep_proxy * 0.2 + latest.deadline_pressure * 0.2);

    SystemShift {
        load_delta,
        volatility_delta,
        sleep_delta: round_to(latest.sleep_hours - previous.sleep_hours, 1),
        risk_forecast,
        divergence_detected: load_delta.abs() > DIVERGENCE_THRESHOLD,
        increases,
        decreases,
    }
}
