//! Cognitive load model
//!
//! Computes a per-entry weighted load score and a temporally smoothed load
//! index over the most recent two weeks of check-ins.

use crate::types::{CheckIn, CognitiveLoad, Factor, LoadTier, Trend};
use crate::window::{mean, round_to, score, tail};

/// Window of check-ins considered by the load index
pub const LOAD_WINDOW: usize = 14;

/// Weight of the latest entry when blending with the window history
const CURRENT_WEIGHT: f64 = 0.6;

/// Sub-score weights (sum to 1.0)
pub const FOCUS_WEIGHT: f64 = 0.20;
pub const SLEEP_WEIGHT: f64 = 0.25;
pub const DEADLINE_WEIGHT: f64 = 0.20;
pub const SWITCHING_WEIGHT: f64 = 0.20;
pub const CLARITY_WEIGHT: f64 = 0.15;

const EMPTY_EXPLANATION: &str =
    "Awaiting initial data. Submit your first check-in to activate the cognitive modeling engine.";

/// Normalized 0-100 sub-scores for a single check-in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadComponents {
    pub focus: f64,
    pub sleep_deficit: f64,
    pub deadline: f64,
    pub switching: f64,
    pub clarity_inverse: f64,
}

impl LoadComponents {
    pub fn of(check_in: &CheckIn) -> Self {
        Self {
            focus: (check_in.focus_hours / 12.0).min(1.0) * 100.0,
            sleep_deficit: ((8.0 - check_in.sleep_hours) / 8.0).max(0.0) * 100.0,
            deadline: check_in.deadline_pressure,
            switching: check_in.task_switching,
            clarity_inverse: ((5.0 - check_in.mental_clarity) / 4.0) * 100.0,
        }
    }

    /// Weighted sum of the sub-scores
    pub fn weighted_sum(&self) -> f64 {
        self.focus * FOCUS_WEIGHT
            + self.sleep_deficit * SLEEP_WEIGHT
            + self.deadline * DEADLINE_WEIGHT
            + self.switching * SWITCHING_WEIGHT
            + self.clarity_inverse * CLARITY_WEIGHT
    }
}

/// Unsmoothed load score for a single check-in
pub fn raw_load(check_in: &CheckIn) -> f64 {
    LoadComponents::of(check_in).weighted_sum()
}

/// Raw load for every check-in in a slice
pub fn raw_loads(check_ins: &[CheckIn]) -> Vec<f64> {
    check_ins.iter().map(raw_load).collect()
}

/// Compute the smoothed load index, tier and top contributing factors.
///
/// The latest entry is blended 60/40 with the mean raw load of the earlier
/// entries in the 14-entry window, damping single-day spikes.
pub fn compute_cognitive_load(check_ins: &[CheckIn]) -> CognitiveLoad {
    let recent = tail(check_ins, LOAD_WINDOW);
    let Some((latest, prior)) = recent.split_last() else {
        return CognitiveLoad {
            load_index: 0,
            tier: LoadTier::Low,
            factors: Vec::new(),
            explanation: EMPTY_EXPLANATION.to_string(),
        };
    };

    let components = LoadComponents::of(latest);
    let current = components.weighted_sum();
    let blended = match mean(&raw_loads(prior)) {
        Some(history) => current * CURRENT_WEIGHT + history * (1.0 - CURRENT_WEIGHT),
        None => current,
    };

    let load_index = score(blended);
    let tier = LoadTier::from_score(load_index as f64);
    let factors = top_factors(&components, recent);
    let explanation = explain(&factors, tier);

    tracing::trace!(load_index, tier = tier.as_str(), "computed cognitive load");

    CognitiveLoad {
        load_index,
        tier,
        factors,
        explanation,
    }
}

/// Select the three strongest contributors by value × weight
fn top_factors(components: &LoadComponents, recent: &[CheckIn]) -> Vec<Factor> {
    let mut ranked = [
        ("Focus hours", components.focus, FOCUS_WEIGHT),
        ("Sleep deficit", components.sleep_deficit, SLEEP_WEIGHT),
        ("Deadline pressure", components.deadline, DEADLINE_WEIGHT),
        ("Task switching", components.switching, SWITCHING_WEIGHT),
        ("Mental clarity", components.clarity_inverse, CLARITY_WEIGHT),
    ];
    // Stable sort keeps declaration order on ties
    ranked.sort_by(|a, b| (b.1 * b.2).total_cmp(&(a.1 * a.2)));

    ranked
        .iter()
        .take(3)
        .map(|&(name, value, weight)| Factor {
            name: name.to_string(),
            impact: factor_trend(name, recent),
            weight: round_to(value * weight / 100.0, 2),
            description: factor_description(name, value).to_string(),
        })
        .collect()
}

/// Trend over the last three entries; only sleep and switching are tracked
fn factor_trend(name: &str, recent: &[CheckIn]) -> Trend {
    if recent.len() < 3 {
        return Trend::Stable;
    }
    let last_three = tail(recent, 3);
    let (first, last) = (&last_three[0], &last_three[2]);

    match name {
        // Less sleep means a growing deficit
        "Sleep deficit" => compare(first.sleep_hours, last.sleep_hours).reverse(),
        "Task switching" => compare(first.task_switching, last.task_switching),
        _ => Trend::Stable,
    }
}

fn compare(first: f64, last: f64) -> Trend {
    if last > first {
        Trend::Increasing
    } else if last < first {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

impl Trend {
    fn reverse(self) -> Self {
        match self {
            Trend::Increasing => Trend::Decreasing,
            Trend::Decreasing => Trend::Increasing,
            Trend::Stable => Trend::Stable,
        }
    }
}

fn factor_description(name: &str, value: f64) -> &'static str {
    let level = if value > 66.0 {
        2
    } else if value > 33.0 {
        1
    } else {
        0
    };

    let [low, moderate, high] = match name {
        "Focus hours" => [
            "Focus periods are well-balanced.",
            "Focus duration within manageable range.",
            "Extended focus periods may be depleting cognitive reserves.",
        ],
        "Sleep deficit" => [
            "Sleep pattern supportive of recovery.",
            "Slight sleep inconsistency contributing to load.",
            "Significant sleep deficit affecting cognitive capacity.",
        ],
        "Deadline pressure" => [
            "Deadline pressure minimal.",
            "Some deadline pressure present but manageable.",
            "High deadline pressure is a major contributor.",
        ],
        "Task switching" => [
            "Task flow relatively uninterrupted.",
            "Some switching — consider batching.",
            "Frequent switching fragmenting attention.",
        ],
        "Mental clarity" => [
            "Self-reported clarity is strong.",
            "Clarity moderate — small adjustments may help.",
            "Reduced clarity compounding other factors.",
        ],
        _ => return "",
    };

    match level {
        2 => high,
        1 => moderate,
        _ => low,
    }
}

fn explain(factors: &[Factor], tier: LoadTier) -> String {
    let top: Vec<String> = factors
        .iter()
        .take(2)
        .map(|f| f.name.to_lowercase())
        .collect();

    match tier {
        LoadTier::Low => match top.first() {
            Some(first) => format!(
                "Cognitive load well-managed. Monitor {} as highest contributor.",
                first
            ),
            None => "Cognitive load well-managed.".to_string(),
        },
        LoadTier::Moderate => format!(
            "Load elevated, mainly due to {}. Small adjustments could help.",
            top.join(" and ")
        ),
        LoadTier::High => format!(
            "Load high. Main contributors: {}. Prioritize recovery.",
            top.join(" and ")
        ),
    }
}
