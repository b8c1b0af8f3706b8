//! Archetype classifier
//!
//! Classifies the last three weeks of check-ins into a named behavioral
//! archetype. Rules are evaluated top-down and the first match wins; the
//! order of [`RULES`] is the precedence.

use crate::load::raw_loads;
use crate::types::{Archetype, CheckIn};
use crate::window::{mean_or, round_half_up, std_dev, tail};
use serde::{Deserialize, Serialize};

/// Window of check-ins the classifier looks at
pub const ARCHETYPE_WINDOW: usize = 21;

/// Minimum number of check-ins before an archetype is assigned
pub const MIN_ARCHETYPE_SAMPLES: usize = 7;

/// Tunable thresholds for the rule cascade.
///
/// These are heuristics; the defaults reproduce the reference classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeThresholds {
    /// Raw load above which a day counts as high-load
    pub high_day_load: f64,
    /// Deadline pressure above which a day counts as a deadline spike
    pub deadline_spike_pressure: f64,
    /// Burst Performer: minimum σ
    pub burst_std_dev: f64,
    /// Burst Performer: minimum share of high-load days
    pub burst_high_day_ratio: f64,
    /// Burst Performer and Recovery Dependent: minimum recovery patterns
    pub min_recovery_patterns: u32,
    /// Deadline Reactor: minimum share of deadline-spike days
    pub deadline_spike_ratio: f64,
    /// Elastic Thinker: minimum σ
    pub elastic_std_dev: f64,
    /// Elastic Thinker: minimum mean load
    pub elastic_mean_load: f64,
    /// Recovery Dependent: minimum mean sleep (hours)
    pub recovery_min_sleep: f64,
    /// Steady Builder: maximum σ
    pub steady_std_dev: f64,
    /// Steady Builder: maximum mean load
    pub steady_mean_load: f64,
}

impl Default for ArchetypeThresholds {
    fn default() -> Self {
        Self {
            high_day_load: 65.0,
            deadline_spike_pressure: 70.0,
            burst_std_dev: 18.0,
            burst_high_day_ratio: 0.30,
            min_recovery_patterns: 2,
            deadline_spike_ratio: 0.35,
            elastic_std_dev: 14.0,
            elastic_mean_load: 45.0,
            recovery_min_sleep: 6.5,
            steady_std_dev: 12.0,
            steady_mean_load: 55.0,
        }
    }
}

/// Rolling statistics the rules are evaluated against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub len: usize,
    pub mean_load: f64,
    pub std_dev: f64,
    pub high_days: u32,
    pub deadline_spikes: u32,
    pub mean_sleep: f64,
    pub recovery_patterns: u32,
}

impl WindowStats {
    pub fn compute(window: &[CheckIn], thresholds: &ArchetypeThresholds) -> Self {
        let loads = raw_loads(window);
        let sleeps: Vec<f64> = window.iter().map(|c| c.sleep_hours).collect();

        Self {
            len: window.len(),
            mean_load: mean_or(&loads, 0.0),
            std_dev: std_dev(&loads),
            high_days: loads.iter().filter(|&&l| l > thresholds.high_day_load).count() as u32,
            deadline_spikes: window
                .iter()
                .filter(|c| c.deadline_pressure > thresholds.deadline_spike_pressure)
                .count() as u32,
            mean_sleep: mean_or(&sleeps, 0.0),
            recovery_patterns: count_recovery_patterns(&loads),
        }
    }

    fn share(&self, count: u32) -> f64 {
        if self.len == 0 {
            0.0
        } else {
            count as f64 / self.len as f64
        }
    }
}

/// Count high-to-low transitions: a day above 60 followed by two days below 45
pub fn count_recovery_patterns(loads: &[f64]) -> u32 {
    loads
        .windows(3)
        .filter(|w| w[0] > 60.0 && w[1] < 45.0 && w[2] < 45.0)
        .count() as u32
}

type Predicate = fn(&WindowStats, &ArchetypeThresholds) -> bool;
type Builder = fn(&WindowStats) -> ArchetypeProfile;

/// Fixed text attached to an archetype
pub struct ArchetypeProfile {
    pub name: &'static str,
    pub description: &'static str,
    pub pattern: String,
    pub stress_response: &'static str,
    pub behavior_signature: &'static str,
}

/// Ordered rule cascade; the first matching predicate decides
pub const RULES: &[(Predicate, Builder)] = &[
    (is_burst_performer, burst_performer),
    (is_deadline_reactor, deadline_reactor),
    (is_elastic_thinker, elastic_thinker),
    (is_recovery_dependent, recovery_dependent),
    (is_steady_builder, steady_builder),
];

fn is_burst_performer(s: &WindowStats, t: &ArchetypeThresholds) -> bool {
    s.std_dev > t.burst_std_dev
        && s.share(s.high_days) > t.burst_high_day_ratio
        && s.recovery_patterns >= t.min_recovery_patterns
}

fn is_deadline_reactor(s: &WindowStats, t: &ArchetypeThresholds) -> bool {
    s.share(s.deadline_spikes) > t.deadline_spike_ratio
}

fn is_elastic_thinker(s: &WindowStats, t: &ArchetypeThresholds) -> bool {
    s.std_dev > t.elastic_std_dev && s.mean_load > t.elastic_mean_load
}

fn is_recovery_dependent(s: &WindowStats, t: &ArchetypeThresholds) -> bool {
    s.recovery_patterns >= t.min_recovery_patterns && s.mean_sleep >= t.recovery_min_sleep
}

fn is_steady_builder(s: &WindowStats, t: &ArchetypeThresholds) -> bool {
    s.std_dev < t.steady_std_dev && s.mean_load < t.steady_mean_load
}

fn burst_performer(s: &WindowStats) -> ArchetypeProfile {
    ArchetypeProfile {
        name: "Burst Performer",
        description: "High-intensity bursts followed by recovery. Effective but carries crash risk.",
        pattern: format!(
            "Intensity spikes followed by {}-day recovery periods.",
            s.recovery_patterns
        ),
        stress_response: "Absorbs pressure then crashes — needs deliberate decompression",
        behavior_signature: "High amplitude oscillation with recovery dependency",
    }
}

fn deadline_reactor(s: &WindowStats) -> ArchetypeProfile {
    ArchetypeProfile {
        name: "Deadline Reactor",
        description: "Load spikes notably under deadline pressure. Thrives with external structure.",
        pattern: format!(
            "{} of {} days showed high deadline pressure.",
            s.deadline_spikes, s.len
        ),
        stress_response: "Performance amplifies under deadline proximity",
        behavior_signature: "Pressure-driven activation with anticipatory load building",
    }
}

fn elastic_thinker(_: &WindowStats) -> ArchetypeProfile {
    ArchetypeProfile {
        name: "Elastic Thinker",
        description: "Highly adaptive cognitive patterns. Flexes between modes rapidly.",
        pattern: "Wide load range with quick transitions between states.".to_string(),
        stress_response: "Absorbs varied demands but risks over-extension",
        behavior_signature: "High-bandwidth cognitive switching with moderate recovery needs",
    }
}

fn recovery_dependent(s: &WindowStats) -> ArchetypeProfile {
    ArchetypeProfile {
        name: "Recovery Dependent",
        description: "Relies on deliberate recovery windows. Works well when rest is protected.",
        pattern: format!("{} clear recovery cycles detected.", s.recovery_patterns),
        stress_response: "Degrades without recovery windows — needs protected downtime",
        behavior_signature: "Performance sustained through intentional recovery cycling",
    }
}

fn steady_builder(_: &WindowStats) -> ArchetypeProfile {
    ArchetypeProfile {
        name: "Steady Builder",
        description: "Consistent output with low volatility. Most sustainable long-term pattern.",
        pattern: "Low variance, moderate intensity. Supports sustained performance.".to_string(),
        stress_response: "Resilient under consistent load, may struggle with sudden spikes",
        behavior_signature: "Low-amplitude consistent output with strong baseline maintenance",
    }
}

fn adaptive_thinker(s: &WindowStats) -> ArchetypeProfile {
    ArchetypeProfile {
        name: "Adaptive Thinker",
        description: "Flexible cognitive strategies adapting across contexts.",
        pattern: format!(
            "Average load {} with moderate variability.",
            round_half_up(s.mean_load)
        ),
        stress_response: "Context-dependent — adapts strategy to demand type",
        behavior_signature: "Multi-modal cognitive approach without dominant pattern",
    }
}

/// Classify with the default thresholds
pub fn determine_cognitive_archetype(check_ins: &[CheckIn]) -> Archetype {
    determine_cognitive_archetype_with(check_ins, &ArchetypeThresholds::default())
}

/// Classify the last 21 check-ins against the given thresholds
pub fn determine_cognitive_archetype_with(
    check_ins: &[CheckIn],
    thresholds: &ArchetypeThresholds,
) -> Archetype {
    let n = check_ins.len();
    if n < MIN_ARCHETYPE_SAMPLES {
        return Archetype {
            name: "Emerging".to_string(),
            description: format!("{} more check-ins needed.", MIN_ARCHETYPE_SAMPLES - n),
            pattern: String::new(),
            available: false,
            confidence: round_half_up(n as f64 / MIN_ARCHETYPE_SAMPLES as f64 * 40.0) as u8,
            stress_response: String::new(),
            behavior_signature: String::new(),
        };
    }

    let stats = WindowStats::compute(tail(check_ins, ARCHETYPE_WINDOW), thresholds);
    let build = RULES
        .iter()
        .find(|(matches, _)| matches(&stats, thresholds))
        .map(|&(_, build)| build)
        .unwrap_or(adaptive_thinker);
    let profile = build(&stats);

    let confidence = if n >= 21 {
        95
    } else if n >= 14 {
        78
    } else {
        55
    };

    tracing::debug!(archetype = profile.name, confidence, "classified archetype");

    Archetype {
        name: profile.name.to_string(),
        description: profile.description.to_string(),
        pattern: profile.pattern,
        available: true,
        confidence,
        stress_response: profile.stress_response.to_string(),
        behavior_signature: profile.behavior_signature.to_string(),
    }
}
