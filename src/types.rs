//! Core types for the Cogload engine
//!
//! This module defines the check-in record every model consumes and the value
//! objects returned by every model. Results carry no identity; they are
//! recomputed on every call from the check-in sequence.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One daily self-reported check-in.
///
/// Field names follow the persisted record format (camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    /// Unique record identifier
    pub id: String,
    /// Calendar date this check-in describes
    pub date: NaiveDate,
    /// Hours of focused work (0-16)
    pub focus_hours: f64,
    /// Hours slept (0-12)
    pub sleep_hours: f64,
    /// Perceived deadline pressure (0-100)
    pub deadline_pressure: f64,
    /// Perceived task switching (0-100)
    pub task_switching: f64,
    /// Self-rated mental clarity (1-5)
    pub mental_clarity: f64,
    /// Optional one-word mood label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_word: Option<String>,
}

impl CheckIn {
    /// Create a check-in with a fresh random identifier
    pub fn new(
        date: NaiveDate,
        focus_hours: f64,
        sleep_hours: f64,
        deadline_pressure: f64,
        task_switching: f64,
        mental_clarity: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            focus_hours,
            sleep_hours,
            deadline_pressure,
            task_switching,
            mental_clarity,
            mood_word: None,
        }
    }

    /// Attach a mood label
    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.mood_word = Some(mood.into());
        self
    }

    /// Check every field against its documented range.
    ///
    /// The analytics never call this; it exists for ingestion tooling that
    /// wants to reject obviously broken records before they are stored.
    pub fn validate(&self) -> Vec<FieldViolation> {
        let checks: [(&'static str, f64, f64, f64); 5] = [
            ("focusHours", self.focus_hours, 0.0, 16.0),
            ("sleepHours", self.sleep_hours, 0.0, 12.0),
            ("deadlinePressure", self.deadline_pressure, 0.0, 100.0),
            ("taskSwitching", self.task_switching, 0.0, 100.0),
            ("mentalClarity", self.mental_clarity, 1.0, 5.0),
        ];

        let mut violations: Vec<FieldViolation> = checks
            .iter()
            .filter(|(_, value, min, max)| !value.is_finite() || value < min || value > max)
            .map(|&(field, value, min, max)| FieldViolation {
                field,
                message: format!("{} is outside [{}, {}]", value, min, max),
            })
            .collect();

        if self.id.trim().is_empty() {
            violations.push(FieldViolation {
                field: "id",
                message: "id must not be empty".to_string(),
            });
        }

        violations
    }
}

/// A single field that failed range validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Coarse load bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadTier {
    Low,
    Moderate,
    High,
}

impl LoadTier {
    /// Bucket a 0-100 score: low below 40, moderate below 70, high otherwise
    pub fn from_score(score: f64) -> Self {
        if score < 40.0 {
            LoadTier::Low
        } else if score < 70.0 {
            LoadTier::Moderate
        } else {
            LoadTier::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoadTier::Low => "low",
            LoadTier::Moderate => "moderate",
            LoadTier::High => "high",
        }
    }
}

/// Direction of a contributing factor over the last few entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
        }
    }
}

/// A contributor to the current load index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub name: String,
    pub impact: Trend,
    /// Weighted contribution on a 0-1 scale, rounded to 2 decimals
    pub weight: f64,
    pub description: String,
}

/// Output of the load model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CognitiveLoad {
    /// Smoothed, clamped, rounded score (0-100)
    pub load_index: u8,
    pub tier: LoadTier,
    /// Top three contributors, strongest first
    pub factors: Vec<Factor>,
    pub explanation: String,
}

/// Output of the stability model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityIndex {
    /// 100 - 3σ, clamped and rounded (50 while calibrating)
    pub score: u8,
    pub label: String,
    pub description: String,
    /// σ rounded to one decimal
    pub volatility_index: f64,
    pub std_dev: f64,
    pub pattern_regularity: String,
    pub projection: String,
}

impl StabilityIndex {
    pub fn is_calibrating(&self) -> bool {
        self.label == "Calibrating"
    }
}

/// A named behavioral-pattern classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    pub name: String,
    pub description: String,
    pub pattern: String,
    /// False while fewer than seven check-ins exist
    pub available: bool,
    pub confidence: u8,
    pub stress_response: String,
    pub behavior_signature: String,
}

/// Speed of recovery after load spikes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Elasticity {
    pub score: u8,
    pub label: String,
    pub interpretation: String,
    pub buffering: String,
    pub recovery_velocity: u8,
}

/// Confidence bands driven by data volume (percentages)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfidence {
    pub data: u8,
    pub pattern: u8,
    pub projection: u8,
}

/// Percentage risk estimates over the last week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskForecast {
    pub burnout_probability: u8,
    pub instability_risk: u8,
    pub recovery_deficit: u8,
}

/// Day-over-day change between the two most recent check-ins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemShift {
    pub load_delta: i32,
    pub volatility_delta: f64,
    pub sleep_delta: f64,
    /// Next-day risk estimate (0-100)
    pub risk_forecast: u8,
    pub divergence_detected: bool,
    pub increases: Vec<String>,
    pub decreases: Vec<String>,
}

/// Hypothetical plan for the upcoming week
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInput {
    /// Expected workload (0-100 %)
    pub expected_workload: f64,
    /// Number of major deadlines in the week
    pub major_deadlines: u32,
    /// Planned nightly sleep (hours)
    pub planned_sleep: f64,
    /// Intention to protect recovery time (0-100 %)
    pub recovery_intention: f64,
}

/// Risk bucket for one simulated day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskZone {
    /// 1-based day number
    pub day: u8,
    pub risk: LoadTier,
}

/// Seven-day projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub projected_loads: Vec<u8>,
    pub risk_zones: Vec<RiskZone>,
    pub summary: String,
    pub stability_shift: i32,
    /// 1-based day of the highest projected load
    pub peak_day: u8,
    pub risk_probability: u8,
}

/// A preset projection used for side-by-side comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub loads: Vec<u8>,
    pub risk: u8,
}

/// Longitudinal maturity level (1-5)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionLevel {
    pub level: u8,
    pub name: String,
    /// Progress toward 30 check-ins (0-100)
    pub progress: u8,
    /// Stability score change between the two halves of history
    pub stability_improvement: i32,
    /// Relative σ reduction between the halves, in percent
    pub volatility_reduction: i32,
    /// Elasticity score change between the halves
    pub recovery_strengthening: i32,
    pub milestones: Vec<String>,
}

/// Lifecycle of a behavioral experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperimentStatus {
    Available,
    Active,
    Completed,
}

/// A time-boxed behavioral experiment.
///
/// `current_value` is only ever filled in for display; it is never persisted
/// as a new baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Length in days
    pub duration: u32,
    pub metric: String,
    pub status: ExperimentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
}

/// Live view of an active experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentProgress {
    pub id: String,
    pub elapsed_days: i64,
    /// min(100, elapsed / duration), in percent
    pub progress: u8,
    pub baseline: f64,
    pub current: f64,
    /// current - baseline
    pub delta: f64,
}

/// Pearson correlation between two tracked variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub x_label: String,
    pub y_label: String,
    /// r in [-1, 1], rounded to 2 decimals
    pub correlation: f64,
    pub explanation: String,
}

/// Summary statistics of one half of the history
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub avg_load: f64,
    pub volatility: f64,
    pub avg_sleep: f64,
}

/// Earlier half of the history against the later half
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternComparison {
    pub available: bool,
    pub current_period: PeriodSummary,
    pub previous_period: PeriodSummary,
    pub load_change: i32,
    pub volatility_change: f64,
    pub sleep_correlation: String,
    pub summary: String,
}

/// A detected sign of recovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoverySignal {
    pub description: String,
    pub impact: String,
    pub percentage: i32,
}

/// Trailing run of days meeting a condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicroStreak {
    pub label: String,
    pub days: u32,
    /// True once the streak reaches two days
    pub active: bool,
}

/// Rule-based coaching narrative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachAdvice {
    pub insight: String,
    pub protection_strategy: String,
    pub optimization: String,
    pub risk_warning: Option<String>,
}

/// Kind of insight card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Pattern,
    Suggestion,
    Recovery,
}

/// A short observation shown alongside the scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightCard {
    pub kind: InsightKind,
    pub title: String,
    pub body: String,
}

/// A labelled position between two poles (0-100)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    pub label: String,
    pub left: String,
    pub right: String,
    pub value: i32,
}

/// Long-run behavioral profile over the whole history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CognitiveDna {
    /// Lowest and highest raw load observed
    pub baseline_range: (i32, i32),
    pub reactivity_index: u8,
    pub recovery_velocity: u8,
    pub sleep_sensitivity: u8,
    pub deadline_amplification: u8,
    pub task_switching_friction: u8,
    pub cognitive_age: i32,
    pub spectrums: Vec<Spectrum>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(LoadTier::from_score(0.0), LoadTier::Low);
        assert_eq!(LoadTier::from_score(39.0), LoadTier::Low);
        assert_eq!(LoadTier::from_score(40.0), LoadTier::Moderate);
        assert_eq!(LoadTier::from_score(69.0), LoadTier::Moderate);
        assert_eq!(LoadTier::from_score(70.0), LoadTier::High);
    }

    #[test]
    fn test_check_in_json_uses_camel_case() {
        let json = r#"{
            "id": "a1",
            "date": "2024-03-01",
            "focusHours": 8,
            "sleepHours": 6.5,
            "deadlinePressure": 50,
            "taskSwitching": 40,
            "mentalClarity": 3,
            "moodWord": "tired"
        }"#;
        let check_in: CheckIn = serde_json::from_str(json).unwrap();
        assert_eq!(check_in.date, date());
        assert_eq!(check_in.sleep_hours, 6.5);
        assert_eq!(check_in.mood_word.as_deref(), Some("tired"));

        let out = serde_json::to_value(&check_in).unwrap();
        assert_eq!(out["deadlinePressure"], 50.0);
    }

    #[test]
    fn test_validate_reports_out_of_range_fields() {
        let mut check_in = CheckIn::new(date(), 8.0, 7.0, 50.0, 40.0, 3.0);
        assert!(check_in.validate().is_empty());

        check_in.sleep_hours = 25.0;
        check_in.mental_clarity = 0.0;
        let violations = check_in.validate();
        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["sleepHours", "mentalClarity"]);
    }

    #[test]
    fn test_new_check_ins_get_unique_ids() {
        let a = CheckIn::new(date(), 1.0, 7.0, 10.0, 10.0, 4.0);
        let b = CheckIn::new(date(), 1.0, 7.0, 10.0, 10.0, 4.0);
        assert_ne!(a.id, b.id);
    }
}
