//! Pipeline orchestration
//!
//! This module provides the public API for Cogload. It runs every model
//! over a check-in history and collects the results into one report.

use crate::archetype::determine_cognitive_archetype_with;
use crate::coach::{advise, generate_coach_advice, CoachIntelligence, CoachTextGenerator};
use crate::config::EngineConfig;
use crate::dna::compute_cognitive_dna;
use crate::elasticity::{compute_elasticity, compute_model_confidence};
use crate::error::ComputeError;
use crate::evolution::compute_evolution;
use crate::insights::{generate_hypothesis, generate_insights, generate_weekly_reflection};
use crate::load::compute_cognitive_load;
use crate::patterns::{
    compare_patterns, compute_correlations, compute_micro_streaks, detect_recovery_signals,
};
use crate::risk::{compute_risk_forecast, compute_system_shift};
use crate::simulation::{simulate_scenarios_with, simulate_upcoming_week_with};
use crate::stability::compute_stability_index;
use crate::types::{
    Archetype, CheckIn, CoachAdvice, CognitiveDna, CognitiveLoad, Correlation, Elasticity,
    EvolutionLevel, InsightCard, MicroStreak, ModelConfidence, PatternComparison,
    RecoverySignal, RiskForecast, ScenarioOutcome, SimulationInput, SimulationResult,
    StabilityIndex, SystemShift,
};
use crate::COGLOAD_VERSION;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Every model's output for one history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineReport {
    /// Unique id of this report instance
    pub report_id: String,
    pub engine_version: String,
    pub computed_at: DateTime<Utc>,
    pub check_in_count: usize,
    pub load: CognitiveLoad,
    pub stability: StabilityIndex,
    pub archetype: Archetype,
    pub elasticity: Elasticity,
    pub confidence: ModelConfidence,
    pub risk: RiskForecast,
    pub system_shift: SystemShift,
    pub evolution: EvolutionLevel,
    pub correlations: Vec<Correlation>,
    pub comparison: PatternComparison,
    pub recovery_signals: Vec<RecoverySignal>,
    pub micro_streaks: Vec<MicroStreak>,
    pub dna: CognitiveDna,
    pub coach: CoachAdvice,
    pub hypothesis: String,
    pub insights: Vec<InsightCard>,
    pub weekly_reflection: String,
    pub scenarios: Vec<ScenarioOutcome>,
}

/// Analyze a check-in history with the default configuration.
///
/// # Example
/// ```ignore
/// let report = analyze(&check_ins);
/// println!("{} ({})", report.load.load_index, report.load.tier.as_str());
/// ```
pub fn analyze(check_ins: &[CheckIn]) -> EngineReport {
    CognitiveEngine::default().analyze(check_ins)
}

/// Analyze a JSON array of check-ins and return the report as JSON.
///
/// # Arguments
/// * `check_ins_json` - JSON array of check-in records (camelCase fields)
///
/// # Returns
/// The serialized [`EngineReport`]
pub fn analyze_json(check_ins_json: String) -> Result<String, ComputeError> {
    CognitiveEngine::default().analyze_json(&check_ins_json)
}

/// Project the upcoming week from JSON inputs and return the result as JSON
pub fn simulate_json(check_ins_json: &str, input_json: &str) -> Result<String, ComputeError> {
    CognitiveEngine::default().simulate_json(check_ins_json, input_json)
}

fn parse_check_ins(json: &str) -> Result<Vec<CheckIn>, ComputeError> {
    serde_json::from_str(json).map_err(|e| ComputeError::ParseError(e.to_string()))
}

/// Engine carrying a configuration for the tunable models.
///
/// Use this when archetype thresholds, simulation parameters or the
/// coaching timeout differ from the defaults.
#[derive(Debug, Clone, Default)]
pub struct CognitiveEngine {
    config: EngineConfig,
}

impl CognitiveEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run every model over the history
    pub fn analyze(&self, check_ins: &[CheckIn]) -> EngineReport {
        let load = compute_cognitive_load(check_ins);
        let stability = compute_stability_index(check_ins);
        let coach = generate_coach_advice(check_ins, &load, &stability);
        let hypothesis = generate_hypothesis(check_ins, &load, &stability);

        let report = EngineReport {
            report_id: Uuid::new_v4().to_string(),
            engine_version: COGLOAD_VERSION.to_string(),
            computed_at: Utc::now(),
            check_in_count: check_ins.len(),
            archetype: self.archetype(check_ins),
            elasticity: compute_elasticity(check_ins),
            confidence: compute_model_confidence(check_ins),
            risk: compute_risk_forecast(check_ins),
            system_shift: compute_system_shift(check_ins),
            evolution: compute_evolution(check_ins),
            correlations: compute_correlations(check_ins),
            comparison: compare_patterns(check_ins),
            recovery_signals: detect_recovery_signals(check_ins),
            micro_streaks: compute_micro_streaks(check_ins),
            dna: compute_cognitive_dna(check_ins),
            insights: generate_insights(check_ins),
            weekly_reflection: generate_weekly_reflection(check_ins),
            scenarios: self.scenarios(check_ins),
            load,
            stability,
            coach,
            hypothesis,
        };

        tracing::debug!(
            check_ins = report.check_in_count,
            load = report.load.load_index,
            stability = report.stability.score,
            archetype = %report.archetype.name,
            "analysis complete"
        );
        report
    }

    /// [`Self::analyze`] over a JSON array of check-ins
    pub fn analyze_json(&self, check_ins_json: &str) -> Result<String, ComputeError> {
        let check_ins = parse_check_ins(check_ins_json)?;
        let report = self.analyze(&check_ins);
        serde_json::to_string(&report).map_err(|e| ComputeError::EncodingError(e.to_string()))
    }

    pub fn archetype(&self, check_ins: &[CheckIn]) -> Archetype {
        determine_cognitive_archetype_with(check_ins, &self.config.archetype)
    }

    pub fn simulate(&self, check_ins: &[CheckIn], input: &SimulationInput) -> SimulationResult {
        simulate_upcoming_week_with(check_ins, input, &self.config.simulation)
    }

    pub fn scenarios(&self, check_ins: &[CheckIn]) -> Vec<ScenarioOutcome> {
        simulate_scenarios_with(check_ins, &self.config.simulation)
    }

    /// [`Self::simulate`] over JSON inputs
    pub fn simulate_json(
        &self,
        check_ins_json: &str,
        input_json: &str,
    ) -> Result<String, ComputeError> {
        let check_ins = parse_check_ins(check_ins_json)?;
        let input: SimulationInput = serde_json::from_str(input_json)
            .map_err(|e| ComputeError::ParseError(e.to_string()))?;
        let result = self.simulate(&check_ins, &input);
        serde_json::to_string(&result).map_err(|e| ComputeError::EncodingError(e.to_string()))
    }

    /// Coaching advice with an optional generated override, bounded by the
    /// configured timeout
    pub async fn coach<G: CoachTextGenerator>(
        &self,
        check_ins: &[CheckIn],
        generator: Option<&G>,
    ) -> CoachIntelligence {
        let load = compute_cognitive_load(check_ins);
        let stability = compute_stability_index(check_ins);
        advise(
            check_ins,
            &load,
            &stability,
            generator,
            self.config.coach.timeout(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::{AdviceSource, NoGenerator};
    use crate::load::tests::entry;
    use crate::simulation::SCENARIO_PRESETS;
    use crate::types::LoadTier;
    use pretty_assertions::assert_eq;

    fn history() -> Vec<CheckIn> {
        (0..10)
            .map(|i| {
                if i % 3 == 0 {
                    entry(7.0, 6.0, 70.0, 60.0, 3.0)
                } else {
                    entry(4.0, 7.5, 30.0, 30.0, 4.0)
                }
            })
            .collect()
    }

    #[test]
    fn test_analyze_empty_history() {
        let report = analyze(&[]);
        assert_eq!(report.check_in_count, 0);
        assert_eq!(report.load.load_index, 0);
        assert_eq!(report.load.tier, LoadTier::Low);
        assert!(report.stability.is_calibrating());
        assert!(!report.archetype.available);
        assert!(report.correlations.is_empty());
        assert!(report.insights.is_empty());
        assert_eq!(report.scenarios.len(), SCENARIO_PRESETS.len());
        assert_eq!(report.engine_version, COGLOAD_VERSION);
    }

    #[test]
    fn test_analyze_matches_individual_models() {
        let check_ins = history();
        let report = analyze(&check_ins);
        assert_eq!(report.check_in_count, 10);
        assert_eq!(report.load, compute_cognitive_load(&check_ins));
        assert_eq!(report.stability, compute_stability_index(&check_ins));
        assert_eq!(report.risk, compute_risk_forecast(&check_ins));
        assert_eq!(report.dna, compute_cognitive_dna(&check_ins));
        assert!(report.archetype.available);
    }

    #[test]
    fn test_reports_differ_only_in_instance_metadata() {
        let check_ins = history();
        let first = analyze(&check_ins);
        let mut second = analyze(&check_ins);
        assert_ne!(first.report_id, second.report_id);
        assert!(Uuid::parse_str(&first.report_id).is_ok());

        second.report_id = first.report_id.clone();
        second.computed_at = first.computed_at;
        assert_eq!(first, second);
    }

    #[test]
    fn test_analyze_json() {
        let input = serde_json::to_string(&history()).unwrap();
        let output = analyze_json(input).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["check_in_count"], 10);
        assert!(value["load"]["load_index"].is_u64());

        let err = analyze_json("{not json".to_string()).unwrap_err();
        assert!(matches!(err, ComputeError::ParseError(_)));
    }

    #[test]
    fn test_simulate_json() {
        let input = r#"{"expectedWorkload":50,"majorDeadlines":2,"plannedSleep":7.5,"recoveryIntention":50}"#;
        let output = simulate_json("[]", input).unwrap();
        let result: SimulationResult = serde_json::from_str(&output).unwrap();
        assert_eq!(result.projected_loads, vec![28, 41, 51, 56, 54, 47, 37]);

        assert!(matches!(
            simulate_json("[]", r#"{"expectedWorkload":50}"#),
            Err(ComputeError::ParseError(_))
        ));
    }

    #[test]
    fn test_engine_uses_configured_simulation() {
        let mut config = EngineConfig::default();
        config.simulation.workload_weight = 0.0;
        let engine = CognitiveEngine::new(config);

        let tuned = engine.scenarios(&[]);
        let default = analyze(&[]).scenarios;
        assert_eq!(tuned.len(), default.len());
        for (t, d) in tuned.iter().zip(&default) {
            assert_eq!(t.name, d.name);
            assert!(t.loads.iter().zip(&d.loads).all(|(a, b)| a <= b));
        }
        assert_ne!(tuned, default);
    }

    #[test]
    fn test_engine_uses_configured_archetype_thresholds() {
        let check_ins = vec![entry(4.0, 8.0, 50.0, 50.0, 5.0); 10];
        let default = CognitiveEngine::default().archetype(&check_ins);

        let mut config = EngineConfig::default();
        config.archetype.steady_mean_load = 0.0;
        config.archetype.elastic_mean_load = 0.0;
        let tuned = CognitiveEngine::new(config).archetype(&check_ins);

        assert!(default.available);
        assert_ne!(default.name, tuned.name);
    }

    #[tokio::test]
    async fn test_engine_coach_without_generator() {
        let check_ins = history();
        let intelligence = CognitiveEngine::default()
            .coach(&check_ins, None::<&NoGenerator>)
            .await;
        assert_eq!(intelligence.source, AdviceSource::Algorithmic);
        assert_eq!(intelligence.advice, analyze(&check_ins).coach);
    }
}
