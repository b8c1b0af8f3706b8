//! Rule-based coaching advice
//!
//! Each narrative slot is an ordered list of `(predicate, sentence)` pairs;
//! the first matching rule fills the slot.

use crate::types::{CheckIn, CognitiveLoad, CoachAdvice, LoadTier, StabilityIndex};
use crate::window::{mean_or, tail};

/// Window the averages are taken over
const COACH_WINDOW: usize = 7;

/// State the coaching rules are evaluated against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoachSignals {
    pub tier: LoadTier,
    pub load_index: u8,
    pub stability: u8,
    /// Mean sleep over the last week (7 when empty)
    pub avg_sleep: f64,
    /// Mean task switching over the last week (30 when empty)
    pub avg_switching: f64,
}

impl CoachSignals {
    pub fn gather(check_ins: &[CheckIn], load: &CognitiveLoad, stability: &StabilityIndex) -> Self {
        let recent = tail(check_ins, COACH_WINDOW);
        let sleeps: Vec<f64> = recent.iter().map(|c| c.sleep_hours).collect();
        let switching: Vec<f64> = recent.iter().map(|c| c.task_switching).collect();
        Self {
            tier: load.tier,
            load_index: load.load_index,
            stability: stability.score,
            avg_sleep: mean_or(&sleeps, 7.0),
            avg_switching: mean_or(&switching, 30.0),
        }
    }
}

type Rule = (fn(&CoachSignals) -> bool, &'static str);

const INSIGHT_RULES: &[Rule] = &[
    (
        |s: &CoachSignals| s.tier == LoadTier::High,
        "Your system is under sustained pressure. The data suggests you're approaching a load threshold where recovery becomes disproportionately harder.",
    ),
    (
        |s: &CoachSignals| s.tier == LoadTier::Moderate,
        "You're operating in a productive but watchful zone. Your patterns show capacity for current demands, though buffer margins are narrowing.",
    ),
    (
        |_: &CoachSignals| true,
        "Your cognitive load is well-managed. This is an optimal window for challenging work or skill acquisition.",
    ),
];

const PROTECTION_RULES: &[Rule] = &[
    (
        |s: &CoachSignals| s.avg_sleep < 6.5,
        "Prioritize sleep recovery tonight. Even 30 additional minutes could measurably improve tomorrow's cognitive capacity.",
    ),
    (
        |s: &CoachSignals| s.avg_switching > 60.0,
        "Batch similar tasks together today. Reducing context switches by even 2-3 instances can lower cognitive friction significantly.",
    ),
    (
        |s: &CoachSignals| s.tier == LoadTier::High,
        "Create a 2-hour protected focus block with no notifications. Your system needs uninterrupted processing time.",
    ),
    (
        |_: &CoachSignals| true,
        "Maintain current patterns — they're serving you well.",
    ),
];

const OPTIMIZATION_RULES: &[Rule] = &[
    (
        |s: &CoachSignals| s.tier == LoadTier::Moderate,
        "Front-load your most demanding task within the next 90 minutes while cognitive reserves are freshest.",
    ),
    (
        |s: &CoachSignals| s.tier == LoadTier::High,
        "Defer non-essential decisions to tomorrow. Your cognitive system processes better when load is reduced.",
    ),
    (
        |_: &CoachSignals| true,
        "Use this low-load period for strategic planning or creative work.",
    ),
];

/// No catch-all: a risk warning is optional
const RISK_RULES: &[Rule] = &[
    (
        |s: &CoachSignals| s.load_index > 75 && s.stability < 40,
        "Pattern analysis indicates elevated burnout probability. Consider a deliberate recovery day within the next 48 hours.",
    ),
    (
        |s: &CoachSignals| s.avg_sleep < 5.5,
        "Sleep deficit has reached a level where cognitive impairment compounds. Prioritize recovery.",
    ),
];

fn first_match(rules: &[Rule], signals: &CoachSignals) -> Option<&'static str> {
    rules
        .iter()
        .find(|(applies, _)| applies(signals))
        .map(|&(_, sentence)| sentence)
}

/// Deterministic advice for the current state
pub fn generate_coach_advice(
    check_ins: &[CheckIn],
    load: &CognitiveLoad,
    stability: &StabilityIndex,
) -> CoachAdvice {
    advice_for(&CoachSignals::gather(check_ins, load, stability))
}

pub fn advice_for(signals: &CoachSignals) -> CoachAdvice {
    let slot = |rules: &[Rule]| first_match(rules, signals).unwrap_or_default().to_string();
    CoachAdvice {
        insight: slot(INSIGHT_RULES),
        protection_strategy: slot(PROTECTION_RULES),
        optimization: slot(OPTIMIZATION_RULES),
        risk_warning: first_match(RISK_RULES, signals).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(tier: LoadTier, load_index: u8, stability: u8, sleep: f64, switching: f64) -> CoachSignals {
        CoachSignals {
            tier,
            load_index,
            stability,
            avg_sleep: sleep,
            avg_switching: switching,
        }
    }

    #[test]
    fn test_low_tier_defaults() {
        let advice = advice_for(&signals(LoadTier::Low, 20, 90, 7.5, 20.0));
        assert!(advice.insight.starts_with("Your cognitive load is well-managed."));
        assert_eq!(
            advice.protection_strategy,
            "Maintain current patterns — they're serving you well."
        );
        assert_eq!(
            advice.optimization,
            "Use this low-load period for strategic planning or creative work."
        );
        assert_eq!(advice.risk_warning, None);
    }

    #[test]
    fn test_sleep_rule_precedes_switching_rule() {
        let advice = advice_for(&signals(LoadTier::Moderate, 50, 60, 6.0, 80.0));
        assert!(advice.protection_strategy.starts_with("Prioritize sleep recovery tonight."));
        assert!(advice.optimization.starts_with("Front-load your most demanding task"));

        let advice = advice_for(&signals(LoadTier::Moderate, 50, 60, 7.0, 80.0));
        assert!(advice.protection_strategy.starts_with("Batch similar tasks together today."));
    }

    #[test]
    fn test_high_tier_protection_and_optimization() {
        let advice = advice_for(&signals(LoadTier::High, 72, 60, 7.0, 30.0));
        assert!(advice.insight.starts_with("Your system is under sustained pressure."));
        assert!(advice.protection_strategy.starts_with("Create a 2-hour protected focus block"));
        assert!(advice.optimization.starts_with("Defer non-essential decisions"));
        assert_eq!(advice.risk_warning, None);
    }

    #[test]
    fn test_risk_warnings() {
        let advice = advice_for(&signals(LoadTier::High, 80, 30, 7.0, 30.0));
        assert!(advice
            .risk_warning
            .as_deref()
            .is_some_and(|w| w.starts_with("Pattern analysis indicates elevated burnout")));

        let advice = advice_for(&signals(LoadTier::Low, 30, 90, 5.0, 30.0));
        assert!(advice
            .risk_warning
            .as_deref()
            .is_some_and(|w| w.starts_with("Sleep deficit has reached a level")));
    }

    #[test]
    fn test_empty_history_uses_default_averages() {
        let load = crate::load::compute_cognitive_load(&[]);
        let stability = crate::stability::compute_stability_index(&[]);
        let gathered = CoachSignals::gather(&[], &load, &stability);
        assert_eq!(gathered.avg_sleep, 7.0);
        assert_eq!(gathered.avg_switching, 30.0);
        assert_eq!(gathered.stability, 50);
    }
}
