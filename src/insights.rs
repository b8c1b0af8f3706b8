//! Narrative text: working hypothesis, insight cards and the weekly reflection

use crate::load::raw_loads;
use crate::types::{CheckIn, CognitiveLoad, InsightCard, InsightKind, StabilityIndex};
use crate::window::{mean_or, round_to, std_dev, tail};

/// Window the narrative texts summarize
const WEEK: usize = 7;

fn average(check_ins: &[CheckIn], field: impl Fn(&CheckIn) -> f64, default: f64) -> f64 {
    let values: Vec<f64> = check_ins.iter().map(field).collect();
    mean_or(&values, default)
}

/// One-sentence working hypothesis about the current state
pub fn generate_hypothesis(
    check_ins: &[CheckIn],
    load: &CognitiveLoad,
    stability: &StabilityIndex,
) -> String {
    match check_ins.len() {
        0 => {
            return "Awaiting initial cognitive data to begin pattern analysis. Submit your first check-in to activate the modeling engine.".to_string()
        }
        1 | 2 => {
            return "Preliminary calibration in progress. Early signals suggest initial baseline formation — more data points will refine hypothesis generation.".to_string()
        }
        _ => {}
    }

    let recent = tail(check_ins, WEEK);
    let avg_deadline = average(recent, |c| c.deadline_pressure, 0.0);
    let avg_sleep = average(recent, |c| c.sleep_hours, 0.0);

    let mut hypothesis = format!(
        "Your cognitive system is operating at {} load tolerance",
        load.tier.as_str()
    );
    if stability.score < 50 {
        let cause = if avg_deadline > 50.0 {
            "deadline reactivity"
        } else {
            "inconsistent recovery patterns"
        };
        hypothesis.push_str(&format!(", but volatility suggests {}", cause));
    } else {
        hypothesis.push_str(&format!(
            " with {} pattern regularity",
            stability.label.to_lowercase()
        ));
    }
    if avg_sleep < 6.5 {
        hypothesis.push_str(". Sleep deficit may be constraining recovery buffering capacity");
    }
    hypothesis.push('.');
    hypothesis
}

fn card(kind: InsightKind, title: &str, body: &str) -> InsightCard {
    InsightCard {
        kind,
        title: title.to_string(),
        body: body.to_string(),
    }
}

/// Short observations from the last week of check-ins
pub fn generate_insights(check_ins: &[CheckIn]) -> Vec<InsightCard> {
    let mut insights = Vec::new();
    if check_ins.len() < 2 {
        return insights;
    }

    let recent = tail(check_ins, WEEK);
    if average(recent, |c| c.sleep_hours, 0.0) < 6.5 {
        insights.push(card(
            InsightKind::Suggestion,
            "Sleep consistency",
            "Average sleep below 6.5 hours. Small improvements can meaningfully reduce cognitive load.",
        ));
    }
    if average(recent, |c| c.focus_hours, 0.0) > 8.0 {
        insights.push(card(
            InsightKind::Pattern,
            "Extended focus periods",
            "Averaging over 8 hours of focused work. Cognitive reserves may benefit from shorter blocks.",
        ));
    }
    if average(recent, |c| c.task_switching, 0.0) > 60.0 {
        insights.push(card(
            InsightKind::Suggestion,
            "Task batching opportunity",
            "High task switching detected. Grouping similar tasks could reduce cognitive friction.",
        ));
    }

    if recent.len() >= 3 {
        let pressure: Vec<f64> = tail(recent, 3)
            .iter()
            .map(|c| c.deadline_pressure + c.task_switching)
            .collect();
        if pressure[2] < pressure[0] && pressure[1] < pressure[0] {
            insights.push(card(
                InsightKind::Recovery,
                "Recovery signal detected",
                "Recent entries show decreasing pressure. Positive for cognitive restoration.",
            ));
        }
    }

    if insights.is_empty() {
        insights.push(card(
            InsightKind::Pattern,
            "Steady patterns",
            "Consistent patterns detected. Stability is a strong foundation for sustained performance.",
        ));
    }
    insights
}

/// Markdown reflection over the last seven check-ins
pub fn generate_weekly_reflection(check_ins: &[CheckIn]) -> String {
    let week = tail(check_ins, WEEK);
    if week.is_empty() {
        return "Complete a few check-ins to receive your weekly reflection.".to_string();
    }

    let loads = raw_loads(week);
    let sigma = std_dev(&loads);
    let avg_sleep = average(week, |c| c.sleep_hours, 0.0);
    let high_pressure_days = week.iter().filter(|c| c.deadline_pressure > 60.0).count();

    let sigma_text = format!("{:.1}", round_to(sigma, 1));
    let (class, volatility_note) = if sigma < 8.0 {
        (
            "Consistent",
            format!("Low variation (σ = {}) indicates stable baseline.", sigma_text),
        )
    } else if sigma < 15.0 {
        (
            "Variable",
            format!("Moderate variation (σ = {}) within manageable range.", sigma_text),
        )
    } else {
        (
            "Volatile",
            format!("High fluctuation (σ = {}) suggests reactive load patterns.", sigma_text),
        )
    };

    // Load spread relative to input spread
    let elasticity = if week.len() >= 3 {
        let inputs: Vec<f64> = week
            .iter()
            .map(|c| c.focus_hours + c.deadline_pressure / 10.0)
            .collect();
        let ratio = sigma / std_dev(&inputs).max(1.0);
        if ratio > 3.0 {
            "high"
        } else if ratio > 1.5 {
            "moderate"
        } else {
            "low"
        }
    } else {
        "moderate"
    };

    let recovery_days = week
        .iter()
        .filter(|c| c.focus_hours < 5.0 && c.deadline_pressure < 30.0)
        .count();
    let buffering = match recovery_days {
        0 => "minimal",
        1 => "limited",
        _ => "adequate",
    };

    let clear_under_pressure = week
        .iter()
        .filter(|c| c.deadline_pressure > 50.0 && c.mental_clarity >= 3.0)
        .count();
    let resilience = if clear_under_pressure >= 2 {
        Some("You maintained mental clarity under pressure — a strong resilience marker.")
    } else if high_pressure_days >= 2 {
        Some("Mental clarity decreased under pressure, suggesting limited resilience buffering.")
    } else {
        None
    };

    let mut reflection = format!(
        "**Pattern Classification:** {} load pattern across {} check-in{}.\n\n",
        class,
        week.len(),
        if week.len() > 1 { "s" } else { "" }
    );
    reflection.push_str(&format!(
        "**Volatility Interpretation:** {}\n\n",
        volatility_note
    ));
    reflection.push_str(&format!(
        "**Load Elasticity:** {} cognitive elasticity. Recovery buffering is {}.\n\n",
        elasticity, buffering
    ));
    if let Some(note) = resilience {
        reflection.push_str(&format!("**Resilience Markers:** {}\n\n", note));
    }
    if avg_sleep < 7.0 {
        reflection.push_str(&format!(
            "Sleep averaged {:.1} hours — improvements could have outsized benefits. ",
            round_to(avg_sleep, 1)
        ));
    }
    if high_pressure_days >= 3 {
        reflection.push_str(&format!(
            "{} days showed high deadline pressure. Consider spacing intensive periods.",
            high_pressure_days
        ));
    }
    reflection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::compute_cognitive_load;
    use crate::load::tests::entry;
    use crate::stability::compute_stability_index;

    fn hypothesis_for(check_ins: &[CheckIn]) -> String {
        generate_hypothesis(
            check_ins,
            &compute_cognitive_load(check_ins),
            &compute_stability_index(check_ins),
        )
    }

    #[test]
    fn test_hypothesis_by_history_length() {
        assert!(hypothesis_for(&[]).starts_with("Awaiting initial cognitive data"));
        assert!(hypothesis_for(&[entry(4.0, 8.0, 30.0, 30.0, 4.0)])
            .starts_with("Preliminary calibration in progress."));
    }

    #[test]
    fn test_hypothesis_stable_and_rested() {
        let check_ins = vec![entry(0.0, 8.0, 50.0, 50.0, 5.0); 5];
        assert_eq!(
            hypothesis_for(&check_ins),
            "Your cognitive system is operating at low load tolerance with stable pattern regularity."
        );
    }

    #[test]
    fn test_hypothesis_volatile_under_deadlines_and_short_sleep() {
        // Smoothed load lands at 35 after a light day, but σ ≈ 35 keeps stability at 0
        let check_ins: Vec<_> = (0..6)
            .map(|i| {
                if i % 2 == 0 {
                    entry(12.0, 4.0, 100.0, 100.0, 1.0)
                } else {
                    entry(0.0, 6.0, 60.0, 0.0, 5.0)
                }
            })
            .collect();
        assert_eq!(
            hypothesis_for(&check_ins),
            "Your cognitive system is operating at low load tolerance, but volatility suggests deadline reactivity. Sleep deficit may be constraining recovery buffering capacity."
        );
    }

    #[test]
    fn test_insights_fall_back_to_steady() {
        let insights = generate_insights(&vec![entry(4.0, 8.0, 30.0, 30.0, 4.0); 4]);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].title, "Steady patterns");
        assert!(generate_insights(&[entry(4.0, 8.0, 30.0, 30.0, 4.0)]).is_empty());
    }

    #[test]
    fn test_insights_flag_sleep_focus_and_switching() {
        let insights = generate_insights(&vec![entry(10.0, 5.0, 30.0, 80.0, 3.0); 3]);
        let titles: Vec<_> = insights.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Sleep consistency", "Extended focus periods", "Task batching opportunity"]
        );
        assert_eq!(insights[1].kind, InsightKind::Pattern);
    }

    #[test]
    fn test_insights_detect_falling_pressure() {
        let check_ins = vec![
            entry(4.0, 8.0, 60.0, 40.0, 4.0),
            entry(4.0, 8.0, 40.0, 30.0, 4.0),
            entry(4.0, 8.0, 30.0, 30.0, 4.0),
        ];
        let insights = generate_insights(&check_ins);
        assert_eq!(insights[0].kind, InsightKind::Recovery);
        assert_eq!(insights[0].title, "Recovery signal detected");
    }

    #[test]
    fn test_reflection_empty() {
        assert_eq!(
            generate_weekly_reflection(&[]),
            "Complete a few check-ins to receive your weekly reflection."
        );
    }

    #[test]
    fn test_reflection_for_calm_week() {
        let reflection = generate_weekly_reflection(&vec![entry(2.0, 8.0, 10.0, 10.0, 4.0); 3]);
        assert!(reflection
            .starts_with("**Pattern Classification:** Consistent load pattern across 3 check-ins."));
        assert!(reflection.contains("Low variation (σ = 0.0) indicates stable baseline."));
        assert!(reflection.contains("low cognitive elasticity. Recovery buffering is adequate."));
        assert!(!reflection.contains("Resilience Markers"));
        assert!(!reflection.contains("Sleep averaged"));
    }

    #[test]
    fn test_reflection_pressure_notes() {
        let reflection = generate_weekly_reflection(&vec![entry(9.0, 6.0, 80.0, 50.0, 2.0); 3]);
        assert!(reflection.contains(
            "**Resilience Markers:** Mental clarity decreased under pressure, suggesting limited resilience buffering."
        ));
        assert!(reflection.contains("Sleep averaged 6.0 hours;"));
        assert!(reflection.ends_with(
            "3 days showed high deadline pressure. Consider spacing intensive periods."
        ));
        assert!(reflection.contains("check-ins."));
        assert!(generate_weekly_reflection(&[entry(9.0, 6.0, 80.0, 50.0, 2.0)])
            .contains("across 1 check-in."));
    }
}
