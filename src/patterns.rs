//! Correlation and pattern engine
//!
//! Pairwise correlations, half-over-half period comparison, recovery signal
//! detection and trailing micro-streaks.

use crate::load::raw_loads;
use crate::types::{CheckIn, Correlation, MicroStreak, PatternComparison, PeriodSummary, RecoverySignal};
use crate::window::{mean_or, pearson, round_half_up, round_to, std_dev, tail, trailing_count};

/// Window of check-ins used for correlations
pub const CORRELATION_WINDOW: usize = 21;

/// Minimum history for correlations and recovery signals
pub const MIN_PATTERN_SAMPLES: usize = 5;

/// Minimum history for a period comparison
pub const MIN_COMPARISON_SAMPLES: usize = 14;

/// Window scanned for recovery signals
const RECOVERY_WINDOW: usize = 14;

/// Correlation magnitude treated as meaningful
const CORRELATION_THRESHOLD: f64 = 0.3;

/// Days a streak must reach before it is active
const ACTIVE_STREAK_DAYS: u32 = 2;

/// Pearson r rounded to two decimals
fn correlate(xs: &[f64], ys: &[f64]) -> f64 {
    round_to(pearson(xs, ys), 2)
}

/// Rolling three-point σ of load; the first two points are 0
fn rolling_volatility(loads: &[f64]) -> Vec<f64> {
    (0..loads.len())
        .map(|i| if i < 2 { 0.0 } else { std_dev(&loads[i - 2..=i]) })
        .collect()
}

/// Correlations for sleep×load, switching×volatility and deadlines×sleep
pub fn compute_correlations(check_ins: &[CheckIn]) -> Vec<Correlation> {
    if check_ins.len() < MIN_PATTERN_SAMPLES {
        return Vec::new();
    }

    let recent = tail(check_ins, CORRELATION_WINDOW);
    let loads = raw_loads(recent);
    let sleeps: Vec<f64> = recent.iter().map(|c| c.sleep_hours).collect();
    let switches: Vec<f64> = recent.iter().map(|c| c.task_switching).collect();
    let deadlines: Vec<f64> = recent.iter().map(|c| c.deadline_pressure).collect();

    let sleep_load = correlate(&sleeps, &loads);
    let switching_volatility = correlate(&switches, &rolling_volatility(&loads));
    let deadline_sleep = correlate(&deadlines, &sleeps);

    let sleep_explanation = if sleep_load < -CORRELATION_THRESHOLD {
        "More sleep correlates with lower load — sleep is protective."
    } else if sleep_load > CORRELATION_THRESHOLD {
        "Unexpected positive correlation — investigate confounders."
    } else {
        "Weak relationship in current data window."
    };
    let switching_explanation = if switching_volatility > CORRELATION_THRESHOLD {
        "Higher switching correlates with more volatility — batching may help."
    } else {
        "Task switching has limited impact on volatility currently."
    };
    let deadline_explanation = if deadline_sleep < -CORRELATION_THRESHOLD {
        "Deadline pressure reduces sleep — a recovery risk pattern."
    } else {
        "Deadlines aren't significantly impacting sleep patterns."
    };

    [
        ("Sleep", "Load", sleep_load, sleep_explanation),
        ("Switching", "Volatility", switching_volatility, switching_explanation),
        ("Deadlines", "Recovery", deadline_sleep, deadline_explanation),
    ]
    .into_iter()
    .map(|(x, y, r, explanation)| Correlation {
        x_label: x.to_string(),
        y_label: y.to_string(),
        correlation: r,
        explanation: explanation.to_string(),
    })
    .collect()
}

fn period_summary(period: &[CheckIn]) -> PeriodSummary {
    let loads = raw_loads(period);
    let sleeps: Vec<f64> = period.iter().map(|c| c.sleep_hours).collect();
    PeriodSummary {
        avg_load: round_half_up(mean_or(&loads, 0.0)),
        volatility: round_to(std_dev(&loads), 1),
        avg_sleep: round_to(mean_or(&sleeps, 0.0), 1),
    }
}

/// Compare the earlier half of the history with the later half
pub fn compare_patterns(check_ins: &[CheckIn]) -> PatternComparison {
    let n = check_ins.len();
    if n < MIN_COMPARISON_SAMPLES {
        return PatternComparison {
            available: false,
            current_period: PeriodSummary::default(),
            previous_period: PeriodSummary::default(),
            load_change: 0,
            volatility_change: 0.0,
            sleep_correlation: String::new(),
            summary: format!(
                "Need {} more check-ins for pattern comparison.",
                MIN_COMPARISON_SAMPLES - n
            ),
        };
    }

    let (earlier, later) = check_ins.split_at(n / 2);
    let previous = period_summary(earlier);
    let current = period_summary(later);

    let load_change = round_half_up(current.avg_load - previous.avg_load) as i32;
    let volatility_change = round_to(current.volatility - previous.volatility, 1);
    let sleep_diff = current.avg_sleep - previous.avg_sleep;

    let sleep_correlation = if sleep_diff > 0.3 {
        "Improved sleep correlates with cognitive load changes."
    } else if sleep_diff < -0.3 {
        "Reduced sleep may contribute to load increases."
    } else {
        "Sleep patterns remained consistent."
    };

    let load_sentence = if load_change > 5 {
        format!("Average load increased by {} points. ", load_change)
    } else if load_change < -5 {
        format!(
            "Average load decreased by {} points — positive trend. ",
            load_change.abs()
        )
    } else {
        "Average load stable between periods. ".to_string()
    };

    PatternComparison {
        available: true,
        current_period: current,
        previous_period: previous,
        load_change,
        volatility_change,
        sleep_correlation: sleep_correlation.to_string(),
        summary: format!("{}{}", load_sentence, sleep_correlation),
    }
}

/// Detect recent signs of recovery over the last 14 check-ins
pub fn detect_recovery_signals(check_ins: &[CheckIn]) -> Vec<RecoverySignal> {
    let mut signals = Vec::new();
    if check_ins.len() < MIN_PATTERN_SAMPLES {
        return signals;
    }

    let recent = tail(check_ins, RECOVERY_WINDOW);
    let loads = raw_loads(recent);

    if let Some(reduction) = light_days_after_peak(recent, &loads) {
        signals.push(RecoverySignal {
            description: "Two moderate-focus days reduced volatility".to_string(),
            impact: format!("Volatility decreased by {}%", reduction),
            percentage: reduction,
        });
    }

    let sleep_window = tail(recent, 5);
    let early_sleep = pair_mean(&sleep_window[..2], |c| c.sleep_hours);
    let late_sleep = pair_mean(tail(sleep_window, 2), |c| c.sleep_hours);
    if late_sleep > early_sleep + 0.5 {
        let gain = late_sleep - early_sleep;
        let percentage = if early_sleep > 0.0 {
            round_half_up(gain / early_sleep * 100.0) as i32
        } else {
            100
        };
        signals.push(RecoverySignal {
            description: "Sleep improvement detected".to_string(),
            impact: format!("Average sleep increased by {:.1} hours", round_to(gain, 1)),
            percentage,
        });
    }

    let switch_window = tail(recent, 6);
    let early_switch = pair_mean(&switch_window[..2], |c| c.task_switching);
    let late_switch = pair_mean(tail(switch_window, 2), |c| c.task_switching);
    if early_switch > late_switch + 10.0 {
        signals.push(RecoverySignal {
            description: "Task switching frequency decreased".to_string(),
            impact: format!(
                "Switching reduced from {} to {}",
                round_half_up(early_switch),
                round_half_up(late_switch)
            ),
            percentage: round_half_up((early_switch - late_switch) / early_switch * 100.0) as i32,
        });
    }

    signals
}

/// First pair of light-focus days following a peak that calmed the swing.
///
/// Returns the volatility reduction in percent.
fn light_days_after_peak(recent: &[CheckIn], loads: &[f64]) -> Option<i32> {
    (2..recent.len()).find_map(|i| {
        let light_pair = recent[i].focus_hours < 6.0 && recent[i - 1].focus_hours < 6.0;
        if !light_pair || loads[i - 2] <= 55.0 {
            return None;
        }
        let before_prev = if i >= 3 { loads[i - 3] } else { loads[i - 2] };
        let before = (loads[i - 2] - before_prev).abs();
        let after = (loads[i] - loads[i - 1]).abs();
        let reduction = if before > 0.0 {
            round_half_up((before - after) / before * 100.0) as i32
        } else {
            0
        };
        (reduction > 0).then_some(reduction)
    })
}

fn pair_mean(pair: &[CheckIn], field: impl Fn(&CheckIn) -> f64) -> f64 {
    let values: Vec<f64> = pair.iter().map(field).collect();
    mean_or(&values, 0.0)
}

/// Trailing streaks for stability, sleep consistency and low volatility
pub fn compute_micro_streaks(check_ins: &[CheckIn]) -> Vec<MicroStreak> {
    let (stability, sleep, volatility) = if check_ins.len() < 2 {
        (0, 0, 0)
    } else {
        let loads = raw_loads(check_ins);
        let swings: Vec<f64> = loads.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
        (
            trailing_count(&loads, |l| *l < 60.0),
            trailing_count(check_ins, |c| c.sleep_hours >= 7.0),
            trailing_count(&swings, |s| *s < 10.0),
        )
    };

    [
        ("Stability", stability),
        ("Sleep consistency", sleep),
        ("Low volatility", volatility),
    ]
    .into_iter()
    .map(|(label, days)| MicroStreak {
        label: label.to_string(),
        days,
        active: days >= ACTIVE_STREAK_DAYS,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::tests::entry;
    use pretty_assertions::assert_eq;

    fn with_load(load: f64) -> CheckIn {
        entry(0.0, 8.0, load * 2.5, load * 2.5, 5.0)
    }

    #[test]
    fn test_correlations_need_five_entries() {
        assert!(compute_correlations(&vec![with_load(30.0); 4]).is_empty());
        assert_eq!(compute_correlations(&vec![with_load(30.0); 5]).len(), 3);
    }

    #[test]
    fn test_sleep_is_protective() {
        // Less sleep adds sleep deficit: perfectly negative relationship
        let check_ins: Vec<_> = [4.0, 5.0, 6.0, 7.0, 8.0, 5.0, 6.0]
            .into_iter()
            .map(|sleep| entry(4.0, sleep, 30.0, 30.0, 4.0))
            .collect();
        let correlations = compute_correlations(&check_ins);
        assert_eq!(correlations[0].x_label, "Sleep");
        assert_eq!(correlations[0].correlation, -1.0);
        assert_eq!(
            correlations[0].explanation,
            "More sleep correlates with lower load — sleep is protective."
        );
    }

    #[test]
    fn test_constant_series_correlate_to_zero() {
        let correlations = compute_correlations(&vec![with_load(30.0); 8]);
        for c in &correlations {
            assert_eq!(c.correlation, 0.0);
            assert!((-1.0..=1.0).contains(&c.correlation));
        }
        assert_eq!(
            correlations[2].explanation,
            "Deadlines aren't significantly impacting sleep patterns."
        );
    }

    #[test]
    fn test_deadlines_reduce_sleep() {
        let check_ins: Vec<_> = [(80.0, 5.0), (20.0, 8.0), (70.0, 5.5), (10.0, 8.5), (90.0, 4.5)]
            .into_iter()
            .map(|(deadline, sleep)| entry(4.0, sleep, deadline, 30.0, 4.0))
            .collect();
        let correlations = compute_correlations(&check_ins);
        assert!(correlations[2].correlation < -0.3);
        assert_eq!(
            correlations[2].explanation,
            "Deadline pressure reduces sleep — a recovery risk pattern."
        );
    }

    #[test]
    fn test_rolling_volatility() {
        let volatility = rolling_volatility(&[10.0, 20.0, 30.0, 30.0]);
        assert_eq!(volatility[0], 0.0);
        assert_eq!(volatility[1], 0.0);
        assert!((volatility[2] - 8.16497).abs() < 0.001);
        assert!((volatility[3] - 4.71405).abs() < 0.001);
    }

    #[test]
    fn test_compare_patterns_requires_fourteen() {
        let result = compare_patterns(&vec![with_load(30.0); 10]);
        assert!(!result.available);
        assert_eq!(result.summary, "Need 4 more check-ins for pattern comparison.");
    }

    #[test]
    fn test_compare_patterns_reports_decrease() {
        let mut check_ins: Vec<_> = (0..7).map(|_| with_load(50.0)).collect();
        check_ins.extend((0..7).map(|_| with_load(30.0)));
        let result = compare_patterns(&check_ins);

        assert!(result.available);
        assert_eq!(result.previous_period.avg_load, 50.0);
        assert_eq!(result.current_period.avg_load, 30.0);
        assert_eq!(result.load_change, -20);
        assert_eq!(result.volatility_change, 0.0);
        assert_eq!(
            result.summary,
            "Average load decreased by 20 points — positive trend. Sleep patterns remained consistent."
        );
    }

    #[test]
    fn test_compare_patterns_sleep_sentence() {
        let mut check_ins = vec![entry(4.0, 6.0, 30.0, 30.0, 4.0); 7];
        check_ins.extend(vec![entry(4.0, 7.0, 30.0, 30.0, 4.0); 8]);
        let result = compare_patterns(&check_ins);
        // Split at 7: first half all 6h, second half all 7h
        assert_eq!(
            result.sleep_correlation,
            "Improved sleep correlates with cognitive load changes."
        );
    }

    #[test]
    fn test_light_days_after_peak_signal() {
        let peak = entry(10.0, 5.0, 90.0, 90.0, 2.0);
        let calm = entry(2.0, 8.0, 10.0, 10.0, 4.0);
        let check_ins = vec![calm.clone(), calm.clone(), peak, calm.clone(), calm];
        let signals = detect_recovery_signals(&check_ins);

        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].description, "Two moderate-focus days reduced volatility");
        // Swing into the peak was large; the two light days are identical
        assert_eq!(signals[0].percentage, 100);
        assert_eq!(signals[0].impact, "Volatility decreased by 100%");
    }

    #[test]
    fn test_sleep_and_switching_signals() {
        let check_ins = vec![
            entry(7.0, 6.0, 30.0, 70.0, 4.0),
            entry(7.0, 6.0, 30.0, 70.0, 4.0),
            entry(7.0, 6.0, 30.0, 60.0, 4.0),
            entry(7.0, 7.0, 30.0, 50.0, 4.0),
            entry(7.0, 7.0, 30.0, 40.0, 4.0),
            entry(7.0, 7.0, 30.0, 40.0, 4.0),
        ];
        let signals = detect_recovery_signals(&check_ins);
        let descriptions: Vec<_> = signals.iter().map(|s| s.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec!["Sleep improvement detected", "Task switching frequency decreased"]
        );
        // Last five sleeps: 6, 6 → 7, 7
        assert_eq!(signals[0].impact, "Average sleep increased by 1.0 hours");
        assert_eq!(signals[0].percentage, 17);
        assert_eq!(signals[1].impact, "Switching reduced from 70 to 40");
        assert_eq!(signals[1].percentage, 43);
    }

    #[test]
    fn test_no_signals_below_five() {
        assert!(detect_recovery_signals(&vec![with_load(30.0); 4]).is_empty());
    }

    #[test]
    fn test_sleep_streak_over_six_days() {
        let check_ins: Vec<_> = [7.0, 8.0, 7.5, 9.0, 7.0, 7.2]
            .into_iter()
            .map(|sleep| entry(4.0, sleep, 30.0, 30.0, 4.0))
            .collect();
        let streaks = compute_micro_streaks(&check_ins);
        assert_eq!(
            streaks[1],
            MicroStreak {
                label: "Sleep consistency".to_string(),
                days: 6,
                active: true
            }
        );
    }

    #[test]
    fn test_streaks_reset_on_latest_failure() {
        let mut check_ins = vec![with_load(30.0); 5];
        check_ins.push(entry(12.0, 4.0, 100.0, 100.0, 1.0));
        let streaks = compute_micro_streaks(&check_ins);
        assert_eq!(streaks[0].days, 0);
        assert_eq!(streaks[1].days, 0);
        assert_eq!(streaks[2].days, 0);
        assert!(streaks.iter().all(|s| !s.active));
    }

    #[test]
    fn test_streaks_zero_below_two_entries() {
        let streaks = compute_micro_streaks(&[with_load(10.0)]);
        let labels: Vec<_> = streaks.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Stability", "Sleep consistency", "Low volatility"]);
        assert!(streaks.iter().all(|s| s.days == 0 && !s.active));
    }

    #[test]
    fn test_low_volatility_streak_counts_pairs() {
        let check_ins: Vec<_> = [80.0, 30.0, 32.0, 35.0, 36.0]
            .into_iter()
            .map(with_load)
            .collect();
        let streaks = compute_micro_streaks(&check_ins);
        // Four loads below 60, three small swings after the drop
        assert_eq!(streaks[0].days, 4);
        assert_eq!(streaks[2].days, 3);
        assert!(streaks[2].active);
    }
}
