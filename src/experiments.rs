//! Behavioral experiments
//!
//! A fixed catalog of week-long experiments. Starting one snapshots the
//! current stability score as its baseline; progress is always measured
//! against live stability and never written back.

use crate::error::ComputeError;
use crate::stability::compute_stability_index;
use crate::types::{CheckIn, Experiment, ExperimentProgress, ExperimentStatus};
use crate::window::round_half_up;
use chrono::NaiveDate;

struct Template {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    duration: u32,
    metric: &'static str,
}

static CATALOG: [Template; 4] = [
    Template {
        id: "reduce-switching",
        name: "Reduce Task Switching",
        description: "Minimize context switches for 7 days. Batch similar tasks together.",
        duration: 7,
        metric: "Volatility change",
    },
    Template {
        id: "increase-sleep",
        name: "Sleep Optimization",
        description: "Target 7.5+ hours of sleep each night for 7 days.",
        duration: 7,
        metric: "Stability improvement",
    },
    Template {
        id: "deadline-batching",
        name: "Deadline Batching",
        description: "Consolidate deadlines into 2 peak days, keeping other days lighter.",
        duration: 7,
        metric: "Recovery delta",
    },
    Template {
        id: "deep-work",
        name: "Deep Work Blocks",
        description: "Implement 2-hour uninterrupted focus blocks each day.",
        duration: 7,
        metric: "Focus efficiency",
    },
];

impl Template {
    fn to_experiment(&self) -> Experiment {
        Experiment {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            duration: self.duration,
            metric: self.metric.to_string(),
            status: ExperimentStatus::Available,
            start_date: None,
            end_date: None,
            baseline_value: None,
            current_value: None,
        }
    }
}

/// Every experiment in its available state
pub fn available_experiments() -> Vec<Experiment> {
    CATALOG.iter().map(Template::to_experiment).collect()
}

/// The catalog with stored records laid over their templates
pub fn merge_with_catalog(stored: &[Experiment]) -> Vec<Experiment> {
    available_experiments()
        .into_iter()
        .map(|template| {
            stored
                .iter()
                .find(|e| e.id == template.id)
                .cloned()
                .unwrap_or(template)
        })
        .collect()
}

/// Start the experiment `id`, recording the current stability as baseline.
///
/// A completed record with the same id is replaced. Starting an experiment
/// that is already active fails.
pub fn start_experiment(
    experiments: &mut Vec<Experiment>,
    id: &str,
    check_ins: &[CheckIn],
    today: NaiveDate,
) -> Result<Experiment, ComputeError> {
    let template = CATALOG
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| ComputeError::UnknownExperiment(id.to_string()))?;

    if experiments
        .iter()
        .any(|e| e.id == id && e.status == ExperimentStatus::Active)
    {
        return Err(ComputeError::ExperimentAlreadyActive(id.to_string()));
    }

    let baseline = compute_stability_index(check_ins).score as f64;
    let started = Experiment {
        status: ExperimentStatus::Active,
        start_date: Some(today),
        baseline_value: Some(baseline),
        ..template.to_experiment()
    };

    experiments.retain(|e| e.id != id);
    experiments.push(started.clone());

    tracing::info!(experiment = id, baseline, "started experiment");
    Ok(started)
}

/// Live progress of an active experiment, `None` for any other status
pub fn experiment_progress(
    experiment: &Experiment,
    check_ins: &[CheckIn],
    today: NaiveDate,
) -> Option<ExperimentProgress> {
    if experiment.status != ExperimentStatus::Active {
        return None;
    }
    let start = experiment.start_date?;
    let baseline = experiment.baseline_value?;

    let elapsed_days = (today - start).num_days().max(0);
    let ratio = elapsed_days as f64 / experiment.duration.max(1) as f64;
    let current = compute_stability_index(check_ins).score as f64;

    Some(ExperimentProgress {
        id: experiment.id.clone(),
        elapsed_days,
        progress: round_half_up(ratio * 100.0).min(100.0) as u8,
        baseline,
        current,
        delta: current - baseline,
    })
}

/// Mark every active experiment whose duration has elapsed as completed.
///
/// Returns the number of experiments that changed state.
pub fn complete_due(experiments: &mut [Experiment], today: NaiveDate) -> usize {
    let mut completed = 0;
    for experiment in experiments
        .iter_mut()
        .filter(|e| e.status == ExperimentStatus::Active)
    {
        let Some(start) = experiment.start_date else {
            continue;
        };
        if (today - start).num_days() >= experiment.duration as i64 {
            experiment.status = ExperimentStatus::Completed;
            experiment.end_date = Some(today);
            completed += 1;
        }
    }
    completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::tests::entry;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap() + Duration::days(offset)
    }

    fn steady() -> Vec<CheckIn> {
        vec![entry(0.0, 8.0, 50.0, 50.0, 5.0); 5]
    }

    #[test]
    fn test_catalog_is_fixed() {
        let ids: Vec<_> = available_experiments().into_iter().map(|e| e.id).collect();
        assert_eq!(
            ids,
            vec!["reduce-switching", "increase-sleep", "deadline-batching", "deep-work"]
        );
        assert!(available_experiments()
            .iter()
            .all(|e| e.duration == 7 && e.status == ExperimentStatus::Available));
    }

    #[test]
    fn test_start_snapshots_baseline() {
        let mut experiments = Vec::new();
        let started = start_experiment(&mut experiments, "deep-work", &steady(), day(0)).unwrap();

        assert_eq!(started.status, ExperimentStatus::Active);
        assert_eq!(started.start_date, Some(day(0)));
        assert_eq!(started.baseline_value, Some(100.0));
        assert_eq!(started.current_value, None);
        assert_eq!(experiments.len(), 1);
    }

    #[test]
    fn test_start_rejects_unknown_and_active() {
        let mut experiments = Vec::new();
        assert!(matches!(
            start_experiment(&mut experiments, "cold-showers", &[], day(0)),
            Err(ComputeError::UnknownExperiment(_))
        ));

        start_experiment(&mut experiments, "increase-sleep", &[], day(0)).unwrap();
        assert!(matches!(
            start_experiment(&mut experiments, "increase-sleep", &[], day(1)),
            Err(ComputeError::ExperimentAlreadyActive(_))
        ));
        assert_eq!(experiments.len(), 1);
    }

    #[test]
    fn test_progress_uses_live_stability() {
        let mut experiments = Vec::new();
        // Calibrating history: baseline 50
        let started = start_experiment(&mut experiments, "reduce-switching", &[], day(0)).unwrap();

        let progress = experiment_progress(&started, &steady(), day(3)).unwrap();
        assert_eq!(progress.elapsed_days, 3);
        // 3 / 7 = 42.86%
        assert_eq!(progress.progress, 43);
        assert_eq!(progress.current, 100.0);
        assert_eq!(progress.delta, 50.0);
        assert_eq!(started.baseline_value, Some(50.0));

        let later = experiment_progress(&started, &steady(), day(20)).unwrap();
        assert_eq!(later.progress, 100);
    }

    #[test]
    fn test_progress_none_when_not_active() {
        let template = &available_experiments()[0];
        assert!(experiment_progress(template, &steady(), day(0)).is_none());
    }

    #[test]
    fn test_complete_due_and_restart() {
        let mut experiments = Vec::new();
        start_experiment(&mut experiments, "deep-work", &[], day(0)).unwrap();

        assert_eq!(complete_due(&mut experiments, day(6)), 0);
        assert_eq!(complete_due(&mut experiments, day(7)), 1);
        assert_eq!(experiments[0].status, ExperimentStatus::Completed);
        assert_eq!(experiments[0].end_date, Some(day(7)));

        // A completed experiment can be run again
        start_experiment(&mut experiments, "deep-work", &steady(), day(8)).unwrap();
        assert_eq!(experiments.len(), 1);
        assert_eq!(experiments[0].status, ExperimentStatus::Active);
    }

    #[test]
    fn test_merge_with_catalog() {
        let mut experiments = Vec::new();
        start_experiment(&mut experiments, "deadline-batching", &[], day(0)).unwrap();
        let merged = merge_with_catalog(&experiments);
        assert_eq!(merged.len(), 4);
        assert_eq!(merged[2].status, ExperimentStatus::Active);
        assert_eq!(merged[0].status, ExperimentStatus::Available);
    }
}
