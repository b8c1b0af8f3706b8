//! Cogload CLI - Command-line interface for the Cogload engine
//!
//! Commands:
//! - analyze: Run every model over the stored (or supplied) history
//! - add: Record a check-in
//! - simulate: Project the upcoming week
//! - experiment: List, start and track behavioral experiments
//! - coach: Coaching advice, optionally from a local model server
//! - validate: Range-check a file of check-ins
//! - consent: Grant, revoke or show local data consent
//! - doctor: Diagnose configuration and storage
//! - clear: Delete all stored records

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cogload::coach::{CoachIntelligence, NoGenerator};
use cogload::experiments::{complete_due, experiment_progress, merge_with_catalog, start_experiment};
use cogload::store::{JsonFileRepository, Repository};
use cogload::types::{CheckIn, ExperimentStatus, SimulationInput};
use cogload::{CognitiveEngine, ComputeError, EngineConfig, EngineReport};
use cogload::{COGLOAD_VERSION, PRODUCER_NAME};

/// Cogload - Deterministic analytics for daily cognitive-load check-ins
#[derive(Parser)]
#[command(name = "cogload")]
#[command(version = COGLOAD_VERSION)]
#[command(about = "Model cognitive load from daily check-ins", long_about = None)]
struct Cli {
    /// Directory holding checkins.json, experiments.json and consent
    #[arg(long, global = true, default_value = ".cogload")]
    data_dir: PathBuf,

    /// Engine configuration file (defaults to $COGLOAD_CONFIG or ./cogload.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every model and print the report
    Analyze {
        /// Read check-ins from a JSON array file instead of the data directory (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Record a check-in
    Add {
        /// Hours of focused work (0-16)
        #[arg(long)]
        focus: f64,

        /// Hours slept (0-12)
        #[arg(long)]
        sleep: f64,

        /// Deadline pressure (0-100)
        #[arg(long)]
        deadline: f64,

        /// Task switching (0-100)
        #[arg(long)]
        switching: f64,

        /// Mental clarity (1-5)
        #[arg(long)]
        clarity: f64,

        /// Optional one-word mood
        #[arg(long)]
        mood: Option<String>,

        /// Date of the check-in (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Project the upcoming week
    Simulate {
        /// Expected workload (0-100 %)
        #[arg(long, default_value = "50")]
        workload: f64,

        /// Number of major deadlines
        #[arg(long, default_value = "1")]
        deadlines: u32,

        /// Planned nightly sleep (hours)
        #[arg(long, default_value = "7.5")]
        sleep: f64,

        /// Recovery intention (0-100 %)
        #[arg(long, default_value = "50")]
        recovery: f64,

        /// Run the preset scenarios instead
        #[arg(long)]
        scenarios: bool,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Behavioral experiments
    Experiment {
        #[command(subcommand)]
        action: ExperimentAction,
    },

    /// Coaching advice for the current state
    Coach {
        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Range-check a JSON array of check-ins
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Grant, revoke or show consent to store check-ins locally
    Consent {
        #[arg(value_enum)]
        action: ConsentAction,
    },

    /// Diagnose configuration and storage
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete every stored record
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ExperimentAction {
    /// List the catalog with stored status
    List,
    /// Start an experiment
    Start {
        /// Experiment id (see `experiment list`)
        id: String,
    },
    /// Progress of active experiments
    Status,
}

#[derive(Clone, ValueEnum)]
enum ConsentAction {
    Grant,
    Revoke,
    Status,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    Text,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CogloadCliError> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };
    let engine = CognitiveEngine::new(config);
    let mut repo = JsonFileRepository::new(&cli.data_dir);

    match cli.command {
        Commands::Analyze { input, format } => cmd_analyze(&engine, &repo, input.as_deref(), format),

        Commands::Add {
            focus,
            sleep,
            deadline,
            switching,
            clarity,
            mood,
            date,
        } => {
            let mut check_in = CheckIn::new(
                date.unwrap_or_else(today),
                focus,
                sleep,
                deadline,
                switching,
                clarity,
            );
            if let Some(mood) = mood {
                check_in = check_in.with_mood(mood);
            }
            cmd_add(&mut repo, check_in)
        }

        Commands::Simulate {
            workload,
            deadlines,
            sleep,
            recovery,
            scenarios,
            format,
        } => {
            let input = SimulationInput {
                expected_workload: workload,
                major_deadlines: deadlines,
                planned_sleep: sleep,
                recovery_intention: recovery,
            };
            cmd_simulate(&engine, &repo, &input, scenarios, format)
        }

        Commands::Experiment { action } => cmd_experiment(&mut repo, action),

        Commands::Coach { format } => cmd_coach(&engine, &repo, format),

        Commands::Validate { input, json } => cmd_validate(&input, json),

        Commands::Consent { action } => cmd_consent(&mut repo, action),

        Commands::Doctor { json } => cmd_doctor(&engine, &repo, cli.config.as_deref(), json),

        Commands::Clear { yes } => {
            if !yes {
                return Err(CogloadCliError::ConfirmationRequired);
            }
            repo.clear()?;
            println!("Cleared all records in {}", repo.dir().display());
            Ok(())
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn read_input(input: &Path) -> Result<String, CogloadCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn print_json<T: serde::Serialize>(value: &T, format: &OutputFormat) -> Result<(), CogloadCliError> {
    match format {
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(value)?),
        _ => println!("{}", serde_json::to_string(value)?),
    }
    Ok(())
}

fn cmd_analyze(
    engine: &CognitiveEngine,
    repo: &JsonFileRepository,
    input: Option<&Path>,
    format: OutputFormat,
) -> Result<(), CogloadCliError> {
    let check_ins: Vec<CheckIn> = match input {
        Some(path) => serde_json::from_str(&read_input(path)?)?,
        None => repo.check_ins()?,
    };

    let report = engine.analyze(&check_ins);
    match format {
        OutputFormat::Text => print_report(&report),
        _ => print_json(&report, &format)?,
    }
    Ok(())
}

fn print_report(report: &EngineReport) {
    println!("Cogload Report");
    println!("==============");
    println!("Check-ins:  {}", report.check_in_count);
    println!(
        "Load:       {}/100 ({})",
        report.load.load_index,
        report.load.tier.as_str()
    );
    println!(
        "Stability:  {}/100 ({})",
        report.stability.score, report.stability.label
    );
    println!("Archetype:  {}", report.archetype.name);
    println!(
        "Elasticity: {}/100 ({})",
        report.elasticity.score, report.elasticity.label
    );
    println!(
        "Risk:       burnout {}%, instability {}%, recovery deficit {}%",
        report.risk.burnout_probability, report.risk.instability_risk, report.risk.recovery_deficit
    );
    println!(
        "Evolution:  level {} ({})",
        report.evolution.level, report.evolution.name
    );
    println!("\n{}", report.load.explanation);
    println!("\nHypothesis: {}", report.hypothesis);

    if !report.insights.is_empty() {
        println!("\nInsights:");
        for card in &report.insights {
            println!("  - {}: {}", card.title, card.body);
        }
    }

    let streaks: Vec<String> = report
        .micro_streaks
        .iter()
        .filter(|s| s.active)
        .map(|s| format!("{} ({} days)", s.label, s.days))
        .collect();
    if !streaks.is_empty() {
        println!("\nActive streaks: {}", streaks.join(", "));
    }
}

fn cmd_add(repo: &mut JsonFileRepository, check_in: CheckIn) -> Result<(), CogloadCliError> {
    if !repo.consent()? {
        return Err(CogloadCliError::NoConsent);
    }

    if let Some(violation) = check_in.validate().into_iter().next() {
        return Err(ComputeError::InvalidCheckIn {
            id: check_in.id.clone(),
            reason: format!("{}: {}", violation.field, violation.message),
        }
        .into());
    }

    let id = check_in.id.clone();
    let date = check_in.date;
    repo.append_check_in(check_in)?;
    tracing::info!(id = %id, %date, "recorded check-in");
    println!("Recorded check-in {} for {}", id, date);
    Ok(())
}

fn cmd_simulate(
    engine: &CognitiveEngine,
    repo: &JsonFileRepository,
    input: &SimulationInput,
    scenarios: bool,
    format: OutputFormat,
) -> Result<(), CogloadCliError> {
    let check_ins = repo.check_ins()?;

    if scenarios {
        let outcomes = engine.scenarios(&check_ins);
        match format {
            OutputFormat::Text => {
                for outcome in &outcomes {
                    println!(
                        "{:<14} risk {:>3}%  loads {:?}",
                        outcome.name, outcome.risk, outcome.loads
                    );
                }
            }
            _ => print_json(&outcomes, &format)?,
        }
        return Ok(());
    }

    let result = engine.simulate(&check_ins, input);
    match format {
        OutputFormat::Text => {
            println!("Projected loads: {:?}", result.projected_loads);
            println!("Peak day:        {}", result.peak_day);
            println!("Risk:            {}%", result.risk_probability);
            println!("Stability shift: {:+}", result.stability_shift);
            println!("\n{}", result.summary);
        }
        _ => print_json(&result, &format)?,
    }
    Ok(())
}

fn cmd_experiment(
    repo: &mut JsonFileRepository,
    action: ExperimentAction,
) -> Result<(), CogloadCliError> {
    let today = today();
    let mut experiments = repo.experiments()?;
    if complete_due(&mut experiments, today) > 0 {
        repo.save_experiments(&experiments)?;
    }

    match action {
        ExperimentAction::List => {
            for experiment in merge_with_catalog(&experiments) {
                println!(
                    "{:<18} {:<10} {:>2}d  {}",
                    experiment.id,
                    status_label(experiment.status),
                    experiment.duration,
                    experiment.name
                );
            }
        }
        ExperimentAction::Start { id } => {
            let check_ins = repo.check_ins()?;
            let started = start_experiment(&mut experiments, &id, &check_ins, today)?;
            repo.save_experiments(&experiments)?;
            println!(
                "Started '{}' for {} days (baseline stability {})",
                started.name,
                started.duration,
                started.baseline_value.unwrap_or_default()
            );
        }
        ExperimentAction::Status => {
            let check_ins = repo.check_ins()?;
            let active: Vec<_> = experiments
                .iter()
                .filter_map(|e| experiment_progress(e, &check_ins, today))
                .collect();
            if active.is_empty() {
                println!("No active experiments");
            }
            for progress in active {
                println!(
                    "{:<18} day {:>2}  {:>3}%  baseline {} → current {} ({:+})",
                    progress.id,
                    progress.elapsed_days,
                    progress.progress,
                    progress.baseline,
                    progress.current,
                    progress.delta
                );
            }
        }
    }
    Ok(())
}

fn status_label(status: ExperimentStatus) -> &'static str {
    match status {
        ExperimentStatus::Available => "available",
        ExperimentStatus::Active => "active",
        ExperimentStatus::Completed => "completed",
    }
}

fn cmd_coach(
    engine: &CognitiveEngine,
    repo: &JsonFileRepository,
    format: OutputFormat,
) -> Result<(), CogloadCliError> {
    let check_ins = repo.check_ins()?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let intelligence = runtime.block_on(coach_intelligence(engine, &check_ins));

    match format {
        OutputFormat::Text => {
            println!("Insight:      {}", intelligence.advice.insight);
            println!("Protection:   {}", intelligence.advice.protection_strategy);
            println!("Optimization: {}", intelligence.advice.optimization);
            if let Some(warning) = &intelligence.advice.risk_warning {
                println!("Risk:         {}", warning);
            }
        }
        _ => print_json(&intelligence, &format)?,
    }
    Ok(())
}

#[cfg(feature = "llm")]
async fn coach_intelligence(engine: &CognitiveEngine, check_ins: &[CheckIn]) -> CoachIntelligence {
    let config = &engine.config().coach;
    if config.enabled {
        let generator = cogload::coach::OllamaGenerator::from_config(config);
        engine.coach(check_ins, Some(&generator)).await
    } else {
        engine.coach(check_ins, None::<&NoGenerator>).await
    }
}

#[cfg(not(feature = "llm"))]
async fn coach_intelligence(engine: &CognitiveEngine, check_ins: &[CheckIn]) -> CoachIntelligence {
    if engine.config().coach.enabled {
        tracing::warn!("Generated coaching is enabled but this build lacks the llm feature");
    }
    engine.coach(check_ins, None::<&NoGenerator>).await
}

/// Per-field violations plus counts of distinct invalid check-ins
fn validation_report(check_ins: &[CheckIn]) -> ValidationReport {
    let errors: Vec<ValidationErrorDetail> = check_ins
        .iter()
        .enumerate()
        .flat_map(|(index, check_in)| {
            check_in
                .validate()
                .into_iter()
                .map(move |violation| ValidationErrorDetail {
                    index,
                    check_in_id: check_in.id.clone(),
                    field: violation.field.to_string(),
                    error: violation.message,
                })
        })
        .collect();

    let invalid = check_ins.iter().filter(|c| !c.validate().is_empty()).count();

    ValidationReport {
        total_check_ins: check_ins.len(),
        valid_check_ins: check_ins.len() - invalid,
        invalid_check_ins: invalid,
        errors,
    }
}

fn cmd_validate(input: &Path, json: bool) -> Result<(), CogloadCliError> {
    let check_ins: Vec<CheckIn> = serde_json::from_str(&read_input(input)?)?;
    let report = validation_report(&check_ins);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total check-ins:   {}", report.total_check_ins);
        println!("Valid check-ins:   {}", report.valid_check_ins);
        println!("Invalid check-ins: {}", report.invalid_check_ins);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - Check-in {} (index {}) {}: {}",
                    err.check_in_id, err.index, err.field, err.error
                );
            }
        }
    }

    if report.invalid_check_ins > 0 {
        Err(CogloadCliError::ValidationFailed(report.invalid_check_ins))
    } else {
        Ok(())
    }
}

fn cmd_consent(repo: &mut JsonFileRepository, action: ConsentAction) -> Result<(), CogloadCliError> {
    match action {
        ConsentAction::Grant => repo.set_consent(true)?,
        ConsentAction::Revoke => repo.set_consent(false)?,
        ConsentAction::Status => {}
    }
    let granted = repo.consent()?;
    println!("Consent {}", if granted { "granted" } else { "not granted" });
    Ok(())
}

fn cmd_doctor(
    engine: &CognitiveEngine,
    repo: &JsonFileRepository,
    config_path: Option<&Path>,
    json: bool,
) -> Result<(), CogloadCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "cogload_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Cogload version {}", COGLOAD_VERSION),
    });

    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(EngineConfig::path);
    checks.push(config_check(&config_path));

    match repo.check_ins() {
        Ok(check_ins) => checks.push(DoctorCheck {
            name: "data_dir".to_string(),
            status: if repo.dir().exists() {
                CheckStatus::Ok
            } else {
                CheckStatus::Warning
            },
            message: format!(
                "{} ({} check-ins)",
                repo.dir().display(),
                check_ins.len()
            ),
        }),
        Err(e) => checks.push(DoctorCheck {
            name: "data_dir".to_string(),
            status: CheckStatus::Error,
            message: format!("Cannot read check-ins: {}", e),
        }),
    }

    let coach = &engine.config().coach;
    checks.push(DoctorCheck {
        name: "coach".to_string(),
        status: if coach.enabled && !cfg!(feature = "llm") {
            CheckStatus::Warning
        } else {
            CheckStatus::Ok
        },
        message: match (coach.enabled, cfg!(feature = "llm")) {
            (false, _) => "Rule-based coaching only".to_string(),
            (true, true) => format!(
                "Generated coaching via {} ({}), {}s timeout",
                coach.endpoint, coach.model, coach.timeout_secs
            ),
            (true, false) => "Generated coaching enabled but built without the llm feature".to_string(),
        },
    });

    checks.push(DoctorCheck {
        name: "stdin".to_string(),
        status: CheckStatus::Ok,
        message: if atty::is(atty::Stream::Stdin) {
            "stdin is a TTY (interactive mode)".to_string()
        } else {
            "stdin is a pipe (use -i - to read check-ins)".to_string()
        },
    });

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: COGLOAD_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Cogload Doctor Report");
        println!("=====================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(CogloadCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn config_check(path: &Path) -> DoctorCheck {
    let name = "config".to_string();
    if !path.exists() {
        return DoctorCheck {
            name,
            status: CheckStatus::Ok,
            message: format!("{} not found, using defaults", path.display()),
        };
    }
    match fs::read_to_string(path) {
        Ok(content) => match EngineConfig::from_toml_str(&content) {
            Ok(_) => DoctorCheck {
                name,
                status: CheckStatus::Ok,
                message: format!("{} is valid", path.display()),
            },
            Err(e) => DoctorCheck {
                name,
                status: CheckStatus::Error,
                message: format!("Invalid config: {}", e),
            },
        },
        Err(e) => DoctorCheck {
            name,
            status: CheckStatus::Error,
            message: format!("Cannot read config file: {}", e),
        },
    }
}

// Error types

#[derive(Debug)]
enum CogloadCliError {
    Io(io::Error),
    Compute(ComputeError),
    Json(serde_json::Error),
    ValidationFailed(usize),
    DoctorFailed,
    NoConsent,
    ConfirmationRequired,
}

impl From<io::Error> for CogloadCliError {
    fn from(e: io::Error) -> Self {
        CogloadCliError::Io(e)
    }
}

impl From<ComputeError> for CogloadCliError {
    fn from(e: ComputeError) -> Self {
        CogloadCliError::Compute(e)
    }
}

impl From<serde_json::Error> for CogloadCliError {
    fn from(e: serde_json::Error) -> Self {
        CogloadCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CogloadCliError> for CliError {
    fn from(e: CogloadCliError) -> Self {
        match e {
            CogloadCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            CogloadCliError::Compute(e) => {
                let (code, hint) = match &e {
                    ComputeError::InvalidCheckIn { .. } => {
                        ("INVALID_CHECK_IN", "Run 'cogload add --help' for valid ranges")
                    }
                    ComputeError::UnknownExperiment(_) => {
                        ("UNKNOWN_EXPERIMENT", "Run 'cogload experiment list' for ids")
                    }
                    ComputeError::ExperimentAlreadyActive(_) => (
                        "EXPERIMENT_ACTIVE",
                        "Check progress with 'cogload experiment status'",
                    ),
                    ComputeError::ConfigError(_) => ("CONFIG_ERROR", "Run 'cogload doctor'"),
                    _ => ("COMPUTE_ERROR", "Check input format"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            CogloadCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Input must be a JSON array of check-ins".to_string()),
            },
            CogloadCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} check-ins failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            CogloadCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
            CogloadCliError::NoConsent => CliError {
                code: "NO_CONSENT".to_string(),
                message: "Check-ins are only stored after consent is granted".to_string(),
                hint: Some("Run 'cogload consent grant'".to_string()),
            },
            CogloadCliError::ConfirmationRequired => CliError {
                code: "CONFIRMATION_REQUIRED".to_string(),
                message: "Refusing to delete records without confirmation".to_string(),
                hint: Some("Re-run with --yes".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_check_ins: usize,
    valid_check_ins: usize,
    invalid_check_ins: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    check_in_id: String,
    field: String,
    error: String,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_in(focus: f64, sleep: f64, clarity: f64) -> CheckIn {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        CheckIn::new(date, focus, sleep, 40.0, 30.0, clarity)
    }

    #[test]
    fn test_validation_report_counts_check_ins_not_violations() {
        let check_ins = vec![
            check_in(20.0, 14.0, 0.0),
            check_in(6.0, 7.0, 3.0),
            check_in(6.0, 7.0, 9.0),
            check_in(-1.0, 7.0, 3.0),
        ];
        let report = validation_report(&check_ins);

        assert_eq!(report.total_check_ins, 4);
        assert_eq!(report.invalid_check_ins, 3);
        assert_eq!(report.valid_check_ins, 1);
        assert_eq!(report.errors.len(), 5);
        assert_eq!(report.errors[0].index, 0);
        assert_eq!(report.errors[4].index, 3);
    }
}
