//! Cogload - Deterministic analytics engine for daily cognitive-load check-ins
//!
//! Cogload turns a sequence of self-reported check-ins (focus, sleep,
//! deadline pressure, task switching, mental clarity) into explainable
//! scores and narratives. Every model is a pure function of the check-in
//! history: load → stability → archetype, elasticity and risk → projections
//! → coaching text.
//!
//! ## Modules
//!
//! - **Models**: load, stability, archetype, elasticity, risk, simulation,
//!   evolution, patterns, DNA
//! - **Narratives**: hypothesis, insight cards, weekly reflection, coaching
//! - **Collaborators**: experiment lifecycle, repositories, configuration

pub mod archetype;
pub mod coach;
pub mod config;
pub mod dna;
pub mod elasticity;
pub mod error;
pub mod evolution;
pub mod experiments;
pub mod insights;
pub mod load;
pub mod patterns;
pub mod pipeline;
pub mod risk;
pub mod simulation;
pub mod stability;
pub mod store;
pub mod types;
pub mod window;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::EngineConfig;
pub use error::{ComputeError, GeneratorError};
pub use pipeline::{analyze, analyze_json, simulate_json, CognitiveEngine, EngineReport};
pub use store::{JsonFileRepository, MemoryRepository, Repository};
pub use types::*;

// Model exports
pub use archetype::determine_cognitive_archetype;
pub use dna::compute_cognitive_dna;
pub use elasticity::{compute_elasticity, compute_model_confidence};
pub use evolution::compute_evolution;
pub use experiments::{available_experiments, experiment_progress, start_experiment};
pub use insights::{generate_hypothesis, generate_insights, generate_weekly_reflection};
pub use load::{compute_cognitive_load, raw_load};
pub use patterns::{
    compare_patterns, compute_correlations, compute_micro_streaks, detect_recovery_signals,
};
pub use risk::{compute_risk_forecast, compute_system_shift};
pub use simulation::{simulate_scenarios, simulate_upcoming_week};
pub use stability::compute_stability_index;

// Coaching exports
pub use coach::{advise, generate_coach_advice, CoachIntelligence, CoachTextGenerator};

/// Cogload version embedded in every report
pub const COGLOAD_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name reported by the CLI and FFI
pub const PRODUCER_NAME: &str = "cogload";
