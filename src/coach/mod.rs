//! Coaching advice
//!
//! - [`rules`]: deterministic advice from the current load and stability
//! - [`service`]: optional generated override with timeout and fallback
//! - `ollama`: HTTP generator for a local model server (`llm` feature)

pub mod rules;
pub mod service;

#[cfg(feature = "llm")]
pub mod ollama;

pub use rules::{advice_for, generate_coach_advice, CoachSignals};
pub use service::{
    advise, build_context, parse_generated_advice, AdviceSource, CoachIntelligence,
    CoachTextGenerator, NoGenerator, DEFAULT_GENERATION_TIMEOUT,
};

#[cfg(feature = "llm")]
pub use ollama::OllamaGenerator;
