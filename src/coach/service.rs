//! Coaching service with an optional generated override
//!
//! The rule-based advice is always computed first. When a text generator is
//! supplied, its response replaces the advice only if it arrives within the
//! timeout and contains an INSIGHT section; every other outcome falls back
//! silently.

use super::rules::generate_coach_advice;
use crate::error::GeneratorError;
use crate::types::{CheckIn, CoachAdvice, CognitiveLoad, StabilityIndex};
use crate::window::{mean, round_half_up, tail};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

/// Default hard timeout for the generated override
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(8);

const DEFAULT_PROTECTION: &str = "Maintain current protective patterns.";
const DEFAULT_OPTIMIZATION: &str = "Continue current optimization approach.";

/// Where a piece of advice came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceSource {
    Algorithmic,
    Generated,
}

/// Advice plus its provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachIntelligence {
    #[serde(flatten)]
    pub advice: CoachAdvice,
    pub source: AdviceSource,
}

/// A service able to produce free-form coaching text from a context summary
pub trait CoachTextGenerator: Send + Sync {
    /// Generate a response containing INSIGHT/PROTECTION/OPTIMIZATION/RISK sections
    fn try_generate(
        &self,
        context: &str,
    ) -> impl Future<Output = Result<String, GeneratorError>> + Send;
}

/// Generator used when no override is configured; always declines
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGenerator;

impl CoachTextGenerator for NoGenerator {
    fn try_generate(
        &self,
        _context: &str,
    ) -> impl Future<Output = Result<String, GeneratorError>> + Send {
        std::future::ready(Err(GeneratorError::NotConfigured))
    }
}

/// Plain-text summary of the current state sent to the generator
pub fn build_context(
    check_ins: &[CheckIn],
    load: &CognitiveLoad,
    stability: &StabilityIndex,
) -> String {
    let recent = tail(check_ins, 7);
    let field_mean = |field: fn(&CheckIn) -> f64| {
        let values: Vec<f64> = recent.iter().map(field).collect();
        mean(&values)
    };

    let avg_sleep = field_mean(|c| c.sleep_hours)
        .map(|s| format!("{:.1}", s))
        .unwrap_or_else(|| "N/A".to_string());
    let avg_switching = field_mean(|c| c.task_switching).map_or(0.0, round_half_up);
    let avg_deadline = field_mean(|c| c.deadline_pressure).map_or(0.0, round_half_up);
    let factors: Vec<String> = load
        .factors
        .iter()
        .map(|f| format!("{} ({})", f.name, f.impact.as_str()))
        .collect();

    format!(
        "Cognitive System State:\n\
         - Load Index: {}/100 ({} tier)\n\
         - Stability Score: {}/100 ({})\n\
         - Pattern: {}\n\
         - Avg Sleep (7d): {}h\n\
         - Avg Task Switching (7d): {}/100\n\
         - Avg Deadline Pressure (7d): {}/100\n\
         - Check-ins: {} total\n\
         - Top Factors: {}",
        load.load_index,
        load.tier.as_str(),
        stability.score,
        stability.label,
        stability.pattern_regularity,
        avg_sleep,
        avg_switching,
        avg_deadline,
        check_ins.len(),
        factors.join(", ")
    )
}

fn next_section_header() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| Regex::new(r"\n[A-Z]+:").expect("valid section header regex"))
}

/// Text following `LABEL:` up to the next `\n<UPPERCASE>:` header, trimmed
fn extract_section(text: &str, label: &str) -> Option<String> {
    let marker = format!("{}:", label);
    let start = text.find(&marker)? + marker.len();
    let rest = text[start..].trim_start();
    let end = next_section_header()
        .find(rest)
        .map_or(rest.len(), |m| m.start());
    let body = rest[..end].trim();
    (!body.is_empty()).then(|| body.to_string())
}

/// Parse a generated response into advice.
///
/// A response without an INSIGHT section is rejected. Missing PROTECTION and
/// OPTIMIZATION sections get fixed defaults; a RISK of `none` means no warning.
pub fn parse_generated_advice(text: &str) -> Result<CoachAdvice, GeneratorError> {
    let insight = extract_section(text, "INSIGHT")
        .ok_or_else(|| GeneratorError::Parse("missing INSIGHT section".to_string()))?;

    Ok(CoachAdvice {
        insight,
        protection_strategy: extract_section(text, "PROTECTION")
            .unwrap_or_else(|| DEFAULT_PROTECTION.to_string()),
        optimization: extract_section(text, "OPTIMIZATION")
            .unwrap_or_else(|| DEFAULT_OPTIMIZATION.to_string()),
        risk_warning: extract_section(text, "RISK").filter(|r| !r.eq_ignore_ascii_case("none")),
    })
}

/// Coaching advice, preferring generated text when it is available in time.
///
/// Never fails: without a generator, or on any generator error, timeout or
/// malformed response, the rule-based advice is returned.
pub async fn advise<G: CoachTextGenerator>(
    check_ins: &[CheckIn],
    load: &CognitiveLoad,
    stability: &StabilityIndex,
    generator: Option<&G>,
    timeout: Duration,
) -> CoachIntelligence {
    let fallback = CoachIntelligence {
        advice: generate_coach_advice(check_ins, load, stability),
        source: AdviceSource::Algorithmic,
    };

    let Some(generator) = generator else {
        return fallback;
    };

    let context = build_context(check_ins, load, stability);
    let generated = match tokio::time::timeout(timeout, generator.try_generate(&context)).await {
        Ok(result) => result,
        Err(_) => Err(GeneratorError::Timeout(timeout)),
    };

    match generated.and_then(|text| parse_generated_advice(&text)) {
        Ok(advice) => CoachIntelligence {
            advice,
            source: AdviceSource::Generated,
        },
        Err(err) => {
            tracing::warn!("Coaching generator unavailable, using rule-based advice: {}", err);
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::compute_cognitive_load;
    use crate::load::tests::entry;
    use crate::stability::compute_stability_index;
    use pretty_assertions::assert_eq;

    /// Replies with fixed text after an optional delay
    struct Scripted {
        reply: Result<String, String>,
        delay: Duration,
    }

    impl Scripted {
        fn ok(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                delay: Duration::ZERO,
            }
        }
    }

    impl CoachTextGenerator for Scripted {
        fn try_generate(
            &self,
            _context: &str,
        ) -> impl Future<Output = Result<String, GeneratorError>> + Send {
            let reply = self.reply.clone().map_err(GeneratorError::Request);
            let delay = self.delay;
            async move {
                tokio::time::sleep(delay).await;
                reply
            }
        }
    }

    fn state() -> (Vec<CheckIn>, CognitiveLoad, StabilityIndex) {
        let check_ins = vec![
            entry(8.0, 6.0, 50.0, 40.0, 3.0),
            entry(8.0, 6.0, 60.0, 50.0, 3.0),
            entry(8.0, 6.0, 70.0, 60.0, 3.0),
        ];
        let load = compute_cognitive_load(&check_ins);
        let stability = compute_stability_index(&check_ins);
        (check_ins, load, stability)
    }

    #[test]
    fn test_context_lists_state() {
        let (check_ins, load, stability) = state();
        let context = build_context(&check_ins, &load, &stability);
        assert!(context.starts_with("Cognitive System State:\n- Load Index: "));
        assert!(context.contains("- Avg Sleep (7d): 6.0h"));
        assert!(context.contains("- Avg Task Switching (7d): 50/100"));
        assert!(context.contains("- Avg Deadline Pressure (7d): 60/100"));
        assert!(context.contains("- Check-ins: 3 total"));
        assert!(context.contains("Task switching (increasing)"));
    }

    #[test]
    fn test_context_without_history() {
        let load = compute_cognitive_load(&[]);
        let stability = compute_stability_index(&[]);
        let context = build_context(&[], &load, &stability);
        assert!(context.contains("- Avg Sleep (7d): N/A"));
        assert!(context.contains("- Avg Task Switching (7d): 0/100"));
        assert!(context.ends_with("- Top Factors: "));
    }

    #[test]
    fn test_parse_all_sections() {
        let text = "INSIGHT: You are steady.\nStill steady.\nPROTECTION: Sleep early.\nOPTIMIZATION: Batch email.\nRISK: none";
        let advice = parse_generated_advice(text).unwrap();
        assert_eq!(
            advice,
            CoachAdvice {
                insight: "You are steady.\nStill steady.".to_string(),
                protection_strategy: "Sleep early.".to_string(),
                optimization: "Batch email.".to_string(),
                risk_warning: None,
            }
        );
    }

    #[test]
    fn test_parse_defaults_and_risk() {
        let advice = parse_generated_advice("Preamble\nINSIGHT:  Load is high. \nRISK: Burnout ahead.").unwrap();
        assert_eq!(advice.insight, "Load is high.");
        assert_eq!(advice.protection_strategy, "Maintain current protective patterns.");
        assert_eq!(advice.optimization, "Continue current optimization approach.");
        assert_eq!(advice.risk_warning.as_deref(), Some("Burnout ahead."));

        let advice = parse_generated_advice("INSIGHT: ok\nRISK: NONE").unwrap();
        assert_eq!(advice.risk_warning, None);
    }

    #[test]
    fn test_parse_rejects_missing_insight() {
        assert!(matches!(
            parse_generated_advice("PROTECTION: rest\nRISK: none"),
            Err(GeneratorError::Parse(_))
        ));
        assert!(parse_generated_advice("PROTECTION: rest\nINSIGHT:   ").is_err());
    }

    #[tokio::test]
    async fn test_no_generator_is_algorithmic() {
        let (check_ins, load, stability) = state();
        let result = advise::<NoGenerator>(
            &check_ins,
            &load,
            &stability,
            None,
            DEFAULT_GENERATION_TIMEOUT,
        )
        .await;
        assert_eq!(result.source, AdviceSource::Algorithmic);
        assert_eq!(
            result.advice,
            generate_coach_advice(&check_ins, &load, &stability)
        );

        let declined = advise(
            &check_ins,
            &load,
            &stability,
            Some(&NoGenerator),
            DEFAULT_GENERATION_TIMEOUT,
        )
        .await;
        assert_eq!(declined, result);
    }

    #[tokio::test]
    async fn test_generated_advice_wins() {
        let (check_ins, load, stability) = state();
        let generator = Scripted::ok("INSIGHT: Generated view.\nPROTECTION: p\nOPTIMIZATION: o\nRISK: none");
        let result = advise(&check_ins, &load, &stability, Some(&generator), DEFAULT_GENERATION_TIMEOUT).await;
        assert_eq!(result.source, AdviceSource::Generated);
        assert_eq!(result.advice.insight, "Generated view.");
    }

    #[tokio::test]
    async fn test_failures_fall_back() {
        let (check_ins, load, stability) = state();
        let expected = generate_coach_advice(&check_ins, &load, &stability);

        let failing = Scripted {
            reply: Err("connection refused".to_string()),
            delay: Duration::ZERO,
        };
        let malformed = Scripted::ok("I cannot help with that.");
        let slow = Scripted {
            reply: Ok("INSIGHT: too late".to_string()),
            delay: Duration::from_millis(200),
        };

        for result in [
            advise(&check_ins, &load, &stability, Some(&failing), DEFAULT_GENERATION_TIMEOUT).await,
            advise(&check_ins, &load, &stability, Some(&malformed), DEFAULT_GENERATION_TIMEOUT).await,
            advise(&check_ins, &load, &stability, Some(&slow), Duration::from_millis(20)).await,
        ] {
            assert_eq!(result.source, AdviceSource::Algorithmic);
            assert_eq!(result.advice, expected);
        }
    }

    #[test]
    fn test_intelligence_serializes_flat() {
        let intelligence = CoachIntelligence {
            advice: parse_generated_advice("INSIGHT: fine").unwrap(),
            source: AdviceSource::Generated,
        };
        let json = serde_json::to_value(&intelligence).unwrap();
        assert_eq!(json["insight"], "fine");
        assert_eq!(json["source"], "generated");
        assert!(json["risk_warning"].is_null());
    }
}
