//! Impact calculation: structured metric deltas from the model, with a
//! deterministic keyword rule engine as the fallback path.

use rand::Rng;
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::Heuristic;
use crate::completion::{CompletionClient, RETRY_DELAY};
use crate::error::{LabError, Result};
use crate::metrics::MetricsDelta;
use crate::parse;
use crate::prompts;

/// Outer attempt budget; each attempt is a single transport try.
const IMPACT_ATTEMPTS: u32 = 3;

pub struct ImpactCalculator {
    client: CompletionClient,
}

impl ImpactCalculator {
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }

    /// Derive a validated [`MetricsDelta`] for a decision.
    ///
    /// Up to 3 attempts; from the second attempt on the prompt carries a
    /// freshly-drawn persona prefix. A parse error, missing key, or client
    /// failure aborts the attempt; exhausting all attempts invokes the
    /// keyword rule engine.
    pub async fn calculate(
        &self,
        scenario_description: &str,
        choice_description: &str,
        heuristics: &[Heuristic],
    ) -> MetricsDelta {
        let base_prompt = prompts::impact_prompt(scenario_description, choice_description, heuristics);

        for attempt in 0..IMPACT_ATTEMPTS {
            let prompt = if attempt == 0 {
                base_prompt.clone()
            } else {
                format!("{} {base_prompt}", prompts::random_perspective())
            };

            if let Some(text) = self
                .client
                .complete_with_retries(&prompt, prompts::IMPACT_SYSTEM, 1)
                .await
            {
                match parse_impacts(&text) {
                    Ok(delta) => return delta,
                    Err(e) => warn!(attempt = attempt + 1, error = %e, "impact response rejected"),
                }
            }

            if attempt + 1 < IMPACT_ATTEMPTS {
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }

        debug!("impact calculation degraded to keyword rules");
        fallback_impacts(choice_description)
    }
}

/// Parse a model response into a delta: all four keys required, values
/// clamped into range (never rejected for being out of range).
fn parse_impacts(text: &str) -> Result<MetricsDelta> {
    let cleaned = parse::strip_code_fences(text);
    let body: Value = serde_json::from_str(&cleaned)?;

    let delta = MetricsDelta {
        cash_flow: require_int(&body, "cash_flow")?,
        customer_satisfaction: require_percent(&body, "customer_satisfaction")?,
        growth_potential: require_percent(&body, "growth_potential")?,
        risk_level: require_percent(&body, "risk_level")?,
    };
    Ok(delta.clamped())
}

fn require_int(body: &Value, key: &str) -> Result<i64> {
    body.get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| LabError::Validation {
            message: format!("missing or non-integer metric '{key}'"),
        })
}

fn require_percent(body: &Value, key: &str) -> Result<i32> {
    let value = require_int(body, key)?;
    Ok(value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

/// Deterministic rule engine over the lowercased choice text. Triggers are
/// independent per metric; within a metric group the first matching rule
/// wins. Unmatched metrics stay 0.
pub fn fallback_impacts(choice_description: &str) -> MetricsDelta {
    let choice_lower = choice_description.to_lowercase();
    let mut rng = rand::thread_rng();
    let mut delta = MetricsDelta::default();

    if contains_any(&choice_lower, &["invest", "purchase", "buy", "spend"]) {
        delta.cash_flow = rng.gen_range(-25_000..=-10_000);
    } else if contains_any(&choice_lower, &["save", "reduce cost", "minimize"]) {
        delta.cash_flow = rng.gen_range(5_000..=15_000);
    }

    if contains_any(&choice_lower, &["customer", "service", "experience", "quality"]) {
        delta.customer_satisfaction = rng.gen_range(5..=15);
    }

    if contains_any(&choice_lower, &["expand", "grow", "improve", "upgrade"]) {
        delta.growth_potential = rng.gen_range(5..=15);
    }

    if contains_any(&choice_lower, &["safe", "secure", "protect"]) {
        delta.risk_level = rng.gen_range(-15..=-5);
    } else if contains_any(&choice_lower, &["risky", "aggressive", "ambitious"]) {
        delta.risk_level = rng.gen_range(5..=15);
    }

    delta
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}
