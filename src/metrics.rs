//! Business-health metrics: per-decision deltas, cumulative state, and the
//! derived health score.
//!
//! The crate never owns a `MetricsState` across calls; the consuming
//! application holds it and applies deltas through [`MetricsState::apply`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Heuristic;

/// Bounds for a single decision's cash flow impact.
pub const CASH_FLOW_DELTA_MIN: i64 = -50_000;
pub const CASH_FLOW_DELTA_MAX: i64 = 25_000;

/// Bounds for a single decision's impact on the three percentage metrics.
pub const PERCENT_DELTA_MIN: i32 = -25;
pub const PERCENT_DELTA_MAX: i32 = 25;

/// The four-field numeric adjustment produced per decision.
///
/// Struct fields (not map keys) enforce the always-all-four-present invariant;
/// ranges are enforced by [`MetricsDelta::clamped`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsDelta {
    pub cash_flow: i64,
    pub customer_satisfaction: i32,
    pub growth_potential: i32,
    pub risk_level: i32,
}

impl MetricsDelta {
    /// Clamp each field into its declared range. Out-of-range values are
    /// clamped, not rejected.
    pub fn clamped(self) -> Self {
        Self {
            cash_flow: self.cash_flow.clamp(CASH_FLOW_DELTA_MIN, CASH_FLOW_DELTA_MAX),
            customer_satisfaction: self
                .customer_satisfaction
                .clamp(PERCENT_DELTA_MIN, PERCENT_DELTA_MAX),
            growth_potential: self.growth_potential.clamp(PERCENT_DELTA_MIN, PERCENT_DELTA_MAX),
            risk_level: self.risk_level.clamp(PERCENT_DELTA_MIN, PERCENT_DELTA_MAX),
        }
    }

    /// Sum of all four fields, used to key the overall-outlook sentence in
    /// fallback analysis.
    pub fn total(&self) -> i64 {
        self.cash_flow
            + i64::from(self.customer_satisfaction)
            + i64::from(self.growth_potential)
            + i64::from(self.risk_level)
    }
}

/// The cumulative business-health record mutated across a session.
///
/// `cash_flow` is unbounded (it can go negative); the three percentage fields
/// stay within [0, 100] after every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsState {
    pub cash_flow: i64,
    pub customer_satisfaction: i32,
    pub growth_potential: i32,
    pub risk_level: i32,
}

impl Default for MetricsState {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsState {
    /// Fixed initial values for a new simulation.
    pub fn new() -> Self {
        Self {
            cash_flow: 100_000,
            customer_satisfaction: 50,
            growth_potential: 50,
            risk_level: 30,
        }
    }

    /// Add a delta's fields, clamping the three percentage fields to [0, 100].
    /// Cash flow is never clamped.
    pub fn apply(&mut self, delta: &MetricsDelta) {
        self.cash_flow += delta.cash_flow;
        self.customer_satisfaction =
            (self.customer_satisfaction + delta.customer_satisfaction).clamp(0, 100);
        self.growth_potential = (self.growth_potential + delta.growth_potential).clamp(0, 100);
        self.risk_level = (self.risk_level + delta.risk_level).clamp(0, 100);
    }

    /// Derived overall health score in [0, 100]. Recomputed on demand, never
    /// stored.
    pub fn health_score(&self) -> u8 {
        let score = 0.4 * (self.cash_flow as f64 / 100_000.0).min(1.0)
            + 0.3 * (f64::from(self.customer_satisfaction) / 100.0)
            + 0.2 * (f64::from(self.growth_potential) / 100.0)
            - 0.1 * (f64::from(self.risk_level) / 100.0);
        (score * 100.0).round().clamp(0.0, 100.0) as u8
    }

    pub fn status(&self) -> BusinessStatus {
        BusinessStatus::from_score(self.health_score())
    }
}

/// Qualitative band for a health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessStatus {
    Thriving,
    Stable,
    Challenged,
    Struggling,
    Critical,
}

impl BusinessStatus {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => BusinessStatus::Thriving,
            60..=79 => BusinessStatus::Stable,
            40..=59 => BusinessStatus::Challenged,
            20..=39 => BusinessStatus::Struggling,
            _ => BusinessStatus::Critical,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BusinessStatus::Thriving => "Thriving",
            BusinessStatus::Stable => "Stable",
            BusinessStatus::Challenged => "Challenged",
            BusinessStatus::Struggling => "Struggling",
            BusinessStatus::Critical => "Critical",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BusinessStatus::Thriving => {
                "Your franchise is in excellent condition with strong financials and growth."
            }
            BusinessStatus::Stable => "Your franchise is performing well with good prospects.",
            BusinessStatus::Challenged => {
                "Your franchise faces some challenges but remains viable."
            }
            BusinessStatus::Struggling => {
                "Your franchise is experiencing significant difficulties and needs attention."
            }
            BusinessStatus::Critical => {
                "Your franchise is in critical condition and at risk of failure."
            }
        }
    }
}

/// One completed decision step, appended to the caller-owned history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub topic: String,
    pub choice_title: String,
    pub choice_description: String,
    pub heuristics: Vec<Heuristic>,
    pub impacts: MetricsDelta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_module_name: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl DecisionRecord {
    pub fn new(
        topic: impl Into<String>,
        choice_title: impl Into<String>,
        choice_description: impl Into<String>,
        heuristics: Vec<Heuristic>,
        impacts: MetricsDelta,
        sub_module_name: Option<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            choice_title: choice_title.into(),
            choice_description: choice_description.into(),
            heuristics,
            impacts,
            sub_module_name,
            recorded_at: Utc::now(),
        }
    }
}
