//! Facade wiring the generation components around one shared completion
//! client and catalog.
//!
//! The engine is stateless between calls: metrics and decision history stay
//! with the caller, which passes them in per operation and applies returned
//! deltas itself.

use std::sync::Arc;

use crate::analysis::AnalysisGenerator;
use crate::catalog::{Heuristic, HeuristicCatalog};
use crate::completion::{CompletionBackend, CompletionClient};
use crate::config::Config;
use crate::error::Result;
use crate::impact::ImpactCalculator;
use crate::metrics::{DecisionRecord, MetricsDelta, MetricsState};
use crate::scenario::{Scenario, ScenarioGenerator};
use crate::selector::HeuristicSelector;

/// Everything the caller needs to present one completed decision: the
/// heuristics applied, the validated delta, and the explanatory text.
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    pub heuristics: Vec<Heuristic>,
    pub impacts: MetricsDelta,
    pub analysis: String,
}

pub struct Engine {
    catalog: Arc<HeuristicCatalog>,
    selector: HeuristicSelector,
    impact: ImpactCalculator,
    scenarios: ScenarioGenerator,
    analysis: AnalysisGenerator,
}

impl Engine {
    /// Build an engine from configuration: HTTP backend, shared client, and
    /// the catalog loaded from disk.
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = Arc::new(HeuristicCatalog::load(&config.simulation.catalog_path)?);
        let client = CompletionClient::from_config(&config.endpoint)?;
        Ok(Self::new(catalog, client))
    }

    /// Build an engine around an explicit backend (tests substitute a scripted
    /// one here).
    pub fn with_backend(
        catalog: Arc<HeuristicCatalog>,
        backend: Arc<dyn CompletionBackend>,
        max_retries: u32,
    ) -> Self {
        Self::new(catalog, CompletionClient::new(backend, max_retries))
    }

    fn new(catalog: Arc<HeuristicCatalog>, client: CompletionClient) -> Self {
        Self {
            selector: HeuristicSelector::new(catalog.clone(), client.clone()),
            impact: ImpactCalculator::new(client.clone()),
            scenarios: ScenarioGenerator::new(client.clone()),
            analysis: AnalysisGenerator::new(client),
            catalog,
        }
    }

    pub fn catalog(&self) -> &HeuristicCatalog {
        &self.catalog
    }

    /// Topic list for a profile (≤7 entries, never empty).
    pub async fn topics(&self, business_profile: &str, ranked: &[Heuristic]) -> Vec<String> {
        self.scenarios.topics(business_profile, ranked).await
    }

    /// Two-option scenario for one decision step.
    pub async fn scenario(&self, topic: &str, business_profile: &str, step: u32) -> Scenario {
        self.scenarios.topic_scenario(topic, business_profile, step).await
    }

    /// Resolve a chosen option into heuristics, a validated delta, and
    /// explanatory analysis. The caller applies the delta to its own
    /// [`MetricsState`] and appends its own [`DecisionRecord`].
    pub async fn decide(
        &self,
        scenario_description: &str,
        choice_title: &str,
        choice_description: &str,
    ) -> DecisionOutcome {
        let heuristics = self
            .selector
            .select(scenario_description, choice_description)
            .await;
        let impacts = self
            .impact
            .calculate(scenario_description, choice_description, &heuristics)
            .await;
        let analysis = self
            .analysis
            .decision_analysis(scenario_description, choice_title, &impacts, &heuristics)
            .await;

        DecisionOutcome {
            heuristics,
            impacts,
            analysis,
        }
    }

    /// Aggregate commentary over the full journey.
    pub async fn final_analysis(
        &self,
        history: &[DecisionRecord],
        final_metrics: &MetricsState,
    ) -> String {
        self.analysis.final_analysis(history, final_metrics).await
    }
}
