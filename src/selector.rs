//! Heuristic selection: model-ranked subset of the catalog with a random
//! sampling fallback.

use std::sync::Arc;

use tracing::debug;

use crate::catalog::{Heuristic, HeuristicCatalog};
use crate::completion::CompletionClient;
use crate::prompts;

/// Fallback sample size (bounded by catalog size).
const FALLBACK_SAMPLE: usize = 3;

pub struct HeuristicSelector {
    catalog: Arc<HeuristicCatalog>,
    client: CompletionClient,
}

impl HeuristicSelector {
    pub fn new(catalog: Arc<HeuristicCatalog>, client: CompletionClient) -> Self {
        Self { catalog, client }
    }

    /// Select the 2-3 heuristics most relevant to a scenario and chosen
    /// action.
    ///
    /// The model is asked for a comma-separated id list; ids not present in
    /// the catalog are silently dropped. Any failure (client, empty response,
    /// or zero surviving ids) falls back to a uniform random sample of
    /// `min(3, catalog size)` distinct heuristics, trading relevance for
    /// availability.
    pub async fn select(
        &self,
        scenario_description: &str,
        choice_description: &str,
    ) -> Vec<Heuristic> {
        if self.catalog.is_empty() {
            return Vec::new();
        }

        let prompt = prompts::selection_prompt(scenario_description, choice_description, &self.catalog);
        if let Some(text) = self.client.complete(&prompt, prompts::SELECTION_SYSTEM).await {
            let picked: Vec<Heuristic> = text
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .filter_map(|id| self.catalog.get(id).cloned())
                .collect();
            if !picked.is_empty() {
                return picked;
            }
            debug!("no selected heuristic id survived catalog filtering");
        }

        debug!("falling back to random heuristic sample");
        self.catalog.sample(FALLBACK_SAMPLE)
    }
}
