//! Decision and journey analysis text, with a templated per-decision fallback.
//!
//! The final aggregate analysis has no rule-based fallback, only a fixed
//! unavailable-text string; no template can stand in for commentary over a
//! whole journey.

use crate::catalog::{Heuristic, HeuristicCategory};
use crate::completion::CompletionClient;
use crate::metrics::{DecisionRecord, MetricsDelta, MetricsState};
use crate::prompts;

/// Returned by `final_analysis` when every generation attempt failed.
pub const FINAL_ANALYSIS_UNAVAILABLE: &str =
    "Unable to generate comprehensive analysis. Please review the decision history \
     and metrics to assess the overall journey.";

pub struct AnalysisGenerator {
    client: CompletionClient,
}

impl AnalysisGenerator {
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }

    /// Explain a single decision's impacts through its heuristics
    /// (~250 words target, not enforced). Falls back to template assembly.
    pub async fn decision_analysis(
        &self,
        scenario_description: &str,
        choice_title: &str,
        impacts: &MetricsDelta,
        heuristics: &[Heuristic],
    ) -> String {
        let prompt =
            prompts::decision_analysis_prompt(scenario_description, choice_title, impacts, heuristics);
        if let Some(text) = self.client.complete(&prompt, prompts::ANALYSIS_SYSTEM).await {
            return text;
        }
        fallback_analysis(choice_title, impacts, heuristics)
    }

    /// Thematic commentary over the whole decision journey. On failure,
    /// returns [`FINAL_ANALYSIS_UNAVAILABLE`] verbatim.
    pub async fn final_analysis(
        &self,
        history: &[DecisionRecord],
        final_metrics: &MetricsState,
    ) -> String {
        let prompt = prompts::final_analysis_prompt(history, final_metrics);
        self.client
            .complete(&prompt, prompts::FINAL_SYSTEM)
            .await
            .unwrap_or_else(|| FINAL_ANALYSIS_UNAVAILABLE.to_string())
    }
}

/// Template-assembled analysis: one paragraph per heuristic, branching on its
/// load-time category and the sign of the matching metric's delta, closed by
/// an overall-outlook sentence keyed on the summed delta.
pub fn fallback_analysis(
    choice_title: &str,
    impacts: &MetricsDelta,
    heuristics: &[Heuristic],
) -> String {
    let mut parts = vec![format!(
        "Analysis of the decision to {}:",
        choice_title.to_lowercase()
    )];

    for heuristic in heuristics {
        let mut paragraph = format!("\n\nApplying the {}: ", heuristic.name);
        paragraph.push_str(&category_sentence(heuristic, impacts));
        parts.push(paragraph);
    }

    if impacts.total() > 0 {
        parts.push(
            "\n\nBased on these frameworks, this decision appears well-aligned with \
             established business principles and should contribute positively to \
             long-term success."
                .to_string(),
        );
    } else {
        parts.push(
            "\n\nWhile the immediate impacts may be challenging, these frameworks \
             suggest the decision could provide valuable learning opportunities and \
             potential for future adaptation."
                .to_string(),
        );
    }

    parts.concat()
}

fn category_sentence(heuristic: &Heuristic, impacts: &MetricsDelta) -> String {
    match heuristic.category {
        HeuristicCategory::Risk => {
            if impacts.risk_level > 0 {
                format!(
                    "According to this framework, the increased risk level ({:+}%) suggests {}. ",
                    impacts.risk_level, heuristic.applicability
                )
            } else {
                format!(
                    "This framework supports the reduced risk level ({:+}%) through {}. ",
                    impacts.risk_level, heuristic.applicability
                )
            }
        }
        HeuristicCategory::Growth => {
            if impacts.growth_potential > 0 {
                format!(
                    "This decision aligns with the framework's emphasis on {}, leading to \
                     increased growth potential ({:+}%). ",
                    heuristic.applicability, impacts.growth_potential
                )
            } else {
                format!(
                    "The framework suggests that the reduced growth potential ({:+}%) may \
                     be due to deviation from {}. ",
                    impacts.growth_potential, heuristic.applicability
                )
            }
        }
        HeuristicCategory::Customer => {
            if impacts.customer_satisfaction > 0 {
                format!(
                    "Following this framework's principles about {} has positively impacted \
                     customer satisfaction ({:+}%). ",
                    heuristic.applicability, impacts.customer_satisfaction
                )
            } else {
                format!(
                    "The decrease in customer satisfaction ({:+}%) indicates a potential \
                     misalignment with the framework's guidance on {}. ",
                    impacts.customer_satisfaction, heuristic.applicability
                )
            }
        }
        HeuristicCategory::Financial => {
            if impacts.cash_flow > 0 {
                format!(
                    "The positive cash flow impact (${:+}) aligns with the framework's \
                     principles regarding {}. ",
                    impacts.cash_flow, heuristic.applicability
                )
            } else {
                format!(
                    "The framework suggests that the cash flow reduction (${:+}) may be \
                     justified if {}. ",
                    impacts.cash_flow, heuristic.applicability
                )
            }
        }
        HeuristicCategory::General => format!(
            "This framework suggests that {} will influence the observed impacts on \
             business metrics. ",
            heuristic.applicability
        ),
    }
}
