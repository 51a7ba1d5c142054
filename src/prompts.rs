//! Prompt construction for every generation call, plus the fixed variation
//! pools used to perturb retries.
//!
//! Retry perturbation is a diversity mechanism, not error correction: a retry
//! attempt carries a freshly-drawn persona prefix so a repeated failure mode is
//! less likely to reproduce verbatim.

use rand::seq::SliceRandom;

use crate::catalog::{Heuristic, HeuristicCatalog};
use crate::metrics::{DecisionRecord, MetricsDelta, MetricsState};

/// Perspective personas prefixed onto retried prompts.
pub const PERSPECTIVES: [&str; 5] = [
    "As an experienced franchise consultant,",
    "Taking the role of a business strategist,",
    "From the perspective of a seasoned entrepreneur,",
    "As a franchise industry expert,",
    "With years of business advisory experience,",
];

const CONTEXTS: [&str; 5] = [
    "considering the current market dynamics,",
    "taking into account industry trends,",
    "analyzing the business landscape,",
    "evaluating the competitive environment,",
    "examining the operational context,",
];

const STYLES: [&str; 5] = [
    "provide insights on",
    "analyze and suggest",
    "evaluate and recommend",
    "assess and determine",
    "review and propose",
];

/// One independently-drawn phrase from each variation pool.
#[derive(Debug, Clone, Copy)]
pub struct PromptVariation {
    pub perspective: &'static str,
    pub context: &'static str,
    pub style: &'static str,
}

pub fn random_variation() -> PromptVariation {
    let mut rng = rand::thread_rng();
    PromptVariation {
        perspective: PERSPECTIVES.choose(&mut rng).copied().unwrap_or(PERSPECTIVES[0]),
        context: CONTEXTS.choose(&mut rng).copied().unwrap_or(CONTEXTS[0]),
        style: STYLES.choose(&mut rng).copied().unwrap_or(STYLES[0]),
    }
}

pub fn random_perspective() -> &'static str {
    let mut rng = rand::thread_rng();
    PERSPECTIVES.choose(&mut rng).copied().unwrap_or(PERSPECTIVES[0])
}

pub const TOPIC_SYSTEM: &str = "I am a business scenario generator. I will create \
relevant scenario topics based on the business profile and frameworks.";

pub const SELECTION_SYSTEM: &str =
    "I will analyze which heuristics are most relevant for this business decision.";

pub const IMPACT_SYSTEM: &str =
    "I will analyze the business decision and calculate metric impacts.";

pub const ANALYSIS_SYSTEM: &str =
    "I will analyze this business decision using the provided heuristic frameworks.";

pub const FINAL_SYSTEM: &str =
    "I will provide a comprehensive analysis of the franchise's decision journey.";

pub fn scenario_system(topic: &str) -> String {
    format!("I will create a specific scenario and options for the topic: {topic}")
}

/// Topic-list prompt. When ranked heuristics are supplied, the top 3 are
/// appended as framework context.
pub fn topic_prompt(business_profile: &str, ranked: &[Heuristic]) -> String {
    let variation = random_variation();

    let mut frameworks = String::new();
    if !ranked.is_empty() {
        frameworks.push_str("\n\nRelevant Business Frameworks:\n");
        for heuristic in ranked.iter().take(3) {
            frameworks.push_str(&format!(
                "- {}: {}\n",
                heuristic.name, heuristic.description
            ));
        }
    }

    format!(
        "{} {} {} relevant scenario topics for this business:\n\n\
         Business Profile:\n{business_profile}{frameworks}\n\n\
         Generate a list of scenario topics that:\n\
         1. Are specific to the business's industry and situation\n\
         2. Cover different aspects of business management (operations, finance, marketing, etc.)\n\
         3. Include both immediate challenges and long-term opportunities\n\
         4. Are realistic and actionable\n\
         5. Would have significant impact on business metrics (cash flow, customer satisfaction, growth potential, and risk level)\n\
         6. Align with the provided business frameworks and their principles\n\
         7. Create opportunities to apply these decision-making frameworks\n\n\
         Format your response as a simple list of topics, one per line, with no numbers \
         or bullet points. Keep each topic concise (2-4 words).",
        variation.perspective, variation.context, variation.style
    )
}

/// Per-step scenario prompt requesting a JSON object with a sub-module name
/// and two options.
pub fn scenario_prompt(topic: &str, business_profile: &str, step: u32) -> String {
    format!(
        "create a specific scenario and decision options for this business situation:\n\n\
         Topic: {topic}\n\
         Decision Step: {step} of 5\n\
         Business Profile: {business_profile}\n\n\
         Create a scenario that specifically addresses {topic} for this step of the \
         decision journey and provides two distinct approaches to handling it. Name the \
         sub-module of {topic} this step focuses on.\n\n\
         The response must follow this exact JSON structure:\n\
         {{\n\
         \x20   \"description\": \"A brief description of the situation that specifically relates to {topic} (1-2 sentences)\",\n\
         \x20   \"sub_module_name\": \"The aspect of {topic} this step focuses on (2-4 words)\",\n\
         \x20   \"option_a\": {{\n\
         \x20       \"title\": \"A short title for the first {topic} option (3-5 words)\",\n\
         \x20       \"description\": \"Brief description of how this approach addresses {topic} (1-2 sentences)\"\n\
         \x20   }},\n\
         \x20   \"option_b\": {{\n\
         \x20       \"title\": \"A short title for the second {topic} option (3-5 words)\",\n\
         \x20       \"description\": \"Brief description of how this approach addresses {topic} (1-2 sentences)\"\n\
         \x20   }}\n\
         }}\n\n\
         Guidelines:\n\
         1. The scenario description must directly address {topic}\n\
         2. Both options should be specific ways to handle the {topic} situation\n\
         3. Options should be distinct but both potentially viable\n\
         4. Make options realistic for the business profile\n\
         5. Consider how each option might affect cash flow, customer satisfaction, growth potential, and risk level\n\
         6. Avoid generic solutions - make them specific to {topic}"
    )
}

/// Relevance-ranking prompt enumerating the full catalog.
pub fn selection_prompt(
    scenario_description: &str,
    choice_description: &str,
    catalog: &HeuristicCatalog,
) -> String {
    let mut listing = String::new();
    for heuristic in catalog.iter() {
        listing.push_str(&format!(
            "ID: {}\nName: {}\nDescription: {}\nApplicability: {}\n\n",
            heuristic.id, heuristic.name, heuristic.description, heuristic.applicability
        ));
    }

    format!(
        "Given this business scenario and decision:\n\n\
         Scenario: {scenario_description}\n\
         Decision: {choice_description}\n\n\
         Evaluate which of these heuristics are most relevant and would provide valuable insights:\n\n\
         {listing}\
         Return only the IDs of the 2-3 most relevant heuristics that would best help \
         analyze this decision's impact.\n\
         Format: comma-separated list of heuristic IDs (e.g., \
         \"workhard_testing_heuristic,capital_follows_opportunity_principle\")"
    )
}

/// Structured metrics-delta prompt with the exact keys and ranges.
pub fn impact_prompt(
    scenario_description: &str,
    choice_description: &str,
    heuristics: &[Heuristic],
) -> String {
    format!(
        "Analyze this business decision using relevant entrepreneurial heuristics:\n\n\
         Scenario: {scenario_description}\n\
         Decision: {choice_description}\n\n\
         Relevant Heuristics:\n{}\n\n\
         Based on these heuristics and the decision made, determine the impact on key \
         business metrics. Consider how the decision aligns with or contradicts each \
         heuristic's principles.\n\n\
         Return ONLY a JSON object with these exact keys and value ranges:\n\
         {{\n\
         \x20   \"cash_flow\": <integer between -50000 and 25000>,\n\
         \x20   \"customer_satisfaction\": <integer between -25 and 25>,\n\
         \x20   \"growth_potential\": <integer between -25 and 25>,\n\
         \x20   \"risk_level\": <integer between -25 and 25>\n\
         }}\n\n\
         Ensure the response is valid JSON and includes all four metrics. For cash flow, \
         consider typical franchise operations where most investments and impacts are \
         moderate in scale.",
        format_heuristics_brief(heuristics)
    )
}

/// Per-decision analysis prompt tying heuristics to the observed deltas.
pub fn decision_analysis_prompt(
    scenario_description: &str,
    choice_title: &str,
    impacts: &MetricsDelta,
    heuristics: &[Heuristic],
) -> String {
    format!(
        "analyze this business decision using the provided heuristics as frameworks:\n\n\
         Scenario: {scenario_description}\n\
         Choice Made: {choice_title}\n\n\
         Relevant Business Heuristics:\n{}\n\n\
         Observed Impacts:\n{}\n\n\
         Please provide an analysis that:\n\
         1. Explains how each relevant heuristic framework applies to this decision\n\
         2. Uses the heuristics to justify why specific impacts occurred\n\
         3. Connects the principles from the heuristics to the observed outcomes\n\
         4. Provides insights about the long-term implications based on these frameworks\n\n\
         Format the analysis to explicitly reference the heuristics and explain how their \
         principles support the observed impacts. Keep the total analysis under 250 words.",
        format_heuristics_full(heuristics),
        format_impacts(impacts)
    )
}

/// Aggregate journey prompt over the full decision history and final metrics.
pub fn final_analysis_prompt(history: &[DecisionRecord], final_metrics: &MetricsState) -> String {
    let mut decisions = String::new();
    for (i, decision) in history.iter().enumerate() {
        decisions.push_str(&format!(
            "Decision {}: {}\nChoice: {}\nImpact: Cash Flow (${:+}), Customer Satisfaction ({:+}%), Growth ({:+}%), Risk ({:+}%)\n\n",
            i + 1,
            decision.topic,
            decision.choice_title,
            decision.impacts.cash_flow,
            decision.impacts.customer_satisfaction,
            decision.impacts.growth_potential,
            decision.impacts.risk_level,
        ));
    }

    format!(
        "Analyze this franchise's decision journey and provide a comprehensive strategic assessment:\n\n\
         Decision History:\n{decisions}\
         Final Business State:\n\
         - Cash Flow: ${}\n\
         - Customer Satisfaction: {}%\n\
         - Growth Potential: {}%\n\
         - Risk Level: {}%\n\n\
         Provide a comprehensive analysis that:\n\
         1. Identifies key patterns and strategic themes across the decisions\n\
         2. Evaluates the overall effectiveness of the decision-making approach\n\
         3. Assesses how well the decisions balanced different business priorities\n\
         4. Suggests strategic recommendations for future decision-making\n\
         5. Highlights potential opportunities and challenges based on the current business state\n\n\
         Format the response with clear sections and bullet points where appropriate.",
        final_metrics.cash_flow,
        final_metrics.customer_satisfaction,
        final_metrics.growth_potential,
        final_metrics.risk_level,
    )
}

fn format_heuristics_brief(heuristics: &[Heuristic]) -> String {
    heuristics
        .iter()
        .map(|h| {
            format!(
                "Heuristic: {}\nDescription: {}\nApplicability: {}",
                h.name, h.description, h.applicability
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_heuristics_full(heuristics: &[Heuristic]) -> String {
    heuristics
        .iter()
        .map(|h| {
            format!(
                "Heuristic: {}\nPrinciple: {}\nApplication: {}\nLimitations: {}",
                h.name, h.description, h.applicability, h.limitations
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_impacts(impacts: &MetricsDelta) -> String {
    format!(
        "Cash Flow: {:+}\nCustomer Satisfaction: {:+}\nGrowth Potential: {:+}\nRisk Level: {:+}",
        impacts.cash_flow,
        impacts.customer_satisfaction,
        impacts.growth_potential,
        impacts.risk_level
    )
}
