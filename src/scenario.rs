//! Topic and scenario generation with deterministic topic-aware fallbacks.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Heuristic;
use crate::completion::CompletionClient;
use crate::prompts;

/// Upper bound on a generated topic list.
pub const MAX_TOPICS: usize = 7;

/// Fixed fallback topics, used when topic generation fails.
const BASE_TOPICS: [&str; 5] = [
    "Staff Management",
    "Marketing Strategy",
    "Financial Planning",
    "Customer Service",
    "Technology Implementation",
];

/// One selectable decision option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOption {
    pub title: String,
    pub description: String,
}

/// A two-option decision scenario for one step. Immutable once presented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub description: String,
    pub option_a: ScenarioOption,
    pub option_b: ScenarioOption,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_module_name: Option<String>,
}

pub struct ScenarioGenerator {
    client: CompletionClient,
}

impl ScenarioGenerator {
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }

    /// Generate up to [`MAX_TOPICS`] decision topics for a business profile.
    ///
    /// `ranked` supplies framework context for the prompt and seeds the
    /// fallback list; it may be empty.
    pub async fn topics(&self, business_profile: &str, ranked: &[Heuristic]) -> Vec<String> {
        let prompt = prompts::topic_prompt(business_profile, ranked);
        if let Some(text) = self.client.complete(&prompt, prompts::TOPIC_SYSTEM).await {
            let topics = parse_topic_lines(&text);
            if !topics.is_empty() {
                return topics;
            }
            debug!("topic response contained no usable lines");
        }
        fallback_topics(ranked)
    }

    /// Generate a two-option scenario for `topic` at decision step `step`
    /// (1-based, capped at 5).
    ///
    /// The returned description must mention at least one word of the topic
    /// (a cheap relevance sanity check, deliberately weak); otherwise the
    /// whole response is rejected in favor of the deterministic fallback.
    pub async fn topic_scenario(&self, topic: &str, business_profile: &str, step: u32) -> Scenario {
        let prompt = prompts::scenario_prompt(topic, business_profile, step);
        let system = prompts::scenario_system(topic);
        if let Some(text) = self.client.complete(&prompt, &system).await {
            match serde_json::from_str::<Scenario>(&text) {
                Ok(scenario) if topic_matches_description(topic, &scenario.description) => {
                    return scenario;
                }
                Ok(_) => debug!(topic, "generated scenario failed the topic relevance guard"),
                Err(e) => debug!(topic, error = %e, "scenario response was not valid JSON"),
            }
        }
        fallback_scenario(topic, step)
    }
}

/// Split a topics response into clean labels: one per line, leading
/// enumeration characters stripped, blanks dropped, capped at 7.
pub fn parse_topic_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(|c: char| {
                    c.is_ascii_digit() || matches!(c, '.' | '-' | '•' | '*' | ' ')
                })
                .trim()
        })
        .filter(|line| !line.is_empty())
        .take(MAX_TOPICS)
        .map(str::to_string)
        .collect()
}

/// Weak relevance guard: any whitespace-separated word of the topic appears
/// case-insensitively in the description.
pub fn topic_matches_description(topic: &str, description: &str) -> bool {
    let description_lower = description.to_lowercase();
    topic
        .split_whitespace()
        .any(|word| description_lower.contains(&word.to_lowercase()))
}

/// Fixed topics, optionally preceded by up to 2 topics synthesized from the
/// top-ranked heuristics' names. Total capped at 5.
pub fn fallback_topics(ranked: &[Heuristic]) -> Vec<String> {
    let mut topics: Vec<String> = ranked
        .iter()
        .take(2)
        .map(|h| topic_from_heuristic_name(&h.name))
        .collect();
    for base in BASE_TOPICS.iter().take(5 - topics.len()) {
        topics.push((*base).to_string());
    }
    topics
}

/// Turn a heuristic name into a topic label: strip the Heuristic/Framework
/// suffix, rename Decision to Strategy, otherwise append Initiative.
fn topic_from_heuristic_name(name: &str) -> String {
    let stripped = name
        .replace("Heuristic", "")
        .replace("Framework", "")
        .trim()
        .to_string();
    if stripped.contains("Decision") {
        stripped.replace("Decision", "Strategy")
    } else {
        format!("{stripped} Initiative")
    }
}

/// One deterministic fallback entry: a situation facet of the topic plus a
/// bold-versus-measured option pair.
struct FallbackAspect {
    subtitle: &'static str,
    sub_module: &'static str,
    option_a: (&'static str, &'static str),
    option_b: (&'static str, &'static str),
}

/// Deterministic per-topic-family scenario. Entry `min(step, 5) - 1` of the
/// matched family's table is used.
pub fn fallback_scenario(topic: &str, step: u32) -> Scenario {
    let aspects = family_for_topic(topic);
    let index = (step.clamp(1, 5) - 1) as usize;
    let aspect = &aspects[index];

    Scenario {
        description: format!(
            "Your franchise faces {} in its {topic} operations and must choose a way forward.",
            aspect.subtitle
        ),
        option_a: ScenarioOption {
            title: aspect.option_a.0.to_string(),
            description: aspect.option_a.1.to_string(),
        },
        option_b: ScenarioOption {
            title: aspect.option_b.0.to_string(),
            description: aspect.option_b.1.to_string(),
        },
        sub_module_name: Some(aspect.sub_module.to_string()),
    }
}

fn family_for_topic(topic: &str) -> &'static [FallbackAspect; 5] {
    let topic_lower = topic.to_lowercase();
    if topic_lower.contains("fleet") || topic_lower.contains("vehicle") {
        &FLEET_ASPECTS
    } else if topic_lower.contains("staff") || topic_lower.contains("employee") {
        &STAFFING_ASPECTS
    } else if topic_lower.contains("market") {
        &MARKET_ASPECTS
    } else {
        &GENERIC_ASPECTS
    }
}

static FLEET_ASPECTS: [FallbackAspect; 5] = [
    FallbackAspect {
        subtitle: "mounting delivery delays on overlapping routes",
        sub_module: "Route Optimization",
        option_a: (
            "Deploy Routing Software",
            "Invest in a dynamic routing platform that replans every run from live traffic data.",
        ),
        option_b: (
            "Consolidate Delivery Zones",
            "Redraw delivery zones by hand and minimize overlap without new tooling spend.",
        ),
    },
    FallbackAspect {
        subtitle: "repair bills climbing faster than revenue",
        sub_module: "Maintenance Scheduling",
        option_a: (
            "Preventive Maintenance Contract",
            "Purchase a full preventive maintenance program with a dedicated service partner.",
        ),
        option_b: (
            "In-House Inspection Routine",
            "Train drivers to run daily inspections and save repairs for verified faults only.",
        ),
    },
    FallbackAspect {
        subtitle: "an aging vehicle pool nearing end of life",
        sub_module: "Vehicle Acquisition",
        option_a: (
            "Replace The Fleet Now",
            "Buy new vehicles outright to cut breakdown risk and improve the customer experience.",
        ),
        option_b: (
            "Staggered Lease Program",
            "Lease replacements gradually to minimize upfront spend while the old units wind down.",
        ),
    },
    FallbackAspect {
        subtitle: "avoidable incidents traced to driver habits",
        sub_module: "Driver Training",
        option_a: (
            "Comprehensive Driver Academy",
            "Invest in an accredited safety and service training program for every driver.",
        ),
        option_b: (
            "Targeted Coaching Sessions",
            "Coach only the drivers with incident history and protect the training budget.",
        ),
    },
    FallbackAspect {
        subtitle: "volatile fuel spend squeezing route margins",
        sub_module: "Fuel Efficiency",
        option_a: (
            "Transition To Hybrid Units",
            "Purchase hybrid vehicles for the highest-mileage routes to grow long-term savings.",
        ),
        option_b: (
            "Fuel Discipline Program",
            "Reduce cost through idle limits, fuel cards, and weekly consumption reviews.",
        ),
    },
];

static STAFFING_ASPECTS: [FallbackAspect; 5] = [
    FallbackAspect {
        subtitle: "open roles staying vacant for months",
        sub_module: "Recruitment Pipeline",
        option_a: (
            "Professional Recruiting Partner",
            "Spend on a specialist recruiter to fill the pipeline with vetted candidates quickly.",
        ),
        option_b: (
            "Employee Referral Scheme",
            "Grow a referral program that rewards staff for bringing in qualified peers.",
        ),
    },
    FallbackAspect {
        subtitle: "new hires ramping slowly and unevenly",
        sub_module: "Onboarding Program",
        option_a: (
            "Structured Onboarding Overhaul",
            "Invest in a full onboarding curriculum with mentors and written playbooks.",
        ),
        option_b: (
            "Shadowing-Based Onboarding",
            "Pair each new hire with a veteran and keep the program lightweight and cheap.",
        ),
    },
    FallbackAspect {
        subtitle: "front-line turnover well above the industry norm",
        sub_module: "Retention Incentives",
        option_a: (
            "Comprehensive Benefits Package",
            "Invest in wages, schedules, and benefits to protect the experienced core team.",
        ),
        option_b: (
            "Milestone Bonus Plan",
            "Offer targeted tenure bonuses while keeping base labor costs controlled.",
        ),
    },
    FallbackAspect {
        subtitle: "skill gaps showing up at peak hours",
        sub_module: "Training Curriculum",
        option_a: (
            "Cross-Training Initiative",
            "Upgrade the whole team's skills so every station has redundant coverage.",
        ),
        option_b: (
            "Specialist Role Definition",
            "Define narrow specialist roles and minimize time spent training outside them.",
        ),
    },
    FallbackAspect {
        subtitle: "chronic gaps in the weekly shift plan",
        sub_module: "Scheduling Policy",
        option_a: (
            "Flexible Scheduling Platform",
            "Purchase scheduling software that lets staff trade shifts under clear rules.",
        ),
        option_b: (
            "Fixed Rota Discipline",
            "Adopt a fixed rota with an on-call list, avoiding new tooling and complexity.",
        ),
    },
];

static MARKET_ASPECTS: [FallbackAspect; 5] = [
    FallbackAspect {
        subtitle: "weak local awareness despite steady foot traffic nearby",
        sub_module: "Brand Awareness",
        option_a: (
            "Aggressive Multi-Channel Campaign",
            "Invest in a broad campaign across local media, sponsorships, and social channels.",
        ),
        option_b: (
            "Neighborhood Presence Push",
            "Focus on low-cost community events and signage to grow recognition street by street.",
        ),
    },
    FallbackAspect {
        subtitle: "competitors matching the offer point for point",
        sub_module: "Competitive Positioning",
        option_a: (
            "Premium Experience Repositioning",
            "Upgrade the offer and price for quality, betting on a distinctive customer experience.",
        ),
        option_b: (
            "Value Leadership Stance",
            "Reduce cost aggressively and defend the value end of the local market.",
        ),
    },
    FallbackAspect {
        subtitle: "promotions landing on the wrong audiences",
        sub_module: "Customer Segmentation",
        option_a: (
            "Data-Driven Segmentation Study",
            "Purchase a proper segmentation study and rebuild offers around the findings.",
        ),
        option_b: (
            "Front-Line Insight Loop",
            "Use staff observations and simple surveys to sharpen targeting without new spend.",
        ),
    },
    FallbackAspect {
        subtitle: "acquisition costs rising across paid channels",
        sub_module: "Channel Mix",
        option_a: (
            "Expand Into New Channels",
            "Spend on partnerships and delivery platforms to grow reach beyond saturated channels.",
        ),
        option_b: (
            "Double Down On Owned Media",
            "Minimize paid spend and grow the email list, reviews, and repeat-visit hooks.",
        ),
    },
    FallbackAspect {
        subtitle: "first-time customers rarely returning",
        sub_module: "Loyalty Campaigns",
        option_a: (
            "Full Loyalty Program Launch",
            "Invest in a points-based loyalty program with app support and launch promotions.",
        ),
        option_b: (
            "Simple Punch-Card Pilot",
            "Pilot a low-tech punch card to improve repeat visits before committing budget.",
        ),
    },
];

static GENERIC_ASPECTS: [FallbackAspect; 5] = [
    FallbackAspect {
        subtitle: "too many near-term priorities competing for attention",
        sub_module: "Priority Setting",
        option_a: (
            "Commit To One Big Bet",
            "Concentrate budget and attention on the single highest-impact initiative this quarter.",
        ),
        option_b: (
            "Balanced Portfolio Approach",
            "Spread effort across several smaller improvements to protect against a bad bet.",
        ),
    },
    FallbackAspect {
        subtitle: "a budget that cannot fund every request",
        sub_module: "Resource Allocation",
        option_a: (
            "Invest Where Growth Is",
            "Invest the available budget in the fastest-growing part of the business.",
        ),
        option_b: (
            "Protect Core Operations",
            "Keep spending safe and steady, reinforcing what already reliably earns.",
        ),
    },
    FallbackAspect {
        subtitle: "day-to-day execution varying shift by shift",
        sub_module: "Process Standards",
        option_a: (
            "Comprehensive Playbook Rollout",
            "Invest in documented standards, audits, and service quality checks across the board.",
        ),
        option_b: (
            "Manager-Led Improvements",
            "Let each shift manager fix their own gaps with a light monthly review.",
        ),
    },
    FallbackAspect {
        subtitle: "supplier terms drifting against the business",
        sub_module: "Vendor Relationships",
        option_a: (
            "Renegotiate Under One Partner",
            "Consolidate purchasing with one partner for leverage and service guarantees.",
        ),
        option_b: (
            "Diversify The Supplier Base",
            "Split orders across suppliers to protect against outages and price moves.",
        ),
    },
    FallbackAspect {
        subtitle: "an unclear picture of where the business goes next",
        sub_module: "Long-Term Planning",
        option_a: (
            "Ambitious Expansion Roadmap",
            "Draft an aggressive three-year plan to grow locations and the service range.",
        ),
        option_b: (
            "Strengthen Before Scaling",
            "Improve the existing unit's economics first and revisit expansion in a year.",
        ),
    },
];
