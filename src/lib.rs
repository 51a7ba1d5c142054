//! franchise-lab: the decision-engine core of an interactive business
//! simulation.
//!
//! A caller supplies a business profile; the engine proposes decision topics
//! and two-option scenarios, selects relevant heuristics from a fixed catalog,
//! derives bounded metric deltas through an external text-completion endpoint,
//! and narrates the outcome. Every generative path degrades to a deterministic
//! fallback, so endpoint failure costs content quality, never progression.
//!
//! The crate owns no UI, navigation, or session state: metrics and decision
//! history live with the caller and are passed in per call.

pub mod analysis;
pub mod catalog;
pub mod completion;
pub mod config;
pub mod engine;
pub mod error;
pub mod impact;
pub mod metrics;
pub mod parse;
pub mod prompts;
pub mod scenario;
pub mod selector;

pub use catalog::{Heuristic, HeuristicCatalog, HeuristicCategory};
pub use engine::{DecisionOutcome, Engine};
pub use metrics::{BusinessStatus, DecisionRecord, MetricsDelta, MetricsState};
pub use scenario::{Scenario, ScenarioOption};

// Load env from .env if present; silently ignore if missing.
pub fn load_env() {
    let _ = dotenvy::dotenv();
}

/// Install a tracing subscriber driven by `RUST_LOG`. Intended for consuming
/// binaries; the library itself never initializes logging.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
