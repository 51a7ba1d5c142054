//! Heuristic catalog: named decision-making principles loaded once at startup.
//!
//! The catalog source is a JSON document with a top-level `heuristics` key
//! mapping id -> {name, description, applicability, limitations}. Entries are
//! immutable after load and keep their document order.

use std::collections::HashMap;
use std::path::Path;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{LabError, Result};

/// Coarse classification of a heuristic, computed once at load time from name
/// keywords. Downstream narration switches on this tag instead of re-matching
/// substrings per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicCategory {
    Risk,
    Growth,
    Customer,
    Financial,
    General,
}

impl HeuristicCategory {
    /// Classify by name keywords. First match wins, in the order the fallback
    /// narration branches: risk, growth, customer, financial/cash.
    pub fn classify(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("risk") {
            HeuristicCategory::Risk
        } else if lower.contains("growth") {
            HeuristicCategory::Growth
        } else if lower.contains("customer") {
            HeuristicCategory::Customer
        } else if lower.contains("financial") || lower.contains("cash") {
            HeuristicCategory::Financial
        } else {
            HeuristicCategory::General
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HeuristicCategory::Risk => "risk",
            HeuristicCategory::Growth => "growth",
            HeuristicCategory::Customer => "customer",
            HeuristicCategory::Financial => "financial",
            HeuristicCategory::General => "general",
        }
    }
}

/// A named decision-making principle with applicability/limitations text.
/// Identity is `id`; entries never change after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heuristic {
    pub id: String,
    pub name: String,
    pub description: String,
    pub applicability: String,
    pub limitations: String,
    pub category: HeuristicCategory,
}

/// Raw per-entry shape in the catalog document (no category; that is derived).
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    name: String,
    description: String,
    applicability: String,
    limitations: String,
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    heuristics: serde_json::Map<String, serde_json::Value>,
}

/// Immutable, order-preserving collection of heuristics.
#[derive(Debug, Clone, Default)]
pub struct HeuristicCatalog {
    entries: Vec<Heuristic>,
    by_id: HashMap<String, usize>,
}

impl HeuristicCatalog {
    /// Parse a catalog from its JSON document text.
    pub fn from_json(raw: &str) -> Result<Self> {
        let document: CatalogDocument =
            serde_json::from_str(raw).map_err(|e| LabError::Catalog {
                message: format!("invalid catalog document: {e}"),
            })?;

        let mut entries = Vec::with_capacity(document.heuristics.len());
        let mut by_id = HashMap::with_capacity(document.heuristics.len());
        for (id, value) in document.heuristics {
            let entry: CatalogEntry =
                serde_json::from_value(value).map_err(|e| LabError::Catalog {
                    message: format!("invalid catalog entry '{id}': {e}"),
                })?;
            let category = HeuristicCategory::classify(&entry.name);
            by_id.insert(id.clone(), entries.len());
            entries.push(Heuristic {
                id,
                name: entry.name,
                description: entry.description,
                applicability: entry.applicability,
                limitations: entry.limitations,
                category,
            });
        }

        tracing::debug!(count = entries.len(), "loaded heuristic catalog");
        Ok(Self { entries, by_id })
    }

    /// Load a catalog from a JSON file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| LabError::Catalog {
            message: format!("cannot read catalog {}: {e}", path.as_ref().display()),
        })?;
        Self::from_json(&raw)
    }

    pub fn get(&self, id: &str) -> Option<&Heuristic> {
        self.by_id.get(id).map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Heuristic> {
        self.entries.iter()
    }

    /// Uniform random sample of `min(k, len)` distinct heuristics.
    pub fn sample(&self, k: usize) -> Vec<Heuristic> {
        let mut rng = rand::thread_rng();
        self.entries
            .choose_multiple(&mut rng, k.min(self.entries.len()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "heuristics": {
            "cash_flow_discipline_heuristic": {
                "name": "Cash Flow Discipline Heuristic",
                "description": "Protect operating cash before chasing upside.",
                "applicability": "capital allocation under uncertainty",
                "limitations": "can starve growth investments"
            },
            "franchise_risk_balance_heuristic": {
                "name": "Franchise Risk Balance Heuristic",
                "description": "Match risk taken to the downside you can absorb.",
                "applicability": "expansion and financing decisions",
                "limitations": "conservative bias in stable markets"
            },
            "customer_first_service_heuristic": {
                "name": "Customer First Service Heuristic",
                "description": "Service quality compounds into retention.",
                "applicability": "operational trade-offs touching the customer",
                "limitations": "costly when margins are thin"
            }
        }
    }"#;

    #[test]
    fn test_classify_categories() {
        assert_eq!(
            HeuristicCategory::classify("Franchise Risk Balance Heuristic"),
            HeuristicCategory::Risk
        );
        assert_eq!(
            HeuristicCategory::classify("Growth Readiness Framework"),
            HeuristicCategory::Growth
        );
        assert_eq!(
            HeuristicCategory::classify("Customer First Service Heuristic"),
            HeuristicCategory::Customer
        );
        assert_eq!(
            HeuristicCategory::classify("Cash Flow Discipline Heuristic"),
            HeuristicCategory::Financial
        );
        assert_eq!(
            HeuristicCategory::classify("Financial Prudence Principle"),
            HeuristicCategory::Financial
        );
        assert_eq!(
            HeuristicCategory::classify("Replicate What Works"),
            HeuristicCategory::General
        );
    }

    #[test]
    fn test_classify_precedence() {
        // Risk branch wins over growth when both keywords appear
        assert_eq!(
            HeuristicCategory::classify("Risk Adjusted Growth Heuristic"),
            HeuristicCategory::Risk
        );
    }

    #[test]
    fn test_from_json_preserves_order_and_ids() {
        let catalog = HeuristicCatalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 3);

        let ids: Vec<&str> = catalog.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "cash_flow_discipline_heuristic",
                "franchise_risk_balance_heuristic",
                "customer_first_service_heuristic"
            ]
        );

        let cash = catalog.get("cash_flow_discipline_heuristic").unwrap();
        assert_eq!(cash.category, HeuristicCategory::Financial);
        assert!(catalog.contains("franchise_risk_balance_heuristic"));
        assert!(!catalog.contains("nonexistent_heuristic"));
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(HeuristicCatalog::from_json("{}").is_err());
        assert!(HeuristicCatalog::from_json("not json").is_err());
        assert!(
            HeuristicCatalog::from_json(r#"{"heuristics": {"x": {"name": "X"}}}"#).is_err()
        );
    }

    #[test]
    fn test_sample_is_distinct_and_bounded() {
        let catalog = HeuristicCatalog::from_json(SAMPLE).unwrap();

        for _ in 0..20 {
            let picked = catalog.sample(3);
            assert_eq!(picked.len(), 3);
            let mut ids: Vec<&str> = picked.iter().map(|h| h.id.as_str()).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), 3, "sample must be without replacement");
        }

        assert_eq!(catalog.sample(10).len(), 3);
        assert!(HeuristicCatalog::default().sample(3).is_empty());
    }
}
