use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, ServiceId};

/// Result of parsing the recommendation service's comma-separated reply.
/// Tokens that match no catalog entry are reported, not silently dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationOutcome {
    pub matched: Vec<ServiceId>,
    pub unrecognized: Vec<String>,
}

/// Normalization rule for recommendation tokens and catalog names:
/// trim, lowercase, remove all whitespace.
pub fn normalize_token(raw: &str) -> String {
    raw.trim().to_lowercase().split_whitespace().collect()
}

/// Matches each comma-separated token against the catalog. A token matches
/// an entry when its normalized form equals the entry id or the entry's
/// normalized display name ("Zoho CRM" → "zohocrm" → `crm`).
pub fn parse_recommendations(raw: &str, catalog: &Catalog) -> RecommendationOutcome {
    let mut outcome = RecommendationOutcome::default();

    for token in raw.split(',') {
        let normalized = normalize_token(token);
        if normalized.is_empty() {
            continue;
        }

        let matched = catalog.entries().iter().find(|entry| {
            normalized == entry.id.as_str() || normalized == normalize_token(&entry.name)
        });

        match matched {
            Some(entry) if !outcome.matched.contains(&entry.id) => {
                outcome.matched.push(entry.id.clone());
            }
            Some(_) => {}
            None => outcome.unrecognized.push(token.trim().to_owned()),
        }
    }

    outcome
}
