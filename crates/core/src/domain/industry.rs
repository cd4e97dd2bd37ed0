use serde::{Deserialize, Serialize};

/// Fallback list shown when automatic detection fails or the rep overrides it.
pub const INDUSTRIES: [&str; 12] = [
    "Technology",
    "Healthcare",
    "Finance",
    "Retail",
    "Manufacturing",
    "Education",
    "Real Estate",
    "Hospitality",
    "E-commerce",
    "Marketing & Advertising",
    "Consulting",
    "Non-profit",
];

/// Industry context collected at the second wizard step. `general_challenges`
/// keeps the order the challenge lookup returned them in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryInfo {
    pub industry: String,
    pub general_challenges: Vec<String>,
    pub specific_challenges: String,
}

impl IndustryInfo {
    pub fn is_complete(&self) -> bool {
        !self.industry.trim().is_empty()
    }
}
