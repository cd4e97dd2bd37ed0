use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::state::AppState;

/// The five wizard steps, in flow order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    CompanyInfo,
    Industry,
    Services,
    Pricing,
    Proposal,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] =
        [Self::CompanyInfo, Self::Industry, Self::Services, Self::Pricing, Self::Proposal];

    pub fn title(self) -> &'static str {
        match self {
            Self::CompanyInfo => "Company Information",
            Self::Industry => "Industry & Challenges",
            Self::Services => "Service Recommendations",
            Self::Pricing => "Pricing & Bundling",
            Self::Proposal => "Proposal",
        }
    }

    /// Whether the state this step is responsible for producing exists.
    /// `reset()` seeds a blank company form, so presence alone is not
    /// enough: the stored info must also pass validation.
    fn completed(self, state: &AppState) -> bool {
        match self {
            Self::CompanyInfo => {
                state.company_info.as_ref().map(|info| info.validate().is_ok()).unwrap_or(false)
            }
            Self::Industry => {
                state.industry_info.as_ref().map(|info| info.is_complete()).unwrap_or(false)
            }
            Self::Services => {
                state.selected_services.as_ref().map(|ids| !ids.is_empty()).unwrap_or(false)
            }
            Self::Pricing => state.pricing.is_some(),
            // The proposal step produces no state; it renders the document.
            Self::Proposal => false,
        }
    }
}

/// Earliest step whose own input has not been produced yet. This is the
/// redirect target for any step entered too early.
pub fn first_unmet(state: &AppState) -> WizardStep {
    WizardStep::ALL
        .into_iter()
        .find(|step| !step.completed(state))
        .unwrap_or(WizardStep::Proposal)
}

/// A step is reachable once every predecessor step has produced its state.
/// Pure, synchronous inspection; no retry semantics.
pub fn ensure_reachable(step: WizardStep, state: &AppState) -> Result<(), DomainError> {
    let redirect = first_unmet(state);
    if step <= redirect {
        return Ok(());
    }
    Err(DomainError::StepLocked { step, redirect })
}
