use thiserror::Error;

use crate::steps::WizardStep;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },
    #[error("unknown service id `{0}`")]
    UnknownService(String),
    #[error("at least one service must be selected")]
    EmptySelection,
    #[error("selected services require the bundle: {services:?}")]
    BundleRequired { services: Vec<String> },
    #[error("step {step:?} is not reachable yet; earliest unmet step is {redirect:?}")]
    StepLocked { step: WizardStep, redirect: WizardStep },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("integration failure: {0}")]
    Integration(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Stable message safe to show a sales rep, without internal detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Domain(_) => "The input could not be processed. Check the form and try again.",
            Self::Persistence(_) => {
                "Saved state could not be read or written. Continuing in memory."
            }
            Self::Integration(_) => {
                "An external service is unavailable. Enter the value manually and continue."
            }
            Self::Configuration(_) => "The configuration is invalid. Run `pitchcraft doctor`.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ApplicationError, DomainError};

    #[test]
    fn domain_error_has_user_safe_message() {
        let error = ApplicationError::from(DomainError::EmptySelection);
        assert_eq!(
            error.user_message(),
            "The input could not be processed. Check the form and try again."
        );
    }

    #[test]
    fn integration_failure_points_at_manual_fallback() {
        let error = ApplicationError::Integration("challenge lookup timed out".to_owned());
        assert!(error.user_message().contains("manually"));
    }
}
