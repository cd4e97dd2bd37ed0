//! Core domain for the Pitchcraft proposal wizard.
//!
//! Everything in this crate is deterministic and I/O-free apart from the
//! configuration loader and the `StateStore` port. The wizard flow is a
//! strict chain: company info unlocks industry detection, which unlocks
//! service selection, which unlocks pricing, which unlocks the proposal.
//! Changing an upstream field always clears the derived fields below it.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod i18n;
pub mod pricing;
pub mod proposal;
pub mod recommend;
pub mod state;
pub mod steps;

pub use catalog::{Catalog, CatalogError, ServiceCatalogEntry, ServiceId, BUNDLE_ID, CURRENCY};
pub use domain::company::CompanyInfo;
pub use domain::industry::{IndustryInfo, INDUSTRIES};
pub use domain::user::{User, UserRole};
pub use errors::{ApplicationError, DomainError};
pub use i18n::Language;
pub use pricing::{BundleComparison, BundleTier, PricingResult};
pub use proposal::{proposal_file_name, render_proposal, ProposalInput, ReportKind};
pub use recommend::{parse_recommendations, RecommendationOutcome};
pub use state::{AppState, StateSnapshot, StateStore, StoreError, Wizard};
pub use steps::{ensure_reachable, first_unmet, WizardStep};
