use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::catalog::ServiceId;
use crate::domain::company::CompanyInfo;
use crate::domain::industry::IndustryInfo;
use crate::domain::user::User;
use crate::errors::DomainError;
use crate::pricing::PricingResult;

/// Aggregate wizard state. Fields form a strict dependency chain:
/// CompanyInfo → IndustryInfo → SelectedServices → Pricing. Setters clear
/// everything downstream of the field they change so no stale derived value
/// is ever presented.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_info: Option<CompanyInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_info: Option<IndustryInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_services: Option<Vec<ServiceId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PricingResult>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateField {
    CompanyInfo,
    IndustryInfo,
    SelectedServices,
    Pricing,
}

/// Declared dependency table: for each field, the fields derived from it.
pub const DOWNSTREAM: [(StateField, &[StateField]); 4] = [
    (
        StateField::CompanyInfo,
        &[StateField::IndustryInfo, StateField::SelectedServices, StateField::Pricing],
    ),
    (StateField::IndustryInfo, &[StateField::SelectedServices, StateField::Pricing]),
    (StateField::SelectedServices, &[StateField::Pricing]),
    (StateField::Pricing, &[]),
];

/// Clears every field downstream of `changed`, per the dependency table.
pub fn invalidate_downstream(state: &mut AppState, changed: StateField) {
    let downstream = DOWNSTREAM
        .iter()
        .find(|(field, _)| *field == changed)
        .map(|(_, downstream)| *downstream)
        .unwrap_or(&[]);

    for field in downstream {
        match field {
            StateField::CompanyInfo => state.company_info = None,
            StateField::IndustryInfo => state.industry_info = None,
            StateField::SelectedServices => state.selected_services = None,
            StateField::Pricing => state.pricing = None,
        }
    }
}

/// The persisted blob: the whole state under one storage key, stamped with
/// the time of the last change. The initialization flag is deliberately not
/// part of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub state: AppState,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("state read failed: {0}")]
    Read(String),
    #[error("state write failed: {0}")]
    Write(String),
}

/// Persistence port. Read once on startup, written on every state change.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self) -> Result<Option<StateSnapshot>, StoreError>;
    async fn save(&self, snapshot: &StateSnapshot) -> Result<(), StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}

/// State container with an injected persistence port. Storage failures are
/// logged and the wizard continues with in-memory state; they are never
/// fatal.
pub struct Wizard<S> {
    state: AppState,
    store: S,
}

impl<S: StateStore> Wizard<S> {
    /// Reads the persisted snapshot once; falls back to defaults when the
    /// store is empty or unreadable.
    pub async fn load(store: S) -> Self {
        let state = match store.load().await {
            Ok(Some(snapshot)) => snapshot.state,
            Ok(None) => AppState::default(),
            Err(error) => {
                warn!(%error, "could not read saved state, starting fresh");
                AppState::default()
            }
        };
        Self { state, store }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub async fn set_user(&mut self, user: Option<User>) {
        self.state.user = user;
        self.persist().await;
    }

    pub async fn set_company_info(&mut self, info: CompanyInfo) -> Result<(), DomainError> {
        info.validate()?;
        self.state.company_info = Some(info);
        invalidate_downstream(&mut self.state, StateField::CompanyInfo);
        self.persist().await;
        Ok(())
    }

    pub async fn set_industry_info(&mut self, info: IndustryInfo) {
        self.state.industry_info = Some(info);
        invalidate_downstream(&mut self.state, StateField::IndustryInfo);
        self.persist().await;
    }

    pub async fn set_selected_services(&mut self, services: Vec<ServiceId>) {
        let mut deduped: Vec<ServiceId> = Vec::with_capacity(services.len());
        for id in services {
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }
        self.state.selected_services = Some(deduped);
        invalidate_downstream(&mut self.state, StateField::SelectedServices);
        self.persist().await;
    }

    pub async fn set_pricing(&mut self, pricing: PricingResult) {
        self.state.pricing = Some(pricing);
        self.persist().await;
    }

    /// "New proposal": keeps the signed-in user and the rep name, clears
    /// everything else.
    pub async fn reset(&mut self) {
        let user = self.state.user.clone();
        let sales_rep_name = self
            .state
            .company_info
            .as_ref()
            .map(|info| info.sales_rep_name.clone())
            .or_else(|| user.as_ref().map(|user| user.name.clone()))
            .unwrap_or_default();

        self.state = AppState {
            user,
            company_info: Some(CompanyInfo { sales_rep_name, ..CompanyInfo::default() }),
            ..AppState::default()
        };
        self.persist().await;
    }

    async fn persist(&self) {
        let snapshot = StateSnapshot { state: self.state.clone(), updated_at: Utc::now() };
        if let Err(error) = self.store.save(&snapshot).await {
            warn!(%error, "could not persist state, continuing in memory");
        }
    }
}
