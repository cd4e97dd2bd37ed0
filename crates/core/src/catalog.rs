use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Id of the all-inclusive bundle pseudo-item. It participates in selection
/// but never in the individual cost sum.
pub const BUNDLE_ID: &str = "zoho_one";

/// All catalog prices are EGP per user per month.
pub const CURRENCY: &str = "EGP";

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.toml");

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(pub String);

impl ServiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_bundle(&self) -> bool {
        self.0 == BUNDLE_ID
    }
}

impl std::fmt::Display for ServiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Static reference data for one subscription offering. Entries are loaded
/// from configuration and never mutated by the wizard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCatalogEntry {
    pub id: ServiceId,
    pub name: String,
    pub category: String,
    pub description: String,
    pub description_ar: String,
    pub long_description: Vec<String>,
    pub long_description_ar: Vec<String>,
    pub monthly_price: Decimal,
    pub standalone: bool,
}

impl ServiceCatalogEntry {
    /// Non-standalone services only ship as part of the bundle.
    pub fn requires_bundle(&self) -> bool {
        !self.standalone
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("catalog validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    services: Vec<ServiceCatalogEntry>,
}

#[derive(Clone, Debug)]
pub struct Catalog {
    entries: Vec<ServiceCatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<ServiceCatalogEntry>) -> Result<Self, CatalogError> {
        let catalog = Self { entries };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog embedded in the binary, used when no override file is
    /// configured.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml(BUILTIN_CATALOG)
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(raw)?;
        Self::new(file.services)
    }

    pub fn entries(&self) -> &[ServiceCatalogEntry] {
        &self.entries
    }

    pub fn find(&self, service_id: &ServiceId) -> Option<&ServiceCatalogEntry> {
        self.entries.iter().find(|entry| &entry.id == service_id)
    }

    pub fn bundle(&self) -> Option<&ServiceCatalogEntry> {
        self.entries.iter().find(|entry| entry.id.is_bundle())
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.id.as_str()) {
                return Err(CatalogError::Validation(format!(
                    "duplicate service id `{}`",
                    entry.id
                )));
            }
            if entry.monthly_price <= Decimal::ZERO {
                return Err(CatalogError::Validation(format!(
                    "service `{}` must have a positive monthly price",
                    entry.id
                )));
            }
            if entry.name.trim().is_empty() {
                return Err(CatalogError::Validation(format!(
                    "service `{}` must have a name",
                    entry.id
                )));
            }
        }

        if self.bundle().is_none() {
            return Err(CatalogError::Validation(format!(
                "catalog must contain the `{BUNDLE_ID}` bundle entry"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::{Catalog, CatalogError, ServiceId, BUNDLE_ID};

    #[test]
    fn builtin_catalog_parses_and_validates() {
        let catalog = Catalog::builtin().expect("builtin catalog is well formed");
        assert_eq!(catalog.entries().len(), 7);
        assert_eq!(catalog.bundle().map(|entry| entry.id.as_str()), Some(BUNDLE_ID));
    }

    #[test]
    fn builtin_prices_match_the_published_price_list() {
        let catalog = Catalog::builtin().expect("builtin catalog");
        let price = |id: &str| {
            catalog.find(&ServiceId::new(id)).map(|entry| entry.monthly_price).expect("entry")
        };

        assert_eq!(price("crm"), dec!(700));
        assert_eq!(price("desk"), dec!(700));
        assert_eq!(price("books"), dec!(243));
        assert_eq!(price("workplace"), dec!(135));
        assert_eq!(price("inventory"), dec!(1048.5));
        assert_eq!(price("sites"), dec!(280));
        assert_eq!(price(BUNDLE_ID), dec!(1575));
    }

    #[test]
    fn inventory_requires_the_bundle() {
        let catalog = Catalog::builtin().expect("builtin catalog");
        let inventory = catalog.find(&ServiceId::new("inventory")).expect("inventory entry");
        assert!(inventory.requires_bundle());

        let crm = catalog.find(&ServiceId::new("crm")).expect("crm entry");
        assert!(!crm.requires_bundle());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let raw = r#"
[[services]]
id = "crm"
name = "Zoho CRM"
category = "Sales"
description = "d"
description_ar = "d"
long_description = []
long_description_ar = []
monthly_price = "700"
standalone = true

[[services]]
id = "crm"
name = "Zoho CRM again"
category = "Sales"
description = "d"
description_ar = "d"
long_description = []
long_description_ar = []
monthly_price = "700"
standalone = true
"#;
        let error = Catalog::from_toml(raw).expect_err("duplicate id");
        assert!(matches!(error, CatalogError::Validation(ref message) if message.contains("crm")));
    }

    #[test]
    fn missing_bundle_entry_is_rejected() {
        let raw = r#"
[[services]]
id = "crm"
name = "Zoho CRM"
category = "Sales"
description = "d"
description_ar = "d"
long_description = []
long_description_ar = []
monthly_price = "700"
standalone = true
"#;
        let error = Catalog::from_toml(raw).expect_err("bundle entry is mandatory");
        assert!(matches!(error, CatalogError::Validation(_)));
    }
}
