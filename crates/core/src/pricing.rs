use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, ServiceCatalogEntry, ServiceId};
use crate::errors::DomainError;

/// Bundle licensing tiers. AllEmployees requires licensing every employee;
/// FlexibleUser licenses any subset at a higher per-user rate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleTier {
    #[default]
    AllEmployees,
    FlexibleUser,
}

impl BundleTier {
    pub fn price(self) -> Decimal {
        match self {
            Self::AllEmployees => dec!(1575),
            Self::FlexibleUser => dec!(3675),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AllEmployees => "All Employees",
            Self::FlexibleUser => "Flexible User",
        }
    }
}

impl std::str::FromStr for BundleTier {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "all" | "all_employees" => Ok(Self::AllEmployees),
            "flexible" | "flexible_user" => Ok(Self::FlexibleUser),
            other => Err(DomainError::InvalidField {
                field: "bundle_tier".to_owned(),
                reason: format!("unknown tier `{other}` (expected all-employees|flexible-user)"),
            }),
        }
    }
}

/// Sign of the bundle comparison, used to pick the message branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleComparison {
    Savings,
    CostsMore,
    Parity,
}

impl BundleComparison {
    pub fn from_savings(savings: Decimal) -> Self {
        if savings > Decimal::ZERO {
            Self::Savings
        } else if savings < Decimal::ZERO {
            Self::CostsMore
        } else {
            Self::Parity
        }
    }
}

/// Derived pricing outcome for the proposal. Recomputed on every pricing
/// step visit, never edited directly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub service_names: Vec<String>,
    pub total_cost: Decimal,
    pub use_bundle: bool,
    pub savings: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_tier: Option<BundleTier>,
}

/// Resolves selected ids against the catalog, rejecting ids it does not know.
pub fn resolve_selection<'a>(
    selection: &[ServiceId],
    catalog: &'a Catalog,
) -> Result<Vec<&'a ServiceCatalogEntry>, DomainError> {
    selection
        .iter()
        .map(|id| catalog.find(id).ok_or_else(|| DomainError::UnknownService(id.0.clone())))
        .collect()
}

/// Sum of monthly prices for the selection, excluding the bundle pseudo-item.
/// Unknown ids contribute nothing; selection validation happens earlier.
pub fn individual_cost(selection: &[ServiceId], catalog: &Catalog) -> Decimal {
    selection
        .iter()
        .filter(|id| !id.is_bundle())
        .filter_map(|id| catalog.find(id))
        .map(|entry| entry.monthly_price)
        .sum()
}

/// `individual − bundle`; negative means the bundle costs more.
pub fn savings(selection: &[ServiceId], catalog: &Catalog, tier: BundleTier) -> Decimal {
    individual_cost(selection, catalog) - tier.price()
}

/// Computes the final pricing for the proposal, enforcing the bundle policy:
/// any selected service that requires the bundle blocks submission until the
/// bundle is enabled.
pub fn price_selection(
    selection: &[ServiceId],
    catalog: &Catalog,
    use_bundle: bool,
    tier: BundleTier,
) -> Result<PricingResult, DomainError> {
    let entries = resolve_selection(selection, catalog)?;
    let standalone_entries: Vec<_> =
        entries.iter().copied().filter(|entry| !entry.id.is_bundle()).collect();

    if standalone_entries.is_empty() {
        return Err(DomainError::EmptySelection);
    }

    if !use_bundle {
        let blocked: Vec<String> = standalone_entries
            .iter()
            .filter(|entry| entry.requires_bundle())
            .map(|entry| entry.name.clone())
            .collect();
        if !blocked.is_empty() {
            return Err(DomainError::BundleRequired { services: blocked });
        }
    }

    let individual = individual_cost(selection, catalog);
    let service_names = standalone_entries.iter().map(|entry| entry.name.clone()).collect();

    Ok(if use_bundle {
        PricingResult {
            service_names,
            total_cost: tier.price(),
            use_bundle: true,
            savings: individual - tier.price(),
            bundle_tier: Some(tier),
        }
    } else {
        PricingResult {
            service_names,
            total_cost: individual,
            use_bundle: false,
            savings: Decimal::ZERO,
            bundle_tier: None,
        }
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::{
        individual_cost, price_selection, savings, BundleComparison, BundleTier, PricingResult,
    };
    use crate::catalog::{Catalog, ServiceId};
    use crate::errors::DomainError;

    fn catalog() -> Catalog {
        Catalog::builtin().expect("builtin catalog")
    }

    fn ids(raw: &[&str]) -> Vec<ServiceId> {
        raw.iter().map(|id| ServiceId::new(*id)).collect()
    }

    #[test]
    fn individual_cost_sums_selected_prices() {
        let selection = ids(&["crm", "books", "sites"]);
        assert_eq!(individual_cost(&selection, &catalog()), dec!(1223));
    }

    #[test]
    fn individual_cost_excludes_the_bundle_pseudo_item() {
        let selection = ids(&["crm", "zoho_one"]);
        assert_eq!(individual_cost(&selection, &catalog()), dec!(700));
    }

    #[test]
    fn empty_selection_sums_to_zero() {
        assert_eq!(individual_cost(&[], &catalog()), Decimal::ZERO);
    }

    #[test]
    fn bundle_costing_more_is_reported_as_negative_savings() {
        // crm + desk total 1400; the all-employees bundle at 1575 costs more.
        let selection = ids(&["crm", "desk"]);
        let catalog = catalog();

        assert_eq!(individual_cost(&selection, &catalog), dec!(1400));
        assert_eq!(savings(&selection, &catalog, BundleTier::AllEmployees), dec!(-175));

        let result = price_selection(&selection, &catalog, true, BundleTier::AllEmployees)
            .expect("bundle pricing");
        assert_eq!(result.total_cost, dec!(1575));
        assert_eq!(result.savings, dec!(-175));
        assert_eq!(BundleComparison::from_savings(result.savings), BundleComparison::CostsMore);
    }

    #[test]
    fn positive_savings_when_individual_sum_exceeds_bundle_price() {
        let selection = ids(&["crm", "desk", "books", "workplace", "sites"]);
        let result = price_selection(&selection, &catalog(), true, BundleTier::AllEmployees)
            .expect("bundle pricing");

        assert_eq!(result.savings, dec!(483));
        assert_eq!(BundleComparison::from_savings(result.savings), BundleComparison::Savings);
    }

    #[test]
    fn parity_is_its_own_branch() {
        assert_eq!(BundleComparison::from_savings(Decimal::ZERO), BundleComparison::Parity);
    }

    #[test]
    fn services_requiring_bundle_block_submission_without_it() {
        let selection = ids(&["crm", "inventory"]);
        let error = price_selection(&selection, &catalog(), false, BundleTier::AllEmployees)
            .expect_err("inventory requires the bundle");

        assert!(matches!(
            error,
            DomainError::BundleRequired { ref services } if services == &["Zoho Inventory".to_owned()]
        ));

        price_selection(&selection, &catalog(), true, BundleTier::AllEmployees)
            .expect("enabling the bundle unblocks submission");
    }

    #[test]
    fn without_bundle_total_is_the_individual_sum_and_savings_zero() {
        let selection = ids(&["crm", "books"]);
        let result = price_selection(&selection, &catalog(), false, BundleTier::AllEmployees)
            .expect("individual pricing");

        assert_eq!(
            result,
            PricingResult {
                service_names: vec!["Zoho CRM".to_owned(), "Zoho Books".to_owned()],
                total_cost: dec!(943),
                use_bundle: false,
                savings: Decimal::ZERO,
                bundle_tier: None,
            }
        );
    }

    #[test]
    fn flexible_tier_uses_its_own_price() {
        let selection = ids(&["crm", "desk"]);
        let result = price_selection(&selection, &catalog(), true, BundleTier::FlexibleUser)
            .expect("bundle pricing");

        assert_eq!(result.total_cost, dec!(3675));
        assert_eq!(result.savings, dec!(-2275));
        assert_eq!(result.bundle_tier, Some(BundleTier::FlexibleUser));
    }

    #[test]
    fn empty_selection_is_rejected_at_pricing() {
        let error = price_selection(&[], &catalog(), false, BundleTier::AllEmployees)
            .expect_err("nothing selected");
        assert!(matches!(error, DomainError::EmptySelection));
    }

    #[test]
    fn unknown_service_id_is_rejected() {
        let selection = ids(&["crm", "mail"]);
        let error = price_selection(&selection, &catalog(), false, BundleTier::AllEmployees)
            .expect_err("mail is not in the catalog");
        assert!(matches!(error, DomainError::UnknownService(ref id) if id == "mail"));
    }

    #[test]
    fn tier_parses_from_cli_spellings() {
        assert_eq!("all-employees".parse::<BundleTier>().expect("tier"), BundleTier::AllEmployees);
        assert_eq!("flexible".parse::<BundleTier>().expect("tier"), BundleTier::FlexibleUser);
        assert!("premium".parse::<BundleTier>().is_err());
    }
}
