use pitchcraft_core::config::{AppConfig, ConfigError, LoadOptions};
use pitchcraft_core::pricing::BundleTier;
use pitchcraft_core::{Catalog, CatalogError, BUNDLE_ID, CURRENCY};
use serde::Serialize;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct CatalogListing<'a> {
    currency: &'static str,
    services: Vec<ServiceRow<'a>>,
    bundle_tiers: Vec<TierRow>,
}

#[derive(Debug, Serialize)]
struct ServiceRow<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    monthly_price: String,
    requires_bundle: bool,
}

#[derive(Debug, Serialize)]
struct TierRow {
    tier: &'static str,
    monthly_price: String,
}

pub fn run(options: LoadOptions, json_output: bool) -> CommandResult {
    let catalog = match load_effective_catalog(options) {
        Ok(catalog) => catalog,
        Err(result) => return *result,
    };

    let listing = build_listing(&catalog);

    if json_output {
        return match serde_json::to_string_pretty(&listing) {
            Ok(payload) => CommandResult { exit_code: 0, output: payload },
            Err(error) => CommandResult::failure("catalog", "serialization", error.to_string(), 1),
        };
    }

    CommandResult { exit_code: 0, output: render_human(&listing) }
}

/// Loads the catalog the wizard would use: the configured file when one is
/// set, otherwise the built-in listing.
pub fn load_effective_catalog(options: LoadOptions) -> Result<Catalog, Box<CommandResult>> {
    let config = AppConfig::load(options)
        .map_err(|error: ConfigError| config_failure("catalog", &error))?;
    load_from_config(&config).map_err(|error| {
        Box::new(CommandResult::failure("catalog", "catalog_load", error.to_string(), 3))
    })
}

pub fn load_from_config(config: &AppConfig) -> Result<Catalog, CatalogError> {
    match &config.catalog.path {
        Some(path) => Catalog::from_file(path),
        None => Catalog::builtin(),
    }
}

fn config_failure(command: &str, error: &ConfigError) -> Box<CommandResult> {
    Box::new(CommandResult::failure(command, "config_validation", error.to_string(), 2))
}

fn build_listing(catalog: &Catalog) -> CatalogListing<'_> {
    let services = catalog
        .entries()
        .iter()
        .filter(|entry| entry.id.as_str() != BUNDLE_ID)
        .map(|entry| ServiceRow {
            id: entry.id.as_str(),
            name: &entry.name,
            category: &entry.category,
            monthly_price: format!("{:.2}", entry.monthly_price),
            requires_bundle: entry.requires_bundle(),
        })
        .collect();

    let bundle_tiers = [BundleTier::AllEmployees, BundleTier::FlexibleUser]
        .into_iter()
        .map(|tier| TierRow {
            tier: tier.label(),
            monthly_price: format!("{:.2}", tier.price()),
        })
        .collect();

    CatalogListing { currency: CURRENCY, services, bundle_tiers }
}

fn render_human(listing: &CatalogListing<'_>) -> String {
    let mut lines = vec![format!("service catalog (prices in {}/month):", listing.currency)];
    for row in &listing.services {
        let suffix = if row.requires_bundle { " [bundle only]" } else { "" };
        lines.push(format!(
            "- {} ({}): {}, {} {}{suffix}",
            row.name, row.id, row.category, row.monthly_price, listing.currency
        ));
    }
    lines.push("bundle tiers (Zoho One):".to_string());
    for tier in &listing.bundle_tiers {
        lines.push(format!("- {}: {} {}", tier.tier, tier.monthly_price, listing.currency));
    }
    lines.join("\n")
}
