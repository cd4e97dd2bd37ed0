use std::path::{Path, PathBuf};

use pitchcraft_core::config::{AppConfig, LoadOptions};
use pitchcraft_core::{
    proposal_file_name, render_proposal, AppState, Language, ProposalInput, ReportKind, StateStore,
};
use pitchcraft_store::JsonFileStore;

use super::catalog::load_from_config;
use super::CommandResult;

pub fn run(
    options: LoadOptions,
    language: Language,
    kind: ReportKind,
    out: Option<&Path>,
) -> CommandResult {
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("proposal", "config_validation", error.to_string(), 2);
        }
    };

    let catalog = match load_from_config(&config) {
        Ok(catalog) => catalog,
        Err(error) => {
            return CommandResult::failure("proposal", "catalog_load", error.to_string(), 3);
        }
    };

    let state = match load_state(&config) {
        Ok(Some(state)) => state,
        Ok(None) => {
            return CommandResult::failure(
                "proposal",
                "state_missing",
                format!(
                    "no saved state at `{}`; run `pitchcraft wizard` first",
                    config.storage.state_path.display()
                ),
                4,
            );
        }
        Err(message) => return CommandResult::failure("proposal", "state_read", message, 4),
    };

    let (company, industry, selection, pricing) = match (
        state.company_info.as_ref(),
        state.industry_info.as_ref(),
        state.selected_services.as_deref(),
        state.pricing.as_ref(),
    ) {
        (Some(company), Some(industry), Some(selection), Some(pricing)) => {
            (company, industry, selection, pricing)
        }
        _ => {
            return CommandResult::failure(
                "proposal",
                "state_incomplete",
                "saved state has not reached the pricing step; finish the wizard first",
                5,
            );
        }
    };

    let input = ProposalInput {
        company,
        industry,
        pricing,
        selection,
        catalog: &catalog,
        language,
        kind,
    };
    let document = match render_proposal(&input) {
        Ok(document) => document,
        Err(error) => return CommandResult::failure("proposal", "render", error.to_string(), 6),
    };

    let path = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(proposal_file_name(&company.company_name, kind)));
    if let Err(error) = std::fs::write(&path, &document) {
        return CommandResult::failure(
            "proposal",
            "io",
            format!("could not write `{}`: {error}", path.display()),
            7,
        );
    }

    CommandResult::success(
        "proposal",
        format!("{} {} proposal written to `{}`", language.display_name(), kind.as_str(), path.display()),
    )
}

fn load_state(config: &AppConfig) -> Result<Option<AppState>, String> {
    let store = JsonFileStore::new(config.storage.state_path.clone());
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| format!("failed to initialize async runtime: {error}"))?;
    let snapshot = runtime
        .block_on(store.load())
        .map_err(|error| error.to_string())?;
    Ok(snapshot.map(|snapshot| snapshot.state))
}
