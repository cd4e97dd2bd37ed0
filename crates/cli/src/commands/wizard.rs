use std::io::{self, BufRead, Write};

use pitchcraft_core::config::{AppConfig, LoadOptions, LogFormat};
use pitchcraft_core::pricing::{price_selection, savings, BundleComparison, BundleTier};
use pitchcraft_core::{
    first_unmet, parse_recommendations, proposal_file_name, render_proposal, Catalog, CompanyInfo,
    DomainError, IndustryInfo, Language, ProposalInput, ReportKind, ServiceId, User, UserRole,
    Wizard, WizardStep, BUNDLE_ID, CURRENCY, INDUSTRIES,
};
use pitchcraft_agent::{
    detect_industry, industry_challenges, recommend_services, ChatCompletionsClient, LlmClient,
    WebsiteExtractor,
};
use pitchcraft_store::JsonFileStore;
use tracing::warn;

use super::catalog::load_from_config;
use super::CommandResult;

pub fn run(options: LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("wizard", "config_validation", error.to_string(), 2);
        }
    };
    init_logging(&config);

    let catalog = match load_from_config(&config) {
        Ok(catalog) => catalog,
        Err(error) => {
            return CommandResult::failure("wizard", "catalog_load", error.to_string(), 3);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "wizard",
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                1,
            );
        }
    };

    match runtime.block_on(drive(&config, &catalog)) {
        Ok(message) => CommandResult::success("wizard", message),
        Err(error) => CommandResult::failure("wizard", "input", error.to_string(), 1),
    }
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    // A second `wizard` invocation in-process would re-init; ignore that.
    let result = match config.logging.format {
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .compact()
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .pretty()
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .json()
            .try_init(),
    };
    let _ = result;
}

async fn drive(config: &AppConfig, catalog: &Catalog) -> io::Result<String> {
    let store = JsonFileStore::new(config.storage.state_path.clone());
    let mut wizard = Wizard::load(store).await;

    let resume_step = first_unmet(wizard.state());
    if resume_step != WizardStep::CompanyInfo {
        println!("Found a saved proposal (next step: {}).", resume_step.title());
        if ask_yes_no("Start over instead?", false)? {
            wizard.reset().await;
        }
    }

    let llm = build_llm(config);
    let extractor = build_extractor(config);

    loop {
        let step = first_unmet(wizard.state());
        println!();
        println!("== {} ==", step.title());
        match step {
            WizardStep::CompanyInfo => company_step(&mut wizard).await?,
            WizardStep::Industry => {
                industry_step(&mut wizard, llm.as_deref(), extractor.as_ref()).await?;
            }
            WizardStep::Services => {
                services_step(&mut wizard, catalog, llm.as_deref()).await?;
            }
            WizardStep::Pricing => pricing_step(&mut wizard, catalog).await?,
            WizardStep::Proposal => return proposal_step(&wizard, catalog),
        }
    }
}

fn build_llm(config: &AppConfig) -> Option<Box<dyn LlmClient>> {
    match ChatCompletionsClient::new(&config.llm) {
        Ok(client) => Some(Box::new(client)),
        Err(error) => {
            warn!(%error, "llm client unavailable, falling back to manual entry");
            None
        }
    }
}

fn build_extractor(config: &AppConfig) -> Option<WebsiteExtractor> {
    match WebsiteExtractor::new(&config.extractor) {
        Ok(extractor) => Some(extractor),
        Err(error) => {
            warn!(%error, "website extractor unavailable, skipping auto-detection");
            None
        }
    }
}

async fn company_step(wizard: &mut Wizard<JsonFileStore>) -> io::Result<()> {
    let existing = wizard.state().company_info.clone().unwrap_or_default();

    loop {
        let info = CompanyInfo {
            sales_rep_name: ask("Sales rep name", non_empty(&existing.sales_rep_name))?,
            company_name: ask("Company name", non_empty(&existing.company_name))?,
            company_website: ask("Company website (https://...)", non_empty(&existing.company_website))?,
            facebook: optional(ask("Facebook URL (optional)", existing.facebook.as_deref())?),
            linkedin: optional(ask("LinkedIn URL (optional)", existing.linkedin.as_deref())?),
            twitter: optional(ask("Twitter URL (optional)", existing.twitter.as_deref())?),
        };

        let rep_name = info.sales_rep_name.clone();
        match wizard.set_company_info(info).await {
            Ok(()) => {
                if wizard.state().user.is_none() {
                    wizard.set_user(Some(User { name: rep_name, role: UserRole::SalesRep })).await;
                }
                return Ok(());
            }
            Err(error) => println!("  {error}"),
        }
    }
}

async fn industry_step(
    wizard: &mut Wizard<JsonFileStore>,
    llm: Option<&dyn LlmClient>,
    extractor: Option<&WebsiteExtractor>,
) -> io::Result<()> {
    let website = wizard
        .state()
        .company_info
        .as_ref()
        .map(|info| info.company_website.clone())
        .unwrap_or_default();

    let mut industry = String::new();
    if let (Some(llm), Some(extractor)) = (llm, extractor) {
        println!("Reading {website} ...");
        let content = extractor.extract_text(&website).await;
        match detect_industry(llm, &content).await {
            Ok(guess) => industry = guess,
            Err(error) => warn!(%error, "industry detection failed"),
        }
    }

    if !industry.is_empty() {
        if !ask_yes_no(&format!("Detected industry: {industry}. Use it?"), true)? {
            industry.clear();
        }
    }
    if industry.is_empty() {
        industry = pick_industry()?;
    }

    let mut general_challenges = Vec::new();
    if let Some(llm) = llm {
        match industry_challenges(llm, &industry).await {
            Ok(challenges) => general_challenges = challenges,
            Err(error) => warn!(%error, "challenge lookup failed"),
        }
    }
    if general_challenges.is_empty() {
        println!("Enter the industry's main challenges (blank line to finish):");
        general_challenges = read_lines_until_blank()?;
    } else {
        println!("Common {industry} challenges:");
        for challenge in &general_challenges {
            println!("  - {challenge}");
        }
    }

    let specific_challenges = ask("Client-specific challenges", None)?;

    wizard
        .set_industry_info(IndustryInfo { industry, general_challenges, specific_challenges })
        .await;
    Ok(())
}

fn pick_industry() -> io::Result<String> {
    println!("Pick an industry (number) or type your own:");
    for (index, name) in INDUSTRIES.iter().enumerate() {
        println!("  {}) {name}", index + 1);
    }
    loop {
        let answer = ask("Industry", None)?;
        if answer.is_empty() {
            continue;
        }
        if let Ok(number) = answer.parse::<usize>() {
            if let Some(name) = number.checked_sub(1).and_then(|i| INDUSTRIES.get(i)) {
                return Ok((*name).to_string());
            }
            println!("  pick a number between 1 and {}", INDUSTRIES.len());
            continue;
        }
        return Ok(answer);
    }
}

async fn services_step(
    wizard: &mut Wizard<JsonFileStore>,
    catalog: &Catalog,
    llm: Option<&dyn LlmClient>,
) -> io::Result<()> {
    let industry_info = wizard.state().industry_info.clone().unwrap_or_default();

    let mut recommended: Vec<ServiceId> = Vec::new();
    if let Some(llm) = llm {
        match recommend_services(
            llm,
            &industry_info.general_challenges,
            &industry_info.specific_challenges,
        )
        .await
        {
            Ok(raw) => {
                let outcome = parse_recommendations(&raw, catalog);
                for token in &outcome.unrecognized {
                    println!("  (skipping unknown recommendation `{token}`)");
                }
                recommended = outcome.matched;
            }
            Err(error) => warn!(%error, "service recommendation failed"),
        }
    }

    if !recommended.is_empty() {
        println!("Recommended services:");
        for id in &recommended {
            if let Some(entry) = catalog.find(id) {
                println!("  - {} ({} {CURRENCY}/mo)", entry.name, entry.monthly_price);
            }
        }
        if ask_yes_no("Use this selection?", true)? {
            wizard.set_selected_services(recommended).await;
            return Ok(());
        }
    }

    println!("Available services:");
    let listed: Vec<_> =
        catalog.entries().iter().filter(|entry| entry.id.as_str() != BUNDLE_ID).collect();
    for (index, entry) in listed.iter().enumerate() {
        println!(
            "  {}) {} ({} {CURRENCY}/mo){}",
            index + 1,
            entry.name,
            entry.monthly_price,
            if entry.requires_bundle() { " [bundle only]" } else { "" }
        );
    }

    loop {
        let answer = ask("Select services (numbers or names, comma-separated)", None)?;
        match parse_service_selection(&answer, catalog) {
            Ok(selection) if !selection.is_empty() => {
                wizard.set_selected_services(selection).await;
                return Ok(());
            }
            Ok(_) => println!("  select at least one service"),
            Err(unrecognized) => {
                println!("  not in the catalog: {}", unrecognized.join(", "));
            }
        }
    }
}

/// Accepts both list positions ("1,3") and service names/ids ("crm, Zoho
/// Books"). Positions index the standalone services in catalog order.
fn parse_service_selection(input: &str, catalog: &Catalog) -> Result<Vec<ServiceId>, Vec<String>> {
    let listed: Vec<&ServiceId> = catalog
        .entries()
        .iter()
        .filter(|entry| entry.id.as_str() != BUNDLE_ID)
        .map(|entry| &entry.id)
        .collect();

    let mut selection: Vec<ServiceId> = Vec::new();
    let mut unrecognized: Vec<String> = Vec::new();

    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let resolved = match token.parse::<usize>() {
            Ok(number) => number.checked_sub(1).and_then(|i| listed.get(i)).map(|id| (*id).clone()),
            Err(_) => {
                let outcome = parse_recommendations(token, catalog);
                outcome.matched.into_iter().next()
            }
        };
        match resolved {
            Some(id) => {
                if !selection.contains(&id) {
                    selection.push(id);
                }
            }
            None => unrecognized.push(token.to_string()),
        }
    }

    if unrecognized.is_empty() {
        Ok(selection)
    } else {
        Err(unrecognized)
    }
}

async fn pricing_step(wizard: &mut Wizard<JsonFileStore>, catalog: &Catalog) -> io::Result<()> {
    let selection = wizard.state().selected_services.clone().unwrap_or_default();

    loop {
        let use_bundle = ask_yes_no("Price as the Zoho One bundle?", false)?;
        let tier = if use_bundle { pick_tier()? } else { BundleTier::AllEmployees };

        match price_selection(&selection, catalog, use_bundle, tier) {
            Ok(pricing) => {
                println!("Monthly total: {} {CURRENCY}", pricing.total_cost);
                if use_bundle {
                    let delta = savings(&selection, catalog, tier);
                    match BundleComparison::from_savings(delta) {
                        BundleComparison::Savings => {
                            println!("The bundle saves {delta} {CURRENCY}/mo.");
                        }
                        BundleComparison::CostsMore => {
                            println!(
                                "The bundle costs {} {CURRENCY}/mo more but includes all apps.",
                                -delta
                            );
                        }
                        BundleComparison::Parity => {
                            println!("The bundle matches the individual total.");
                        }
                    }
                }
                wizard.set_pricing(pricing).await;
                return Ok(());
            }
            Err(DomainError::BundleRequired { services }) => {
                println!(
                    "  {} available only inside the bundle; enable it to continue",
                    services.join(", ")
                );
            }
            Err(error) => println!("  {error}"),
        }
    }
}

fn pick_tier() -> io::Result<BundleTier> {
    loop {
        let answer = ask(
            &format!(
                "Bundle tier: 1) All Employees ({} {CURRENCY}/mo)  2) Flexible User ({} {CURRENCY}/mo)",
                BundleTier::AllEmployees.price(),
                BundleTier::FlexibleUser.price()
            ),
            Some("1"),
        )?;
        match answer.as_str() {
            "1" => return Ok(BundleTier::AllEmployees),
            "2" => return Ok(BundleTier::FlexibleUser),
            other => {
                if let Ok(tier) = other.parse::<BundleTier>() {
                    return Ok(tier);
                }
                println!("  answer 1 or 2");
            }
        }
    }
}

fn proposal_step(wizard: &Wizard<JsonFileStore>, catalog: &Catalog) -> io::Result<String> {
    let state = wizard.state();
    let (Some(company), Some(industry), Some(selection), Some(pricing)) = (
        state.company_info.as_ref(),
        state.industry_info.as_ref(),
        state.selected_services.as_deref(),
        state.pricing.as_ref(),
    ) else {
        // first_unmet() never routes here with gaps.
        return Err(io::Error::new(io::ErrorKind::InvalidData, "wizard state incomplete"));
    };

    let language = loop {
        let answer = ask("Proposal language (en/ar)", Some("en"))?;
        match answer.parse::<Language>() {
            Ok(language) => break language,
            Err(error) => println!("  {error}"),
        }
    };
    let kind = loop {
        let answer = ask("Report kind (quick/detailed)", Some("quick"))?;
        match answer.parse::<ReportKind>() {
            Ok(kind) => break kind,
            Err(error) => println!("  {error}"),
        }
    };

    let input = ProposalInput {
        company,
        industry,
        pricing,
        selection,
        catalog,
        language,
        kind,
    };
    let document = render_proposal(&input)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error.to_string()))?;

    let file_name = proposal_file_name(&company.company_name, kind);
    std::fs::write(&file_name, &document)?;

    println!();
    println!("{document}");
    Ok(format!("proposal written to `{file_name}`"))
}

fn ask(label: &str, default: Option<&str>) -> io::Result<String> {
    let mut stdout = io::stdout().lock();
    match default {
        Some(default) if !default.is_empty() => write!(stdout, "{label} [{default}]: ")?,
        _ => write!(stdout, "{label}: ")?,
    }
    stdout.flush()?;

    let mut line = String::new();
    let bytes = io::stdin().lock().read_line(&mut line)?;
    if bytes == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input stream closed"));
    }

    let answer = line.trim().to_string();
    if answer.is_empty() {
        if let Some(default) = default {
            return Ok(default.to_string());
        }
    }
    Ok(answer)
}

fn ask_yes_no(label: &str, default: bool) -> io::Result<bool> {
    let hint = if default { "Y/n" } else { "y/N" };
    loop {
        let answer = ask(&format!("{label} [{hint}]"), None)?;
        match answer.to_ascii_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => println!("  answer y or n"),
        }
    }
}

fn read_lines_until_blank() -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    loop {
        let line = ask("-", None)?;
        if line.is_empty() {
            return Ok(lines);
        }
        lines.push(line);
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn optional(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
