use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use thiserror::Error;

use crate::catalog::{Catalog, ServiceCatalogEntry, ServiceId, CURRENCY};
use crate::domain::company::CompanyInfo;
use crate::domain::industry::IndustryInfo;
use crate::errors::DomainError;
use crate::i18n::{labels, Language};
use crate::pricing::{BundleComparison, BundleTier, PricingResult};

const PROPOSAL_TEMPLATE: &str = include_str!("../templates/proposal.txt.tera");
const RULE: &str = "==================================================";

/// Verbosity of the generated document. Detailed adds the challenge lists
/// and per-service long descriptions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    #[default]
    Quick,
    Detailed,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Detailed => "detailed",
        }
    }
}

impl std::str::FromStr for ReportKind {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "quick" => Ok(Self::Quick),
            "detailed" => Ok(Self::Detailed),
            other => Err(DomainError::InvalidField {
                field: "report_kind".to_owned(),
                reason: format!("unknown report kind `{other}` (expected quick|detailed)"),
            }),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProposalError {
    #[error("proposal template failed to render: {0}")]
    Template(#[from] tera::Error),
}

/// Everything the generator needs. Rendering is a pure function of this
/// input: same input, byte-identical output.
#[derive(Clone, Debug)]
pub struct ProposalInput<'a> {
    pub company: &'a CompanyInfo,
    pub industry: &'a IndustryInfo,
    pub pricing: &'a PricingResult,
    pub selection: &'a [ServiceId],
    pub catalog: &'a Catalog,
    pub language: Language,
    pub kind: ReportKind,
}

#[derive(Serialize)]
struct ServiceView {
    name: String,
    category: String,
    price: String,
    description: String,
    bullets: Vec<String>,
}

pub fn render_proposal(input: &ProposalInput<'_>) -> Result<String, ProposalError> {
    let strings = labels(input.language);

    let services: Vec<ServiceView> = input
        .selection
        .iter()
        .filter(|id| !id.is_bundle())
        .filter_map(|id| input.catalog.find(id))
        .map(|entry| service_view(entry, input.language))
        .collect();

    let mut context = Context::new();
    context.insert("rule", RULE);
    context.insert("labels", strings);
    context.insert("company_name", &input.company.company_name);
    context.insert("company_website", &input.company.company_website);
    context.insert("sales_rep_name", &input.company.sales_rep_name);
    context.insert("industry_name", &input.industry.industry);
    context.insert("services", &services);
    context.insert("package_line", &package_line(input, services.len()));
    context.insert("total", &format_money(input.pricing.total_cost));
    context.insert("comparison_line", &comparison_line(input));
    context.insert("detailed", &(input.kind == ReportKind::Detailed));
    context.insert("general_challenges", &input.industry.general_challenges);
    context.insert("specific_challenges", input.industry.specific_challenges.trim());

    let mut tera = Tera::default();
    tera.add_raw_template("proposal.txt", PROPOSAL_TEMPLATE)?;
    Ok(tera.render("proposal.txt", &context)?)
}

/// File name offered for the download: sanitized company name plus report
/// kind, e.g. `acme-trading-quick-proposal.txt`.
pub fn proposal_file_name(company_name: &str, kind: ReportKind) -> String {
    let mut sanitized = String::with_capacity(company_name.len());
    for ch in company_name.to_lowercase().chars() {
        if ch.is_alphanumeric() {
            sanitized.push(ch);
        } else if !sanitized.ends_with('-') {
            sanitized.push('-');
        }
    }
    let sanitized = sanitized.trim_matches('-');
    let stem = if sanitized.is_empty() { "proposal" } else { sanitized };
    format!("{stem}-{}-proposal.txt", kind.as_str())
}

fn service_view(entry: &ServiceCatalogEntry, language: Language) -> ServiceView {
    let (description, bullets) = match language {
        Language::En => (entry.description.clone(), entry.long_description.clone()),
        Language::Ar => (entry.description_ar.clone(), entry.long_description_ar.clone()),
    };
    ServiceView {
        name: entry.name.clone(),
        category: entry.category.clone(),
        price: format_money(entry.monthly_price),
        description,
        bullets,
    }
}

fn package_line(input: &ProposalInput<'_>, service_count: usize) -> String {
    let strings = labels(input.language);
    if input.pricing.use_bundle {
        let tier = input.pricing.bundle_tier.unwrap_or_default();
        let tier_label = match tier {
            BundleTier::AllEmployees => strings.tier_all_employees,
            BundleTier::FlexibleUser => strings.tier_flexible_user,
        };
        let bundle_name = input
            .catalog
            .bundle()
            .map(|entry| entry.name.as_str())
            .unwrap_or("Bundle")
            .to_owned();
        format!("{bundle_name} ({tier_label})")
    } else {
        format!("{} ({} {})", strings.custom_package, service_count, strings.services_word)
    }
}

/// Localized bundle comparison sentence; empty when the bundle is off.
fn comparison_line(input: &ProposalInput<'_>) -> String {
    if !input.pricing.use_bundle {
        return String::new();
    }

    let amount = format_money(input.pricing.savings.abs());
    match (BundleComparison::from_savings(input.pricing.savings), input.language) {
        (BundleComparison::Savings, Language::En) => {
            format!("You save {amount} {CURRENCY}/mo with the bundle.")
        }
        (BundleComparison::Savings, Language::Ar) => {
            format!("توفر {amount} جنيه شهريًا مع الباقة.")
        }
        (BundleComparison::CostsMore, Language::En) => {
            format!("The bundle costs {amount} {CURRENCY}/mo more but includes all apps.")
        }
        (BundleComparison::CostsMore, Language::Ar) => {
            format!("تكلف الباقة {amount} جنيه شهريًا إضافية لكنها تشمل جميع التطبيقات.")
        }
        (BundleComparison::Parity, Language::En) => {
            "The bundle matches the individual total.".to_owned()
        }
        (BundleComparison::Parity, Language::Ar) => {
            "تكلفة الباقة تساوي إجمالي الخدمات الفردية.".to_owned()
        }
    }
}

fn format_money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}
