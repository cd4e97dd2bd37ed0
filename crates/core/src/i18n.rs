use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Proposal output languages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ar => "Arabic",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::En),
            "ar" | "arabic" => Ok(Self::Ar),
            other => Err(DomainError::InvalidField {
                field: "language".to_owned(),
                reason: format!("unknown language `{other}` (expected en|ar)"),
            }),
        }
    }
}

/// Static label set rendered into the proposal document.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Labels {
    pub title: &'static str,
    pub prepared_for: &'static str,
    pub website: &'static str,
    pub prepared_by: &'static str,
    pub industry: &'static str,
    pub selected_services: &'static str,
    pub package: &'static str,
    pub total_cost: &'static str,
    pub per_month: &'static str,
    pub general_challenges: &'static str,
    pub specific_challenges: &'static str,
    pub service_details: &'static str,
    pub custom_package: &'static str,
    pub services_word: &'static str,
    pub tier_all_employees: &'static str,
    pub tier_flexible_user: &'static str,
}

const LABELS_EN: Labels = Labels {
    title: "Sales Proposal",
    prepared_for: "Prepared for",
    website: "Website",
    prepared_by: "Prepared by",
    industry: "Industry",
    selected_services: "Selected services",
    package: "Package",
    total_cost: "Total monthly cost",
    per_month: "EGP/mo",
    general_challenges: "Industry challenges",
    specific_challenges: "Client-specific challenges",
    service_details: "Service details",
    custom_package: "Custom package",
    services_word: "services",
    tier_all_employees: "All Employees",
    tier_flexible_user: "Flexible User",
};

const LABELS_AR: Labels = Labels {
    title: "عرض مبيعات",
    prepared_for: "مُعد لشركة",
    website: "الموقع الإلكتروني",
    prepared_by: "أُعد بواسطة",
    industry: "المجال",
    selected_services: "الخدمات المختارة",
    package: "الباقة",
    total_cost: "التكلفة الشهرية الإجمالية",
    per_month: "جنيه/شهر",
    general_challenges: "تحديات المجال",
    specific_challenges: "تحديات العميل الخاصة",
    service_details: "تفاصيل الخدمات",
    custom_package: "باقة مخصصة",
    services_word: "خدمات",
    tier_all_employees: "كل الموظفين",
    tier_flexible_user: "مستخدم مرن",
};

pub fn labels(language: Language) -> &'static Labels {
    match language {
        Language::En => &LABELS_EN,
        Language::Ar => &LABELS_AR,
    }
}

#[cfg(test)]
mod tests {
    use super::{labels, Language};

    #[test]
    fn language_parses_common_spellings() {
        assert_eq!("EN".parse::<Language>().expect("language"), Language::En);
        assert_eq!("arabic".parse::<Language>().expect("language"), Language::Ar);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn label_sets_differ_per_language() {
        assert_ne!(labels(Language::En).title, labels(Language::Ar).title);
    }
}
