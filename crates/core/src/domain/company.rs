use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Client identity collected at the first wizard step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub sales_rep_name: String,
    pub company_name: String,
    pub company_website: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

impl CompanyInfo {
    pub fn validate(&self) -> Result<(), DomainError> {
        require_min_len("sales_rep_name", &self.sales_rep_name, 2)?;
        require_min_len("company_name", &self.company_name, 2)?;
        require_url("company_website", &self.company_website)?;

        for (field, value) in [
            ("facebook", &self.facebook),
            ("linkedin", &self.linkedin),
            ("twitter", &self.twitter),
        ] {
            if let Some(url) = value.as_deref().filter(|url| !url.trim().is_empty()) {
                require_url(field, url)?;
            }
        }

        Ok(())
    }
}

fn require_min_len(field: &str, value: &str, min: usize) -> Result<(), DomainError> {
    if value.trim().chars().count() < min {
        return Err(DomainError::InvalidField {
            field: field.to_owned(),
            reason: format!("must be at least {min} characters"),
        });
    }
    Ok(())
}

fn require_url(field: &str, value: &str) -> Result<(), DomainError> {
    let trimmed = value.trim();
    let looks_like_url = (trimmed.starts_with("http://") || trimmed.starts_with("https://"))
        && trimmed.len() > "https://".len()
        && !trimmed.contains(char::is_whitespace);
    if !looks_like_url {
        return Err(DomainError::InvalidField {
            field: field.to_owned(),
            reason: "must be a valid http(s) URL".to_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::CompanyInfo;
    use crate::errors::DomainError;

    fn company() -> CompanyInfo {
        CompanyInfo {
            sales_rep_name: "Nadia".to_owned(),
            company_name: "Acme Trading".to_owned(),
            company_website: "https://acme.example".to_owned(),
            ..CompanyInfo::default()
        }
    }

    #[test]
    fn accepts_well_formed_company_info() {
        company().validate().expect("valid info");
    }

    #[test]
    fn rejects_short_company_name() {
        let mut info = company();
        info.company_name = "A".to_owned();
        let error = info.validate().expect_err("single character name");
        assert!(matches!(error, DomainError::InvalidField { ref field, .. } if field == "company_name"));
    }

    #[test]
    fn rejects_non_http_website() {
        let mut info = company();
        info.company_website = "acme.example".to_owned();
        let error = info.validate().expect_err("missing scheme");
        assert!(
            matches!(error, DomainError::InvalidField { ref field, .. } if field == "company_website")
        );
    }

    #[test]
    fn empty_social_links_are_allowed() {
        let mut info = company();
        info.facebook = Some(String::new());
        info.validate().expect("empty social link is skipped");
    }

    #[test]
    fn bad_social_link_is_rejected() {
        let mut info = company();
        info.linkedin = Some("linkedin.com/acme".to_owned());
        let error = info.validate().expect_err("social link must be a URL");
        assert!(matches!(error, DomainError::InvalidField { ref field, .. } if field == "linkedin"));
    }
}
