//! LLM-backed wizard flows.
//!
//! Each flow builds a prompt, runs a single completion, and reduces the
//! reply to a value the deterministic core can act on. The model suggests;
//! parsing, matching, and pricing stay out of this crate.

use tracing::debug;

use crate::llm::{LlmClient, LlmError};

/// Guess the industry from extracted website text. Empty content short-circuits
/// to an empty guess so the caller can ask the user instead.
pub async fn detect_industry(
    client: &dyn LlmClient,
    website_content: &str,
) -> Result<String, LlmError> {
    if website_content.trim().is_empty() {
        debug!("no website content available, skipping industry detection");
        return Ok(String::new());
    }

    let prompt = format!(
        "You are an expert in identifying the industry of a company based on \
         its website content.\n\nAnalyze the following website content and \
         determine the most likely industry the company operates in. Return \
         ONLY the industry name, do not include any other text.\n\n\
         Website Content: {website_content}"
    );
    let reply = client.complete(&prompt).await?;
    Ok(reply.lines().next().unwrap_or_default().trim().to_string())
}

/// Ask for the common challenges of an industry, one per line.
pub async fn industry_challenges(
    client: &dyn LlmClient,
    industry: &str,
) -> Result<Vec<String>, LlmError> {
    let prompt = format!(
        "You are an expert in various industries and their common challenges.\n\n\
         Based on the detected industry, provide a list of general challenges \
         that companies in this industry typically face. Return one challenge \
         per line with no numbering and no extra commentary.\n\n\
         Industry: {industry}\n\nChallenges:"
    );
    let reply = client.complete(&prompt).await?;
    Ok(parse_challenge_lines(&reply))
}

/// Ask for service recommendations as a comma-separated list. The reply is
/// returned raw; matching against the catalog happens in the core crate.
pub async fn recommend_services(
    client: &dyn LlmClient,
    industry_challenges: &[String],
    client_challenges: &str,
) -> Result<String, LlmError> {
    let prompt = format!(
        "You are an assistant that recommends Zoho services based on industry \
         challenges and client-specific challenges.\n\n\
         Industry Challenges: {}\n\
         Client-Specific Challenges: {}\n\n\
         Based on these challenges, recommend a list of Zoho services that can \
         help address them. The response should be a comma-separated list of \
         Zoho services with no extra text. Do not explain why you are \
         recommending each service.\n\
         Example: Zoho CRM, Zoho Books, Zoho Desk",
        industry_challenges.join("; "),
        client_challenges,
    );
    client.complete(&prompt).await
}

/// Turn a model reply into challenge strings, stripping common bullet and
/// numbering prefixes.
fn parse_challenge_lines(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(strip_list_prefix)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_list_prefix(line: &str) -> &str {
    let line = line.trim();
    let stripped = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("• "));
    if let Some(rest) = stripped {
        return rest.trim();
    }
    // "1. challenge" or "12) challenge"
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest.trim();
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct StubLlm {
        reply: &'static str,
    }

    #[async_trait]
    impl LlmClient for StubLlm {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.reply.to_string())
        }
    }

    struct FailingLlm;

    #[async_trait]
    impl LlmClient for FailingLlm {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            Err(LlmError::EmptyResponse)
        }
    }

    #[tokio::test]
    async fn detect_industry_takes_first_line() {
        let client = StubLlm {
            reply: "Retail\n\nThe company sells widgets.",
        };
        let industry = detect_industry(&client, "we sell widgets").await.unwrap();
        assert_eq!(industry, "Retail");
    }

    #[tokio::test]
    async fn detect_industry_skips_llm_on_empty_content() {
        // FailingLlm would error if it were called.
        let industry = detect_industry(&FailingLlm, "   ").await.unwrap();
        assert!(industry.is_empty());
    }

    #[tokio::test]
    async fn challenges_strip_bullets_and_numbering() {
        let client = StubLlm {
            reply: "- High customer churn\n* Thin margins\n1. Inventory shrinkage\n\n2) Seasonal demand",
        };
        let challenges = industry_challenges(&client, "Retail").await.unwrap();
        assert_eq!(
            challenges,
            vec![
                "High customer churn",
                "Thin margins",
                "Inventory shrinkage",
                "Seasonal demand",
            ]
        );
    }

    #[tokio::test]
    async fn recommendations_return_raw_reply() {
        let client = StubLlm {
            reply: "Zoho CRM, Zoho Books",
        };
        let challenges = vec!["churn".to_string()];
        let raw = recommend_services(&client, &challenges, "slow invoicing")
            .await
            .unwrap();
        assert_eq!(raw, "Zoho CRM, Zoho Books");
    }

    #[test]
    fn plain_lines_pass_through_untouched() {
        assert_eq!(strip_list_prefix("  Rising costs  "), "Rising costs");
        assert_eq!(strip_list_prefix("3. Fraud"), "Fraud");
        assert_eq!(strip_list_prefix("2024 planning"), "2024 planning");
    }
}
