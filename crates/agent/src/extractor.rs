//! Website text extraction for industry detection.
//!
//! Fetches a page, strips markup, and hands back plain text. Extraction is
//! best-effort: any failure yields an empty string so the wizard can fall
//! back to asking the user instead of aborting.

use std::time::Duration;

use pitchcraft_core::config::ExtractorConfig;
use regex::Regex;
use thiserror::Error;
use tracing::warn;

/// Hard cap on extracted text handed to the model.
pub const MAX_CONTENT_CHARS: usize = 15_000;

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub struct WebsiteExtractor {
    http: reqwest::Client,
    script_re: Regex,
    style_re: Regex,
    tag_re: Regex,
    ws_re: Regex,
}

impl WebsiteExtractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self, ExtractorError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            script_re: Regex::new(r"(?is)<script[^>]*>.*?</script>")?,
            style_re: Regex::new(r"(?is)<style[^>]*>.*?</style>")?,
            tag_re: Regex::new(r"<[^>]+>")?,
            ws_re: Regex::new(r"\s+")?,
        })
    }

    /// Fetch `url` and return its visible text, truncated to
    /// [`MAX_CONTENT_CHARS`]. Returns an empty string on any fetch failure.
    pub async fn extract_text(&self, url: &str) -> String {
        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(error) => {
                warn!(%url, %error, "website fetch failed, continuing without content");
                return String::new();
            }
        };
        if !response.status().is_success() {
            warn!(%url, status = %response.status(), "website returned non-success status");
            return String::new();
        }
        let body = match response.text().await {
            Ok(body) => body,
            Err(error) => {
                warn!(%url, %error, "website body read failed");
                return String::new();
            }
        };

        self.clean(&body)
    }

    /// Strip markup and cap the result at [`MAX_CONTENT_CHARS`] characters.
    fn clean(&self, html: &str) -> String {
        let text = self.strip_html(html);
        if text.chars().count() > MAX_CONTENT_CHARS {
            text.chars().take(MAX_CONTENT_CHARS).collect()
        } else {
            text
        }
    }

    fn strip_html(&self, html: &str) -> String {
        let without_scripts = self.script_re.replace_all(html, " ");
        let without_styles = self.style_re.replace_all(&without_scripts, " ");
        let without_tags = self.tag_re.replace_all(&without_styles, " ");
        self.ws_re
            .replace_all(&without_tags, " ")
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> WebsiteExtractor {
        WebsiteExtractor::new(&ExtractorConfig { timeout_secs: 2 }).unwrap()
    }

    #[test]
    fn strips_scripts_styles_and_tags() {
        let html = concat!(
            "<html><head><style>body { color: red; }</style>",
            "<script>alert('hi');</script></head>",
            "<body><h1>Acme Trading</h1><p>We sell widgets.</p></body></html>",
        );
        let text = extractor().strip_html(html);
        assert_eq!(text, "Acme Trading We sell widgets.");
        assert!(!text.contains("alert"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn strip_handles_multiline_script_blocks() {
        let html = "<p>before</p>\n<script type=\"text/javascript\">\nvar x = 1;\nvar y = 2;\n</script>\n<p>after</p>";
        let text = extractor().strip_html(html);
        assert_eq!(text, "before after");
    }

    #[test]
    fn collapses_whitespace_runs() {
        let text = extractor().strip_html("<p>one</p>\n\n\t  <p>two</p>");
        assert_eq!(text, "one two");
    }

    #[test]
    fn long_pages_are_capped_at_the_content_limit() {
        // 4000 words at 4 chars each, space-separated: 19,999 chars of text.
        let body = "<p>word</p> ".repeat(4000);
        let text = extractor().clean(&body);
        assert_eq!(text.chars().count(), MAX_CONTENT_CHARS);
        assert!(text.starts_with("word word"));
    }

    #[test]
    fn short_pages_are_left_uncapped() {
        let text = extractor().clean("<p>just a few words</p>");
        assert_eq!(text, "just a few words");
    }

    #[tokio::test]
    async fn unreachable_host_yields_empty_string() {
        let text = extractor().extract_text("http://127.0.0.1:9/").await;
        assert!(text.is_empty());
    }
}
