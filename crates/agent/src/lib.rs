//! Model-facing side of the proposal wizard.
//!
//! This crate talks to an OpenAI-compatible chat endpoint and to customer
//! websites, and turns their free-form output into plain strings and lists.
//! Everything the business logic depends on (catalog matching, pricing,
//! step gating) lives in `pitchcraft-core`; the agent only suggests.

pub mod extractor;
pub mod flows;
pub mod llm;

pub use extractor::{ExtractorError, WebsiteExtractor, MAX_CONTENT_CHARS};
pub use flows::{detect_industry, industry_challenges, recommend_services};
pub use llm::{ChatCompletionsClient, LlmClient, LlmError};
