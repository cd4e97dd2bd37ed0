use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use pitchcraft_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run(options: LoadOptions) -> String {
    let config_file_path = options.config_path.clone().or_else(detect_config_path);

    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let doc = config_file_doc.as_ref();
    let file = config_file_path.as_deref();

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "llm.base_url",
        &config.llm.base_url,
        field_source("llm.base_url", Some("PITCHCRAFT_LLM_BASE_URL"), doc, file),
    ));
    lines.push(render_line(
        "llm.model",
        &config.llm.model,
        field_source("llm.model", Some("PITCHCRAFT_LLM_MODEL"), doc, file),
    ));

    let llm_api_key = if config.llm.api_key.is_some() { "<redacted>" } else { "<unset>" };
    lines.push(render_line(
        "llm.api_key",
        llm_api_key,
        field_source("llm.api_key", Some("PITCHCRAFT_LLM_API_KEY"), doc, file),
    ));
    lines.push(render_line(
        "llm.timeout_secs",
        &config.llm.timeout_secs.to_string(),
        field_source("llm.timeout_secs", Some("PITCHCRAFT_LLM_TIMEOUT_SECS"), doc, file),
    ));

    lines.push(render_line(
        "extractor.timeout_secs",
        &config.extractor.timeout_secs.to_string(),
        field_source(
            "extractor.timeout_secs",
            Some("PITCHCRAFT_EXTRACTOR_TIMEOUT_SECS"),
            doc,
            file,
        ),
    ));

    lines.push(render_line(
        "storage.state_path",
        &config.storage.state_path.display().to_string(),
        field_source("storage.state_path", Some("PITCHCRAFT_STATE_PATH"), doc, file),
    ));

    let catalog_path = config
        .catalog
        .path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<builtin>".to_string());
    lines.push(render_line(
        "catalog.path",
        &catalog_path,
        field_source("catalog.path", Some("PITCHCRAFT_CATALOG_PATH"), doc, file),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        field_source("logging.level", Some("PITCHCRAFT_LOGGING_LEVEL"), doc, file),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        field_source("logging.format", Some("PITCHCRAFT_LOGGING_FORMAT"), doc, file),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("pitchcraft.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/pitchcraft.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
