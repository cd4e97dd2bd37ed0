use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use pitchcraft_cli::commands::{catalog, proposal, reset};
use pitchcraft_core::config::{ConfigOverrides, LoadOptions};
use pitchcraft_core::pricing::{price_selection, BundleTier};
use pitchcraft_core::{
    AppState, Catalog, CompanyInfo, IndustryInfo, Language, ReportKind, ServiceId, StateSnapshot,
};
use serde_json::Value;

#[test]
fn catalog_json_lists_builtin_services() {
    with_clean_env(|| {
        let result = catalog::run(LoadOptions::default(), true);
        assert_eq!(result.exit_code, 0, "expected catalog listing success");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["currency"], "EGP");
        assert_eq!(payload["services"].as_array().map(Vec::len), Some(6));
        assert_eq!(payload["bundle_tiers"][0]["monthly_price"], "1575.00");
    });
}

#[test]
fn proposal_without_saved_state_fails_with_state_missing() {
    with_clean_env(|| {
        let dir = tempfile::tempdir().expect("tempdir");
        let options = options_for(&dir.path().join("state.json"));

        let result = proposal::run(options, Language::En, ReportKind::Quick, None);
        assert_eq!(result.exit_code, 4, "expected missing-state failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "proposal");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "state_missing");
    });
}

#[test]
fn proposal_regenerates_from_saved_state() {
    with_clean_env(|| {
        let dir = tempfile::tempdir().expect("tempdir");
        let state_path = dir.path().join("state.json");
        seed_state(&state_path);

        let out_path = dir.path().join("offer.txt");
        let result = proposal::run(
            options_for(&state_path),
            Language::En,
            ReportKind::Quick,
            Some(&out_path),
        );
        assert_eq!(result.exit_code, 0, "expected proposal success: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "proposal");
        assert_eq!(payload["status"], "ok");

        let document = fs::read_to_string(&out_path).expect("proposal file");
        assert!(document.contains("Acme Trading"));
        assert!(document.contains("1400.00 EGP"));
    });
}

#[test]
fn proposal_with_incomplete_state_fails_with_state_incomplete() {
    with_clean_env(|| {
        let dir = tempfile::tempdir().expect("tempdir");
        let state_path = dir.path().join("state.json");

        let state = AppState { company_info: Some(company()), ..AppState::default() };
        write_snapshot(&state_path, state);

        let result = proposal::run(options_for(&state_path), Language::En, ReportKind::Quick, None);
        assert_eq!(result.exit_code, 5, "expected incomplete-state failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "state_incomplete");
    });
}

#[test]
fn reset_discards_saved_state() {
    with_clean_env(|| {
        let dir = tempfile::tempdir().expect("tempdir");
        let state_path = dir.path().join("state.json");
        seed_state(&state_path);
        assert!(state_path.exists());

        let result = reset::run(options_for(&state_path));
        assert_eq!(result.exit_code, 0, "expected reset success: {}", result.output);
        assert!(!state_path.exists());

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "reset");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn reset_is_idempotent_when_nothing_is_saved() {
    with_clean_env(|| {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = reset::run(options_for(&dir.path().join("state.json")));
        assert_eq!(result.exit_code, 0, "expected reset of absent state to succeed");
    });
}

fn company() -> CompanyInfo {
    CompanyInfo {
        sales_rep_name: "Sara".to_string(),
        company_name: "Acme Trading".to_string(),
        company_website: "https://acme.example".to_string(),
        ..CompanyInfo::default()
    }
}

fn seed_state(path: &Path) {
    let catalog = Catalog::builtin().expect("builtin catalog");
    let selection = vec![ServiceId::new("crm"), ServiceId::new("desk")];
    let pricing = price_selection(&selection, &catalog, false, BundleTier::AllEmployees)
        .expect("pricing for crm + desk");

    let state = AppState {
        company_info: Some(company()),
        industry_info: Some(IndustryInfo {
            industry: "Retail".to_string(),
            general_challenges: vec!["High customer churn".to_string()],
            specific_challenges: "Slow invoicing".to_string(),
        }),
        selected_services: Some(selection),
        pricing: Some(pricing),
        ..AppState::default()
    };
    write_snapshot(path, state);
}

fn write_snapshot(path: &Path, state: AppState) {
    let snapshot = StateSnapshot { state, updated_at: chrono::Utc::now() };
    let payload = serde_json::to_vec_pretty(&snapshot).expect("snapshot json");
    fs::write(path, payload).expect("write snapshot");
}

fn options_for(state_path: &Path) -> LoadOptions {
    LoadOptions {
        config_path: None,
        require_file: false,
        overrides: ConfigOverrides {
            state_path: Some(state_path.to_path_buf()),
            catalog_path: None,
            log_level: None,
            llm_base_url: None,
            llm_model: None,
        },
    }
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_clean_env(test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "PITCHCRAFT_LLM_BASE_URL",
        "PITCHCRAFT_LLM_MODEL",
        "PITCHCRAFT_LLM_API_KEY",
        "PITCHCRAFT_LLM_TIMEOUT_SECS",
        "PITCHCRAFT_EXTRACTOR_TIMEOUT_SECS",
        "PITCHCRAFT_STATE_PATH",
        "PITCHCRAFT_CATALOG_PATH",
        "PITCHCRAFT_LOGGING_LEVEL",
        "PITCHCRAFT_LOGGING_FORMAT",
        "PITCHCRAFT_LOG_LEVEL",
        "PITCHCRAFT_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
