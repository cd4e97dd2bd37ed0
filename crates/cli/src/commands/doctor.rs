use std::time::Duration;

use pitchcraft_core::config::{AppConfig, LoadOptions};
use pitchcraft_core::{AppState, StateSnapshot};
use serde::Serialize;

use super::catalog::load_from_config;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(options: LoadOptions, json_output: bool) -> String {
    let report = build_report(options);

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report(options: LoadOptions) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(options) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_catalog(&config));
            checks.push(check_state_file(&config));
            checks.push(check_llm_endpoint(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["catalog_load", "state_file", "llm_endpoint"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_catalog(config: &AppConfig) -> DoctorCheck {
    match load_from_config(config) {
        Ok(catalog) => DoctorCheck {
            name: "catalog_load",
            status: CheckStatus::Pass,
            details: format!("{} services loaded", catalog.entries().len()),
        },
        Err(error) => DoctorCheck {
            name: "catalog_load",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn check_state_file(config: &AppConfig) -> DoctorCheck {
    let path = &config.storage.state_path;
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return DoctorCheck {
                name: "state_file",
                status: CheckStatus::Pass,
                details: format!("no saved state at `{}` (fresh start)", path.display()),
            };
        }
        Err(error) => {
            return DoctorCheck {
                name: "state_file",
                status: CheckStatus::Fail,
                details: format!("could not read `{}`: {error}", path.display()),
            };
        }
    };

    match serde_json::from_str::<StateSnapshot>(&raw) {
        Ok(snapshot) => DoctorCheck {
            name: "state_file",
            status: CheckStatus::Pass,
            details: format!(
                "saved state from {} ({})",
                snapshot.updated_at.format("%Y-%m-%d %H:%M UTC"),
                describe_progress(&snapshot.state)
            ),
        },
        Err(error) => DoctorCheck {
            name: "state_file",
            status: CheckStatus::Fail,
            details: format!("saved state at `{}` is corrupt: {error}", path.display()),
        },
    }
}

fn describe_progress(state: &AppState) -> String {
    let filled = [
        state.company_info.is_some(),
        state.industry_info.is_some(),
        state.selected_services.is_some(),
        state.pricing.is_some(),
    ]
    .iter()
    .filter(|done| **done)
    .count();
    format!("{filled}/4 steps filled")
}

fn check_llm_endpoint(config: &AppConfig) -> DoctorCheck {
    let (host, port) = match endpoint_host_port(&config.llm.base_url) {
        Some(pair) => pair,
        None => {
            return DoctorCheck {
                name: "llm_endpoint",
                status: CheckStatus::Fail,
                details: format!("could not parse host from `{}`", config.llm.base_url),
            };
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck {
                name: "llm_endpoint",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            };
        }
    };

    let address = format!("{host}:{port}");
    let result = runtime.block_on(async {
        tokio::time::timeout(
            Duration::from_secs(3),
            tokio::net::TcpStream::connect(&address),
        )
        .await
    });

    match result {
        Ok(Ok(_stream)) => DoctorCheck {
            name: "llm_endpoint",
            status: CheckStatus::Pass,
            details: format!("endpoint `{address}` is reachable"),
        },
        Ok(Err(error)) => DoctorCheck {
            name: "llm_endpoint",
            status: CheckStatus::Fail,
            details: format!("could not connect to `{address}`: {error}"),
        },
        Err(_elapsed) => DoctorCheck {
            name: "llm_endpoint",
            status: CheckStatus::Fail,
            details: format!("connection to `{address}` timed out"),
        },
    }
}

/// `http://host:port/...` or `https://host/...`; the port defaults from the
/// scheme. Reachability only needs a TCP dial, not a full request.
fn endpoint_host_port(base_url: &str) -> Option<(String, u16)> {
    let (default_port, rest) = if let Some(rest) = base_url.strip_prefix("https://") {
        (443, rest)
    } else if let Some(rest) = base_url.strip_prefix("http://") {
        (80, rest)
    } else {
        return None;
    };

    let authority = rest.split('/').next()?;
    if authority.is_empty() {
        return None;
    }

    match authority.rsplit_once(':') {
        Some((host, port)) => {
            let port = port.parse::<u16>().ok()?;
            Some((host.to_string(), port))
        }
        None => Some((authority.to_string(), default_port)),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
