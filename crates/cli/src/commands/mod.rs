pub mod catalog;
pub mod config;
pub mod doctor;
pub mod proposal;
pub mod reset;
pub mod wizard;

use serde::Serialize;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    match serde_json::to_string(&payload) {
        Ok(json) => json,
        // Hand-built envelope so the command name survives even when the
        // serializer itself is the failure.
        Err(error) => format!(
            "{{\"command\":\"{}\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            escape_json_string(&payload.command),
            escape_json_string(&error.to_string()),
        ),
    }
}

fn escape_json_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::CommandResult;

    #[test]
    fn success_envelope_carries_command_and_message() {
        let result = CommandResult::success("catalog", "7 services loaded");
        assert_eq!(result.exit_code, 0);

        let payload: Value = serde_json::from_str(&result.output).expect("envelope json");
        assert_eq!(payload["command"], "catalog");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["error_class"], Value::Null);
        assert_eq!(payload["message"], "7 services loaded");
    }

    #[test]
    fn failure_envelope_carries_class_and_exit_code() {
        let result = CommandResult::failure("proposal", "state_missing", "no saved state", 4);
        assert_eq!(result.exit_code, 4);

        let payload: Value = serde_json::from_str(&result.output).expect("envelope json");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "state_missing");
    }

    #[test]
    fn fallback_escaping_keeps_the_output_parseable() {
        let escaped = super::escape_json_string(r#"quote " and backslash \"#);
        let wrapped = format!("{{\"message\":\"{escaped}\"}}");
        let payload: Value = serde_json::from_str(&wrapped).expect("escaped json");
        assert_eq!(payload["message"], r#"quote " and backslash \"#);
    }
}
