pub mod config;
pub mod normalize;
pub mod sign;
pub mod upsert;
pub mod verify;

use std::fs;
use std::path::PathBuf;

use clap::Args;
use leadflow_core::config::{AppConfig, LoadOptions};
use serde::Serialize;
use serde_json::Value;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_RUNTIME: u8 = 3;
pub const EXIT_INPUT: u8 = 4;
pub const EXIT_DELIVERY: u8 = 5;
pub const EXIT_VERIFICATION: u8 = 6;

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
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with(command, message, None)
    }

    pub fn success_with(command: &str, message: impl Into<String>, data: Option<Value>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        Self::failure_with(command, error_class, message, exit_code, None)
    }

    pub fn failure_with(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
        data: Option<Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Where a brief comes from. Exactly one source is required.
#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct BriefInput {
    #[arg(long, help = "Brief text passed inline")]
    pub text: Option<String>,
    #[arg(long, help = "Path to a UTF-8 file containing the brief")]
    pub file: Option<PathBuf>,
}

impl BriefInput {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), file: None }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self { text: None, file: Some(path.into()) }
    }

    pub fn read(&self, command: &str) -> Result<String, CommandResult> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => fs::read_to_string(path).map_err(|error| {
                CommandResult::failure(
                    command,
                    "input",
                    format!("could not read brief file `{}`: {error}", path.display()),
                    EXIT_INPUT,
                )
            }),
            (None, None) => Err(CommandResult::failure(
                command,
                "input",
                "provide a brief with --text or --file",
                EXIT_INPUT,
            )),
        }
    }
}

pub(crate) fn load_config(command: &str) -> Result<AppConfig, CommandResult> {
    AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            EXIT_CONFIG,
        )
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::{BriefInput, CommandResult, EXIT_INPUT};

    #[test]
    fn success_omits_data_when_absent() {
        let result = CommandResult::success("normalize", "done");
        let payload: Value = serde_json::from_str(&result.output).expect("json");

        assert_eq!(result.exit_code, 0);
        assert_eq!(payload["status"], "ok");
        assert!(payload["error_class"].is_null());
        assert!(payload.get("data").is_none());
    }

    #[test]
    fn failure_carries_class_code_and_data() {
        let result =
            CommandResult::failure_with("upsert", "delivery", "boom", 5, Some(json!({"a": 1})));
        let payload: Value = serde_json::from_str(&result.output).expect("json");

        assert_eq!(result.exit_code, 5);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "delivery");
        assert_eq!(payload["data"]["a"], 1);
    }

    #[test]
    fn missing_brief_file_is_an_input_error() {
        let input = BriefInput::from_file("/definitely/not/here/brief.txt");
        let result = input.read("normalize").expect_err("missing file");

        assert_eq!(result.exit_code, EXIT_INPUT);
        assert!(result.output.contains("brief.txt"));
    }
}
