use chrono::Utc;
use leadflow_crm::{is_integer_timestamp, WebhookVerifier};
use serde_json::json;

use crate::commands::{load_config, CommandResult, EXIT_CONFIG, EXIT_INPUT};

pub fn run(body: &str, timestamp: Option<&str>) -> CommandResult {
    let config = match load_config("sign") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let Some(verifier) = WebhookVerifier::from_config(&config.crm) else {
        return CommandResult::failure(
            "sign",
            "config_validation",
            "no webhook secret configured (set LEADFLOW_CRM_WEBHOOK_SECRET or APP_SECRET)",
            EXIT_CONFIG,
        );
    };

    let timestamp = timestamp.map_or_else(|| Utc::now().timestamp().to_string(), str::to_string);
    if !is_integer_timestamp(&timestamp) {
        return CommandResult::failure(
            "sign",
            "input",
            format!("timestamp `{timestamp}` is not an integer number of seconds"),
            EXIT_INPUT,
        );
    }

    match verifier.sign(body.as_bytes(), &timestamp) {
        Some(signature) => CommandResult::success_with(
            "sign",
            "signature computed",
            Some(json!({ "timestamp": timestamp, "signature": signature })),
        ),
        None => CommandResult::failure(
            "sign",
            "config_validation",
            "webhook secret could not be used as an hmac key",
            EXIT_CONFIG,
        ),
    }
}
