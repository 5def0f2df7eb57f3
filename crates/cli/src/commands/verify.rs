use chrono::Utc;
use leadflow_core::WebhookEvent;
use leadflow_crm::WebhookVerifier;
use serde_json::json;

use crate::commands::{load_config, CommandResult, EXIT_CONFIG, EXIT_VERIFICATION};

pub fn run(body: &str, timestamp: &str, signature: &str) -> CommandResult {
    let config = match load_config("verify") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let Some(verifier) = WebhookVerifier::from_config(&config.crm) else {
        return CommandResult::failure(
            "verify",
            "config_validation",
            "no webhook secret configured (set LEADFLOW_CRM_WEBHOOK_SECRET or APP_SECRET)",
            EXIT_CONFIG,
        );
    };

    let event = WebhookEvent::new(body, timestamp, signature);
    match verifier.inspect(&event) {
        Ok(()) => {
            // Staleness is reported, never enforced.
            let fresh = verifier.is_fresh(timestamp, Utc::now().timestamp());
            CommandResult::success_with(
                "verify",
                "signature verified",
                Some(json!({
                    "verified": true,
                    "fresh": fresh,
                    "max_skew_secs": verifier.max_skew_secs(),
                })),
            )
        }
        Err(rejection) => CommandResult::failure_with(
            "verify",
            "verification_failed",
            rejection.to_string(),
            EXIT_VERIFICATION,
            Some(json!({ "verified": false })),
        ),
    }
}
