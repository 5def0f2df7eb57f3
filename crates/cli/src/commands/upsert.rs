use leadflow_core::BriefExtractor;
use leadflow_crm::{DeliveryClient, DeliveryError};
use serde_json::json;

use crate::commands::{
    load_config, BriefInput, CommandResult, EXIT_CONFIG, EXIT_DELIVERY, EXIT_INPUT, EXIT_RUNTIME,
};

pub fn run(input: &BriefInput) -> CommandResult {
    let config = match load_config("upsert") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let brief = match input.read("upsert") {
        Ok(brief) => brief,
        Err(result) => return result,
    };

    let extractor = match BriefExtractor::new() {
        Ok(extractor) => extractor,
        Err(error) => {
            return CommandResult::failure(
                "upsert",
                "runtime_init",
                format!("failed to initialize extractor: {error}"),
                EXIT_RUNTIME,
            );
        }
    };

    let record = extractor.parse(&brief);
    if let Err(error) = record.ensure_deliverable() {
        return CommandResult::failure("upsert", "input", error.to_string(), EXIT_INPUT);
    }

    let client = match DeliveryClient::from_config(&config.crm) {
        Ok(client) => client,
        Err(error) => {
            return CommandResult::failure(
                "upsert",
                "runtime_init",
                format!("failed to initialize crm client: {error}"),
                EXIT_RUNTIME,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "upsert",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                EXIT_RUNTIME,
            );
        }
    };

    let outcome = match runtime.block_on(client.upsert_contact(&record)) {
        Ok(outcome) => outcome,
        Err(error @ DeliveryError::InvalidHeader { .. }) => {
            return CommandResult::failure(
                "upsert",
                "config_validation",
                error.to_string(),
                EXIT_CONFIG,
            );
        }
        Err(error) => {
            return CommandResult::failure(
                "upsert",
                "delivery_transport",
                error.to_string(),
                EXIT_DELIVERY,
            );
        }
    };

    let status = outcome.status();
    let data = json!({
        "email": record.contact_email,
        "upstream_status": status.as_u16(),
        "attempts": outcome.attempt_count(),
        "upstream_body": outcome.response.json().ok(),
    });

    if outcome.is_success() {
        CommandResult::success_with(
            "upsert",
            format!("contact upserted with status {}", status.as_u16()),
            Some(data),
        )
    } else {
        CommandResult::failure_with(
            "upsert",
            "delivery_rejected",
            format!(
                "crm answered {} after {} attempt(s)",
                status.as_u16(),
                outcome.attempt_count()
            ),
            EXIT_DELIVERY,
            Some(data),
        )
    }
}
