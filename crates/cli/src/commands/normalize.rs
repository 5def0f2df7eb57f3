use leadflow_core::BriefExtractor;

use crate::commands::{BriefInput, CommandResult, EXIT_RUNTIME};

pub fn run(input: &BriefInput) -> CommandResult {
    let brief = match input.read("normalize") {
        Ok(brief) => brief,
        Err(result) => return result,
    };

    let extractor = match BriefExtractor::new() {
        Ok(extractor) => extractor,
        Err(error) => {
            return CommandResult::failure(
                "normalize",
                "runtime_init",
                format!("failed to initialize extractor: {error}"),
                EXIT_RUNTIME,
            );
        }
    };

    let record = extractor.parse(&brief);
    let message = if record.has_contact() {
        format!("normalized brief for {}", record.contact_email)
    } else {
        "normalized brief without a contact email".to_string()
    };

    match serde_json::to_value(&record) {
        Ok(data) => CommandResult::success_with("normalize", message, Some(data)),
        Err(error) => CommandResult::failure(
            "normalize",
            "serialization",
            format!("record could not be serialized: {error}"),
            EXIT_RUNTIME,
        ),
    }
}
