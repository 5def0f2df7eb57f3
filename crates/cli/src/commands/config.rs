use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use leadflow_core::config::AppConfig;
use secrecy::ExposeSecret;
use serde::Serialize;
use toml::Value;

use crate::commands::{load_config, CommandResult, EXIT_RUNTIME};

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: &'static str,
    value: String,
    source: String,
}

struct FileSource {
    path: Option<PathBuf>,
    doc: Option<Value>,
}

pub fn run() -> CommandResult {
    let config = match load_config("config") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let path = detect_config_path();
    let file = FileSource { doc: load_config_file_doc(path.as_deref()), path };
    let entries = entries(&config, &file);

    match serde_json::to_value(&entries) {
        Ok(data) => CommandResult::success_with(
            "config",
            "effective config (source precedence: env > file > default)",
            Some(data),
        ),
        Err(error) => CommandResult::failure(
            "config",
            "serialization",
            format!("config could not be rendered: {error}"),
            EXIT_RUNTIME,
        ),
    }
}

fn entries(config: &AppConfig, file: &FileSource) -> Vec<ConfigEntry> {
    let crm = &config.crm;
    let webhook_secret = match &crm.webhook_secret {
        Some(secret) => redact_token(secret.expose_secret()),
        None => "<unset>".to_string(),
    };

    vec![
        entry(
            file,
            "crm.base_url",
            crm.base_url.clone(),
            &["LEADFLOW_CRM_BASE_URL", "API_BASE_URL"],
        ),
        entry(
            file,
            "crm.api_token",
            redact_token(crm.api_token.expose_secret()),
            &["LEADFLOW_CRM_API_TOKEN", "API_TOKEN"],
        ),
        entry(file, "crm.app_id", crm.app_id.clone(), &["LEADFLOW_CRM_APP_ID", "APP_ID"]),
        entry(
            file,
            "crm.webhook_secret",
            webhook_secret,
            &["LEADFLOW_CRM_WEBHOOK_SECRET", "APP_SECRET"],
        ),
        entry(
            file,
            "crm.webhook_max_skew_secs",
            crm.webhook_max_skew_secs.to_string(),
            &["LEADFLOW_CRM_WEBHOOK_MAX_SKEW_SECS"],
        ),
        entry(
            file,
            "crm.timeout_secs",
            crm.timeout_secs.to_string(),
            &["LEADFLOW_CRM_TIMEOUT_SECS"],
        ),
        entry(
            file,
            "crm.idempotency_scope",
            format!("{:?}", crm.idempotency_scope),
            &["LEADFLOW_CRM_IDEMPOTENCY_SCOPE"],
        ),
        entry(
            file,
            "server.bind_address",
            config.server.bind_address.clone(),
            &["LEADFLOW_SERVER_BIND_ADDRESS"],
        ),
        entry(file, "server.port", config.server.port.to_string(), &["LEADFLOW_SERVER_PORT"]),
        entry(
            file,
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            &["LEADFLOW_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        ),
        entry(
            file,
            "logging.level",
            config.logging.level.clone(),
            &["LEADFLOW_LOGGING_LEVEL", "LEADFLOW_LOG_LEVEL"],
        ),
        entry(
            file,
            "logging.format",
            format!("{:?}", config.logging.format),
            &["LEADFLOW_LOGGING_FORMAT", "LEADFLOW_LOG_FORMAT"],
        ),
    ]
}

fn entry(file: &FileSource, key: &'static str, value: String, env_keys: &[&str]) -> ConfigEntry {
    ConfigEntry { key, value, source: field_source(key, env_keys, file) }
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("leadflow.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/leadflow.toml");
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

fn field_source(key_path: &str, env_keys: &[&str], file: &FileSource) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = &file.doc {
        if contains_path(doc, key_path) {
            let file_path = file
                .path
                .as_deref()
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

fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}
