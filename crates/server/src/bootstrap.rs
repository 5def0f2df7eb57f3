use std::sync::Arc;

use leadflow_core::config::{AppConfig, ConfigError, LoadOptions};
use leadflow_core::{BriefExtractor, ExtractionError};
use leadflow_crm::{DeliveryClient, DeliveryError, WebhookVerifier};
use thiserror::Error;
use tracing::{info, warn};

use crate::api::AppState;

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("brief extractor could not be initialized: {0}")]
    Extractor(#[from] ExtractionError),
    #[error("crm delivery client could not be initialized: {0}")]
    Delivery(#[from] DeliveryError),
}

/// Loads and validates configuration. Runs before logging is initialized.
pub fn load_config(options: LoadOptions) -> Result<AppConfig, BootstrapError> {
    Ok(AppConfig::load(options)?)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    let extractor = BriefExtractor::new()?;
    let delivery = DeliveryClient::from_config(&config.crm)?;
    info!(
        event_name = "system.bootstrap.crm_client_ready",
        correlation_id = "bootstrap",
        base_url = %config.crm.base_url,
        idempotency_scope = ?config.crm.idempotency_scope,
        timeout_secs = config.crm.timeout_secs,
        "crm delivery client initialized"
    );

    let webhooks = WebhookVerifier::from_config(&config.crm);
    if webhooks.is_none() {
        warn!(
            event_name = "system.bootstrap.webhook_secret_missing",
            correlation_id = "bootstrap",
            "no webhook secret configured; inbound webhooks will be refused"
        );
    }

    let state = AppState {
        extractor: Arc::new(extractor),
        delivery: Arc::new(delivery),
        webhooks: webhooks.map(Arc::new),
    };

    Ok(Application { config, state })
}
