pub mod config;
pub mod domain;
pub mod errors;
pub mod extraction;

pub use config::{AppConfig, ConfigError, IdempotencyScope, LoadOptions};
pub use domain::record::{NormalizedRecord, UpsertPayload};
pub use domain::webhook::WebhookEvent;
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use extraction::{BriefExtractor, ExtractionError};
