pub mod record;
pub mod webhook;
