//! Webhook gateway that turns signed GitHub deliveries into persisted LogLines.
pub mod logline_store;
pub mod webhook_server;

pub use logline_store::*;
pub use webhook_server::*;
