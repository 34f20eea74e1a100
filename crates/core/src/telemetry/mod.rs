//! Logging setup shared by the client library consumers and the CLI

pub mod config;
pub mod init;

pub use config::InstrumentationConfig;
pub use init::{init_default, init_tracing};
