//! Configuration types

pub mod cli;
pub mod collector_config;
pub mod tls_config;

pub use cli::CliArgs;
pub use collector_config::CollectorConfig;
pub use tls_config::TlsConfig;
