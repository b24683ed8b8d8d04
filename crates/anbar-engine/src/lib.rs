pub mod adapter;
pub mod audit;
pub mod config;
pub mod error;
pub mod service;

pub use adapter::StoreGrantReader;
pub use config::{AccessConfig, AppConfig, ConfigError, DatabaseConfig, LogConfig, LogFormat};
pub use error::EngineError;
pub use service::{AccessEngine, GrantOutcome};
