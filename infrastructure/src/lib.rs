//! Infrastructure layer for llm-council
//!
//! External adapters: HTTP gateways to each LLM provider, TOML
//! configuration loading, and the file-backed conversation store.

pub mod config;
pub mod providers;
pub mod storage;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, FileConfig};
pub use providers::{HttpLlmGateway, ProviderRegistry, ProviderSettings};
pub use storage::JsonFileStore;
