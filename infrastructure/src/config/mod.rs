//! Configuration loading
//!
//! Raw TOML structures ([`FileConfig`]) and the multi-source loader
//! ([`ConfigLoader`]).

mod file_config;
mod loader;

pub use file_config::{
    ConfigError, FileBehaviorConfig, FileConfig, FileCouncilConfig, FileModelSpec,
    FileProviderConfig, FileProvidersConfig,
};
pub use loader::ConfigLoader;
