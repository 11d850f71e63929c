//! Domain types, reference-data loading, and configuration for the store
//! reconciliation workspace.

pub mod app_config;
pub mod config;
pub mod mappings;
pub mod normalize;
pub mod rows;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use mappings::{load_store_mappings, validate_store_mappings, StoreMapping, StoreMappingsFile};
pub use normalize::normalize;
pub use rows::{CellValue, ImportRow, MatchResult};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read store mappings file {path}: {source}")]
    MappingsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse store mappings file: {0}")]
    MappingsFileParse(#[source] serde_yaml::Error),

    #[error("store mappings validation error: {0}")]
    Validation(String),
}
