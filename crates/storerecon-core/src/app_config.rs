use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    /// YAML file holding the ordered store mapping table.
    pub mappings_path: PathBuf,
    /// Group name under which rows that resolve to no store are collected.
    pub unmatched_label: String,
}
