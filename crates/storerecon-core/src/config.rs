use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_MAPPINGS_PATH: &str = "./config/store_mappings.yaml";
pub const DEFAULT_UNMATCHED_LABEL: &str = "Sin tienda";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function,
/// so tests can feed a plain `HashMap` instead of mutating the process env.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let env = parse_environment(&or_default("STORERECON_ENV", "development"))?;
    let log_level = or_default("STORERECON_LOG_LEVEL", "info");
    let mappings_path = PathBuf::from(or_default(
        "STORERECON_MAPPINGS_PATH",
        DEFAULT_MAPPINGS_PATH,
    ));

    let unmatched_label = or_default("STORERECON_UNMATCHED_LABEL", DEFAULT_UNMATCHED_LABEL)
        .trim()
        .to_string();
    if unmatched_label.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "STORERECON_UNMATCHED_LABEL".to_string(),
            reason: "must not be blank".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        mappings_path,
        unmatched_label,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STORERECON_ENV".to_string(),
            reason: format!("expected development, test or production, got '{other}'"),
        }),
    }
}
