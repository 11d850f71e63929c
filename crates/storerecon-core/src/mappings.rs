use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;
use crate::ConfigError;

/// Maps a merchant name as it appears in an export file to a canonical store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreMapping {
    /// Store or merchant name exactly as exported by the POS platform.
    pub source_store_name: String,
    /// Register/terminal code that disambiguates a generic merchant name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_code: Option<String>,
    /// Sort key of the resolved store. The generic fallback entry carries
    /// its own id and is not a real store.
    pub canonical_store_id: i64,
    pub canonical_store_name: String,
    /// `true` when the source name is an umbrella name shared by several
    /// physical stores and must be disambiguated by terminal code.
    #[serde(default)]
    pub generic: bool,
}

impl StoreMapping {
    #[must_use]
    pub fn new(
        source_store_name: impl Into<String>,
        canonical_store_id: i64,
        canonical_store_name: impl Into<String>,
    ) -> Self {
        Self {
            source_store_name: source_store_name.into(),
            terminal_code: None,
            canonical_store_id,
            canonical_store_name: canonical_store_name.into(),
            generic: false,
        }
    }

    /// Mark this entry as one of the stores behind a generic umbrella name,
    /// selected by `terminal_code`.
    #[must_use]
    pub fn with_terminal(mut self, terminal_code: impl Into<String>) -> Self {
        self.terminal_code = Some(terminal_code.into());
        self.generic = true;
        self
    }

    #[must_use]
    pub fn generic(mut self) -> Self {
        self.generic = true;
        self
    }

    /// Terminal code with surrounding whitespace removed.
    #[must_use]
    pub fn terminal(&self) -> Option<&str> {
        self.terminal_code.as_deref().map(str::trim)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreMappingsFile {
    pub stores: Vec<StoreMapping>,
}

/// Load and validate the store mapping table from a YAML file.
///
/// Entry order in the file is preserved; the row matcher depends on it.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_store_mappings(path: &Path) -> Result<StoreMappingsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::MappingsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let mappings_file: StoreMappingsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::MappingsFileParse)?;

    validate_store_mappings(&mappings_file.stores)?;

    Ok(mappings_file)
}

/// Check the invariants the matcher relies on.
///
/// # Errors
///
/// Returns `ConfigError::Validation` describing the first offending entry.
pub fn validate_store_mappings(stores: &[StoreMapping]) -> Result<(), ConfigError> {
    let mut generic_names = HashSet::new();
    for mapping in stores {
        if normalize(&mapping.source_store_name).is_empty() {
            return Err(ConfigError::Validation(format!(
                "store '{}' (id {}) has an empty source_store_name",
                mapping.canonical_store_name, mapping.canonical_store_id
            )));
        }
        if mapping.canonical_store_name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "mapping for '{}' has an empty canonical_store_name",
                mapping.source_store_name
            )));
        }
        if mapping.terminal().is_some_and(str::is_empty) {
            return Err(ConfigError::Validation(format!(
                "mapping for '{}' has a blank terminal_code",
                mapping.source_store_name
            )));
        }
        if mapping.generic {
            generic_names.insert(normalize(&mapping.source_store_name));
        }
    }

    let mut fallbacks: HashMap<String, &StoreMapping> = HashMap::new();
    let mut terminals = HashSet::new();

    for mapping in stores {
        let name = normalize(&mapping.source_store_name);
        if !generic_names.contains(&name) {
            continue;
        }

        if !mapping.generic {
            return Err(ConfigError::Validation(format!(
                "mapping for '{}' shares the generic name '{name}' but is not marked generic",
                mapping.source_store_name
            )));
        }

        match mapping.terminal() {
            None => {
                if let Some(previous) = fallbacks.insert(name.clone(), mapping) {
                    return Err(ConfigError::Validation(format!(
                        "generic name '{name}' has more than one entry without terminal_code \
                         ('{}' and '{}')",
                        previous.canonical_store_name, mapping.canonical_store_name
                    )));
                }
            }
            Some(terminal) => {
                if !terminals.insert((name.clone(), terminal.to_string())) {
                    return Err(ConfigError::Validation(format!(
                        "generic name '{name}' maps terminal '{terminal}' more than once"
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "mappings_test.rs"]
mod tests;
