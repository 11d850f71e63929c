//! Ordered, read-only store mapping table.

use std::collections::{BTreeSet, HashMap, HashSet};

use storerecon_core::{normalize, StoreMapping, StoreMappingsFile};

/// A [`StoreMapping`] with its source name normalized once at load time.
#[derive(Debug, Clone)]
pub struct MappingEntry {
    pub mapping: StoreMapping,
    pub normalized_name: String,
    /// Set when any entry with the same normalized name is flagged generic,
    /// so every entry under an umbrella name needs a terminal to resolve.
    pub generic: bool,
}

/// Mapping table for one reconciliation session.
///
/// Entries keep their load order, which decides ties in the row matcher.
/// The table is immutable after construction and can be shared across
/// threads reconciling different files.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
}

impl MappingTable {
    #[must_use]
    pub fn new(mappings: Vec<StoreMapping>) -> Self {
        let named: Vec<(String, StoreMapping)> = mappings
            .into_iter()
            .map(|mapping| (normalize(&mapping.source_store_name), mapping))
            .collect();
        let generic: HashSet<&str> = named
            .iter()
            .filter(|(_, mapping)| mapping.generic)
            .map(|(name, _)| name.as_str())
            .collect();
        let flags: Vec<bool> = named
            .iter()
            .map(|(name, _)| generic.contains(name.as_str()))
            .collect();

        let entries = named
            .into_iter()
            .zip(flags)
            .map(|((normalized_name, mapping), generic)| MappingEntry {
                mapping,
                normalized_name,
                generic,
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn mappings(&self) -> impl Iterator<Item = &StoreMapping> {
        self.entries.iter().map(|e| &e.mapping)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical store name to id. A name listed more than once keeps the
    /// id of its last entry.
    #[must_use]
    pub fn store_ids(&self) -> HashMap<&str, i64> {
        self.mappings()
            .map(|m| (m.canonical_store_name.as_str(), m.canonical_store_id))
            .collect()
    }

    /// Normalized umbrella names that require a terminal code.
    #[must_use]
    pub fn generic_names(&self) -> BTreeSet<&str> {
        self.entries
            .iter()
            .filter(|e| e.generic)
            .map(|e| e.normalized_name.as_str())
            .collect()
    }

    /// `true` when some entry maps to the canonical store `name`.
    #[must_use]
    pub fn contains_store_name(&self, name: &str) -> bool {
        self.mappings().any(|m| m.canonical_store_name == name)
    }

    /// Number of distinct canonical stores a row can resolve to. Generic
    /// fallback entries (no terminal) never resolve and are not counted.
    #[must_use]
    pub fn resolvable_store_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| !e.generic || e.mapping.terminal().is_some())
            .map(|e| e.mapping.canonical_store_id)
            .collect::<BTreeSet<_>>()
            .len()
    }
}

impl From<StoreMappingsFile> for MappingTable {
    fn from(file: StoreMappingsFile) -> Self {
        Self::new(file.stores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> MappingTable {
        MappingTable::new(vec![
            StoreMapping::new("ARMENIA 14", 14, "Armenia"),
            StoreMapping::new("NARANKA SAS", 101, "Naranka Centro").with_terminal("12345"),
            StoreMapping::new("Naranka S.A.S", 900, "Naranka (genérico)").generic(),
            StoreMapping::new("Armenia Norte", 15, "Armenia"),
        ])
    }

    #[test]
    fn precomputes_normalized_names_in_order() {
        let t = table();
        let names: Vec<&str> = t
            .entries()
            .iter()
            .map(|e| e.normalized_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["armenia 14", "naranka sas", "naranka s a s", "armenia norte"]
        );
    }

    #[test]
    fn store_ids_last_write_wins() {
        let t = table();
        let ids = t.store_ids();
        assert_eq!(ids.get("Armenia"), Some(&15));
        assert_eq!(ids.get("Naranka Centro"), Some(&101));
        assert_eq!(ids.get("Unknown"), None);
    }

    #[test]
    fn generic_names_are_normalized_and_deduplicated() {
        let t = table();
        let names: Vec<&str> = t.generic_names().into_iter().collect();
        assert_eq!(names, vec!["naranka s a s", "naranka sas"]);
    }

    #[test]
    fn generic_flag_spreads_to_every_entry_with_the_same_name() {
        let t = MappingTable::new(vec![
            StoreMapping::new("NARANKA SAS", 101, "Naranka Centro").with_terminal("12345"),
            StoreMapping::new("Naranka SAS", 900, "Naranka (genérico)"),
            StoreMapping::new("ARMENIA 14", 14, "Armenia"),
        ]);
        let flags: Vec<bool> = t.entries().iter().map(|e| e.generic).collect();
        assert_eq!(flags, vec![true, true, false]);
        assert_eq!(t.resolvable_store_count(), 2);
    }

    #[test]
    fn contains_store_name_is_exact() {
        let t = table();
        assert!(t.contains_store_name("Armenia"));
        assert!(!t.contains_store_name("armenia"));
        assert!(!t.contains_store_name("Sin tienda"));
    }

    #[test]
    fn resolvable_store_count_skips_generic_fallback() {
        assert_eq!(table().resolvable_store_count(), 3);
    }

    #[test]
    fn from_mappings_file() {
        let file = StoreMappingsFile {
            stores: vec![StoreMapping::new("Centro", 1, "Centro")],
        };
        let t = MappingTable::from(file);
        assert_eq!(t.len(), 1);
        assert!(!t.is_empty());
    }
}
