//! Rows grouped by resolved store, then by data source.
//!
//! Both levels keep insertion order; display and export iterate in that
//! order, and [`crate::sort`] reorders by building a new set.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use storerecon_core::ImportRow;

/// Rows from one data source (file or platform) for one store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRows {
    pub source: String,
    pub rows: Vec<ImportRow>,
}

/// All rows attributed to one store name.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreGroup {
    store_name: String,
    sources: Vec<SourceRows>,
}

impl StoreGroup {
    #[must_use]
    pub fn new(store_name: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
            sources: Vec::new(),
        }
    }

    #[must_use]
    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    #[must_use]
    pub fn sources(&self) -> &[SourceRows] {
        &self.sources
    }

    #[must_use]
    pub fn rows(&self, source: &str) -> Option<&[ImportRow]> {
        self.sources
            .iter()
            .find(|s| s.source == source)
            .map(|s| s.rows.as_slice())
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.sources.iter().map(|s| s.rows.len()).sum()
    }

    fn push(&mut self, source: &str, row: ImportRow) {
        match self.sources.iter_mut().find(|s| s.source == source) {
            Some(existing) => existing.rows.push(row),
            None => self.sources.push(SourceRows {
                source: source.to_string(),
                rows: vec![row],
            }),
        }
    }
}

impl Serialize for StoreGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sources.len()))?;
        for source in &self.sources {
            map.serialize_entry(&source.source, &source.rows)?;
        }
        map.end()
    }
}

/// Store name → data source → rows, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedResultSet {
    groups: Vec<StoreGroup>,
}

impl GroupedResultSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `row` under `store_name` / `source`, creating either level on
    /// first use.
    pub fn push(&mut self, store_name: &str, source: &str, row: ImportRow) {
        let group = match self.groups.iter().position(|g| g.store_name == store_name) {
            Some(idx) => &mut self.groups[idx],
            None => {
                self.groups.push(StoreGroup::new(store_name));
                let last = self.groups.len() - 1;
                &mut self.groups[last]
            }
        };
        group.push(source, row);
    }

    /// Fold `other` into `self`, appending to existing groups and keeping
    /// first-seen order for new ones.
    pub fn merge(&mut self, other: GroupedResultSet) {
        for group in other.groups {
            for source in group.sources {
                for row in source.rows {
                    self.push(&group.store_name, &source.source, row);
                }
            }
        }
    }

    #[must_use]
    pub fn get(&self, store_name: &str) -> Option<&StoreGroup> {
        self.groups.iter().find(|g| g.store_name == store_name)
    }

    pub fn store_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.store_name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoreGroup> {
        self.groups.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.groups.iter().map(StoreGroup::row_count).sum()
    }
}

impl FromIterator<StoreGroup> for GroupedResultSet {
    fn from_iter<I: IntoIterator<Item = StoreGroup>>(iter: I) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}

impl Serialize for GroupedResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.store_name, group)?;
        }
        map.end()
    }
}
