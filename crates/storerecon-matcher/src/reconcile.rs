//! One reconciliation pass: match every row of a data source and group it.

use serde::Serialize;
use storerecon_core::ImportRow;

use crate::grouping::GroupedResultSet;
use crate::matcher::match_row;
use crate::sort::sort_groups_by_store_id;
use crate::table::MappingTable;

/// A row no mapping resolved, kept for operator review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnmatchedRow {
    pub source: String,
    /// 1-based position of the row within its source.
    pub row_number: usize,
    pub row: ImportRow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub total_rows: usize,
    pub matched_rows: usize,
    pub unmatched_rows: usize,
    /// Distinct resolved stores; the unmatched group is not counted.
    pub stores: usize,
}

/// Accumulated result of one or more passes.
///
/// Unmatched rows appear twice: under the unmatched label in `groups` (so
/// totals per source stay complete) and in `unmatched` for review.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    unmatched_label: String,
    groups: GroupedResultSet,
    unmatched: Vec<UnmatchedRow>,
    matched_rows: usize,
}

impl Reconciliation {
    #[must_use]
    pub fn new(unmatched_label: impl Into<String>) -> Self {
        Self {
            unmatched_label: unmatched_label.into(),
            groups: GroupedResultSet::new(),
            unmatched: Vec::new(),
            matched_rows: 0,
        }
    }

    #[must_use]
    pub fn unmatched_label(&self) -> &str {
        &self.unmatched_label
    }

    #[must_use]
    pub fn groups(&self) -> &GroupedResultSet {
        &self.groups
    }

    #[must_use]
    pub fn unmatched(&self) -> &[UnmatchedRow] {
        &self.unmatched
    }

    /// Match and group each row of `source`, in order.
    pub fn add_source<I>(&mut self, table: &MappingTable, source: &str, rows: I)
    where
        I: IntoIterator<Item = ImportRow>,
    {
        let mut matched = 0usize;
        let mut unmatched = 0usize;

        for (idx, row) in rows.into_iter().enumerate() {
            let result = match_row(&row, table);
            if let Some(store_name) = result.resolved_store_name {
                self.groups.push(&store_name, source, row);
                matched += 1;
            } else {
                let row_number = idx + 1;
                tracing::debug!(source, row_number, "row did not resolve to a store");
                self.groups.push(&self.unmatched_label, source, row.clone());
                self.unmatched.push(UnmatchedRow {
                    source: source.to_string(),
                    row_number,
                    row,
                });
                unmatched += 1;
            }
        }

        self.matched_rows += matched;
        tracing::info!(source, matched, unmatched, "reconciled source");
    }

    /// Fold another pass into this one. Groups are appended in first-seen
    /// order; call [`Reconciliation::sorted`] afterwards for display order.
    pub fn absorb(&mut self, other: Reconciliation) {
        self.matched_rows += other.matched_rows;
        self.unmatched.extend(other.unmatched);
        if other.unmatched_label == self.unmatched_label {
            self.groups.merge(other.groups);
        } else {
            for group in other.groups.iter() {
                let name = if group.store_name() == other.unmatched_label {
                    self.unmatched_label.as_str()
                } else {
                    group.store_name()
                };
                for source in group.sources() {
                    for row in &source.rows {
                        self.groups.push(name, &source.source, row.clone());
                    }
                }
            }
        }
    }

    /// Reorder groups by canonical store id; the unmatched group, having no
    /// id, ends up last.
    #[must_use]
    pub fn sorted(mut self, table: &MappingTable) -> Self {
        self.groups = sort_groups_by_store_id(&self.groups, table);
        self
    }

    #[must_use]
    pub fn summary(&self) -> ReconSummary {
        let has_unmatched_group = self.groups.get(&self.unmatched_label).is_some();
        ReconSummary {
            total_rows: self.matched_rows + self.unmatched.len(),
            matched_rows: self.matched_rows,
            unmatched_rows: self.unmatched.len(),
            stores: self.groups.len() - usize::from(has_unmatched_group),
        }
    }

    #[must_use]
    pub fn report(&self) -> ReconReport<'_> {
        ReconReport {
            summary: self.summary(),
            groups: &self.groups,
            unmatched: &self.unmatched,
        }
    }
}

/// Serializable view of a [`Reconciliation`].
#[derive(Debug, Serialize)]
pub struct ReconReport<'a> {
    pub summary: ReconSummary,
    pub groups: &'a GroupedResultSet,
    pub unmatched: &'a [UnmatchedRow],
}

/// Run a single pass over `rows` from `source` and return it sorted by
/// store id.
#[must_use]
pub fn reconcile<I>(
    table: &MappingTable,
    source: &str,
    rows: I,
    unmatched_label: &str,
) -> Reconciliation
where
    I: IntoIterator<Item = ImportRow>,
{
    let mut recon = Reconciliation::new(unmatched_label);
    recon.add_source(table, source, rows);
    recon.sorted(table)
}

#[cfg(test)]
mod tests {
    use storerecon_core::StoreMapping;

    use super::*;

    fn table() -> MappingTable {
        MappingTable::new(vec![
            StoreMapping::new("ARMENIA 14", 14, "Armenia"),
            StoreMapping::new("NARANKA SAS", 101, "Naranka Centro").with_terminal("12345"),
            StoreMapping::new("NARANKA SAS", 900, "Naranka (genérico)").generic(),
        ])
    }

    fn rows() -> Vec<ImportRow> {
        vec![
            ImportRow::new().with("comercio", "NARANKA SAS").with("term", "12345"),
            ImportRow::new().with("comercio", "NARANKA SAS").with("term", "00000"),
            ImportRow::new().with("comercio", "Armenia 14").with("term", ""),
        ]
    }

    #[test]
    fn reconcile_groups_sorts_and_collects_unmatched() {
        let recon = reconcile(&table(), "datafono", rows(), "Sin tienda");

        let names: Vec<&str> = recon.groups().store_names().collect();
        assert_eq!(names, vec!["Armenia", "Naranka Centro", "Sin tienda"]);

        assert_eq!(recon.unmatched().len(), 1);
        assert_eq!(recon.unmatched()[0].row_number, 2);
        assert_eq!(recon.unmatched()[0].source, "datafono");

        assert_eq!(
            recon.summary(),
            ReconSummary {
                total_rows: 3,
                matched_rows: 2,
                unmatched_rows: 1,
                stores: 2,
            }
        );
    }

    #[test]
    fn absorb_combines_sources() {
        let t = table();
        let mut combined = Reconciliation::new("Sin tienda");
        combined.add_source(&t, "datafono", rows());

        let mut other = Reconciliation::new("Sin tienda");
        other.add_source(
            &t,
            "rappi",
            vec![ImportRow::new().with("local", "ARMENIA 14")],
        );
        combined.absorb(other);
        let combined = combined.sorted(&t);

        let armenia = combined.groups().get("Armenia").unwrap();
        assert_eq!(armenia.rows("datafono").unwrap().len(), 1);
        assert_eq!(armenia.rows("rappi").unwrap().len(), 1);
        assert_eq!(combined.summary().total_rows, 4);
    }

    #[test]
    fn absorb_relabels_unmatched_group() {
        let t = table();
        let mut combined = Reconciliation::new("Sin tienda");
        let mut other = Reconciliation::new("Unmapped");
        other.add_source(&t, "rappi", vec![ImportRow::new().with("local", "Otra")]);
        combined.absorb(other);

        assert!(combined.groups().get("Unmapped").is_none());
        assert_eq!(combined.groups().get("Sin tienda").unwrap().row_count(), 1);
        assert_eq!(combined.summary().stores, 0);
    }

    #[test]
    fn report_serializes_summary_groups_and_unmatched() {
        let recon = reconcile(&table(), "datafono", rows(), "Sin tienda");
        let value = serde_json::to_value(recon.report()).unwrap();
        assert_eq!(value["summary"]["matched_rows"], 2);
        assert_eq!(value["unmatched"][0]["row_number"], 2);
        assert_eq!(
            value["groups"]["Armenia"]["datafono"][0]["comercio"],
            "Armenia 14"
        );
    }

    #[test]
    fn empty_pass_has_empty_summary() {
        let recon = reconcile(&table(), "datafono", Vec::new(), "Sin tienda");
        assert!(recon.groups().is_empty());
        assert_eq!(recon.summary().total_rows, 0);
        assert_eq!(recon.summary().stores, 0);
    }
}
