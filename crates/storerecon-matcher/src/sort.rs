//! Orders grouped results by canonical store id.

use crate::grouping::GroupedResultSet;
use crate::table::MappingTable;

/// Sort key for group names that no mapping knows about.
pub const UNMAPPED_SORT_KEY: i64 = i64::MAX;

/// Return a copy of `groups` ordered by each store name's canonical id.
///
/// Names absent from the table sort last. The sort is stable, so unmapped
/// names (and names sharing an id) keep their relative input order. The
/// input is left untouched.
#[must_use]
pub fn sort_groups_by_store_id(groups: &GroupedResultSet, table: &MappingTable) -> GroupedResultSet {
    let ids = table.store_ids();

    let mut keyed: Vec<_> = groups
        .iter()
        .map(|group| {
            let id = ids
                .get(group.store_name())
                .copied()
                .unwrap_or(UNMAPPED_SORT_KEY);
            (id, group)
        })
        .collect();
    keyed.sort_by_key(|(id, _)| *id);

    keyed.into_iter().map(|(_, group)| group.clone()).collect()
}
