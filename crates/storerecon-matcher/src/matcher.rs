//! Resolves the canonical store an import row belongs to.
//!
//! Rows come from heterogeneous POS exports, so the column holding the
//! merchant name is not known up front. Every cell is a candidate: cells are
//! scanned in column order, and for each one the mapping table is scanned in
//! load order. The first accepted (cell, mapping) pair wins.
//!
//! Matching is whole-string equality on normalized text. A specific name
//! that merely contains an umbrella brand (`"Kan Can Jeans Colombia -
//! Naranka"`) is its own mapping and resolves without a terminal check.
//!
//! Entries under a generic name resolve only when another cell of the same
//! row carries the entry's terminal code. The terminal-less generic fallback never
//! resolves: no store is better than a wrong specific one.

use storerecon_core::{normalize, ImportRow, MatchResult, StoreMapping};

use crate::table::MappingTable;

/// Cells shorter than this (after trimming, in characters) are noise.
pub const MIN_CANDIDATE_CHARS: usize = 2;

/// Find the canonical store for `row`.
///
/// Never fails: a row that matches nothing yields
/// [`MatchResult::unresolved`].
#[must_use]
pub fn match_row(row: &ImportRow, table: &MappingTable) -> MatchResult {
    for (idx, (column, cell)) in row.iter().enumerate() {
        let text = cell.as_text();
        let candidate = text.trim();
        if candidate.chars().count() < MIN_CANDIDATE_CHARS {
            continue;
        }
        let needle = normalize(candidate);

        for entry in table.entries() {
            if entry.normalized_name != needle {
                continue;
            }
            if entry.generic && !terminal_present(row, idx, &entry.mapping) {
                continue;
            }

            tracing::trace!(
                column,
                store_id = entry.mapping.canonical_store_id,
                store = %entry.mapping.canonical_store_name,
                "row resolved"
            );
            return MatchResult::resolved(
                entry.mapping.canonical_store_id,
                entry.mapping.canonical_store_name.clone(),
            );
        }
    }

    MatchResult::unresolved()
}

/// `true` when some cell other than `name_idx` equals the mapping's
/// terminal code. A mapping without a terminal code never qualifies.
fn terminal_present(row: &ImportRow, name_idx: usize, mapping: &StoreMapping) -> bool {
    let Some(terminal) = mapping.terminal() else {
        return false;
    };
    row.values()
        .enumerate()
        .filter(|(idx, _)| *idx != name_idx)
        .any(|(_, cell)| cell.as_text().trim() == terminal)
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod tests;
