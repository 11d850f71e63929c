//! Store reconciliation engine.
//!
//! Pure and synchronous: takes an ordered mapping table and import rows,
//! returns rows grouped by resolved store. No file or network IO.

pub mod grouping;
pub mod matcher;
pub mod reconcile;
pub mod sort;
pub mod table;

pub use grouping::{GroupedResultSet, SourceRows, StoreGroup};
pub use matcher::{match_row, MIN_CANDIDATE_CHARS};
pub use reconcile::{reconcile, ReconReport, ReconSummary, Reconciliation, UnmatchedRow};
pub use sort::{sort_groups_by_store_id, UNMAPPED_SORT_KEY};
pub use storerecon_core::normalize;
pub use table::{MappingEntry, MappingTable};
