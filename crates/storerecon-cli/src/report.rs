//! Output formats for a finished reconciliation.

use std::io::Write;

use storerecon_matcher::Reconciliation;

/// Full report as pretty JSON: summary, ordered groups, unmatched rows.
pub(crate) fn write_json<W: Write>(recon: &Reconciliation, mut out: W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut out, &recon.report())?;
    writeln!(out)?;
    Ok(())
}

/// Human-readable overview: row counts per store and source, then every
/// unmatched row with its position.
pub(crate) fn write_text<W: Write>(recon: &Reconciliation, mut out: W) -> anyhow::Result<()> {
    let summary = recon.summary();
    writeln!(
        out,
        "{} rows: {} matched to {} stores, {} unmatched",
        summary.total_rows, summary.matched_rows, summary.stores, summary.unmatched_rows
    )?;

    for group in recon.groups().iter() {
        writeln!(out)?;
        writeln!(out, "{} ({} rows)", group.store_name(), group.row_count())?;
        for source in group.sources() {
            writeln!(out, "  {:<24} {:>6}", source.source, source.rows.len())?;
        }
    }

    if !recon.unmatched().is_empty() {
        writeln!(out)?;
        writeln!(out, "Unmatched rows:")?;
        for unmatched in recon.unmatched() {
            let cells: Vec<String> = unmatched
                .row
                .iter()
                .map(|(column, value)| format!("{column}={}", value.as_text()))
                .collect();
            writeln!(
                out,
                "  {}#{}: {}",
                unmatched.source,
                unmatched.row_number,
                cells.join(", ")
            )?;
        }
    }

    Ok(())
}
