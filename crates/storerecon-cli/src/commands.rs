//! Command handlers, called from `main` once configuration and logging are
//! set up.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use storerecon_core::{load_store_mappings, normalize, AppConfig};
use storerecon_matcher::{MappingTable, Reconciliation};

use crate::{import, report, OutputFormat};

#[derive(Debug)]
pub(crate) struct ReconcileArgs {
    pub mappings: Option<PathBuf>,
    pub source: Option<String>,
    pub format: OutputFormat,
    pub unmatched_label: Option<String>,
    pub files: Vec<PathBuf>,
}

/// Load the mapping table, preferring the CLI path over the configured one.
pub(crate) fn load_table(config: &AppConfig, path: Option<&Path>) -> anyhow::Result<MappingTable> {
    let path = path.unwrap_or(config.mappings_path.as_path());
    let file = load_store_mappings(path)
        .with_context(|| format!("failed to load store mappings from {}", path.display()))?;
    let table = MappingTable::from(file);
    tracing::info!(path = %path.display(), entries = table.len(), "loaded store mappings");
    Ok(table)
}

/// Reconcile every file and write the sorted report to stdout.
///
/// # Errors
///
/// Returns an error if the mappings or any export file fail to load, the
/// unmatched label collides with a canonical store name, or the report
/// cannot be written. Unmatched rows are not errors.
pub(crate) fn run_reconcile(config: &AppConfig, args: &ReconcileArgs) -> anyhow::Result<()> {
    let table = load_table(config, args.mappings.as_deref())?;
    let label = args
        .unmatched_label
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(config.unmatched_label.as_str());
    if table.contains_store_name(label) {
        bail!("unmatched label '{label}' is also a canonical store name; choose another label");
    }

    let mut recon = Reconciliation::new(label);
    for path in &args.files {
        let rows = import::read_rows(path)?;
        let source = args
            .source
            .clone()
            .unwrap_or_else(|| import::source_name(path));
        recon.add_source(&table, &source, rows);
    }
    let recon = recon.sorted(&table);

    let summary = recon.summary();
    tracing::info!(
        files = args.files.len(),
        total = summary.total_rows,
        matched = summary.matched_rows,
        unmatched = summary.unmatched_rows,
        "reconciliation finished"
    );

    let stdout = std::io::stdout().lock();
    match args.format {
        OutputFormat::Json => report::write_json(&recon, stdout),
        OutputFormat::Text => report::write_text(&recon, stdout),
    }
}

pub(crate) fn run_normalize(text: &[String]) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    for t in text {
        writeln!(out, "{}", normalize(t))?;
    }
    Ok(())
}

/// Validate the mappings file and print entry, store, and generic-name counts.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or fails validation.
pub(crate) fn run_mappings_check(config: &AppConfig, path: Option<&Path>) -> anyhow::Result<()> {
    let table = load_table(config, path)?;
    let generic = table.generic_names();

    let mut out = std::io::stdout().lock();
    writeln!(
        out,
        "ok: {} entries, {} resolvable stores, {} generic names",
        table.len(),
        table.resolvable_store_count(),
        generic.len()
    )?;
    for name in generic {
        writeln!(out, "  generic: {name}")?;
    }
    Ok(())
}
