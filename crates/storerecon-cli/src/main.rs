mod commands;
mod import;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storerecon")]
#[command(about = "Reconcile POS export rows against the canonical store table")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Match every row of one or more export files and print them grouped by store
    Reconcile {
        /// Store mappings YAML file (defaults to `STORERECON_MAPPINGS_PATH`)
        #[arg(long)]
        mappings: Option<PathBuf>,
        /// Data-source name for all files (defaults to each file's stem)
        #[arg(long)]
        source: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Group name for rows that resolve to no store
        #[arg(long)]
        unmatched_label: Option<String>,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the normalized form of each argument
    Normalize {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Inspect the store mappings file
    Mappings {
        #[command(subcommand)]
        command: MappingsCommands,
    },
}

#[derive(Debug, Subcommand)]
enum MappingsCommands {
    /// Load and validate the mappings file, then print a summary
    Check {
        #[arg(long)]
        mappings: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = storerecon_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, "configuration loaded");

    match cli.command {
        Commands::Reconcile {
            mappings,
            source,
            format,
            unmatched_label,
            files,
        } => commands::run_reconcile(
            &config,
            &commands::ReconcileArgs {
                mappings,
                source,
                format,
                unmatched_label,
                files,
            },
        ),
        Commands::Normalize { text } => commands::run_normalize(&text),
        Commands::Mappings {
            command: MappingsCommands::Check { mappings },
        } => commands::run_mappings_check(&config, mappings.as_deref()),
    }
}
