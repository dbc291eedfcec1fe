use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dbterd_core::Config;
use dbterd_engine::GenerateSummary;

/// dbterd - Generate DBML entity-relationship diagrams from dbt artifacts
#[derive(Parser)]
#[command(name = "dbterd")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: dbterd.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert catalog.json and schema.yml into a DBML file
    Generate {
        /// Path to dbt catalog.json
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Path to the schema.yml with model descriptions and tests
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Output DBML file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a dbterd.toml with the default settings
    InitConfig {
        /// Where to write the config
        #[arg(long, default_value = "dbterd.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    // Load config if specified
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new("dbterd.toml").exists() {
        Config::from_file(Path::new("dbterd.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    tracing::debug!(?config, "resolved configuration");

    match cli.command {
        Commands::Generate { catalog, schema, output } => {
            generate_command(&config, catalog, schema, output, cli.verbose)
        }
        Commands::InitConfig { path, force } => init_config_command(&path, force),
    }
}

/// Generate command - write the DBML file
fn generate_command(
    config: &Config,
    catalog: Option<PathBuf>,
    schema: Option<PathBuf>,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    // Flags win over the config file; config paths are relative to its directory
    let catalog = catalog.unwrap_or_else(|| config.resolve(&config.catalog));
    let schema = schema.unwrap_or_else(|| config.resolve(&config.schema));
    let output = output.unwrap_or_else(|| config.resolve(&config.output));

    if verbose {
        eprintln!("{} {}", "Loading catalog from:".cyan(), catalog.display());
        eprintln!("{} {}", "Loading schema from:".cyan(), schema.display());
    }

    let summary = dbterd_engine::generate(&catalog, &schema, &output, &config.type_map())
        .map_err(|e| anyhow::anyhow!("Failed to generate DBML: {}", e))?;

    print_summary(&summary, &output);

    Ok(())
}

/// Init-config command - write default settings
fn init_config_command(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(anyhow::anyhow!(
            "{} already exists. Pass --force to overwrite it.",
            path.display()
        ));
    }

    Config::default().save_to_file(path)?;
    println!("{} {}", "Config written to:".green(), path.display());

    Ok(())
}

fn print_summary(summary: &GenerateSummary, output: &Path) {
    println!("{} {}", "✓ DBML written to".green(), output.display().to_string().bold());
    println!("  Tables:        {}", summary.tables);
    println!("  Relationships: {}", summary.relationships);

    if summary.skipped_nodes > 0 {
        println!(
            "  Skipped:       {} {}",
            summary.skipped_nodes.to_string().yellow(),
            "catalog nodes with no schema model".dimmed()
        );
    }
}
