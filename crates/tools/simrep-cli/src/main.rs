use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use simrep_reputation::{
    CatalogConfig, CategoryCatalog, CategoryResult, PrometheusReputationMetrics,
    ReputationRegistry,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

mod scenario;

use scenario::{Scenario, ScenarioReport};

/// Command-line interface for the sim reputation engine
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// Path to the catalog configuration file (TOML). Uses the built-in catalog if omitted.
    #[clap(long, short, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the reputation categories in definition order
    Catalog,

    /// Replay a scenario file against a fresh registry
    Run {
        /// Path to the scenario JSON file
        #[clap(long, short)]
        scenario: PathBuf,

        /// Print final records as JSON instead of text
        #[clap(long)]
        json: bool,
    },
}

fn load_config(path: Option<&Path>) -> Result<CatalogConfig> {
    match path {
        Some(path) => CatalogConfig::load(path)
            .with_context(|| format!("Failed to load catalog configuration: {:?}", path)),
        None => Ok(CatalogConfig::default_sims()),
    }
}

fn init_tracing(config: &CatalogConfig) {
    let log_level_str = config.log_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level_str))
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_catalog(catalog: &CategoryCatalog) {
    println!("{}", "Reputation categories".blue().bold());
    for category in catalog {
        println!(
            "  {:<12} max {:>5}  {}",
            category.name().green(),
            category.max_points(),
            category.description()
        );
    }
}

fn print_report(report: &ScenarioReport, registry: &ReputationRegistry) {
    for outcome in &report.outcomes {
        let partial = if outcome.is_clean() { "" } else { "(partial)" };
        println!(
            "{} {} {}",
            outcome.sim.to_string().cyan(),
            outcome.description.bold(),
            partial.yellow()
        );
        for result in &outcome.results {
            match result {
                CategoryResult::Applied(update) => {
                    let marker = if update.clamped() { " clamped" } else { "" };
                    println!(
                        "    {:<12} {:>+5} {:>5} -> {:<5}{}",
                        update.category.to_string(),
                        update.delta,
                        update.previous,
                        update.current,
                        marker.yellow()
                    );
                }
                CategoryResult::Failed { category, error, .. } => {
                    println!("    {:<12} {}", category.to_string(), error.red());
                }
            }
        }
    }

    for (id, error) in &report.rejected {
        println!("{} {}", id.to_string().cyan(), error.to_string().red());
    }

    println!();
    println!("{}", "Final reputation".blue().bold());
    for snapshot in registry.snapshots() {
        println!("  {} {}", snapshot.sim.id.to_string().cyan(), snapshot.sim.name.bold());
        for (category, points) in &snapshot.points {
            println!("    {:<12} {:>5}", category.to_string(), points);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config);

    let catalog = Arc::new(
        CategoryCatalog::from_config(&config).context("Failed to build reputation catalog")?,
    );
    info!("Loaded {} reputation categories", catalog.len());

    match cli.command {
        Commands::Catalog => print_catalog(&catalog),
        Commands::Run { scenario, json } => {
            let scenario = Scenario::load(&scenario)?;
            let mut registry =
                ReputationRegistry::with_metrics_hook(catalog, Arc::new(PrometheusReputationMetrics));
            let report = scenario.run(&mut registry);

            if json {
                let output = serde_json::json!({
                    "outcomes": report.outcomes,
                    "records": registry.snapshots(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_report(&report, &registry);
            }
        }
    }

    Ok(())
}
