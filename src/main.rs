use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use woodland::{AnnualReport, Scenario, ScenarioLoader, Simulation};

#[derive(Debug, Parser)]
#[command(author, version, about = "Simulate a forest ecology with lumberjacks and bears")]
struct Cli {
    /// Scenario YAML file; command-line flags override its values
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Edge length of the (square) forest
    #[arg(short, long)]
    edge: Option<usize>,

    /// How many years to simulate
    #[arg(short, long)]
    years: Option<u64>,

    /// Seed for the random streams
    #[arg(long)]
    seed: Option<u64>,

    /// Print the annual reports as JSON instead of density bars at the end
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut scenario = match &cli.scenario {
        Some(path) => ScenarioLoader::new(".").load(path)?,
        None => Scenario::default(),
    };
    if let Some(edge) = cli.edge {
        scenario.edge = edge;
    }
    if let Some(years) = cli.years {
        scenario.years = years;
    }
    if let Some(seed) = cli.seed {
        scenario.seed = seed;
    }
    scenario.validate()?;

    let mut sim = Simulation::from_scenario(&scenario)
        .with_context(|| format!("Failed to set up scenario '{}'", scenario.name))?;
    print_annual(&sim.annual()?);
    sim.run_with_hook(scenario.years, |summary| {
        for line in summary.activity.log_lines(summary.date) {
            println!("{line}");
        }
        if let Some(report) = &summary.annual {
            print_annual(report);
        }
    })?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(sim.reports())?);
    } else {
        for bar in sim.density_bars() {
            println!("{bar}");
        }
    }
    Ok(())
}

fn print_annual(report: &AnnualReport) {
    println!();
    for line in report.log_lines() {
        println!("{line}");
    }
    println!();
}
