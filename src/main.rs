use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use jobsweep::{config::Config, report::Summary, runner::Runner, sites};

#[derive(Parser)]
#[command(name = "jobsweep")]
#[command(about = "Scrape staffing-agency job listings into CSV files")]
struct Cli {
    /// Sites to run, in order. Runs every site when omitted.
    sites: Vec<String>,

    /// List the known sites and exit
    #[arg(long)]
    list: bool,

    /// Directory for the per-site CSV files (overrides OUTPUT_DIR)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Number of sites processed at once (overrides SCRAPE_CONCURRENCY)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Print the summary as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Rule sets are validated before anything is fetched
    let selected = if cli.sites.is_empty() {
        sites::all().context("invalid site configuration")?
    } else {
        let mut selected = Vec::with_capacity(cli.sites.len());
        for key in &cli.sites {
            match sites::find(key).context("invalid site configuration")? {
                Some(site) => selected.push(site),
                None => bail!(
                    "unknown site '{}' (known: {})",
                    key,
                    sites::keys().join(", ")
                ),
            }
        }
        selected
    };

    if cli.list {
        for site in &selected {
            println!("{:<15} {}", site.key(), site.listing_url());
        }
        return Ok(());
    }

    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(output_dir) = cli.output_dir {
        config = config.with_output_dir(output_dir);
    }
    if let Some(concurrency) = cli.concurrency {
        config = config.with_concurrency(concurrency);
    }

    println!("JOB SCRAPER MASTER RUNNER");
    println!("{}", "=".repeat(60));
    println!("Started at: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

    let runner = Runner::new(&config).context("failed to build reader client")?;
    let outcomes = runner.run_all(selected).await;

    for outcome in &outcomes {
        if outcome.sample.is_empty() {
            continue;
        }
        println!("\n{} ({} jobs)", outcome.site, outcome.jobs);
        for (i, record) in outcome.sample.iter().enumerate() {
            println!("{}. {} - {}", i + 1, record.title, record.link);
        }
    }

    let summary = Summary::new(outcomes);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("\n{summary}");
        println!("Completed at: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    }

    Ok(())
}
