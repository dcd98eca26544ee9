//! Seeds the decision ledger table with sample data.
//!
//! Run against DynamoDB Local with:
//! ```
//! cargo run -p seed-data --bin seed
//! ```
//!
//! or against AWS with `--remote --table decision-ledger-dev`.

use anyhow::Context;
use clap::Parser;
use seed_data::builders::ScenarioBuilder;
use seed_data::config::{
    DEFAULT_ENDPOINT, DEFAULT_MAX_ATTEMPTS, DEFAULT_REGION, DEFAULT_TABLE, SeedConfig,
};
use seed_data::db::{DynamoStore, Seeder};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "seed")]
#[command(about = "Seed the Decision Ledger DynamoDB table with sample data")]
struct Cli {
    /// DynamoDB endpoint URL
    #[arg(long, env = "DECISION_LEDGER_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Ignore --endpoint and use AWS with the default credential chain
    #[arg(long)]
    remote: bool,

    /// DynamoDB table name
    #[arg(long, env = "DECISION_LEDGER_TABLE", default_value = DEFAULT_TABLE)]
    table: String,

    /// AWS region
    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    region: String,

    /// Attempts per request before giving up on retryable errors
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,

    /// Derive ids from this seed and only create items that are missing
    #[arg(long)]
    seed: Option<u64>,

    /// Print the items as DynamoDB JSON instead of writing them
    #[arg(long)]
    dry_run: bool,
}

impl From<Cli> for SeedConfig {
    fn from(cli: Cli) -> Self {
        Self {
            endpoint: (!cli.remote).then_some(cli.endpoint),
            table_name: cli.table,
            region: cli.region,
            max_attempts: cli.max_attempts,
            seed: cli.seed,
            dry_run: cli.dry_run,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SeedConfig::from(Cli::parse());
    let builder = ScenarioBuilder::from_config(&config).with_metrics(true);

    if config.dry_run {
        let result = builder.build_data()?;
        println!("{}", serde_json::to_string_pretty(&result.items_json())?);
        return Ok(());
    }

    let store = DynamoStore::connect(&config).await;
    let seeder = Seeder::new(store, &config.table_name).with_write_mode(config.write_mode());

    let result = builder
        .build(&seeder)
        .await
        .with_context(|| format!("Failed to seed table {}", config.table_name))?;

    // Summary output
    tracing::info!("Seed data complete!");
    tracing::info!("  Projects: {}", result.projects.len());
    tracing::info!("  Members: {}", result.members.len());
    tracing::info!("  Decisions: {}", result.decisions.len());
    if result.writes.skipped > 0 {
        tracing::info!("  Already present: {}", result.writes.skipped);
    }
    if let Some(metrics) = &result.metrics {
        tracing::info!("  Took {} ms", metrics.seeding_time_ms);
    }

    Ok(())
}
