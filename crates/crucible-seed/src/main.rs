//! CLI entry point for seeding the Crucible knowledge graph.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use crucible_graph::{GraphClient, GraphConfig};
use crucible_seed::dataset::example_dataset;
use crucible_seed::seed::{apply, report};

#[derive(Parser)]
#[command(name = "crucible-seed")]
#[command(about = "Seed the chemistry experiment knowledge graph with example data")]
struct Cli {
    /// Delete all existing nodes and relationships first. Destructive.
    #[arg(long)]
    clear: bool,

    /// Skip the walkthrough queries after seeding.
    #[arg(long)]
    skip_report: bool,

    /// Config file prefix (default: crucible).
    #[arg(short, long, default_value = "crucible")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cli = Cli::parse();
    let graph_config = load_graph_config(&cli.config);
    let client = GraphClient::connect(&graph_config).await?;

    if cli.clear {
        client.clear_database().await?;
    }

    apply(&client, &example_dataset()).await?;

    if !cli.skip_report {
        report(&client).await?;
    }

    client.close();
    Ok(())
}

fn load_graph_config(file_prefix: &str) -> GraphConfig {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("CRUCIBLE")
                .separator("__")
                .try_parsing(true),
        )
        .build();

    match cfg {
        Ok(c) => GraphConfig {
            uri: c
                .get_string("neo4j.uri")
                .unwrap_or_else(|_| "bolt://localhost:7687".to_string()),
            user: c
                .get_string("neo4j.user")
                .unwrap_or_else(|_| "neo4j".to_string()),
            password: c
                .get_string("neo4j.password")
                .unwrap_or_else(|_| "crucible-dev".to_string()),
            ..Default::default()
        },
        Err(_) => GraphConfig::default(),
    }
}
