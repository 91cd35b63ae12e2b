use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use courier_providers::{
    config::ProviderConfig, provider_client::ProviderClient, routing_provider::RoutingProvider,
};

use crate::sort::SortArgs;

mod output;
mod parsers;
mod plan;
mod sort;

#[derive(Clone, Copy, ValueEnum)]
enum ProviderKind {
    Tomtom,
    Osrm,
    Crow,
}

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,

    /// Where travel times and routes come from
    #[arg(short, long, value_enum, default_value_t = ProviderKind::Crow)]
    provider: ProviderKind,

    /// Speed used by the crow provider
    #[arg(long, default_value_t = 50.0)]
    speed_kmh: f64,

    /// Timeout for each routing request (e.g., "10s", "PT30S")
    #[arg(short, long, value_parser = parsers::parse_duration)]
    timeout: Option<jiff::SignedDuration>,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan interactively: reads origin/add/refresh/quit commands from stdin
    Plan,
    /// Sort a fixed set of destinations and print the route once
    #[command(visible_alias = "s")]
    Sort {
        #[command(flatten)]
        args: SortArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let mut config = ProviderConfig::from_env()?;
    if let Some(timeout) = cli.timeout {
        config.request_timeout = Some(std::time::Duration::try_from(timeout)?);
    }

    let provider = match cli.provider {
        ProviderKind::Tomtom => RoutingProvider::TomTom,
        ProviderKind::Osrm => RoutingProvider::Osrm {
            url: config.osrm_url().to_string(),
        },
        ProviderKind::Crow => RoutingProvider::AsTheCrowFlies {
            speed_kmh: cli.speed_kmh,
        },
    };

    let client = Arc::new(ProviderClient::new(provider, &config)?);

    match cli.command {
        Commands::Plan => plan::run(client).await?,
        Commands::Sort { args } => sort::run(args, client).await?,
    }

    Ok(())
}
