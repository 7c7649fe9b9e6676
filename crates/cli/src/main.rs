//! Command-line entry point for the trip finder: runs a single-campground
//! search and prints the result as JSON.

use anyhow::Result;
use clap::Parser;

use providers::ProviderKind;
use trip_search::search;

/// Search a campground for bookable weekday-anchored stays
#[derive(Parser, Debug)]
#[command(name = "trip-find", version, about)]
struct Cli {
    /// Reservation provider ("recgov" or "reservecalifornia")
    #[arg(long)]
    api: ProviderTag,

    /// Campground id, as used by the provider
    #[arg(long)]
    campground: String,

    /// Weekday the stay must begin on (1 = Monday .. 7 = Sunday)
    #[arg(long)]
    weekday: u8,

    /// Number of consecutive available nights required
    #[arg(long)]
    nights: u32,

    /// Number of months of calendar to check
    #[arg(long, default_value_t = 1)]
    months: u32,
}

/// clap-friendly wrapper so provider parse errors surface at argument time
#[derive(Debug, Clone)]
struct ProviderTag(ProviderKind);

impl std::str::FromStr for ProviderTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<ProviderKind>()
            .map(ProviderTag)
            .map_err(|e| e.to_string())
    }
}

async fn run(cli: Cli) -> Result<()> {
    let source = cli.api.0.source()?;
    let result = search(
        source.as_ref(),
        &cli.campground,
        cli.weekday,
        cli.nights,
        cli.months,
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
