use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use investor_iq::analysis::DealAnalysisInput;
use investor_iq::filter::filter_properties;
use investor_iq::models::Property;
use investor_iq::store::{MemoryAuth, MemoryStorage, MemoryStore};
use investor_iq::{Config, Marketplace};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "investor-iq", version, about = "Real-estate deal analysis and listing search")]
struct Cli {
    /// ROI endpoint to analyze deals with; analyzed locally when unset
    #[arg(long, env = "INVESTORIQ_ROI_ENDPOINT", global = true)]
    roi_endpoint: Option<String>,

    /// Timeout for ROI endpoint calls, in seconds
    #[arg(long, env = "INVESTORIQ_REQUEST_TIMEOUT_SECS", default_value_t = 30, global = true)]
    timeout_secs: u64,

    /// Comma-separated emails provisioned as admins
    #[arg(long, env = "INVESTORIQ_ADMIN_EMAILS", value_delimiter = ',', global = true)]
    admin_emails: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute total investment, profit and ROI for a deal
    Analyze {
        #[arg(long)]
        purchase_price: f64,
        #[arg(long, default_value_t = 0.0)]
        rehab_cost: f64,
        #[arg(long, default_value_t = 0.0)]
        arv: f64,
        #[arg(long, default_value_t = 0.0)]
        holding_costs: f64,
    },
    /// Search a JSON file of listings by title, address or deal type
    Search {
        #[arg(long)]
        file: PathBuf,
        #[arg(long, default_value = "")]
        query: String,
        /// Write the matches to this file as JSON
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::default()
        .with_roi_endpoint(cli.roi_endpoint.as_deref())
        .with_admin_emails(cli.admin_emails)
        .with_request_timeout(Duration::from_secs(cli.timeout_secs));

    match cli.command {
        Command::Analyze {
            purchase_price,
            rehab_cost,
            arv,
            holding_costs,
        } => {
            let market = Marketplace::new(
                &config,
                Arc::new(MemoryStore::new()),
                Arc::new(MemoryStorage::new("http://localhost/storage")),
                Arc::new(MemoryAuth::new()),
            )
            .context("Failed to set up deal analyzer")?;

            let input = DealAnalysisInput::new(purchase_price, rehab_cost, arv, holding_costs);
            info!("Analyzing deal with the {} engine", market.analyzer_name());

            let metrics = market
                .analyze_deal(&input)
                .await
                .context("Failed to calculate ROI")?;
            println!("{}", metrics);
        }
        Command::Search { file, query, out } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let properties: Vec<Property> = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse listings in {}", file.display()))?;

            let found = filter_properties(&properties, &query);
            info!("{} of {} listings match {:?}", found.len(), properties.len(), query);

            for (i, property) in found.iter().enumerate() {
                println!("{}. {} (${:.2})", i + 1, property.title, property.price);
                println!("   {}", property.address);
                println!("   Deal type: {}", property.deal_type);
                println!("   ID: {}", property.id);
                println!();
            }

            if let Some(out) = out {
                let json = serde_json::to_string_pretty(&found)?;
                tokio::fs::write(&out, json).await?;
                info!("Saved matches to {}", out.display());
            }
        }
    }

    Ok(())
}
