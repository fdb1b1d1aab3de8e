use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use edge_cache_policies::config::{load_config, AppConfig, SiteConfigSettings};
use edge_cache_policies::edge::{format_offset, EdgeEvent, RequestEnricher, TimezoneOffsetResolver};
use edge_cache_policies::observability::logging;
use edge_cache_policies::policies::{CachePolicies, DistributionBehaviors};
use edge_cache_policies::routing::{RouteTranslationCache, SiteConfigClient};

#[derive(Parser)]
#[command(name = "cache-cli")]
#[command(about = "Inspect edge enrichment and cache behavior wiring", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Site-config stage, overriding the configuration file.
    #[arg(long, global = true)]
    stage: Option<String>,

    /// Site-config base URL, overriding the configuration file.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current UTC offset of a time zone
    Offset { zone: String },
    /// Run the origin-request hook on an event file and print the forwarded request
    Enrich { event: PathBuf },
    /// Translate a path pattern through a site's route table
    Translate {
        pattern: String,
        #[arg(short, long)]
        domain_config: Option<String>,
    },
    /// Print cache tiers and translated behavior wiring
    Behaviors {
        #[arg(short, long)]
        domain_config: Option<String>,
        #[arg(long, default_value = "WordPress")]
        site: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if cli.stage.is_some() {
        config.site_config.stage = cli.stage.clone();
    }
    if let Some(base_url) = &cli.base_url {
        config.site_config.base_url = base_url.clone();
    }
    logging::init(&config.observability.log_level);

    match cli.command {
        Commands::Offset { zone } => {
            let minutes = TimezoneOffsetResolver::new().resolve(&zone)?;
            println!("{}", format_offset(minutes));
        }
        Commands::Enrich { event } => {
            let event: EdgeEvent = serde_json::from_str(&std::fs::read_to_string(event)?)?;
            let enricher = RequestEnricher::new(config.enrichment.clone());
            match enricher.handle(event) {
                Some(request) => println!("{}", serde_json::to_string_pretty(&request)?),
                None => eprintln!("Error: event carried no records"),
            }
        }
        Commands::Translate { pattern, domain_config } => {
            let cache = route_cache(&config.site_config)?;
            println!("{}", cache.translate(&pattern, domain_config.as_deref()).await?);
        }
        Commands::Behaviors { domain_config, site } => {
            let cache = route_cache(&config.site_config)?;
            let behaviors = DistributionBehaviors::wordpress()
                .translated(&cache, domain_config.as_deref())
                .await?;
            let out = serde_json::json!({
                "policies": CachePolicies::for_site(&site),
                "behaviors": behaviors,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    Ok(())
}

fn route_cache(settings: &SiteConfigSettings) -> Result<RouteTranslationCache, Box<dyn std::error::Error>> {
    let client = SiteConfigClient::new(settings)?;
    Ok(RouteTranslationCache::with_default_domain_config(
        Arc::new(client),
        settings.default_domain_config.clone(),
    ))
}
