//! brand-publish - Publish approved content to connected platforms
//!
//! Submits one fan-out post for an approved content item, immediately or
//! at a scheduled time, and prints the resulting schedule records.

use clap::Parser;
use libbrandcast::{
    scheduling, BrandcastError, BrandcastService, Platform, PublishRequest, Result,
};

#[derive(Parser, Debug)]
#[command(name = "brand-publish")]
#[command(version)]
#[command(about = "Publish approved content to connected platforms")]
#[command(long_about = "\
brand-publish - Publish approved content to connected platforms

DESCRIPTION:
    brand-publish submits one fan-out post for an approved content item
    through the publishing provider. Platforms without a connected
    account are skipped; the post goes out to the rest.

USAGE EXAMPLES:
    # Publish immediately to two platforms
    brand-publish <CONTENT_ID> --client client-42 --platforms instagram,facebook

    # Schedule for later
    brand-publish <CONTENT_ID> --client client-42 --platforms x --at \"tomorrow 9am\"

    # JSON output for scripting
    brand-publish <CONTENT_ID> --client client-42 --platforms instagram --format json

CONFIGURATION:
    Configuration file: ~/.config/brandcast/config.toml

    Override with environment variables:
        BRANDCAST_CONFIG    - Path to config file
        BRANDCAST_DB_PATH   - Path to database file

EXIT CODES:
    0 - Success
    1 - Operation failed
    2 - Content not found
    3 - Invalid input
")]
struct Cli {
    /// Content item id to publish
    content_id: String,

    /// Client that owns the content
    #[arg(short, long)]
    client: String,

    /// Target platforms (comma-separated). Falls back to the configured
    /// defaults when omitted.
    #[arg(short, long)]
    platforms: Option<String>,

    /// When to publish (e.g. "2h", "tomorrow 9am"). Omit for now.
    #[arg(long)]
    at: Option<String>,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("error")
            .with_writer(std::io::stderr)
            .init();
    }

    // Run the main logic and handle errors
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let service = BrandcastService::new().await?;

    let requested = match &cli.platforms {
        Some(list) => list.clone(),
        None => service.config().defaults.platforms.join(","),
    };
    let platforms = parse_platforms(&requested)?;

    let scheduled_at = match &cli.at {
        Some(input) => Some(scheduling::parse_schedule(input)?),
        None => None,
    };

    let receipt = service
        .publishing()
        .schedule_post(PublishRequest {
            content_id: cli.content_id.clone(),
            client_id: cli.client.clone(),
            platforms,
            scheduled_at,
        })
        .await?;

    if cli.format == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&receipt).unwrap_or_default()
        );
    } else {
        println!(
            "Submitted {} to {} platform(s) as {}",
            cli.content_id,
            receipt.platforms.len(),
            receipt.provider_post_id
        );
        println!("Content is now {}", receipt.content_status);
    }

    Ok(())
}

fn parse_platforms(list: &str) -> Result<Vec<Platform>> {
    let mut platforms = Vec::new();
    for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let platform: Platform = name
            .parse()
            .map_err(BrandcastError::InvalidInput)?;
        if !platforms.contains(&platform) {
            platforms.push(platform);
        }
    }
    if platforms.is_empty() {
        return Err(BrandcastError::InvalidInput(
            "At least one platform is required".to_string(),
        ));
    }
    Ok(platforms)
}
