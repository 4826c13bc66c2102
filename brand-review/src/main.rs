//! brand-review - Drive the content approval workflow
//!
//! Unix-style tool for moving brand content through review: list what is
//! waiting, submit drafts, approve, reject, and revert.

use clap::{Parser, Subcommand};
use libbrandcast::{BrandcastError, BrandcastService, ContentItem, Result};

#[derive(Parser, Debug)]
#[command(name = "brand-review")]
#[command(version)]
#[command(about = "Drive the content approval workflow")]
#[command(long_about = "\
brand-review - Drive the content approval workflow

DESCRIPTION:
    brand-review moves brand content through the approval lifecycle:
    draft -> pending_approval -> approved | rejected -> draft.

USAGE EXAMPLES:
    # List content waiting for review
    brand-review pending --client client-42

    # Submit a draft for review
    brand-review submit <CONTENT_ID> --client client-42

    # Approve an item
    brand-review approve <CONTENT_ID> --client client-42 --by reviewer@example.com

    # Reject an item with a reason
    brand-review reject <CONTENT_ID> --client client-42 --reason \"off-brand tone\"

    # Send a rejected item back to draft
    brand-review revert <CONTENT_ID> --client client-42

CONFIGURATION:
    Configuration file: ~/.config/brandcast/config.toml

    Override with environment variables:
        BRANDCAST_CONFIG    - Path to config file
        BRANDCAST_DB_PATH   - Path to database file

EXIT CODES:
    0 - Success
    1 - Operation failed
    2 - Content not found
    3 - Invalid input or transition
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List content waiting for review
    Pending {
        /// Client that owns the content
        #[arg(short, long)]
        client: String,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Submit a draft for review
    Submit {
        /// Content item id
        content_id: String,

        /// Client that owns the content
        #[arg(short, long)]
        client: String,
    },

    /// Approve an item waiting for review
    Approve {
        /// Content item id
        content_id: String,

        /// Client that owns the content
        #[arg(short, long)]
        client: String,

        /// Who approved it
        #[arg(long)]
        by: String,
    },

    /// Reject an item waiting for review
    Reject {
        /// Content item id
        content_id: String,

        /// Client that owns the content
        #[arg(short, long)]
        client: String,

        /// Why it was rejected (required)
        #[arg(long)]
        reason: String,
    },

    /// Send a rejected item back to draft
    Revert {
        /// Content item id
        content_id: String,

        /// Client that owns the content
        #[arg(short, long)]
        client: String,
    },
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

    match cli.command {
        Commands::Pending { client, format } => {
            let items = service.review().pending(&client).await?;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&items).unwrap_or_default());
            } else if items.is_empty() {
                println!("Nothing waiting for review.");
            } else {
                for item in &items {
                    println!("{}  {}  {}", item.id, item.content_type, summary(item));
                }
            }
        }
        Commands::Submit { content_id, client } => {
            let item = service.review().submit_for_review(&content_id, &client).await?;
            println!("{} is now {}", item.id, item.status);
        }
        Commands::Approve {
            content_id,
            client,
            by,
        } => {
            let item = service.review().approve(&content_id, &client, &by).await?;
            println!("{} approved by {}", item.id, by);
        }
        Commands::Reject {
            content_id,
            client,
            reason,
        } => {
            if reason.trim().is_empty() {
                return Err(BrandcastError::InvalidInput(
                    "A rejection reason is required".to_string(),
                ));
            }
            let item = service.review().reject(&content_id, &client, &reason).await?;
            println!("{} rejected: {}", item.id, reason);
        }
        Commands::Revert { content_id, client } => {
            let item = service.review().revert_to_draft(&content_id, &client).await?;
            println!("{} is back in {}", item.id, item.status);
        }
    }

    Ok(())
}

fn summary(item: &ContentItem) -> String {
    let caption = item.caption.trim();
    if caption.is_empty() {
        return "(no caption)".to_string();
    }
    let mut chars = caption.chars();
    let head: String = chars.by_ref().take(60).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
