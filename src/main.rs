//! ResortDesk binary entry point

use std::path::PathBuf;

use clap::Parser as _;
use resortdesk::{TimelineSpace, config, data::Account};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, clap::Parser)]
#[command(author)]
#[command(version)]
#[command(about = "Manage pending follow requests of a Mastodon/Pleroma account")]
#[command(long_about = None)]
struct Args {
    /// Configuration file (defaults to config/local.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print accounts as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Dump Prometheus metrics to stderr after the action
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, clap::Subcommand)]
enum Action {
    /// List pending follow requests
    List,
    /// Accept the follow request of an account
    Accept { id: String },
    /// Reject the follow request of an account
    Reject { id: String },
}

/// Application entry point
///
/// # Setup
/// 1. Load configuration from file and environment
/// 2. Initialize tracing/logging
/// 3. Initialize TimelineSpace
/// 4. Run the requested action
/// 5. Dump metrics when asked
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 1. Load configuration
    let config = config::AppConfig::load(args.config.as_deref())?;

    // 2. Initialize tracing/logging
    init_tracing(&config.logging);
    resortdesk::metrics::init_metrics();
    tracing::debug!(base_url = %config.account.base_url, "Configuration loaded");
    if config.uses_plain_http() {
        tracing::warn!(
            base_url = %config.account.base_url,
            "Talking to a local instance over plain http"
        );
    }

    // 3. Initialize timeline space
    let mut space = TimelineSpace::new(config)?;

    // 4. Run action
    match args.action {
        Action::List => {
            let requests = space.follow_requests.refresh().await?;
            print_accounts(requests, args.json)?;
        }
        Action::Accept { id } => {
            let account = space.accept_follow_request(&id).await?;
            print_accounts(std::slice::from_ref(&account), args.json)?;
        }
        Action::Reject { id } => {
            let account = space.reject_follow_request(&id).await?;
            print_accounts(std::slice::from_ref(&account), args.json)?;
        }
    }

    tracing::debug!(
        unread_follow_requests = space.side_menu.unread_follow_requests(),
        "Done"
    );

    // 5. Dump metrics
    if args.metrics {
        eprint!("{}", resortdesk::metrics::render());
    }

    Ok(())
}

fn init_tracing(logging: &config::LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("resortdesk={}", logging.level).into());

    if logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}

fn print_accounts(accounts: &[Account], json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(accounts)?);
        return Ok(());
    }

    if accounts.is_empty() {
        println!("No pending follow requests");
    }
    for account in accounts {
        println!("{}\t@{}\t{}", account.id, account.acct, account.display_name);
    }
    Ok(())
}
