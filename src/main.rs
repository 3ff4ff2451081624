use std::sync::Arc;

use clap::Parser;

use seller_onboarding::application::RouteHistory;
use seller_onboarding::cli::{self, Cli};
use seller_onboarding::config::ClientConfig;
use seller_onboarding::context::PageDeps;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let config = ClientConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export SELLER_GRAPHQL_ENDPOINT=https://seller.example.com/graphql/");
        std::process::exit(1);
    });

    eprintln!("🛒 Seller onboarding v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Endpoint: {}", config.endpoint);

    match &config.session_path {
        Some(path) => eprintln!("   Session: {}", path.display()),
        None => eprintln!("   Session: in memory (no home directory)"),
    }
    eprintln!();

    let deps = PageDeps::open(&config, Arc::new(RouteHistory::new())).await?;

    cli::run(args.command, deps).await
}
