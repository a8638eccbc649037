//! Epicoin node binary
//!
//! Starts a ledger at genesis, optionally loads an import file, then logs
//! status and expires pending transactions until Ctrl+C.

mod cli;
mod config;
mod node;

use anyhow::{Context, Result};
use cli::Cli;
use config::NodeConfig;
use node::Node;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();
    let config = NodeConfig::resolve(&cli)?;

    init_tracing(&config);

    tracing::info!("Epicoin node starting...");

    let node = Node::new(config)?;

    if let Some(path) = &cli.import {
        node.import_file(path)
            .with_context(|| format!("importing {}", path.display()))?;
    }

    if cli.exit_after_import {
        node.tick();
    } else {
        node.run(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await;
    }

    tracing::info!(height = node.ledger().height(), "Epicoin node stopped");

    Ok(())
}

/// `RUST_LOG` wins over the configured level
fn init_tracing(config: &NodeConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}
