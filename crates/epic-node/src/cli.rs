//! CLI argument parsing for epic-node

use clap::Parser;
use std::path::PathBuf;

/// Epicoin single-node ledger
#[derive(Parser, Debug, Clone)]
#[command(name = "epicoin-node")]
#[command(about = "Epicoin single-node ledger")]
#[command(version)]
pub struct Cli {
    /// TOML config file (CLI flags override its values)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// JSON file of transactions and blocks to load at startup
    #[arg(long)]
    pub import: Option<PathBuf>,

    /// Maximum pending transactions
    #[arg(long)]
    pub max_pool_size: Option<usize>,

    /// Require appended blocks to extend the current tip
    #[arg(long)]
    pub validate_linkage: bool,

    /// Seconds between status lines
    #[arg(long)]
    pub status_interval: Option<u64>,

    /// Exit once the import file is processed
    #[arg(long)]
    pub exit_after_import: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["epicoin-node"]);
        assert!(cli.config.is_none());
        assert!(cli.log_level.is_none());
        assert!(!cli.log_json);
        assert!(cli.import.is_none());
        assert!(cli.max_pool_size.is_none());
        assert!(!cli.validate_linkage);
        assert!(cli.status_interval.is_none());
        assert!(!cli.exit_after_import);
    }

    #[test]
    fn test_cli_custom_values() {
        let cli = Cli::parse_from([
            "epicoin-node",
            "--config", "/etc/epicoin/node.toml",
            "--log-level", "debug",
            "--log-json",
            "--import", "chain.json",
            "--max-pool-size", "64",
            "--validate-linkage",
            "--status-interval", "5",
            "--exit-after-import",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/epicoin/node.toml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(cli.log_json);
        assert_eq!(cli.import, Some(PathBuf::from("chain.json")));
        assert_eq!(cli.max_pool_size, Some(64));
        assert!(cli.validate_linkage);
        assert_eq!(cli.status_interval, Some(5));
        assert!(cli.exit_after_import);
    }

    #[test]
    fn test_cli_rejects_bad_number() {
        assert!(Cli::try_parse_from(["epicoin-node", "--max-pool-size", "lots"]).is_err());
    }
}
