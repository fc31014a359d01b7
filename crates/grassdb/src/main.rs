mod app;
mod cli;
mod event;
mod logging;
mod tui;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use grassdb_core::{AppConfig, AppConfigStore, NODE_URL_ENV};
use grassdb_driver_http::HttpDriver;
use log::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "grassdb", version)]
#[command(about = "Admin console and client for GrassDB nodes")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive console (the default).
    Console {
        /// Node to talk to. Overrides GRASSDB_NODE_URL and the config file.
        #[arg(short, long)]
        node: Option<String>,
    },

    /// Set a key, trying each node until the leader accepts it.
    Set {
        key: String,
        value: String,

        /// Nodes to try, in order. Repeatable or comma separated.
        #[arg(short, long, value_delimiter = ',')]
        node: Vec<String>,
    },

    /// Get a key from the first node that answers.
    Get {
        key: String,

        /// Nodes to try, in order. Repeatable or comma separated.
        #[arg(short, long, value_delimiter = ',')]
        node: Vec<String>,
    },
}

fn load_config() -> AppConfig {
    let loaded = AppConfigStore::new().and_then(|store| {
        let config = store.load()?;
        info!("Loaded config from {}", store.path().display());
        Ok(config)
    });

    match loaded {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config, using defaults: {}", e);
            AppConfig::default()
        }
    }
}

fn env_node_url() -> Option<String> {
    std::env::var(NODE_URL_ENV).ok()
}

/// Nodes for a one-shot command. Without `--node`, the single resolved
/// node URL is used.
fn node_list(config: &AppConfig, flags: Vec<String>) -> Vec<String> {
    let nodes: Vec<String> = flags
        .into_iter()
        .map(|node| node.trim().to_string())
        .filter(|node| !node.is_empty())
        .collect();

    if nodes.is_empty() {
        vec![config.resolve_node_url(None, env_node_url().as_deref())]
    } else {
        nodes
    }
}

fn build_driver(config: &AppConfig) -> Result<HttpDriver> {
    HttpDriver::from_config(config)
        .context("Failed to build HTTP client")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    match args.command.unwrap_or(Command::Console { node: None }) {
        Command::Console { node } => {
            let log_path = logging::init_file();

            let config = load_config();
            let node_url = config.resolve_node_url(node.as_deref(), env_node_url().as_deref());
            let driver = build_driver(&config)?;

            if let Some(path) = log_path {
                info!("Logging to {}", path.display());
            }

            tui::run_console(node_url, Arc::new(driver)).await
        }
        Command::Set { key, value, node } => {
            logging::init_stderr();

            let config = load_config();
            let nodes = node_list(&config, node);
            let driver = build_driver(&config)?;

            cli::run_set(&driver, &nodes, key, value).await
        }
        Command::Get { key, node } => {
            logging::init_stderr();

            let config = load_config();
            let nodes = node_list(&config, node);
            let driver = build_driver(&config)?;

            cli::run_get(&driver, &nodes, key).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_console() {
        let args = Args::try_parse_from(["grassdb"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn set_accepts_repeated_and_comma_separated_nodes() {
        let args = Args::try_parse_from([
            "grassdb",
            "set",
            "username",
            "admin",
            "--node",
            "http://a:8081,http://b:8081",
            "-n",
            "http://c:8081",
        ])
        .unwrap();

        match args.command {
            Some(Command::Set { key, value, node }) => {
                assert_eq!(key, "username");
                assert_eq!(value, "admin");
                assert_eq!(node, ["http://a:8081", "http://b:8081", "http://c:8081"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn explicit_nodes_are_kept_in_order() {
        let nodes = node_list(
            &AppConfig::default(),
            vec![
                " http://b:8081 ".to_string(),
                "".to_string(),
                "http://a:8081".to_string(),
            ],
        );

        assert_eq!(nodes, ["http://b:8081", "http://a:8081"]);
    }

    #[test]
    fn get_requires_a_key() {
        assert!(Args::try_parse_from(["grassdb", "get"]).is_err());
    }
}
