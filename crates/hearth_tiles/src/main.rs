use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clap::Subcommand;
use hearth_tiles::api;
use hearth_tiles::card::stub_config;
use hearth_tiles::card::Presenter;
use hearth_tiles::config::ConfigError;
use hearth_tiles::config::LoggingConfig;
use hearth_tiles::format_diagnostics;
use hearth_tiles::Config;
use hearth_tiles::EntityStates;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "hearth-tiles", version, about = "Update entity tiles for hearthd dashboards")]
struct Cli {
    /// Config files, merged in order (first definition wins)
    #[arg(short, long = "config", default_value = "hearth-tiles.toml", global = true)]
    config: Vec<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the configured tiles over HTTP
    Serve,

    /// Present configured tiles against a JSON file of entity states
    Present {
        /// Entity states, as a map keyed by entity id or a list of state objects
        #[arg(long)]
        states: PathBuf,

        /// Only present this tile
        #[arg(long)]
        tile: Option<String>,
    },

    /// Print a starter tile config for the first update entity found
    Stub {
        #[arg(long)]
        states: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => {
            let config = load_config(&cli.config);
            init_logging(&config.logging);

            tracing::info!("hearth-tiles starting");
            tracing::info!("Loaded {} tile(s) from {:?}", config.tiles.len(), cli.config);

            let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => tracing::info!("Received shutdown signal"),
                    Err(e) => tracing::error!("Failed to listen for shutdown signal: {}", e),
                }
                shutdown_tx.send(()).ok();
            });

            api::serve(config.api.listen, config.api.port, config.tiles, shutdown_rx).await?;
            tracing::info!("hearth-tiles shutdown complete");
        }
        Command::Present { states, tile } => {
            let config = load_config(&cli.config);
            init_logging(&config.logging);

            let states = read_states(&states)?;
            let presenter = Presenter::new();

            let mut output = BTreeMap::new();
            for (id, tile_config) in &config.tiles {
                if tile.as_deref().is_some_and(|wanted| wanted != id.as_str()) {
                    continue;
                }
                output.insert(id.as_str(), presenter.present(Some(&states), tile_config));
            }

            if let Some(wanted) = tile.as_deref() {
                anyhow::ensure!(!output.is_empty(), "no tile named '{}' in config", wanted);
            }

            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Stub { states } => {
            init_logging(&LoggingConfig::default());

            let states = read_states(&states)?;
            let stub = stub_config(states.entity_ids());
            if stub.entity.is_none() {
                tracing::warn!("No update entities among {} state(s)", states.len());
            }

            println!("{}", serde_json::to_string_pretty(&stub)?);
        }
    }

    Ok(())
}

/// Load config or exit with the formatted diagnostics
fn load_config(paths: &[PathBuf]) -> Config {
    match Config::from_files(paths) {
        Ok((config, diagnostics)) => {
            if !diagnostics.is_empty() {
                eprint!("{}", format_diagnostics(&diagnostics));
            }
            config
        }
        Err(ConfigError::Invalid(diagnostics)) => {
            eprint!("{}", format_diagnostics(&diagnostics));
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(logging: &LoggingConfig) {
    tracing_subscriber::registry()
        .with(logging.filter())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn read_states(path: &Path) -> anyhow::Result<EntityStates> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read states file '{}'", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse states file '{}'", path.display()))
}
