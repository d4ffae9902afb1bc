use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use foweather_core::{Config, Integration, SensorEntity, Station, UnitSystem};
use inquire::{MultiSelect, Select};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::host::ConsoleHost;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "foweather",
    version,
    about = "Weather readings from Landsverk (lv.fo) stations"
)]
pub struct Cli {
    /// Path to the config file (defaults to the platform config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every known station.
    Stations,

    /// Pick the stations to monitor and the unit system.
    Configure,

    /// Fetch the current readings once and print them.
    Show {
        /// Station identifiers, e.g. "lv_hvalba"; defaults to the configured stations.
        stations: Vec<String>,

        /// Print entities as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Poll the configured stations until interrupted.
    Run,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config_path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };

        match self.command {
            Command::Stations => {
                for station in Station::all() {
                    println!("{:<22} {:<6} {}", station.key, station.station_id, station.name);
                }
            }
            Command::Configure => configure(&config_path)?,
            Command::Show { stations, json } => {
                let mut config = Config::load(&config_path)?;
                if !stations.is_empty() {
                    config.stations = stations;
                }

                let host = Arc::new(ConsoleHost::quiet());
                let integration = Integration::setup_landverk(&config, host).await?;
                let entities: Vec<&SensorEntity> = integration.entities().collect();

                if json {
                    println!("{}", serde_json::to_string_pretty(&entities)?);
                } else {
                    print_entities(&entities);
                }
            }
            Command::Run => {
                let config = Config::load(&config_path)?;
                let host = Arc::new(ConsoleHost::default());
                let mut integration = Integration::setup_landverk(&config, host).await?;

                let cancel = CancellationToken::new();
                let on_signal = cancel.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        info!("interrupt received, stopping");
                    }
                    on_signal.cancel();
                });

                integration.run(cancel).await;
            }
        }

        Ok(())
    }
}

fn configure(path: &Path) -> Result<()> {
    let mut config = Config::load(path)?;

    let options: Vec<StationOption> = Station::all().iter().map(StationOption).collect();
    let selected: Vec<usize> = options
        .iter()
        .enumerate()
        .filter(|(_, o)| config.stations.iter().any(|key| key == o.0.key))
        .map(|(idx, _)| idx)
        .collect();

    let chosen = MultiSelect::new("Stations to monitor:", options)
        .with_default(&selected)
        .with_page_size(12)
        .prompt()
        .context("Station selection was cancelled")?;

    let units = Select::new("Unit system:", UnitSystem::all().to_vec())
        .with_starting_cursor(if config.unit_system == UnitSystem::Imperial { 1 } else { 0 })
        .prompt()
        .context("Unit system selection was cancelled")?;

    config.stations = chosen.iter().map(|o| o.0.key.to_string()).collect();
    config.unit_system = units;
    config.resolve_stations()?;
    config.save_to(path)?;

    println!("Saved {} station(s) to {}", config.stations.len(), path.display());
    Ok(())
}

struct StationOption(&'static Station);

impl std::fmt::Display for StationOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.0, self.0.key)
    }
}

fn print_entities(entities: &[&SensorEntity]) {
    let mut current = None;
    for entity in entities {
        if current != Some(entity.station.key) {
            current = Some(entity.station.key);
            println!("{}", entity.station);
        }
        println!(
            "  {:<40} {:>10} {}",
            entity.name,
            entity.state.to_string(),
            entity.unit_of_measurement.unwrap_or("")
        );
    }
}
