pub mod toml_config;

pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use crate::domain::ports::DryMatterFloor;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use chrono::NaiveDate;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "farm-sim")]
#[command(about = "Day-by-day paddock, mob and pasture simulation")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding the farm snapshot
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory holding paddocks.csv, mobs.csv and stock.csv for resets
    #[arg(long)]
    pub seed_dir: Option<PathBuf>,

    /// Pasture growth in kg DM/ha/day
    #[arg(long)]
    pub growth_rate: Option<f64>,

    /// Stock consumption in kg DM/animal/day
    #[arg(long)]
    pub consumption_rate: Option<f64>,

    /// Simulation start date used by resets (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    #[arg(long, value_enum)]
    pub dm_floor: Option<DryMatterFloor>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Show the current simulated date
    Date,
    /// Advance the simulation, one committed day at a time
    Advance {
        #[arg(long, default_value = "1")]
        days: u32,
    },
    /// List paddocks with their occupying mob and stock count
    Paddocks,
    /// List mobs and the paddock each one is in
    Mobs,
    /// List stock grouped by mob
    Stock {
        #[arg(long, help = "Print the report as CSV")]
        csv: bool,
    },
    /// List paddocks no mob occupies
    Available,
    AddPaddock {
        name: String,
        area: f64,
        dm_per_ha: f64,
    },
    EditPaddock {
        id: u32,
        name: String,
        area: f64,
        dm_per_ha: f64,
    },
    /// Move a mob into a paddock
    MoveMob {
        mob_id: u32,
        paddock_id: u32,
    },
    /// Reload everything from the seed CSV files at the start date
    Reset,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Resolves the effective settings: config file (or defaults), then flags.
    pub fn settings(&self) -> Result<TomlConfig> {
        let mut settings = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(dir) = &self.data_dir {
            settings.storage.data_dir = dir.clone();
        }
        if let Some(dir) = &self.seed_dir {
            settings.storage.seed_dir = dir.clone();
        }
        if let Some(rate) = self.growth_rate {
            settings.simulation.pasture_growth_rate = rate;
        }
        if let Some(rate) = self.consumption_rate {
            settings.simulation.stock_consumption_rate = rate;
        }
        if let Some(date) = self.start_date {
            settings.simulation.start_date = date;
        }
        if let Some(floor) = self.dm_floor {
            settings.simulation.dm_floor = floor;
        }

        settings.validate()?;
        Ok(settings)
    }
}
