pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliCommand, CliConfig};

pub use adapters::{
    memory::MemoryStore, seed::SeedData, snapshot::SnapshotStore, storage::LocalStorage,
};
pub use config::TomlConfig;
pub use core::engine::FarmEngine;
pub use domain::model::{
    Age, Animal, AnimalId, DayReport, EditOutcome, FarmState, Mob, MobGroup, MobId, MobView,
    Occupancy, Paddock, PaddockId, PaddockView,
};
pub use domain::ports::{ConfigProvider, DryMatterFloor, FarmStore, Storage};
pub use utils::error::{FarmError, Result};
