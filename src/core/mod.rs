pub mod clock;
pub mod engine;
pub mod occupancy;
pub mod pasture;
pub mod registry;
pub mod stock;

pub use crate::domain::model::{FarmState, Paddock, PaddockId};
pub use crate::domain::ports::{ConfigProvider, DryMatterFloor, FarmStore, Storage};
pub use crate::utils::error::Result;
