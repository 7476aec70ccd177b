use crate::domain::model::FarmState;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = Result<bool>> + Send;
}

/// Simulation constants and locations supplied by the environment.
pub trait ConfigProvider: Send + Sync {
    fn growth_rate(&self) -> f64;
    fn consumption_rate(&self) -> f64;
    fn start_date(&self) -> NaiveDate;
    fn dm_floor(&self) -> DryMatterFloor;
    fn data_dir(&self) -> &Path;
    fn seed_dir(&self) -> &Path;
}

/// What happens when consumption drives a paddock's dry matter below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DryMatterFloor {
    #[default]
    Clamp,
    Unclamped,
}

/// Persistence collaborator: the committed farm state.
///
/// `commit` must be all-or-nothing. If it returns an error the previously
/// committed state is still the one `load` returns.
#[async_trait]
pub trait FarmStore: Send + Sync {
    async fn load(&self) -> Result<Option<FarmState>>;
    async fn commit(&self, state: &FarmState) -> Result<()>;
}
