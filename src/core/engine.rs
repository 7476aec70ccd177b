use crate::core::{clock, occupancy, pasture, registry, stock};
use crate::domain::model::{
    DayReport, EditOutcome, FarmState, MobGroup, MobId, MobView, Occupancy, Paddock, PaddockId,
    PaddockView,
};
use crate::domain::ports::{ConfigProvider, FarmStore};
use crate::utils::error::{FarmError, Result};
use chrono::NaiveDate;
use tokio::sync::Mutex;

/// The simulation session: committed farm state plus the store and settings.
///
/// Every mutation runs on a draft copy under one lock. The draft is
/// committed to the store and only then becomes the live state, so a failed
/// validation or a failed commit leaves nothing half-applied.
pub struct FarmEngine<S: FarmStore, C: ConfigProvider> {
    store: S,
    config: C,
    state: Mutex<FarmState>,
}

impl<S: FarmStore, C: ConfigProvider> FarmEngine<S, C> {
    /// Loads the committed state, or commits `init(&config)` when the store is empty.
    pub async fn open_or_init<F>(store: S, config: C, init: F) -> Result<Self>
    where
        F: FnOnce(&C) -> Result<FarmState>,
    {
        let state = match store.load().await? {
            Some(state) => {
                state.check_invariants()?;
                tracing::info!("Loaded farm state at {}", state.curr_date);
                state
            }
            None => {
                let state = init(&config)?;
                state.check_invariants()?;
                store.commit(&state).await?;
                tracing::info!("Initialised new farm state at {}", state.curr_date);
                state
            }
        };

        Ok(Self {
            store,
            config,
            state: Mutex::new(state),
        })
    }

    /// Opens the store, starting from an empty farm at the configured start date.
    pub async fn open(store: S, config: C) -> Result<Self> {
        Self::open_or_init(store, config, |c| Ok(FarmState::empty(c.start_date()))).await
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    async fn transact<T, F>(&self, operation: &'static str, apply: F) -> Result<T>
    where
        F: FnOnce(&mut FarmState) -> Result<T>,
    {
        let mut live = self.state.lock().await;
        let mut draft = live.clone();

        let value = match apply(&mut draft) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("{} rejected: {}", operation, e);
                return Err(e);
            }
        };

        if draft != *live {
            if let Err(e) = self.store.commit(&draft).await {
                tracing::error!("{} rolled back, commit failed: {}", operation, e);
                return Err(match e {
                    FarmError::PersistenceFailure { .. } => e,
                    other => FarmError::PersistenceFailure {
                        message: other.to_string(),
                    },
                });
            }
            *live = draft;
        }

        Ok(value)
    }

    pub async fn current_date(&self) -> NaiveDate {
        self.state.lock().await.curr_date
    }

    pub async fn snapshot(&self) -> FarmState {
        self.state.lock().await.clone()
    }

    pub async fn list_paddocks_with_occupancy(&self) -> Vec<PaddockView> {
        registry::paddock_views(&*self.state.lock().await)
    }

    pub async fn list_mobs_with_paddock(&self) -> Vec<MobView> {
        occupancy::mob_views(&*self.state.lock().await)
    }

    pub async fn list_stock_grouped_by_mob(&self, as_of: NaiveDate) -> Result<Vec<MobGroup>> {
        let state = self.state.lock().await;
        stock::aggregate(state.mobs.values(), state.animals.values(), &state.paddocks, as_of)
    }

    pub async fn available_paddocks(&self) -> Vec<Paddock> {
        occupancy::available_paddocks(&*self.state.lock().await)
    }

    pub async fn current_distribution(&self) -> Vec<Occupancy> {
        occupancy::current_distribution(&*self.state.lock().await)
    }

    /// Moves the calendar forward one day, growing and grazing every paddock.
    pub async fn advance_day(&self) -> Result<DayReport> {
        let rates = pasture::PastureRates::from_config(&self.config);
        let report = self
            .transact("advance_day", |state| {
                let new_date = clock::next_day(state.curr_date)?;
                let changes = pasture::advance_all(state, &rates);
                state.curr_date = new_date;
                Ok(DayReport { new_date, changes })
            })
            .await?;

        let clamped = report.changes.iter().filter(|c| c.clamped).count();
        if clamped > 0 {
            tracing::warn!("{} paddock(s) grazed down to zero dry matter", clamped);
        }
        tracing::info!("Advanced to {}", report.new_date);
        Ok(report)
    }

    pub async fn add_paddock(&self, name: &str, area: f64, dm_per_ha: f64) -> Result<PaddockId> {
        let id = self
            .transact("add_paddock", |state| registry::add_paddock(state, name, area, dm_per_ha))
            .await?;
        tracing::info!("Paddock '{}' added with id {}", name, id);
        Ok(id)
    }

    pub async fn edit_paddock(
        &self,
        id: PaddockId,
        name: &str,
        area: f64,
        dm_per_ha: f64,
    ) -> Result<EditOutcome> {
        let outcome = self
            .transact("edit_paddock", |state| {
                registry::edit_paddock(state, id, name, area, dm_per_ha)
            })
            .await?;
        if outcome == EditOutcome::Updated {
            tracing::info!("Paddock {} updated", id);
        }
        Ok(outcome)
    }

    pub async fn relocate_mob(&self, mob_id: MobId, paddock_id: PaddockId) -> Result<()> {
        self.transact("relocate_mob", |state| occupancy::relocate(state, mob_id, paddock_id))
            .await?;
        tracing::info!("Mob {} moved to paddock {}", mob_id, paddock_id);
        Ok(())
    }

    /// Replaces the whole farm, clock included, with `state`.
    pub async fn reset(&self, state: FarmState) -> Result<()> {
        state.check_invariants()?;
        let date = state.curr_date;
        self.transact("reset", move |draft| {
            *draft = state;
            Ok(())
        })
        .await?;
        tracing::info!("Farm reset to {}", date);
        Ok(())
    }
}
