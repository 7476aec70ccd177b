//! Bulk-reset data: paddocks, mobs and stock loaded from CSV files.
//!
//! The seed directory holds `paddocks.csv` (`id,name,area,dm_per_ha`),
//! `mobs.csv` (`id,name,paddock_id`, blank paddock for an unplaced mob) and
//! `stock.csv` (`id,mob_id,dob,weight`, dates as `YYYY-MM-DD`).

use crate::domain::model::{Animal, AnimalId, FarmState, Mob, MobId, Paddock, PaddockId};
use crate::utils::error::{FarmError, Result};
use crate::utils::validation::{validate_paddock_name, validate_positive};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

pub const PADDOCKS_FILE: &str = "paddocks.csv";
pub const MOBS_FILE: &str = "mobs.csv";
pub const STOCK_FILE: &str = "stock.csv";

#[derive(Debug, Clone, Deserialize)]
struct PaddockRow {
    id: PaddockId,
    name: String,
    area: f64,
    dm_per_ha: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct MobRow {
    id: MobId,
    name: String,
    paddock_id: Option<PaddockId>,
}

#[derive(Debug, Clone, Deserialize)]
struct StockRow {
    id: AnimalId,
    mob_id: MobId,
    dob: NaiveDate,
    weight: f64,
}

#[derive(Debug, Clone)]
pub struct SeedData {
    paddocks: Vec<PaddockRow>,
    mobs: Vec<MobRow>,
    stock: Vec<StockRow>,
}

fn read_rows<T, R>(reader: R) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Fields)
        .from_reader(reader);
    let rows = csv_reader.deserialize().collect::<std::result::Result<Vec<T>, _>>()?;
    Ok(rows)
}

impl SeedData {
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let open = |name: &str| {
            std::fs::File::open(dir.join(name)).map_err(|e| FarmError::SeedError {
                message: format!("cannot open {}: {}", dir.join(name).display(), e),
            })
        };

        let seed = Self::from_readers(open(PADDOCKS_FILE)?, open(MOBS_FILE)?, open(STOCK_FILE)?)?;
        tracing::debug!(
            "Loaded seed from {}: {} paddocks, {} mobs, {} animals",
            dir.display(),
            seed.paddocks.len(),
            seed.mobs.len(),
            seed.stock.len()
        );
        Ok(seed)
    }

    pub fn from_readers<P: Read, M: Read, S: Read>(paddocks: P, mobs: M, stock: S) -> Result<Self> {
        Ok(Self {
            paddocks: read_rows(paddocks)?,
            mobs: read_rows(mobs)?,
            stock: read_rows(stock)?,
        })
    }

    /// Builds a farm at `start_date`, checking every invariant a committed state must hold.
    pub fn into_state(self, start_date: NaiveDate) -> Result<FarmState> {
        let duplicate = |kind: &str, id: u32| FarmError::SeedError {
            message: format!("duplicate {} id {}", kind, id),
        };
        let mut state = FarmState::empty(start_date);

        for row in self.paddocks {
            validate_paddock_name(&row.name)?;
            validate_positive("area", row.area)?;
            validate_positive("dm_per_ha", row.dm_per_ha)?;
            let paddock = Paddock::new(row.id, row.name, row.area, row.dm_per_ha);
            if state.paddocks.insert(row.id, paddock).is_some() {
                return Err(duplicate("paddock", row.id.0));
            }
        }

        for row in self.mobs {
            let mob = Mob {
                id: row.id,
                name: row.name,
                paddock_id: row.paddock_id,
            };
            if state.mobs.insert(row.id, mob).is_some() {
                return Err(duplicate("mob", row.id.0));
            }
        }

        for row in self.stock {
            if row.dob > start_date {
                return Err(FarmError::SeedError {
                    message: format!("animal {} born {} after start date {}", row.id, row.dob, start_date),
                });
            }
            let animal = Animal {
                id: row.id,
                mob_id: row.mob_id,
                dob: row.dob,
                weight: row.weight,
            };
            if state.animals.insert(row.id, animal).is_some() {
                return Err(duplicate("animal", row.id.0));
            }
        }

        state.check_invariants().map_err(|e| match e {
            FarmError::InvalidState { message } => FarmError::SeedError { message },
            other => other,
        })?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PADDOCKS: &str = "id,name,area,dm_per_ha\n1,Hill,10.5,1800\n2,River,4,2200\n";
    const MOBS: &str = "id,name,paddock_id\n1,Ewes,2\n2,Rams,\n";
    const STOCK: &str = "id,mob_id,dob,weight\n100,1,2022-08-15,65.5\n101,1,2023-01-02,58\n";

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 29).unwrap()
    }

    #[test]
    fn test_seed_builds_consistent_state() {
        let seed = SeedData::from_readers(PADDOCKS.as_bytes(), MOBS.as_bytes(), STOCK.as_bytes()).unwrap();
        let state = seed.into_state(start()).unwrap();

        assert_eq!(state.curr_date, start());
        assert_eq!(state.paddocks[&PaddockId(1)].total_dm, 10.5 * 1800.0);
        assert_eq!(state.mobs[&MobId(1)].paddock_id, Some(PaddockId(2)));
        assert_eq!(state.mobs[&MobId(2)].paddock_id, None);
        assert_eq!(state.animal_count(MobId(1)), 2);
    }

    #[test]
    fn test_seed_rejects_shared_paddock() {
        let mobs = "id,name,paddock_id\n1,Ewes,2\n2,Rams,2\n";
        let seed = SeedData::from_readers(PADDOCKS.as_bytes(), mobs.as_bytes(), STOCK.as_bytes()).unwrap();
        assert!(matches!(seed.into_state(start()), Err(FarmError::SeedError { .. })));
    }

    #[test]
    fn test_seed_rejects_future_birth() {
        let stock = "id,mob_id,dob,weight\n100,1,2025-01-01,65.5\n";
        let seed = SeedData::from_readers(PADDOCKS.as_bytes(), MOBS.as_bytes(), stock.as_bytes()).unwrap();
        assert!(seed.into_state(start()).is_err());
    }

    #[test]
    fn test_seed_rejects_bad_paddock_name() {
        let paddocks = "id,name,area,dm_per_ha\n1,9 Acre,10,1800\n";
        let seed = SeedData::from_readers(paddocks.as_bytes(), "id,name,paddock_id\n".as_bytes(), "id,mob_id,dob,weight\n".as_bytes()).unwrap();
        assert!(matches!(seed.into_state(start()), Err(FarmError::InvalidName { .. })));
    }

    #[test]
    fn test_malformed_csv_is_csv_error() {
        let stock = "id,mob_id,dob,weight\nabc,1,2022-01-01,60\n";
        let err = SeedData::from_readers(PADDOCKS.as_bytes(), MOBS.as_bytes(), stock.as_bytes()).unwrap_err();
        assert!(matches!(err, FarmError::CsvError(_)));
    }
}
