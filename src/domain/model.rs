use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::utils::error::{FarmError, Result};
use crate::utils::validation::{approx_eq, validate_paddock_name};

/// Tolerance used when comparing stored dry matter figures.
pub const DM_TOLERANCE: f64 = 0.01;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(PaddockId);
id_type!(MobId);
id_type!(AnimalId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddock {
    pub id: PaddockId,
    pub name: String,
    pub area: f64,
    pub dm_per_ha: f64,
    pub total_dm: f64,
}

impl Paddock {
    /// Builds a paddock with `total_dm` derived from area and density.
    pub fn new(id: PaddockId, name: impl Into<String>, area: f64, dm_per_ha: f64) -> Self {
        Self {
            id,
            name: name.into(),
            area,
            dm_per_ha,
            total_dm: area * dm_per_ha,
        }
    }

    pub fn recompute_total(&mut self) {
        self.total_dm = self.area * self.dm_per_ha;
    }

    pub fn is_consistent(&self) -> bool {
        approx_eq(self.total_dm, self.area * self.dm_per_ha, DM_TOLERANCE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mob {
    pub id: MobId,
    pub name: String,
    pub paddock_id: Option<PaddockId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub id: AnimalId,
    pub mob_id: MobId,
    pub dob: NaiveDate,
    pub weight: f64,
}

/// The full typed record set for one farm, including the simulation clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmState {
    pub curr_date: NaiveDate,
    pub paddocks: BTreeMap<PaddockId, Paddock>,
    pub mobs: BTreeMap<MobId, Mob>,
    pub animals: BTreeMap<AnimalId, Animal>,
}

impl FarmState {
    pub fn empty(curr_date: NaiveDate) -> Self {
        Self {
            curr_date,
            paddocks: BTreeMap::new(),
            mobs: BTreeMap::new(),
            animals: BTreeMap::new(),
        }
    }

    pub fn next_paddock_id(&self) -> Result<PaddockId> {
        match self.paddocks.keys().next_back() {
            None => Ok(PaddockId(1)),
            Some(last) => last
                .0
                .checked_add(1)
                .map(PaddockId)
                .ok_or(FarmError::IdExhausted { entity: "Paddock" }),
        }
    }

    pub fn paddock(&self, id: PaddockId) -> Result<&Paddock> {
        self.paddocks
            .get(&id)
            .ok_or_else(|| FarmError::not_found_paddock(id.0))
    }

    pub fn mob(&self, id: MobId) -> Result<&Mob> {
        self.mobs.get(&id).ok_or_else(|| FarmError::not_found_mob(id.0))
    }

    /// The mob grazing `paddock_id`, if any.
    pub fn occupant_of(&self, paddock_id: PaddockId) -> Option<&Mob> {
        self.mobs
            .values()
            .find(|mob| mob.paddock_id == Some(paddock_id))
    }

    pub fn animal_count(&self, mob_id: MobId) -> usize {
        self.animals
            .values()
            .filter(|animal| animal.mob_id == mob_id)
            .count()
    }

    /// Verifies the record and cross-record invariants every committed state must hold.
    ///
    /// Density is only required to be finite: grazing may legitimately drive
    /// it to zero, or below zero under [`DryMatterFloor::Unclamped`].
    ///
    /// [`DryMatterFloor::Unclamped`]: crate::domain::ports::DryMatterFloor::Unclamped
    pub fn check_invariants(&self) -> Result<()> {
        let broken = |message: String| FarmError::InvalidState { message };

        let mut names = HashSet::new();
        for (id, paddock) in &self.paddocks {
            if *id != paddock.id {
                return Err(broken(format!("paddock keyed {} carries id {}", id, paddock.id)));
            }
            if let Err(e) = validate_paddock_name(&paddock.name) {
                return Err(broken(e.to_string()));
            }
            if !paddock.area.is_finite() || paddock.area <= 0.0 {
                return Err(broken(format!(
                    "paddock '{}' has non-positive area {}",
                    paddock.name, paddock.area
                )));
            }
            if !paddock.dm_per_ha.is_finite() || !paddock.total_dm.is_finite() {
                return Err(broken(format!(
                    "paddock '{}' has non-finite dry matter",
                    paddock.name
                )));
            }
            if !paddock.is_consistent() {
                return Err(broken(format!(
                    "paddock '{}' total_dm {} does not equal area x dm_per_ha",
                    paddock.name, paddock.total_dm
                )));
            }
            if !names.insert(paddock.name.as_str()) {
                return Err(broken(format!("paddock name '{}' is not unique", paddock.name)));
            }
        }

        let mut occupied = HashSet::new();
        for mob in self.mobs.values() {
            if let Some(paddock_id) = mob.paddock_id {
                if !self.paddocks.contains_key(&paddock_id) {
                    return Err(broken(format!(
                        "mob '{}' references missing paddock {}",
                        mob.name, paddock_id
                    )));
                }
                if !occupied.insert(paddock_id) {
                    return Err(broken(format!(
                        "paddock {} holds more than one mob",
                        paddock_id
                    )));
                }
            }
        }

        for animal in self.animals.values() {
            if !self.mobs.contains_key(&animal.mob_id) {
                return Err(broken(format!(
                    "animal {} references missing mob {}",
                    animal.id, animal.mob_id
                )));
            }
        }

        Ok(())
    }
}

/// Calendar age of an animal as of a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Age {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}y {}m {}d", self.years, self.months, self.days)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaddockView {
    pub id: PaddockId,
    pub name: String,
    pub area: f64,
    pub dm_per_ha: f64,
    pub total_dm: f64,
    pub mob_name: Option<String>,
    pub stock_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MobView {
    pub id: MobId,
    pub name: String,
    pub paddock_id: Option<PaddockId>,
    pub paddock_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimalView {
    pub id: AnimalId,
    pub dob: NaiveDate,
    pub weight: f64,
    pub age: Age,
    pub age_years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobGroup {
    pub mob: MobView,
    pub animals: Vec<AnimalView>,
    pub count: usize,
    pub avg_weight: Option<f64>,
}

/// One paddock's occupancy in the distribution report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occupancy {
    pub paddock_id: PaddockId,
    pub paddock_name: String,
    pub mob: Option<(MobId, String)>,
    pub stock_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PastureChange {
    pub paddock_id: PaddockId,
    pub occupants: usize,
    pub before_dm: f64,
    pub after_dm: f64,
    pub clamped: bool,
}

/// Result of one day-advance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayReport {
    pub new_date: NaiveDate,
    pub changes: Vec<PastureChange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Updated,
    Unchanged,
}
