use crate::domain::model::{FarmState, Paddock, PastureChange};
use crate::domain::ports::{ConfigProvider, DryMatterFloor};

/// Daily pasture rates: growth in kg DM/ha/day, consumption in kg DM/animal/day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PastureRates {
    pub growth_rate: f64,
    pub consumption_rate: f64,
    pub floor: DryMatterFloor,
}

impl PastureRates {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            growth_rate: config.growth_rate(),
            consumption_rate: config.consumption_rate(),
            floor: config.dm_floor(),
        }
    }
}

/// One day of growth and grazing for a single paddock.
pub fn advance(paddock: &Paddock, occupants: usize, rates: &PastureRates) -> (Paddock, PastureChange) {
    let grown = paddock.total_dm + paddock.area * rates.growth_rate;
    let raw_total = grown - occupants as f64 * rates.consumption_rate;

    let (total_dm, clamped) = match rates.floor {
        DryMatterFloor::Clamp if raw_total < 0.0 => (0.0, true),
        _ => (raw_total, false),
    };

    let updated = Paddock {
        total_dm,
        dm_per_ha: total_dm / paddock.area,
        ..paddock.clone()
    };

    let change = PastureChange {
        paddock_id: paddock.id,
        occupants,
        before_dm: paddock.total_dm,
        after_dm: total_dm,
        clamped,
    };

    (updated, change)
}

/// Applies [`advance`] to every paddock in `state`, occupied or not.
///
/// Only touches paddock records; the caller steps the clock in the same draft.
pub fn advance_all(state: &mut FarmState, rates: &PastureRates) -> Vec<PastureChange> {
    let occupants: Vec<usize> = state
        .paddocks
        .keys()
        .map(|id| {
            state
                .occupant_of(*id)
                .map_or(0, |mob| state.animal_count(mob.id))
        })
        .collect();

    state
        .paddocks
        .values_mut()
        .zip(occupants)
        .map(|(paddock, count)| {
            let (updated, change) = advance(paddock, count, rates);
            *paddock = updated;
            change
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Animal, AnimalId, Mob, MobId, PaddockId};
    use chrono::NaiveDate;

    const RATES: PastureRates = PastureRates {
        growth_rate: 65.0,
        consumption_rate: 14.0,
        floor: DryMatterFloor::Clamp,
    };

    #[test]
    fn test_unoccupied_paddock_only_grows() {
        let paddock = Paddock::new(PaddockId(1), "Hill", 10.0, 1500.0);
        let (updated, change) = advance(&paddock, 0, &RATES);

        assert_eq!(updated.total_dm, 15_000.0 + 650.0);
        assert_eq!(updated.dm_per_ha, 1565.0);
        assert!(updated.is_consistent());
        assert!(!change.clamped);
    }

    #[test]
    fn test_occupied_paddock_grows_and_is_grazed() {
        let paddock = Paddock::new(PaddockId(1), "Hill", 10.0, 1500.0);
        let (updated, change) = advance(&paddock, 20, &RATES);

        assert_eq!(updated.total_dm, 15_000.0 + 650.0 - 280.0);
        assert_eq!(change.occupants, 20);
        assert_eq!(change.before_dm, 15_000.0);
        assert!(updated.is_consistent());
    }

    #[test]
    fn test_clamp_policy_floors_at_zero() {
        let paddock = Paddock::new(PaddockId(1), "Bare", 1.0, 10.0);
        let (updated, change) = advance(&paddock, 100, &RATES);

        assert_eq!(updated.total_dm, 0.0);
        assert_eq!(updated.dm_per_ha, 0.0);
        assert!(change.clamped);
    }

    #[test]
    fn test_unclamped_policy_goes_negative() {
        let rates = PastureRates { floor: DryMatterFloor::Unclamped, ..RATES };
        let paddock = Paddock::new(PaddockId(1), "Bare", 1.0, 10.0);
        let (updated, change) = advance(&paddock, 100, &rates);

        assert_eq!(updated.total_dm, 10.0 + 65.0 - 1400.0);
        assert!(updated.dm_per_ha < 0.0);
        assert!(updated.is_consistent());
        assert!(!change.clamped);
    }

    #[test]
    fn test_advance_all_uses_occupying_mob_size() {
        let mut state = FarmState::empty(NaiveDate::from_ymd_opt(2024, 10, 29).unwrap());
        state.paddocks.insert(PaddockId(1), Paddock::new(PaddockId(1), "Hill", 10.0, 100.0));
        state.paddocks.insert(PaddockId(2), Paddock::new(PaddockId(2), "River", 4.0, 100.0));
        state.mobs.insert(
            MobId(1),
            Mob { id: MobId(1), name: "Ewes".into(), paddock_id: Some(PaddockId(2)) },
        );
        for i in 0..3 {
            state.animals.insert(
                AnimalId(i),
                Animal {
                    id: AnimalId(i),
                    mob_id: MobId(1),
                    dob: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
                    weight: 60.0,
                },
            );
        }

        let changes = advance_all(&mut state, &RATES);

        assert_eq!(changes.len(), 2);
        assert_eq!(state.paddocks[&PaddockId(1)].total_dm, 1000.0 + 650.0);
        assert_eq!(state.paddocks[&PaddockId(2)].total_dm, 400.0 + 260.0 - 42.0);
        assert_eq!(changes[1].occupants, 3);
    }
}
