use crate::domain::model::{FarmState, MobId, MobView, Occupancy, Paddock, PaddockId};
use crate::utils::error::{FarmError, Result};

/// Moves `mob_id` into `target`, refusing if another mob already grazes there.
///
/// Runs against a single draft state, so the occupancy check and the
/// reassignment cannot be interleaved with another relocation.
pub fn relocate(state: &mut FarmState, mob_id: MobId, target: PaddockId) -> Result<()> {
    let paddock_name = state.paddock(target)?.name.clone();
    state.mob(mob_id)?;

    if let Some(occupant) = state.occupant_of(target).filter(|m| m.id != mob_id) {
        return Err(FarmError::PaddockOccupied {
            paddock: paddock_name,
            occupant: occupant.name.clone(),
        });
    }

    let mob = state
        .mobs
        .get_mut(&mob_id)
        .ok_or_else(|| FarmError::not_found_mob(mob_id.0))?;
    let from = mob.paddock_id.replace(target);
    tracing::debug!("Mob '{}' moved from {:?} to paddock {}", mob.name, from, target);
    Ok(())
}

/// Paddocks no mob references, ordered by name.
pub fn available_paddocks(state: &FarmState) -> Vec<Paddock> {
    let mut free: Vec<Paddock> = state
        .paddocks
        .values()
        .filter(|p| state.occupant_of(p.id).is_none())
        .cloned()
        .collect();
    free.sort_by(|a, b| a.name.cmp(&b.name));
    free
}

pub fn current_distribution(state: &FarmState) -> Vec<Occupancy> {
    let mut rows: Vec<Occupancy> = state
        .paddocks
        .values()
        .map(|p| {
            let mob = state.occupant_of(p.id);
            Occupancy {
                paddock_id: p.id,
                paddock_name: p.name.clone(),
                mob: mob.map(|m| (m.id, m.name.clone())),
                stock_count: mob.map_or(0, |m| state.animal_count(m.id)),
            }
        })
        .collect();
    rows.sort_by(|a, b| a.paddock_name.cmp(&b.paddock_name));
    rows
}

/// Mobs with the name of the paddock they occupy, ordered by mob name.
pub fn mob_views(state: &FarmState) -> Vec<MobView> {
    let mut views: Vec<MobView> = state
        .mobs
        .values()
        .map(|m| MobView {
            id: m.id,
            name: m.name.clone(),
            paddock_id: m.paddock_id,
            paddock_name: m
                .paddock_id
                .and_then(|id| state.paddocks.get(&id))
                .map(|p| p.name.clone()),
        })
        .collect();
    views.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Animal, AnimalId, Mob};
    use chrono::NaiveDate;

    fn farm() -> FarmState {
        let mut state = FarmState::empty(NaiveDate::from_ymd_opt(2024, 10, 29).unwrap());
        for (id, name) in [(1, "Hill"), (2, "River"), (3, "Barn")] {
            state
                .paddocks
                .insert(PaddockId(id), Paddock::new(PaddockId(id), name, 10.0, 1000.0));
        }
        state.mobs.insert(MobId(1), Mob { id: MobId(1), name: "Ewes".into(), paddock_id: None });
        state.mobs.insert(MobId(2), Mob { id: MobId(2), name: "Bulls".into(), paddock_id: None });
        state.animals.insert(
            AnimalId(7),
            Animal {
                id: AnimalId(7),
                mob_id: MobId(1),
                dob: NaiveDate::from_ymd_opt(2021, 9, 1).unwrap(),
                weight: 70.0,
            },
        );
        state
    }

    #[test]
    fn test_relocate_into_free_paddock() {
        let mut state = farm();
        relocate(&mut state, MobId(1), PaddockId(2)).unwrap();
        assert_eq!(state.mobs[&MobId(1)].paddock_id, Some(PaddockId(2)));
    }

    #[test]
    fn test_relocate_into_occupied_paddock_fails() {
        let mut state = farm();
        relocate(&mut state, MobId(1), PaddockId(2)).unwrap();
        let err = relocate(&mut state, MobId(2), PaddockId(2)).unwrap_err();

        assert!(matches!(err, FarmError::PaddockOccupied { .. }));
        assert_eq!(state.mobs[&MobId(2)].paddock_id, None);
        assert_eq!(state.mobs[&MobId(1)].paddock_id, Some(PaddockId(2)));
    }

    #[test]
    fn test_relocate_to_own_paddock_is_ok() {
        let mut state = farm();
        relocate(&mut state, MobId(1), PaddockId(2)).unwrap();
        assert!(relocate(&mut state, MobId(1), PaddockId(2)).is_ok());
    }

    #[test]
    fn test_vacated_paddock_becomes_available() {
        let mut state = farm();
        relocate(&mut state, MobId(1), PaddockId(2)).unwrap();
        relocate(&mut state, MobId(1), PaddockId(1)).unwrap();
        relocate(&mut state, MobId(2), PaddockId(2)).unwrap();

        let free: Vec<String> = available_paddocks(&state).into_iter().map(|p| p.name).collect();
        assert_eq!(free, vec!["Barn".to_string()]);
    }

    #[test]
    fn test_relocate_unknown_ids() {
        let mut state = farm();
        assert!(matches!(
            relocate(&mut state, MobId(9), PaddockId(1)),
            Err(FarmError::NotFound { entity: "Mob", .. })
        ));
        assert!(matches!(
            relocate(&mut state, MobId(1), PaddockId(9)),
            Err(FarmError::NotFound { entity: "Paddock", .. })
        ));
    }

    #[test]
    fn test_current_distribution_reports_counts() {
        let mut state = farm();
        relocate(&mut state, MobId(1), PaddockId(1)).unwrap();

        let rows = current_distribution(&state);
        let hill = rows.iter().find(|r| r.paddock_name == "Hill").unwrap();
        assert_eq!(hill.mob, Some((MobId(1), "Ewes".to_string())));
        assert_eq!(hill.stock_count, 1);
        assert!(rows.iter().filter(|r| r.mob.is_none()).count() == 2);
    }

    #[test]
    fn test_mob_views_ordered_by_name() {
        let mut state = farm();
        relocate(&mut state, MobId(1), PaddockId(3)).unwrap();
        let views = mob_views(&state);
        assert_eq!(views[0].name, "Bulls");
        assert_eq!(views[1].paddock_name.as_deref(), Some("Barn"));
    }
}
