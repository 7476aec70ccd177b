use crate::domain::model::{EditOutcome, FarmState, Paddock, PaddockId, PaddockView, DM_TOLERANCE};
use crate::utils::error::{FarmError, Result};
use crate::utils::validation::{approx_eq, validate_paddock_name, validate_positive};

fn validate_fields(state: &FarmState, own_id: Option<PaddockId>, name: &str, area: f64, dm_per_ha: f64) -> Result<()> {
    validate_positive("area", area)?;
    validate_positive("dm_per_ha", dm_per_ha)?;
    validate_paddock_name(name)?;

    let taken = state
        .paddocks
        .values()
        .any(|p| p.name == name && Some(p.id) != own_id);
    if taken {
        return Err(FarmError::DuplicateName { name: name.to_string() });
    }
    Ok(())
}

pub fn add_paddock(state: &mut FarmState, name: &str, area: f64, dm_per_ha: f64) -> Result<PaddockId> {
    validate_fields(state, None, name, area, dm_per_ha)?;

    let id = state.next_paddock_id()?;
    state.paddocks.insert(id, Paddock::new(id, name, area, dm_per_ha));
    tracing::debug!("Added paddock {} '{}' ({} ha @ {} kg/ha)", id, name, area, dm_per_ha);
    Ok(id)
}

/// Updates a paddock's name, area and density, recomputing its total.
///
/// An edit that matches the stored record (numbers within 0.01) leaves the
/// state untouched and reports [`EditOutcome::Unchanged`].
pub fn edit_paddock(
    state: &mut FarmState,
    id: PaddockId,
    name: &str,
    area: f64,
    dm_per_ha: f64,
) -> Result<EditOutcome> {
    let current = state.paddock(id)?;
    validate_fields(state, Some(id), name, area, dm_per_ha)?;

    if current.name == name
        && approx_eq(current.area, area, DM_TOLERANCE)
        && approx_eq(current.dm_per_ha, dm_per_ha, DM_TOLERANCE)
    {
        tracing::debug!("Edit of paddock {} changes nothing", id);
        return Ok(EditOutcome::Unchanged);
    }

    let paddock = state
        .paddocks
        .get_mut(&id)
        .ok_or_else(|| FarmError::not_found_paddock(id.0))?;
    paddock.name = name.to_string();
    paddock.area = area;
    paddock.dm_per_ha = dm_per_ha;
    paddock.recompute_total();
    Ok(EditOutcome::Updated)
}

/// Paddocks with their occupying mob and its stock count, ordered by name.
pub fn paddock_views(state: &FarmState) -> Vec<PaddockView> {
    let mut views: Vec<PaddockView> = state
        .paddocks
        .values()
        .map(|p| {
            let occupant = state.occupant_of(p.id);
            PaddockView {
                id: p.id,
                name: p.name.clone(),
                area: p.area,
                dm_per_ha: p.dm_per_ha,
                total_dm: p.total_dm,
                mob_name: occupant.map(|m| m.name.clone()),
                stock_count: occupant.map_or(0, |m| state.animal_count(m.id)),
            }
        })
        .collect();
    views.sort_by(|a, b| a.name.cmp(&b.name));
    views
}
