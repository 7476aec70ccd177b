use crate::domain::model::{Age, Animal, AnimalView, Mob, MobGroup, MobView, Paddock, PaddockId};
use crate::utils::error::{FarmError, Result};
use chrono::{Datelike, Months, NaiveDate};
use std::collections::{BTreeMap, HashMap};

/// Calendar difference between `dob` and `as_of`.
///
/// Months are counted whole; the remaining days run from the last
/// month-anniversary of `dob` (clamped to month end) up to `as_of`.
pub fn age_between(dob: NaiveDate, as_of: NaiveDate) -> Result<Age> {
    if dob > as_of {
        return Err(FarmError::InvalidDate {
            message: format!("date of birth {} is after {}", dob, as_of),
        });
    }

    let mut months = (as_of.year() - dob.year()) * 12 + as_of.month() as i32 - dob.month() as i32;
    if as_of.day() < dob.day() {
        months -= 1;
    }
    // dob <= as_of keeps this non-negative
    let months = months.max(0) as u32;

    let anniversary = dob
        .checked_add_months(Months::new(months))
        .ok_or_else(|| FarmError::InvalidDate {
            message: format!("age of animal born {} is out of range", dob),
        })?;
    let days = (as_of - anniversary).num_days().max(0) as u32;

    Ok(Age {
        years: months / 12,
        months: months % 12,
        days,
    })
}

pub fn animal_view(animal: &Animal, as_of: NaiveDate) -> Result<AnimalView> {
    let age = age_between(animal.dob, as_of).map_err(|_| FarmError::InvalidDate {
        message: format!(
            "animal {} has date of birth {} after {}",
            animal.id, animal.dob, as_of
        ),
    })?;
    Ok(AnimalView {
        id: animal.id,
        dob: animal.dob,
        weight: animal.weight,
        age,
        age_years: age.years,
    })
}

/// Groups animals by mob with count and mean weight.
///
/// Groups come out in mob-name order and animals in id order. Mobs without
/// animals still get a group, with no average.
pub fn aggregate<'a>(
    mobs: impl IntoIterator<Item = &'a Mob>,
    animals: impl IntoIterator<Item = &'a Animal>,
    paddocks: &BTreeMap<PaddockId, Paddock>,
    as_of: NaiveDate,
) -> Result<Vec<MobGroup>> {
    let mut by_mob: HashMap<_, Vec<&Animal>> = HashMap::new();
    for animal in animals {
        by_mob.entry(animal.mob_id).or_default().push(animal);
    }

    let mut mobs: Vec<&Mob> = mobs.into_iter().collect();
    mobs.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    let mut groups = Vec::with_capacity(mobs.len());
    for mob in mobs {
        let mut members = by_mob.remove(&mob.id).unwrap_or_default();
        members.sort_by_key(|a| a.id);

        let animals = members
            .iter()
            .map(|a| animal_view(a, as_of))
            .collect::<Result<Vec<_>>>()?;

        let count = animals.len();
        let avg_weight = (count > 0)
            .then(|| animals.iter().map(|a| a.weight).sum::<f64>() / count as f64);

        groups.push(MobGroup {
            mob: MobView {
                id: mob.id,
                name: mob.name.clone(),
                paddock_id: mob.paddock_id,
                paddock_name: mob
                    .paddock_id
                    .and_then(|id| paddocks.get(&id))
                    .map(|p| p.name.clone()),
            },
            animals,
            count,
            avg_weight,
        });
    }

    Ok(groups)
}

/// Renders a stock report as CSV, one row per animal.
pub fn to_csv(groups: &[MobGroup]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "mob", "paddock", "animal_id", "dob", "age_years", "age", "weight", "mob_avg_weight",
    ])?;

    for group in groups {
        let paddock = group.mob.paddock_name.clone().unwrap_or_default();
        let avg = group.avg_weight.map(|w| format!("{:.1}", w)).unwrap_or_default();
        for animal in &group.animals {
            writer.write_record([
                group.mob.name.clone(),
                paddock.clone(),
                animal.id.to_string(),
                animal.dob.to_string(),
                animal.age_years.to_string(),
                animal.age.to_string(),
                format!("{:.1}", animal.weight),
                avg.clone(),
            ])?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| FarmError::PersistenceFailure {
        message: format!("flushing CSV report: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| FarmError::PersistenceFailure {
        message: format!("CSV report is not UTF-8: {}", e),
    })
}
