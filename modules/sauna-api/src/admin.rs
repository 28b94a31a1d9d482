//! Catalog maintenance shared by the `sauna-admin` binary.

use chrono::Weekday;
use tracing::info;
use uuid::Uuid;

use sauna_common::schedule::parse_interval;
use sauna_common::{NewSauna, Sauna, SaunaPatch};
use sauna_store::{SaunaStore, StoreError};

#[derive(Debug)]
pub enum SeedOutcome {
    /// The table already had rows; nothing was written.
    AlreadySeeded,
    /// Every entry was inserted. Holds the full catalog ordered by name.
    Seeded(Vec<Sauna>),
}

/// Insert `saunas` in the given order, but only into an empty catalog.
pub async fn seed_catalog<S: SaunaStore + ?Sized>(
    store: &S,
    saunas: Vec<NewSauna>,
) -> Result<SeedOutcome, StoreError> {
    if !store.list_all().await?.is_empty() {
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let total = saunas.len();
    for (i, sauna) in saunas.into_iter().enumerate() {
        info!(position = i + 1, total, name = %sauna.name, "Seeding sauna");
        store.insert(sauna).await?;
    }

    Ok(SeedOutcome::Seeded(store.list_all().await?))
}

/// Accepts exactly what the open-now check understands: `closed` or an interval.
pub fn is_valid_hours_entry(entry: &str) -> bool {
    entry.eq_ignore_ascii_case("closed") || parse_interval(entry).is_some()
}

/// Replace one weekday's entry, keeping the rest of the table.
pub async fn set_day_hours<S: SaunaStore + ?Sized>(
    store: &S,
    id: Uuid,
    day: Weekday,
    hours: &str,
) -> Result<Sauna, StoreError> {
    let hours = hours.trim();
    if !is_valid_hours_entry(hours) {
        return Err(StoreError::Validation(format!(
            "hours must be HH:MM-HH:MM or closed, got: {hours}"
        )));
    }

    let current = store.get_by_id(id).await?.ok_or(StoreError::NotFound)?;
    let mut table = current.opening_hours;
    table.set(day, hours);

    let patch = SaunaPatch {
        opening_hours: Some(table),
        ..Default::default()
    };
    let updated = store.update(id, patch).await?;
    info!(sauna = %updated.name, ?day, hours, "Updated opening hours");
    Ok(updated)
}
