//! Answers "how many labour-hours exist on date D?" using persisted
//! per-date overrides with a weekday-default fallback.

use chrono::{Datelike, NaiveDate};
use kilnsched_core::{
    default_hours_for_weekday, AvailabilityEntry, AvailabilityUpdate, SchedulerError,
    SchedulerResult,
};
use kilnsched_store::SchedulerStore;

pub struct AvailabilityService<'a> {
    store: &'a mut dyn SchedulerStore,
}

impl<'a> AvailabilityService<'a> {
    pub fn new(store: &'a mut dyn SchedulerStore) -> Self {
        Self { store }
    }

    /// Labour-hours available on `date`: the persisted override if one
    /// exists, otherwise the weekday default.
    pub fn for_date(&mut self, date: NaiveDate) -> SchedulerResult<f64> {
        let overrides = self.store.get_availability(date, date)?;
        Ok(overrides
            .first()
            .map(|o| o.available_hours)
            .unwrap_or_else(|| default_hours_for_weekday(date.weekday())))
    }

    /// One entry per date in `[start, end]`, each flagged `is_default` when
    /// it fell back to the weekday table.
    pub fn for_range(&mut self, start: NaiveDate, end: NaiveDate) -> SchedulerResult<Vec<AvailabilityEntry>> {
        let overrides = self.store.get_availability(start, end)?;

        let mut entries = Vec::new();
        let mut date = start;
        while date <= end {
            if let Some(over) = overrides.iter().find(|o| o.date == date) {
                entries.push(AvailabilityEntry {
                    date,
                    available_hours: over.available_hours,
                    notes: over.notes.clone(),
                    is_default: false,
                });
            } else {
                entries.push(AvailabilityEntry {
                    date,
                    available_hours: default_hours_for_weekday(date.weekday()),
                    notes: None,
                    is_default: true,
                });
            }
            date += chrono::Duration::days(1);
        }
        Ok(entries)
    }

    /// Persists overrides by date, after validating the input contract.
    pub fn upsert(&mut self, items: Vec<AvailabilityUpdate>) -> SchedulerResult<Vec<AvailabilityEntry>> {
        for item in &items {
            if item.available_hours < 0.0 {
                return Err(SchedulerError::Validation(format!(
                    "available_hours must be >= 0, got {} for {}",
                    item.available_hours, item.date
                )));
            }
        }

        let stored = self.store.upsert_availability(&items)?;
        Ok(stored
            .into_iter()
            .map(|o| AvailabilityEntry {
                date: o.date,
                available_hours: o.available_hours,
                notes: o.notes,
                is_default: false,
            })
            .collect())
    }
}
