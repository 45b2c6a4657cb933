//! Materializing pickups from schedules.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::domain::{Collection, CollectionDraft, CollectionId, CollectionStatus, Schedule};
use crate::outcome::{Outcome, Rejection};
use crate::store::{CollectionStore, StoreResult};

/// Creates and soft-cancels collections.
///
/// Generation is idempotent: a schedule that already has an active
/// collection dated today or later gets no second one. Running it again
/// after a partial failure only fills the gaps.
#[derive(Debug, Clone, Copy)]
pub struct CollectionGenerator {
    cancel_limit_days: u32,
}

impl CollectionGenerator {
    pub fn new(cancel_limit_days: u32) -> Self {
        Self { cancel_limit_days }
    }

    /// Create the collection for the schedule's current date, if that date
    /// is strictly after `today` and no such collection exists yet.
    pub fn generate_for<S>(
        &self,
        store: &mut S,
        schedule: &Schedule,
        today: NaiveDate,
    ) -> StoreResult<Option<Collection>>
    where
        S: CollectionStore + ?Sized,
    {
        let Some(date) = schedule.collection_date() else {
            debug!(schedule = %schedule.id, "no collection date, nothing to generate");
            return Ok(None);
        };
        if date <= today {
            debug!(schedule = %schedule.id, %date, "collection date not in the future");
            return Ok(None);
        }

        let existing = store.collections_by_schedule(schedule.id)?;
        if existing.iter().any(|c| c.is_active() && c.date >= today) {
            debug!(schedule = %schedule.id, "future collection already exists");
            return Ok(None);
        }

        let collection = store.save_collection(CollectionDraft {
            schedule: schedule.id,
            customer: schedule.customer,
            postal_code: schedule.postal_code.clone(),
            waste: schedule.waste.clone(),
            date,
            cancel_limit_days: self.cancel_limit_days,
        })?;
        info!(
            schedule = %schedule.id,
            collection = %collection.id,
            %date,
            "collection generated"
        );
        Ok(Some(collection))
    }

    /// Mark a collection cancelled. Only active collections can be cancelled.
    pub fn soft_cancel<S>(&self, store: &mut S, id: CollectionId) -> StoreResult<Outcome<Collection>>
    where
        S: CollectionStore + ?Sized,
    {
        let Some(mut collection) = store.find_collection(id)? else {
            return Ok(Outcome::NotFound);
        };
        if !collection.is_active() {
            return Ok(Outcome::Rejected(Rejection::CollectionNotActive {
                collection: id,
                status: collection.status,
            }));
        }

        collection.status = CollectionStatus::Cancelled;
        store.update_collection(&collection)?;
        info!(collection = %id, date = %collection.date, "collection cancelled");
        Ok(Outcome::Applied(collection))
    }
}
