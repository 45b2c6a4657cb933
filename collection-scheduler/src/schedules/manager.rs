//! Schedule lifecycle: creation, status and frequency changes, batch advance.
//!
//! CANCELLED and COMPLETED are absorbing. Every transition that ends a
//! schedule's current occurrence soft-cancels its active collection; every
//! transition that sets a new date asks the generator for a collection.

use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::SchedulerConfig;
use crate::domain::{
    CollectionId, Customer, CustomerId, Frequency, Recurrence, Schedule, ScheduleDraft,
    ScheduleId, ScheduleKind, ScheduleStatus, WasteType,
};
use crate::outcome::{Outcome, Rejection};
use crate::store::Storage;

use super::{CalendarError, CollectionGenerator, RecurringDateCalculator, ScheduleError};

/// What a batch advance did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdvanceReport {
    /// Schedules whose next date was moved forward.
    pub advanced: Vec<ScheduleId>,
    /// Collections created for schedules that had none upcoming.
    pub generated: Vec<CollectionId>,
    /// Schedules left untouched because their date could not be computed.
    pub skipped: Vec<ScheduleId>,
}

/// Applies schedule operations against a store.
pub struct ScheduleManager<'a, S: ?Sized> {
    store: &'a mut S,
    clock: &'a dyn Clock,
    calculator: RecurringDateCalculator,
    generator: CollectionGenerator,
    cancel_limit: chrono::Duration,
}

impl<'a, S: Storage + ?Sized> ScheduleManager<'a, S> {
    pub fn new(store: &'a mut S, clock: &'a dyn Clock, config: &SchedulerConfig) -> Self {
        Self {
            store,
            clock,
            calculator: RecurringDateCalculator::from_config(config),
            generator: CollectionGenerator::new(config.cancel_limit_days),
            cancel_limit: config.cancel_limit(),
        }
    }

    /// Create a recurring schedule and its first collection.
    ///
    /// `start` may be today but not earlier. The first occurrence is the
    /// waste type's weekday on or after `start` plus the lead time.
    pub fn create_recurring_schedule(
        &mut self,
        customer: CustomerId,
        waste: WasteType,
        start: NaiveDate,
        frequency: Frequency,
    ) -> Result<Schedule, ScheduleError> {
        let today = self.clock.today();
        if start < today {
            return Err(ScheduleError::StartDateInPast { start, today });
        }
        let customer = self.customer(customer)?;
        let weekday = self.weekday(&waste)?;
        let next = self.calculator.first_occurrence(start, weekday)?;

        let schedule = self.store.save_schedule(ScheduleDraft {
            customer: customer.id,
            postal_code: customer.postal_code,
            waste,
            created_on: today,
            kind: ScheduleKind::Recurring(Recurrence {
                frequency,
                start_date: start,
                next_collection_date: Some(next),
            }),
        })?;
        self.generator
            .generate_for(&mut *self.store, &schedule, today)?;

        info!(
            schedule = %schedule.id,
            waste = %schedule.waste,
            ?frequency,
            %next,
            "recurring schedule created"
        );
        Ok(schedule)
    }

    /// Create a one-time pickup and its collection.
    ///
    /// The pickup must be at least the cancel limit away from today.
    pub fn create_one_time_schedule(
        &mut self,
        customer: CustomerId,
        waste: WasteType,
        pickup_date: NaiveDate,
    ) -> Result<Schedule, ScheduleError> {
        let today = self.clock.today();
        let earliest = self.earliest_changeable(today)?;
        if pickup_date < earliest {
            return Err(ScheduleError::PickupTooSoon {
                pickup: pickup_date,
                earliest,
            });
        }
        let customer = self.customer(customer)?;

        let schedule = self.store.save_schedule(ScheduleDraft {
            customer: customer.id,
            postal_code: customer.postal_code,
            waste,
            created_on: today,
            kind: ScheduleKind::OneTime { pickup_date },
        })?;
        self.generator
            .generate_for(&mut *self.store, &schedule, today)?;

        info!(schedule = %schedule.id, pickup = %pickup_date, "one-time schedule created");
        Ok(schedule)
    }

    /// Cancel a one-time pickup and its collection.
    ///
    /// Refused once the pickup is closer than the cancel limit.
    pub fn cancel_one_time_schedule(
        &mut self,
        id: ScheduleId,
    ) -> Result<Outcome<Schedule>, ScheduleError> {
        let Some(mut schedule) = self.store.find_schedule(id)? else {
            return Ok(Outcome::NotFound);
        };
        let ScheduleKind::OneTime { pickup_date } = schedule.kind else {
            return Ok(self.reject(id, Rejection::WrongScheduleKind));
        };
        if schedule.status.is_closed() {
            return Ok(self.reject(id, Rejection::ScheduleClosed(schedule.status)));
        }
        let today = self.clock.today();
        if pickup_date < self.earliest_changeable(today)? {
            return Ok(self.reject(id, Rejection::CancelWindowPassed));
        }

        schedule.status = ScheduleStatus::Cancelled;
        self.store.update_schedule(&schedule)?;
        self.cancel_upcoming_collections(id, today)?;

        info!(schedule = %id, "one-time schedule cancelled");
        Ok(Outcome::Applied(schedule))
    }

    /// Move a recurring schedule to `status`.
    ///
    /// | from   | to        | effect                                        |
    /// |--------|-----------|-----------------------------------------------|
    /// | PAUSED | CANCELLED | status only                                   |
    /// | PAUSED | ACTIVE    | keep or recompute the date, generate          |
    /// | ACTIVE | PAUSED    | soft-cancel upcoming collections              |
    /// | ACTIVE | CANCELLED | soft-cancel upcoming collections              |
    ///
    /// Anything else is rejected.
    pub fn update_status(
        &mut self,
        id: ScheduleId,
        status: ScheduleStatus,
    ) -> Result<Outcome<Schedule>, ScheduleError> {
        let Some(mut schedule) = self.store.find_schedule(id)? else {
            return Ok(Outcome::NotFound);
        };
        let current = schedule.status;
        let ScheduleKind::Recurring(recurrence) = &mut schedule.kind else {
            return Ok(self.reject(id, Rejection::WrongScheduleKind));
        };
        if current.is_closed() {
            return Ok(self.reject(id, Rejection::ScheduleClosed(current)));
        }

        let today = self.clock.today();
        match (current, status) {
            (ScheduleStatus::Paused, ScheduleStatus::Cancelled) => {
                schedule.status = status;
                self.store.update_schedule(&schedule)?;
            }
            (ScheduleStatus::Paused, ScheduleStatus::Active) => {
                let weekday = self.weekday(&schedule.waste)?;
                let next = self.resume_date(recurrence, weekday, today)?;
                recurrence.next_collection_date = Some(next);
                schedule.status = status;
                self.store.update_schedule(&schedule)?;
                self.generator
                    .generate_for(&mut *self.store, &schedule, today)?;
            }
            (ScheduleStatus::Active, ScheduleStatus::Paused | ScheduleStatus::Cancelled) => {
                schedule.status = status;
                self.store.update_schedule(&schedule)?;
                self.cancel_upcoming_collections(id, today)?;
            }
            (from, to) => {
                return Ok(self.reject(id, Rejection::InvalidScheduleTransition { from, to }));
            }
        }

        info!(schedule = %id, from = %current, to = %status, "schedule status changed");
        Ok(Outcome::Applied(schedule))
    }

    /// Switch an active recurring schedule to a different frequency.
    ///
    /// The schedule restarts from a fresh first occurrence counted from
    /// today; pending collections are replaced.
    pub fn update_frequency(
        &mut self,
        id: ScheduleId,
        frequency: Frequency,
    ) -> Result<Outcome<Schedule>, ScheduleError> {
        let Some(mut schedule) = self.store.find_schedule(id)? else {
            return Ok(Outcome::NotFound);
        };
        let status = schedule.status;
        let ScheduleKind::Recurring(recurrence) = &mut schedule.kind else {
            return Ok(self.reject(id, Rejection::WrongScheduleKind));
        };
        if status != ScheduleStatus::Active {
            return Ok(self.reject(id, Rejection::ScheduleNotActive(status)));
        }
        if recurrence.frequency == frequency {
            return Ok(self.reject(id, Rejection::FrequencyUnchanged));
        }

        let today = self.clock.today();
        let weekday = self.weekday(&schedule.waste)?;
        let next = self.calculator.first_occurrence(today, weekday)?;
        recurrence.frequency = frequency;
        recurrence.next_collection_date = Some(next);

        self.store.update_schedule(&schedule)?;
        self.cancel_upcoming_collections(id, today)?;
        self.generator
            .generate_for(&mut *self.store, &schedule, today)?;

        info!(schedule = %id, ?frequency, %next, "schedule frequency changed");
        Ok(Outcome::Applied(schedule))
    }

    /// Batch entry point: move overdue schedules forward, then make sure
    /// every active recurring schedule has an upcoming collection.
    ///
    /// The second pass is idempotent, so re-running after a failure between
    /// the two passes repairs the gap. A schedule whose date cannot be
    /// computed is skipped and reported; storage failures abort the batch.
    pub fn advance_due_schedules(&mut self) -> Result<AdvanceReport, ScheduleError> {
        let today = self.clock.today();
        let mut report = AdvanceReport::default();

        for mut schedule in self.store.active_schedules_with_next_date_before(today)? {
            let id = schedule.id;
            let weekday = match self.weekday(&schedule.waste) {
                Ok(weekday) => weekday,
                Err(ScheduleError::NoWeekdayRule(waste)) => {
                    warn!(schedule = %id, %waste, "skipping schedule: no weekday rule");
                    report.skipped.push(id);
                    continue;
                }
                Err(err) => return Err(err),
            };
            let ScheduleKind::Recurring(recurrence) = &mut schedule.kind else {
                continue;
            };
            let next = match self.calculator.next_occurrence(recurrence, weekday, today) {
                Ok(next) => next,
                Err(err) => {
                    warn!(schedule = %id, error = %err, "skipping schedule");
                    report.skipped.push(id);
                    continue;
                }
            };
            recurrence.next_collection_date = Some(next);
            self.store.update_schedule(&schedule)?;
            debug!(schedule = %id, %next, "schedule advanced");
            report.advanced.push(id);
        }

        for schedule in self.store.active_schedules_without_future_collections(today)? {
            if let Some(collection) = self
                .generator
                .generate_for(&mut *self.store, &schedule, today)?
            {
                report.generated.push(collection.id);
            }
        }

        info!(
            %today,
            advanced = report.advanced.len(),
            generated = report.generated.len(),
            skipped = report.skipped.len(),
            "due schedules advanced"
        );
        Ok(report)
    }

    /// Follow up on a finished collection.
    ///
    /// A recurring schedule moves to its next occurrence (unless it already
    /// has) and gets a collection for it; a one-time schedule is completed.
    pub fn reschedule_after(
        &mut self,
        collection: CollectionId,
    ) -> Result<Outcome<Schedule>, ScheduleError> {
        let Some(collection) = self.store.find_collection(collection)? else {
            return Ok(Outcome::NotFound);
        };
        let Some(mut schedule) = self.store.find_schedule(collection.schedule)? else {
            return Ok(Outcome::NotFound);
        };
        let id = schedule.id;
        let status = schedule.status;
        if status.is_closed() {
            return Ok(self.reject(id, Rejection::ScheduleClosed(status)));
        }

        if !schedule.is_recurring() {
            schedule.status = ScheduleStatus::Completed;
            self.store.update_schedule(&schedule)?;
            info!(schedule = %id, "one-time schedule completed");
            return Ok(Outcome::Applied(schedule));
        }

        if status != ScheduleStatus::Active {
            return Ok(self.reject(id, Rejection::ScheduleNotActive(status)));
        }
        let today = self.clock.today();
        let weekday = self.weekday(&schedule.waste)?;
        let ScheduleKind::Recurring(recurrence) = &mut schedule.kind else {
            return Ok(self.reject(id, Rejection::WrongScheduleKind));
        };

        let already_past = recurrence
            .next_collection_date
            .is_some_and(|next| next > collection.date);
        if !already_past {
            let next = self.calculator.next_occurrence(recurrence, weekday, today)?;
            recurrence.next_collection_date = Some(next);
            self.store.update_schedule(&schedule)?;
            info!(schedule = %id, %next, "schedule rescheduled");
        }
        self.generator
            .generate_for(&mut *self.store, &schedule, today)?;

        Ok(Outcome::Applied(schedule))
    }

    fn resume_date(
        &self,
        recurrence: &Recurrence,
        weekday: Weekday,
        today: NaiveDate,
    ) -> Result<NaiveDate, CalendarError> {
        match recurrence.next_collection_date {
            Some(next) if next >= today => Ok(next),
            Some(_) => self.calculator.next_occurrence(recurrence, weekday, today),
            None => self
                .calculator
                .first_occurrence(recurrence.start_date.max(today), weekday),
        }
    }

    fn earliest_changeable(&self, today: NaiveDate) -> Result<NaiveDate, CalendarError> {
        today
            .checked_add_signed(self.cancel_limit)
            .ok_or(CalendarError(today))
    }

    /// Soft-cancel every active collection of `schedule` dated today or
    /// later. Missed past pickups are left for their trips to settle.
    fn cancel_upcoming_collections(
        &mut self,
        schedule: ScheduleId,
        today: NaiveDate,
    ) -> Result<(), ScheduleError> {
        let upcoming = self
            .store
            .active_collections_for_schedule(schedule)?
            .into_iter()
            .filter(|c| c.date >= today);
        for collection in upcoming {
            let outcome = self.generator.soft_cancel(&mut *self.store, collection.id)?;
            if !outcome.is_applied() {
                warn!(%schedule, collection = %collection.id, "active collection not cancelled");
            }
        }
        Ok(())
    }

    fn customer(&self, id: CustomerId) -> Result<Customer, ScheduleError> {
        self.store
            .find_customer(id)?
            .ok_or(ScheduleError::UnknownCustomer(id))
    }

    fn weekday(&self, waste: &WasteType) -> Result<Weekday, ScheduleError> {
        self.store
            .weekday_rule(waste)?
            .map(|rule| rule.weekday)
            .ok_or_else(|| ScheduleError::NoWeekdayRule(waste.clone()))
    }

    fn reject(&self, id: ScheduleId, reason: Rejection) -> Outcome<Schedule> {
        warn!(schedule = %id, %reason, "schedule transition rejected");
        Outcome::Rejected(reason)
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
