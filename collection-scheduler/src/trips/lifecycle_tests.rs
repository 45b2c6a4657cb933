//! Unit tests for the trip lifecycle.

use super::*;
use crate::domain::{
    CollectionDraft, CustomerId, LicenceClass, LicenceGrade, Role, ScheduleId, VehicleStatus,
    WasteType,
};
use crate::outcome::ErrorKind;
use crate::store::{CollectionStore, InMemoryStore, StoreError, TripStore};
use chrono::NaiveDate;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

fn window(from: u32, to: u32) -> TimeWindow {
    TimeWindow::new(
        date().and_hms_opt(from, 0, 0).unwrap(),
        date().and_hms_opt(to, 0, 0).unwrap(),
    )
    .unwrap()
}

fn vehicle(id: u32, required_licence: LicenceClass, required_operators: usize) -> Vehicle {
    Vehicle {
        id: VehicleId(id),
        plate: format!("AB{id:03}CD"),
        required_licence,
        required_operators,
        status: VehicleStatus::InService,
        next_maintenance: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
    }
}

fn employee(id: u32, role: Role, licence: LicenceGrade) -> Employee {
    Employee {
        id: EmployeeId(id),
        name: format!("Employee {id}"),
        role,
        licence,
    }
}

/// Vehicles:
/// - V1: C1, crew of 2
/// - V2: B, crew of 1
/// - V3: C, crew of 3, in maintenance
///
/// Employees:
/// - E1: C, E2: B, E3: none, E4: C1 (operators)
/// - E5: administrator, E6: office worker
fn store() -> InMemoryStore {
    let mut s = InMemoryStore::new();
    s.insert_vehicle(vehicle(1, LicenceClass::C1, 2));
    s.insert_vehicle(vehicle(2, LicenceClass::B, 1));
    let mut v3 = vehicle(3, LicenceClass::C, 3);
    v3.status = VehicleStatus::InMaintenance;
    s.insert_vehicle(v3);

    s.insert_employee(employee(1, Role::Operator, LicenceGrade::C));
    s.insert_employee(employee(2, Role::Operator, LicenceGrade::B));
    s.insert_employee(employee(3, Role::Operator, LicenceGrade::None));
    s.insert_employee(employee(4, Role::Operator, LicenceGrade::C1));
    s.insert_employee(employee(5, Role::Administrator, LicenceGrade::None));
    s.insert_employee(employee(6, Role::OfficeWorker, LicenceGrade::None));
    s
}

fn request(vehicle: u32, crew: &[u32], w: TimeWindow) -> NewTrip {
    NewTrip {
        postal_code: "40100".into(),
        vehicle: Some(VehicleId(vehicle)),
        crew: crew.iter().map(|id| EmployeeId(*id)).collect(),
        window: Some(w),
        status: TripStatus::Active,
        collections: vec![],
    }
}

fn add_collection(s: &mut InMemoryStore) -> CollectionId {
    s.save_collection(CollectionDraft {
        schedule: ScheduleId(1),
        customer: CustomerId(1),
        postal_code: "40100".into(),
        waste: WasteType::new("Plastic"),
        date: date(),
        cancel_limit_days: 2,
    })
    .unwrap()
    .id
}

// Creation

#[test]
fn create_active_trip() {
    let mut s = store();
    let trip = TripManager::new(&mut s)
        .create_trip(request(1, &[4, 3], window(8, 12)))
        .unwrap();

    assert_eq!(trip.status, TripStatus::Active);
    assert_eq!(trip.crew.members(), &[EmployeeId(4), EmployeeId(3)]);
    assert_eq!(s.find_trip(trip.id).unwrap(), Some(trip));
}

#[test]
fn postal_code_is_trimmed_and_required() {
    let mut s = store();
    let mut req = request(2, &[2], window(8, 12));
    req.postal_code = "  40100 ".into();
    let trip = TripManager::new(&mut s).create_trip(req).unwrap();
    assert_eq!(trip.postal_code, "40100");

    let mut req = request(2, &[2], window(13, 14));
    req.postal_code = "   ".into();
    let err = TripManager::new(&mut s).create_trip(req).unwrap_err();
    assert_eq!(err, TripError::EmptyPostalCode);
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn missing_fields_are_invalid_input() {
    let mut s = store();
    let mut m = TripManager::new(&mut s);

    let mut req = request(1, &[4, 3], window(8, 12));
    req.vehicle = None;
    let err = m.create_trip(req).unwrap_err();
    assert_eq!(err, TripError::Crew(CrewError::MissingField("vehicle")));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = m.create_trip(request(1, &[], window(8, 12))).unwrap_err();
    assert_eq!(err, TripError::Crew(CrewError::MissingField("driver")));

    let mut req = request(1, &[4, 3], window(8, 12));
    req.window = None;
    let err = m.create_trip(req).unwrap_err();
    assert_eq!(err, TripError::Crew(CrewError::MissingField("window")));
}

#[test]
fn b_driver_cannot_take_c1_vehicle() {
    let mut s = store();
    let err = TripManager::new(&mut s)
        .create_trip(request(1, &[2, 3], window(8, 12)))
        .unwrap_err();

    assert_eq!(
        err,
        TripError::Crew(CrewError::LicenceMismatch {
            driver: EmployeeId(2),
            grade: LicenceGrade::B,
            required: LicenceClass::C1,
        })
    );
    assert_eq!(err.kind(), ErrorKind::RuleViolation);
    assert!(s.all_trips().unwrap().is_empty());
}

#[test]
fn crew_size_must_be_exact() {
    let mut s = store();
    let mut m = TripManager::new(&mut s);

    let err = m.create_trip(request(1, &[4], window(8, 12))).unwrap_err();
    assert_eq!(
        err,
        TripError::Crew(CrewError::CrewSizeMismatch {
            required: 2,
            actual: 1
        })
    );

    let err = m.create_trip(request(1, &[4, 3, 2], window(8, 12))).unwrap_err();
    assert_eq!(
        err,
        TripError::Crew(CrewError::CrewSizeMismatch {
            required: 2,
            actual: 3
        })
    );
}

#[test]
fn unknown_references_are_not_found() {
    let mut s = store();
    let mut m = TripManager::new(&mut s);

    let err = m.create_trip(request(9, &[4, 3], window(8, 12))).unwrap_err();
    assert_eq!(err, TripError::UnknownVehicle(VehicleId(9)));
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = m.create_trip(request(1, &[4, 9], window(8, 12))).unwrap_err();
    assert_eq!(err, TripError::UnknownEmployee(EmployeeId(9)));
}

#[test]
fn vehicle_in_maintenance_rejected() {
    let mut s = store();
    let err = TripManager::new(&mut s)
        .create_trip(request(3, &[1, 2, 3], window(8, 12)))
        .unwrap_err();
    assert_eq!(err, TripError::VehicleNotEligible(VehicleId(3)));
}

#[test]
fn terminal_initial_status_rejected() {
    let mut s = store();
    let mut req = request(2, &[2], window(8, 12));
    req.status = TripStatus::Completed;
    let err = TripManager::new(&mut s).create_trip(req).unwrap_err();
    assert_eq!(err, TripError::InvalidInitialStatus(TripStatus::Completed));
}

// Availability

#[test]
fn overlapping_trip_blocks_vehicle_and_driver() {
    let mut s = store();
    let mut m = TripManager::new(&mut s);
    m.create_trip(request(1, &[4, 3], window(8, 12))).unwrap();

    let err = m.create_trip(request(1, &[1, 2], window(11, 13))).unwrap_err();
    assert_eq!(err, TripError::VehicleUnavailable(VehicleId(1)));

    let err = m.create_trip(request(2, &[3], window(11, 13))).unwrap_err();
    // E3 holds no licence, so the licence check fires first
    assert!(matches!(err, TripError::Crew(CrewError::LicenceMismatch { .. })));

    let err = m.create_trip(request(2, &[4], window(11, 13))).unwrap_err();
    assert_eq!(err, TripError::EmployeeUnavailable(EmployeeId(4)));
    assert_eq!(err.kind(), ErrorKind::RuleViolation);
}

#[test]
fn back_to_back_trips_share_resources() {
    let mut s = store();
    let mut m = TripManager::new(&mut s);
    m.create_trip(request(1, &[4, 3], window(8, 12))).unwrap();
    let second = m.create_trip(request(1, &[4, 3], window(12, 14))).unwrap();
    assert_eq!(second.vehicle, VehicleId(1));
}

#[test]
fn pending_trip_books_nothing() {
    let mut s = store();
    let mut m = TripManager::new(&mut s);
    let mut req = request(1, &[4, 3], window(8, 12));
    req.status = TripStatus::Pending;
    let pending = m.create_trip(req).unwrap();
    assert_eq!(pending.status, TripStatus::Pending);

    m.create_trip(request(1, &[4, 3], window(9, 10))).unwrap();
}

// Activation

#[test]
fn activate_pending_trip() {
    let mut s = store();
    let mut m = TripManager::new(&mut s);
    let mut req = request(1, &[4, 3], window(8, 12));
    req.status = TripStatus::Pending;
    let pending = m.create_trip(req).unwrap();

    let outcome = m.activate_trip(pending.id).unwrap();
    let Outcome::Applied(trip) = outcome else {
        panic!("expected applied, got {outcome:?}");
    };
    assert_eq!(trip.status, TripStatus::Active);

    let again = m.activate_trip(pending.id).unwrap();
    assert_eq!(
        again,
        Outcome::Rejected(Rejection::TripNotInStatus {
            expected: TripStatus::Pending,
            actual: TripStatus::Active,
        })
    );
}

#[test]
fn activation_rechecks_availability() {
    let mut s = store();
    let mut m = TripManager::new(&mut s);
    let mut req = request(1, &[4, 3], window(8, 12));
    req.status = TripStatus::Pending;
    let pending = m.create_trip(req).unwrap();
    m.create_trip(request(1, &[1, 2], window(10, 11))).unwrap();

    let err = m.activate_trip(pending.id).unwrap_err();
    assert_eq!(err, TripError::VehicleUnavailable(VehicleId(1)));
    assert_eq!(
        m.store.find_trip(pending.id).unwrap().unwrap().status,
        TripStatus::Pending
    );
}

#[test]
fn activate_missing_trip() {
    let mut s = store();
    assert_eq!(
        TripManager::new(&mut s).activate_trip(TripId(42)).unwrap(),
        Outcome::NotFound
    );
}

// Cancellation

#[test]
fn cancel_frees_resources_and_detaches_collections() {
    let mut s = store();
    let c = add_collection(&mut s);
    let mut m = TripManager::new(&mut s);
    let mut req = request(1, &[4, 3], window(8, 12));
    req.collections = vec![c];
    let trip = m.create_trip(req).unwrap();
    assert_eq!(m.store.find_collection(c).unwrap().unwrap().trip, Some(trip.id));

    let outcome = m.cancel_trip(trip.id).unwrap();
    assert!(outcome.is_applied());

    let stored = m.store.find_trip(trip.id).unwrap().unwrap();
    assert_eq!(stored.status, TripStatus::Canceled);
    assert!(stored.collections.is_empty());

    let collection = m.store.find_collection(c).unwrap().unwrap();
    assert_eq!(collection.trip, None);
    assert_eq!(collection.status, CollectionStatus::Active);

    // The vehicle and crew are free again for the same window
    m.create_trip(request(1, &[4, 3], window(8, 12))).unwrap();
}

#[test]
fn cancel_only_from_active() {
    let mut s = store();
    let mut m = TripManager::new(&mut s);
    let trip = m.create_trip(request(2, &[2], window(8, 12))).unwrap();
    assert!(m.complete_trip(trip.id).unwrap().is_applied());

    let outcome = m.cancel_trip(trip.id).unwrap();
    assert_eq!(
        outcome.rejection(),
        Some(&Rejection::TripNotInStatus {
            expected: TripStatus::Active,
            actual: TripStatus::Completed,
        })
    );
    assert_eq!(
        m.store.find_trip(trip.id).unwrap().unwrap().status,
        TripStatus::Completed
    );
}

#[test]
fn cancel_missing_trip() {
    let mut s = store();
    assert_eq!(
        TripManager::new(&mut s).cancel_trip(TripId(7)).unwrap(),
        Outcome::NotFound
    );
}

// Completion

#[test]
fn complete_marks_collections_completed() {
    let mut s = store();
    let a = add_collection(&mut s);
    let b = add_collection(&mut s);
    let mut m = TripManager::new(&mut s);
    let mut req = request(2, &[2], window(8, 12));
    req.collections = vec![a, b, a];
    let trip = m.create_trip(req).unwrap();
    assert_eq!(trip.collections, vec![a, b]);

    let Outcome::Applied(done) = m.complete_trip(trip.id).unwrap() else {
        panic!("expected completion");
    };
    assert_eq!(done.status, TripStatus::Completed);
    for id in [a, b] {
        let c = m.store.find_collection(id).unwrap().unwrap();
        assert_eq!(c.status, CollectionStatus::Completed);
        assert_eq!(c.trip, Some(trip.id));
    }
}

#[test]
fn complete_is_all_or_nothing() {
    let mut s = store();
    let a = add_collection(&mut s);
    let b = add_collection(&mut s);
    let mut m = TripManager::new(&mut s);
    let mut req = request(2, &[2], window(8, 12));
    req.collections = vec![a, b];
    let trip = m.create_trip(req).unwrap();

    let mut cancelled = m.store.find_collection(b).unwrap().unwrap();
    cancelled.status = CollectionStatus::Cancelled;
    m.store.update_collection(&cancelled).unwrap();

    let outcome = m.complete_trip(trip.id).unwrap();
    assert_eq!(
        outcome,
        Outcome::Rejected(Rejection::CollectionNotActive {
            collection: b,
            status: CollectionStatus::Cancelled,
        })
    );
    assert_eq!(
        m.store.find_collection(a).unwrap().unwrap().status,
        CollectionStatus::Active
    );
    assert_eq!(
        m.store.find_trip(trip.id).unwrap().unwrap().status,
        TripStatus::Active
    );
}

#[test]
fn complete_pending_trip_rejected() {
    let mut s = store();
    let mut m = TripManager::new(&mut s);
    let mut req = request(2, &[2], window(8, 12));
    req.status = TripStatus::Pending;
    let trip = m.create_trip(req).unwrap();

    let outcome = m.complete_trip(trip.id).unwrap();
    assert!(matches!(
        outcome,
        Outcome::Rejected(Rejection::TripNotInStatus {
            expected: TripStatus::Active,
            actual: TripStatus::Pending,
        })
    ));
}

#[test]
fn collections_held_by_another_trip_cannot_be_claimed() {
    let mut s = store();
    let c = add_collection(&mut s);
    let mut m = TripManager::new(&mut s);
    let mut req = request(2, &[2], window(8, 9));
    req.collections = vec![c];
    let first = m.create_trip(req).unwrap();

    let mut req = request(1, &[4, 3], window(10, 11));
    req.collections = vec![c];
    let err = m.create_trip(req).unwrap_err();
    assert_eq!(
        err,
        TripError::CollectionTaken {
            collection: c,
            trip: first.id
        }
    );

    let mut req = request(1, &[4, 3], window(10, 11));
    req.collections = vec![CollectionId(99)];
    assert_eq!(
        m.create_trip(req).unwrap_err(),
        TripError::UnknownCollection(CollectionId(99))
    );
}

#[test]
fn collections_from_another_postal_code_cannot_be_claimed() {
    let mut s = store();
    let elsewhere = s
        .save_collection(CollectionDraft {
            schedule: ScheduleId(2),
            customer: CustomerId(2),
            postal_code: "99999".into(),
            waste: WasteType::new("Glass"),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            cancel_limit_days: 2,
        })
        .unwrap();
    let local = add_collection(&mut s);
    let mut m = TripManager::new(&mut s);

    let mut req = request(1, &[4, 3], window(8, 12));
    req.collections = vec![local, elsewhere.id];
    let err = m.create_trip(req).unwrap_err();
    assert_eq!(
        err,
        TripError::PostalCodeMismatch {
            collection: elsewhere.id,
            postal_code: "99999".into(),
        }
    );
    assert_eq!(err.kind(), ErrorKind::RuleViolation);
    assert!(m.store.all_trips().unwrap().is_empty());
    assert_eq!(m.store.find_collection(local).unwrap().unwrap().trip, None);

    // The trip's code is compared after trimming
    let mut req = request(1, &[4, 3], window(8, 12));
    req.postal_code = " 40100 ".into();
    req.collections = vec![local];
    let trip = m.create_trip(req).unwrap();
    assert_eq!(trip.collections, vec![local]);
    assert_eq!(
        m.store.find_collection(elsewhere.id).unwrap().unwrap().trip,
        None
    );
}

// Edits

#[test]
fn update_vehicle_revalidates_licence() {
    let mut s = store();
    let mut m = TripManager::new(&mut s);
    let trip = m.create_trip(request(2, &[2], window(8, 12))).unwrap();

    // E2 holds a B licence; V1 needs C1 and a crew of two
    let err = m.update_vehicle(trip.id, VehicleId(1)).unwrap_err();
    assert!(matches!(err, TripError::Crew(CrewError::LicenceMismatch { .. })));
    assert_eq!(
        m.store.find_trip(trip.id).unwrap().unwrap().vehicle,
        VehicleId(2)
    );
}

#[test]
fn update_vehicle_checks_availability_excluding_self() {
    let mut s = store();
    let mut extra = vehicle(4, LicenceClass::B, 1);
    extra.plate = "ZZ999ZZ".into();
    s.insert_vehicle(extra);
    let mut m = TripManager::new(&mut s);
    let trip = m.create_trip(request(2, &[2], window(8, 12))).unwrap();
    m.create_trip(request(4, &[1], window(9, 10))).unwrap();

    let err = m.update_vehicle(trip.id, VehicleId(4)).unwrap_err();
    assert_eq!(err, TripError::VehicleUnavailable(VehicleId(4)));

    // Re-assigning its own vehicle is fine
    let same = m.update_vehicle(trip.id, VehicleId(2)).unwrap();
    assert_eq!(same.vehicle, VehicleId(2));
}

#[test]
fn update_operators_replaces_crew() {
    let mut s = store();
    let mut m = TripManager::new(&mut s);
    let trip = m.create_trip(request(1, &[4, 3], window(8, 12))).unwrap();

    let updated = m
        .update_operators(trip.id, vec![EmployeeId(1), EmployeeId(4)])
        .unwrap();
    assert_eq!(updated.crew.members(), &[EmployeeId(1), EmployeeId(4)]);
    assert_eq!(m.store.find_trip(trip.id).unwrap().unwrap().crew, updated.crew);

    // E3 is free again
    let available = m
        .store
        .find_available_employees(&window(9, 10), None)
        .unwrap();
    assert!(available.iter().any(|e| e.id == EmployeeId(3)));
}

#[test]
fn update_operators_rejects_empty_and_missing() {
    let mut s = store();
    let mut m = TripManager::new(&mut s);
    let trip = m.create_trip(request(1, &[4, 3], window(8, 12))).unwrap();

    assert_eq!(
        m.update_operators(trip.id, vec![]).unwrap_err(),
        TripError::Crew(CrewError::MissingField("driver"))
    );
    assert_eq!(
        m.update_operators(TripId(99), vec![EmployeeId(1), EmployeeId(3)])
            .unwrap_err(),
        TripError::TripNotFound(TripId(99))
    );
    assert_eq!(
        m.update_operators(trip.id, vec![EmployeeId(1)]).unwrap_err(),
        TripError::Crew(CrewError::CrewSizeMismatch {
            required: 2,
            actual: 1
        })
    );
}

#[test]
fn update_operators_rejects_busy_employee() {
    let mut s = store();
    let mut m = TripManager::new(&mut s);
    let trip = m.create_trip(request(1, &[4, 3], window(8, 12))).unwrap();
    m.create_trip(request(2, &[2], window(11, 13))).unwrap();

    let err = m
        .update_operators(trip.id, vec![EmployeeId(4), EmployeeId(2)])
        .unwrap_err();
    assert_eq!(err, TripError::EmployeeUnavailable(EmployeeId(2)));
}

// Visibility

#[test]
fn trips_visible_by_role() {
    let mut s = store();
    let mut m = TripManager::new(&mut s);
    m.create_trip(request(1, &[4, 3], window(8, 12))).unwrap();
    m.create_trip(request(2, &[2], window(8, 12))).unwrap();

    assert_eq!(m.trips_for(EmployeeId(5)).unwrap().len(), 2);
    assert_eq!(m.trips_for(EmployeeId(6)).unwrap().len(), 2);
    assert_eq!(m.trips_for(EmployeeId(3)).unwrap().len(), 1);
    assert!(m.trips_for(EmployeeId(1)).unwrap().is_empty());
    assert_eq!(
        m.trips_for(EmployeeId(99)).unwrap_err(),
        TripError::UnknownEmployee(EmployeeId(99))
    );
}

// Persistence

#[test]
fn store_failure_propagates() {
    let mut s = store();
    s.break_writes();
    let err = TripManager::new(&mut s)
        .create_trip(request(2, &[2], window(8, 12)))
        .unwrap_err();

    assert!(matches!(err, TripError::Store(StoreError::Backend(_))));
    assert_eq!(err.kind(), ErrorKind::Persistence);
    assert!(s.all_trips().unwrap().is_empty());
}

#[test]
fn store_failure_during_cancel_is_an_error() {
    let mut s = store();
    let trip = TripManager::new(&mut s)
        .create_trip(request(2, &[2], window(8, 12)))
        .unwrap();
    s.break_writes();

    let err = TripManager::new(&mut s).cancel_trip(trip.id).unwrap_err();
    assert!(matches!(err, TripError::Store(_)));
    assert_eq!(
        s.find_trip(trip.id).unwrap().unwrap().status,
        TripStatus::Active
    );
}

mod proptests {
    use super::*;
    use proptest::prelude::*;
    use proptest::sample::subsequence;

    #[derive(Debug, Clone)]
    enum Step {
        Create {
            vehicle: u32,
            crew: Vec<u32>,
            from: u32,
            hours: u32,
            active: bool,
        },
        Activate(usize),
        Cancel(usize),
        UpdateVehicle(usize, u32),
        UpdateOperators(usize, Vec<u32>),
    }

    fn crew() -> impl Strategy<Value = Vec<u32>> {
        subsequence(vec![1u32, 2, 3, 4, 5, 6], 1..=3).prop_shuffle()
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            3 => (1u32..=3, crew(), 6u32..18, 1u32..5, any::<bool>()).prop_map(
                |(vehicle, crew, from, hours, active)| Step::Create {
                    vehicle,
                    crew,
                    from,
                    hours,
                    active,
                }
            ),
            2 => any::<usize>().prop_map(Step::Activate),
            1 => any::<usize>().prop_map(Step::Cancel),
            1 => (any::<usize>(), 1u32..=3).prop_map(|(t, v)| Step::UpdateVehicle(t, v)),
            1 => (any::<usize>(), crew()).prop_map(|(t, c)| Step::UpdateOperators(t, c)),
        ]
    }

    fn nth_trip(s: &InMemoryStore, n: usize) -> Option<TripId> {
        let trips = s.all_trips().unwrap();
        if trips.is_empty() {
            return None;
        }
        Some(trips[n % trips.len()].id)
    }

    fn apply(s: &mut InMemoryStore, step: Step) {
        match step {
            Step::Create {
                vehicle,
                crew,
                from,
                hours,
                active,
            } => {
                let mut req = request(vehicle, &crew, window(from, from + hours));
                if !active {
                    req.status = TripStatus::Pending;
                }
                let _ = TripManager::new(s).create_trip(req);
            }
            Step::Activate(n) => {
                if let Some(id) = nth_trip(s, n) {
                    let _ = TripManager::new(s).activate_trip(id);
                }
            }
            Step::Cancel(n) => {
                if let Some(id) = nth_trip(s, n) {
                    let _ = TripManager::new(s).cancel_trip(id);
                }
            }
            Step::UpdateVehicle(n, vehicle) => {
                if let Some(id) = nth_trip(s, n) {
                    let _ = TripManager::new(s).update_vehicle(id, VehicleId(vehicle));
                }
            }
            Step::UpdateOperators(n, crew) => {
                if let Some(id) = nth_trip(s, n) {
                    let crew = crew.into_iter().map(EmployeeId).collect();
                    let _ = TripManager::new(s).update_operators(id, crew);
                }
            }
        }
    }

    proptest! {
        /// Active trips sharing a vehicle or an employee never overlap
        #[test]
        fn no_double_booking(steps in prop::collection::vec(step(), 1..40)) {
            let mut s = store();
            for step in steps {
                apply(&mut s, step);

                let active: Vec<Trip> = s
                    .all_trips()
                    .unwrap()
                    .into_iter()
                    .filter(|t| t.status == TripStatus::Active)
                    .collect();
                for (i, a) in active.iter().enumerate() {
                    for b in &active[i + 1..] {
                        if !a.window.overlaps(&b.window) {
                            continue;
                        }
                        prop_assert_ne!(a.vehicle, b.vehicle, "{:?} and {:?}", a.id, b.id);
                        let shared = a.crew.members().iter().find(|e| b.crew.contains(**e));
                        prop_assert_eq!(shared, None, "{:?} and {:?}", a.id, b.id);
                    }
                }
            }
        }
    }
}
