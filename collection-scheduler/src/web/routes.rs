//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use tracing::{debug, error, warn};

use crate::domain::{
    EmployeeId, InvalidWindow, Schedule, ScheduleId, TimeWindow, Trip, TripId, VehicleId,
};
use crate::outcome::{ErrorKind, Outcome};
use crate::schedules::{AdvanceReport, ScheduleError, ScheduleManager};
use crate::store::{FleetStore, StoreError};
use crate::trips::{ResourceAvailability, TripError, TripManager};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/availability/vehicles", get(available_vehicles))
        .route("/availability/employees", get(available_employees))
        .route("/availability/drivers", get(qualified_drivers))
        .route("/availability/operators", get(available_operators))
        .route("/availability/postal-codes", get(available_postal_codes))
        .route("/trips", get(list_trips).post(create_trip))
        .route("/trips/:id/activate", post(activate_trip))
        .route("/trips/:id/cancel", post(cancel_trip))
        .route("/trips/:id/complete", post(complete_trip))
        .route("/trips/:id/vehicle", put(update_vehicle))
        .route("/trips/:id/crew", put(update_crew))
        .route("/schedules/recurring", post(create_recurring_schedule))
        .route("/schedules/one-time", post(create_one_time_schedule))
        .route("/schedules/advance", post(advance_schedules))
        .route("/schedules/:id/status", put(update_schedule_status))
        .route("/schedules/:id/frequency", put(update_schedule_frequency))
        .route("/schedules/:id/cancel", post(cancel_one_time_schedule))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Vehicles free for a window. With `trip`, that trip's own booking is ignored.
async fn available_vehicles(
    State(state): State<AppState>,
    Query(req): Query<WindowQuery>,
) -> Result<Json<VehiclesResponse>, AppError> {
    let window = TimeWindow::new(req.start, req.end)?;
    let store = state.store.lock().await;
    let availability = ResourceAvailability::new(&*store);
    let vehicles = match req.trip {
        Some(trip) => availability.available_vehicles_for_edit(&window, TripId(trip))?,
        None => availability.available_vehicles(&window)?,
    };
    Ok(Json(VehiclesResponse { vehicles }))
}

/// Employees free for a window. With `trip`, that trip's own booking is ignored.
async fn available_employees(
    State(state): State<AppState>,
    Query(req): Query<WindowQuery>,
) -> Result<Json<EmployeesResponse>, AppError> {
    let window = TimeWindow::new(req.start, req.end)?;
    let store = state.store.lock().await;
    let availability = ResourceAvailability::new(&*store);
    let employees = match req.trip {
        Some(trip) => availability.available_employees_for_edit(&window, TripId(trip))?,
        None => availability.available_employees(&window)?,
    };
    Ok(Json(EmployeesResponse { employees }))
}

async fn qualified_drivers(
    State(state): State<AppState>,
    Query(req): Query<DriverQuery>,
) -> Result<Json<EmployeesResponse>, AppError> {
    let window = TimeWindow::new(req.start, req.end)?;
    let store = state.store.lock().await;
    let vehicle = store
        .find_vehicle(VehicleId(req.vehicle))?
        .ok_or_else(|| AppError::NotFound {
            message: format!("vehicle {} not found", req.vehicle),
        })?;
    let employees = ResourceAvailability::new(&*store).qualified_drivers(&window, &vehicle)?;
    Ok(Json(EmployeesResponse { employees }))
}

async fn available_operators(
    State(state): State<AppState>,
    Query(req): Query<OperatorQuery>,
) -> Result<Json<EmployeesResponse>, AppError> {
    let window = TimeWindow::new(req.start, req.end)?;
    let store = state.store.lock().await;
    let employees = ResourceAvailability::new(&*store)
        .available_operators_excluding(&window, EmployeeId(req.driver))?;
    Ok(Json(EmployeesResponse { employees }))
}

async fn available_postal_codes(
    State(state): State<AppState>,
    Query(req): Query<DateQuery>,
) -> Result<Json<PostalCodesResponse>, AppError> {
    let store = state.store.lock().await;
    let postal_codes = ResourceAvailability::new(&*store).available_postal_codes(req.date)?;
    Ok(Json(PostalCodesResponse { postal_codes }))
}

/// Trips visible to the requesting employee.
async fn list_trips(
    State(state): State<AppState>,
    Query(req): Query<TripsQuery>,
) -> Result<Json<TripsResponse>, AppError> {
    let mut store = state.store.lock().await;
    let trips = TripManager::new(&mut *store).trips_for(EmployeeId(req.employee))?;
    Ok(Json(TripsResponse { trips }))
}

async fn create_trip(
    State(state): State<AppState>,
    Json(req): Json<CreateTripRequest>,
) -> Result<(StatusCode, Json<Trip>), AppError> {
    let request = req.into_new_trip()?;
    let mut store = state.store.lock().await;
    let trip = TripManager::new(&mut *store).create_trip(request)?;
    Ok((StatusCode::CREATED, Json(trip)))
}

async fn activate_trip(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Trip>, AppError> {
    let mut store = state.store.lock().await;
    let outcome = TripManager::new(&mut *store).activate_trip(TripId(id))?;
    applied(outcome, || format!("trip {id}")).map(Json)
}

async fn cancel_trip(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Trip>, AppError> {
    let mut store = state.store.lock().await;
    let outcome = TripManager::new(&mut *store).cancel_trip(TripId(id))?;
    applied(outcome, || format!("trip {id}")).map(Json)
}

/// Complete a trip, then move each served schedule on to its next pickup.
///
/// Both steps run under the same lock guard.
async fn complete_trip(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<CompleteTripResponse>, AppError> {
    let mut store = state.store.lock().await;
    let outcome = TripManager::new(&mut *store).complete_trip(TripId(id))?;
    let trip = applied(outcome, || format!("trip {id}"))?;

    let mut manager = ScheduleManager::new(&mut *store, &*state.clock, &state.config);
    let mut rescheduled = Vec::new();
    for &collection in &trip.collections {
        match manager.reschedule_after(collection)? {
            Outcome::Applied(schedule) => rescheduled.push(schedule),
            Outcome::Rejected(reason) => {
                debug!(%collection, %reason, "schedule not moved on");
            }
            Outcome::NotFound => warn!(%collection, "no schedule for completed collection"),
        }
    }
    Ok(Json(CompleteTripResponse { trip, rescheduled }))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<UpdateVehicleRequest>,
) -> Result<Json<Trip>, AppError> {
    let mut store = state.store.lock().await;
    let trip = TripManager::new(&mut *store).update_vehicle(TripId(id), req.vehicle)?;
    Ok(Json(trip))
}

async fn update_crew(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<UpdateCrewRequest>,
) -> Result<Json<Trip>, AppError> {
    let mut store = state.store.lock().await;
    let trip = TripManager::new(&mut *store).update_operators(TripId(id), req.crew)?;
    Ok(Json(trip))
}

async fn create_recurring_schedule(
    State(state): State<AppState>,
    Json(req): Json<RecurringScheduleRequest>,
) -> Result<(StatusCode, Json<Schedule>), AppError> {
    let mut store = state.store.lock().await;
    let schedule = ScheduleManager::new(&mut *store, &*state.clock, &state.config)
        .create_recurring_schedule(req.customer, req.waste, req.start_date, req.frequency)?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

async fn create_one_time_schedule(
    State(state): State<AppState>,
    Json(req): Json<OneTimeScheduleRequest>,
) -> Result<(StatusCode, Json<Schedule>), AppError> {
    let mut store = state.store.lock().await;
    let schedule = ScheduleManager::new(&mut *store, &*state.clock, &state.config)
        .create_one_time_schedule(req.customer, req.waste, req.pickup_date)?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

async fn update_schedule_status(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Schedule>, AppError> {
    let mut store = state.store.lock().await;
    let outcome = ScheduleManager::new(&mut *store, &*state.clock, &state.config)
        .update_status(ScheduleId(id), req.status)?;
    applied(outcome, || format!("schedule {id}")).map(Json)
}

async fn update_schedule_frequency(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<UpdateFrequencyRequest>,
) -> Result<Json<Schedule>, AppError> {
    let mut store = state.store.lock().await;
    let outcome = ScheduleManager::new(&mut *store, &*state.clock, &state.config)
        .update_frequency(ScheduleId(id), req.frequency)?;
    applied(outcome, || format!("schedule {id}")).map(Json)
}

async fn cancel_one_time_schedule(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Schedule>, AppError> {
    let mut store = state.store.lock().await;
    let outcome = ScheduleManager::new(&mut *store, &*state.clock, &state.config)
        .cancel_one_time_schedule(ScheduleId(id))?;
    applied(outcome, || format!("schedule {id}")).map(Json)
}

async fn advance_schedules(
    State(state): State<AppState>,
) -> Result<Json<AdvanceReport>, AppError> {
    Ok(Json(state.advance_due_schedules().await?))
}

/// Unwrap an applied transition; a rejection is a conflict.
fn applied<T>(outcome: Outcome<T>, target: impl FnOnce() -> String) -> Result<T, AppError> {
    match outcome {
        Outcome::Applied(value) => Ok(value),
        Outcome::Rejected(reason) => Err(AppError::Conflict {
            message: reason.to_string(),
        }),
        Outcome::NotFound => Err(AppError::NotFound {
            message: format!("{} not found", target()),
        }),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl AppError {
    fn from_kind(kind: ErrorKind, message: String) -> Self {
        match kind {
            ErrorKind::InvalidInput => AppError::BadRequest { message },
            ErrorKind::RuleViolation => AppError::Conflict { message },
            ErrorKind::NotFound => AppError::NotFound { message },
            ErrorKind::Persistence => AppError::Internal { message },
        }
    }
}

impl From<TripError> for AppError {
    fn from(e: TripError) -> Self {
        AppError::from_kind(e.kind(), e.to_string())
    }
}

impl From<ScheduleError> for AppError {
    fn from(e: ScheduleError) -> Self {
        AppError::from_kind(e.kind(), e.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<InvalidWindow> for AppError {
    fn from(e: InvalidWindow) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request refused");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
