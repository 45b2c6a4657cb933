//! Waste-collection scheduling server.
//!
//! Books vehicles and crews onto collection trips without double-booking
//! anyone, and turns customers' recurring and one-time schedules into dated
//! collections for those trips to serve.

pub mod clock;
pub mod config;
pub mod domain;
pub mod outcome;
pub mod schedules;
pub mod store;
pub mod trips;
pub mod web;
