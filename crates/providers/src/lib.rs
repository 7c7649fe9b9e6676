//! # Providers
//!
//! This crate implements the availability sources consumed by the trip
//! search core: one client per reservation provider, each exposing
//! campground metadata and per-day campsite calendars through the
//! `AvailabilitySource` trait.

/// Provider selection tag and source construction
mod provider;
pub use provider::*;

/// Recreation.gov availability client
mod rec_gov;
pub use rec_gov::*;

/// ReserveCalifornia (UseDirect) availability client
mod reserve_ca;
pub use reserve_ca::*;
