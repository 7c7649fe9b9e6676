//! # Trip Search
//!
//! This crate implements the core of the weekend trip finder: matching
//! contiguous stretches of available nights that start on a chosen weekday,
//! consolidating per-campsite matches into shared itineraries, and
//! orchestrating the pipeline across a campground's campsites. Providers
//! supply availability through the [`AvailabilitySource`] trait.

/// Types for search operations
mod search_types;
pub use search_types::*;

/// Greedy weekday-anchored range matcher
mod matcher;
pub use matcher::*;

/// Consolidation of per-campsite matches into shared itineraries
mod consolidate;
pub use consolidate::*;

/// Search orchestration and multi-campground fan-out
mod search;
pub use search::*;
