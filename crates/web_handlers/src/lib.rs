//! # Web Handlers for the Trip Finder Web Application
//!
//! This crate provides the HTTP boundary of the trip finder: query parsing,
//! validation, and the multi-campground search handler.

/// Handlers for the trip search API endpoint
mod search_handlers;
pub use search_handlers::*;
