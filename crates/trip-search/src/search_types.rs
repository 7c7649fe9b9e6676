use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Availability of one campsite on one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    /// The calendar day (no time-of-day component)
    pub date: NaiveDate,
    /// Whether the site can be booked for the night starting on `date`
    pub is_available: bool,
}

impl DayAvailability {
    /// Convenience constructor used heavily by providers and tests
    pub fn new(date: NaiveDate, is_available: bool) -> Self {
        Self { date, is_available }
    }
}

/// A contiguous stay, half-open: `start` is the check-in day and `end` is
/// the first day after the last required available night.
///
/// The derived ordering on `(start, end)` is the canonical grouping key for
/// consolidation: it is bijective with the range itself, so no two distinct
/// ranges ever collide and identical ranges always meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DateRange {
    /// Check-in day
    pub start: NaiveDate,
    /// Day after the last required available night
    pub end: NaiveDate,
}

/// Campground metadata resolved from a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campground {
    /// Provider-scoped campground identifier
    pub id: String,
    /// Display name of the campground
    pub name: String,
}

/// An individually bookable unit within a campground, together with its
/// per-day availability calendar for the queried window
#[derive(Debug, Clone)]
pub struct Campsite {
    /// Display name of the site
    pub name: String,
    /// Permalink for booking this site, if the provider has one.
    /// ReserveCalifornia issues ad hoc booking flows rather than permalinks,
    /// so its sites carry `None` and the shaped results omit the field.
    pub booking_url: Option<String>,
    /// Per-day availability over the requested month window, in no
    /// particular order
    pub days: Vec<DayAvailability>,
}

/// Externally visible reference to a campsite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteEntry {
    /// Display name of the site
    pub name: String,
    /// Booking permalink, omitted from JSON when the provider has none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<&Campsite> for SiteEntry {
    fn from(site: &Campsite) -> Self {
        Self {
            name: site.name.clone(),
            url: site.booking_url.clone(),
        }
    }
}

/// One campsite's qualifying ranges; dropped entirely when `ranges` is empty
#[derive(Debug, Clone)]
pub struct CampsiteMatch {
    /// The campsite that produced the ranges
    pub site: SiteEntry,
    /// Qualifying ranges in scan order
    pub ranges: Vec<DateRange>,
}

/// A consolidated group of campsites sharing an identical qualifying range
#[derive(Debug, Clone, Serialize)]
pub struct Itinerary {
    /// The shared date range
    pub range: DateRange,
    /// Campsites offering the range, in first-seen order
    pub sites: Vec<SiteEntry>,
}

/// Final per-campground search result.
///
/// Keys of `results_by_start_date` are ISO start dates; the range end is
/// discarded, so two itineraries with the same start and different ends
/// collide and the later one (in `(start, end)` order) wins. Compatibility
/// quirk, kept deliberately.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampgroundResult {
    /// Display name of the campground
    pub campground_name: String,
    /// ISO check-in date -> campsites bookable for that itinerary
    pub results_by_start_date: BTreeMap<String, Vec<SiteEntry>>,
}

/// Custom error type for search operations
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    /// Requested campground id does not resolve via the provider
    #[error("Campground not found: {id}")]
    CampgroundNotFound {
        /// The id that failed to resolve
        id: String,
    },

    /// Unknown provider tag in a request
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Request parameter validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream API returned an error response
    #[error("API error: {0}")]
    ApiError(String),

    /// Rate limited by external API
    #[error("Rate limited by external API")]
    RateLimited,

    /// Authentication failed with external service
    #[error("Authentication failed with external service")]
    AuthenticationFailed,

    /// Upstream payload did not parse into the expected shape
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// Network error reaching the provider
    #[error("Network error: {0}")]
    Network(String),
}

impl actix_web::ResponseError for SearchError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            SearchError::CampgroundNotFound { id } => {
                HttpResponse::NotFound().json(serde_json::json!({
                    "error": "campground_not_found",
                    "message": format!("Campground not found: {}", id)
                }))
            }
            SearchError::UnknownProvider(tag) => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "unknown_provider",
                    "message": format!("Unknown provider: {}", tag)
                }))
            }
            SearchError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "message": msg
            })),
            SearchError::ApiError(msg) => HttpResponse::BadGateway().json(serde_json::json!({
                "error": "api_error",
                "message": format!("External API error: {}", msg)
            })),
            SearchError::RateLimited => HttpResponse::TooManyRequests().json(serde_json::json!({
                "error": "rate_limited",
                "message": "Rate limited by external service. Please try again later."
            })),
            SearchError::AuthenticationFailed => {
                HttpResponse::BadGateway().json(serde_json::json!({
                    "error": "authentication_failed",
                    "message": "Failed to authenticate with external service"
                }))
            }
            SearchError::DataFormat(msg) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "data_format_error",
                    "message": format!("Data format error: {}", msg)
                }))
            }
            SearchError::Network(msg) => HttpResponse::BadGateway().json(serde_json::json!({
                "error": "network_error",
                "message": format!("Network error: {}", msg)
            })),
        }
    }
}

/// English name for an ISO weekday number (1 = Monday .. 7 = Sunday)
pub fn weekday_name(weekday: u8) -> &'static str {
    match weekday {
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        7 => "Sunday",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_name() {
        assert_eq!(weekday_name(1), "Monday");
        assert_eq!(weekday_name(7), "Sunday");
        assert_eq!(weekday_name(0), "Unknown");
        assert_eq!(weekday_name(8), "Unknown");
    }

    #[test]
    fn test_site_entry_url_skipped_when_none() {
        let entry = SiteEntry {
            name: "Site 12".to_string(),
            url: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "Site 12" }));

        let entry = SiteEntry {
            name: "Site 12".to_string(),
            url: Some("https://example.com/12".to_string()),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["url"], "https://example.com/12");
    }

    #[test]
    fn test_date_range_orders_by_start_then_end() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        let a = DateRange {
            start: d(2024, 6, 3),
            end: d(2024, 6, 6),
        };
        let b = DateRange {
            start: d(2024, 6, 3),
            end: d(2024, 6, 7),
        };
        let c = DateRange {
            start: d(2024, 6, 10),
            end: d(2024, 6, 13),
        };
        assert!(a < b);
        assert!(b < c);
    }
}
