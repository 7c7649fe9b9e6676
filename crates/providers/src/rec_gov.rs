use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use trip_search::{AvailabilitySource, Campground, Campsite, DayAvailability, SearchError};

/// Client for the Recreation.gov internal availability API
pub struct RecGovClient {
    client: Client,
    base_url: String,
}

/// Response from the campground metadata endpoint
#[derive(Debug, Deserialize)]
struct RecGovCampgroundResponse {
    campground: RecGovCampgroundData,
}

#[derive(Debug, Deserialize)]
struct RecGovCampgroundData {
    facility_name: String,
}

/// Response from the per-month availability endpoint
#[derive(Debug, Deserialize)]
struct RecGovMonthResponse {
    campsites: HashMap<String, RecGovCampsiteData>,
}

/// One campsite's slice of a month response
#[derive(Debug, Deserialize)]
struct RecGovCampsiteData {
    /// Site label shown on recreation.gov (e.g. "A012")
    site: Option<String>,
    /// Date string -> status string ("Available", "Reserved", ...)
    availabilities: HashMap<String, String>,
}

impl RecGovClient {
    /// Create a new Recreation.gov API client
    pub fn new() -> Result<Self, SearchError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| SearchError::ApiError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: "https://www.recreation.gov/api".to_string(),
        })
    }

    /// Fetch one month of availability for a campground
    async fn fetch_month(
        &self,
        campground_id: &str,
        month_start: NaiveDate,
    ) -> Result<RecGovMonthResponse, SearchError> {
        let url = format!(
            "{}/camps/availability/campground/{}/month",
            self.base_url, campground_id
        );
        let start_date_param = format!("{}T00:00:00.000Z", month_start.format("%Y-%m-%d"));

        debug!(
            campground_id,
            month = %month_start,
            "fetching recreation.gov month availability"
        );

        let response = self
            .client
            .get(&url)
            .query(&[("start_date", start_date_param)])
            .send()
            .await
            .map_err(|e| SearchError::Network(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(campground_id, %status, "month availability request failed");
            return Err(status_error(status));
        }

        response
            .json()
            .await
            .map_err(|e| SearchError::ApiError(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait::async_trait]
impl AvailabilitySource for RecGovClient {
    async fn get_campground(&self, id: &str) -> Result<Option<Campground>, SearchError> {
        let url = format!("{}/camps/campgrounds/{}", self.base_url, id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SearchError::Network(format!("HTTP request failed: {}", e)))?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }

        let parsed: RecGovCampgroundResponse = response.json().await.map_err(|e| {
            SearchError::ApiError(format!("Failed to parse campground response: {}", e))
        })?;

        Ok(Some(Campground {
            id: id.to_string(),
            name: parsed.campground.facility_name,
        }))
    }

    async fn get_campsites(&self, id: &str, months: u32) -> Result<Vec<Campsite>, SearchError> {
        let today = Utc::now().date_naive();
        let current_month = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
            .ok_or_else(|| SearchError::DataFormat("Invalid date".to_string()))?;

        // One request per month; site calendars accumulate across months.
        let mut sites: HashMap<String, Campsite> = HashMap::new();

        for offset in 0..months {
            let month_start = current_month
                .checked_add_months(Months::new(offset))
                .ok_or_else(|| SearchError::DataFormat("Month window overflow".to_string()))?;

            let month = self.fetch_month(id, month_start).await?;

            for (site_id, data) in month.campsites {
                let days = parse_availabilities(&data.availabilities);
                let entry = sites.entry(site_id.clone()).or_insert_with(|| Campsite {
                    name: data.site.clone().unwrap_or_else(|| site_id.clone()),
                    booking_url: Some(format!(
                        "https://www.recreation.gov/camping/campsites/{}",
                        site_id
                    )),
                    days: Vec::new(),
                });
                entry.days.extend(days);
            }
        }

        let mut sites: Vec<Campsite> = sites.into_values().collect();
        sites.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sites)
    }
}

/// Map a non-success HTTP status to a search error
fn status_error(status: reqwest::StatusCode) -> SearchError {
    match status.as_u16() {
        429 => SearchError::RateLimited,
        401 | 403 => SearchError::AuthenticationFailed,
        _ => SearchError::ApiError(format!("HTTP {}", status)),
    }
}

/// Convert a recreation.gov availabilities map into per-day entries,
/// skipping dates that fail to parse
fn parse_availabilities(availabilities: &HashMap<String, String>) -> Vec<DayAvailability> {
    let mut days = Vec::new();

    for (date_str, status) in availabilities {
        // Dates come as "2024-06-01T00:00:00Z"
        let Some(prefix) = date_str.get(..10) else {
            warn!(%date_str, "availability date too short, skipping");
            continue;
        };
        let date = match NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                warn!(%date_str, "failed to parse availability date, skipping");
                continue;
            }
        };

        days.push(DayAvailability::new(date, parse_status(status)));
    }

    days
}

/// Parse an availability status string from the recreation.gov API
fn parse_status(status: &str) -> bool {
    match status {
        "Available" => true,
        "Reserved" | "Not Available" | "Not Reservable" | "Walk-up" => false,
        // Legacy RIDB single-letter format
        "A" => true,
        "R" | "X" | "W" | "N" => false,
        // Price string means available
        s if s.starts_with('$') => true,
        _ => {
            debug!(status, "unknown availability status");
            false
        }
    }
}
