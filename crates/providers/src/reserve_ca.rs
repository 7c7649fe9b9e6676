use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use trip_search::{AvailabilitySource, Campground, Campsite, DayAvailability, SearchError};

/// Client for the ReserveCalifornia (UseDirect) grid API.
///
/// UseDirect has no per-site permalinks: booking goes through an ad hoc
/// session flow, so every campsite this client produces carries
/// `booking_url: None` and shaped results omit the `url` field.
pub struct ReserveCaliforniaClient {
    client: Client,
    base_url: String,
}

/// Request body for the facility availability grid
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct GridRequest {
    facility_id: String,
    start_date: String,
    end_date: String,
}

/// Response from the facility availability grid
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GridResponse {
    facility: GridFacility,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GridFacility {
    name: String,
    #[serde(default)]
    units: HashMap<String, GridUnit>,
}

/// One bookable unit in the grid
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GridUnit {
    name: String,
    #[serde(default)]
    slices: HashMap<String, GridSlice>,
}

/// One day cell for a unit
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GridSlice {
    date: NaiveDate,
    is_free: bool,
}

impl ReserveCaliforniaClient {
    /// Create a new ReserveCalifornia API client
    pub fn new() -> Result<Self, SearchError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| SearchError::ApiError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: "https://calirdr.usedirect.com/rdr/rdr".to_string(),
        })
    }

    /// Fetch the availability grid for a facility over a date window
    async fn fetch_grid(
        &self,
        facility_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<GridResponse>, SearchError> {
        let url = format!("{}/search/grid", self.base_url);
        let body = GridRequest {
            facility_id: facility_id.to_string(),
            start_date: start.format("%Y-%m-%d").to_string(),
            end_date: end.format("%Y-%m-%d").to_string(),
        };

        debug!(facility_id, %start, %end, "fetching usedirect grid");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::Network(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            warn!(facility_id, %status, "grid request failed");
            return Err(match status.as_u16() {
                429 => SearchError::RateLimited,
                401 | 403 => SearchError::AuthenticationFailed,
                _ => SearchError::ApiError(format!("HTTP {}", status)),
            });
        }

        let grid = response
            .json()
            .await
            .map_err(|e| SearchError::ApiError(format!("Failed to parse grid response: {}", e)))?;

        Ok(Some(grid))
    }

    /// The month window covered by a `months`-month search from today
    fn month_window(months: u32) -> Result<(NaiveDate, NaiveDate), SearchError> {
        let today = Utc::now().date_naive();
        let start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
            .ok_or_else(|| SearchError::DataFormat("Invalid date".to_string()))?;
        let end = start
            .checked_add_months(Months::new(months))
            .ok_or_else(|| SearchError::DataFormat("Month window overflow".to_string()))?;
        Ok((start, end))
    }
}

#[async_trait::async_trait]
impl AvailabilitySource for ReserveCaliforniaClient {
    async fn get_campground(&self, id: &str) -> Result<Option<Campground>, SearchError> {
        // The grid is the only endpoint that resolves a facility; a one-day
        // window keeps the metadata probe cheap.
        let today = Utc::now().date_naive();
        let grid = self.fetch_grid(id, today, today).await?;

        Ok(grid.map(|g| Campground {
            id: id.to_string(),
            name: g.facility.name,
        }))
    }

    async fn get_campsites(&self, id: &str, months: u32) -> Result<Vec<Campsite>, SearchError> {
        let (start, end) = Self::month_window(months)?;
        let grid = self
            .fetch_grid(id, start, end)
            .await?
            .ok_or(SearchError::CampgroundNotFound { id: id.to_string() })?;

        let mut sites: Vec<Campsite> = grid
            .facility
            .units
            .into_values()
            .map(|unit| Campsite {
                name: unit.name,
                booking_url: None,
                days: unit
                    .slices
                    .into_values()
                    .map(|slice| DayAvailability::new(slice.date, slice.is_free))
                    .collect(),
            })
            .collect();

        sites.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sites)
    }
}
