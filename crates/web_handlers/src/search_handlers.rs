use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use validator::Validate;

use providers::ProviderKind;
use trip_search::{CampgroundResult, SearchError, search_many, weekday_name};

/// Parsed and validated parameters of a search request
#[derive(Debug, Serialize, Validate)]
pub struct SearchQuery {
    /// Provider selector ("recgov", "reservecalifornia")
    pub api: String,

    /// One or more campground ids (repeated `campground` query key)
    #[validate(length(min = 1, message = "At least one campground is required"))]
    pub campgrounds: Vec<String>,

    /// Weekday the stay must begin on (1 = Monday .. 7 = Sunday)
    #[validate(range(min = 1, max = 7, message = "Weekday must be between 1 and 7"))]
    pub weekday: u8,

    /// Number of consecutive available nights required
    #[validate(range(min = 1, message = "Nights must be at least 1"))]
    pub nights: u32,

    /// Number of months of calendar to check
    #[validate(range(min = 1, message = "Months must be at least 1"))]
    pub months: u32,
}

/// One failed campground in a batch search
#[derive(Debug, Serialize)]
pub struct SearchFailure {
    /// The campground id that failed
    pub campground: String,
    /// Human-readable failure message
    pub message: String,
}

/// Response body of the search endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Always false on a successful response
    pub is_error: bool,
    /// Echo of the request parameters
    pub args: SearchQuery,
    /// Name of the requested start weekday
    pub start_day: &'static str,
    /// Per-campground results, one per resolved campground
    pub results: Vec<CampgroundResult>,
    /// Per-campground failures, omitted when every campground resolved
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<SearchFailure>,
}

/// Parses the raw query string, keeping every repeated `campground` key.
///
/// actix's `web::Query` folds repeated keys, so the pairs are walked
/// directly. `months` defaults to 1; the other parameters are required.
pub fn parse_query(query_string: &str) -> Result<SearchQuery, SearchError> {
    let mut api = None;
    let mut campgrounds = Vec::new();
    let mut weekday = None;
    let mut nights = None;
    let mut months = None;

    for (key, value) in url::form_urlencoded::parse(query_string.as_bytes()) {
        match key.as_ref() {
            "api" => api = Some(value.into_owned()),
            "campground" => campgrounds.push(value.into_owned()),
            "weekday" => weekday = Some(parse_number(&key, &value)?),
            "nights" => nights = Some(parse_number(&key, &value)?),
            "months" => months = Some(parse_number(&key, &value)?),
            _ => {}
        }
    }

    // A plain `as u8` cast would wrap values like 257 into the valid
    // weekday range before validation ever sees them.
    let weekday = u8::try_from(weekday.ok_or_else(|| missing("weekday"))?).map_err(|_| {
        SearchError::Validation("Parameter 'weekday' must be between 1 and 7".to_string())
    })?;

    Ok(SearchQuery {
        api: api.ok_or_else(|| missing("api"))?,
        campgrounds,
        weekday,
        nights: nights.ok_or_else(|| missing("nights"))?,
        months: months.unwrap_or(1),
    })
}

fn parse_number(key: &str, value: &str) -> Result<u32, SearchError> {
    value
        .parse()
        .map_err(|_| SearchError::Validation(format!("Parameter '{}' must be a number", key)))
}

fn missing(key: &str) -> SearchError {
    SearchError::Validation(format!("Missing required parameter '{}'", key))
}

/// Searches every requested campground concurrently and reports results and
/// failures per campground
pub async fn search_campgrounds(req: HttpRequest) -> Result<HttpResponse, SearchError> {
    let query = parse_query(req.query_string())?;
    query
        .validate()
        .map_err(|e| SearchError::Validation(format!("Validation error: {}", e)))?;

    let provider: ProviderKind = query.api.parse()?;
    let source = provider.source()?;

    let outcomes = search_many(
        source.as_ref(),
        &query.campgrounds,
        query.weekday,
        query.nights,
        query.months,
    )
    .await;

    let mut results: Vec<CampgroundResult> = Vec::new();
    let mut failures: Vec<SearchFailure> = Vec::new();
    for (campground, outcome) in outcomes {
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => {
                log::warn!("Search failed for campground {}: {}", campground, e);
                failures.push(SearchFailure {
                    campground,
                    message: e.to_string(),
                });
            }
        }
    }

    let start_day = weekday_name(query.weekday);
    Ok(HttpResponse::Ok().json(SearchResponse {
        is_error: false,
        args: query,
        start_day,
        results,
        failures,
    }))
}
