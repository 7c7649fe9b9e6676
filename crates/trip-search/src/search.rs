use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::consolidate::consolidate;
use crate::matcher::matching_ranges;
use crate::search_types::{
    Campground, CampgroundResult, Campsite, CampsiteMatch, SearchError, SiteEntry,
};

/// A provider of campground metadata and per-day campsite availability.
///
/// Implemented once per reservation provider; the core is generic over it
/// and holds no provider-specific logic beyond the optional booking URL
/// carried on each [`Campsite`].
#[async_trait::async_trait]
pub trait AvailabilitySource: Send + Sync {
    /// Resolves campground metadata, `None` when the id does not exist
    async fn get_campground(&self, id: &str) -> Result<Option<Campground>, SearchError>;

    /// Fetches the campground's campsites with their availability calendars
    /// covering `months` consecutive months from the current month
    async fn get_campsites(&self, id: &str, months: u32) -> Result<Vec<Campsite>, SearchError>;
}

/// Runs the full search pipeline for one campground: resolve metadata, match
/// ranges per campsite, consolidate into itineraries, and shape the result.
///
/// Fails with [`SearchError::CampgroundNotFound`] when the id does not
/// resolve; zero qualifying ranges across every site is not an error and
/// yields an empty result map.
pub async fn search(
    source: &dyn AvailabilitySource,
    campground_id: &str,
    start_weekday: u8,
    nights: u32,
    months: u32,
) -> Result<CampgroundResult, SearchError> {
    let campground =
        source
            .get_campground(campground_id)
            .await?
            .ok_or(SearchError::CampgroundNotFound {
                id: campground_id.to_string(),
            })?;

    let sites = source.get_campsites(campground_id, months).await?;
    debug!(
        campground = %campground.name,
        site_count = sites.len(),
        "matching ranges across campsites"
    );

    let matches: Vec<CampsiteMatch> = sites
        .iter()
        .map(|site| CampsiteMatch {
            site: SiteEntry::from(site),
            ranges: matching_ranges(&site.days, start_weekday, nights),
        })
        .filter(|m| !m.ranges.is_empty())
        .collect();

    let itineraries = consolidate(&matches);
    info!(
        campground = %campground.name,
        itineraries = itineraries.len(),
        "search complete"
    );

    let mut results_by_start_date: BTreeMap<String, Vec<SiteEntry>> = BTreeMap::new();
    for itinerary in itineraries {
        // Keyed by start date only; on the rare same-start collision the
        // later itinerary in (start, end) order wins. Kept for compatibility
        // with the published result schema.
        results_by_start_date.insert(
            itinerary.range.start.format("%Y-%m-%d").to_string(),
            itinerary.sites,
        );
    }

    Ok(CampgroundResult {
        campground_name: campground.name,
        results_by_start_date,
    })
}

/// Searches several campgrounds concurrently, reporting an outcome per
/// campground so one failing id never masks or aborts its siblings.
pub async fn search_many(
    source: &dyn AvailabilitySource,
    campground_ids: &[String],
    start_weekday: u8,
    nights: u32,
    months: u32,
) -> Vec<(String, Result<CampgroundResult, SearchError>)> {
    let searches = campground_ids
        .iter()
        .map(|id| async move {
            let result = search(source, id, start_weekday, nights, months).await;
            (id.clone(), result)
        })
        .collect::<Vec<_>>();

    futures_util::future::join_all(searches).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search_types::DayAvailability;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// In-memory source backed by a fixed campsite list
    struct StubSource {
        campground: Option<Campground>,
        sites: Vec<Campsite>,
    }

    #[async_trait::async_trait]
    impl AvailabilitySource for StubSource {
        async fn get_campground(&self, _id: &str) -> Result<Option<Campground>, SearchError> {
            Ok(self.campground.clone())
        }

        async fn get_campsites(
            &self,
            _id: &str,
            _months: u32,
        ) -> Result<Vec<Campsite>, SearchError> {
            Ok(self.sites.clone())
        }
    }

    fn open_june_site(name: &str) -> Campsite {
        Campsite {
            name: name.to_string(),
            booking_url: Some(format!("https://example.com/{}", name)),
            days: (1..=10)
                .map(|day| DayAvailability::new(d(2024, 6, day), true))
                .collect(),
        }
    }

    fn pines() -> Option<Campground> {
        Some(Campground {
            id: "233116".to_string(),
            name: "Pines".to_string(),
        })
    }

    #[tokio::test]
    async fn test_end_to_end_two_sites_share_one_itinerary() {
        let source = StubSource {
            campground: pines(),
            sites: vec![open_june_site("A"), open_june_site("B")],
        };

        // 2024-06-03 is a Monday.
        let result = search(&source, "233116", 1, 3, 1).await.unwrap();

        assert_eq!(result.campground_name, "Pines");
        let entries = &result.results_by_start_date["2024-06-03"];
        assert_eq!(
            entries.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
            vec!["A", "B"]
        );
        assert_eq!(result.results_by_start_date.len(), 1);
    }

    #[tokio::test]
    async fn test_campground_not_found_propagates() {
        let source = StubSource {
            campground: None,
            sites: vec![],
        };

        let err = search(&source, "nope", 1, 3, 1).await.unwrap_err();
        assert!(matches!(
            err,
            SearchError::CampgroundNotFound { id } if id == "nope"
        ));
    }

    #[tokio::test]
    async fn test_no_availability_is_empty_result_not_error() {
        let mut site = open_june_site("A");
        for day in &mut site.days {
            day.is_available = false;
        }
        let source = StubSource {
            campground: pines(),
            sites: vec![site],
        };

        let result = search(&source, "233116", 1, 3, 1).await.unwrap();
        assert!(result.results_by_start_date.is_empty());
    }

    #[tokio::test]
    async fn test_same_start_collision_last_write_wins() {
        // Site A is contiguous Mon-Wed, closing Thursday. Site B reports a
        // sparse calendar whose three available nights from the same Monday
        // stretch to a Friday close. Same start key, different ends: the
        // (start, end)-later itinerary overwrites the earlier one.
        let a = open_june_site("A"); // closes 2024-06-06
        let b = Campsite {
            name: "B".to_string(),
            booking_url: None,
            days: vec![
                DayAvailability::new(d(2024, 6, 3), true),
                DayAvailability::new(d(2024, 6, 5), true),
                DayAvailability::new(d(2024, 6, 6), true),
                DayAvailability::new(d(2024, 6, 7), true),
            ],
        };
        let source = StubSource {
            campground: pines(),
            sites: vec![a, b],
        };

        let result = search(&source, "233116", 1, 3, 1).await.unwrap();

        let entries = &result.results_by_start_date["2024-06-03"];
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "B");
    }

    #[tokio::test]
    async fn test_fan_out_isolates_failures() {
        struct PickySource;

        #[async_trait::async_trait]
        impl AvailabilitySource for PickySource {
            async fn get_campground(&self, id: &str) -> Result<Option<Campground>, SearchError> {
                if id == "good" {
                    Ok(Some(Campground {
                        id: id.to_string(),
                        name: "Good".to_string(),
                    }))
                } else {
                    Ok(None)
                }
            }

            async fn get_campsites(
                &self,
                _id: &str,
                _months: u32,
            ) -> Result<Vec<Campsite>, SearchError> {
                Ok(vec![])
            }
        }

        let ids = vec!["good".to_string(), "bad".to_string()];
        let outcomes = search_many(&PickySource, &ids, 1, 3, 1).await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].0, "good");
        assert!(outcomes[0].1.is_ok());
        assert_eq!(outcomes[1].0, "bad");
        assert!(matches!(
            outcomes[1].1,
            Err(SearchError::CampgroundNotFound { .. })
        ));
    }
}
