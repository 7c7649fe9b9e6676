use std::collections::BTreeMap;

use crate::search_types::{CampsiteMatch, DateRange, Itinerary};

/// Groups campsites by identical qualifying range.
///
/// Every (site, range) pair across all matches lands in a map keyed by the
/// range itself; the structural `(start, end)` ordering makes the key
/// bijective with the range and gives the output its required order (start
/// ascending, ties broken by end) for free. Within a group, sites keep
/// first-seen order and a site contributing the same range twice is
/// inserted once.
pub fn consolidate(matches: &[CampsiteMatch]) -> Vec<Itinerary> {
    let mut groups: BTreeMap<DateRange, Itinerary> = BTreeMap::new();

    for m in matches {
        for range in &m.ranges {
            let group = groups.entry(*range).or_insert_with(|| Itinerary {
                range: *range,
                sites: Vec::new(),
            });
            if !group.sites.contains(&m.site) {
                group.sites.push(m.site.clone());
            }
        }
    }

    groups.into_values().collect()
}
