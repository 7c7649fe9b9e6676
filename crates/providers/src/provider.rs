use std::str::FromStr;

use trip_search::{AvailabilitySource, SearchError};

use crate::rec_gov::RecGovClient;
use crate::reserve_ca::ReserveCaliforniaClient;

/// Closed set of supported reservation providers, selected by the `api`
/// request parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Recreation.gov (federal campgrounds)
    RecGov,
    /// ReserveCalifornia via the UseDirect grid API (state parks)
    ReserveCalifornia,
}

impl ProviderKind {
    /// Build the availability source for this provider
    pub fn source(&self) -> Result<Box<dyn AvailabilitySource>, SearchError> {
        Ok(match self {
            ProviderKind::RecGov => Box::new(RecGovClient::new()?),
            ProviderKind::ReserveCalifornia => Box::new(ReserveCaliforniaClient::new()?),
        })
    }

    /// The canonical tag used in requests and echoed in responses
    pub fn tag(&self) -> &'static str {
        match self {
            ProviderKind::RecGov => "recgov",
            ProviderKind::ReserveCalifornia => "reservecalifornia",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recgov" | "recreationgov" => Ok(ProviderKind::RecGov),
            "reservecalifornia" | "reserveca" => Ok(ProviderKind::ReserveCalifornia),
            other => Err(SearchError::UnknownProvider(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_tags_round_trip() {
        for kind in [ProviderKind::RecGov, ProviderKind::ReserveCalifornia] {
            assert_eq!(kind.tag().parse::<ProviderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_provider_from_str_is_case_insensitive() {
        assert_eq!(
            "RecGov".parse::<ProviderKind>().unwrap(),
            ProviderKind::RecGov
        );
        assert_eq!(
            "ReserveCA".parse::<ProviderKind>().unwrap(),
            ProviderKind::ReserveCalifornia
        );
    }

    #[test]
    fn test_unknown_provider_is_an_error() {
        let err = "koa".parse::<ProviderKind>().unwrap_err();
        assert!(matches!(err, SearchError::UnknownProvider(tag) if tag == "koa"));
    }
}
