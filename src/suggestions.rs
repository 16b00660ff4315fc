use tracing::{debug, warn};

use crate::address::Suggestion;
use crate::errors::FetchError;
use crate::places::{PlacesService, SearchPayload};

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

#[derive(Clone)]
pub struct SuggestionFetcher {
    places: PlacesService,
    min_query_length: usize,
}

impl SuggestionFetcher {
    pub fn new(places: PlacesService, min_query_length: usize) -> Self {
        Self {
            places,
            min_query_length,
        }
    }

    pub fn is_searchable(&self, query: &str) -> bool {
        query.chars().count() >= self.min_query_length
    }

    /// Runs the search stage for `query`. Short queries resolve to an empty
    /// list without touching the network.
    pub async fn fetch(&self, query: &str) -> Result<Vec<Suggestion>, FetchError> {
        if !self.is_searchable(query) {
            return Ok(Vec::new());
        }

        let response = self.places.search(query).await.map_err(|err| {
            warn!(?err, "address search request failed");
            err
        })?;

        if !response.is_success() {
            warn!(
                status = response.status,
                body = %response.body,
                "address search returned error status"
            );
            return Err(FetchError::Http(response.status));
        }

        let payload: SearchPayload = serde_json::from_str(&response.body).map_err(|err| {
            warn!(?err, "address search payload did not parse");
            FetchError::from(err)
        })?;

        match payload.status.as_deref() {
            None | Some(STATUS_OK) | Some(STATUS_ZERO_RESULTS) => {}
            Some(other) => {
                warn!(
                    status = other,
                    error_message = payload.error_message.as_deref().unwrap_or_default(),
                    "places provider rejected search"
                );
                return Err(FetchError::Provider(other.to_string()));
            }
        }

        let suggestions = payload.predictions.unwrap_or_default();
        debug!(query, count = suggestions.len(), "address suggestions received");
        Ok(suggestions)
    }
}
