use tracing::{debug, warn};

use crate::address::AddressRecord;
use crate::errors::FetchError;
use crate::places::{DetailsPayload, PlacesService};

#[derive(Clone)]
pub struct DetailResolver {
    places: PlacesService,
}

impl DetailResolver {
    pub fn new(places: PlacesService) -> Self {
        Self { places }
    }

    /// Resolves the picked suggestion into a record. Any detail failure
    /// degrades to a record holding only `description`.
    ///
    /// Returns `None` only when `description` is blank.
    pub async fn resolve(&self, description: &str, candidate_id: &str) -> Option<AddressRecord> {
        match self.fetch_details(description, candidate_id).await {
            Ok(Some(record)) => Some(record),
            Ok(None) => None,
            Err(err) => {
                warn!(
                    ?err,
                    candidate_id, "address detail lookup failed; using selected description"
                );
                AddressRecord::unresolved(description)
            }
        }
    }

    pub async fn fetch_details(
        &self,
        description: &str,
        candidate_id: &str,
    ) -> Result<Option<AddressRecord>, FetchError> {
        let response = self.places.details(candidate_id).await?;
        if !response.is_success() {
            debug!(status = response.status, body = %response.body, "detail lookup rejected");
            return Err(FetchError::Http(response.status));
        }
        let payload: DetailsPayload = serde_json::from_str(&response.body)?;
        Ok(AddressRecord::from_components(
            description,
            &payload.result.address_components,
        ))
    }
}
