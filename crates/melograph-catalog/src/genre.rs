//! Genre resource wrapper.

use melograph_client::{endpoint, Client, MelographError, Result};
use tracing::instrument;

use crate::artist::Artist;

const ENTITY: &str = "genre";
/// Listing size used when the caller does not ask for one.
const DEFAULT_RESULTS: u32 = 100;

/// Wrapper for one genre, addressed by name.
#[derive(Debug, Clone)]
pub struct Genre {
    client: Client,
    name: String,
}

impl Genre {
    pub fn new(client: Client, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lists artists associated with this genre, reshaping the returned
    /// `{name, id}` pairs into [`Artist`] values.
    ///
    /// `results` caps the listing size; the service default is 100.
    #[instrument(skip(self), fields(genre = %self.name))]
    pub async fn artists(&self, results: Option<u32>) -> Result<Vec<Artist>> {
        if self.name.trim().is_empty() {
            return Err(MelographError::MissingArgument("name"));
        }

        let results = results.unwrap_or(DEFAULT_RESULTS).to_string();
        let payload = self
            .client
            .get(
                &endpoint(ENTITY, "artists"),
                &[("name", self.name.as_str()), ("results", &results)],
            )
            .await?;

        let artists = payload
            .get("artists")
            .cloned()
            .ok_or_else(|| {
                MelographError::InvalidResponse("listing has no artists member".to_string())
            })?;
        serde_json::from_value(artists).map_err(|e| {
            MelographError::InvalidResponse(format!("malformed artists listing: {}", e))
        })
    }
}
