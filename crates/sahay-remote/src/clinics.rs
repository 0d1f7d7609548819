//! Clinic locator client.
//!
//! Queries a public place-search endpoint for clinics near a free-text
//! place name and reduces each hit to structured link data. The engine
//! turns an empty result set or an error into the corresponding chat
//! messages; this client never builds markup.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use sahay_core::config::ClinicConfig;

use crate::error::LookupError;

/// Base URL the map-search links point at.
const MAPS_SEARCH_URL: &str = "https://www.google.com/maps";

/// Identifies this client to the place-search service, which requires a
/// User-Agent from API consumers.
const USER_AGENT: &str = concat!("sahay/", env!("CARGO_PKG_VERSION"));

/// One clinic result: a short label and a map-search link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClinicHit {
    /// Place name up to the first comma of the full description.
    pub label: String,
    /// Map-search URL built from the full description.
    pub maps_url: String,
}

/// Port for the clinic search backend.
#[async_trait]
pub trait ClinicLocator: Send + Sync {
    /// Return the top-ranked clinics near `place`, best first.
    ///
    /// An empty vector means the search succeeded but found nothing.
    async fn search(&self, place: &str) -> Result<Vec<ClinicHit>, LookupError>;
}

/// HTTP implementation against the OpenStreetMap Nominatim search API.
#[derive(Debug, Clone)]
pub struct NominatimLocator {
    client: Client,
    endpoint: String,
    max_results: usize,
}

impl NominatimLocator {
    pub fn new(config: &ClinicConfig) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: config.endpoint.clone(),
            max_results: config.max_results,
        }
    }

    /// Reduce a full place description to a hit.
    fn to_hit(display_name: &str) -> Result<ClinicHit, LookupError> {
        let label = display_name
            .split(',')
            .next()
            .unwrap_or(display_name)
            .trim()
            .to_string();
        let maps_url = Url::parse_with_params(MAPS_SEARCH_URL, &[("q", display_name)])
            .map_err(|e| LookupError::Malformed(format!("bad map link: {}", e)))?
            .to_string();
        Ok(ClinicHit { label, maps_url })
    }
}

#[async_trait]
impl ClinicLocator for NominatimLocator {
    async fn search(&self, place: &str) -> Result<Vec<ClinicHit>, LookupError> {
        let query = format!("clinic near {}", place);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("format", "json"), ("q", &query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let places: Vec<Place> = response
            .json()
            .await
            .map_err(|e| LookupError::Malformed(e.to_string()))?;

        debug!(place, found = places.len(), "Clinic search completed");

        places
            .iter()
            .take(self.max_results)
            .map(|p| Self::to_hit(&p.display_name))
            .collect()
    }
}

#[derive(Deserialize)]
struct Place {
    display_name: String,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Hit reduction ----

    #[test]
    fn test_label_is_text_before_first_comma() {
        let hit =
            NominatimLocator::to_hit("City Care Clinic, Shivajinagar, Pune, Maharashtra, India")
                .unwrap();
        assert_eq!(hit.label, "City Care Clinic");
    }

    #[test]
    fn test_label_without_comma_is_whole_name() {
        let hit = NominatimLocator::to_hit("Standalone Clinic").unwrap();
        assert_eq!(hit.label, "Standalone Clinic");
    }

    #[test]
    fn test_maps_url_percent_encodes_full_description() {
        let hit = NominatimLocator::to_hit("City Care Clinic, Pune").unwrap();
        assert!(hit.maps_url.starts_with("https://www.google.com/maps?q="));
        assert!(!hit.maps_url.contains(' '));
        assert!(hit.maps_url.contains("City"));
        assert!(hit.maps_url.contains("Pune"));
    }

    #[test]
    fn test_maps_url_encodes_markup_characters() {
        let hit = NominatimLocator::to_hit("\"<clinic>\" & co, Delhi").unwrap();
        assert!(!hit.maps_url.contains('<'));
        assert!(!hit.maps_url.contains('>'));
        assert!(!hit.maps_url.contains('"'));
    }

    // ---- Wire shape ----

    #[test]
    fn test_place_deserialization() {
        let json = r#"[{"display_name": "A Clinic, Pune", "lat": "18.5", "lon": "73.8"}]"#;
        let places: Vec<Place> = serde_json::from_str(json).unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].display_name, "A Clinic, Pune");
    }

    #[test]
    fn test_empty_result_set_deserializes() {
        let places: Vec<Place> = serde_json::from_str("[]").unwrap();
        assert!(places.is_empty());
    }

    // ---- Failure surfaces as error, not panic ----

    #[tokio::test]
    async fn test_unreachable_endpoint_returns_transport_error() {
        let locator = NominatimLocator::new(&ClinicConfig {
            endpoint: "http://127.0.0.1:9/search".to_string(),
            max_results: 5,
        });
        let result = locator.search("Pune").await;
        assert!(matches!(result, Err(LookupError::Transport(_))));
    }
}
