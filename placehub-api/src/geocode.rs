/// Address-to-coordinates adapter
///
/// Turning a free-text address into latitude/longitude is the only
/// external network call in the system. The `Geocoder` trait is the seam:
/// the router holds an `Arc<dyn Geocoder>`, production wires in
/// `GoogleGeocoder`, and development/tests wire in `FixedGeocoder` so no
/// API key or network is needed.
///
/// # Example
///
/// ```no_run
/// use placehub_api::geocode::{FixedGeocoder, Geocoder};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let geocoder = FixedGeocoder::default();
/// let coords = geocoder.geocode("20 W 34th St, New York").await?;
/// println!("({}, {})", coords.lat, coords.lng);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Error type for geocoding operations
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// The provider answered but found nothing for the address
    #[error("Could not resolve address: {0}")]
    NoMatch(String),

    /// The provider or the network failed
    #[error("Geocoding request failed: {0}")]
    Upstream(String),
}

/// Resolves a free-text address into coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError>;
}

/// Geocoder backed by the Google geocoding API
///
/// One GET per lookup; the response envelope is mapped and nothing else.
pub struct GoogleGeocoder {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl GoogleGeocoder {
    /// Creates a new Google geocoder
    ///
    /// `api_base` is the scheme+host of the endpoint, normally
    /// `https://maps.googleapis.com`; tests point it at a local stub.
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            api_key: api_key.into(),
        }
    }
}

/// Response envelope of the Google geocoding endpoint
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Coordinates,
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        let url = format!("{}/maps/api/geocode/json", self.api_base);

        let res = self
            .client
            .get(url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| GeocodeError::Upstream(e.to_string()))?;

        if !res.status().is_success() {
            return Err(GeocodeError::Upstream(format!(
                "Provider returned HTTP {}",
                res.status()
            )));
        }

        let data: GeocodeResponse = res
            .json()
            .await
            .map_err(|e| GeocodeError::Upstream(e.to_string()))?;

        match data.status.as_str() {
            "OK" => data
                .results
                .first()
                .map(|result| result.geometry.location)
                .ok_or_else(|| GeocodeError::Upstream("Empty result set".to_string())),
            "ZERO_RESULTS" => Err(GeocodeError::NoMatch(address.to_string())),
            other => Err(GeocodeError::Upstream(format!(
                "Provider status: {}",
                other
            ))),
        }
    }
}

/// Deterministic geocoder for development and tests
///
/// Resolves every address to the same preset coordinates; no network, no
/// API key.
pub struct FixedGeocoder {
    coordinates: Coordinates,
}

impl FixedGeocoder {
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

impl Default for FixedGeocoder {
    fn default() -> Self {
        Self {
            coordinates: Coordinates {
                lat: 40.7484474,
                lng: -73.9871516,
            },
        }
    }
}

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Coordinates, GeocodeError> {
        Ok(self.coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider_response() {
        let payload = r#"{
            "status": "OK",
            "results": [
                {
                    "formatted_address": "20 W 34th St, New York, NY 10001, USA",
                    "geometry": {
                        "location": { "lat": 40.7484474, "lng": -73.9871516 }
                    }
                }
            ]
        }"#;

        let data: GeocodeResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(data.status, "OK");
        assert_eq!(data.results[0].geometry.location.lat, 40.7484474);
        assert_eq!(data.results[0].geometry.location.lng, -73.9871516);
    }

    #[test]
    fn test_parse_zero_results_response() {
        let payload = r#"{ "status": "ZERO_RESULTS", "results": [] }"#;

        let data: GeocodeResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(data.status, "ZERO_RESULTS");
        assert!(data.results.is_empty());
    }

    #[test]
    fn test_parse_response_without_results_key() {
        let payload = r#"{ "status": "REQUEST_DENIED" }"#;

        let data: GeocodeResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(data.status, "REQUEST_DENIED");
        assert!(data.results.is_empty());
    }

    #[tokio::test]
    async fn test_fixed_geocoder_returns_preset_coordinates() {
        let geocoder = FixedGeocoder::new(Coordinates { lat: 1.5, lng: -2.5 });

        let coords = geocoder.geocode("anywhere at all").await.unwrap();
        assert_eq!(coords, Coordinates { lat: 1.5, lng: -2.5 });
    }

    #[tokio::test]
    async fn test_fixed_geocoder_default() {
        let geocoder = FixedGeocoder::default();

        let coords = geocoder.geocode("1 Infinite Loop").await.unwrap();
        assert_eq!(coords.lat, 40.7484474);
        assert_eq!(coords.lng, -73.9871516);
    }
}
