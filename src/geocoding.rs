//! Geocoding client for the Nominatim search API
//!
//! Resolves a free-text city name into coordinates. Only the best match is
//! requested; an empty result list means the city was not found.

use crate::config::GeocodingConfig;
use crate::models::GeocodingResult;
use crate::{AppError, ErrorCode, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// Anything that can turn a city name into coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn search_city(&self, city_name: &str) -> Result<GeocodingResult>;
}

/// Raw search hit as returned by Nominatim
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    country: Option<String>,
}

impl NominatimPlace {
    fn into_result(self, query: &str) -> Result<GeocodingResult> {
        let parse = |value: &str, name: &str| {
            value.trim().parse::<f64>().map_err(|_| {
                AppError::new(
                    ErrorCode::GeocodingApiError,
                    format!("Invalid {name} in geocoding response: {value}"),
                )
            })
        };

        let latitude = parse(&self.lat, "latitude")?;
        let longitude = parse(&self.lon, "longitude")?;
        let address = self.address.unwrap_or_default();

        Ok(GeocodingResult {
            latitude,
            longitude,
            display_name: self.display_name,
            city: address
                .city
                .or(address.town)
                .or(address.village)
                .unwrap_or_else(|| query.to_string()),
            country: address.country.unwrap_or_default(),
        })
    }
}

/// Geocoding client for OpenStreetMap Nominatim
pub struct GeocodingClient {
    client: Client,
    base_url: String,
}

impl GeocodingClient {
    /// Create a new geocoding client
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, city_name: &str) -> String {
        format!(
            "{}/search?format=json&q={}&limit=1&addressdetails=1",
            self.base_url,
            urlencoding::encode(city_name)
        )
    }
}

#[async_trait]
impl Geocoder for GeocodingClient {
    #[instrument(skip(self), fields(city = city_name))]
    async fn search_city(&self, city_name: &str) -> Result<GeocodingResult> {
        info!("Geocoding city: '{}'", city_name);
        let start_time = Instant::now();

        let url = self.search_url(city_name);
        debug!("Geocoding request URL: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!("Geocoding request failed: {}", e);
            AppError::new(ErrorCode::GeocodingApiError, e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Geocoding service answered HTTP {}", status.as_u16());
            return Err(
                AppError::http(format!("HTTP error! status: {}", status.as_u16()))
                    .with_detail("status_code", status.as_u16().to_string()),
            );
        }

        let places: Vec<NominatimPlace> = response.json().await.map_err(|e| {
            error!("Failed to parse geocoding response for '{}': {}", city_name, e);
            AppError::new(ErrorCode::GeocodingApiError, e.to_string())
        })?;

        let Some(place) = places.into_iter().next() else {
            warn!("No results found for city '{}'", city_name);
            return Err(AppError::city_not_found().with_detail("city", city_name));
        };

        let result = place.into_result(city_name)?;
        info!(
            "Found {} ({:.4}, {:.4}) in {:.3}s",
            result.display_name,
            result.latitude,
            result.longitude,
            start_time.elapsed().as_secs_f64()
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(address: Option<NominatimAddress>) -> NominatimPlace {
        NominatimPlace {
            lat: "45.4641943".to_string(),
            lon: "9.1896346".to_string(),
            display_name: "Milano, Lombardia, Italia".to_string(),
            address,
        }
    }

    #[test]
    fn test_search_url_encodes_query() {
        let client = GeocodingClient::new(&GeocodingConfig {
            base_url: "https://nominatim.example.org/".to_string(),
            user_agent: "test".to_string(),
        })
        .unwrap();

        assert_eq!(
            client.search_url("São Paulo"),
            "https://nominatim.example.org/search?format=json&q=S%C3%A3o%20Paulo&limit=1&addressdetails=1"
        );
    }

    #[test]
    fn test_city_falls_back_to_town_then_village_then_query() {
        let town = NominatimAddress {
            town: Some("Bellagio".to_string()),
            village: Some("ignored".to_string()),
            ..Default::default()
        };
        assert_eq!(place(Some(town)).into_result("q").unwrap().city, "Bellagio");

        let village = NominatimAddress {
            village: Some("Varenna".to_string()),
            ..Default::default()
        };
        assert_eq!(place(Some(village)).into_result("q").unwrap().city, "Varenna");

        let result = place(None).into_result("milan").unwrap();
        assert_eq!(result.city, "milan");
        assert_eq!(result.country, "");
    }

    #[test]
    fn test_coordinates_are_parsed_from_strings() {
        let result = place(None).into_result("milan").unwrap();
        assert!((result.latitude - 45.464_194_3).abs() < 1e-9);
        assert!((result.longitude - 9.189_634_6).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_coordinates_are_an_error() {
        let mut bad = place(None);
        bad.lat = "north".to_string();
        let err = bad.into_result("milan").unwrap_err();
        assert_eq!(err.code, ErrorCode::GeocodingApiError);
    }
}
