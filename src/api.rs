//! Calculation API client
//!
//! This module provides the HTTP client for the external horoscope service:
//! planet positions, aspects, moon phases, transits and month moon phases.
//! Each call is a single POST round trip with a bearer token; there is no
//! retry. Failures are converted into [`AppError`]s:
//!
//! - non-2xx status: `HTTP_ERROR` with "`<context>: <status>`"
//! - `success` missing or false: `API_ERROR`
//! - transport or decoding failure: the endpoint's own code

use crate::config::ApiConfig;
use crate::models::{
    AspectsResponse, CalculationRequest, HoroscopeResponse, MonthMoonPhasesResponse,
    MonthPhasesRequest, MoonPhaseResponse, TransitRequest, TransitResponse,
};
use crate::{AppError, ErrorCode, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// Operations offered by the calculation service
#[async_trait]
pub trait AstroApi: Send + Sync {
    async fn calculate_horoscope(&self, request: &CalculationRequest)
    -> Result<HoroscopeResponse>;

    async fn calculate_aspects(&self, request: &CalculationRequest) -> Result<AspectsResponse>;

    async fn calculate_moon_phase(&self, request: &CalculationRequest)
    -> Result<MoonPhaseResponse>;

    async fn calculate_transits(&self, request: &TransitRequest) -> Result<TransitResponse>;

    async fn fetch_month_moon_phases(
        &self,
        request: &MonthPhasesRequest,
    ) -> Result<MonthMoonPhasesResponse>;
}

/// The five service endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Position,
    Aspects,
    Phase,
    Transit,
    MonthPhase,
}

impl Endpoint {
    /// Prefix of the HTTP error message
    fn failure_context(self) -> &'static str {
        match self {
            Endpoint::Position => "Failed to calculate horoscope",
            Endpoint::Aspects => "Failed to calculate aspects",
            Endpoint::Phase => "Failed to calculate moon phase",
            Endpoint::Transit => "Failed to calculate planet transits",
            Endpoint::MonthPhase => "Failed to fetch month moon phases",
        }
    }

    fn error_code(self) -> ErrorCode {
        match self {
            Endpoint::Position => ErrorCode::HoroscopeApiError,
            Endpoint::Aspects => ErrorCode::AspectsApiError,
            Endpoint::Phase => ErrorCode::MoonPhaseApiError,
            Endpoint::Transit => ErrorCode::TransitApiError,
            Endpoint::MonthPhase => ErrorCode::MonthMoonPhasesApiError,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Endpoint::Position => "Horoscope",
            Endpoint::Aspects => "Aspects",
            Endpoint::Phase => "Moon phase",
            Endpoint::Transit => "Transit",
            Endpoint::MonthPhase => "Month phases",
        }
    }

    fn url(self, config: &ApiConfig) -> &str {
        match self {
            Endpoint::Position => &config.position_url,
            Endpoint::Aspects => &config.aspects_url,
            Endpoint::Phase => &config.phase_url,
            Endpoint::Transit => &config.transit_url,
            Endpoint::MonthPhase => &config.month_phase_url,
        }
    }
}

/// HTTP client for the horoscope calculation service
pub struct AstroApiClient {
    client: Client,
    config: ApiConfig,
}

impl AstroApiClient {
    /// Create a new calculation API client
    pub fn new(config: ApiConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("astrocalc/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::config(format!("Failed to create HTTP client: {e}")))?;

        if config.api_key.is_none() {
            warn!("No API key configured; calculation requests are sent without authorization");
        }

        Ok(Self { client, config })
    }

    #[instrument(skip(self, body))]
    async fn post<B, T>(&self, endpoint: Endpoint, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let url = endpoint.url(&self.config);
        if url.is_empty() {
            return Err(AppError::config(format!(
                "{} API endpoint not configured",
                endpoint.name()
            )));
        }

        debug!("POST {}", url);
        let start_time = Instant::now();

        let mut request = self.client.post(url).json(body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| {
            error!("{} API request failed: {}", endpoint.name(), e);
            AppError::new(endpoint.error_code(), e.to_string())
        })?;

        let result = handle_api_response(response, endpoint).await;

        match &result {
            Ok(_) => info!(
                "{} calculated in {:.3}s",
                endpoint.name(),
                start_time.elapsed().as_secs_f64()
            ),
            Err(e) => warn!("{} calculation failed: {}", endpoint.name(), e),
        }

        result
    }
}

/// Check status and `success` flag, then decode the payload
async fn handle_api_response<T: DeserializeOwned + Send>(
    response: Response,
    endpoint: Endpoint,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::http(format!(
            "{}: {}",
            endpoint.failure_context(),
            status.as_u16()
        ))
        .with_detail("status_code", status.as_u16().to_string()));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| AppError::new(endpoint.error_code(), e.to_string()))?;

    decode_payload(body, endpoint)
}

fn decode_payload<T: DeserializeOwned>(body: Value, endpoint: Endpoint) -> Result<T> {
    if body.get("success").and_then(Value::as_bool) != Some(true) {
        return Err(AppError::api("API returned unsuccessful response"));
    }

    serde_json::from_value(body).map_err(|e| {
        AppError::new(
            endpoint.error_code(),
            format!("Unexpected response from {} API: {e}", endpoint.name()),
        )
    })
}

#[async_trait]
impl AstroApi for AstroApiClient {
    async fn calculate_horoscope(
        &self,
        request: &CalculationRequest,
    ) -> Result<HoroscopeResponse> {
        self.post(Endpoint::Position, request).await
    }

    async fn calculate_aspects(&self, request: &CalculationRequest) -> Result<AspectsResponse> {
        self.post(Endpoint::Aspects, request).await
    }

    async fn calculate_moon_phase(
        &self,
        request: &CalculationRequest,
    ) -> Result<MoonPhaseResponse> {
        self.post(Endpoint::Phase, request).await
    }

    async fn calculate_transits(&self, request: &TransitRequest) -> Result<TransitResponse> {
        self.post(Endpoint::Transit, request).await
    }

    async fn fetch_month_moon_phases(
        &self,
        request: &MonthPhasesRequest,
    ) -> Result<MonthMoonPhasesResponse> {
        self.post(Endpoint::MonthPhase, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn aspects_body(success: Value) -> Value {
        json!({
            "success": success,
            "aspect_count": 1,
            "orb_used": 8.0,
            "aspects": [
                {"planet1": "Sun", "planet2": "Moon", "aspect": "Trine", "degrees": 120.4, "orb": 0.4}
            ]
        })
    }

    #[test]
    fn test_decode_successful_payload() {
        let response: AspectsResponse =
            decode_payload(aspects_body(json!(true)), Endpoint::Aspects).unwrap();
        assert_eq!(response.aspect_count, 1);
        assert_eq!(response.aspects[0].aspect, "Trine");
    }

    #[test]
    fn test_decode_unsuccessful_payload() {
        for flag in [json!(false), Value::Null, json!("true")] {
            let err = decode_payload::<AspectsResponse>(aspects_body(flag), Endpoint::Aspects)
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::ApiError);
            assert_eq!(err.message, "API returned unsuccessful response");
        }
    }

    #[test]
    fn test_decode_malformed_payload_uses_endpoint_code() {
        let err = decode_payload::<TransitResponse>(json!({"success": true}), Endpoint::Transit)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TransitApiError);
    }

    #[tokio::test]
    async fn test_unconfigured_endpoint_is_config_error() {
        let client = AstroApiClient::new(ApiConfig::default()).unwrap();
        let err = client
            .fetch_month_moon_phases(&MonthPhasesRequest {
                year: 2024,
                month: 5,
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ConfigError);
        assert_eq!(err.message, "Month phases API endpoint not configured");
    }
}
