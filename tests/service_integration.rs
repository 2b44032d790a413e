//! End-to-end tests of the form services against mocked HTTP services

use std::sync::Arc;

use astrocalc::config::{ApiConfig, GeocodingConfig};
use astrocalc::{
    AstroApi, AstroApiClient, CalculationKind, CalculationResult, ErrorCode, FormData, Geocoder,
    GeocodingClient, HoroscopeService, InputMode, LocationForm, MonthMoonPhasesFormData,
    MonthMoonPhasesService, TransitFormData, TransitService,
};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_config(server: &MockServer, api_key: Option<&str>) -> ApiConfig {
    let uri = server.uri();
    ApiConfig {
        api_key: api_key.map(str::to_string),
        position_url: format!("{uri}/position"),
        aspects_url: format!("{uri}/aspects"),
        phase_url: format!("{uri}/phase"),
        transit_url: format!("{uri}/transit"),
        month_phase_url: format!("{uri}/month-phase"),
        timeout_seconds: 5,
    }
}

fn clients(server: &MockServer, api_key: Option<&str>) -> (Arc<dyn AstroApi>, Arc<dyn Geocoder>) {
    let api = AstroApiClient::new(api_config(server, api_key)).unwrap();
    let geocoder = GeocodingClient::new(&GeocodingConfig {
        base_url: server.uri(),
        user_agent: "HoroscopeCalculator/1.0".to_string(),
    })
    .unwrap();
    (Arc::new(api), Arc::new(geocoder))
}

fn birth_form(latitude: &str, longitude: &str) -> LocationForm<FormData> {
    LocationForm::with_data(
        FormData {
            date: "2024-05-01".to_string(),
            time: "14:30".to_string(),
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
            city: String::new(),
        },
        InputMode::Coordinates,
    )
}

fn horoscope_body() -> Value {
    json!({
        "success": true,
        "birth_data": {
            "date": {"day": 1, "month": 5, "year": 2024},
            "time": {"hour": 14, "minute": 30, "second": 0},
            "location": {"latitude": 45.4642, "longitude": 9.19}
        },
        "horoscope": {
            "planets": {"Sun": {"sign": "Taurus", "degree_in_sign": 11.2}},
            "houses": {"1": {"sign": "Virgo", "degree_in_sign": 3.5}}
        },
        "lenormand_card": {"card": "Fox", "moon_sign": "Pisces", "moon_decan": 2}
    })
}

#[tokio::test]
async fn test_horoscope_posts_expected_payload_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/position"))
        .and(header("authorization", "Bearer secret-key"))
        .and(body_json(json!({
            "date": [2024, 5, 1],
            "time": [14, 30, 0],
            "latitude": 45.4642,
            "longitude": 9.19,
            "timezone_offset_hours": 1.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(horoscope_body()))
        .expect(1)
        .mount(&server)
        .await;

    let (api, geocoder) = clients(&server, Some("secret-key"));
    let mut service = HoroscopeService::new(api, geocoder, 1.0);

    let result = service
        .calculate(CalculationKind::Horoscope, &birth_form("45.4642", "9.19"))
        .await
        .unwrap();

    let CalculationResult::Horoscope(horoscope) = result else {
        panic!("expected a horoscope result");
    };
    assert_eq!(horoscope.horoscope.planets["Sun"].sign, "Taurus");
    assert_eq!(horoscope.lenormand_card.unwrap().card, "Fox");
    assert!(service.state.data().is_some());
    assert!(service.state.error().is_none());
}

#[tokio::test]
async fn test_http_failure_is_recorded_without_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/position"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (api, geocoder) = clients(&server, Some("secret-key"));
    let mut service = HoroscopeService::new(api, geocoder, 1.0);

    let err = service
        .calculate(CalculationKind::Horoscope, &birth_form("45.4642", "9.19"))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::HttpError);
    assert_eq!(err.message, "Failed to calculate horoscope: 500");
    assert!(service.state.data().is_none());
    assert_eq!(service.state.error(), Some(&err));
    assert!(!service.state.is_loading());
}

#[tokio::test]
async fn test_unsuccessful_flag_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/aspects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "aspect_count": 0,
            "orb_used": 8.0,
            "aspects": []
        })))
        .mount(&server)
        .await;

    let (api, geocoder) = clients(&server, None);
    let mut service = HoroscopeService::new(api, geocoder, 1.0);

    let err = service
        .calculate(CalculationKind::Aspects, &birth_form("45.4642", "9.19"))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ApiError);
    assert_eq!(err.message, "API returned unsuccessful response");
}

#[tokio::test]
async fn test_validation_failure_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(horoscope_body()))
        .expect(0)
        .mount(&server)
        .await;

    let (api, geocoder) = clients(&server, Some("secret-key"));
    let mut service = HoroscopeService::new(api, geocoder, 1.0);

    let err = service
        .calculate(CalculationKind::Horoscope, &birth_form("91", "9.19"))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.message, "Latitude must be between -90 and 90");
}

#[tokio::test]
async fn test_city_is_geocoded_before_calculation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Milan"))
        .and(query_param("limit", "1"))
        .and(header("user-agent", "HoroscopeCalculator/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "lat": "45.4642",
            "lon": "9.19",
            "display_name": "Milano, Lombardia, Italia",
            "address": {"city": "Milano", "country": "Italia"}
        }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/phase"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "moon_phase": {
                "phase_name": "Waning Crescent",
                "age_days": 23.1,
                "fraction_of_cycle": 0.78,
                "illuminated_fraction": 0.42,
                "julian_date": 2460432.0625
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, geocoder) = clients(&server, Some("secret-key"));
    let mut service = HoroscopeService::new(api, geocoder, 1.0);
    let mut form = birth_form("", "");
    form.switch_input_mode(InputMode::City);
    form.set_field("city", "Milan").unwrap();

    let result = service
        .calculate(CalculationKind::MoonPhase, &form)
        .await
        .unwrap();

    let CalculationResult::MoonPhase(phase) = result else {
        panic!("expected a moon phase result");
    };
    assert_eq!(phase.moon_phase.phase_name, "Waning Crescent");
}

#[tokio::test]
async fn test_city_search_fills_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "lat": "41.8933",
            "lon": "12.4829",
            "display_name": "Roma, Lazio, Italia",
            "address": {"city": "Roma", "country": "Italia"}
        }])))
        .mount(&server)
        .await;

    let (api, geocoder) = clients(&server, None);
    let mut service = HoroscopeService::new(api, geocoder, 1.0);
    let mut form: LocationForm<FormData> = LocationForm::new();
    form.set_field("city", "Rome").unwrap();

    let found = service.search_city(&mut form).await.unwrap();

    assert_eq!(found.city, "Roma");
    assert_eq!(form.data.latitude, "41.8933");
    assert_eq!(form.data.longitude, "12.4829");
    assert_eq!(service.search_state.data(), Some(&found));
}

#[tokio::test]
async fn test_unknown_city_is_city_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let (api, geocoder) = clients(&server, None);
    let mut service = HoroscopeService::new(api, geocoder, 1.0);
    let mut form: LocationForm<FormData> = LocationForm::new();
    form.set_field("city", "Atlantis").unwrap();

    let err = service.search_city(&mut form).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::CityNotFound);
    assert_eq!(err.message, "City not found");
    assert!(form.data.latitude.is_empty());
}

#[tokio::test]
async fn test_geocoding_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (_, geocoder) = clients(&server, None);
    let err = geocoder.search_city("Milan").await.unwrap_err();

    assert_eq!(err.code, ErrorCode::HttpError);
    assert_eq!(err.message, "HTTP error! status: 503");
}

#[tokio::test]
async fn test_transits_request_carries_step_and_planet() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transit"))
        .and(body_json(json!({
            "year": 2025,
            "month": 3,
            "latitude": 45.0,
            "longitude": 9.0,
            "timezone_offset_hours": 1.0,
            "planet": "Mars",
            "step_minutes": 30
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "transits": [{
                "planet": "Mars",
                "angle": "ASC",
                "datetime_local": "2025-03-04T06:12:00",
                "longitude": 95.2,
                "sign": "Cancer",
                "degree_in_sign": 5.2,
                "decan": 1
            }],
            "parameters": {
                "year": 2025,
                "month": 3,
                "location": {"latitude": 45.0, "longitude": 9.0, "timezone_offset_hours": 1.0},
                "planet": "Mars",
                "step_minutes": 30
            },
            "total_transits": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (api, geocoder) = clients(&server, Some("secret-key"));
    let mut service = TransitService::new(api, geocoder, 1.0, 30);
    let form = LocationForm::with_data(
        TransitFormData {
            year: "2025".to_string(),
            month: "3".to_string(),
            planet: "mars".to_string(),
            latitude: "45".to_string(),
            longitude: "9".to_string(),
            city: String::new(),
        },
        InputMode::Coordinates,
    );

    let result = service.calculate_transits(&form).await.unwrap();

    let CalculationResult::Transit(transits) = result else {
        panic!("expected a transit result");
    };
    assert_eq!(transits.total_transits, 1);
    assert_eq!(transits.transits[0].angle, "ASC");
}

#[tokio::test]
async fn test_month_phases_year_out_of_range_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (api, _) = clients(&server, Some("secret-key"));
    let mut service = MonthMoonPhasesService::new(api);

    let err = service
        .calculate_month_moon_phases(&MonthMoonPhasesFormData {
            year: "2101".to_string(),
            month: "1".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.message, "Year must be between 1900 and 2100");
    assert!(service.state.error().is_some());
}

#[tokio::test]
async fn test_month_phases_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/month-phase"))
        .and(body_json(json!({"year": 2024, "month": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "month_moon_phases": [
                {"date": "2024-05-01", "phase_name": "Waning Crescent", "age_days": 22.9, "illuminated_fraction": 0.44},
                {"date": "2024-05-08", "phase_name": "New Moon", "age_days": 0.3, "illuminated_fraction": 0.0}
            ],
            "request_data": {"year": 2024, "month": 5}
        })))
        .mount(&server)
        .await;

    let (api, _) = clients(&server, None);
    let mut service = MonthMoonPhasesService::new(api);

    let result = service
        .calculate_month_moon_phases(&MonthMoonPhasesFormData {
            year: "2024".to_string(),
            month: "5".to_string(),
        })
        .await
        .unwrap();

    let CalculationResult::MonthMoonPhases(month) = result else {
        panic!("expected month moon phases");
    };
    assert_eq!(month.month_moon_phases.len(), 2);
    assert_eq!(month.month_moon_phases[1].phase_name, "New Moon");
}
