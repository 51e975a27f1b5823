//! Integration tests for WeatherResolver using wiremock.
//!
//! These tests drive the candidate/fallback chain against a mock Amap server.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zenclock_core::WeatherConfig;
use zenclock_weather::{Coordinates, WeatherData, WeatherError, WeatherResolver};

const WEATHER_PATH: &str = "/v3/weather/weatherInfo";
const REGEO_PATH: &str = "/v3/geocode/regeo";

fn resolver_for(server: &MockServer) -> WeatherResolver {
    let config = WeatherConfig {
        api_base_url: server.uri(),
        api_key: "test-key".into(),
        fallback_area: "110000".into(),
        ..WeatherConfig::default()
    };
    WeatherResolver::from_config(&config).unwrap()
}

fn live_ok(temperature: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "status": "1",
        "count": "1",
        "lives": [{
            "weather": "多云",
            "temperature": temperature,
            "humidity": "70",
            "winddirection": "东南",
            "windpower": "≤3"
        }]
    }))
}

fn live_rejected() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "status": "0",
        "info": "INVALID_PARAMS"
    }))
}

fn forecast_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "status": "1",
        "forecasts": [{"casts": [
            {"week": "1", "dayweather": "晴", "nightweather": "晴", "daytemp": "31", "nighttemp": "24"},
            {"week": "2", "dayweather": "多云", "nightweather": "多云", "daytemp": "30", "nighttemp": "23"},
            {"week": "3", "dayweather": "阵雨", "nightweather": "多云", "daytemp": "28", "nighttemp": "22"},
            {"week": "4", "dayweather": "晴", "nightweather": "晴", "daytemp": "29", "nighttemp": "21"}
        ]}]
    }))
}

async fn mount_live(server: &MockServer, city: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("city", city))
        .and(query_param("extensions", "base"))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

async fn mount_forecast(server: &MockServer, city: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("city", city))
        .and(query_param("extensions", "all"))
        .respond_with(forecast_ok())
        .expect(times)
        .mount(server)
        .await;
}

fn candidates(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_third_candidate_wins_and_drives_forecast() {
    let server = MockServer::start().await;

    mount_live(&server, "440106", live_rejected(), 1).await;
    mount_live(&server, "440100", ResponseTemplate::new(502), 1).await;
    mount_live(&server, "440000", live_ok("28"), 1).await;
    mount_forecast(&server, "440106", 0).await;
    mount_forecast(&server, "440100", 0).await;
    mount_forecast(&server, "440000", 1).await;

    let data = resolver_for(&server)
        .fetch_with_fallback(&candidates(&["440106", "440100", "440000"]), "广东省".into())
        .await;

    assert_eq!(data.temp, "28°C");
    assert_eq!(data.location, "广东省");
    assert_eq!(data.humidity, "70%");
    assert_eq!(data.wind, "东南风 ≤3级");
}

#[tokio::test]
async fn test_first_success_stops_the_search() {
    let server = MockServer::start().await;

    mount_live(&server, "440106", live_ok("27"), 1).await;
    mount_live(&server, "440100", live_ok("99"), 0).await;
    mount_forecast(&server, "440106", 1).await;

    let data = resolver_for(&server)
        .fetch_with_fallback(&candidates(&["440106", "440100"]), "天河区".into())
        .await;

    assert_eq!(data.temp, "27°C");
}

#[tokio::test]
async fn test_forecast_skips_today_and_keeps_three_days() {
    let server = MockServer::start().await;

    mount_live(&server, "440106", live_ok("28"), 1).await;
    mount_forecast(&server, "440106", 1).await;

    let data = resolver_for(&server)
        .fetch_with_fallback(&candidates(&["440106"]), "天河区".into())
        .await;

    let days: Vec<&str> = data.forecast.iter().map(|d| d.day.as_str()).collect();
    assert_eq!(days, vec!["周二", "周三", "周四"]);
    assert_eq!(data.forecast[1].condition, "阵雨转多云");
    assert_eq!(data.forecast[0].temp, "30° / 23°");
}

#[tokio::test]
async fn test_all_candidates_fail_uses_fallback_area() {
    let server = MockServer::start().await;

    mount_live(&server, "440106", live_rejected(), 1).await;
    mount_live(&server, "110000", live_ok("15"), 1).await;
    mount_forecast(&server, "440106", 0).await;
    mount_forecast(&server, "110000", 1).await;

    let data = resolver_for(&server)
        .fetch_with_fallback(&candidates(&["440106"]), "天河区".into())
        .await;

    assert_eq!(data.temp, "15°C");
    assert!(!data.is_unavailable());
}

#[tokio::test]
async fn test_everything_fails_returns_placeholder() {
    let server = MockServer::start().await;

    mount_live(&server, "440106", live_rejected(), 1).await;
    mount_live(&server, "天河区", ResponseTemplate::new(500), 1).await;
    mount_live(&server, "110000", live_rejected(), 1).await;
    Mock::given(method("GET"))
        .and(query_param("extensions", "all"))
        .respond_with(forecast_ok())
        .expect(0)
        .mount(&server)
        .await;

    let data = resolver_for(&server)
        .fetch_with_fallback(&candidates(&["440106", "天河区"]), "天河区".into())
        .await;

    assert_eq!(data, WeatherData::unavailable());
    assert_eq!(data.temp, "--");
    assert_eq!(data.location, "离线");
    assert!(data.forecast.is_empty());
}

#[tokio::test]
async fn test_forecast_failure_keeps_current_conditions() {
    let server = MockServer::start().await;

    mount_live(&server, "440106", live_ok("28"), 1).await;
    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .and(query_param("extensions", "all"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let data = resolver_for(&server)
        .fetch_with_fallback(&candidates(&["440106"]), "天河区".into())
        .await;

    assert_eq!(data.temp, "28°C");
    assert!(data.forecast.is_empty());
}

#[tokio::test]
async fn test_resolve_geocodes_then_walks_area_names() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(REGEO_PATH))
        .and(query_param("location", "113.264435,23.129163"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "1",
            "info": "OK",
            "regeocode": {"addressComponent": {
                "adcode": "440106",
                "district": "天河区",
                "city": "广州市",
                "province": "广东省"
            }}
        })))
        .expect(1)
        .mount(&server)
        .await;

    mount_live(&server, "440106", live_rejected(), 1).await;
    mount_live(&server, "天河区", live_ok("29"), 1).await;
    mount_live(&server, "广州市", live_ok("0"), 0).await;
    mount_forecast(&server, "天河区", 1).await;

    let data = resolver_for(&server)
        .resolve(&Coordinates::new(23.129163, 113.264435))
        .await
        .unwrap();

    assert_eq!(data.temp, "29°C");
    assert_eq!(data.location, "天河区");
    assert_eq!(data.forecast.len(), 3);
}

#[tokio::test]
async fn test_municipality_with_empty_city_array() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(REGEO_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "1",
            "regeocode": {"addressComponent": {
                "adcode": "110105",
                "district": "朝阳区",
                "city": [],
                "province": "北京市"
            }}
        })))
        .mount(&server)
        .await;

    mount_live(&server, "110105", live_ok("12"), 1).await;
    mount_forecast(&server, "110105", 1).await;

    let data = resolver_for(&server)
        .resolve(&Coordinates::new(39.9219, 116.4436))
        .await
        .unwrap();

    assert_eq!(data.location, "朝阳区");
    assert_eq!(data.temp, "12°C");
}

#[tokio::test]
async fn test_geocode_failure_is_an_error_and_skips_weather() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(REGEO_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "0",
            "info": "INVALID_USER_KEY",
            "infocode": "10001"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(WEATHER_PATH))
        .respond_with(live_ok("20"))
        .expect(0)
        .mount(&server)
        .await;

    let result = resolver_for(&server)
        .resolve(&Coordinates::new(23.13, 113.26))
        .await;

    match result {
        Err(WeatherError::Geocode(info)) => assert_eq!(info, "INVALID_USER_KEY"),
        other => panic!("expected geocode error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_geocode_http_error_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(REGEO_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = resolver_for(&server)
        .resolve(&Coordinates::new(23.13, 113.26))
        .await;

    assert!(matches!(result, Err(WeatherError::Network(_))));
}
