/// End-to-end tests for GET /api/data
/// Drives the axum router with all four upstreams mocked
mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;
use rust_aggregator_api::aggregation::{AggregationPipeline, PipelineState};
use rust_aggregator_api::handlers::{router, AppState};
use rust_aggregator_api::upstream_client::UpstreamClient;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn get_data(config: rust_aggregator_api::config::Config) -> (StatusCode, Value) {
    let state = Arc::new(AppState::new(config).unwrap());
    let response = router(state)
        .oneshot(Request::builder().uri("/api/data").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn mount_identity(server: &MockServer, nat: &str, country: &str) {
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(random_user_body(nat, country)))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_all_upstreams_healthy() {
    let server = MockServer::start().await;
    mount_identity(&server, "FR", "France").await;

    Mock::given(method("GET"))
        .and(path("/v2/alpha/FR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(country_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v6/er-test-key/latest/EUR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rates_body("EUR")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/top-headlines"))
        .and(query_param("country", "fr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body(4, "top")))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get_data(create_test_config(&server.uri())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["firstName"], "Louise");
    assert_eq!(body["user"]["lastName"], "Bertrand");
    assert_eq!(body["user"]["age"], 37);
    assert_eq!(body["user"]["nat"], "FR");
    assert_eq!(body["country"]["name"], "France");
    assert_eq!(body["country"]["currencyCode"], "EUR");
    assert_eq!(body["rates"]["base"], "EUR");
    assert_eq!(body["rates"]["toUSD"], "1 EUR = 1.0853 USD");
    assert_eq!(body["rates"]["toKZT"], "1 EUR = 520.1200 KZT");
    assert_eq!(body["news"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_geography_timeout_degrades_to_usd_and_keeps_news() {
    let server = MockServer::start().await;
    mount_identity(&server, "FR", "France").await;

    Mock::given(method("GET"))
        .and(path("/v2/alpha/FR"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(country_body())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v6/er-test-key/latest/USD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rates_body("USD")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/top-headlines"))
        .and(query_param("country", "fr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body(5, "top")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body(5, "search")))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri());
    config.upstream_timeout_ms = 300;
    let (status, body) = get_data(config).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["country"],
        serde_json::json!({
            "name": "N/A",
            "capital": "API error",
            "languages": "API error",
            "currencyName": "N/A",
            "currencyCode": "USD",
            "flagUrl": ""
        })
    );
    assert_eq!(body["rates"]["base"], "USD");
    assert_eq!(body["rates"]["toUSD"], "1 USD = 1.0000 USD");

    let news = body["news"].as_array().unwrap();
    assert_eq!(news.len(), 5);
    for article in news {
        for key in ["title", "description", "url", "imageUrl", "source"] {
            assert!(article.get(key).is_some(), "article missing {}", key);
        }
    }
}

#[tokio::test]
async fn test_every_degradable_upstream_down_still_returns_full_shape() {
    let server = MockServer::start().await;
    mount_identity(&server, "BR", "Brazil").await;

    Mock::given(method("GET"))
        .and(path("/v2/alpha/BR"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v6/er-test-key/latest/USD"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/top-headlines"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "Brazil"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get_data(create_test_config(&server.uri())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["country"], "Brazil");
    assert_eq!(body["country"]["name"], "N/A");
    assert_eq!(body["rates"]["toUSD"], "API error");
    assert_eq!(body["rates"]["toKZT"], "API error");
    assert_eq!(body["news"], serde_json::json!([]));
}

#[tokio::test]
async fn test_identity_failure_returns_500_without_running_other_stages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/alpha/FR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(country_body()))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = get_data(create_test_config(&server.uri())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("bad gateway"));
    assert!(error.contains("502"));
    assert!(body.get("user").is_none());
}

#[tokio::test]
async fn test_identity_unreachable_returns_500() {
    // Nothing listens on the discard port
    let mut config = create_test_config("http://127.0.0.1:9");
    config.upstream_timeout_ms = 500;

    let (status, body) = get_data(config).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Couldn't get data from the identity API"));
}

#[tokio::test]
async fn test_pipeline_steps_through_named_states() {
    let server = MockServer::start().await;
    mount_identity(&server, "JP", "Japan").await;

    Mock::given(method("GET"))
        .and(path("/v2/alpha/JP"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Japan",
            "capital": "Tokyo",
            "currencies": [{"code": "JPY"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v6/er-test-key/latest/JPY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rates_body("JPY")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/top-headlines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body(1, "top")))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri());
    let client = UpstreamClient::new(config.upstream_timeout()).unwrap();
    let pipeline = AggregationPipeline::new(&config, client);

    let mut state = PipelineState::Start;
    let mut visited = vec![state.name()];
    while !matches!(state, PipelineState::Done(_)) {
        state = pipeline.advance(state).await.unwrap();
        visited.push(state.name());
    }

    assert_eq!(
        visited,
        vec![
            "start",
            "profile_resolved",
            "country_resolved",
            "rates_resolved",
            "done"
        ]
    );

    let PipelineState::Done(result) = state else {
        panic!("pipeline did not finish");
    };
    assert_eq!(result.country.currency_code, "JPY");
    assert_eq!(result.country.currency_name, "N/A");
    assert_eq!(result.country.languages, "N/A (API Restriction)");
    assert_eq!(result.rates.base_currency_code, "JPY");
}

#[tokio::test]
async fn test_health_route() {
    let config = create_test_config("http://127.0.0.1:9");
    let state = Arc::new(AppState::new(config).unwrap());

    let response = router(state)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
