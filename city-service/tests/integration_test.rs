use axum::body::Body;
use axum::http::{Request, StatusCode};
use city_service::create_router;
use city_service::lookup::GeocodingClient;
use city_service::service::{CityService, DEFAULT_LIMIT};
use city_service::static_data::static_cities;
use common::models::{CitySource, DirectoryEntry, LookupResponse, SearchResponse};
use common::timezone::UNKNOWN_ZONE;
use http_body_util::BodyExt;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn geocoding_client(mock_server: &MockServer) -> GeocodingClient {
    GeocodingClient::new(
        format!("{}/v1/search", mock_server.uri()),
        Duration::from_secs(2),
        10,
    )
    .expect("Failed to build geocoding client")
}

async fn mount_oslo(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Oslo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {
                    "name": "Oslo",
                    "country": "Norway",
                    "timezone": "Europe/Oslo",
                    "latitude": 59.9127,
                    "longitude": 10.7461,
                    "population": 580000
                },
                {
                    "name": "Oslo Station",
                    "latitude": 1.0,
                    "longitude": 2.0
                }
            ],
            "generationtime_ms": 0.7
        })))
        .mount(mock_server)
        .await;
}

/// Looked-up cities become searchable
#[tokio::test]
async fn test_live_lookup_learns_cities() {
    let mock_server = MockServer::start().await;
    mount_oslo(&mock_server).await;

    let service = CityService::new(10).with_lookup(geocoding_client(&mock_server));
    service.load_static(static_cities()).await;

    // cache an empty answer first so the lookup has something to invalidate
    assert!(service.search_cities("oslo", None, DEFAULT_LIMIT).await.is_empty());

    let response = service.live_lookup("tester", "Oslo").await;
    assert!(response.error.is_none());
    assert!(!response.superseded);
    assert_eq!(response.results.len(), 2);
    assert_eq!(response.results[1].id, UNKNOWN_ZONE);

    let results = service.search_cities("oslo", None, DEFAULT_LIMIT).await;
    assert_eq!(results[0].city_name, "Oslo");
    assert_eq!(results[0].population, 580_000);
}

/// A provider failure surfaces as an error string with no results, after one attempt
#[tokio::test]
async fn test_live_lookup_failure_is_soft() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = CityService::new(10).with_lookup(geocoding_client(&mock_server));
    let before = service.get_total_cities().await;

    let response = service.live_lookup("tester", "Oslo").await;

    assert!(response.results.is_empty());
    assert!(response.error.unwrap().contains("500"));
    assert_eq!(service.get_total_cities().await, before);
}

/// A slow provider times out instead of hanging the request
#[tokio::test]
async fn test_live_lookup_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let client = GeocodingClient::new(
        format!("{}/v1/search", mock_server.uri()),
        Duration::from_millis(100),
        10,
    )
    .unwrap();
    let service = CityService::new(10).with_lookup(client);

    let response = service.live_lookup("tester", "Oslo").await;
    assert!(response.results.is_empty());
    assert!(response.error.is_some());
}

/// When a newer lookup from the same client starts, the older response is discarded
#[tokio::test]
async fn test_superseded_lookup_is_discarded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Osl"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "results": [] }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;
    mount_oslo(&mock_server).await;

    let service = Arc::new(CityService::new(10).with_lookup(geocoding_client(&mock_server)));

    let slow = {
        let service = service.clone();
        tokio::spawn(async move { service.live_lookup("typist", "Osl").await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    let fast = service.live_lookup("typist", "Oslo").await;
    let slow = slow.await.unwrap();

    assert!(!fast.superseded);
    assert_eq!(fast.results.len(), 2);
    assert!(slow.superseded);
    assert!(slow.results.is_empty());
    assert!(slow.sequence < fast.sequence);
}

/// The HTTP surface serves ranked search results
#[tokio::test]
async fn test_search_endpoint() {
    let service = CityService::new(10);
    service.load_static(static_cities()).await;
    let app = create_router(Arc::new(service));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/cities/search?q=delhi")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: SearchResponse = serde_json::from_slice(&bytes).unwrap();
    let names: Vec<_> = body.results.iter().map(|r| r.city_name.as_str()).collect();
    assert_eq!(names, ["Delhi", "New Delhi"]);
}

/// An empty query is a valid request with no results
#[tokio::test]
async fn test_search_endpoint_empty_query() {
    let service = CityService::new(10);
    service.load_static(static_cities()).await;
    let app = create_router(Arc::new(service));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/cities/search")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: SearchResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(body.results.is_empty());
}

/// The lookup endpoint reports provider failures in the body
#[tokio::test]
async fn test_lookup_endpoint_reports_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let service = CityService::new(10).with_lookup(geocoding_client(&mock_server));
    let app = create_router(Arc::new(service));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/cities/lookup?q=Oslo&client=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: LookupResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(body.results.is_empty());
    assert!(body.error.is_some());
}

/// Learned cities are listed with their provenance
#[tokio::test]
async fn test_dynamic_endpoint_lists_learned_cities() {
    let mock_server = MockServer::start().await;
    mount_oslo(&mock_server).await;

    let service = Arc::new(CityService::new(10).with_lookup(geocoding_client(&mock_server)));
    service.live_lookup("client", "Oslo").await;
    let app = create_router(service);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/cities/dynamic")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Vec<DirectoryEntry> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.len(), 2);
    assert!(body.iter().all(|e| e.source == CitySource::Dynamic));
    assert!(body.iter().all(|e| e.last_updated.is_some()));

    let ids: Vec<_> = body.iter().map(|e| e.record.id.as_str()).collect();
    assert_eq!(ids, [UNKNOWN_ZONE, "Europe/Oslo"]);
}
