//! Integration tests for the Camino client (wiremock-based)

use domain::{Coordinate, TransportMode};
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_camino::{
    CONNECTION_STATUS, CaminoClient, CaminoConfig, CaminoError, ContextRequest, HttpCaminoClient,
    JourneyConstraints, JourneyRequest, QueryRequest, RelationshipRequest, RouteMode,
    RouteRequest, SearchRequest, TIMEOUT_STATUS, Waypoint,
};

fn client_for(server: &MockServer) -> HttpCaminoClient {
    HttpCaminoClient::new(CaminoConfig::for_testing(server.uri())).unwrap()
}

fn sample_query_response() -> serde_json::Value {
    json!({
        "query": "coffee shops",
        "results": [
            {
                "id": 1001,
                "type": "node",
                "location": {"lat": 40.7831, "lon": -73.9712},
                "tags": {"amenity": "cafe", "name": "Blue Bottle Coffee"},
                "name": "Blue Bottle Coffee",
                "amenity": "cafe",
                "confidence": 0.95,
                "relevance_rank": 1
            },
            {
                "id": 1002,
                "type": "node",
                "location": {"lat": 40.7835, "lon": -73.9720},
                "name": "Joe Coffee",
                "confidence": 0.88,
                "relevance_rank": 2
            }
        ],
        "ai_ranked": true,
        "pagination": {
            "total_results": 2, "limit": 10, "offset": 0,
            "returned_count": 2, "has_more": false
        }
    })
}

fn central_park() -> Coordinate {
    Coordinate::new(40.7831, -73.9712).unwrap()
}

#[tokio::test]
async fn test_query_sends_ordered_params_and_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("query", "coffee shops"))
        .and(header("x-api-key", "test-api-key"))
        .and(header("content-type", "application/json"))
        .and(header(
            "user-agent",
            concat!("camino-ai-rust/", env!("CARGO_PKG_VERSION")),
        ))
        .and(header_exists("x-request-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_query_response()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = QueryRequest::new("coffee shops")
        .near(central_park())
        .with_radius(1000)
        .with_limit(10);

    let response = client.query(request).await.unwrap();
    assert_eq!(response.results.len(), 2);
    assert_eq!(response.results[0].name, "Blue Bottle Coffee");
    assert!(response.ai_ranked);

    let received = server.received_requests().await.unwrap();
    assert_eq!(
        received[0].url.query(),
        Some(
            "query=coffee+shops&lat=40.7831&lon=-73.9712&radius=1000&rank=true&limit=10&offset=0&answer=false&mode=basic"
        )
    );
}

#[tokio::test]
async fn test_bare_query_uses_defaults() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "test", "results": [], "ai_ranked": false,
            "pagination": {"total_results": 0, "limit": 20, "offset": 0,
                           "returned_count": 0, "has_more": false}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client.query("test".into()).await.unwrap();
    assert!(response.results.is_empty());

    let received = server.received_requests().await.unwrap();
    assert_eq!(
        received[0].url.query(),
        Some("query=test&rank=true&limit=20&offset=0&answer=false&mode=basic")
    );
}

#[tokio::test]
async fn test_request_ids_are_unique_per_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_query_response()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.query("a".into()).await.unwrap();
    client.query("b".into()).await.unwrap();

    let received = server.received_requests().await.unwrap();
    let first = received[0].headers.get("x-request-id").unwrap();
    let second = received[1].headers.get("x-request-id").unwrap();
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid API key"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).query("test".into()).await.unwrap_err();
    match &err {
        CaminoError::Authentication { status_code, .. } => assert_eq!(*status_code, 401),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("Invalid API key"));
    assert_eq!(err.response(), Some(&json!({"message": "Invalid API key"})));
}

#[tokio::test]
async fn test_rate_limit_with_retry_after_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "60")
                .set_body_json(json!({"message": "Rate limit exceeded"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).query("test".into()).await.unwrap_err();
    assert!(matches!(err, CaminoError::RateLimit { .. }));
    assert_eq!(err.retry_after(), Some(60));
    assert_eq!(err.status_code(), Some(429));
}

#[tokio::test]
async fn test_rate_limit_without_retry_after_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_query_response()))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server).query("coffee".into()).await.unwrap();
    assert_eq!(response.results.len(), 2);
}

#[tokio::test]
async fn test_server_error_exhausts_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "Internal server error"})),
        )
        .expect(4)
        .mount(&server)
        .await;

    let err = client_for(&server).query("test".into()).await.unwrap_err();
    assert!(matches!(err, CaminoError::Api { status_code: 500, .. }));
    assert!(err.to_string().contains("Internal server error"));
}

#[tokio::test]
async fn test_server_error_then_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_query_response()))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server).query("coffee".into()).await.unwrap();
    assert_eq!(response.query, "coffee shops");
}

#[tokio::test]
async fn test_bad_request_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(400).set_body_string("limit out of range"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .search("eiffel tower".into())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(400));
    assert_eq!(err.response(), Some(&json!("limit out of range")));
}

#[tokio::test]
async fn test_malformed_success_body_is_validation_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": "nope"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).query("test".into()).await.unwrap_err();
    assert!(matches!(err, CaminoError::Validation { .. }));
}

#[tokio::test]
async fn test_timeout_maps_to_synthetic_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(std::time::Duration::from_secs(3))
                .set_body_json(json!({"results": []})),
        )
        .mount(&server)
        .await;

    let config = CaminoConfig::for_testing(server.uri())
        .with_timeout_secs(1)
        .with_max_retries(0);
    let client = HttpCaminoClient::new(config).unwrap();

    let err = client.search("slow".into()).await.unwrap_err();
    assert_eq!(err.status_code(), Some(TIMEOUT_STATUS));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_connection_failure_maps_to_synthetic_status() {
    let config = CaminoConfig::for_testing("http://127.0.0.1:1").with_max_retries(1);
    let client = HttpCaminoClient::new(config).unwrap();

    let err = client.search("anything".into()).await.unwrap_err();
    assert_eq!(err.status_code(), Some(CONNECTION_STATUS));
    assert!(matches!(err, CaminoError::Api { .. }));
}

#[tokio::test]
async fn test_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "Eiffel Tower"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "Eiffel Tower",
            "results": [{
                "display_name": "Tour Eiffel, Paris, France",
                "lat": "48.8582599",
                "lon": "2.2945006",
                "type": "attraction",
                "importance": 0.95
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .search(SearchRequest::new("Eiffel Tower").with_limit(3))
        .await
        .unwrap();
    assert_eq!(response.results.len(), 1);
    assert!((response.results[0].lat - 48.858_259_9).abs() < 1e-9);
}

#[tokio::test]
async fn test_relationship_posts_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/relationship"))
        .and(body_json(json!({
            "start": {"lat": 40.7128, "lon": -74.006},
            "end": {"lat": 40.7589, "lon": -73.9851},
            "include": ["distance", "direction", "travel_time", "description"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "distance": "1.2 km",
            "direction": "northeast",
            "walking_time": "15 minutes",
            "actual_distance_km": 1.235,
            "duration_seconds": 900,
            "driving_time": "5 minutes",
            "description": "1.2 km northeast, about 15 minutes on foot"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = RelationshipRequest::new(
        Coordinate::new(40.7128, -74.0060).unwrap(),
        Coordinate::new(40.7589, -73.9851).unwrap(),
    );
    let response = client_for(&server).relationship(request).await.unwrap();
    assert_eq!(response.distance.as_deref(), Some("1.2 km"));
    assert_eq!(response.walking_time.as_deref(), Some("15 minutes"));
    assert!((response.actual_distance_km.unwrap() - 1.235).abs() < 1e-9);
}

#[tokio::test]
async fn test_context() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/context"))
        .and(body_json(json!({
            "location": {"lat": 40.7589, "lon": -73.9851},
            "radius": 500,
            "context": "lunch options"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "area_description": "Busy commercial district in Midtown Manhattan",
            "relevant_places": {
                "restaurants": ["Joe's Pizza"],
                "hotels": [], "services": [], "transportation": ["Times Sq-42 St"],
                "shops": [], "attractions": ["Times Square"], "leisure": [], "offices": []
            },
            "location": {"lat": 40.7589, "lon": -73.9851},
            "search_radius": 500,
            "total_places_found": 47
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = ContextRequest::new(Coordinate::new(40.7589, -73.9851).unwrap(), 500)
        .with_context("lunch options");
    let response = client_for(&server).context(request).await.unwrap();
    assert_eq!(response.total_places_found, 47);
    assert_eq!(
        response.relevant_places.non_empty_buckets(),
        vec!["restaurants", "transportation", "attractions"]
    );
}

#[tokio::test]
async fn test_journey() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/journey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "feasible": true,
            "total_distance_km": 3.2,
            "total_time_minutes": 40,
            "total_time_formatted": "40 minutes",
            "transport_mode": "walking",
            "route_segments": [{
                "from": {"lat": 40.7128, "lon": -74.006, "purpose": "start"},
                "to": {"lat": 40.7589, "lon": -73.9851, "purpose": "visit:cafe"},
                "distance_km": 3.2,
                "estimated_time": "40 minutes"
            }],
            "analysis": {"summary": "Pleasant walk", "optimization_opportunities": []}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = JourneyRequest::new(
        vec![
            Waypoint::at(Coordinate::new(40.7128, -74.0060).unwrap()).with_purpose("start"),
            Waypoint::address("Times Square").with_purpose("visit:cafe"),
        ],
        JourneyConstraints::new(TransportMode::Walking).with_time_budget("2h"),
    );
    let response = client_for(&server).journey(request).await.unwrap();
    assert!(response.feasible);
    assert!((response.total_distance_meters() - 3200.0).abs() < 1e-9);

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["waypoints"][1], json!({"address": "Times Square", "purpose": "visit:cafe"}));
    assert_eq!(body["constraints"]["transport"], "walking");
    assert_eq!(body["optimize"], true);
}

#[tokio::test]
async fn test_route() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/route"))
        .and(body_json(json!({
            "start_lat": 40.7128, "start_lon": -74.006,
            "end_lat": 40.7589, "end_lon": -73.9851,
            "mode": "bike",
            "include_instructions": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": {"total_distance_meters": 5230.0, "total_duration_seconds": 1260.0},
            "instructions": ["Head north on Broadway"],
            "include_geometry": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = RouteRequest::new(
        Coordinate::new(40.7128, -74.0060).unwrap(),
        Coordinate::new(40.7589, -73.9851).unwrap(),
    )
    .with_mode(RouteMode::Bike)
    .with_instructions(true);

    let response = client_for(&server).route(request).await.unwrap();
    assert!((response.summary.total_distance_meters - 5230.0).abs() < 1e-9);
    assert_eq!(response.instructions.len(), 1);
}

#[tokio::test]
async fn test_concurrent_calls_share_one_client() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_query_response()))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (a, b, c) = tokio::join!(
        client.query("a".into()),
        client.query("b".into()),
        client.query("c".into())
    );
    assert!(a.is_ok() && b.is_ok() && c.is_ok());
}

#[tokio::test]
async fn test_scoped_client_returns_body_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_query_response()))
        .mount(&server)
        .await;

    let count = HttpCaminoClient::scoped(CaminoConfig::for_testing(server.uri()), |client| async move {
        let response = client.query("coffee".into()).await?;
        Ok::<_, CaminoError>(response.results.len())
    })
    .await
    .unwrap();

    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_scoped_client_escaping_clone_stays_usable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_query_response()))
        .expect(1)
        .mount(&server)
        .await;

    let kept = HttpCaminoClient::scoped(CaminoConfig::for_testing(server.uri()), |client| async move {
        Ok::<_, CaminoError>(client)
    })
    .await
    .unwrap();

    assert_eq!(std::sync::Arc::strong_count(&kept), 1);
    let response = kept.query_str("coffee").await.unwrap();
    assert_eq!(response.results.len(), 2);
}

#[tokio::test]
async fn test_bare_string_helpers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("query", "coffee"))
        .and(query_param("limit", "20"))
        .and(query_param("rank", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_query_response()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "Eiffel Tower"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.query_str("coffee").await.unwrap().results.len(), 2);
    assert!(client.search_str("Eiffel Tower").await.unwrap().results.is_empty());
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    assert!(client_for(&server).is_healthy().await);

    let unreachable = HttpCaminoClient::new(
        CaminoConfig::for_testing("http://127.0.0.1:1").with_max_retries(0),
    )
    .unwrap();
    assert!(!unreachable.is_healthy().await);
}
