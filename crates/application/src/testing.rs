//! Shared test doubles and fixtures

use std::collections::BTreeMap;

use async_trait::async_trait;
use domain::{Coordinate, SearchRadius, TransportMode};
use integration_camino::{
    Analysis, CaminoClient, CaminoError, ContextRequest, ContextResponse, JourneyRequest,
    JourneyResponse, Pagination, QueryRequest, QueryResponse, QueryResult, RelationshipRequest,
    RelationshipResponse, RelevantPlaces, RouteRequest, RouteResponse, SearchRequest,
    SearchResponse,
};
use mockall::mock;

mock! {
    pub Camino {}

    #[async_trait]
    impl CaminoClient for Camino {
        async fn search(&self, request: SearchRequest) -> Result<SearchResponse, CaminoError>;
        async fn query(&self, request: QueryRequest) -> Result<QueryResponse, CaminoError>;
        async fn relationship(&self, request: RelationshipRequest) -> Result<RelationshipResponse, CaminoError>;
        async fn context(&self, request: ContextRequest) -> Result<ContextResponse, CaminoError>;
        async fn journey(&self, request: JourneyRequest) -> Result<JourneyResponse, CaminoError>;
        async fn route(&self, request: RouteRequest) -> Result<RouteResponse, CaminoError>;
        async fn is_healthy(&self) -> bool;
    }
}

pub fn place(name: &str, lat: f64, lon: f64, confidence: Option<f64>) -> QueryResult {
    QueryResult {
        id: 1,
        kind: "node".to_string(),
        location: Coordinate::new_unchecked(lat, lon),
        tags: BTreeMap::new(),
        name: name.to_string(),
        amenity: None,
        category: None,
        confidence,
        relevance_rank: None,
        address: None,
        metadata: None,
    }
}

/// A place at Times Square carrying a server-assigned category
pub fn tagged_place(name: &str, category: &str, confidence: Option<f64>) -> QueryResult {
    QueryResult {
        category: Some(category.to_string()),
        ..place(name, 40.7589, -73.9851, confidence)
    }
}

#[allow(clippy::cast_possible_truncation)]
pub fn query_response(results: Vec<QueryResult>) -> QueryResponse {
    let count = results.len() as u32;
    QueryResponse {
        query: "test".to_string(),
        results,
        ai_ranked: true,
        pagination: Pagination {
            total_results: count,
            limit: 20,
            offset: 0,
            returned_count: count,
            has_more: false,
        },
        answer: None,
    }
}

/// Context whose listed buckets each hold one place
pub fn context_response(buckets: &[&str]) -> ContextResponse {
    let mut places = RelevantPlaces::default();
    for bucket in buckets {
        let entry = vec![format!("{bucket} spot")];
        match *bucket {
            "restaurants" => places.restaurants = entry,
            "hotels" => places.hotels = entry,
            "shops" => places.shops = entry,
            "attractions" => places.attractions = entry,
            other => {
                places
                    .other
                    .insert(other.to_string(), serde_json::json!(entry));
            },
        }
    }

    ContextResponse {
        area_description: "Busy commercial district".to_string(),
        relevant_places: places,
        location: Coordinate::new_unchecked(40.7589, -73.9851),
        search_radius: SearchRadius::Meters(500),
        total_places_found: 47,
        context_insights: None,
    }
}

pub fn journey_response() -> JourneyResponse {
    JourneyResponse {
        feasible: true,
        total_distance_km: 2.5,
        total_time_minutes: 30.0,
        total_time_formatted: "30 minutes".to_string(),
        transport_mode: TransportMode::Walking,
        route_segments: vec![integration_camino::RouteSegment {
            from: integration_camino::LabeledLocation {
                lat: Some(40.7589),
                lon: Some(-73.9851),
                address: None,
                purpose: Some("start".to_string()),
            },
            to: integration_camino::LabeledLocation {
                lat: Some(40.7590),
                lon: Some(-73.9850),
                address: None,
                purpose: Some("visit:restaurants".to_string()),
            },
            distance_km: 2.5,
            estimated_time: "30 minutes".to_string(),
            duration_minutes: None,
            instructions: None,
        }],
        optimized_order: None,
        analysis: Analysis {
            summary: "Pleasant walk".to_string(),
            optimization_opportunities: Vec::new(),
        },
    }
}
