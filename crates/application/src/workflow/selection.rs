//! Client-side POI scoring and diversity-constrained selection

use std::collections::HashSet;

use domain::Coordinate;
use integration_camino::QueryResult;
use serde::Serialize;

use super::WorkflowSettings;

/// A place returned by a category query, tagged with the query's category
///
/// The place's own category label wins over the query category once it is
/// selected.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiCandidate {
    pub category: String,
    pub place: QueryResult,
}

/// A place chosen as a journey stop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedPoi {
    pub name: String,
    pub category: String,
    pub location: Coordinate,
    pub confidence: f64,
    pub distance_from_origin: f64,
    pub score: f64,
}

/// Weighted score: confidence plus proximity, proximity capped at
/// `score_radius_m`
///
/// A non-positive or non-finite radius contributes no proximity.
pub fn score(confidence: f64, distance_m: f64, settings: &WorkflowSettings) -> f64 {
    let cap = settings.score_radius_m;
    let proximity = if cap.is_finite() && cap > 0.0 {
        1.0 - distance_m.clamp(0.0, cap) / cap
    } else {
        0.0
    };
    settings
        .confidence_weight
        .mul_add(confidence, (1.0 - settings.confidence_weight) * proximity)
}

/// Pick up to `max_stops` candidates by descending score
///
/// Ties keep their input order. A category already picked is skipped unless
/// the candidate's confidence exceeds the diversity override.
pub fn select_pois(
    origin: Coordinate,
    candidates: &[PoiCandidate],
    max_stops: usize,
    settings: &WorkflowSettings,
) -> Vec<SelectedPoi> {
    let mut scored: Vec<SelectedPoi> = candidates
        .iter()
        .map(|candidate| {
            let confidence = candidate.place.confidence.unwrap_or(0.0).clamp(0.0, 1.0);
            let distance = origin.distance_meters(&candidate.place.location);
            let category = candidate
                .place
                .category_label()
                .unwrap_or(&candidate.category);
            SelectedPoi {
                name: candidate.place.name.clone(),
                category: category.to_string(),
                location: candidate.place.location,
                confidence,
                distance_from_origin: distance,
                score: score(confidence, distance, settings),
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut seen = HashSet::new();
    let mut selected = Vec::with_capacity(max_stops.min(scored.len()));
    for poi in scored {
        if selected.len() >= max_stops {
            break;
        }
        if seen.contains(&poi.category) && poi.confidence <= settings.diversity_override {
            continue;
        }
        seen.insert(poi.category.clone());
        selected.push(poi);
    }
    selected
}
