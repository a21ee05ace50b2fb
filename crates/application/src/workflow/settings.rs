//! Tunables for the exploration workflow

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Workflow configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSettings {
    /// Categories used when the context lookup fails
    #[serde(default = "default_fallback_categories")]
    pub fallback_categories: Vec<String>,

    /// Categories used when neither the caller nor the context supplies any
    #[serde(default = "default_categories")]
    pub default_categories: Vec<String>,

    /// Distance (meters) beyond which proximity stops adding to the score
    #[serde(default = "default_score_radius_m")]
    pub score_radius_m: f64,

    /// Weight of confidence in the score; proximity gets the remainder
    #[serde(default = "default_confidence_weight")]
    pub confidence_weight: f64,

    /// Confidence above which a repeated category is still accepted
    #[serde(default = "default_diversity_override")]
    pub diversity_override: f64,

    /// Results requested per category query
    #[serde(default = "default_per_category_limit")]
    pub per_category_limit: u32,

    #[serde(default = "default_time_budget")]
    pub time_budget: String,

    #[serde(default = "default_preferences")]
    pub preferences: Vec<String>,
}

fn default_fallback_categories() -> Vec<String> {
    vec!["restaurants".to_string(), "cafes".to_string()]
}

fn default_categories() -> Vec<String> {
    ["restaurants", "cafes", "attractions", "shopping"]
        .into_iter()
        .map(String::from)
        .collect()
}

const fn default_score_radius_m() -> f64 {
    1000.0
}

const fn default_confidence_weight() -> f64 {
    0.7
}

const fn default_diversity_override() -> f64 {
    0.9
}

const fn default_per_category_limit() -> u32 {
    5
}

fn default_time_budget() -> String {
    "2h".to_string()
}

fn default_preferences() -> Vec<String> {
    vec!["scenic".to_string(), "safe".to_string()]
}

/// Rejected workflow settings
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("fallback_categories must not be empty")]
    NoFallbackCategories,

    #[error("score_radius_m must be positive, got {0}")]
    ScoreRadius(f64),

    #[error("confidence_weight must be within 0..=1, got {0}")]
    ConfidenceWeight(f64),

    #[error("per_category_limit must be within 1..=100, got {0}")]
    PerCategoryLimit(u32),
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            fallback_categories: default_fallback_categories(),
            default_categories: default_categories(),
            score_radius_m: default_score_radius_m(),
            confidence_weight: default_confidence_weight(),
            diversity_override: default_diversity_override(),
            per_category_limit: default_per_category_limit(),
            time_budget: default_time_budget(),
            preferences: default_preferences(),
        }
    }
}

impl WorkflowSettings {
    /// Validate the settings
    ///
    /// # Errors
    ///
    /// Returns the first invalid value.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.fallback_categories.is_empty() {
            return Err(SettingsError::NoFallbackCategories);
        }
        if !(self.score_radius_m.is_finite() && self.score_radius_m > 0.0) {
            return Err(SettingsError::ScoreRadius(self.score_radius_m));
        }
        if !(0.0..=1.0).contains(&self.confidence_weight) {
            return Err(SettingsError::ConfidenceWeight(self.confidence_weight));
        }
        if !(1..=100).contains(&self.per_category_limit) {
            return Err(SettingsError::PerCategoryLimit(self.per_category_limit));
        }
        Ok(())
    }
}
