//! Search radius value object
//!
//! The API accepts a radius either as a bare number of meters or as a
//! string with a unit suffix (`"800m"`, `"1.5km"`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Radius around an anchor point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchRadius {
    /// Plain meters
    Meters(u32),
    /// Text with unit suffix, sent verbatim
    Text(String),
}

impl SearchRadius {
    /// Resolve the radius to meters
    ///
    /// # Errors
    ///
    /// Returns `InvalidRadius` if the text form has an unknown unit or a
    /// non-numeric or non-positive value.
    pub fn meters(&self) -> Result<f64, DomainError> {
        match self {
            Self::Meters(m) => Ok(f64::from(*m)),
            Self::Text(text) => parse_radius_text(text),
        }
    }
}

fn parse_radius_text(text: &str) -> Result<f64, DomainError> {
    let trimmed = text.trim().to_ascii_lowercase();
    let invalid = || DomainError::InvalidRadius(text.to_string());

    let (number, factor) = if let Some(km) = trimmed.strip_suffix("km") {
        (km, 1000.0)
    } else if let Some(m) = trimmed.strip_suffix('m') {
        (m, 1.0)
    } else {
        (trimmed.as_str(), 1.0)
    };

    let value: f64 = number.trim().parse().map_err(|_| invalid())?;
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid());
    }

    Ok(value * factor)
}

impl From<u32> for SearchRadius {
    fn from(meters: u32) -> Self {
        Self::Meters(meters)
    }
}

impl From<&str> for SearchRadius {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl fmt::Display for SearchRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meters(m) => write!(f, "{m}m"),
            Self::Text(text) => f.write_str(text),
        }
    }
}
