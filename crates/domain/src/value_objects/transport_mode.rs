//! Transport mode value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// How a journey is travelled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// By car
    Driving,
    /// On foot
    #[default]
    Walking,
    /// By bicycle
    Cycling,
    /// Public transit
    Transit,
}

impl TransportMode {
    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Cycling => "cycling",
            Self::Transit => "transit",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" | "car" => Ok(Self::Driving),
            "walking" | "foot" => Ok(Self::Walking),
            "cycling" | "bike" => Ok(Self::Cycling),
            "transit" => Ok(Self::Transit),
            other => Err(DomainError::UnknownTransportMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values() {
        assert_eq!(TransportMode::Driving.as_str(), "driving");
        assert_eq!(TransportMode::Walking.as_str(), "walking");
        assert_eq!(TransportMode::Cycling.as_str(), "cycling");
        assert_eq!(TransportMode::Transit.as_str(), "transit");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&TransportMode::Cycling).expect("serialize");
        assert_eq!(json, "\"cycling\"");

        let mode: TransportMode = serde_json::from_str("\"transit\"").expect("deserialize");
        assert_eq!(mode, TransportMode::Transit);
    }

    #[test]
    fn test_default_is_walking() {
        assert_eq!(TransportMode::default(), TransportMode::Walking);
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("Driving".parse::<TransportMode>().ok(), Some(TransportMode::Driving));
        assert_eq!("foot".parse::<TransportMode>().ok(), Some(TransportMode::Walking));
        assert!("teleport".parse::<TransportMode>().is_err());
    }
}
