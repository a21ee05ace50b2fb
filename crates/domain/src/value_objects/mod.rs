//! Value Objects - Immutable, identity-less domain primitives

mod coordinate;
mod search_radius;
mod transport_mode;

pub use coordinate::Coordinate;
pub use search_radius::SearchRadius;
pub use transport_mode::TransportMode;
