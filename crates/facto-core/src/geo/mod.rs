//! Geocoding lookup used to validate place-name candidates.
//!
//! The lookup sits behind a trait so tests can substitute a deterministic
//! fake and production can swap in a caching or batching client.

mod nominatim;

pub use nominatim::NominatimClient;

use crate::error::GeocodeError;

/// One geocoding match for a candidate name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodePlace {
    /// OSM feature class, e.g. "place" or "boundary".
    pub class: String,
    /// OSM feature type within the class, e.g. "city" or "administrative".
    pub kind: String,
    /// Human-readable resolved name.
    pub display_name: String,
}

/// Result type for geocoding operations.
pub type Result<T> = std::result::Result<T, GeocodeError>;

/// A place-name lookup service.
pub trait GeocodeLookup {
    /// Return the best match for `name`, or `None` when the service knows
    /// no such place.
    fn lookup(&self, name: &str) -> Result<Option<GeocodePlace>>;
}
