//! Geographic points and the lenient location decoding couriers need.
//!
//! Zones always send `{lat, lng}`. Courier records are less disciplined: the backend has been seen
//! returning `{lat, lng}`, `{latitude, longitude}`, and either of those serialized into a JSON
//! string. [`deserialize_lenient_location`] accepts all of them and maps anything else to `None`
//! so one bad record does not fail a whole listing.

// crates.io
use serde::Deserializer;
// self
use crate::{_prelude::*, error::ValidationError};

/// Latitude/longitude pair in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
	/// Latitude.
	pub lat: f64,
	/// Longitude.
	pub lng: f64,
}
impl GeoPoint {
	/// Creates a point.
	pub const fn new(lat: f64, lng: f64) -> Self {
		Self { lat, lng }
	}

	/// Rejects NaN and infinite coordinates.
	pub fn validate(&self) -> Result<(), ValidationError> {
		if !self.lat.is_finite() {
			return Err(ValidationError::NotANumber { field: "latitude" });
		}
		if !self.lng.is_finite() {
			return Err(ValidationError::NotANumber { field: "longitude" });
		}

		Ok(())
	}
}
impl Display for GeoPoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{:.6}, {:.6}", self.lat, self.lng)
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireLocation {
	Short { lat: f64, lng: f64 },
	Long { latitude: f64, longitude: f64 },
	Encoded(String),
	Other(serde_json::Value),
}
impl WireLocation {
	fn into_point(self, depth: u8) -> Option<GeoPoint> {
		match self {
			Self::Short { lat, lng } => Some(GeoPoint::new(lat, lng)),
			Self::Long { latitude, longitude } => Some(GeoPoint::new(latitude, longitude)),
			// A string holding another string is not a location.
			Self::Encoded(raw) if depth == 0 =>
				serde_json::from_str::<Self>(&raw).ok()?.into_point(depth + 1),
			Self::Encoded(_) | Self::Other(_) => None,
		}
	}
}

/// Decodes any known courier location shape; unknown shapes become `None`.
pub fn deserialize_lenient_location<'de, D>(deserializer: D) -> Result<Option<GeoPoint>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(WireLocation::deserialize(deserializer)?.into_point(0))
}
