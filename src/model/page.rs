//! Paging and search parameters.

// self
use crate::{_prelude::*, error::ValidationError, model::GeoPoint};

/// `limit`/`offset` pair sent as query parameters on listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
	/// Page size.
	pub limit: u32,
	/// Number of records to skip.
	pub offset: u32,
}
impl PageRequest {
	/// Default page size.
	pub const DEFAULT_LIMIT: u32 = 10;

	/// Creates a request.
	pub const fn new(limit: u32, offset: u32) -> Self {
		Self { limit, offset }
	}

	/// Request for the 1-based `page` of `per_page` records. Page `0` is treated as page `1`.
	pub const fn for_page(page: u32, per_page: u32) -> Self {
		Self { limit: per_page, offset: page.saturating_sub(1).saturating_mul(per_page) }
	}

	pub(crate) fn query_pairs(&self) -> [(&'static str, String); 2] {
		[("limit", self.limit.to_string()), ("offset", self.offset.to_string())]
	}
}
impl Default for PageRequest {
	fn default() -> Self {
		Self::new(Self::DEFAULT_LIMIT, 0)
	}
}

/// Body of `POST /delivery/findByProximity`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProximityQuery {
	/// Search center.
	pub location: GeoPoint,
	/// Search radius.
	pub radius: f64,
}
impl ProximityQuery {
	/// Creates a query.
	pub const fn new(location: GeoPoint, radius: f64) -> Self {
		Self { location, radius }
	}

	/// Rejects non-finite coordinates or radius.
	pub fn validate(&self) -> Result<(), ValidationError> {
		self.location.validate()?;

		if !self.radius.is_finite() {
			return Err(ValidationError::NotANumber { field: "radius" });
		}

		Ok(())
	}
}

/// Body of `POST /delivery/findByZone`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneQuery {
	/// Zone to search.
	pub zone_id: u64,
}
