//! Service zones: circular areas couriers are assigned to.

// self
use crate::{_prelude::*, error::ValidationError, model::GeoPoint};

/// Zone as returned by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Zone {
	/// Backend identifier.
	pub id: u64,
	/// Display name.
	pub name: String,
	/// Center of the zone.
	pub location: GeoPoint,
	/// Radius around the center.
	pub radius: f64,
}

/// Payload for creating a zone; every field is required.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewZone {
	/// Display name.
	pub name: String,
	/// Center of the zone.
	pub location: GeoPoint,
	/// Radius around the center.
	pub radius: f64,
}
impl NewZone {
	/// Creates a zone payload.
	pub fn new(name: impl Into<String>, location: GeoPoint, radius: f64) -> Self {
		Self { name: name.into(), location, radius }
	}

	/// Existence checks run before the zone is sent.
	pub fn validate(&self) -> Result<(), ValidationError> {
		if self.name.trim().is_empty() {
			return Err(ValidationError::Missing { field: "name" });
		}

		self.location.validate()?;

		if !self.radius.is_finite() {
			return Err(ValidationError::NotANumber { field: "radius" });
		}

		Ok(())
	}
}

/// Partial update; absent fields are left untouched by the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ZonePatch {
	/// New display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// New center.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub location: Option<GeoPoint>,
	/// New radius.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub radius: Option<f64>,
}
impl ZonePatch {
	/// Sets the name.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}

	/// Sets the center.
	pub fn location(mut self, location: GeoPoint) -> Self {
		self.location = Some(location);

		self
	}

	/// Sets the radius.
	pub fn radius(mut self, radius: f64) -> Self {
		self.radius = Some(radius);

		self
	}

	/// Returns `true` when no field is set.
	pub fn is_empty(&self) -> bool {
		self.name.is_none() && self.location.is_none() && self.radius.is_none()
	}

	/// Checks the fields that are present.
	pub fn validate(&self) -> Result<(), ValidationError> {
		if self.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
			return Err(ValidationError::Missing { field: "name" });
		}
		if let Some(location) = &self.location {
			location.validate()?;
		}
		if self.radius.is_some_and(|radius| !radius.is_finite()) {
			return Err(ValidationError::NotANumber { field: "radius" });
		}

		Ok(())
	}
}

/// One page of zones.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonePage {
	/// Zones on this page.
	pub zones: Vec<Zone>,
	/// Total number of zones.
	pub total: u64,
	/// Page size echoed by the backend.
	#[serde(default)]
	pub limit: Option<u32>,
	/// Offset echoed by the backend.
	#[serde(default)]
	pub offset: Option<u32>,
	/// Number of pages.
	#[serde(default)]
	pub total_pages: Option<u32>,
	/// 1-based page index.
	#[serde(default)]
	pub current_page: Option<u32>,
}
