//! Couriers ("deliveries" on the wire), their statuses, and paged listings.

// self
use crate::{
	_prelude::*,
	error::ValidationError,
	model::{GeoPoint, Zone, deserialize_lenient_location},
};

/// Courier as returned by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Courier {
	/// Backend identifier.
	pub id: u64,
	/// Identifier of the person behind the courier account.
	pub person_id: u64,
	/// Last known position; `None` when the backend sent something unreadable.
	#[serde(default, deserialize_with = "deserialize_lenient_location")]
	pub location: Option<GeoPoint>,
	/// Working radius.
	#[serde(default)]
	pub radius: f64,
	/// Availability state.
	pub status: CourierStatus,
	/// Zones the courier is assigned to.
	#[serde(default)]
	pub zones: Vec<Zone>,
}
impl Courier {
	/// Identifiers of the assigned zones, in backend order.
	pub fn zone_ids(&self) -> Vec<u64> {
		self.zones.iter().map(|zone| zone.id).collect()
	}
}

/// Availability state of a courier. Values the console does not know are kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CourierStatus {
	/// Ready to take orders.
	Available,
	/// Travelling to a pickup.
	InRoute,
	/// Carrying an order.
	Delivering,
	/// Waiting at a pickup.
	WaitingForOrder,
	/// Not accepting orders.
	Unavailable,
	/// Blocked by a problem.
	WithIssue,
	/// Disconnected.
	Offline,
	/// Status introduced by the backend after this crate was built.
	Unknown(String),
}
impl CourierStatus {
	/// Every known status, in display order.
	pub const KNOWN: [Self; 7] = [
		Self::Available,
		Self::InRoute,
		Self::Delivering,
		Self::WaitingForOrder,
		Self::Unavailable,
		Self::WithIssue,
		Self::Offline,
	];

	/// Wire value.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Available => "available",
			Self::InRoute => "in_route",
			Self::Delivering => "delivering",
			Self::WaitingForOrder => "waiting_for_order",
			Self::Unavailable => "unavailable",
			Self::WithIssue => "with_issue",
			Self::Offline => "offline",
			Self::Unknown(raw) => raw,
		}
	}

	/// Human-readable label; unknown statuses render as their wire value.
	pub fn label(&self) -> &str {
		match self {
			Self::Available => "Available",
			Self::InRoute => "In route",
			Self::Delivering => "Delivering",
			Self::WaitingForOrder => "Waiting for order",
			Self::Unavailable => "Unavailable",
			Self::WithIssue => "With issue",
			Self::Offline => "Offline",
			Self::Unknown(raw) => raw,
		}
	}
}
impl From<&str> for CourierStatus {
	fn from(raw: &str) -> Self {
		match raw {
			"available" => Self::Available,
			"in_route" => Self::InRoute,
			"delivering" => Self::Delivering,
			"waiting_for_order" => Self::WaitingForOrder,
			"unavailable" => Self::Unavailable,
			"with_issue" => Self::WithIssue,
			"offline" => Self::Offline,
			other => Self::Unknown(other.to_owned()),
		}
	}
}
impl From<String> for CourierStatus {
	fn from(raw: String) -> Self {
		match Self::from(raw.as_str()) {
			Self::Unknown(_) => Self::Unknown(raw),
			known => known,
		}
	}
}
impl From<CourierStatus> for String {
	fn from(status: CourierStatus) -> Self {
		match status {
			CourierStatus::Unknown(raw) => raw,
			known => known.as_str().to_owned(),
		}
	}
}
impl Display for CourierStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Payload for creating a courier.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourier {
	/// Identifier of the person behind the account.
	pub person_id: u64,
	/// Starting position.
	pub location: GeoPoint,
	/// Working radius.
	pub radius: f64,
}
impl NewCourier {
	/// Creates a courier payload.
	pub const fn new(person_id: u64, location: GeoPoint, radius: f64) -> Self {
		Self { person_id, location, radius }
	}

	/// Existence checks run before the courier is sent.
	pub fn validate(&self) -> Result<(), ValidationError> {
		self.location.validate()?;

		if !self.radius.is_finite() {
			return Err(ValidationError::NotANumber { field: "radius" });
		}

		Ok(())
	}
}

/// One page of couriers.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "WireCourierPage")]
pub struct CourierPage {
	/// Couriers on this page.
	pub couriers: Vec<Courier>,
	/// Total number of couriers.
	pub total: u64,
	/// Page size echoed by the backend.
	pub limit: Option<u32>,
	/// Offset echoed by the backend.
	pub offset: Option<u32>,
	/// Number of pages.
	pub total_pages: Option<u32>,
	/// 1-based page index.
	pub current_page: Option<u32>,
}

// Older backends answer listings with a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireCourierPage {
	#[serde(rename_all = "camelCase")]
	Envelope {
		deliveries: Vec<Courier>,
		total: u64,
		#[serde(default)]
		limit: Option<u32>,
		#[serde(default)]
		offset: Option<u32>,
		#[serde(default)]
		total_pages: Option<u32>,
		#[serde(default)]
		current_page: Option<u32>,
	},
	Bare(Vec<Courier>),
}
impl From<WireCourierPage> for CourierPage {
	fn from(wire: WireCourierPage) -> Self {
		match wire {
			WireCourierPage::Envelope {
				deliveries,
				total,
				limit,
				offset,
				total_pages,
				current_page,
			} => Self { couriers: deliveries, total, limit, offset, total_pages, current_page },
			WireCourierPage::Bare(couriers) => Self {
				total: couriers.len() as u64,
				couriers,
				limit: None,
				offset: None,
				total_pages: None,
				current_page: None,
			},
		}
	}
}
