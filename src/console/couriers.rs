//! Courier CRUD, status and location updates, zone assignment, and geo-queries.
//!
//! The backend calls couriers "deliveries", so every path lives under `/delivery`.

// self
use crate::{
	_prelude::*,
	console::{Console, dispatch},
	error::ResponseError,
	http::{ApiRequest, HttpTransport},
	model::{
		Courier, CourierPage, CourierStatus, GeoPoint, NewCourier, PageRequest, ProximityQuery,
		ZoneQuery,
	},
	obs::{self, CallKind},
};

const DELIVERY: &str = "delivery";

#[derive(Serialize)]
struct LocationUpdate {
	location: GeoPoint,
}

#[derive(Serialize)]
struct StatusUpdate<'a> {
	status: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ZoneAssignment<'a> {
	zone_ids: &'a [u64],
}

impl<C> Console<C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists one page of couriers, optionally restricted to a zone.
	pub async fn list_couriers(
		&self,
		page: PageRequest,
		zone_id: Option<u64>,
	) -> Result<CourierPage> {
		obs::observe(CallKind::Couriers, "list_couriers", async {
			let mut request =
				ApiRequest::get(self.descriptor.resource_url([DELIVERY])).query(page.query_pairs());

			if let Some(zone_id) = zone_id {
				request = request.query([("zoneId", zone_id.to_string())]);
			}

			self.send_json(request, "Failed to load couriers.").await
		})
		.await
	}

	/// Fetches one courier.
	pub async fn get_courier(&self, id: u64) -> Result<Courier> {
		obs::observe(CallKind::Couriers, "get_courier", async {
			self.send_json(ApiRequest::get(self.courier_url(id, &[])), "Failed to load courier.")
				.await
		})
		.await
	}

	/// Creates a courier. A 400 answer is reported as `Validation failed: <message>`.
	pub async fn create_courier(&self, courier: &NewCourier) -> Result<Courier> {
		obs::observe(CallKind::Couriers, "create_courier", async {
			courier.validate()?;

			let request = ApiRequest::post(self.descriptor.resource_url([DELIVERY])).json(courier)?;
			let response = self.send_raw(request).await?;

			match response.status {
				400 => Err(ResponseError::Status {
					status: 400,
					message: format!(
						"Validation failed: {}",
						response.message().unwrap_or_else(|| "invalid data".into())
					),
					retry_after: response.retry_after,
				}
				.into()),
				_ if response.is_success() => Ok(response.decode()?),
				_ => Err(dispatch::reject(&response, "Failed to create courier.")),
			}
		})
		.await
	}

	/// Deletes a courier.
	pub async fn delete_courier(&self, id: u64) -> Result<()> {
		obs::observe(CallKind::Couriers, "delete_courier", async {
			self.send(ApiRequest::delete(self.courier_url(id, &[])), "Failed to delete courier.")
				.await?;

			Ok(())
		})
		.await
	}

	/// Moves a courier.
	pub async fn update_location(&self, id: u64, location: GeoPoint) -> Result<Courier> {
		obs::observe(CallKind::Couriers, "update_location", async {
			location.validate()?;

			let request = ApiRequest::put(self.courier_url(id, &["location"]))
				.json(&LocationUpdate { location })?;

			self.send_json(request, "Failed to update location.").await
		})
		.await
	}

	/// Changes a courier's status.
	pub async fn update_status(&self, id: u64, status: &CourierStatus) -> Result<Courier> {
		obs::observe(CallKind::Couriers, "update_status", async {
			let request = ApiRequest::put(self.courier_url(id, &["status"]))
				.json(&StatusUpdate { status: status.as_str() })?;

			self.send_json(request, "Failed to update status.").await
		})
		.await
	}

	/// Replaces a courier's zone assignment.
	///
	/// Clearing every zone is done one `DELETE` per previously assigned zone, in the given order,
	/// because the assignment endpoint does not accept an empty list. Any other selection is sent
	/// as one assignment call.
	pub async fn assign_zones(
		&self,
		id: u64,
		zone_ids: &[u64],
		previous_zone_ids: &[u64],
	) -> Result<()> {
		const FALLBACK: &str = "Failed to assign zones.";

		obs::observe(CallKind::Couriers, "assign_zones", async {
			if zone_ids.is_empty() && !previous_zone_ids.is_empty() {
				for zone_id in previous_zone_ids {
					let url = self.courier_url(id, &["zone", zone_id.to_string().as_str()]);

					self.send(ApiRequest::delete(url), FALLBACK).await?;
				}
			} else {
				let request = ApiRequest::post(self.courier_url(id, &["assignZone"]))
					.json(&ZoneAssignment { zone_ids })?;

				self.send(request, FALLBACK).await?;
			}

			Ok(())
		})
		.await
	}

	/// Couriers assigned to a zone.
	pub async fn find_by_zone(&self, query: ZoneQuery) -> Result<Vec<Courier>> {
		obs::observe(CallKind::Couriers, "find_by_zone", async {
			let request = ApiRequest::post(self.descriptor.resource_url([DELIVERY, "findByZone"]))
				.json(&query)?;

			self.send_json(request, "Failed to load couriers for the zone.").await
		})
		.await
	}

	/// Couriers within `radius` of a point.
	pub async fn find_by_proximity(&self, query: ProximityQuery) -> Result<Vec<Courier>> {
		obs::observe(CallKind::Couriers, "find_by_proximity", async {
			query.validate()?;

			let request = ApiRequest::post(
				self.descriptor.resource_url([DELIVERY, "findByProximity"]),
			)
			.json(&query)?;

			self.send_json(request, "Failed to load nearby couriers.").await
		})
		.await
	}

	fn courier_url(&self, id: u64, tail: &[&str]) -> Url {
		let id = id.to_string();

		self.descriptor.resource_url([DELIVERY, id.as_str()].iter().chain(tail))
	}
}
