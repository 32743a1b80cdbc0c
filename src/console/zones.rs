//! Zone CRUD.

// self
use crate::{
	_prelude::*,
	console::Console,
	http::{ApiRequest, HttpTransport},
	model::{NewZone, PageRequest, Zone, ZonePage, ZonePatch},
	obs::{self, CallKind},
};

const ZONES: &str = "zones";

impl<C> Console<C>
where
	C: ?Sized + HttpTransport,
{
	/// Lists one page of zones.
	pub async fn list_zones(&self, page: PageRequest) -> Result<ZonePage> {
		obs::observe(CallKind::Zones, "list_zones", async {
			let request =
				ApiRequest::get(self.descriptor.resource_url([ZONES])).query(page.query_pairs());

			self.send_json(request, "Failed to load zones.").await
		})
		.await
	}

	/// Fetches one zone.
	pub async fn get_zone(&self, id: u64) -> Result<Zone> {
		obs::observe(CallKind::Zones, "get_zone", async {
			let request = ApiRequest::get(self.zone_url(id));

			self.send_json(request, "Failed to load zone.").await
		})
		.await
	}

	/// Creates a zone after checking its fields.
	pub async fn create_zone(&self, zone: &NewZone) -> Result<Zone> {
		obs::observe(CallKind::Zones, "create_zone", async {
			zone.validate()?;

			let request = ApiRequest::post(self.descriptor.resource_url([ZONES])).json(zone)?;

			self.send_json(request, "Failed to create zone.").await
		})
		.await
	}

	/// Applies a partial update.
	pub async fn update_zone(&self, id: u64, patch: &ZonePatch) -> Result<Zone> {
		obs::observe(CallKind::Zones, "update_zone", async {
			patch.validate()?;

			let request = ApiRequest::put(self.zone_url(id)).json(patch)?;

			self.send_json(request, "Failed to update zone.").await
		})
		.await
	}

	/// Deletes a zone.
	pub async fn delete_zone(&self, id: u64) -> Result<()> {
		obs::observe(CallKind::Zones, "delete_zone", async {
			self.send(ApiRequest::delete(self.zone_url(id)), "Failed to delete zone.").await?;

			Ok(())
		})
		.await
	}

	fn zone_url(&self, id: u64) -> Url {
		self.descriptor.resource_url([ZONES, id.to_string().as_str()])
	}
}
