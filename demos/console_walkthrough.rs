//! Walks the console through a session whose access token has aged out: one refresh call is
//! shared by three concurrent listings, then a courier is created and assigned to a zone.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use time::{Duration, OffsetDateTime};
use url::Url;
// self
use courier_admin::{
	auth::Session,
	console::ReqwestConsole,
	descriptor::ServiceDescriptor,
	model::{GeoPoint, NewCourier, PageRequest},
	store::{MemoryStore, SessionStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let refresh_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh-token");
			then.status(200)
				.delay(std::time::Duration::from_millis(100))
				.json_body(json!({ "accessToken": "demo-access-2", "refreshToken": "demo-refresh-2" }));
		})
		.await;
	let zones_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/zones").header("authorization", "Bearer demo-access-2");
			then.status(200).json_body(json!({
				"zones": [{ "id": 1, "name": "Centro", "location": { "lat": 6.2442, "lng": -75.5812 }, "radius": 3 }],
				"total": 1
			}));
		})
		.await;
	let create_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/delivery");
			then.status(201).json_body(json!({
				"id": 7,
				"personId": 42,
				"location": "{\"latitude\":6.25,\"longitude\":-75.56}",
				"radius": 5,
				"status": "available",
				"zones": []
			}));
		})
		.await;
	let assign_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/delivery/7/assignZone").json_body(json!({ "zoneIds": [1] }));
			then.status(201);
		})
		.await;
	let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::default());
	let descriptor = ServiceDescriptor::from_bases(
		Url::parse(&server.url("/auth"))?,
		Url::parse(&server.url("/api"))?,
	)?;
	let console = ReqwestConsole::new(store.clone(), descriptor);

	store
		.save(Session::new(
			"demo-access-1",
			"demo-refresh-1",
			OffsetDateTime::now_utc() - Duration::minutes(16),
		))
		.await?;

	let (a, b, c) = tokio::join!(
		console.list_zones(PageRequest::default()),
		console.list_zones(PageRequest::default()),
		console.list_zones(PageRequest::default()),
	);

	println!("Zones seen by three concurrent listings: {}, {}, {}.", a?.total, b?.total, c?.total);
	println!("Refresh calls made: {}.", console.coordinator.metrics().attempts());

	let courier =
		console.create_courier(&NewCourier::new(42, GeoPoint::new(6.25, -75.56), 5.)).await?;

	println!(
		"Created courier {} at {} ({}).",
		courier.id,
		courier.location.map(|point| point.to_string()).unwrap_or_else(|| "unknown".into()),
		courier.status.label(),
	);

	console.assign_zones(courier.id, &[1], &courier.zone_ids()).await?;

	let status = console.session_status().await?;

	println!("Session valid for another {} minutes.", status.remaining_minutes());

	refresh_mock.assert_async().await;
	zones_mock.assert_calls_async(3).await;
	create_mock.assert_async().await;
	assign_mock.assert_async().await;

	Ok(())
}
