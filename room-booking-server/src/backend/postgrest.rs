use crate::backend::Backend;
use crate::backend::error::{BackendError, IntoBackendResult};
use crate::backend::models::{Booking, NewBooking, Room, RoomId};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

const ROOMS_TABLE: &str = "rooms";
const BOOKINGS_TABLE: &str = "bookings";
const BOOKING_SELECTION: &str = "*,rooms(id,name,capacity)";

/// Talks to the tables through the PostgREST interface of a hosted Supabase project.
pub struct PostgrestBackend {
	client: Client,
	rest_url: Url,
}

impl PostgrestBackend {
	pub fn new(project_url: &Url, api_key: &str, request_timeout: Duration) -> Result<Self, BackendError> {
		let rest_url = project_url
			.join("rest/v1/")
			.configuration_error("Failed to derive the REST endpoint from the project url")?;

		let mut api_key_header =
			HeaderValue::from_str(api_key).configuration_error("The api key is not a valid header value")?;
		api_key_header.set_sensitive(true);
		let mut authorization_header = HeaderValue::from_str(&format!("Bearer {api_key}"))
			.configuration_error("The api key is not a valid bearer token")?;
		authorization_header.set_sensitive(true);

		let mut default_headers = HeaderMap::new();
		default_headers.insert(HeaderName::from_static("apikey"), api_key_header);
		default_headers.insert(AUTHORIZATION, authorization_header);

		let client = Client::builder()
			.default_headers(default_headers)
			.timeout(request_timeout)
			.build()
			.configuration_error("Failed to build the http client")?;

		Ok(Self { client, rest_url })
	}

	fn table_url<'parameter>(
		&self,
		table: &str,
		parameters: impl IntoIterator<Item = (&'parameter str, String)>,
	) -> Result<Url, BackendError> {
		let mut url = self
			.rest_url
			.join(table)
			.configuration_error("Failed to build the table url")?;
		{
			let mut query = url.query_pairs_mut();
			for (key, value) in parameters {
				query.append_pair(key, &value);
			}
		}
		Ok(url)
	}

	async fn fetch<Row: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Vec<Row>, BackendError> {
		let response = request.send().await.unreachable("Request to the backend failed")?;
		let response = reject_unsuccessful(response).await?;
		response
			.json::<Vec<Row>>()
			.await
			.decode_error("Failed to decode the backend response")
	}
}

fn rooms_query(room_id: Option<RoomId>) -> Vec<(&'static str, String)> {
	let mut parameters = vec![("select", "*".to_owned())];
	match room_id {
		Some(room_id) => parameters.push(("id", format!("eq.{room_id}"))),
		None => parameters.push(("order", "name.asc".to_owned())),
	}
	parameters
}

fn bookings_query(room_id: Option<RoomId>, now: DateTime<Utc>) -> Vec<(&'static str, String)> {
	let mut parameters = vec![
		("select", BOOKING_SELECTION.to_owned()),
		("status", "eq.active".to_owned()),
		(
			"end_time",
			format!("gte.{}", now.to_rfc3339_opts(SecondsFormat::Millis, true)),
		),
	];
	if let Some(room_id) = room_id {
		parameters.push(("room_id", format!("eq.{room_id}")));
	}
	parameters.push(("order", "start_time.asc".to_owned()));
	parameters
}

#[derive(Deserialize)]
struct PostgrestErrorBody {
	message: String,
}

async fn reject_unsuccessful(response: Response) -> Result<Response, BackendError> {
	let status = response.status();
	if status.is_success() {
		return Ok(response);
	}

	let body = response.text().await.unwrap_or_default();
	let message = rejection_message(status, &body);
	warn!(status = status.as_u16(), %message, "Backend rejected request");
	Err(BackendError::Rejected {
		status: status.as_u16(),
		message,
	})
}

fn rejection_message(status: reqwest::StatusCode, body: &str) -> String {
	if let Ok(PostgrestErrorBody { message }) = serde_json::from_str(body) {
		return message;
	}

	if body.trim().is_empty() {
		status.canonical_reason().unwrap_or("Unknown error").to_owned()
	} else {
		body.trim().to_owned()
	}
}

#[async_trait]
impl Backend for PostgrestBackend {
	async fn list_rooms(&self) -> Result<Vec<Room>, BackendError> {
		let url = self.table_url(ROOMS_TABLE, rooms_query(None))?;
		let rooms = self.fetch(self.client.get(url)).await?;
		debug!(count = rooms.len(), "Fetched rooms");
		Ok(rooms)
	}

	async fn get_room(&self, room_id: RoomId) -> Result<Option<Room>, BackendError> {
		let url = self.table_url(ROOMS_TABLE, rooms_query(Some(room_id)))?;
		let rooms = self.fetch::<Room>(self.client.get(url)).await?;
		Ok(rooms.into_iter().next())
	}

	async fn list_active_future_bookings(
		&self,
		room_id: Option<RoomId>,
		now: DateTime<Utc>,
	) -> Result<Vec<Booking>, BackendError> {
		let url = self.table_url(BOOKINGS_TABLE, bookings_query(room_id, now))?;
		let bookings = self.fetch(self.client.get(url)).await?;
		debug!(count = bookings.len(), ?room_id, "Fetched active future bookings");
		Ok(bookings)
	}

	async fn create_booking(&self, booking: NewBooking) -> Result<Booking, BackendError> {
		let url = self.table_url(BOOKINGS_TABLE, [("select", BOOKING_SELECTION.to_owned())])?;
		let request = self
			.client
			.post(url)
			.header("Prefer", "return=representation")
			.json(&[booking]);

		self.fetch::<Booking>(request)
			.await?
			.into_iter()
			.next()
			.ok_or_else(|| BackendError::Decode(anyhow::anyhow!("The backend returned no row for the inserted booking")))
	}
}
