use crate::backend::Backend;
use crate::backend::error::BackendError;
use crate::booking::status::partition;
use crate::booking::validation::{BookingForm, BookingTimeValidator};
use crate::configuration::Configuration;
use crate::context::ApplicationContext;
use crate::dashboard::{DashboardFeed, DashboardSnapshot};
use crate::qr_code::RoomQrCode;
use crate::server::rest_api::error::booking_creation::BookingCreationError;
use crate::server::rest_api::error::qr_code::QrCodeDownloadError;
use crate::server::rest_api::error::room_lookup::RoomLookupError;
use crate::server::rest_api::extract::RoomIdPath;
use crate::server::rest_api::models::{
	BookingCreatedResponse, BookingResponse, DashboardResponse, DashboardState, RoomPageResponse, RoomResponse,
	UPCOMING_BOOKINGS_PER_ROOM,
};
use crate::server::rest_api::response::{Created, PngDownload};
use crate::utils::time_source::TimeSource;
use aide::axum::routing::{get_with, post_with};
use aide::axum::{ApiRouter, IntoApiResponse};
use aide::openapi::{Info, OpenApi, Server};
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use std::sync::Arc;
use tracing::info;

mod error;
mod extract;
mod models;
mod response;

pub fn rest_api() -> Router<ApplicationContext> {
	let mut api = OpenApi {
		info: Info {
			title: "Room Booking".to_string(),
			description: Some("Rooms, bookings and the live dashboard of the room booking front end.".to_string()),
			version: env!("CARGO_PKG_VERSION").to_string(),
			..Default::default()
		},
		servers: vec![Server {
			url: "/api".to_string(),
			..Default::default()
		}],
		..Default::default()
	};

	ApiRouter::new()
		.api_route("/rooms", get_with(list_rooms, list_rooms_docs))
		.api_route("/rooms/{room_id}", get_with(room_page, room_page_docs))
		.api_route("/rooms/{room_id}/bookings", post_with(create_booking, create_booking_docs))
		.api_route("/rooms/{room_id}/qr-code", get_with(room_qr_code, room_qr_code_docs))
		.api_route("/dashboard", get_with(dashboard, dashboard_docs))
		.api_route("/dashboard/refresh", post_with(refresh_dashboard, refresh_dashboard_docs))
		.route("/openapi.json", get(openapi_json))
		.finish_api(&mut api)
		.layer(Extension(Arc::new(api)))
}

async fn openapi_json(Extension(api): Extension<Arc<OpenApi>>) -> impl IntoApiResponse {
	Json(api.as_ref()).into_response()
}

async fn list_rooms(
	State(backend): State<Arc<dyn Backend>>,
	State(configuration): State<Configuration>,
) -> Result<Json<Vec<RoomResponse>>, BackendError> {
	let rooms = backend.list_rooms().await?;
	Ok(Json(
		rooms
			.into_iter()
			.map(|room| RoomResponse::new(room, &configuration.public_origin))
			.collect(),
	))
}

fn list_rooms_docs(operation: TransformOperation) -> TransformOperation {
	operation
		.summary("List all rooms ordered by name.")
		.response::<502, BackendError>()
}

async fn room_page(
	RoomIdPath(room_id): RoomIdPath,
	State(backend): State<Arc<dyn Backend>>,
	State(time_source): State<TimeSource>,
	State(validator): State<BookingTimeValidator>,
	State(configuration): State<Configuration>,
) -> Result<Json<RoomPageResponse>, RoomLookupError> {
	let room = backend.get_room(room_id).await?.ok_or(RoomLookupError::NotFound)?;

	let now = time_source.now();
	let utc_offset = validator.utc_offset();
	let upcoming_bookings = backend
		.list_active_future_bookings(Some(room_id), now)
		.await?
		.into_iter()
		.take(UPCOMING_BOOKINGS_PER_ROOM)
		.map(|booking| BookingResponse::classified(booking, now, utc_offset))
		.collect();

	Ok(Json(RoomPageResponse {
		room: RoomResponse::new(room, &configuration.public_origin),
		upcoming_bookings,
		minimum_start: validator.minimum_start(now),
	}))
}

fn room_page_docs(operation: TransformOperation) -> TransformOperation {
	operation
		.summary("A room together with its next active bookings.")
		.response::<404, RoomLookupError>()
		.response::<502, RoomLookupError>()
}

async fn create_booking(
	RoomIdPath(room_id): RoomIdPath,
	State(backend): State<Arc<dyn Backend>>,
	State(time_source): State<TimeSource>,
	State(validator): State<BookingTimeValidator>,
	State(dashboard_feed): State<DashboardFeed>,
	Json(form): Json<BookingForm>,
) -> Result<Created<Json<BookingCreatedResponse>>, BookingCreationError> {
	let now = time_source.now();
	let new_booking = validator.validate(room_id, form, now)?;
	let booking = backend.create_booking(new_booking).await?;
	info!(booking_id = %booking.id, %room_id, "Created booking");

	dashboard_feed.invalidate();

	let booking = BookingResponse::classified(booking, now, validator.utc_offset());
	Ok(Created(Json(BookingCreatedResponse::new(booking))))
}

fn create_booking_docs(operation: TransformOperation) -> TransformOperation {
	operation
		.summary("Validate and create a booking for a room.")
		.description("Overlapping bookings are accepted. Text fields are stored exactly as sent.")
		.response::<201, Json<BookingCreatedResponse>>()
		.response::<400, BookingCreationError>()
		.response::<502, BookingCreationError>()
}

async fn room_qr_code(
	RoomIdPath(room_id): RoomIdPath,
	State(backend): State<Arc<dyn Backend>>,
	State(configuration): State<Configuration>,
) -> Result<PngDownload, QrCodeDownloadError> {
	backend
		.get_room(room_id)
		.await
		.map_err(RoomLookupError::from)?
		.ok_or(RoomLookupError::NotFound)?;

	let RoomQrCode { file_name, png, .. } = RoomQrCode::generate(&configuration.public_origin, room_id)?;
	Ok(PngDownload { file_name, png })
}

fn room_qr_code_docs(operation: TransformOperation) -> TransformOperation {
	operation
		.summary("Download a QR code leading to the booking page of a room.")
		.response::<404, QrCodeDownloadError>()
		.response::<500, QrCodeDownloadError>()
}

async fn dashboard(
	State(dashboard_feed): State<DashboardFeed>,
	State(time_source): State<TimeSource>,
	State(validator): State<BookingTimeValidator>,
	State(configuration): State<Configuration>,
) -> Result<Json<DashboardResponse>, BackendError> {
	let snapshot = dashboard_feed.snapshot().await?;
	Ok(Json(dashboard_response(
		&snapshot,
		&dashboard_feed,
		&time_source,
		validator,
		&configuration,
	)))
}

fn dashboard_docs(operation: TransformOperation) -> TransformOperation {
	operation
		.summary("Active bookings split into today and upcoming.")
		.description("Reads shortly before are shared. Creating a booking makes the next request read again.")
		.response::<502, BackendError>()
}

async fn refresh_dashboard(
	State(dashboard_feed): State<DashboardFeed>,
	State(time_source): State<TimeSource>,
	State(validator): State<BookingTimeValidator>,
	State(configuration): State<Configuration>,
) -> Result<Json<DashboardResponse>, BackendError> {
	let snapshot = dashboard_feed.refresh_now().await?;
	Ok(Json(dashboard_response(
		&snapshot,
		&dashboard_feed,
		&time_source,
		validator,
		&configuration,
	)))
}

fn refresh_dashboard_docs(operation: TransformOperation) -> TransformOperation {
	operation
		.summary("Re-read the dashboard bookings immediately.")
		.response::<502, BackendError>()
}

fn dashboard_response(
	snapshot: &DashboardSnapshot,
	dashboard_feed: &DashboardFeed,
	time_source: &TimeSource,
	validator: BookingTimeValidator,
	configuration: &Configuration,
) -> DashboardResponse {
	let utc_offset = validator.utc_offset();
	let partitions = partition(&snapshot.bookings, time_source.now(), utc_offset);
	let state = DashboardState {
		refresh_interval_seconds: configuration.dashboard_refresh_interval.as_secs(),
		last_error: dashboard_feed.last_error(),
	};
	DashboardResponse::new(snapshot, partitions, state, utc_offset)
}
