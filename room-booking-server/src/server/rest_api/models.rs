use crate::backend::models::{Booking, BookingId, Room, RoomId, RoomSummary};
use crate::booking::status::{BadgeVariant, BookingPartitions, BookingStatus};
use crate::dashboard::DashboardSnapshot;
use crate::qr_code::booking_link;
use chrono::{DateTime, FixedOffset, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const UPCOMING_BOOKINGS_PER_ROOM: usize = 5;

#[derive(Deserialize, JsonSchema)]
pub struct RoomPath {
	pub room_id: RoomId,
}

#[derive(Serialize, JsonSchema)]
pub struct RoomResponse {
	pub id: RoomId,
	pub name: String,
	pub description: Option<String>,
	pub capacity: u32,
	pub equipment: Vec<String>,
	/// Equipment tags in a human readable form.
	pub equipment_labels: Vec<String>,
	pub qr_code_url: Option<String>,
	/// Page the room's QR code leads to.
	pub booking_url: String,
}

impl RoomResponse {
	pub fn new(room: Room, public_origin: &str) -> Self {
		let Room {
			id,
			name,
			description,
			capacity,
			equipment,
			qr_code_url,
		} = room;
		Self {
			id,
			name,
			description,
			capacity: capacity.get(),
			equipment_labels: equipment.iter().map(|tag| tag.replace('_', " ")).collect(),
			equipment,
			qr_code_url,
			booking_url: booking_link(public_origin, id),
		}
	}
}

#[derive(Serialize, JsonSchema)]
pub struct RoomSummaryResponse {
	pub id: RoomId,
	pub name: String,
	pub capacity: u32,
}

impl From<RoomSummary> for RoomSummaryResponse {
	fn from(RoomSummary { id, name, capacity }: RoomSummary) -> Self {
		Self {
			id,
			name,
			capacity: capacity.get(),
		}
	}
}

#[derive(Serialize, JsonSchema)]
pub struct BookingResponse {
	pub id: BookingId,
	pub room_id: RoomId,
	pub title: String,
	pub description: Option<String>,
	pub organizer_name: String,
	pub organizer_email: Option<String>,
	pub start_time: DateTime<Utc>,
	pub end_time: DateTime<Utc>,
	pub created_at: DateTime<Utc>,
	pub status: BookingStatus,
	pub status_label: &'static str,
	pub badge_variant: BadgeVariant,
	/// `dd/mm/yyyy` in local time.
	pub date: String,
	/// `HH:MM - HH:MM` in local time.
	pub time_range: String,
	pub room: Option<RoomSummaryResponse>,
}

impl BookingResponse {
	pub fn new(booking: Booking, status: BookingStatus, utc_offset: FixedOffset) -> Self {
		let local_start = booking.start_time.with_timezone(&utc_offset);
		let local_end = booking.end_time.with_timezone(&utc_offset);
		Self {
			id: booking.id,
			room_id: booking.room_id,
			title: booking.title,
			description: booking.description,
			organizer_name: booking.organizer_name,
			organizer_email: booking.organizer_email,
			start_time: booking.start_time,
			end_time: booking.end_time,
			created_at: booking.created_at,
			status,
			status_label: status.label(),
			badge_variant: status.badge_variant(),
			date: local_start.format("%d/%m/%Y").to_string(),
			time_range: format!("{} - {}", local_start.format("%H:%M"), local_end.format("%H:%M")),
			room: booking.room.map(RoomSummaryResponse::from),
		}
	}

	pub fn classified(booking: Booking, now: DateTime<Utc>, utc_offset: FixedOffset) -> Self {
		let status = BookingStatus::classify(booking.start_time, booking.end_time, now, utc_offset);
		Self::new(booking, status, utc_offset)
	}
}

/// Everything the booking page of a room shows.
#[derive(Serialize, JsonSchema)]
pub struct RoomPageResponse {
	pub room: RoomResponse,
	/// The next few active bookings of the room that have not ended yet.
	pub upcoming_bookings: Vec<BookingResponse>,
	/// Earliest start offered by the form, as a `datetime-local` value.
	pub minimum_start: String,
}

#[derive(Serialize, JsonSchema)]
pub struct BookingCreatedResponse {
	pub title: &'static str,
	pub message: &'static str,
	/// Page to continue on after the booking was created.
	pub redirect_to: &'static str,
	pub booking: BookingResponse,
}

impl BookingCreatedResponse {
	pub fn new(booking: BookingResponse) -> Self {
		Self {
			title: "Sucesso",
			message: "Agendamento criado com sucesso!",
			redirect_to: "/dashboard",
			booking,
		}
	}
}

#[derive(Serialize, JsonSchema)]
pub struct DashboardResponse {
	pub today: Vec<BookingResponse>,
	pub upcoming: Vec<BookingResponse>,
	pub today_count: usize,
	pub upcoming_count: usize,
	pub total_active: usize,
	pub refreshed_at: DateTime<Utc>,
	/// `HH:MM:SS` in local time.
	pub refreshed_at_label: String,
	/// Poll period of an open dashboard page with auto refresh on.
	pub refresh_interval_seconds: u64,
	/// Error of the last refresh if it failed. The bookings are from the last successful one.
	pub last_error: Option<String>,
}

pub struct DashboardState {
	pub refresh_interval_seconds: u64,
	pub last_error: Option<String>,
}

impl DashboardResponse {
	pub fn new(
		snapshot: &DashboardSnapshot,
		partitions: BookingPartitions,
		state: DashboardState,
		utc_offset: FixedOffset,
	) -> Self {
		let BookingPartitions {
			today,
			upcoming,
			total_active,
		} = partitions;
		let to_responses = |bookings: Vec<(Booking, BookingStatus)>| {
			bookings
				.into_iter()
				.map(|(booking, status)| BookingResponse::new(booking, status, utc_offset))
				.collect::<Vec<_>>()
		};

		Self {
			today_count: today.len(),
			upcoming_count: upcoming.len(),
			today: to_responses(today),
			upcoming: to_responses(upcoming),
			total_active,
			refreshed_at: snapshot.refreshed_at,
			refreshed_at_label: snapshot
				.refreshed_at
				.with_timezone(&utc_offset)
				.format("%H:%M:%S")
				.to_string(),
			refresh_interval_seconds: state.refresh_interval_seconds,
			last_error: state.last_error,
		}
	}
}
