use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::num::NonZeroU32;
use std::str::FromStr;
use uuid::Uuid;

#[derive(
	derive_more::From,
	derive_more::Into,
	derive_more::Display,
	Debug,
	Clone,
	Copy,
	PartialEq,
	Eq,
	Hash,
	Serialize,
	Deserialize,
	JsonSchema,
)]
#[serde(transparent)]
pub struct RoomId(Uuid);

impl RoomId {
	pub fn new_v4() -> Self {
		Self(Uuid::new_v4())
	}
}

impl FromStr for RoomId {
	type Err = uuid::Error;

	fn from_str(text: &str) -> Result<Self, Self::Err> {
		Uuid::from_str(text).map(Self)
	}
}

#[derive(
	derive_more::From,
	derive_more::Into,
	derive_more::Display,
	Debug,
	Clone,
	Copy,
	PartialEq,
	Eq,
	Hash,
	Serialize,
	Deserialize,
	JsonSchema,
)]
#[serde(transparent)]
pub struct BookingId(Uuid);

impl BookingId {
	pub fn new_v4() -> Self {
		Self(Uuid::new_v4())
	}
}

/// A row of the `rooms` table. Rooms are maintained outside of this application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Room {
	pub id: RoomId,
	pub name: String,
	#[serde(default)]
	pub description: Option<String>,
	pub capacity: NonZeroU32,
	/// A NULL `text[]` column arrives as `null`.
	#[serde(default, deserialize_with = "null_as_empty")]
	#[schemars(with = "Vec<String>")]
	pub equipment: Vec<String>,
	#[serde(default)]
	pub qr_code_url: Option<String>,
}

fn null_as_empty<'deserializer, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
	D: Deserializer<'deserializer>,
	T: Deserialize<'deserializer>,
{
	Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The room columns embedded into a booking read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RoomSummary {
	pub id: RoomId,
	pub name: String,
	pub capacity: NonZeroU32,
}

impl From<&Room> for RoomSummary {
	fn from(room: &Room) -> Self {
		Self {
			id: room.id,
			name: room.name.clone(),
			capacity: room.capacity,
		}
	}
}

/// Free-form status tag of a booking row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
	Active,
	Cancelled,
	#[serde(other)]
	Unknown,
}

/// A row of the `bookings` table, optionally with its room embedded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Booking {
	pub id: BookingId,
	pub title: String,
	#[serde(default)]
	pub description: Option<String>,
	pub organizer_name: String,
	#[serde(default)]
	pub organizer_email: Option<String>,
	pub start_time: DateTime<Utc>,
	pub end_time: DateTime<Utc>,
	pub status: RecordStatus,
	pub created_at: DateTime<Utc>,
	pub room_id: RoomId,
	#[serde(default, rename = "rooms", skip_serializing_if = "Option::is_none")]
	pub room: Option<RoomSummary>,
}

/// Insert payload for the `bookings` table.
///
/// The text fields carry exactly what the organizer typed; only the times are converted into
/// absolute instants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewBooking {
	pub room_id: RoomId,
	pub title: String,
	pub description: String,
	pub organizer_name: String,
	pub organizer_email: String,
	pub start_time: DateTime<Utc>,
	pub end_time: DateTime<Utc>,
}
