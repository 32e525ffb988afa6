use crate::backend::Backend;
use crate::backend::error::BackendError;
use crate::backend::models::{Booking, BookingId, NewBooking, RecordStatus, Room, RoomId, RoomSummary};
use crate::configuration::RoomSeed;
use crate::utils::time_source::TimeSource;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use tracing::debug;

/// In-process stand-in for the hosted backend.
///
/// Applies the same filters and ordering as the hosted queries. Like the hosted tables it
/// only enforces that a booking references an existing room, overlapping bookings are accepted.
pub struct MemoryBackend {
	time_source: TimeSource,
	rooms: RwLock<Vec<Room>>,
	bookings: RwLock<Vec<Booking>>,
	pending_rejection: Mutex<Option<String>>,
}

impl MemoryBackend {
	pub fn new(time_source: TimeSource) -> Self {
		Self {
			time_source,
			rooms: Default::default(),
			bookings: Default::default(),
			pending_rejection: Default::default(),
		}
	}

	pub fn with_seeds(time_source: TimeSource, seeds: &[RoomSeed]) -> Self {
		let backend = Self::new(time_source);
		for seed in seeds {
			backend.add_room(Room {
				id: RoomId::new_v4(),
				name: seed.name.clone(),
				description: seed.description.clone(),
				capacity: seed.capacity,
				equipment: seed.equipment.clone(),
				qr_code_url: None,
			});
		}
		backend
	}

	pub fn add_room(&self, room: Room) {
		self.rooms.write().push(room);
	}

	/// Stores a booking row as is, bypassing the insert path. Useful for cancelled or past rows.
	#[cfg_attr(not(test), allow(dead_code))]
	pub fn insert_booking(&self, booking: Booking) {
		self.bookings.write().push(booking);
	}

	/// Makes the next write fail the way the hosted backend reports errors.
	#[cfg_attr(not(test), allow(dead_code))]
	pub fn reject_next_write(&self, message: impl Into<String>) {
		*self.pending_rejection.lock() = Some(message.into());
	}

	#[cfg_attr(not(test), allow(dead_code))]
	pub fn booking_count(&self) -> usize {
		self.bookings.read().len()
	}

	fn room_summary(&self, room_id: RoomId) -> Option<RoomSummary> {
		self.rooms
			.read()
			.iter()
			.find(|room| room.id == room_id)
			.map(RoomSummary::from)
	}
}

#[async_trait]
impl Backend for MemoryBackend {
	async fn list_rooms(&self) -> Result<Vec<Room>, BackendError> {
		let mut rooms = self.rooms.read().clone();
		rooms.sort_by(|left, right| left.name.cmp(&right.name));
		Ok(rooms)
	}

	async fn get_room(&self, room_id: RoomId) -> Result<Option<Room>, BackendError> {
		Ok(self.rooms.read().iter().find(|room| room.id == room_id).cloned())
	}

	async fn list_active_future_bookings(
		&self,
		room_id: Option<RoomId>,
		now: DateTime<Utc>,
	) -> Result<Vec<Booking>, BackendError> {
		let mut bookings = self
			.bookings
			.read()
			.iter()
			.filter(|booking| booking.status == RecordStatus::Active)
			.filter(|booking| booking.end_time >= now)
			.filter(|booking| room_id.is_none_or(|room_id| booking.room_id == room_id))
			.cloned()
			.collect::<Vec<_>>();
		bookings.sort_by_key(|booking| booking.start_time);

		for booking in &mut bookings {
			booking.room = self.room_summary(booking.room_id);
		}

		debug!(count = bookings.len(), ?room_id, "Listed active future bookings");
		Ok(bookings)
	}

	async fn create_booking(
		&self,
		NewBooking {
			room_id,
			title,
			description,
			organizer_name,
			organizer_email,
			start_time,
			end_time,
		}: NewBooking,
	) -> Result<Booking, BackendError> {
		if let Some(message) = self.pending_rejection.lock().take() {
			return Err(BackendError::Rejected { status: 400, message });
		}

		let Some(room) = self.room_summary(room_id) else {
			return Err(BackendError::Rejected {
				status: 409,
				message: r#"insert or update on table "bookings" violates foreign key constraint "bookings_room_id_fkey""#
					.to_owned(),
			});
		};

		let booking = Booking {
			id: BookingId::new_v4(),
			title,
			description: Some(description),
			organizer_name,
			organizer_email: Some(organizer_email),
			start_time,
			end_time,
			status: RecordStatus::Active,
			created_at: self.time_source.now(),
			room_id,
			room: Some(room),
		};
		self.bookings.write().push(booking.clone());

		Ok(booking)
	}
}
