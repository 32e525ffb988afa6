use crate::backend::error::BackendError;
use crate::backend::memory::MemoryBackend;
use crate::backend::models::{Booking, NewBooking, Room, RoomId};
use crate::backend::postgrest::PostgrestBackend;
use crate::configuration::BackendConfiguration;
use crate::utils::time_source::TimeSource;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub mod error;
pub mod memory;
pub mod models;
pub mod postgrest;

/// The hosted data backend owning the `rooms` and `bookings` tables.
///
/// Implementations neither retry nor check for overlapping bookings. Every error is handed back
/// to the caller as is.
#[async_trait]
pub trait Backend: Send + Sync {
	/// All rooms, ordered by name.
	async fn list_rooms(&self) -> Result<Vec<Room>, BackendError>;

	async fn get_room(&self, room_id: RoomId) -> Result<Option<Room>, BackendError>;

	/// Active bookings that have not ended at `now`, ordered by start time and with their room
	/// embedded. Restricted to a single room when `room_id` is given.
	async fn list_active_future_bookings(
		&self,
		room_id: Option<RoomId>,
		now: DateTime<Utc>,
	) -> Result<Vec<Booking>, BackendError>;

	async fn create_booking(&self, booking: NewBooking) -> Result<Booking, BackendError>;
}

pub fn create_backend(
	configuration: &BackendConfiguration,
	time_source: TimeSource,
) -> Result<Arc<dyn Backend>, BackendError> {
	use BackendConfiguration::*;
	let backend: Arc<dyn Backend> = match configuration {
		Postgrest {
			url,
			api_key,
			request_timeout,
		} => Arc::new(PostgrestBackend::new(url, api_key.expose(), *request_timeout)?),
		Memory { rooms } => Arc::new(MemoryBackend::with_seeds(time_source, rooms)),
	};
	Ok(backend)
}
