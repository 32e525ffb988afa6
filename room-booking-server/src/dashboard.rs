use crate::backend::Backend;
use crate::backend::error::BackendError;
use crate::backend::models::Booking;
use crate::utils::time_source::TimeSource;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Result of a successful dashboard read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardSnapshot {
	pub bookings: Vec<Booking>,
	pub refreshed_at: DateTime<Utc>,
}

/// Dashboard bookings shared by every open dashboard page.
///
/// Whether and how often to poll is up to each page. A snapshot is reused only while it is
/// younger than `max_age` and no booking was created since the read started. Reads are
/// serialized, so the stored snapshot never goes back in time.
#[derive(Clone)]
pub struct DashboardFeed {
	shared: Arc<SharedFeed>,
}

struct SharedFeed {
	backend: Arc<dyn Backend>,
	time_source: TimeSource,
	max_age: Duration,
	cache: RwLock<Cache>,
	read_lock: Mutex<()>,
}

#[derive(Default)]
struct Cache {
	snapshot: Option<Arc<DashboardSnapshot>>,
	/// Incremented by every invalidation.
	generation: u64,
	/// Generation at the start of the read that produced `snapshot`.
	snapshot_generation: u64,
	last_error: Option<String>,
}

impl Cache {
	fn fresh_snapshot(&self, now: DateTime<Utc>, max_age: Duration) -> Option<Arc<DashboardSnapshot>> {
		if self.snapshot_generation != self.generation {
			return None;
		}

		self.snapshot
			.as_ref()
			.filter(|snapshot| {
				// a clock that went backwards counts as fresh
				(now - snapshot.refreshed_at).to_std().map_or(true, |age| age < max_age)
			})
			.cloned()
	}
}

impl DashboardFeed {
	pub fn new(backend: Arc<dyn Backend>, time_source: TimeSource, max_age: Duration) -> Self {
		Self {
			shared: Arc::new(SharedFeed {
				backend,
				time_source,
				max_age,
				cache: Default::default(),
				read_lock: Mutex::new(()),
			}),
		}
	}

	/// The cached snapshot if it is still fresh, otherwise a new read.
	pub async fn snapshot(&self) -> Result<Arc<DashboardSnapshot>, BackendError> {
		if let Some(snapshot) = self.shared.fresh_snapshot() {
			return Ok(snapshot);
		}

		let _read_guard = self.shared.read_lock.lock().await;
		// another request may have completed a read while this one was waiting
		if let Some(snapshot) = self.shared.fresh_snapshot() {
			return Ok(snapshot);
		}
		self.shared.read().await
	}

	/// Reads from the backend regardless of the cache.
	pub async fn refresh_now(&self) -> Result<Arc<DashboardSnapshot>, BackendError> {
		let _read_guard = self.shared.read_lock.lock().await;
		self.shared.read().await
	}

	/// Makes the next [`DashboardFeed::snapshot`] read from the backend, including when a read
	/// is in flight right now.
	pub fn invalidate(&self) {
		self.shared.cache.write().generation += 1;
		debug!("Dashboard snapshot invalidated");
	}

	pub fn last_error(&self) -> Option<String> {
		self.shared.cache.read().last_error.clone()
	}
}

impl SharedFeed {
	fn fresh_snapshot(&self) -> Option<Arc<DashboardSnapshot>> {
		self.cache.read().fresh_snapshot(self.time_source.now(), self.max_age)
	}

	/// Callers hold `read_lock`.
	async fn read(&self) -> Result<Arc<DashboardSnapshot>, BackendError> {
		let generation = self.cache.read().generation;
		let now = self.time_source.now();

		match self.backend.list_active_future_bookings(None, now).await {
			Ok(bookings) => {
				debug!(count = bookings.len(), "Dashboard refreshed");
				let snapshot = Arc::new(DashboardSnapshot {
					bookings,
					refreshed_at: now,
				});

				let mut cache = self.cache.write();
				if cache
					.snapshot
					.as_ref()
					.is_none_or(|current| current.refreshed_at <= now)
				{
					cache.snapshot = Some(snapshot.clone());
					cache.snapshot_generation = generation;
				}
				cache.last_error = None;
				Ok(snapshot)
			}
			Err(error) => {
				warn!(%error, "Dashboard refresh failed, keeping previous snapshot");
				self.cache.write().last_error = Some(error.to_string());
				Err(error)
			}
		}
	}
}
