use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Source of wall-clock time.
///
/// The default instance uses the system clock. [`TimeSource::test`] creates a frozen clock that
/// only moves when [`TimeSource::advance_time`] is called, shared by every clone.
#[derive(Clone, Default)]
pub struct TimeSource {
	test_clock: Option<Arc<Mutex<DateTime<Utc>>>>,
}

impl TimeSource {
	pub fn test(start: DateTime<Utc>) -> Self {
		Self {
			test_clock: Some(Arc::new(Mutex::new(start))),
		}
	}

	pub fn now(&self) -> DateTime<Utc> {
		match &self.test_clock {
			None => Utc::now(),
			Some(test_clock) => *test_clock.lock(),
		}
	}

	#[cfg_attr(not(test), allow(dead_code))]
	pub fn advance_time(&self, by_duration: Duration) {
		let test_clock = self.test_clock.as_ref().expect("Can only be called in test mode.");
		let delta = TimeDelta::from_std(by_duration).expect("Test time advanced by an unrepresentable duration.");
		*test_clock.lock() += delta;
	}
}
