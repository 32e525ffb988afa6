use crate::backend::{Backend, create_backend};
use crate::booking::validation::BookingTimeValidator;
use crate::configuration::Configuration;
use crate::dashboard::DashboardFeed;
use crate::error::RoomBookingError;
use crate::utils::time_source::TimeSource;
use axum::extract::FromRef;
use std::sync::Arc;

#[derive(Clone, FromRef)]
pub struct ApplicationContext {
	pub configuration: Configuration,
	pub time_source: TimeSource,
	pub backend: Arc<dyn Backend>,
	pub booking_time_validator: BookingTimeValidator,
	pub dashboard_feed: DashboardFeed,
}

impl ApplicationContext {
	pub fn new(configuration: Configuration, time_source: TimeSource) -> Result<ApplicationContext, RoomBookingError> {
		let backend = create_backend(&configuration.backend, time_source.clone())?;
		Ok(Self::with_backend(configuration, time_source, backend))
	}

	pub fn with_backend(configuration: Configuration, time_source: TimeSource, backend: Arc<dyn Backend>) -> Self {
		let booking_time_validator = BookingTimeValidator::new(configuration.utc_offset);
		let dashboard_feed = DashboardFeed::new(
			backend.clone(),
			time_source.clone(),
			configuration.dashboard_cache_max_age,
		);

		Self {
			configuration,
			time_source,
			backend,
			booking_time_validator,
			dashboard_feed,
		}
	}
}
