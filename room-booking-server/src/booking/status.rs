use crate::backend::models::Booking;
use chrono::{DateTime, FixedOffset, Utc};
use schemars::JsonSchema;
use serde::Serialize;

/// Derived state of a booking relative to the current time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
	Finished,
	InProgress,
	Today,
	Scheduled,
}

/// Visual variant of the status badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BadgeVariant {
	Secondary,
	Default,
	Destructive,
	Outline,
}

impl BookingStatus {
	/// The first matching rule wins, in declaration order of the variants.
	pub fn classify(
		start_time: DateTime<Utc>,
		end_time: DateTime<Utc>,
		now: DateTime<Utc>,
		utc_offset: FixedOffset,
	) -> Self {
		if now > end_time {
			BookingStatus::Finished
		} else if start_time <= now {
			BookingStatus::InProgress
		} else if is_same_local_day(start_time, now, utc_offset) {
			BookingStatus::Today
		} else {
			BookingStatus::Scheduled
		}
	}

	pub fn label(self) -> &'static str {
		use BookingStatus::*;
		match self {
			Finished => "Finalizada",
			InProgress => "Em andamento",
			Today => "Hoje",
			Scheduled => "Agendada",
		}
	}

	pub fn badge_variant(self) -> BadgeVariant {
		use BookingStatus::*;
		match self {
			Finished => BadgeVariant::Secondary,
			InProgress => BadgeVariant::Default,
			Today => BadgeVariant::Destructive,
			Scheduled => BadgeVariant::Outline,
		}
	}
}

fn is_same_local_day(left: DateTime<Utc>, right: DateTime<Utc>, utc_offset: FixedOffset) -> bool {
	left.with_timezone(&utc_offset).date_naive() == right.with_timezone(&utc_offset).date_naive()
}

/// Bookings split the way the dashboard shows them. Finished bookings are in neither list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookingPartitions {
	pub today: Vec<(Booking, BookingStatus)>,
	pub upcoming: Vec<(Booking, BookingStatus)>,
	pub total_active: usize,
}

pub fn partition(bookings: &[Booking], now: DateTime<Utc>, utc_offset: FixedOffset) -> BookingPartitions {
	let mut partitions = BookingPartitions::default();
	for booking in bookings {
		let status = BookingStatus::classify(booking.start_time, booking.end_time, now, utc_offset);
		if status == BookingStatus::Finished {
			continue;
		}
		partitions.total_active += 1;

		if is_same_local_day(booking.start_time, now, utc_offset) {
			partitions.today.push((booking.clone(), status));
		} else if booking.start_time > now {
			partitions.upcoming.push((booking.clone(), status));
		}
	}
	partitions
}
