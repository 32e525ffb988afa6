use crate::backend::models::{NewBooking, RoomId};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, Utc};
use schemars::JsonSchema;
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use thiserror::Error;

const DATETIME_LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Values exactly as typed into the booking form. Times are `datetime-local` values without offset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BookingForm {
	pub title: String,
	pub description: String,
	pub organizer_name: String,
	pub organizer_email: String,
	pub start_time: String,
	pub end_time: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeField {
	Start,
	End,
}

impl Display for TimeField {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
		use TimeField::*;
		match self {
			Start => formatter.write_str("início"),
			End => formatter.write_str("fim"),
		}
	}
}

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookingViolation {
	#[error("Preencha todos os campos obrigatórios")]
	MissingRequiredFields,
	#[error("O horário de {0} não é uma data válida")]
	UnparsableTime(TimeField),
	#[error("Não é possível agendar para horários passados")]
	StartNotInFuture,
	#[error("O horário de fim deve ser posterior ao de início")]
	EndNotAfterStart,
}

impl BookingViolation {
	/// Notification title shown above the message.
	pub fn title(self) -> &'static str {
		use BookingViolation::*;
		match self {
			MissingRequiredFields => "Campos obrigatórios",
			UnparsableTime(_) | StartNotInFuture | EndNotAfterStart => "Horário inválido",
		}
	}
}

/// A booking form that must not be submitted. `primary` is the violation to show first.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{primary}")]
pub struct BookingRejection {
	pub primary: BookingViolation,
	pub others: Vec<BookingViolation>,
}

impl BookingRejection {
	pub fn violations(&self) -> impl Iterator<Item = BookingViolation> + '_ {
		std::iter::once(self.primary).chain(self.others.iter().copied())
	}
}

impl From<BookingViolation> for BookingRejection {
	fn from(primary: BookingViolation) -> Self {
		Self {
			primary,
			others: Vec::new(),
		}
	}
}

/// Checks booking forms against the wall clock of the organizers.
#[derive(Clone, Copy, Debug)]
pub struct BookingTimeValidator {
	utc_offset: FixedOffset,
}

impl BookingTimeValidator {
	pub fn new(utc_offset: FixedOffset) -> Self {
		Self { utc_offset }
	}

	pub fn utc_offset(&self) -> FixedOffset {
		self.utc_offset
	}

	pub fn validate(
		&self,
		room_id: RoomId,
		form: BookingForm,
		now: DateTime<Utc>,
	) -> Result<NewBooking, BookingRejection> {
		let required = [&form.title, &form.organizer_name, &form.start_time, &form.end_time];
		if required.iter().any(|value| value.is_empty()) {
			return Err(BookingViolation::MissingRequiredFields.into());
		}

		let start_time = self.parse_local(&form.start_time, TimeField::Start)?;
		let end_time = self.parse_local(&form.end_time, TimeField::End)?;

		let mut violations = Vec::new();
		if start_time <= now {
			violations.push(BookingViolation::StartNotInFuture);
		}
		if end_time <= start_time {
			violations.push(BookingViolation::EndNotAfterStart);
		}

		let mut violations = violations.into_iter();
		if let Some(primary) = violations.next() {
			return Err(BookingRejection {
				primary,
				others: violations.collect(),
			});
		}

		let BookingForm {
			title,
			description,
			organizer_name,
			organizer_email,
			..
		} = form;
		Ok(NewBooking {
			room_id,
			title,
			description,
			organizer_name,
			organizer_email,
			start_time,
			end_time,
		})
	}

	/// Earliest start the form offers: the start of the hour one hour from now, as a `datetime-local` value.
	pub fn minimum_start(&self, now: DateTime<Utc>) -> String {
		(now + TimeDelta::hours(1))
			.with_timezone(&self.utc_offset)
			.format("%Y-%m-%dT%H:00")
			.to_string()
	}

	fn parse_local(&self, text: &str, field: TimeField) -> Result<DateTime<Utc>, BookingViolation> {
		let naive = DATETIME_LOCAL_FORMATS
			.iter()
			.find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
			.ok_or(BookingViolation::UnparsableTime(field))?;

		naive
			.and_local_timezone(self.utc_offset)
			.single()
			.map(|local| local.with_timezone(&Utc))
			.ok_or(BookingViolation::UnparsableTime(field))
	}
}
