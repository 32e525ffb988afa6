use crate::backend::error::BackendError;
use crate::booking::validation::{BookingRejection, BookingViolation};
use crate::server::rest_api::error::{ApiErrorResponse, error_operation_response};
use aide::OperationOutput;
use aide::generate::GenContext;
use aide::openapi::Operation;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum BookingCreationError {
	#[error(transparent)]
	Invalid(#[from] BookingRejection),
	#[error(transparent)]
	Backend(#[from] BackendError),
}

impl From<BookingCreationError> for ApiErrorResponse {
	fn from(error: BookingCreationError) -> Self {
		use BookingCreationError::*;
		match error {
			Invalid(rejection) => {
				let r#type = match rejection.primary {
					BookingViolation::MissingRequiredFields => "booking-missing-required-fields",
					BookingViolation::UnparsableTime(_) => "booking-invalid-time",
					BookingViolation::StartNotInFuture => "booking-start-in-past",
					BookingViolation::EndNotAfterStart => "booking-end-not-after-start",
				};
				ApiErrorResponse {
					r#type,
					status: StatusCode::BAD_REQUEST.as_u16(),
					title: rejection.primary.title(),
					message: rejection.primary.to_string(),
					details: rejection.others.iter().map(ToString::to_string).collect(),
				}
			}
			Backend(BackendError::Rejected { message, .. }) => ApiErrorResponse {
				r#type: "booking-backend-rejected",
				status: StatusCode::BAD_GATEWAY.as_u16(),
				title: "Erro no agendamento",
				message,
				details: Vec::new(),
			},
			Backend(error) => ApiErrorResponse {
				title: "Erro no agendamento",
				..ApiErrorResponse::from(error)
			},
		}
	}
}

impl OperationOutput for BookingCreationError {
	type Inner = ApiErrorResponse;

	fn operation_response(ctx: &mut GenContext, operation: &mut Operation) -> Option<aide::openapi::Response> {
		error_operation_response(ctx, operation, "Booking could not be created.")
	}
}

impl IntoResponse for BookingCreationError {
	fn into_response(self) -> Response {
		match &self {
			BookingCreationError::Invalid(rejection) => info!(%rejection, "Rejected invalid booking"),
			BookingCreationError::Backend(error) => warn!(%error, "Backend rejected booking"),
		}
		ApiErrorResponse::from(self).into_response()
	}
}
