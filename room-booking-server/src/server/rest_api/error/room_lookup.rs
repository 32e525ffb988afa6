use crate::backend::error::BackendError;
use crate::server::rest_api::error::{ApiErrorResponse, error_operation_response};
use aide::OperationOutput;
use aide::generate::GenContext;
use aide::openapi::Operation;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoomLookupError {
	#[error("A sala solicitada não existe.")]
	NotFound,
	#[error(transparent)]
	Backend(#[from] BackendError),
}

impl From<RoomLookupError> for ApiErrorResponse {
	fn from(error: RoomLookupError) -> Self {
		use RoomLookupError::*;
		match error {
			NotFound => ApiErrorResponse {
				r#type: "room-not-found",
				status: StatusCode::NOT_FOUND.as_u16(),
				title: "Sala não encontrada",
				message: error.to_string(),
				details: Vec::new(),
			},
			Backend(error) => ApiErrorResponse::from(error),
		}
	}
}

impl OperationOutput for RoomLookupError {
	type Inner = ApiErrorResponse;

	fn operation_response(ctx: &mut GenContext, operation: &mut Operation) -> Option<aide::openapi::Response> {
		error_operation_response(ctx, operation, "Room could not be loaded.")
	}
}

impl IntoResponse for RoomLookupError {
	fn into_response(self) -> Response {
		if let RoomLookupError::Backend(error) = &self {
			tracing::warn!(%error, "Failed to look up room");
		}
		ApiErrorResponse::from(self).into_response()
	}
}
