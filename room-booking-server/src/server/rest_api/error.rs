use crate::backend::error::BackendError;
use aide::OperationOutput;
use aide::generate::GenContext;
use aide::openapi::Operation;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use schemars::JsonSchema;
use serde::Serialize;

pub mod booking_creation;
pub mod qr_code;
pub mod room_lookup;

/// Type-erased error response
///
/// NOTE: This type is inspired by RFC7807 (Problem Details for HTTP APIs) but spares on a lot of
/// the details to avoid complexity. `title` and `message` are meant to be shown to users as is.
///
/// See: <https://www.rfc-editor.org/rfc/rfc7807.html>
#[derive(Debug, Serialize, JsonSchema)]
pub struct ApiErrorResponse {
	pub r#type: &'static str,
	pub status: u16,
	pub title: &'static str,
	pub message: String,
	/// Further problems with the same request, beyond the one in `message`.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub details: Vec<String>,
}

impl IntoResponse for ApiErrorResponse {
	fn into_response(self) -> Response {
		let status_code = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		(status_code, Json(self)).into_response()
	}
}

/// Documents an error type as an [`ApiErrorResponse`] body with the given description.
pub(super) fn error_operation_response(
	ctx: &mut GenContext,
	operation: &mut Operation,
	description: &str,
) -> Option<aide::openapi::Response> {
	let mut response = Json::<ApiErrorResponse>::operation_response(ctx, operation)?;
	response.description = description.to_string();
	Some(response)
}

impl From<BackendError> for ApiErrorResponse {
	fn from(error: BackendError) -> Self {
		ApiErrorResponse {
			r#type: "backend-unavailable",
			status: StatusCode::BAD_GATEWAY.as_u16(),
			title: "Erro ao carregar dados",
			message: error.to_string(),
			details: Vec::new(),
		}
	}
}

impl OperationOutput for BackendError {
	type Inner = ApiErrorResponse;

	fn operation_response(ctx: &mut GenContext, operation: &mut Operation) -> Option<aide::openapi::Response> {
		error_operation_response(ctx, operation, "The data backend failed or rejected the request.")
	}
}

impl IntoResponse for BackendError {
	fn into_response(self) -> Response {
		tracing::warn!(error = %self, "Backend request failed");
		ApiErrorResponse::from(self).into_response()
	}
}
