use crate::qr_code::QrCodeError;
use crate::server::rest_api::error::room_lookup::RoomLookupError;
use crate::server::rest_api::error::{ApiErrorResponse, error_operation_response};
use aide::OperationOutput;
use aide::generate::GenContext;
use aide::openapi::Operation;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QrCodeDownloadError {
	#[error(transparent)]
	Lookup(#[from] RoomLookupError),
	#[error("Erro ao gerar QR Code")]
	Generation(#[from] QrCodeError),
}

impl From<QrCodeDownloadError> for ApiErrorResponse {
	fn from(error: QrCodeDownloadError) -> Self {
		use QrCodeDownloadError::*;
		match error {
			Lookup(error) => ApiErrorResponse::from(error),
			Generation(_) => ApiErrorResponse {
				r#type: "qr-code-generation-failed",
				status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
				title: "Erro",
				message: error.to_string(),
				details: Vec::new(),
			},
		}
	}
}

impl OperationOutput for QrCodeDownloadError {
	type Inner = ApiErrorResponse;

	fn operation_response(ctx: &mut GenContext, operation: &mut Operation) -> Option<aide::openapi::Response> {
		error_operation_response(ctx, operation, "QR code could not be generated.")
	}
}

impl IntoResponse for QrCodeDownloadError {
	fn into_response(self) -> Response {
		match &self {
			QrCodeDownloadError::Lookup(RoomLookupError::Backend(error)) => {
				tracing::warn!(%error, "Failed to look up room for QR code");
			}
			QrCodeDownloadError::Generation(error) => tracing::error!(%error, "Failed to generate QR code"),
			QrCodeDownloadError::Lookup(RoomLookupError::NotFound) => {}
		}
		ApiErrorResponse::from(self).into_response()
	}
}
