use aide::OperationOutput;
use aide::generate::GenContext;
use aide::openapi::{MediaType, Operation};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use indexmap::IndexMap;

/// Response wrapper for HTTP Status Code 201 CREATED
///
/// Just returning a tuple of (`StatusCode`, `Response`) would not be reflected in the aide generated
/// documentation. Document the status with `TransformOperation::response::<201, _>` on the route.
pub struct Created<T>(pub T);

impl<T: IntoResponse> IntoResponse for Created<T> {
	fn into_response(self) -> Response {
		(StatusCode::CREATED, self.0).into_response()
	}
}

impl<T: OperationOutput> OperationOutput for Created<T> {
	type Inner = T::Inner;

	fn operation_response(ctx: &mut GenContext, operation: &mut Operation) -> Option<aide::openapi::Response> {
		T::operation_response(ctx, operation)
	}
}

/// A PNG image the browser saves under `file_name` instead of displaying it.
pub struct PngDownload {
	pub file_name: String,
	pub png: Vec<u8>,
}

impl IntoResponse for PngDownload {
	fn into_response(self) -> Response {
		let headers = [
			(CONTENT_TYPE, mime::IMAGE_PNG.to_string()),
			(CONTENT_DISPOSITION, format!(r#"attachment; filename="{}""#, self.file_name)),
		];
		(headers, self.png).into_response()
	}
}

impl OperationOutput for PngDownload {
	type Inner = Vec<u8>;

	fn operation_response(_ctx: &mut GenContext, _operation: &mut Operation) -> Option<aide::openapi::Response> {
		Some(aide::openapi::Response {
			description: "PNG image offered as a file download.".to_string(),
			content: IndexMap::from_iter([(mime::IMAGE_PNG.to_string(), MediaType::default())]),
			..Default::default()
		})
	}
}
