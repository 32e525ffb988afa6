use crate::backend::models::RoomId;
use crate::server::rest_api::error::room_lookup::RoomLookupError;
use crate::server::rest_api::models::RoomPath;
use aide::OperationInput;
use aide::generate::GenContext;
use aide::openapi::Operation;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use tracing::debug;

/// The `{room_id}` path segment. A segment that is no room id names no room either, so it is
/// rejected the same way as an unknown room.
pub struct RoomIdPath(pub RoomId);

impl<S: Send + Sync> FromRequestParts<S> for RoomIdPath {
	type Rejection = RoomLookupError;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		let Path(RoomPath { room_id }) = Path::<RoomPath>::from_request_parts(parts, state)
			.await
			.map_err(|rejection| {
				debug!(%rejection, "Malformed room id");
				RoomLookupError::NotFound
			})?;
		Ok(Self(room_id))
	}
}

impl OperationInput for RoomIdPath {
	fn operation_input(ctx: &mut GenContext, operation: &mut Operation) {
		Path::<RoomPath>::operation_input(ctx, operation);
	}
}
