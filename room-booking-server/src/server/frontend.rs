use crate::context::ApplicationContext;
use crate::server::file_bundle::BundledFileHandler;
use axum::Router;
use axum::http::{HeaderMap, Uri};
use axum::routing::get;
use rust_embed::RustEmbed;
use std::sync::Arc;

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../room-booking-frontend"]
struct FrontendBundle;

const BOOKING_PAGE: &str = "booking/index.html";

/// The browser pages: `/`, `/rooms`, `/booking/{room_id}` and `/dashboard`, plus their assets.
pub fn frontend() -> Router<ApplicationContext> {
	let bundled_file_handler = Arc::new(BundledFileHandler::new::<FrontendBundle>());
	let booking_page_handler = bundled_file_handler.clone();

	Router::new()
		.route(
			"/booking/{room_id}",
			get(move |headers: HeaderMap| async move { booking_page_handler.request(BOOKING_PAGE, &headers) }),
		)
		.fallback(move |uri: Uri, headers: HeaderMap| async move { bundled_file_handler.request(uri.path(), &headers) })
}
