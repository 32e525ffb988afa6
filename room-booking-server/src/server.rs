use crate::context::ApplicationContext;
use axum::Router;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

mod etag;
mod file_bundle;
mod frontend;
mod rest_api;

pub async fn run_server(application_context: ApplicationContext) -> std::io::Result<()> {
	let address = application_context.configuration.address;
	let handle = axum_server::Handle::new();

	let shutdown_handle = handle.clone();
	tokio::spawn(async move {
		if let Err(error) = tokio::signal::ctrl_c().await {
			warn!(%error, "Failed to listen for ctrl-c, shutdown needs to be forced");
			return;
		}
		info!("Shutting down.");
		shutdown_handle.graceful_shutdown(Some(Duration::from_secs(5)));
	});

	axum_server::bind(address)
		.handle(handle)
		.serve(create_router(application_context).into_make_service())
		.await
}

pub fn create_router(application_context: ApplicationContext) -> Router {
	Router::new()
		.nest("/api", rest_api::rest_api())
		.merge(frontend::frontend())
		.layer(TraceLayer::new_for_http())
		.with_state(application_context)
}
