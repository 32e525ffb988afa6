use crate::server_tests::start_test_server;
use reqwest::{Method, StatusCode};
use reqwest::header::{CONTENT_TYPE, ETAG, IF_NONE_MATCH};

async fn page(path: &str) -> (StatusCode, String) {
	start_test_server().await.client.get_text(path).await
}

#[tokio::test]
async fn should_serve_landing_page() {
	let (status, body) = page("/").await;

	assert_eq!(StatusCode::OK, status);
	assert!(body.contains(r#"id="landing-page""#));
}

#[tokio::test]
async fn should_serve_room_catalog() {
	let (status, body) = page("/rooms").await;

	assert_eq!(StatusCode::OK, status);
	assert!(body.contains(r#"id="rooms-page""#));
}

#[tokio::test]
async fn should_serve_booking_page_for_any_room() {
	let server = start_test_server().await;

	let (status, body) = server.client.get_text(&format!("/booking/{}", server.blue_room)).await;

	assert_eq!(StatusCode::OK, status);
	assert!(body.contains(r#"id="booking-page""#));
}

#[tokio::test]
async fn should_serve_dashboard() {
	let (status, body) = page("/dashboard/").await;

	assert_eq!(StatusCode::OK, status);
	assert!(body.contains(r#"id="dashboard-page""#));
}

#[tokio::test]
async fn should_serve_assets_with_their_mime_type() {
	let server = start_test_server().await;

	let response = server.client.get("/assets/app.js").await;

	assert_eq!(StatusCode::OK, response.status());
	let content_type = response
		.headers()
		.get(CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.unwrap_or_default();
	assert!(content_type.contains("javascript"), "Unexpected content type {content_type}");
}

#[tokio::test]
async fn should_revalidate_with_etags() {
	let server = start_test_server().await;
	let response = server.client.get("/rooms").await;
	let etag = response.headers().get(ETAG).expect("No ETag").clone();

	let response = server
		.client
		.request(Method::GET, "/rooms")
		.header(IF_NONE_MATCH, etag)
		.send()
		.await
		.expect("Request failed.");

	assert_eq!(StatusCode::NOT_MODIFIED, response.status());
}

#[tokio::test]
async fn should_respond_with_not_found_for_unknown_pages() {
	let (status, _) = page("/nowhere").await;

	assert_eq!(StatusCode::NOT_FOUND, status);
}

#[tokio::test]
async fn room_catalog_should_report_failed_qr_code_downloads() {
	let (status, script) = page("/assets/rooms.js").await;

	assert_eq!(StatusCode::OK, status);
	assert!(script.contains("if (!response.ok)"));
	assert!(script.contains(r#"toast("Erro", "Não foi possível gerar o QR Code", "destructive")"#));
	assert!(script.contains("qrcode-sala-${roomId}.png"));
}

#[tokio::test]
async fn dashboard_should_keep_auto_refresh_in_the_page() {
	let (status, script) = page("/assets/dashboard.js").await;

	assert_eq!(StatusCode::OK, status);
	assert!(!script.contains("/dashboard/auto-refresh"));
	assert!(script.contains(r#"setTimeout(() => load("GET", "/dashboard")"#));
}
