use crate::backend::Backend;
use crate::backend::models::{Booking, BookingId, NewBooking, RecordStatus, RoomId};
use crate::server_tests::test_client::TestClient;
use crate::server_tests::{PUBLIC_ORIGIN, start_test_server, start_time};
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::StatusCode;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use serde_json::{Value, json};
use std::time::Duration;

/// Formats a UTC instant as the `datetime-local` value a browser at UTC-3 would send.
fn local(time: DateTime<Utc>) -> String {
	(time - TimeDelta::hours(3)).format("%Y-%m-%dT%H:%M").to_string()
}

fn booking_form(title: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Value {
	json!({
		"title": title,
		"description": "",
		"organizer_name": "Ana",
		"organizer_email": "ana@example.com",
		"start_time": local(start),
		"end_time": local(end),
	})
}

fn titles(bookings: &Value) -> Vec<&str> {
	bookings
		.as_array()
		.expect("Bookings are not an array")
		.iter()
		.map(|booking| booking["title"].as_str().unwrap_or_default())
		.collect()
}

#[tokio::test]
async fn should_list_rooms_ordered_by_name() {
	let server = start_test_server().await;

	let (status, rooms) = server.client.get_json("/api/rooms").await;

	assert_eq!(StatusCode::OK, status);
	assert_eq!("Sala Azul", rooms[0]["name"]);
	assert_eq!("Sala Verde", rooms[1]["name"]);
	assert_eq!(json!(["projector", "video conference"]), rooms[0]["equipment_labels"]);
	assert_eq!(
		format!("{PUBLIC_ORIGIN}/booking/{}", server.blue_room),
		rooms[0]["booking_url"]
	);
}

#[tokio::test]
async fn should_return_room_page_with_the_next_five_bookings() {
	let server = start_test_server().await;
	for hours in (1..=7).rev() {
		let start = start_time() + TimeDelta::hours(hours * 2);
		let (status, _) = server
			.client
			.post_booking(
				server.blue_room,
				&booking_form(&format!("Reunião {hours}"), start, start + TimeDelta::hours(1)),
			)
			.await;
		assert_eq!(StatusCode::CREATED, status);
	}
	let other_room_start = start_time() + TimeDelta::minutes(30);
	server
		.client
		.post_booking(
			server.green_room,
			&booking_form("Outra sala", other_room_start, other_room_start + TimeDelta::hours(1)),
		)
		.await;

	let (status, page) = server.client.get_json(&format!("/api/rooms/{}", server.blue_room)).await;

	assert_eq!(StatusCode::OK, status);
	assert_eq!("Sala Azul", page["room"]["name"]);
	assert_eq!("2026-10-17T11:00", page["minimum_start"]);
	assert_eq!(
		vec!["Reunião 1", "Reunião 2", "Reunião 3", "Reunião 4", "Reunião 5"],
		titles(&page["upcoming_bookings"])
	);
}

#[tokio::test]
async fn should_respond_with_not_found_for_unknown_rooms() {
	let server = start_test_server().await;

	let response = server.client.get(&format!("/api/rooms/{}", RoomId::new_v4())).await;

	let error = TestClient::expect_error(response, StatusCode::NOT_FOUND).await;
	assert_eq!("room-not-found", error.r#type);
	assert_eq!("Sala não encontrada", error.title);
}

#[tokio::test]
async fn should_treat_malformed_room_ids_as_unknown_rooms() {
	let server = start_test_server().await;

	for path in ["/api/rooms/sala-azul", "/api/rooms/sala-azul/qr-code"] {
		let error = TestClient::expect_error(server.client.get(path).await, StatusCode::NOT_FOUND).await;
		assert_eq!("room-not-found", error.r#type, "{path}");
		assert_eq!("A sala solicitada não existe.", error.message, "{path}");
	}

	let start = start_time() + TimeDelta::hours(2);
	let (status, error) = server
		.client
		.post_json(
			"/api/rooms/sala-azul/bookings",
			Some(&booking_form("Reunião", start, start + TimeDelta::hours(1))),
		)
		.await;
	assert_eq!(StatusCode::NOT_FOUND, status);
	assert_eq!("room-not-found", error["type"]);
	assert_eq!(0, server.backend.booking_count());
}

#[tokio::test]
async fn should_create_booking_and_point_to_the_dashboard() {
	let server = start_test_server().await;
	let start = start_time() + TimeDelta::hours(2);

	let (status, created) = server
		.client
		.post_booking(
			server.blue_room,
			&booking_form("Planejamento", start, start + TimeDelta::hours(1)),
		)
		.await;

	assert_eq!(StatusCode::CREATED, status);
	assert_eq!("/dashboard", created["redirect_to"]);
	assert_eq!("Agendamento criado com sucesso!", created["message"]);
	assert_eq!("Planejamento", created["booking"]["title"]);
	assert_eq!("today", created["booking"]["status"]);
	assert_eq!("12:00 - 13:00", created["booking"]["time_range"]);
	assert_eq!(1, server.backend.booking_count());
}

#[tokio::test]
async fn should_accept_overlapping_bookings() {
	let server = start_test_server().await;
	let start = start_time() + TimeDelta::hours(2);
	let form = booking_form("Sprint", start, start + TimeDelta::hours(1));

	let (first, _) = server.client.post_booking(server.blue_room, &form).await;
	let (second, _) = server.client.post_booking(server.blue_room, &form).await;

	assert_eq!(StatusCode::CREATED, first);
	assert_eq!(StatusCode::CREATED, second);
	assert_eq!(2, server.backend.booking_count());
}

#[tokio::test]
async fn should_reject_bookings_for_yesterday_without_contacting_the_backend() {
	let server = start_test_server().await;
	let yesterday = start_time() - TimeDelta::days(1);
	server.backend.reject_next_write("the backend must not be called");

	let (status, error) = server
		.client
		.post_booking(
			server.blue_room,
			&booking_form("Ontem", yesterday, yesterday + TimeDelta::hours(1)),
		)
		.await;

	assert_eq!(StatusCode::BAD_REQUEST, status);
	assert_eq!("booking-start-in-past", error["type"]);
	assert_eq!("Horário inválido", error["title"]);
	assert_eq!("Não é possível agendar para horários passados", error["message"]);
	assert_eq!(0, server.backend.booking_count());

	// the pending rejection was never consumed
	let start = start_time() + TimeDelta::hours(1);
	let (status, _) = server
		.client
		.post_booking(server.blue_room, &booking_form("Depois", start, start + TimeDelta::hours(1)))
		.await;
	assert_eq!(StatusCode::BAD_GATEWAY, status);
}

#[tokio::test]
async fn should_reject_bookings_ending_when_they_start() {
	let server = start_test_server().await;
	let start = start_time() + TimeDelta::hours(2);

	let (status, error) = server
		.client
		.post_booking(server.blue_room, &booking_form("Vazio", start, start))
		.await;

	assert_eq!(StatusCode::BAD_REQUEST, status);
	assert_eq!("booking-end-not-after-start", error["type"]);
	assert_eq!("O horário de fim deve ser posterior ao de início", error["message"]);
	assert_eq!(0, server.backend.booking_count());
}

#[tokio::test]
async fn should_report_further_violations_as_details() {
	let server = start_test_server().await;
	let yesterday = start_time() - TimeDelta::days(1);

	let response = server
		.client
		.send_booking(server.blue_room, &booking_form("Ontem", yesterday, yesterday))
		.await;

	let error = TestClient::expect_error(response, StatusCode::BAD_REQUEST).await;
	assert_eq!("booking-start-in-past", error.r#type);
	assert_eq!(vec!["O horário de fim deve ser posterior ao de início"], error.details);
}

#[tokio::test]
async fn should_reject_bookings_with_missing_fields() {
	let server = start_test_server().await;

	let (status, error) = server
		.client
		.post_booking(server.blue_room, &json!({"title": "Sem horário"}))
		.await;

	assert_eq!(StatusCode::BAD_REQUEST, status);
	assert_eq!("booking-missing-required-fields", error["type"]);
	assert_eq!("Campos obrigatórios", error["title"]);
	assert_eq!("Preencha todos os campos obrigatórios", error["message"]);
}

#[tokio::test]
async fn should_surface_backend_rejections_verbatim() {
	let server = start_test_server().await;
	let start = start_time() + TimeDelta::hours(2);
	server
		.backend
		.reject_next_write("new row violates row-level security policy for table \"bookings\"");

	let (status, error) = server
		.client
		.post_booking(
			server.blue_room,
			&booking_form("Bloqueado", start, start + TimeDelta::hours(1)),
		)
		.await;

	assert_eq!(StatusCode::BAD_GATEWAY, status);
	assert_eq!("booking-backend-rejected", error["type"]);
	assert_eq!("Erro no agendamento", error["title"]);
	assert_eq!(
		"new row violates row-level security policy for table \"bookings\"",
		error["message"]
	);
}

#[tokio::test]
async fn should_reject_bookings_for_rooms_unknown_to_the_backend() {
	let server = start_test_server().await;
	let start = start_time() + TimeDelta::hours(2);

	let (status, error) = server
		.client
		.post_booking(
			RoomId::new_v4(),
			&booking_form("Fantasma", start, start + TimeDelta::hours(1)),
		)
		.await;

	assert_eq!(StatusCode::BAD_GATEWAY, status);
	assert_eq!("booking-backend-rejected", error["type"]);
}

#[tokio::test]
async fn should_download_room_qr_code() {
	let server = start_test_server().await;

	let response = server
		.client
		.get(&format!("/api/rooms/{}/qr-code", server.blue_room))
		.await;

	assert_eq!(StatusCode::OK, response.status());
	assert_eq!(
		Some("image/png"),
		response.headers().get(CONTENT_TYPE).and_then(|value| value.to_str().ok())
	);
	let expected_disposition = format!(r#"attachment; filename="qrcode-sala-{}.png""#, server.blue_room);
	assert_eq!(
		Some(expected_disposition.as_str()),
		response
			.headers()
			.get(CONTENT_DISPOSITION)
			.and_then(|value| value.to_str().ok())
	);
	let png = response.bytes().await.expect("Failed to read body");
	let image = image::load_from_memory(&png).expect("Body is not an image");
	assert!(image.width() >= 256);
}

#[tokio::test]
async fn should_not_generate_qr_codes_for_unknown_rooms() {
	let server = start_test_server().await;

	let response = server
		.client
		.get(&format!("/api/rooms/{}/qr-code", RoomId::new_v4()))
		.await;

	let error = TestClient::expect_error(response, StatusCode::NOT_FOUND).await;
	assert_eq!("room-not-found", error.r#type);
}

#[tokio::test]
async fn should_partition_dashboard_bookings() {
	let server = start_test_server().await;
	let later_today = start_time() + TimeDelta::hours(3);
	let tomorrow = start_time() + TimeDelta::days(1);
	server
		.client
		.post_booking(
			server.blue_room,
			&booking_form("Hoje", later_today, later_today + TimeDelta::hours(1)),
		)
		.await;
	server
		.client
		.post_booking(
			server.green_room,
			&booking_form("Amanhã", tomorrow, tomorrow + TimeDelta::hours(1)),
		)
		.await;
	let running = server
		.backend
		.list_active_future_bookings(None, start_time())
		.await
		.expect("Failed to list bookings")
		.remove(0);
	server.backend.insert_booking(Booking {
		id: BookingId::new_v4(),
		title: "Em curso".to_string(),
		start_time: start_time() - TimeDelta::minutes(30),
		end_time: start_time() + TimeDelta::minutes(30),
		..running.clone()
	});
	server.backend.insert_booking(Booking {
		id: BookingId::new_v4(),
		title: "Cancelada".to_string(),
		status: RecordStatus::Cancelled,
		..running
	});

	let (status, dashboard) = server.client.post_json("/api/dashboard/refresh", None).await;

	assert_eq!(StatusCode::OK, status);
	assert_eq!(2, dashboard["today_count"]);
	assert_eq!(1, dashboard["upcoming_count"]);
	assert_eq!(3, dashboard["total_active"]);
	assert_eq!("Em curso", dashboard["today"][0]["title"]);
	assert_eq!("Em andamento", dashboard["today"][0]["status_label"]);
	assert_eq!("default", dashboard["today"][0]["badge_variant"]);
	assert_eq!("Hoje", dashboard["today"][1]["title"]);
	assert_eq!("destructive", dashboard["today"][1]["badge_variant"]);
	assert_eq!("Amanhã", dashboard["upcoming"][0]["title"]);
	assert_eq!("Agendada", dashboard["upcoming"][0]["status_label"]);
	assert_eq!("Sala Verde", dashboard["upcoming"][0]["room"]["name"]);
	assert_eq!("10:00:00", dashboard["refreshed_at_label"]);
	assert_eq!(30, dashboard["refresh_interval_seconds"]);
}

#[tokio::test]
async fn should_show_new_booking_on_dashboard_right_away() {
	let server = start_test_server().await;
	let (_, dashboard) = server.client.get_json("/api/dashboard").await;
	assert_eq!(0, dashboard["total_active"]);
	let start = start_time() + TimeDelta::hours(2);

	let (status, _) = server
		.client
		.post_booking(server.blue_room, &booking_form("Recém-criada", start, start + TimeDelta::hours(1)))
		.await;
	assert_eq!(StatusCode::CREATED, status);
	let (status, dashboard) = server.client.get_json("/api/dashboard").await;

	assert_eq!(StatusCode::OK, status);
	assert_eq!(vec!["Recém-criada"], titles(&dashboard["today"]));
}

#[tokio::test]
async fn dashboard_should_share_recent_reads_between_requests() {
	let server = start_test_server().await;
	let (_, first) = server.client.get_json("/api/dashboard").await;
	let start = start_time() + TimeDelta::hours(2);
	// written past the server, so nothing invalidates the shared read
	server
		.backend
		.create_booking(NewBooking {
			room_id: server.green_room,
			title: "Direta".to_string(),
			description: String::new(),
			organizer_name: "Bruno".to_string(),
			organizer_email: String::new(),
			start_time: start,
			end_time: start + TimeDelta::hours(1),
		})
		.await
		.expect("Failed to create booking");

	server.time_source.advance_time(Duration::from_secs(4));
	let (_, within_max_age) = server.client.get_json("/api/dashboard").await;
	server.time_source.advance_time(Duration::from_secs(1));
	let (_, after_max_age) = server.client.get_json("/api/dashboard").await;

	assert_eq!(0, first["total_active"]);
	assert_eq!(0, within_max_age["total_active"]);
	assert_eq!("10:00:00", within_max_age["refreshed_at_label"]);
	assert_eq!(1, after_max_age["total_active"]);
	assert_eq!("10:00:05", after_max_age["refreshed_at_label"]);
}

#[tokio::test]
async fn dashboard_should_drop_bookings_once_they_have_finished() {
	let server = start_test_server().await;
	let start = start_time() + TimeDelta::hours(1);
	server
		.client
		.post_booking(server.blue_room, &booking_form("Curta", start, start + TimeDelta::hours(1)))
		.await;

	server.time_source.advance_time(Duration::from_secs(3 * 3600));
	let (_, dashboard) = server.client.post_json("/api/dashboard/refresh", None).await;

	assert_eq!(0, dashboard["total_active"]);
	assert_eq!(json!([]), dashboard["today"]);
	assert_eq!(json!([]), dashboard["upcoming"]);
}

#[tokio::test]
async fn should_provide_openapi_json() {
	let server = start_test_server().await;

	let (status, document) = server.client.get_json("/api/openapi.json").await;

	assert_eq!(StatusCode::OK, status);
	assert!(
		document["openapi"]
			.as_str()
			.is_some_and(|version| version.starts_with("3."))
	);
	assert!(document["paths"]["/rooms/{room_id}/bookings"]["post"].is_object());
	assert!(document["paths"]["/dashboard/refresh"]["post"].is_object());
	assert!(document["paths"]["/dashboard/auto-refresh"].is_null());
}
