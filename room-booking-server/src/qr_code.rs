use crate::backend::models::RoomId;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;
use thiserror::Error;

const MINIMUM_SIZE: u32 = 256;

#[derive(Error, Debug)]
pub enum QrCodeError {
	#[error("Failed to encode QR code: {0}")]
	Encode(#[from] qrcode::types::QrError),
	#[error("Failed to write QR code image: {0}")]
	Image(#[from] image::ImageError),
}

/// Scannable image leading to the booking page of a room.
#[derive(Clone, Debug)]
pub struct RoomQrCode {
	pub file_name: String,
	pub target: String,
	pub png: Vec<u8>,
}

impl RoomQrCode {
	pub fn generate(public_origin: &str, room_id: RoomId) -> Result<Self, QrCodeError> {
		let target = booking_link(public_origin, room_id);
		let png = encode_png(&target)?;

		Ok(Self {
			file_name: file_name(room_id),
			target,
			png,
		})
	}
}

pub fn booking_link(public_origin: &str, room_id: RoomId) -> String {
	format!("{}/booking/{room_id}", public_origin.trim_end_matches('/'))
}

pub fn file_name(room_id: RoomId) -> String {
	format!("qrcode-sala-{room_id}.png")
}

fn encode_png(content: &str) -> Result<Vec<u8>, QrCodeError> {
	let code = QrCode::new(content.as_bytes())?;
	let image = code
		.render::<Luma<u8>>()
		.min_dimensions(MINIMUM_SIZE, MINIMUM_SIZE)
		.quiet_zone(true)
		.build();

	let mut png = Cursor::new(Vec::new());
	DynamicImage::ImageLuma8(image).write_to(&mut png, ImageFormat::Png)?;
	Ok(png.into_inner())
}
