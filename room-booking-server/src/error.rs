use crate::backend::error::BackendError;
use crate::configuration::ConfigurationError;
use crate::qr_code::QrCodeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoomBookingError {
	#[error("Failed to load configuration: {0}")]
	Configuration(#[from] ConfigurationError),
	#[error("Invalid log filters: {0}")]
	LogFilter(#[from] tracing_subscriber::filter::ParseError),
	#[error("Failed to set up the backend: {0}")]
	Backend(#[from] BackendError),
	#[error("Failed to generate QR code: {0}")]
	QrCode(#[from] QrCodeError),
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}
