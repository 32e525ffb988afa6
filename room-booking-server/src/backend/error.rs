use anyhow::Context;

/// Type erased error that works for all kinds of backend implementations
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
	#[error("Backend unreachable: {0}")]
	Unreachable(anyhow::Error),
	/// The backend answered with an error. `message` is the backend's own explanation.
	#[error("{message}")]
	Rejected { status: u16, message: String },
	#[error("Unexpected backend response: {0}")]
	Decode(anyhow::Error),
	#[error("Invalid backend configuration: {0}")]
	Configuration(anyhow::Error),
}

pub trait IntoBackendResult<Ok>: Sized {
	fn unreachable(self, context: &'static str) -> Result<Ok, BackendError>;
	fn decode_error(self, context: &'static str) -> Result<Ok, BackendError>;
	fn configuration_error(self, context: &'static str) -> Result<Ok, BackendError>;
}

impl<Ok, Error> IntoBackendResult<Ok> for Result<Ok, Error>
where
	Error: std::error::Error + Send + Sync + 'static,
{
	fn unreachable(self, context: &'static str) -> Result<Ok, BackendError> {
		self.context(context).map_err(BackendError::Unreachable)
	}

	fn decode_error(self, context: &'static str) -> Result<Ok, BackendError> {
		self.context(context).map_err(BackendError::Decode)
	}

	fn configuration_error(self, context: &'static str) -> Result<Ok, BackendError> {
		self.context(context).map_err(BackendError::Configuration)
	}
}
