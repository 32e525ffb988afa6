use chrono::FixedOffset;
use reqwest::Url;
use serde::Deserialize;
use std::fmt::{Debug, Formatter};
use std::fs::read_to_string;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Configuration {
	#[serde(with = "socket_addr_deserializer")]
	pub address: SocketAddr,
	pub log_filters: String,
	/// Origin under which browsers reach this server, used as the target of the room QR codes.
	pub public_origin: String,
	/// Offset of the wall clock the organizers enter booking times in.
	#[serde(with = "fixed_offset_deserializer")]
	pub utc_offset: FixedOffset,
	/// How often an open dashboard page polls while its auto refresh is on.
	#[serde(with = "humantime_serde", default = "default_dashboard_refresh_interval")]
	pub dashboard_refresh_interval: Duration,
	/// How long a dashboard read is shared between requests.
	#[serde(with = "humantime_serde", default = "default_dashboard_cache_max_age")]
	pub dashboard_cache_max_age: Duration,
	pub backend: BackendConfiguration,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendConfiguration {
	Postgrest {
		#[serde(with = "url_deserializer")]
		url: Url,
		api_key: ApiKey,
		#[serde(with = "humantime_serde", default = "default_request_timeout")]
		request_timeout: Duration,
	},
	Memory {
		#[serde(default)]
		rooms: Vec<RoomSeed>,
	},
}

/// Key of the hosted backend, kept out of `Debug` output.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
	pub fn expose(&self) -> &str {
		&self.0
	}
}

impl From<&str> for ApiKey {
	fn from(key: &str) -> Self {
		Self(key.to_owned())
	}
}

impl Debug for ApiKey {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
		formatter.write_str("ApiKey(<redacted>)")
	}
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct RoomSeed {
	pub name: String,
	#[serde(default)]
	pub description: Option<String>,
	pub capacity: NonZeroU32,
	#[serde(default)]
	pub equipment: Vec<String>,
}

fn default_dashboard_refresh_interval() -> Duration {
	Duration::from_secs(30)
}

fn default_dashboard_cache_max_age() -> Duration {
	Duration::from_secs(5)
}

fn default_request_timeout() -> Duration {
	Duration::from_secs(10)
}

impl Configuration {
	pub fn from_file(path: impl AsRef<Path>) -> Result<Configuration, ConfigurationError> {
		let text = read_to_string(path)?;

		Ok(Configuration::try_from(text.as_str())?)
	}
}

impl TryFrom<&str> for Configuration {
	type Error = toml::de::Error;

	fn try_from(text: &str) -> Result<Self, Self::Error> {
		toml::from_str(text)
	}
}

#[derive(Error, Debug)]
pub enum ConfigurationError {
	#[error("Failed to deserialize with error: {0}")]
	DeserializationError(#[from] toml::de::Error),
	#[error("IO operation failed: {0}")]
	IoError(#[from] std::io::Error),
}

// See https://serde.rs/custom-date-format.html
mod socket_addr_deserializer {
	use serde::{self, Deserialize, Deserializer};
	use std::net::SocketAddr;
	use std::str::FromStr;

	pub fn deserialize<'deserializer, D>(deserializer: D) -> Result<SocketAddr, D::Error>
	where
		D: Deserializer<'deserializer>,
	{
		let string = String::deserialize(deserializer)?;
		SocketAddr::from_str(string.as_str()).map_err(serde::de::Error::custom)
	}
}

mod fixed_offset_deserializer {
	use chrono::FixedOffset;
	use serde::{self, Deserialize, Deserializer};
	use std::str::FromStr;

	/// Accepts offsets like `-03:00` or `+01:00`.
	pub fn deserialize<'deserializer, D>(deserializer: D) -> Result<FixedOffset, D::Error>
	where
		D: Deserializer<'deserializer>,
	{
		let string = String::deserialize(deserializer)?;
		FixedOffset::from_str(string.as_str()).map_err(serde::de::Error::custom)
	}
}

mod url_deserializer {
	use reqwest::Url;
	use serde::{self, Deserialize, Deserializer};

	pub fn deserialize<'deserializer, D>(deserializer: D) -> Result<Url, D::Error>
	where
		D: Deserializer<'deserializer>,
	{
		let string = String::deserialize(deserializer)?;
		Url::parse(string.as_str()).map_err(serde::de::Error::custom)
	}
}
