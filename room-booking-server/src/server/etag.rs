use axum::http::HeaderValue;
use rust_embed::Metadata;
use std::fmt::{Display, Formatter};

/// Strong entity tag derived from the SHA-256 hash rust-embed computes for every bundled file.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ETag {
	hash: [u8; 32],
}

impl ETag {
	/// Whether an `If-None-Match` header lists this tag.
	pub fn matches(&self, if_none_match: &HeaderValue) -> bool {
		let Ok(if_none_match) = if_none_match.to_str() else {
			return false;
		};
		let etag = self.to_string();
		if_none_match
			.split(',')
			.map(str::trim)
			.any(|candidate| candidate == "*" || candidate.trim_start_matches("W/") == etag)
	}
}

impl From<&Metadata> for ETag {
	fn from(metadata: &Metadata) -> Self {
		Self {
			hash: metadata.sha256_hash(),
		}
	}
}

impl From<[u8; 32]> for ETag {
	fn from(hash: [u8; 32]) -> Self {
		Self { hash }
	}
}

impl Display for ETag {
	fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
		write!(formatter, r#""{}""#, hex::encode(self.hash))
	}
}
