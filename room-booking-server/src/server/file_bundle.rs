use crate::server::etag::ETag;
use axum::body::Bytes;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE, ETAG, IF_NONE_MATCH};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use mime_guess::MimeGuess;
use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::collections::HashMap;

struct BundledFile {
	content: Bytes,
	etag: ETag,
	mime: String,
}

/// Serves the files of a [`RustEmbed`] bundle, answering revalidation requests with 304.
pub struct BundledFileHandler {
	files: HashMap<String, BundledFile>,
}

impl BundledFileHandler {
	pub fn new<Bundle: RustEmbed>() -> Self {
		let files = Bundle::iter()
			.filter_map(|path| {
				let file = Bundle::get(&path)?;
				let bundled_file = BundledFile {
					etag: ETag::from(&file.metadata),
					mime: MimeGuess::from_path(&*path).first_or_octet_stream().to_string(),
					content: match file.data {
						Cow::Borrowed(data) => Bytes::from_static(data),
						Cow::Owned(data) => Bytes::from(data),
					},
				};
				Some((path.into_owned(), bundled_file))
			})
			.collect();

		Self { files }
	}

	pub fn request(&self, path: &str, request_headers: &HeaderMap) -> Response {
		let Some(file) = self.get_file_falling_back_to_index_html(path) else {
			return not_found();
		};

		if request_headers
			.get(IF_NONE_MATCH)
			.is_some_and(|if_none_match| file.etag.matches(if_none_match))
		{
			return (StatusCode::NOT_MODIFIED, [(ETAG, file.etag.to_string())]).into_response();
		}

		let headers = [
			(CONTENT_TYPE, file.mime.clone()),
			(ETAG, file.etag.to_string()),
			// Tell browsers to always make the request with If-None-Match instead
			// of relying on a maximum age.
			(CACHE_CONTROL, "must-revalidate".to_string()),
		];
		(StatusCode::OK, headers, file.content.clone()).into_response()
	}

	fn get_file_falling_back_to_index_html(&self, path: &str) -> Option<&BundledFile> {
		let path = Self::normalize_path(path);
		self.files.get(path).or_else(|| {
			if path.is_empty() {
				self.files.get("index.html")
			} else {
				self.files.get(&format!("{path}/index.html"))
			}
		})
	}

	fn normalize_path(path: &str) -> &str {
		path.trim_matches('/')
	}
}

fn not_found() -> Response {
	const STATUS: StatusCode = StatusCode::NOT_FOUND;
	(
		STATUS,
		[(CACHE_CONTROL, "no-cache")],
		STATUS.canonical_reason().unwrap_or_default(),
	)
		.into_response()
}
