// self
use crate::{
	_prelude::*,
	http::{HeaderMap, HeaderValue},
};

/// Media type used for every structured payload.
pub const APPLICATION_JSON: &str = "application/json";

/// Builds a `Bearer <token>` credential marked as sensitive.
///
/// Tokens containing bytes that are not allowed in a header value cannot be sent and count as a
/// failed acquisition.
pub fn bearer_auth(token: &str) -> Result<HeaderValue> {
	let mut value = HeaderValue::try_from(format!("Bearer {token}")).map_err(|_| {
		Error::token_acquisition("Token contains characters that are not valid in a header.")
	})?;

	value.set_sensitive(true);

	Ok(value)
}

/// Renders a header value as text, replacing invalid UTF-8.
pub fn header_text(value: &HeaderValue) -> String {
	match value.to_str() {
		Ok(text) => text.to_owned(),
		Err(_) => String::from_utf8_lossy(value.as_bytes()).into_owned(),
	}
}

/// Converts a header map into a JSON object for the audit trail.
///
/// Names keep the map's order. A name with one value maps to a string, a repeated name maps to
/// an array of its values.
pub fn headers_to_json(headers: &HeaderMap) -> JsonValue {
	let fields = headers
		.keys()
		.map(|name| {
			let mut values = headers.get_all(name).iter().map(header_text).collect::<Vec<_>>();
			let value = if values.len() == 1 {
				JsonValue::String(values.remove(0))
			} else {
				JsonValue::Array(values.into_iter().map(JsonValue::String).collect())
			};

			(name.as_str().to_owned(), value)
		})
		.collect();

	JsonValue::Object(fields)
}
