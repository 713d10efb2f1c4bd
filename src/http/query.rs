// crates.io
use url::form_urlencoded;
// self
use crate::_prelude::*;

/// Renders a scalar JSON value the way it appears on the wire.
///
/// Objects, arrays, and `null` have no scalar text and yield `None`.
pub fn scalar_text(value: &JsonValue) -> Option<String> {
	match value {
		JsonValue::String(text) => Some(text.clone()),
		JsonValue::Number(number) => Some(number.to_string()),
		JsonValue::Bool(flag) => Some(flag.to_string()),
		JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
	}
}

/// Collects the top-level scalar fields of `body` as `(name, value)` pairs in field order.
///
/// Nested objects, arrays, and `null` fields are skipped; non-object bodies yield no pairs.
pub fn flatten_query_params(body: &JsonValue) -> Vec<(String, String)> {
	match body {
		JsonValue::Object(fields) => fields
			.iter()
			.filter_map(|(name, value)| scalar_text(value).map(|text| (name.clone(), text)))
			.collect(),
		_ => Vec::new(),
	}
}

/// Appends percent-encoded `key=value` pairs to `url`.
///
/// Pairs follow a `?` when the URL has no query component yet and a `&` otherwise (no extra
/// separator when the URL already ends with one). The URL is returned untouched when there is
/// nothing to append.
pub fn append_query(url: &str, params: &[(String, String)]) -> String {
	if params.is_empty() {
		return url.to_owned();
	}

	let mut buf = String::from(url);

	if !url.contains('?') {
		buf.push('?');
	} else if !url.ends_with('&') && !url.ends_with('?') {
		buf.push('&');
	}

	for (idx, (name, value)) in params.iter().enumerate() {
		if idx > 0 {
			buf.push('&');
		}

		buf.extend(form_urlencoded::byte_serialize(name.as_bytes()));
		buf.push('=');
		buf.extend(form_urlencoded::byte_serialize(value.as_bytes()));
	}

	buf
}

/// Returns `url` without its query string and fragment.
///
/// Query pairs may carry request fields verbatim, so diagnostics quote this form instead of the
/// wire URL.
pub fn strip_query(url: &str) -> &str {
	url.find(['?', '#']).map_or(url, |idx| &url[..idx])
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn flattens_scalars_in_declaration_order() {
		let params = flatten_query_params(&json!({
			"id": "42",
			"flag": true,
			"nested": { "skip": 1 },
			"list": [1, 2],
			"missing": null,
			"amount": 10.5,
		}));

		assert_eq!(
			params,
			vec![
				("id".to_owned(), "42".to_owned()),
				("flag".to_owned(), "true".to_owned()),
				("amount".to_owned(), "10.5".to_owned()),
			]
		);
	}

	#[test]
	fn appends_with_the_right_separator() {
		let params =
			vec![("id".to_owned(), "42".to_owned()), ("flag".to_owned(), "true".to_owned())];

		assert_eq!(append_query("/items", &params), "/items?id=42&flag=true");
		assert_eq!(append_query("/items?page=2", &params), "/items?page=2&id=42&flag=true");
		assert_eq!(append_query("/items?page=2&", &params), "/items?page=2&id=42&flag=true");
		assert_eq!(append_query("/items?", &params), "/items?id=42&flag=true");
		assert_eq!(append_query("/items", &[]), "/items");
	}

	#[test]
	fn percent_encodes_names_and_values() {
		let params = vec![("full name".to_owned(), "A&B=C/ü".to_owned())];

		assert_eq!(append_query("/search", &params), "/search?full+name=A%26B%3DC%2F%C3%BC");
	}

	#[test]
	fn strips_query_and_fragment() {
		assert_eq!(
			strip_query("https://api.example.com/echo?token=abc&id=1"),
			"https://api.example.com/echo"
		);
		assert_eq!(strip_query("/items#top"), "/items");
		assert_eq!(strip_query("/items"), "/items");
	}

	#[test]
	fn non_object_bodies_produce_no_params() {
		assert!(flatten_query_params(&JsonValue::Null).is_empty());
		assert!(flatten_query_params(&json!(["a", "b"])).is_empty());
		assert!(flatten_query_params(&json!("text")).is_empty());
	}
}
