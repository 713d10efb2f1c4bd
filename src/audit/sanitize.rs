//! Masking of sensitive header and payload values before they reach the audit trail.

// self
use crate::_prelude::*;

/// Replacement written in place of every sensitive value.
pub const MASK: &str = "***";
/// Field and header names masked by [`Sanitizer::default`].
pub const DEFAULT_SENSITIVE_KEYS: [&str; 5] =
	["password", "token", "secret", "authorization", "apiKey"];

/// Recursive masker over structured values.
///
/// Keys are compared case-insensitively against the sensitive set; a matching key has its
/// whole value replaced by [`MASK`], whatever its shape. Every other value is kept and
/// descended into, so nested objects and arrays are masked as well. Sanitizing an already
/// sanitized value is a no-op.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sanitizer {
	sensitive_keys: Vec<String>,
}
impl Sanitizer {
	/// Adds an extra sensitive key on top of the current set.
	pub fn with_sensitive_key(mut self, key: impl Into<String>) -> Self {
		let key = key.into();

		if !self.is_sensitive(&key) {
			self.sensitive_keys.push(key);
		}

		self
	}

	/// Returns `true` if `key` matches the sensitive set, ignoring ASCII case.
	pub fn is_sensitive(&self, key: &str) -> bool {
		self.sensitive_keys.iter().any(|candidate| candidate.eq_ignore_ascii_case(key))
	}

	/// Returns `true` if any map key along `path` is sensitive.
	pub fn is_sensitive_path(&self, path: &serde_path_to_error::Path) -> bool {
		path.iter().any(|segment| match segment {
			serde_path_to_error::Segment::Map { key } => self.is_sensitive(key),
			_ => false,
		})
	}

	/// Masks every sensitive key inside `value`.
	pub fn sanitize_value(&self, value: JsonValue) -> JsonValue {
		match value {
			JsonValue::Object(map) => JsonValue::Object(
				map.into_iter()
					.map(|(key, value)| {
						let value = if self.is_sensitive(&key) {
							JsonValue::String(MASK.into())
						} else {
							self.sanitize_value(value)
						};

						(key, value)
					})
					.collect(),
			),
			JsonValue::Array(items) =>
				JsonValue::Array(items.into_iter().map(|item| self.sanitize_value(item)).collect()),
			scalar => scalar,
		}
	}

	/// Converts `value` into its structured form and masks it.
	///
	/// Values whose serialization fails are not meaningful to inspect and yield `None`.
	pub fn sanitize<T>(&self, value: &T) -> Option<JsonValue>
	where
		T: ?Sized + Serialize,
	{
		match serde_json::to_value(value) {
			Ok(structured) => Some(self.sanitize_value(structured)),
			Err(e) => {
				tracing::warn!(error = %e, "Failed to convert value into a structured form.");

				None
			},
		}
	}

	/// Produces the sanitized JSON text stored on audit records, falling back to `{}`.
	pub fn to_audit_json<T>(&self, value: &T) -> String
	where
		T: ?Sized + Serialize,
	{
		self.sanitize(value)
			.and_then(|sanitized| serde_json::to_string(&sanitized).ok())
			.unwrap_or_else(|| "{}".into())
	}

	/// Sanitizes a raw response body.
	///
	/// JSON bodies are masked structurally and re-serialized; any other text is returned as-is.
	pub fn sanitize_text(&self, raw: &str) -> String {
		match serde_json::from_str::<JsonValue>(raw) {
			Ok(structured @ (JsonValue::Object(_) | JsonValue::Array(_))) =>
				serde_json::to_string(&self.sanitize_value(structured))
					.unwrap_or_else(|_| raw.to_owned()),
			_ => raw.to_owned(),
		}
	}
}
impl Default for Sanitizer {
	fn default() -> Self {
		let sensitive_keys = DEFAULT_SENSITIVE_KEYS.iter().map(|key| (*key).to_owned()).collect();

		Self { sensitive_keys }
	}
}
