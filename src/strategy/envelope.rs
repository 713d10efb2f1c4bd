//! Provider status-envelope inspection.
//!
//! Providers report business outcomes inside the payload rather than through HTTP status codes.
//! The envelope fields may sit at any depth, so lookups walk the whole tree.

// self
use crate::{_prelude::*, http};

/// Envelope field carrying the provider outcome code.
pub const STATUS_CODE_FIELD: &str = "statusCode";
/// Envelope field carrying the provider outcome message.
pub const STATUS_MESSAGE_FIELD: &str = "statusMessage";
/// Status code value that marks a successful call.
pub const SUCCESS_STATUS: &str = "SUCCESS";

/// Status fields extracted from a decoded response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Envelope {
	/// First `statusCode` scalar found in the tree.
	pub status_code: Option<String>,
	/// First `statusMessage` scalar found in the tree.
	pub status_message: Option<String>,
}
impl Envelope {
	/// Extracts the envelope fields from a JSON tree.
	pub fn from_value(tree: &JsonValue) -> Self {
		Self {
			status_code: find_first_matching_key(tree, STATUS_CODE_FIELD),
			status_message: find_first_matching_key(tree, STATUS_MESSAGE_FIELD),
		}
	}

	/// Extracts the envelope fields from any serializable response.
	///
	/// Responses that cannot be represented as JSON yield an empty envelope.
	pub fn inspect<T>(response: &T) -> Self
	where
		T: ?Sized + Serialize,
	{
		match serde_json::to_value(response) {
			Ok(tree) => Self::from_value(&tree),
			Err(e) => {
				tracing::warn!(error = %e, "Response envelope could not be inspected.");

				Self::default()
			},
		}
	}

	/// Returns `true` when the status code is exactly [`SUCCESS_STATUS`].
	pub fn is_success(&self) -> bool {
		self.status_code.as_deref() == Some(SUCCESS_STATUS)
	}
}

/// Depth-first, pre-order search for the first scalar field named `key`.
///
/// Object keys are compared case-insensitively and visited in document order; arrays are
/// searched element by element. A key whose value is an object, array, or `null` does not match,
/// but its value is still searched.
pub fn find_first_matching_key(node: &JsonValue, key: &str) -> Option<String> {
	match node {
		JsonValue::Object(fields) => fields.iter().find_map(|(name, value)| {
			let direct =
				if name.eq_ignore_ascii_case(key) { http::scalar_text(value) } else { None };

			direct.or_else(|| find_first_matching_key(value, key))
		}),
		JsonValue::Array(items) => items.iter().find_map(|item| find_first_matching_key(item, key)),
		_ => None,
	}
}
