//! Request strategies describe one logical provider call.
//!
//! A [`RequestStrategy`] answers four questions for the executor: where to send the call, which
//! verb to use, what to send, and what shape the answer takes. It also gets the last word on
//! the decoded response through [`RequestStrategy::process_result`]. Strategies are composable:
//! [`DecoratedStrategy`] wraps any strategy with a base URL, bearer credentials, and provider
//! status-envelope checks while delegating everything else to the wrapped value.

pub mod decorated;
pub mod envelope;
pub mod provider_x;

pub use decorated::*;
pub use envelope::*;
pub use provider_x::*;

// std
use std::{any, marker::PhantomData};
// self
use crate::{
	_prelude::*,
	audit::{MASK, Sanitizer},
	http::{HeaderMap, HeaderName, HeaderValue, Method},
};

/// Boxed future returned by [`RequestStrategy::build_request`].
pub type StrategyFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Decoding failure raised by [`ResponseType::decode`].
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body looked like JSON but was not well formed.
	#[error("Malformed JSON: {0}")]
	Syntax(#[from] serde_json::Error),
	/// Body was valid JSON but did not fit the declared response type.
	#[error("{0}")]
	Shape(#[from] serde_path_to_error::Error<serde_json::Error>),
}
impl DecodeError {
	/// Renders the failure for the audit trail.
	///
	/// Shape errors quote the offending value; when the failing path crosses a sensitive key the
	/// value is replaced by [`MASK`] and only the path is kept.
	pub fn audit_message(&self, sanitizer: &Sanitizer) -> String {
		match self {
			Self::Shape(e) if sanitizer.is_sensitive_path(e.path()) =>
				format!("{}: invalid value {MASK}", e.path()),
			_ => self.to_string(),
		}
	}
}

/// Contract every outbound call implements.
///
/// Each method may fail with an [`Error`]; failures from `url`, `method`, `build_request`, and
/// `response_type` abort the call before any network traffic while still being audited.
pub trait RequestStrategy
where
	Self: Send + Sync,
{
	/// Typed request entity serialized as the JSON body, or flattened into the query for `GET`.
	///
	/// Use `()` for calls without a body.
	type Request: Serialize + Send;
	/// Typed response the body is decoded into.
	type Response: DeserializeOwned + Serialize + Send;

	/// Full or relative target URL.
	fn url(&self) -> Result<String>;

	/// HTTP verb for the call.
	fn method(&self) -> Result<Method>;

	/// Headers and typed entity to send.
	///
	/// Asynchronous so decorators can acquire credentials while building the request.
	fn build_request(&self) -> StrategyFuture<'_, OutboundRequest<Self::Request>>;

	/// Descriptor of the response shape.
	fn response_type(&self) -> Result<ResponseType<Self::Response>> {
		Ok(ResponseType::new())
	}

	/// Post-deserialization hook; an `Err` fails the call.
	fn process_result(&self, response: &Self::Response) -> Result<()>;
}

/// Headers plus typed entity produced by [`RequestStrategy::build_request`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundRequest<B> {
	/// Outbound headers.
	pub headers: HeaderMap,
	/// Typed request entity.
	pub body: B,
}
impl<B> OutboundRequest<B> {
	/// Creates a request with no headers.
	pub fn new(body: B) -> Self {
		Self { headers: HeaderMap::new(), body }
	}

	/// Adds or replaces a header.
	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Replaces every header.
	pub fn with_headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;

		self
	}
}

/// Descriptor of the type a response body decodes into.
///
/// The descriptor is zero-sized apart from the type name it reports in logs and audit records.
pub struct ResponseType<T> {
	name: &'static str,
	_marker: PhantomData<fn() -> T>,
}
impl<T> ResponseType<T>
where
	T: DeserializeOwned,
{
	/// Creates the descriptor for `T`.
	pub fn new() -> Self {
		Self { name: any::type_name::<T>(), _marker: PhantomData }
	}

	/// Fully qualified type name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Decodes a raw response body.
	///
	/// Bodies whose first non-whitespace character opens a JSON object or array are parsed as
	/// JSON and mapped onto `T`. Any other text, blank bodies included, is offered to `T` as a
	/// plain JSON string, so `String` responses accept arbitrary payloads while structured types
	/// reject them.
	pub fn decode(&self, raw: &str) -> Result<T, DecodeError> {
		let trimmed = raw.trim_start();
		let tree = if trimmed.starts_with('{') || trimmed.starts_with('[') {
			serde_json::from_str::<JsonValue>(raw)?
		} else {
			JsonValue::String(raw.to_owned())
		};

		Ok(serde_path_to_error::deserialize(tree)?)
	}
}
impl<T> Clone for ResponseType<T> {
	fn clone(&self) -> Self {
		*self
	}
}
impl<T> Copy for ResponseType<T> {}
impl<T> Debug for ResponseType<T> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ResponseType").field(&self.name).finish()
	}
}
impl<T> Default for ResponseType<T>
where
	T: DeserializeOwned,
{
	fn default() -> Self {
		Self::new()
	}
}
