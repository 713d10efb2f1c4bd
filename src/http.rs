//! Transport primitives for outbound provider calls.
//!
//! The module exposes [`HttpTransport`] alongside the crate-owned [`HttpRequest`] and
//! [`HttpResponse`] types so downstream crates can plug in custom HTTP clients (or fakes in
//! tests) without the executor depending on any particular HTTP stack. [`ReqwestHttpClient`] is
//! the default implementation behind the `reqwest` feature.

mod headers;
mod query;

pub use ::http::{
	HeaderMap, HeaderName, HeaderValue, Method,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
pub use headers::*;
pub use query::*;

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing one outbound call.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared by every
/// concurrent executor invocation. A transport performs exactly one attempt per call: it never
/// retries, and it reports every received response (including 4xx/5xx statuses) as `Ok` so the
/// executor can record it before classifying the status.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends the request and resolves to the raw response.
	fn send(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// Wire-level request produced by the executor after method-specific adaptation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
	/// HTTP verb.
	pub method: Method,
	/// Final URL, including any query string appended for `GET` calls.
	pub url: String,
	/// Outbound headers, including injected credentials.
	pub headers: HeaderMap,
	/// Serialized JSON body; always `None` for `GET`.
	pub body: Option<String>,
}

/// Raw response captured by a transport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers.
	pub headers: HeaderMap,
	/// Response body decoded as text.
	pub body: String,
}
impl HttpResponse {
	/// Creates a response with the given status and body and no headers.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self { status, headers: HeaderMap::new(), body: body.into() }
	}

	/// Attaches response headers.
	pub fn with_headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;

		self
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The default client has no timeout; pass a configured client through
/// [`ReqwestHttpClient::with_client`] when calls must be bounded.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
		let HttpRequest { method, url, headers, body } = request;
		let mut builder = self.0.request(method, url.as_str()).headers(headers);

		if let Some(body) = body {
			builder = builder.body(body);
		}

		let response = builder.send().await?;
		let status = response.status().as_u16();
		let headers = response.headers().clone();
		let body = response.text().await?;

		Ok(HttpResponse { status, headers, body })
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(self.dispatch(request))
	}
}
