//! Strategy decorator that adds a provider base URL, bearer credentials, and envelope checks.

// self
use crate::{
	_prelude::*,
	http::{self, AUTHORIZATION, Method},
	provider::{Provider, ProviderDescriptor},
	strategy::{Envelope, OutboundRequest, RequestStrategy, ResponseType, StrategyFuture},
	token::TokenSource,
};

const UNKNOWN_PROVIDER_LABEL: &str = "provider";

/// Wraps a [`RequestStrategy`] for a specific provider.
///
/// The decorator:
/// - prefixes the inner URL with the configured base URL (plain concatenation, no separator
///   normalization);
/// - copies the inner headers and injects `Authorization: Bearer <token>` from its
///   [`TokenSource`];
/// - fails the call when the decoded response carries a `statusCode` other than `SUCCESS`,
///   before delegating to the inner [`RequestStrategy::process_result`].
///
/// Method, request entity, and response type are delegated unchanged, so decorators nest.
pub struct DecoratedStrategy<S> {
	inner: S,
	token_source: Arc<dyn TokenSource>,
	base_url: String,
	provider_label: &'static str,
}
impl<S> DecoratedStrategy<S>
where
	S: RequestStrategy,
{
	/// Decorates `inner` with a token source and base URL.
	pub fn new(inner: S, token_source: Arc<dyn TokenSource>, base_url: impl Into<String>) -> Self {
		Self {
			inner,
			token_source,
			base_url: base_url.into(),
			provider_label: UNKNOWN_PROVIDER_LABEL,
		}
	}

	/// Decorates `inner` for the provider described by `descriptor`.
	pub fn for_provider(
		inner: S,
		token_source: Arc<dyn TokenSource>,
		descriptor: &ProviderDescriptor,
	) -> Self {
		Self::new(inner, token_source, descriptor.base_url.clone()).with_provider(descriptor.id)
	}

	/// Names the provider in the fallback envelope failure message.
	pub fn with_provider(mut self, provider: Provider) -> Self {
		self.provider_label = provider.display_name();

		self
	}

	/// Wrapped strategy.
	pub fn inner(&self) -> &S {
		&self.inner
	}

	/// Base URL prefixed to the inner URL.
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	fn check_envelope(&self, response: &S::Response) -> Result<()> {
		let envelope = Envelope::inspect(response);

		if envelope.is_success() {
			return Ok(());
		}

		tracing::debug!(
			status_code = envelope.status_code.as_deref(),
			provider = self.provider_label,
			"Provider envelope reported a failure."
		);

		Err(Error::envelope(
			envelope
				.status_message
				.unwrap_or_else(|| format!("Unknown error from {}", self.provider_label)),
		))
	}
}
impl<S> RequestStrategy for DecoratedStrategy<S>
where
	S: RequestStrategy,
{
	type Request = S::Request;
	type Response = S::Response;

	fn url(&self) -> Result<String> {
		let url = format!("{}{}", self.base_url, self.inner.url()?);

		tracing::debug!(%url, "Resolved decorated URL.");

		Ok(url)
	}

	fn method(&self) -> Result<Method> {
		self.inner.method()
	}

	fn build_request(&self) -> StrategyFuture<'_, OutboundRequest<Self::Request>> {
		Box::pin(async move {
			let OutboundRequest { mut headers, body } = self.inner.build_request().await?;
			let token = self
				.token_source
				.token()
				.await?
				.filter(|token| !token.is_blank())
				.ok_or_else(|| Error::token_acquisition("Token source returned no token."))?;

			headers.insert(AUTHORIZATION, http::bearer_auth(token.expose())?);

			Ok(OutboundRequest { headers, body })
		})
	}

	fn response_type(&self) -> Result<ResponseType<Self::Response>> {
		self.inner.response_type()
	}

	fn process_result(&self, response: &Self::Response) -> Result<()> {
		self.check_envelope(response)?;
		self.inner.process_result(response)
	}
}
impl<S> Debug for DecoratedStrategy<S>
where
	S: Debug,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("DecoratedStrategy")
			.field("inner", &self.inner)
			.field("base_url", &self.base_url)
			.field("provider", &self.provider_label)
			.finish_non_exhaustive()
	}
}
