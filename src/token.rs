//! Bearer credential sources consumed by decorated strategies.
//!
//! A [`TokenSource`] hands out the credential for one provider. Acquisition, caching, and
//! refresh are each implementation's concern; the pipeline only asks for a token once per call
//! and never retries. Sources are registered per [`Provider`](crate::provider::Provider) in an
//! immutable [`TokenSourceRegistry`] built at startup.

pub mod provider_x;
pub mod registry;
pub mod secret;

pub use provider_x::*;
pub use registry::*;
pub use secret::*;

// self
use crate::_prelude::*;

/// Boxed future returned by [`TokenSource::token`].
pub type TokenFuture<'a> =
	Pin<Box<dyn Future<Output = Result<Option<TokenSecret>, TokenSourceError>> + 'a + Send>>;

/// Capability that supplies a bearer credential for a provider.
///
/// Implementations must be safe to call concurrently. Resolving to `Ok(None)` means the source
/// had nothing to offer; callers treat that exactly like a failed acquisition rather than as an
/// empty credential.
pub trait TokenSource
where
	Self: Send + Sync,
{
	/// Retrieves the current credential.
	fn token(&self) -> TokenFuture<'_>;
}

/// Failure reported by a [`TokenSource`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{message}")]
pub struct TokenSourceError {
	/// Human-readable reason.
	pub message: String,
}
impl TokenSourceError {
	/// Creates a new error from any reason.
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}
}
impl From<TokenSourceError> for Error {
	fn from(e: TokenSourceError) -> Self {
		Error::token_acquisition(e.message)
	}
}

/// Token source that always returns the same pre-provisioned credential.
///
/// Useful for long-lived API keys and tests.
#[derive(Clone, Debug)]
pub struct StaticTokenSource(TokenSecret);
impl StaticTokenSource {
	/// Wraps a fixed credential.
	pub fn new(token: impl Into<String>) -> Self {
		Self(TokenSecret::new(token))
	}
}
impl TokenSource for StaticTokenSource {
	fn token(&self) -> TokenFuture<'_> {
		let secret = self.0.clone();

		Box::pin(async move { Ok(Some(secret)) })
	}
}
