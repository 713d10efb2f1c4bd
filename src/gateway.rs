//! Provider-bound entry point that decorates strategies before executing them.

// self
use crate::{
	_prelude::*,
	executor::Executor,
	http::HttpTransport,
	provider::{Provider, ProviderDescriptor},
	strategy::{DecoratedStrategy, RequestStrategy},
	token::{TokenSource, TokenSourceRegistry},
};

/// Executes strategies against one provider.
///
/// Every call looks up the provider's [`TokenSource`] in the shared registry, wraps the
/// strategy in a [`DecoratedStrategy`] carrying the descriptor's base URL, and runs it through
/// the shared [`Executor`].
pub struct ProviderGateway<C>
where
	C: ?Sized + HttpTransport,
{
	/// Executor shared with other gateways.
	pub executor: Arc<Executor<C>>,
	/// Token sources keyed by provider.
	pub registry: Arc<TokenSourceRegistry>,
	/// Provider identity and base URL.
	pub descriptor: ProviderDescriptor,
}
impl<C> ProviderGateway<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a gateway for the provider described by `descriptor`.
	pub fn new(
		executor: Arc<Executor<C>>,
		registry: Arc<TokenSourceRegistry>,
		descriptor: ProviderDescriptor,
	) -> Self {
		Self { executor, registry, descriptor }
	}

	/// Provider served by this gateway.
	pub fn provider(&self) -> Provider {
		self.descriptor.id
	}

	/// Wraps `strategy` for this provider without executing it.
	///
	/// Fails with a configuration error when no token source is registered for the provider.
	pub fn decorate<S>(&self, strategy: S) -> Result<DecoratedStrategy<S>>
	where
		S: RequestStrategy,
	{
		let token_source: Arc<dyn TokenSource> = self.registry.require(self.descriptor.id)?;

		Ok(DecoratedStrategy::for_provider(strategy, token_source, &self.descriptor))
	}

	/// Decorates and executes `strategy`.
	///
	/// A missing token source is reported before the call starts, so no audit record is written
	/// for it.
	pub async fn execute<S>(&self, strategy: S) -> Result<S::Response>
	where
		S: RequestStrategy,
	{
		let decorated = self.decorate(strategy)?;

		tracing::debug!(provider = %self.descriptor.id, "Executing provider call.");

		self.executor.execute(&decorated).await
	}
}
impl<C> Clone for ProviderGateway<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			executor: self.executor.clone(),
			registry: self.registry.clone(),
			descriptor: self.descriptor.clone(),
		}
	}
}
impl<C> Debug for ProviderGateway<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderGateway")
			.field("descriptor", &self.descriptor)
			.field("registry", &self.registry)
			.finish_non_exhaustive()
	}
}
