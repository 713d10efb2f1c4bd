//! Immutable provider → token source lookup built once at startup.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	provider::Provider,
	token::{ProviderXTokenSource, TokenSource},
};

/// Read-only mapping from [`Provider`] to its [`TokenSource`].
///
/// The registry is assembled through [`TokenSourceRegistryBuilder`] and never mutated
/// afterward, so it can be shared behind an `Arc` without further synchronization.
#[derive(Clone)]
pub struct TokenSourceRegistry {
	sources: BTreeMap<Provider, Arc<dyn TokenSource>>,
}
impl TokenSourceRegistry {
	/// Starts an empty registry builder.
	pub fn builder() -> TokenSourceRegistryBuilder {
		TokenSourceRegistryBuilder::default()
	}

	/// Registry holding the built-in source for every known provider.
	pub fn with_defaults() -> Self {
		Self::builder().register(Provider::ProviderX, ProviderXTokenSource).build()
	}

	/// Looks up the source registered for `provider`.
	pub fn get(&self, provider: Provider) -> Option<Arc<dyn TokenSource>> {
		tracing::debug!(provider = provider.as_str(), "Fetching token source.");

		self.sources.get(&provider).cloned()
	}

	/// Like [`TokenSourceRegistry::get`] but reports a missing registration as a config error.
	pub fn require(&self, provider: Provider) -> Result<Arc<dyn TokenSource>> {
		self.get(provider)
			.ok_or_else(|| ConfigError::UnregisteredProvider { provider: provider.as_str() }.into())
	}

	/// Providers with a registered source, in declaration order.
	pub fn providers(&self) -> impl Iterator<Item = Provider> + '_ {
		self.sources.keys().copied()
	}
}
impl Debug for TokenSourceRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenSourceRegistry")
			.field("providers", &self.sources.keys().collect::<Vec<_>>())
			.finish()
	}
}

/// Builder for [`TokenSourceRegistry`] values.
#[derive(Default)]
pub struct TokenSourceRegistryBuilder {
	sources: BTreeMap<Provider, Arc<dyn TokenSource>>,
}
impl TokenSourceRegistryBuilder {
	/// Registers (or replaces) the source for `provider`.
	pub fn register(mut self, provider: Provider, source: impl TokenSource + 'static) -> Self {
		self.sources.insert(provider, Arc::new(source));

		self
	}

	/// Freezes the registry.
	pub fn build(self) -> TokenSourceRegistry {
		let providers = self.sources.keys().copied().collect::<Vec<_>>();

		tracing::info!(?providers, "Token source registry initialized.");

		TokenSourceRegistry { sources: self.sources }
	}
}
impl Debug for TokenSourceRegistryBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenSourceRegistryBuilder")
			.field("providers", &self.sources.keys().collect::<Vec<_>>())
			.finish()
	}
}
