//! Provider descriptor data structures shared by gateways and decorators.

/// Builder API for assembling provider descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, provider::Provider};

/// Immutable provider descriptor consumed by gateways.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Descriptor identifier.
	pub id: Provider,
	/// Prefix prepended verbatim to every strategy path.
	pub base_url: String,
}
impl ProviderDescriptor {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: Provider) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}

	/// Descriptor pointing at the provider's default base URL.
	pub fn with_default_base_url(id: Provider) -> Self {
		Self { id, base_url: id.default_base_url().to_owned() }
	}
}
