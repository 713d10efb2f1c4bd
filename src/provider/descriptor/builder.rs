// self
use crate::{
	_prelude::*,
	provider::{Provider, ProviderDescriptor},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ProviderDescriptorError {
	/// Base URL must not be empty.
	#[error("Base URL for provider `{provider}` must not be empty.")]
	EmptyBaseUrl {
		/// Provider label.
		provider: String,
	},
	/// Base URL must not contain whitespace.
	#[error("Base URL for provider `{provider}` contains whitespace: {url}.")]
	InvalidBaseUrl {
		/// Provider label.
		provider: String,
		/// Base URL that failed validation.
		url: String,
	},
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Identifier for the descriptor being constructed.
	pub id: Provider,
	/// Optional base URL override; defaults to [`Provider::default_base_url`].
	pub base_url: Option<String>,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: Provider) -> Self {
		Self { id, base_url: None }
	}

	/// Overrides the base URL.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let base_url = self.base_url.unwrap_or_else(|| self.id.default_base_url().to_owned());
		let descriptor = ProviderDescriptor { id: self.id, base_url };

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		if self.base_url.is_empty() {
			return Err(ProviderDescriptorError::EmptyBaseUrl { provider: self.id.to_string() });
		}
		if self.base_url.chars().any(char::is_whitespace) {
			return Err(ProviderDescriptorError::InvalidBaseUrl {
				provider: self.id.to_string(),
				url: self.base_url.clone(),
			});
		}

		Ok(())
	}
}
