//! Provider identities and descriptors.
//!
//! [`Provider`] names every third party the pipeline knows how to call, and
//! [`ProviderDescriptor`] binds one provider to the base URL its decorated strategies are
//! prefixed with.

pub mod descriptor;

pub use descriptor::*;

// self
use crate::_prelude::*;

/// Third-party providers known to the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
	/// Provider X account services.
	ProviderX,
}
impl Provider {
	/// Returns a stable label suitable for span fields and error messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			Provider::ProviderX => "provider_x",
		}
	}

	/// Human-readable provider name used in operator-facing messages.
	pub const fn display_name(self) -> &'static str {
		match self {
			Provider::ProviderX => "Provider X",
		}
	}

	/// Base URL used when no override is configured.
	pub const fn default_base_url(self) -> &'static str {
		match self {
			Provider::ProviderX => "www.providerx.com",
		}
	}
}
impl Display for Provider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
