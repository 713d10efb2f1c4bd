//! Token source for Provider X.

// self
use crate::token::{TokenFuture, TokenSource};

/// Token source for Provider X.
///
/// Provider X has no credential endpoint wired up yet, so the source yields no token and the
/// decorated call fails with a token acquisition error.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProviderXTokenSource;
impl TokenSource for ProviderXTokenSource {
	fn token(&self) -> TokenFuture<'_> {
		Box::pin(async {
			tracing::warn!("Token retrieval is not implemented for Provider X.");

			Ok(None)
		})
	}
}
