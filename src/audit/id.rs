//! Identifiers attached to audit records.

// std
use std::{borrow::Borrow, ops::Deref};
// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::_prelude::*;

/// Store-assigned primary key of an [`AuditRecord`](crate::audit::AuditRecord).
pub type AuditId = u64;

const CORRELATION_ID_MAX_LEN: usize = 128;
const GENERATED_LEN: usize = 32;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("Correlation identifier cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("Correlation identifier contains whitespace.")]
	ContainsWhitespace,
	/// The identifier exceeded the allowed character count.
	#[error("Correlation identifier exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Identifier correlating one outbound call across logs, spans, and the audit trail.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CorrelationId(String);
impl CorrelationId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Generates a random alphanumeric identifier.
	pub fn generate() -> Self {
		Self(rand::rng().sample_iter(Alphanumeric).take(GENERATED_LEN).map(char::from).collect())
	}
}
impl Deref for CorrelationId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for CorrelationId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for CorrelationId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<CorrelationId> for String {
	fn from(value: CorrelationId) -> Self {
		value.0
	}
}
impl TryFrom<String> for CorrelationId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Debug for CorrelationId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Correlation({})", self.0)
	}
}
impl Display for CorrelationId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for CorrelationId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace);
	}
	if view.len() > CORRELATION_ID_MAX_LEN {
		return Err(IdentifierError::TooLong { max: CORRELATION_ID_MAX_LEN });
	}

	Ok(())
}
