//! Pipeline-level error types shared across strategies, executors, and audit stores.

// self
use crate::{_prelude::*, http};

/// Pipeline-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical pipeline error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Strategy could not resolve its URL, method, or request entity.
	#[error("{message}")]
	StrategyResolution {
		/// Strategy-supplied reason.
		message: String,
	},
	/// Token source failed or produced no credential.
	#[error("{message}")]
	TokenAcquisition {
		/// Token-source-supplied reason.
		message: String,
	},
	/// Transport failure (DNS, TCP, TLS, unexpected HTTP status).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be mapped onto the declared response type.
	///
	/// The underlying decoding failure is recorded on the audit record only.
	#[error("Failed to map response to target type.")]
	Deserialization,
	/// Provider status envelope reported a failure.
	#[error("{message}")]
	Envelope {
		/// Provider-supplied status message, or a fallback.
		message: String,
	},
	/// Strategy post-processing rejected the response.
	#[error("{message}")]
	Validation {
		/// Strategy-supplied reason.
		message: String,
	},

	/// Audit storage failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}
impl Error {
	/// Builds a [`Error::StrategyResolution`] from any displayable reason.
	pub fn strategy_resolution(message: impl Into<String>) -> Self {
		Self::StrategyResolution { message: message.into() }
	}

	/// Builds a [`Error::TokenAcquisition`] from any displayable reason.
	pub fn token_acquisition(message: impl Into<String>) -> Self {
		Self::TokenAcquisition { message: message.into() }
	}

	/// Builds a [`Error::Envelope`] from a provider status message.
	pub fn envelope(message: impl Into<String>) -> Self {
		Self::Envelope { message: message.into() }
	}

	/// Builds a [`Error::Validation`] from a strategy-specific reason.
	pub fn validation(message: impl Into<String>) -> Self {
		Self::Validation { message: message.into() }
	}

	/// Classifies the error into the pipeline taxonomy.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::StrategyResolution { .. } => ErrorKind::StrategyResolution,
			Self::TokenAcquisition { .. } => ErrorKind::TokenAcquisition,
			Self::Transport(_) => ErrorKind::Transport,
			Self::Deserialization => ErrorKind::Deserialization,
			Self::Envelope { .. } => ErrorKind::Envelope,
			Self::Validation { .. } => ErrorKind::Validation,
			Self::Storage(_) => ErrorKind::Storage,
			Self::Config(_) => ErrorKind::Config,
		}
	}
}

/// Stable error categories recorded by the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// URL, method, or request entity resolution failed; no network call was attempted.
	StrategyResolution,
	/// Token source failed; the call was aborted before transport.
	TokenAcquisition,
	/// Network call failed.
	Transport,
	/// Response could not be converted to the declared type.
	Deserialization,
	/// Provider status envelope signalled a failure.
	Envelope,
	/// Strategy-specific validation rejected the response.
	Validation,
	/// Audit store failure.
	Storage,
	/// Local configuration failure.
	Config,
}
impl ErrorKind {
	/// Returns a stable label suitable for logs and audit records.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::StrategyResolution => "STRATEGY_RESOLUTION_ERROR",
			ErrorKind::TokenAcquisition => "TOKEN_ACQUISITION_ERROR",
			ErrorKind::Transport => "TRANSPORT_ERROR",
			ErrorKind::Deserialization => "DESERIALIZATION_ERROR",
			ErrorKind::Envelope => "ENVELOPE_ERROR",
			ErrorKind::Validation => "VALIDATION_ERROR",
			ErrorKind::Storage => "STORAGE_ERROR",
			ErrorKind::Config => "CONFIG_ERROR",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Configuration and validation failures raised by the pipeline.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Provider descriptor failed validation.
	#[error(transparent)]
	InvalidDescriptor(#[from] crate::provider::ProviderDescriptorError),
	/// No token source was registered for the provider.
	#[error("No token source is registered for provider `{provider}`.")]
	UnregisteredProvider {
		/// Provider label.
		provider: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, HTTP status).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {url}: {detail}.")]
	Network {
		/// Target URL of the failed call, without its query string.
		url: String,
		/// Rendered cause chain of `source`.
		detail: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Call exceeded the timeout configured on the HTTP client.
	#[error("Request to {url} timed out.")]
	Timeout {
		/// Target URL of the failed call, without its query string.
		url: String,
	},
	/// Outbound request could not be constructed (malformed URL, invalid header).
	#[error("Request to {url} could not be built: {message}.")]
	InvalidRequest {
		/// Target URL of the failed call, without its query string.
		url: String,
		/// Builder-supplied reason.
		message: String,
	},
	/// Provider answered with a status outside the 2xx range.
	#[error("Provider responded with HTTP {status}.")]
	UnexpectedStatus {
		/// HTTP status code returned by the provider.
		status: u16,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during the outbound call.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	///
	/// The query string is dropped from `url` and the cause chain of `src` is rendered into
	/// the message.
	pub fn network(url: impl AsRef<str>, src: impl 'static + Send + Sync + StdError) -> Self {
		let detail = error_chain(&src);

		Self::Network {
			url: http::strip_query(url.as_ref()).to_owned(),
			detail,
			source: Box::new(src),
		}
	}

	/// Builds a [`TransportError::Timeout`] for `url`.
	pub fn timeout(url: impl AsRef<str>) -> Self {
		Self::Timeout { url: http::strip_query(url.as_ref()).to_owned() }
	}

	/// Builds a [`TransportError::InvalidRequest`] for `url`.
	pub fn invalid_request(url: impl AsRef<str>, message: impl Into<String>) -> Self {
		Self::InvalidRequest {
			url: http::strip_query(url.as_ref()).to_owned(),
			message: message.into(),
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		let url = e.url().map(ToString::to_string).unwrap_or_default();
		// Reqwest renders the full URL into its own message; `url` already carries it.
		let e = e.without_url();

		if e.is_timeout() {
			Self::timeout(url)
		} else if e.is_builder() {
			Self::invalid_request(url, error_chain(&e))
		} else {
			Self::network(url, e)
		}
	}
}

/// Joins an error and its sources into one line, skipping causes the parent already quotes.
fn error_chain(e: &(dyn StdError + 'static)) -> String {
	let mut text = e.to_string();
	let mut source = e.source();

	while let Some(cause) = source {
		let cause_text = cause.to_string();

		if !cause_text.is_empty() && !text.ends_with(&cause_text) {
			text.push_str(": ");
			text.push_str(&cause_text);
		}

		source = cause.source();
	}

	text
}
