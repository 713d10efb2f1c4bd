//! Audit trail model: one [`AuditRecord`] per executed call, its identifiers, the sanitizer that
//! masks sensitive values before they are recorded, and the in-flight [`AuditDraft`].

mod draft;
mod id;
mod sanitize;

pub use draft::*;
pub use id::*;
pub use sanitize::*;

// self
use crate::_prelude::*;

/// Final outcome recorded for a call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
	/// The call completed and every validation passed.
	Success,
	/// The call failed at some stage.
	#[default]
	Failed,
}
impl AuditStatus {
	/// Returns the persisted label.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuditStatus::Success => "SUCCESS",
			AuditStatus::Failed => "FAILED",
		}
	}
}
impl Display for AuditStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Persisted entry describing one outbound call.
///
/// Request and response payloads are stored as sanitized JSON text. Fields that a failed call
/// never reached (for example the response of a call aborted before transport) stay `None`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
	/// Store-assigned identifier; `None` until the record is saved.
	pub id: Option<AuditId>,
	/// Identifier correlating the call across logs and spans.
	pub correlation_id: CorrelationId,
	/// Instant the call started.
	pub timestamp: OffsetDateTime,
	/// Upper-case HTTP method, once resolved.
	pub method: Option<String>,
	/// Target URL as declared by the strategy, once resolved.
	pub url: Option<String>,
	/// Sanitized request headers (JSON text).
	pub request_headers: Option<String>,
	/// Sanitized request body (JSON text).
	pub request_body: Option<String>,
	/// HTTP status returned by the provider.
	pub response_status: Option<u16>,
	/// Sanitized response body.
	pub response_body: Option<String>,
	/// Sanitized response headers (JSON text).
	pub response_headers: Option<String>,
	/// Wall-clock duration of the call in milliseconds.
	pub duration_ms: u64,
	/// Final outcome.
	pub status: AuditStatus,
	/// Failure message when `status` is [`AuditStatus::Failed`].
	pub error_message: Option<String>,
	/// Actor that created the record.
	pub created_by: Option<String>,
	/// Creation instant, stamped by the store.
	pub created_at: Option<OffsetDateTime>,
	/// Actor that last modified the record.
	pub updated_by: Option<String>,
	/// Last modification instant, stamped by the store.
	pub updated_at: Option<OffsetDateTime>,
}
impl AuditRecord {
	/// Creates an empty record for a call starting at `timestamp`.
	pub fn new(correlation_id: CorrelationId, timestamp: OffsetDateTime) -> Self {
		Self {
			id: None,
			correlation_id,
			timestamp,
			method: None,
			url: None,
			request_headers: None,
			request_body: None,
			response_status: None,
			response_body: None,
			response_headers: None,
			duration_ms: 0,
			status: AuditStatus::default(),
			error_message: None,
			created_by: None,
			created_at: None,
			updated_by: None,
			updated_at: None,
		}
	}

	/// Returns `true` if the recorded call succeeded.
	pub fn is_success(&self) -> bool {
		matches!(self.status, AuditStatus::Success)
	}
}
