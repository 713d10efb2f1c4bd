// std
use std::time::Instant;
// self
use crate::{
	_prelude::*,
	audit::{AuditRecord, AuditStatus, CorrelationId},
	http::Method,
};

/// In-flight accumulator for the audit record of a single call.
///
/// The executor fills the draft as the call progresses and consumes it exactly once through
/// [`AuditDraft::finish`], which stamps the elapsed duration and the final outcome. The first
/// recorded failure message wins, so a stage can record a detailed message before surfacing a
/// more generic error to the caller.
#[derive(Debug)]
pub struct AuditDraft {
	record: AuditRecord,
	started: Instant,
	failure: Option<String>,
}
impl AuditDraft {
	/// Opens a draft stamped with the call start instant.
	pub fn begin(correlation_id: CorrelationId, timestamp: OffsetDateTime) -> Self {
		Self {
			record: AuditRecord::new(correlation_id, timestamp),
			started: Instant::now(),
			failure: None,
		}
	}

	/// Records the resolved HTTP method.
	pub fn method(&mut self, method: &Method) -> &mut Self {
		self.record.method = Some(method.as_str().to_owned());

		self
	}

	/// Method recorded so far, if it was resolved.
	pub fn recorded_method(&self) -> Option<&str> {
		self.record.method.as_deref()
	}

	/// Records the resolved URL.
	pub fn url(&mut self, url: impl Into<String>) -> &mut Self {
		self.record.url = Some(url.into());

		self
	}

	/// Records the sanitized request headers and body as JSON text.
	pub fn request(&mut self, headers: String, body: String) -> &mut Self {
		self.record.request_headers = Some(headers);
		self.record.request_body = Some(body);

		self
	}

	/// Records the response status alongside its sanitized headers and body.
	pub fn response(&mut self, status: u16, headers: String, body: String) -> &mut Self {
		self.record.response_status = Some(status);
		self.record.response_headers = Some(headers);
		self.record.response_body = Some(body);

		self
	}

	/// Records the actor stamped into the creation/modification metadata.
	pub fn auditor(&mut self, auditor: Option<&str>) -> &mut Self {
		self.record.created_by = auditor.map(ToOwned::to_owned);
		self.record.updated_by = auditor.map(ToOwned::to_owned);

		self
	}

	/// Records a failure message unless an earlier stage already recorded one.
	pub fn fail(&mut self, message: impl Into<String>) -> &mut Self {
		if self.failure.is_none() {
			let message = message.into();

			// An empty message would make a failed record indistinguishable from a silent one.
			self.failure =
				Some(if message.is_empty() { "Unknown error.".into() } else { message });
		}

		self
	}

	/// Finalizes the record with the elapsed duration and outcome.
	pub fn finish(self) -> AuditRecord {
		let Self { mut record, started, failure } = self;

		record.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

		match failure {
			Some(message) => {
				record.status = AuditStatus::Failed;
				record.error_message = Some(message);
			},
			None => {
				record.status = AuditStatus::Success;
				record.error_message = None;
			},
		}

		record
	}
}
