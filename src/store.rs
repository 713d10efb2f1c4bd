//! Storage contracts and built-in store implementations for audit records.

pub mod file;
pub mod memory;

pub use file::FileAuditStore;
pub use memory::MemoryAuditStore;

// self
use crate::{
	_prelude::*,
	audit::{AuditId, AuditRecord},
};

/// Boxed future returned by every [`AuditStore`] operation.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by audit trail stores.
///
/// Implementations must tolerate concurrent use: one store is shared by every in-flight call.
/// The executor only ever calls [`AuditStore::save`]; the remaining operations serve
/// administrative tooling.
pub trait AuditStore
where
	Self: Send + Sync,
{
	/// Persists a record, assigning an identifier when it has none, and returns the stored copy.
	fn save(&self, record: AuditRecord) -> StoreFuture<'_, AuditRecord>;

	/// Fetches a record by identifier.
	fn find_by_id(&self, id: AuditId) -> StoreFuture<'_, Option<AuditRecord>>;

	/// Fetches the most recent record carrying the correlation id.
	fn find_by_correlation_id<'a>(
		&'a self,
		correlation_id: &'a str,
	) -> StoreFuture<'a, Option<AuditRecord>>;

	/// Lists every record in identifier order.
	fn find_all(&self) -> StoreFuture<'_, Vec<AuditRecord>>;

	/// Replaces an existing record; fails when the id is missing or unknown.
	fn update(&self, record: AuditRecord) -> StoreFuture<'_, AuditRecord>;

	/// Deletes a record; unknown identifiers are ignored.
	fn delete_by_id(&self, id: AuditId) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`AuditStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// An update was requested for a record without an identifier.
	#[error("Invalid ID or record not found: the record has no identifier.")]
	MissingId,
	/// An update was requested for an identifier the store does not know.
	#[error("Invalid ID or record not found: {id}.")]
	NotFound {
		/// Unknown identifier.
		id: AuditId,
	},
}

/// Identifier-ordered table shared by the built-in stores.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub(crate) struct AuditTable {
	next_id: AuditId,
	records: BTreeMap<AuditId, AuditRecord>,
}
impl AuditTable {
	pub(crate) fn save(&mut self, mut record: AuditRecord, now: OffsetDateTime) -> AuditRecord {
		let id = match record.id {
			Some(id) => id,
			None => {
				self.next_id += 1;

				self.next_id
			},
		};

		self.next_id = self.next_id.max(id);

		let created_at = self.records.get(&id).and_then(|existing| existing.created_at);

		record.id = Some(id);
		record.created_at = created_at.or(record.created_at).or(Some(now));
		record.updated_at = Some(now);

		self.records.insert(id, record.clone());

		record
	}

	pub(crate) fn update(
		&mut self,
		mut record: AuditRecord,
		now: OffsetDateTime,
	) -> Result<AuditRecord, StoreError> {
		let id = record.id.ok_or(StoreError::MissingId)?;
		let existing = self.records.get(&id).ok_or(StoreError::NotFound { id })?;

		record.created_at = existing.created_at;
		record.created_by = existing.created_by.clone();
		record.updated_at = Some(now);

		self.records.insert(id, record.clone());

		Ok(record)
	}

	pub(crate) fn find_by_id(&self, id: AuditId) -> Option<AuditRecord> {
		self.records.get(&id).cloned()
	}

	pub(crate) fn find_by_correlation_id(&self, correlation_id: &str) -> Option<AuditRecord> {
		self.records
			.values()
			.rev()
			.find(|record| record.correlation_id.as_ref() == correlation_id)
			.cloned()
	}

	pub(crate) fn len(&self) -> usize {
		self.records.len()
	}

	pub(crate) fn find_all(&self) -> Vec<AuditRecord> {
		self.records.values().cloned().collect()
	}

	pub(crate) fn delete(&mut self, id: AuditId) -> bool {
		self.records.remove(&id).is_some()
	}
}
