//! Thread-safe in-memory [`AuditStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	audit::{AuditId, AuditRecord},
	store::{AuditStore, AuditTable, StoreError, StoreFuture},
};

type StoreTable = Arc<RwLock<AuditTable>>;

/// Thread-safe storage backend that keeps audit records in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryAuditStore(StoreTable);
impl MemoryAuditStore {
	/// Number of stored records.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` if nothing has been stored yet.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Snapshot of every stored record in identifier order.
	pub fn records(&self) -> Vec<AuditRecord> {
		self.0.read().find_all()
	}

	fn update_now(table: StoreTable, record: AuditRecord) -> Result<AuditRecord, StoreError> {
		table.write().update(record, OffsetDateTime::now_utc())
	}
}
impl AuditStore for MemoryAuditStore {
	fn save(&self, record: AuditRecord) -> StoreFuture<'_, AuditRecord> {
		let table = self.0.clone();

		Box::pin(async move { Ok(table.write().save(record, OffsetDateTime::now_utc())) })
	}

	fn find_by_id(&self, id: AuditId) -> StoreFuture<'_, Option<AuditRecord>> {
		let table = self.0.clone();

		Box::pin(async move { Ok(table.read().find_by_id(id)) })
	}

	fn find_by_correlation_id<'a>(
		&'a self,
		correlation_id: &'a str,
	) -> StoreFuture<'a, Option<AuditRecord>> {
		let table = self.0.clone();

		Box::pin(async move { Ok(table.read().find_by_correlation_id(correlation_id)) })
	}

	fn find_all(&self) -> StoreFuture<'_, Vec<AuditRecord>> {
		let table = self.0.clone();

		Box::pin(async move { Ok(table.read().find_all()) })
	}

	fn update(&self, record: AuditRecord) -> StoreFuture<'_, AuditRecord> {
		let table = self.0.clone();

		Box::pin(async move { Self::update_now(table, record) })
	}

	fn delete_by_id(&self, id: AuditId) -> StoreFuture<'_, ()> {
		let table = self.0.clone();

		Box::pin(async move {
			table.write().delete(id);

			Ok(())
		})
	}
}
