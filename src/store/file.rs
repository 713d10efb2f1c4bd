//! Simple file-backed [`AuditStore`] for lightweight deployments.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	audit::{AuditId, AuditRecord},
	store::{AuditStore, AuditTable, StoreError, StoreFuture},
};

/// Persists audit records to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileAuditStore {
	path: PathBuf,
	inner: Arc<RwLock<AuditTable>>,
}
impl FileAuditStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the snapshot file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<AuditTable, StoreError> {
		if !path.exists() {
			return Ok(AuditTable::default());
		}

		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(AuditTable::default());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	/// Applies `mutate` to a copy of the table and swaps it in only once the copy is on disk.
	fn commit<T>(
		&self,
		mutate: impl FnOnce(&mut AuditTable) -> Result<T, StoreError>,
	) -> Result<T, StoreError> {
		let mut guard = self.inner.write();
		let mut next = guard.clone();
		let output = mutate(&mut next)?;

		self.persist_locked(&next)?;

		*guard = next;

		Ok(output)
	}

	fn persist_locked(&self, table: &AuditTable) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(table).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl AuditStore for FileAuditStore {
	fn save(&self, record: AuditRecord) -> StoreFuture<'_, AuditRecord> {
		Box::pin(async move {
			self.commit(|table| Ok(table.save(record, OffsetDateTime::now_utc())))
		})
	}

	fn find_by_id(&self, id: AuditId) -> StoreFuture<'_, Option<AuditRecord>> {
		Box::pin(async move { Ok(self.inner.read().find_by_id(id)) })
	}

	fn find_by_correlation_id<'a>(
		&'a self,
		correlation_id: &'a str,
	) -> StoreFuture<'a, Option<AuditRecord>> {
		Box::pin(async move { Ok(self.inner.read().find_by_correlation_id(correlation_id)) })
	}

	fn find_all(&self) -> StoreFuture<'_, Vec<AuditRecord>> {
		Box::pin(async move { Ok(self.inner.read().find_all()) })
	}

	fn update(&self, record: AuditRecord) -> StoreFuture<'_, AuditRecord> {
		Box::pin(async move {
			self.commit(|table| table.update(record, OffsetDateTime::now_utc()))
		})
	}

	fn delete_by_id(&self, id: AuditId) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let mut next = guard.clone();

			if next.delete(id) {
				self.persist_locked(&next)?;

				*guard = next;
			}

			Ok(())
		})
	}
}
