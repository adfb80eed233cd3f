//! Record store selection.
//!
//! # Responsibility
//! - Describe which store backend a process runs with.
//! - Construct exactly one backend at start-up and hand it out as a shared
//!   trait object.

use crate::db::open_db;
use crate::repo::memory_store::MemoryRecordStore;
use crate::repo::sqlite_store::SqliteRecordStore;
use crate::repo::{RecordStore, RepoError, RepoResult};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

/// Default SQLite file name used when no path is configured.
pub const DEFAULT_DB_FILE_NAME: &str = "proserve.sqlite3";

/// Backend selection for the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Transient store; submissions are lost on restart.
    Memory,
    /// Durable store persisted in the given SQLite file.
    Sqlite { path: PathBuf },
}

impl StoreConfig {
    /// Short backend label used in log events.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite { .. } => "sqlite",
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from(DEFAULT_DB_FILE_NAME),
        }
    }
}

/// Opens the configured backend.
///
/// # Errors
/// - Returns `RepoError::Db` when the SQLite file cannot be opened or
///   migrated.
pub fn open_store(config: &StoreConfig) -> RepoResult<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match config {
        StoreConfig::Memory => Arc::new(MemoryRecordStore::new()),
        StoreConfig::Sqlite { path } => {
            if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|err| {
                    RepoError::Unavailable(format!(
                        "failed to create database directory `{}`: {err}",
                        parent.display()
                    ))
                })?;
            }
            Arc::new(SqliteRecordStore::try_new(open_db(path)?)?)
        }
    };

    info!(
        "event=store_open module=config status=ok backend={}",
        config.backend_name()
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::{open_store, StoreConfig};

    #[test]
    fn default_config_is_sqlite() {
        assert_eq!(StoreConfig::default().backend_name(), "sqlite");
    }

    #[test]
    fn memory_store_opens_empty() {
        let store = open_store(&StoreConfig::Memory).unwrap();
        assert!(store.list_inquiries().unwrap().is_empty());
    }

    #[test]
    fn sqlite_store_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.sqlite3");

        let store = open_store(&StoreConfig::Sqlite { path: path.clone() }).unwrap();
        assert!(store.list_service_requests().unwrap().is_empty());
        assert!(path.exists());
    }
}
