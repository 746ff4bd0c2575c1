use crate::cli::StorageBackend;
use anyhow::{Context, Result};
use obramap_store::{MemoryObraStore, ObraStore, PostgresObraStore};
use std::env;
use std::sync::Arc;

/// Resolve the storage backend selected on the command line.
///
/// A fresh in-memory store is empty per process, so `populate` + `list`
/// only compose in one invocation; persistent inspection needs postgres.
pub async fn resolve_store(backend: &StorageBackend) -> Result<Arc<dyn ObraStore>> {
    match backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryObraStore::new())),
        StorageBackend::Postgres => {
            let database_url = env::var("DATABASE_URL")
                .context("DATABASE_URL must be set for the postgres backend")?;
            let store = PostgresObraStore::with_schema(&database_url)
                .await
                .context("Failed to connect to PostgreSQL")?;
            Ok(Arc::new(store))
        }
    }
}
