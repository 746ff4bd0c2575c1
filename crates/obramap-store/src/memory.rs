//! In-memory storage implementation for development and testing.
//!
//! Uses `RwLock::unwrap()` intentionally. Lock poisoning only occurs when
//! another thread panicked while holding the lock, which is an
//! unrecoverable state. For production workloads, use the PostgreSQL
//! backend.

use async_trait::async_trait;
use obramap_core::error::Result;
use obramap_core::models::Obra;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ports::ObraStore;

/// In-memory implementation of [`ObraStore`].
///
/// Keeps an insertion-order index next to the row map so `list_obras`
/// returns the stable ingestion order the proximity engine relies on.
#[derive(Debug, Clone, Default)]
pub struct MemoryObraStore {
    rows: Arc<RwLock<HashMap<String, Obra>>>,
    order: Arc<RwLock<Vec<String>>>,
}

impl MemoryObraStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObraStore for MemoryObraStore {
    async fn upsert_obras(&self, obras: &[Obra]) -> Result<u64> {
        let mut rows = self.rows.write().unwrap();
        let mut order = self.order.write().unwrap();

        for obra in obras {
            if rows.insert(obra.id_unico.clone(), obra.clone()).is_none() {
                order.push(obra.id_unico.clone());
            }
        }

        Ok(obras.len() as u64)
    }

    async fn list_obras(&self) -> Result<Vec<Obra>> {
        let rows = self.rows.read().unwrap();
        let order = self.order.read().unwrap();
        Ok(order.iter().filter_map(|id| rows.get(id).cloned()).collect())
    }

    async fn get_obra(&self, id_unico: &str) -> Result<Option<Obra>> {
        let rows = self.rows.read().unwrap();
        Ok(rows.get(id_unico).cloned())
    }

    async fn count(&self) -> Result<u64> {
        let rows = self.rows.read().unwrap();
        Ok(rows.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obra(id: &str, nome: &str) -> Obra {
        let mut obra = Obra::with_id(id);
        obra.nome = Some(nome.to_string());
        obra
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let store = MemoryObraStore::new();
        let batch = vec![obra("A", "Escola")];

        store.upsert_obras(&batch).await.unwrap();
        store.upsert_obras(&batch).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        let stored = store.get_obra("A").await.unwrap().unwrap();
        assert_eq!(stored.nome.as_deref(), Some("Escola"));
    }

    #[tokio::test]
    async fn test_reingest_overwrites_fields() {
        let store = MemoryObraStore::new();
        store.upsert_obras(&[obra("A", "Escola")]).await.unwrap();
        store.upsert_obras(&[obra("A", "Escola Municipal")]).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        let stored = store.get_obra("A").await.unwrap().unwrap();
        assert_eq!(stored.nome.as_deref(), Some("Escola Municipal"));
    }

    #[tokio::test]
    async fn test_list_preserves_ingestion_order() {
        let store = MemoryObraStore::new();
        store.upsert_obras(&[obra("B", "b"), obra("A", "a")]).await.unwrap();
        store.upsert_obras(&[obra("C", "c"), obra("A", "a2")]).await.unwrap();

        let ids: Vec<String> =
            store.list_obras().await.unwrap().into_iter().map(|o| o.id_unico).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryObraStore::new();
        assert!(store.get_obra("missing").await.unwrap().is_none());
    }
}
