use async_trait::async_trait;
use obramap_core::error::Result;
use obramap_core::models::Obra;

/// Port for obra row storage.
#[async_trait]
pub trait ObraStore: Send + Sync {
    /// Insert-or-update a batch keyed by `id_unico`. Idempotent: the same
    /// batch applied twice leaves the store unchanged. All-or-nothing;
    /// a failure means no partial-success reporting. Returns the number
    /// of rows written.
    async fn upsert_obras(&self, obras: &[Obra]) -> Result<u64>;

    /// All stored obras in stable ingestion order.
    async fn list_obras(&self) -> Result<Vec<Obra>>;

    /// Look up one obra by its unique identifier.
    async fn get_obra(&self, id_unico: &str) -> Result<Option<Obra>>;

    /// Number of stored rows.
    async fn count(&self) -> Result<u64>;
}
