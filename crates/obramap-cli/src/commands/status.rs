use crate::cli::StorageBackend;
use anyhow::Result;
use obramap_store::ObraStore;
use std::sync::Arc;

pub async fn run(backend: &StorageBackend, store: Arc<dyn ObraStore>, json: bool) -> Result<()> {
    let count = store.count().await?;
    let backend_name = match backend {
        StorageBackend::Memory => "memory",
        StorageBackend::Postgres => "postgres",
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "backend": backend_name,
                "obras": count,
            }))?
        );
    } else {
        println!("Backend: {}", backend_name);
        println!("Stored obras: {}", count);
    }

    Ok(())
}
