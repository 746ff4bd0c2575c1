//! The page-loop ingestion pipeline.

use crate::client::PageSource;
use crate::transform::obra_from_projeto;
use obramap_core::error::Result;
use obramap_core::models::Obra;
use obramap_store::ObraStore;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Outcome of one ingestion pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub pages_fetched: u32,
    pub pages_skipped: u32,
    pub obras_upserted: u64,
}

/// Sequential, one-shot ingestion over a bounded page range.
pub struct IngestPipeline<S> {
    source: S,
    store: Arc<dyn ObraStore>,
}

impl<S: PageSource> IngestPipeline<S> {
    pub fn new(source: S, store: Arc<dyn ObraStore>) -> Self {
        Self { source, store }
    }

    /// Fetch pages `min_pages..=max_pages`, transform their records, and
    /// upsert the surviving batch in one call.
    ///
    /// A failed fetch or a page without a `content` array is logged and
    /// skipped (no retry, no backoff) and the loop proceeds. Records
    /// are de-duplicated by `id_unico` before the upsert, last occurrence
    /// winning, so a single pass is idempotent with respect to repeated
    /// upstream rows. A storage failure aborts the pass: the batch is
    /// all-or-nothing.
    pub async fn run(&self, min_pages: u32, max_pages: u32) -> Result<IngestSummary> {
        tracing::info!(min_pages, max_pages, "Starting ingestion pass");

        let mut batch: Vec<Obra> = Vec::new();
        let mut position: HashMap<String, usize> = HashMap::new();
        let mut pages_fetched = 0u32;
        let mut pages_skipped = 0u32;

        for page in min_pages..=max_pages {
            let fetched = match self.source.fetch_page(page).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    tracing::warn!(page, error = %e, "Skipping page: fetch failed");
                    pages_skipped += 1;
                    continue;
                }
            };

            let Some(content) = fetched.content else {
                tracing::warn!(page, "Skipping page: 'content' is missing");
                pages_skipped += 1;
                continue;
            };

            pages_fetched += 1;

            for projeto in &content {
                let obra = obra_from_projeto(projeto);
                match position.get(&obra.id_unico) {
                    Some(&index) => batch[index] = obra,
                    None => {
                        position.insert(obra.id_unico.clone(), batch.len());
                        batch.push(obra);
                    }
                }
            }
        }

        if batch.is_empty() {
            tracing::info!("No new data to upsert");
            return Ok(IngestSummary { pages_fetched, pages_skipped, obras_upserted: 0 });
        }

        tracing::info!(rows = batch.len(), "Upserting ingestion batch");
        let obras_upserted = self.store.upsert_obras(&batch).await?;

        Ok(IngestSummary { pages_fetched, pages_skipped, obras_upserted })
    }
}
