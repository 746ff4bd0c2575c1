//! Pipeline behavior against a scripted page source: failed pages are
//! skipped, later pages still land, and re-running the pass is idempotent.

use async_trait::async_trait;
use obramap_core::error::{ObramapError, Result};
use obramap_ingest::client::{PageSource, ProjetoInvestimentoPage};
use obramap_ingest::IngestPipeline;
use obramap_store::{MemoryObraStore, ObraStore};
use std::sync::Arc;

/// Maps page numbers to canned JSON bodies; unlisted pages answer 500.
struct ScriptedPages {
    pages: Vec<(u32, serde_json::Value)>,
}

#[async_trait]
impl PageSource for ScriptedPages {
    async fn fetch_page(&self, page: u32) -> Result<ProjetoInvestimentoPage> {
        match self.pages.iter().find(|(n, _)| *n == page) {
            Some((_, body)) => serde_json::from_value(body.clone())
                .map_err(|e| ObramapError::UpstreamShape { reason: e.to_string() }),
            None => Err(ObramapError::UpstreamStatus { status: 500, page }),
        }
    }
}

fn page_with_ids(ids: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "content": ids.iter().map(|id| serde_json::json!({ "idUnico": id })).collect::<Vec<_>>()
    })
}

#[tokio::test]
async fn failed_page_is_skipped_and_later_pages_ingest() {
    // Page 2 answers 500; pages 1 and 3 succeed.
    let source = ScriptedPages {
        pages: vec![(1, page_with_ids(&["A", "B"])), (3, page_with_ids(&["C"]))],
    };
    let store = Arc::new(MemoryObraStore::new());
    let pipeline = IngestPipeline::new(source, store.clone());

    let summary = pipeline.run(1, 3).await.unwrap();

    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.pages_skipped, 1);
    assert_eq!(summary.obras_upserted, 3);
    assert_eq!(store.count().await.unwrap(), 3);
    assert!(store.get_obra("C").await.unwrap().is_some());
}

#[tokio::test]
async fn page_without_content_is_skipped() {
    let source = ScriptedPages {
        pages: vec![
            (1, serde_json::json!({ "totalPages": 7 })),
            (2, page_with_ids(&["A"])),
        ],
    };
    let store = Arc::new(MemoryObraStore::new());
    let pipeline = IngestPipeline::new(source, store.clone());

    let summary = pipeline.run(1, 2).await.unwrap();

    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(summary.pages_skipped, 1);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn duplicate_ids_within_a_pass_are_deduplicated() {
    // The same identifier appears on both pages; one row results.
    let source = ScriptedPages {
        pages: vec![(1, page_with_ids(&["A", "B"])), (2, page_with_ids(&["A"]))],
    };
    let store = Arc::new(MemoryObraStore::new());
    let pipeline = IngestPipeline::new(source, store.clone());

    let summary = pipeline.run(1, 2).await.unwrap();

    assert_eq!(summary.obras_upserted, 2);
    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn rerunning_the_pass_is_idempotent() {
    let source = ScriptedPages { pages: vec![(1, page_with_ids(&["A", "B"]))] };
    let store = Arc::new(MemoryObraStore::new());
    let pipeline = IngestPipeline::new(source, store.clone());

    pipeline.run(1, 1).await.unwrap();
    pipeline.run(1, 1).await.unwrap();

    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn all_pages_failing_upserts_nothing() {
    let source = ScriptedPages { pages: vec![] };
    let store = Arc::new(MemoryObraStore::new());
    let pipeline = IngestPipeline::new(source, store.clone());

    let summary = pipeline.run(1, 5).await.unwrap();

    assert_eq!(summary.pages_fetched, 0);
    assert_eq!(summary.pages_skipped, 5);
    assert_eq!(summary.obras_upserted, 0);
    assert_eq!(store.count().await.unwrap(), 0);
}
