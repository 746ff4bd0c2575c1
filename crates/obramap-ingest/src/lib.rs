//! Obramap Ingest - fetches paginated project records from the obrasgov
//! API, decodes their geometry, and upserts them through the storage port.
//!
//! A batch, one-shot operation: a failed or malformed page is logged and
//! skipped, the loop continues, and the surviving records are written in a
//! single all-or-nothing upsert.

pub mod classify;
pub mod client;
pub mod pipeline;
pub mod transform;

pub use classify::{AssetClassifier, AssetKind, KeywordClassifier};
pub use client::{GovClient, PageSource, ProjetoInvestimento, ProjetoInvestimentoPage};
pub use pipeline::{IngestPipeline, IngestSummary};
pub use transform::obra_from_projeto;
