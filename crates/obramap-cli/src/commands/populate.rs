use crate::cli::PopulateArgs;
use anyhow::{bail, Result};
use obramap_core::config::LayeredConfig;
use obramap_ingest::{GovClient, IngestPipeline};
use obramap_store::ObraStore;
use std::sync::Arc;

pub async fn run(args: PopulateArgs, store: Arc<dyn ObraStore>, json: bool) -> Result<()> {
    let config = LayeredConfig::with_defaults().load_from_env();

    let min_pages = args.min_pages.unwrap_or(config.min_pages.value);
    let max_pages = args.max_pages.unwrap_or(config.max_pages.value);
    let uf = args.uf.unwrap_or_else(|| config.uf.value.clone());

    if min_pages == 0 || max_pages < min_pages {
        bail!("invalid page range: min_pages={}, max_pages={}", min_pages, max_pages);
    }

    let mut client = GovClient::new(config.gov_api_url.value.clone(), uf);
    if let Some(key) = &config.api_key.value {
        client = client.with_api_key(key.clone());
    }

    let pipeline = IngestPipeline::new(client, store);
    let summary = pipeline.run(min_pages, max_pages).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Ingested pages {}-{}: {} fetched, {} skipped, {} obras upserted",
            min_pages,
            max_pages,
            summary.pages_fetched,
            summary.pages_skipped,
            summary.obras_upserted
        );
    }

    Ok(())
}
