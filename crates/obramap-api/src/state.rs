use obramap_core::config::LayeredConfig;
use obramap_store::ObraStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ObraStore>,
    pub config: LayeredConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn ObraStore>, config: LayeredConfig) -> Self {
        Self { store, config }
    }
}
