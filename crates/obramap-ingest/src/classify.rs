//! Keyword classification of obras into presentation asset kinds.
//!
//! This crosses the rendering boundary: the viewer picks a map icon and a
//! 3-D model from the kind. Kept behind a strategy trait so a proper
//! upstream category field can replace the keyword scan without touching
//! the ingestion core.

use serde::Serialize;

/// Model asset served to the AR layer when no kind-specific one exists.
pub const DEFAULT_MODEL_URL: &str = "https://rv-gov-seven.vercel.app/park.glb";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssetKind {
    Habitacional,
    Mercado,
    Escola,
    Pavimentacao,
    Biblioteca,
    Generico,
}

impl AssetKind {
    /// Stable slug used for icon lookup by the viewer.
    pub fn slug(&self) -> &'static str {
        match self {
            AssetKind::Habitacional => "habitacional",
            AssetKind::Mercado => "mercado",
            AssetKind::Escola => "escola",
            AssetKind::Pavimentacao => "pavimentacao",
            AssetKind::Biblioteca => "biblioteca",
            AssetKind::Generico => "generico",
        }
    }
}

/// Strategy for mapping an obra description to an asset kind.
pub trait AssetClassifier: Send + Sync {
    fn classify(&self, descricao: &str) -> AssetKind;

    /// URL of the 3-D model for a kind.
    fn model_url(&self, _kind: AssetKind) -> String {
        DEFAULT_MODEL_URL.to_string()
    }
}

/// Case-insensitive keyword scan over the free-text description.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl AssetClassifier for KeywordClassifier {
    fn classify(&self, descricao: &str) -> AssetKind {
        let upper = descricao.to_uppercase();
        if upper.contains("HABITACIONAIS") {
            AssetKind::Habitacional
        } else if upper.contains("MERCADO") {
            AssetKind::Mercado
        } else if upper.contains("ESCOLA") {
            AssetKind::Escola
        } else if upper.contains("PAVIMENTAÇÃO") {
            AssetKind::Pavimentacao
        } else if upper.contains("BIBLIOTECA") {
            AssetKind::Biblioteca
        } else {
            AssetKind::Generico
        }
    }
}
