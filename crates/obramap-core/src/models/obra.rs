//! The obra (public-works project) record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One government construction project as stored by obramap.
///
/// `id_unico` is the upsert key: re-ingesting the same identifier
/// overwrites the stored row. Rows are never deleted by this system;
/// absence from a later ingestion page does not imply deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obra {
    /// Upstream unique identifier, stable across ingestion runs.
    pub id_unico: String,
    pub nome: Option<String>,
    /// Administrative region code (two-letter UF).
    pub uf: Option<String>,
    pub endereco: Option<String>,
    pub descricao: Option<String>,
    pub funcao_social: Option<String>,
    pub meta_global: Option<String>,
    pub data_inicial_prevista: Option<NaiveDate>,
    pub data_inicial_efetiva: Option<NaiveDate>,
    pub data_final_prevista: Option<NaiveDate>,
    pub data_final_efetiva: Option<NaiveDate>,
    pub especie: Option<String>,
    pub natureza: Option<String>,
    pub situacao: Option<String>,
    pub data_situacao: Option<NaiveDate>,
    pub cep: Option<String>,
    pub endereco_area_executora: Option<String>,
    pub recursos_origem: Option<String>,
    /// Planned investment amount; missing upstream nesting degrades to 0.
    pub recursos_valor_investimento: f64,
    /// Decoded coordinate text as produced by the geometry decoder,
    /// e.g. `"lat,lon/lat,lon | lat,lon"`. Recomputed wholesale each
    /// ingestion. `None` when the upstream geometry is absent, malformed,
    /// or of an unsupported kind.
    pub geometria: Option<String>,
    /// Per-obra activation radius override in meters. `None` means the
    /// configured default applies.
    pub raio_m: Option<f64>,
}

impl Obra {
    /// Create an obra carrying only its identifier; every other field at
    /// its absent/zero state. Useful as a test and transform baseline.
    pub fn with_id(id_unico: impl Into<String>) -> Self {
        Self {
            id_unico: id_unico.into(),
            nome: None,
            uf: None,
            endereco: None,
            descricao: None,
            funcao_social: None,
            meta_global: None,
            data_inicial_prevista: None,
            data_inicial_efetiva: None,
            data_final_prevista: None,
            data_final_efetiva: None,
            especie: None,
            natureza: None,
            situacao: None,
            data_situacao: None,
            cep: None,
            endereco_area_executora: None,
            recursos_origem: None,
            recursos_valor_investimento: 0.0,
            geometria: None,
            raio_m: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obra_roundtrips_through_json() {
        let mut obra = Obra::with_id("46014.26-56");
        obra.nome = Some("Escola Municipal".to_string());
        obra.geometria = Some("-8.05,-34.95".to_string());
        obra.recursos_valor_investimento = 1_250_000.5;

        let json = serde_json::to_string(&obra).unwrap();
        let parsed: Obra = serde_json::from_str(&json).unwrap();
        assert_eq!(obra, parsed);
    }

    #[test]
    fn test_with_id_defaults() {
        let obra = Obra::with_id("X");
        assert_eq!(obra.recursos_valor_investimento, 0.0);
        assert!(obra.geometria.is_none());
        assert!(obra.raio_m.is_none());
    }
}
