//! HTTP client for the obrasgov investment-project API.

use async_trait::async_trait;
use obramap_core::error::{ObramapError, Result};
use serde::Deserialize;

/// One page of the upstream `projeto-investimento` listing.
///
/// `content` stays optional so a page whose body lacks the array is a
/// skippable condition, not a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjetoInvestimentoPage {
    pub content: Option<Vec<ProjetoInvestimento>>,
}

/// Upstream project record, camelCase per the government API contract.
/// Dates arrive as ISO strings; parsing to typed dates happens in the
/// transform step so a malformed date degrades rather than failing the
/// whole page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjetoInvestimento {
    pub id_unico: String,
    pub nome: Option<String>,
    pub uf: Option<String>,
    pub endereco: Option<String>,
    pub descricao: Option<String>,
    pub funcao_social: Option<String>,
    pub meta_global: Option<String>,
    pub data_inicial_prevista: Option<String>,
    pub data_inicial_efetiva: Option<String>,
    pub data_final_prevista: Option<String>,
    pub data_final_efetiva: Option<String>,
    pub especie: Option<String>,
    pub natureza: Option<String>,
    pub situacao: Option<String>,
    pub data_situacao: Option<String>,
    pub cep: Option<String>,
    #[serde(default)]
    pub geometrias: Vec<GeometriaProjeto>,
    #[serde(default)]
    pub fontes_de_recurso: Vec<FonteDeRecurso>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometriaProjeto {
    /// WKB geometry as hex text.
    pub geometria: Option<String>,
    pub endereco_area_executora: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FonteDeRecurso {
    pub origem: Option<String>,
    pub valor_investimento_previsto: Option<f64>,
}

/// Port over the upstream pagination, so the pipeline is testable without
/// the network.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<ProjetoInvestimentoPage>;
}

/// Live client against the obrasgov API.
pub struct GovClient {
    base_url: String,
    uf: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl GovClient {
    pub fn new(base_url: impl Into<String>, uf: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            uf: uf.into(),
            api_key: None,
            client: reqwest::Client::new(),
        }
    }

    /// Attach the `chave-api-dados` key sent on every request.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    fn page_url(&self, page: u32) -> String {
        format!(
            "{}/projeto-investimento?uf={}&page={}",
            self.base_url.trim_end_matches('/'),
            self.uf,
            page
        )
    }
}

#[async_trait]
impl PageSource for GovClient {
    async fn fetch_page(&self, page: u32) -> Result<ProjetoInvestimentoPage> {
        let url = self.page_url(page);
        tracing::debug!(url = %url, "Fetching upstream page");

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("chave-api-dados", key);
        }

        let response = request.send().await.map_err(|e| ObramapError::UpstreamRequest {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(ObramapError::UpstreamStatus {
                status: response.status().as_u16(),
                page,
            });
        }

        response
            .json::<ProjetoInvestimentoPage>()
            .await
            .map_err(|e| ObramapError::UpstreamShape { reason: e.to_string() })
    }
}
