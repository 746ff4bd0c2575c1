//! Upstream record to stored obra transformation.

use crate::client::ProjetoInvestimento;
use chrono::NaiveDate;
use obramap_core::models::Obra;
use obramap_geo::wkb_hex_to_text;

fn parse_date(raw: &Option<String>) -> Option<NaiveDate> {
    let raw = raw.as_deref()?.trim();
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            tracing::warn!(value = %raw, "Ignoring unparseable upstream date");
            None
        }
    }
}

/// Build the stored obra from one upstream record.
///
/// Absent nesting (`geometrias`, `fontesDeRecurso`) degrades to
/// `None`/`0`, never an error; geometry decoding failures yield a null
/// geometry and the record is kept.
pub fn obra_from_projeto(projeto: &ProjetoInvestimento) -> Obra {
    let geometria_hex = projeto.geometrias.first().and_then(|g| g.geometria.as_deref());
    let geometria = geometria_hex.and_then(wkb_hex_to_text);

    let fonte = projeto.fontes_de_recurso.first();

    Obra {
        id_unico: projeto.id_unico.clone(),
        nome: projeto.nome.clone(),
        uf: projeto.uf.clone(),
        endereco: projeto.endereco.clone(),
        descricao: projeto.descricao.clone(),
        funcao_social: projeto.funcao_social.clone(),
        meta_global: projeto.meta_global.clone(),
        data_inicial_prevista: parse_date(&projeto.data_inicial_prevista),
        data_inicial_efetiva: parse_date(&projeto.data_inicial_efetiva),
        data_final_prevista: parse_date(&projeto.data_final_prevista),
        data_final_efetiva: parse_date(&projeto.data_final_efetiva),
        especie: projeto.especie.clone(),
        natureza: projeto.natureza.clone(),
        situacao: projeto.situacao.clone(),
        data_situacao: parse_date(&projeto.data_situacao),
        cep: projeto.cep.clone(),
        endereco_area_executora: projeto
            .geometrias
            .first()
            .and_then(|g| g.endereco_area_executora.clone()),
        recursos_origem: fonte.and_then(|f| f.origem.clone()),
        recursos_valor_investimento: fonte
            .and_then(|f| f.valor_investimento_previsto)
            .unwrap_or(0.0),
        geometria,
        raio_m: None,
    }
}
