use crate::cli::ListArgs;
use anyhow::Result;
use obramap_store::ObraStore;
use std::sync::Arc;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct ObraRow {
    #[tabled(rename = "Id")]
    id_unico: String,
    #[tabled(rename = "Nome")]
    nome: String,
    #[tabled(rename = "UF")]
    uf: String,
    #[tabled(rename = "Situação")]
    situacao: String,
    #[tabled(rename = "Geometria")]
    geometria: String,
}

pub async fn run(args: ListArgs, store: Arc<dyn ObraStore>, json: bool) -> Result<()> {
    let mut obras = store.list_obras().await?;

    if args.with_geometry {
        obras.retain(|obra| obra.geometria.is_some());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&obras)?);
        return Ok(());
    }

    if obras.is_empty() {
        println!("No obras stored.");
        return Ok(());
    }

    let rows: Vec<ObraRow> = obras
        .iter()
        .map(|obra| ObraRow {
            id_unico: obra.id_unico.clone(),
            nome: obra.nome.clone().unwrap_or_default(),
            uf: obra.uf.clone().unwrap_or_default(),
            situacao: obra.situacao.clone().unwrap_or_default(),
            geometria: if obra.geometria.is_some() { "yes" } else { "-" }.to_string(),
        })
        .collect();

    println!("{}", Table::new(rows));
    Ok(())
}
