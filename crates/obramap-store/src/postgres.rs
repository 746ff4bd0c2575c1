//! PostgreSQL storage adapter.
//!
//! Column names mirror the hosted backend the viewer originally wrote to
//! (lowercase, no underscores in the upstream-derived names). A `seq`
//! column records first-insert order so `list_obras` is stable across
//! re-ingestions of the same identifiers.

use async_trait::async_trait;
use obramap_core::error::{ObramapError, Result};
use obramap_core::models::Obra;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::ports::ObraStore;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS obras (
    seq                         BIGSERIAL,
    idunico                     TEXT PRIMARY KEY,
    nome                        TEXT,
    uf                          TEXT,
    endereco                    TEXT,
    descricao                   TEXT,
    funcaosocial                TEXT,
    metaglobal                  TEXT,
    datainicialprevista         DATE,
    datainicialefetiva          DATE,
    datafinalprevista           DATE,
    datafinalefetiva            DATE,
    especie                     TEXT,
    natureza                    TEXT,
    situacao                    TEXT,
    datasituacao                DATE,
    cep                         TEXT,
    enderecoareaexecutora       TEXT,
    recursosorigem              TEXT,
    recursosvalorinvestimento   DOUBLE PRECISION NOT NULL DEFAULT 0,
    geometria                   TEXT,
    raio_m                      DOUBLE PRECISION
)
"#;

const UPSERT: &str = r#"
INSERT INTO obras (
    idunico, nome, uf, endereco, descricao, funcaosocial, metaglobal,
    datainicialprevista, datainicialefetiva, datafinalprevista,
    datafinalefetiva, especie, natureza, situacao, datasituacao, cep,
    enderecoareaexecutora, recursosorigem, recursosvalorinvestimento,
    geometria, raio_m
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
        $16, $17, $18, $19, $20, $21)
ON CONFLICT (idunico) DO UPDATE SET
    nome = EXCLUDED.nome,
    uf = EXCLUDED.uf,
    endereco = EXCLUDED.endereco,
    descricao = EXCLUDED.descricao,
    funcaosocial = EXCLUDED.funcaosocial,
    metaglobal = EXCLUDED.metaglobal,
    datainicialprevista = EXCLUDED.datainicialprevista,
    datainicialefetiva = EXCLUDED.datainicialefetiva,
    datafinalprevista = EXCLUDED.datafinalprevista,
    datafinalefetiva = EXCLUDED.datafinalefetiva,
    especie = EXCLUDED.especie,
    natureza = EXCLUDED.natureza,
    situacao = EXCLUDED.situacao,
    datasituacao = EXCLUDED.datasituacao,
    cep = EXCLUDED.cep,
    enderecoareaexecutora = EXCLUDED.enderecoareaexecutora,
    recursosorigem = EXCLUDED.recursosorigem,
    recursosvalorinvestimento = EXCLUDED.recursosvalorinvestimento,
    geometria = EXCLUDED.geometria,
    raio_m = EXCLUDED.raio_m
"#;

const SELECT_COLUMNS: &str = r#"
SELECT idunico, nome, uf, endereco, descricao, funcaosocial, metaglobal,
       datainicialprevista, datainicialefetiva, datafinalprevista,
       datafinalefetiva, especie, natureza, situacao, datasituacao, cep,
       enderecoareaexecutora, recursosorigem, recursosvalorinvestimento,
       geometria, raio_m
FROM obras
"#;

/// PostgreSQL implementation of [`ObraStore`].
pub struct PostgresObraStore {
    pool: PgPool,
}

impl PostgresObraStore {
    /// Connect and verify the connection.
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| ObramapError::Storage(format!("Failed to connect to database: {}", e)))?;

        sqlx::query("SELECT 1")
            .fetch_one(&pool)
            .await
            .map_err(|e| ObramapError::Storage(format!("Connection test failed: {}", e)))?;

        Ok(Self { pool })
    }

    /// Connect and bootstrap the `obras` table.
    pub async fn with_schema(database_url: &str) -> Result<Self> {
        let store = Self::new(database_url).await?;
        sqlx::query(SCHEMA)
            .execute(&store.pool)
            .await
            .map_err(|e| ObramapError::Storage(format!("Schema bootstrap failed: {}", e)))?;
        Ok(store)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Perform a health check on the database connection
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ObramapError::Storage(format!("Health check failed: {}", e)))?;
        Ok(())
    }
}

fn row_to_obra(row: &sqlx::postgres::PgRow) -> Obra {
    Obra {
        id_unico: row.get("idunico"),
        nome: row.get("nome"),
        uf: row.get("uf"),
        endereco: row.get("endereco"),
        descricao: row.get("descricao"),
        funcao_social: row.get("funcaosocial"),
        meta_global: row.get("metaglobal"),
        data_inicial_prevista: row.get("datainicialprevista"),
        data_inicial_efetiva: row.get("datainicialefetiva"),
        data_final_prevista: row.get("datafinalprevista"),
        data_final_efetiva: row.get("datafinalefetiva"),
        especie: row.get("especie"),
        natureza: row.get("natureza"),
        situacao: row.get("situacao"),
        data_situacao: row.get("datasituacao"),
        cep: row.get("cep"),
        endereco_area_executora: row.get("enderecoareaexecutora"),
        recursos_origem: row.get("recursosorigem"),
        recursos_valor_investimento: row.get("recursosvalorinvestimento"),
        geometria: row.get("geometria"),
        raio_m: row.get("raio_m"),
    }
}

#[async_trait]
impl ObraStore for PostgresObraStore {
    async fn upsert_obras(&self, obras: &[Obra]) -> Result<u64> {
        // One transaction for the whole batch: a failure rolls back every
        // row, matching the all-or-nothing ingestion contract.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ObramapError::Storage(format!("Failed to begin transaction: {}", e)))?;

        for obra in obras {
            sqlx::query(UPSERT)
                .bind(&obra.id_unico)
                .bind(&obra.nome)
                .bind(&obra.uf)
                .bind(&obra.endereco)
                .bind(&obra.descricao)
                .bind(&obra.funcao_social)
                .bind(&obra.meta_global)
                .bind(obra.data_inicial_prevista)
                .bind(obra.data_inicial_efetiva)
                .bind(obra.data_final_prevista)
                .bind(obra.data_final_efetiva)
                .bind(&obra.especie)
                .bind(&obra.natureza)
                .bind(&obra.situacao)
                .bind(obra.data_situacao)
                .bind(&obra.cep)
                .bind(&obra.endereco_area_executora)
                .bind(&obra.recursos_origem)
                .bind(obra.recursos_valor_investimento)
                .bind(&obra.geometria)
                .bind(obra.raio_m)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    ObramapError::Storage(format!("Upsert failed for {}: {}", obra.id_unico, e))
                })?;
        }

        tx.commit()
            .await
            .map_err(|e| ObramapError::Storage(format!("Failed to commit upsert batch: {}", e)))?;

        Ok(obras.len() as u64)
    }

    async fn list_obras(&self) -> Result<Vec<Obra>> {
        let rows = sqlx::query(&format!("{} ORDER BY seq", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ObramapError::Storage(format!("Failed to list obras: {}", e)))?;

        Ok(rows.iter().map(row_to_obra).collect())
    }

    async fn get_obra(&self, id_unico: &str) -> Result<Option<Obra>> {
        let row = sqlx::query(&format!("{} WHERE idunico = $1", SELECT_COLUMNS))
            .bind(id_unico)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ObramapError::Storage(format!("Failed to fetch obra: {}", e)))?;

        Ok(row.as_ref().map(row_to_obra))
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM obras")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ObramapError::Storage(format!("Failed to count obras: {}", e)))?;
        Ok(count as u64)
    }
}
