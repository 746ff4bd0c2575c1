//! Obramap API - thin HTTP adapter over the ingestion pipeline and the
//! obra store.

pub mod error;
pub mod routes;
pub mod state;
