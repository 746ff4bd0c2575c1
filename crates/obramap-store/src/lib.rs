//! Obramap Store - storage port and backends.
//!
//! The ingestion path is the sole writer and performs upserts keyed by
//! `id_unico`; concurrent ingestion runs interleave safely (last upsert
//! for a key wins) without coordination. Rows are never deleted.

pub mod memory;
pub mod ports;
pub mod postgres;

pub use memory::MemoryObraStore;
pub use ports::ObraStore;
pub use postgres::PostgresObraStore;
