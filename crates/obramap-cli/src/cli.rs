use clap::{Parser, Subcommand};

/// obramap - public-works viewer backend
#[derive(Parser, Debug)]
#[command(name = "obramap")]
#[command(about = "Ingest and inspect government public-works (obras) data", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Storage backend to use (memory or postgres)
    #[arg(long, global = true, default_value = "memory")]
    pub storage: StorageBackend,

    #[command(subcommand)]
    pub command: Commands,
}

/// Storage backend selection
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum StorageBackend {
    /// In-memory storage (default, for development)
    Memory,
    /// PostgreSQL persistent storage (reads DATABASE_URL)
    Postgres,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one ingestion pass against the obrasgov API
    Populate(PopulateArgs),

    /// List stored obras
    List(ListArgs),

    /// Show store backend and row count
    Status,
}

#[derive(clap::Args, Debug)]
pub struct PopulateArgs {
    /// First upstream page to fetch
    #[arg(long)]
    pub min_pages: Option<u32>,

    /// Last upstream page to fetch
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// UF (state) filter override
    #[arg(long)]
    pub uf: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only show obras that carry decoded geometry
    #[arg(long)]
    pub with_geometry: bool,
}
