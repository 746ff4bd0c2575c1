mod list;
mod populate;
mod status;

use crate::cli::{Cli, Commands};
use anyhow::Result;

pub async fn execute(cli: Cli) -> Result<()> {
    let store = crate::storage::resolve_store(&cli.storage).await?;

    match cli.command {
        Commands::Populate(args) => populate::run(args, store, cli.json).await,
        Commands::List(args) => list::run(args, store, cli.json).await,
        Commands::Status => status::run(&cli.storage, store, cli.json).await,
    }
}
