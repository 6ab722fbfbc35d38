//! Search command - catalog search with suggestion fallback.

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::{Shop, emit};
use crate::Cli;

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Search term.
    pub query: String,

    /// Maximum number of results.
    #[arg(long, short = 'n', default_value = "10")]
    pub limit: usize,
}

/// Runs the search command.
pub async fn run(args: &SearchArgs, cli: &Cli) -> Result<()> {
    let shop = &Shop::connect()?;
    let term = args.query.trim();
    if term.is_empty() {
        anyhow::bail!("search term is empty");
    }

    let results = shop
        .run(|| async move {
            let session = shop.open().await?;
            shop.client.search(&session, term, args.limit).await
        })
        .await?;
    info!(count = results.len(), "Search finished");

    emit(cli, &results, |f, r| f.format_search(r))
}
