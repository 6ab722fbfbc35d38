//! Whoami command - show the signed-in account.

use anyhow::Result;

use super::{Shop, emit};
use crate::Cli;

/// Runs the whoami command.
pub async fn run(cli: &Cli) -> Result<()> {
    let shop = &Shop::connect()?;

    let status = shop
        .run(|| async move {
            let mut session = shop.open().await?;
            shop.client.user_status(&mut session).await
        })
        .await?;

    emit(cli, &status, |f, s| f.format_user(s))
}
