//! Product command - product detail.

use anyhow::Result;
use clap::Args;

use super::{Shop, emit};
use crate::Cli;

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    /// Product ID.
    pub product_id: u64,
}

/// Runs the product command.
pub async fn run(args: &ProductArgs, cli: &Cli) -> Result<()> {
    let shop = &Shop::connect()?;

    let product = shop
        .run(|| async move {
            let mut session = shop.open().await?;
            shop.client.product(&mut session, args.product_id).await
        })
        .await?;

    emit(cli, &product, |f, p| f.format_product(p))
}
