//! Orders command - recent orders.

use alza_client::DEFAULT_ORDER_LIMIT;
use anyhow::Result;
use clap::Args;

use super::{Shop, emit};
use crate::Cli;

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    /// Maximum number of orders.
    #[arg(long, short = 'n', default_value_t = DEFAULT_ORDER_LIMIT)]
    pub limit: usize,
}

/// Runs the orders command.
pub async fn run(args: &OrdersArgs, cli: &Cli) -> Result<()> {
    let shop = &Shop::connect()?;

    let page = shop
        .run(|| async move {
            let mut session = shop.open().await?;
            shop.client.orders(&mut session, args.limit).await
        })
        .await?;

    emit(cli, &page, |f, p| f.format_orders(p))
}
