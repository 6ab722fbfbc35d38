//! Cart command - show and change the cart.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

use super::{Shop, emit, emit_done};
use crate::Cli;

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub action: Option<CartAction>,
}

/// Cart subcommands.
#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart (default).
    Show,

    /// Add a product.
    Add {
        /// Product ID.
        product_id: u64,

        /// Quantity.
        #[arg(long, short = 'q', default_value = "1")]
        quantity: u32,
    },

    /// Remove a product's line.
    Remove {
        /// Product ID.
        product_id: u64,
    },

    /// Remove everything.
    Clear,
}

/// Runs the cart command.
pub async fn run(args: &CartArgs, cli: &Cli) -> Result<()> {
    let shop = &Shop::connect()?;

    match args.action.as_ref().unwrap_or(&CartAction::Show) {
        CartAction::Show => {
            let cart = shop
                .run(|| async move {
                    let mut session = shop.open().await?;
                    shop.client.get_cart(&mut session).await
                })
                .await?;
            emit(cli, &cart, |f, c| f.format_cart(c))
        }
        CartAction::Add {
            product_id,
            quantity,
        } => {
            let (product_id, quantity) = (*product_id, (*quantity).max(1));
            shop.run(|| async move {
                let mut session = shop.open().await?;
                shop.client.add_to_cart(&mut session, product_id, quantity).await
            })
            .await?;
            emit_done(
                cli,
                &format!("Added {quantity}× {product_id} to cart"),
                &json!({"productId": product_id, "count": quantity}),
            )
        }
        CartAction::Remove { product_id } => {
            let product_id = *product_id;
            shop.run(|| async move {
                let mut session = shop.open().await?;
                shop.client.remove_from_cart(&mut session, product_id).await
            })
            .await?;
            emit_done(
                cli,
                &format!("Removed {product_id} from cart"),
                &json!({"productId": product_id}),
            )
        }
        CartAction::Clear => {
            shop.run(|| async move {
                let mut session = shop.open().await?;
                shop.client.clear_cart(&mut session).await
            })
            .await?;
            emit_done(cli, "Cart cleared", &json!({}))
        }
    }
}
