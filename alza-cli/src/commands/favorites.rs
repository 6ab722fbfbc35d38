//! Favorites command - the list used as favorites.
//!
//! The list is picked by name (`--list` / `ALZA_FAVORITES_LIST`, then
//! `AGENT` or `AGENTS`) or by its favorites type. Adding works without
//! any such list by falling back to the account's built-in favorites.

use alza_client::ClientError;
use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;
use tracing::debug;

use super::{Shop, emit, emit_done};
use crate::Cli;

/// Arguments for the favorites command.
#[derive(Args)]
pub struct FavoritesArgs {
    /// Name of the list to use as favorites.
    #[arg(long, env = "ALZA_FAVORITES_LIST", global = true)]
    pub list: Option<String>,

    #[command(subcommand)]
    pub action: Option<FavoritesAction>,
}

/// Favorites subcommands.
#[derive(Subcommand)]
pub enum FavoritesAction {
    /// Show favorite products (default).
    Show,

    /// Add a product.
    Add {
        /// Product ID.
        product_id: u64,
    },

    /// Remove a product.
    Remove {
        /// Product ID.
        product_id: u64,
    },
}

/// Runs the favorites command.
pub async fn run(args: &FavoritesArgs, cli: &Cli) -> Result<()> {
    let shop = &Shop::connect()?;
    let preferred = args.list.as_deref();

    match args.action.as_ref().unwrap_or(&FavoritesAction::Show) {
        FavoritesAction::Show => {
            let items = shop
                .run(|| async move {
                    let mut session = shop.open().await?;
                    let list = shop.client.resolve_favorites_list(&mut session, preferred).await?;
                    shop.client.list_items(&session, list.id).await
                })
                .await?;
            emit(cli, &items, |f, i| f.format_list_items(i))
        }
        FavoritesAction::Add { product_id } => {
            let product_id = *product_id;
            let target = shop
                .run(|| async move {
                    let mut session = shop.open().await?;
                    match shop.client.resolve_favorites_list(&mut session, preferred).await {
                        Ok(list) => {
                            shop.client.add_to_list(&session, list.id, product_id).await?;
                            Ok(list.name)
                        }
                        Err(ClientError::ListNotFound(name)) => {
                            debug!(list = %name, "No favorites list, using built-in favorites");
                            shop.client.add_to_favorites(&mut session, product_id).await?;
                            Ok("favorites".to_string())
                        }
                        Err(e) => Err(e),
                    }
                })
                .await?;
            emit_done(
                cli,
                &format!("Added {product_id} to {target}"),
                &json!({"productId": product_id, "list": target}),
            )
        }
        FavoritesAction::Remove { product_id } => {
            let product_id = *product_id;
            let target = shop
                .run(|| async move {
                    let mut session = shop.open().await?;
                    let list = shop.client.resolve_favorites_list(&mut session, preferred).await?;
                    shop.client.remove_from_list(&session, list.id, product_id).await?;
                    Ok(list.name)
                })
                .await?;
            emit_done(
                cli,
                &format!("Removed {product_id} from {target}"),
                &json!({"productId": product_id, "list": target}),
            )
        }
    }
}
