//! Lists command - shopping lists.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;

use super::{Shop, emit, emit_done};
use crate::Cli;

/// Arguments for the lists command.
#[derive(Args)]
pub struct ListsArgs {
    #[command(subcommand)]
    pub action: Option<ListsAction>,
}

/// Lists subcommands.
#[derive(Subcommand)]
pub enum ListsAction {
    /// Show all lists (default).
    Show,

    /// Show the items of a list.
    Items {
        /// List ID.
        list_id: i64,
    },

    /// Create a list.
    Create {
        /// List name.
        name: String,
    },

    /// Add a product to a list.
    Add {
        /// List ID.
        list_id: i64,
        /// Product ID.
        product_id: u64,
    },
}

/// Runs the lists command.
pub async fn run(args: &ListsArgs, cli: &Cli) -> Result<()> {
    let shop = &Shop::connect()?;

    match args.action.as_ref().unwrap_or(&ListsAction::Show) {
        ListsAction::Show => {
            let lists = shop
                .run(|| async move {
                    let mut session = shop.open().await?;
                    shop.client.lists(&mut session).await
                })
                .await?;
            emit(cli, &lists, |f, l| f.format_lists(l))
        }
        ListsAction::Items { list_id } => {
            let list_id = *list_id;
            let items = shop
                .run(|| async move {
                    let session = shop.open().await?;
                    shop.client.list_items(&session, list_id).await
                })
                .await?;
            emit(cli, &items, |f, i| f.format_list_items(i))
        }
        ListsAction::Create { name } => {
            let name = name.trim();
            if name.is_empty() {
                anyhow::bail!("list name is empty");
            }
            let list = shop
                .run(|| async move {
                    let session = shop.open().await?;
                    shop.client.create_list(&session, name).await
                })
                .await?;
            emit_done(
                cli,
                &format!("Created list {} (#{})", list.name, list.id),
                &json!({"list": list}),
            )
        }
        ListsAction::Add {
            list_id,
            product_id,
        } => {
            let (list_id, product_id) = (*list_id, *product_id);
            shop.run(|| async move {
                let session = shop.open().await?;
                shop.client.add_to_list(&session, list_id, product_id).await
            })
            .await?;
            emit_done(
                cli,
                &format!("Added {product_id} to list {list_id}"),
                &json!({"listId": list_id, "productId": product_id}),
            )
        }
    }
}
