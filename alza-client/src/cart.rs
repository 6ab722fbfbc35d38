//! Cart reconciliation.
//!
//! The cart comes from two endpoints that share no key. The line listing
//! has product IDs and the basket line IDs needed for mutation. The
//! preview has everything a person wants to see, but identifies products
//! only through their page link. Lines are matched by recovering the
//! product ID from that link.

use std::collections::HashMap;

use alza_core::de::null_as_default;
use alza_core::extract::product_id_from_url;
use alza_core::{CartItem, CartView};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::client::{ShopClient, decode};
use crate::endpoints;
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

// ============================================================================
// Response Types
// ============================================================================

/// Line listing: mutation keys and counts.
#[derive(Debug, Default, Deserialize)]
pub struct CartLines {
    /// Lines.
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<CartLine>,
}

/// One basket line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product ID.
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_id: u64,
    /// Quantity.
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u32,
    /// Basket line ID.
    #[serde(default, deserialize_with = "null_as_default")]
    pub basket_item_id: u64,
}

/// Preview listing: display fields.
#[derive(Debug, Default, Deserialize)]
pub struct CartPreview {
    /// Preview items.
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<PreviewItem>,
}

/// One preview item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewItem {
    /// Quantity.
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u32,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Image URL.
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    /// Formatted price.
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: String,
    /// Link to the product page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub detail_action: DetailAction,
}

/// Product page link of a preview item.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailAction {
    /// Absolute product page URL.
    #[serde(default, deserialize_with = "null_as_default")]
    pub web_link: String,
}

/// Body for a line update; count 0 removes the line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderUpdate {
    id: String,
    count: u32,
    add_hook: Option<()>,
    source: u32,
    #[serde(rename = "accessoryvariant")]
    accessory_variant: Option<()>,
}

/// Body for adding a product.
#[derive(Debug, Serialize)]
struct OrderCommodity {
    id: u64,
    count: u32,
}

/// Source code the site sends with cart updates from the basket page.
const UPDATE_SOURCE_BASKET: u32 = 4;

// ============================================================================
// Reconciliation
// ============================================================================

/// Merges the line listing into the preview listing.
///
/// Preview items drive the output. Each gets the basket line ID of the
/// line with the same product ID, or 0 when no line matches.
pub fn reconcile(lines: &[CartLine], preview: &[PreviewItem]) -> Vec<CartItem> {
    let keys: HashMap<u64, u64> = lines
        .iter()
        .map(|line| (line.product_id, line.basket_item_id))
        .collect();

    preview
        .iter()
        .map(|item| {
            let url = item.detail_action.web_link.clone();
            let product_id = product_id_from_url(&url);
            CartItem {
                product_id,
                count: item.count,
                basket_item_id: keys.get(&product_id).copied().unwrap_or(0),
                name: item.name.clone(),
                price: item.price.clone(),
                image_url: item.image_url.clone(),
                url,
            }
        })
        .collect()
}

/// Cart lines with only the line-listing fields.
fn basic_items(lines: Vec<CartLine>) -> Vec<CartItem> {
    lines
        .into_iter()
        .map(|line| CartItem {
            product_id: line.product_id,
            count: line.count,
            basket_item_id: line.basket_item_id,
            ..CartItem::default()
        })
        .collect()
}

// ============================================================================
// Operations
// ============================================================================

impl ShopClient {
    /// Fetches the reconciled cart.
    ///
    /// A failing preview call degrades the view to line fields only; it
    /// does not fail the call.
    #[instrument(skip(self, session))]
    pub async fn get_cart(&self, session: &mut Session) -> ClientResult<CartView> {
        let basket_id = self.resolve_basket(session).await?;
        if basket_id.is_empty() {
            debug!("No active basket");
            return Ok(CartView::empty());
        }

        let lines: CartLines = self
            .get_json(session, &endpoints::cart_items(&basket_id), "cart items")
            .await?;

        let preview = match self.get(session, &endpoints::cart_preview(&basket_id)).await {
            Ok(response) => decode::<CartPreview>(&response, "cart preview"),
            Err(e) => Err(e),
        };

        match preview {
            Ok(preview) => {
                let items = reconcile(&lines.items, &preview.items);
                debug!(count = items.len(), "Cart reconciled");
                Ok(CartView::full(items))
            }
            Err(e) => {
                debug!(error = %e, "Cart preview unavailable, returning basic items");
                Ok(CartView::basic(basic_items(lines.items), e.to_string()))
            }
        }
    }

    /// Adds `count` of a product to the cart.
    ///
    /// The server may open a new basket, so the cached basket is dropped.
    #[instrument(skip(self, session))]
    pub async fn add_to_cart(
        &self,
        session: &mut Session,
        product_id: u64,
        count: u32,
    ) -> ClientResult<()> {
        let body = OrderCommodity {
            id: product_id,
            count,
        };
        self.post(session, endpoints::ORDER_COMMODITY, &body).await?;
        session.invalidate_basket();
        info!(product_id, count, "Added to cart");
        Ok(())
    }

    /// Removes a product's line from the cart.
    ///
    /// # Errors
    ///
    /// [`ClientError::ProductNotInCart`] when no line for the product has
    /// a mutation key.
    #[instrument(skip(self, session))]
    pub async fn remove_from_cart(&self, session: &mut Session, product_id: u64) -> ClientResult<()> {
        let cart = self.get_cart(session).await?;
        let line = cart
            .removable_line(product_id)
            .ok_or(ClientError::ProductNotInCart(product_id))?;

        let body = OrderUpdate {
            id: line.basket_item_id.to_string(),
            count: 0,
            add_hook: None,
            source: UPDATE_SOURCE_BASKET,
            accessory_variant: None,
        };
        self.post(session, endpoints::ORDER_UPDATE, &body).await?;
        info!(product_id, basket_item_id = line.basket_item_id, "Removed from cart");
        Ok(())
    }

    /// Empties the cart. A missing basket is already empty.
    #[instrument(skip(self, session))]
    pub async fn clear_cart(&self, session: &mut Session) -> ClientResult<()> {
        let basket_id = self.resolve_basket(session).await?;
        if basket_id.is_empty() {
            debug!("Cart already empty");
            return Ok(());
        }

        self.delete(session, &endpoints::cart_items(&basket_id)).await?;
        session.invalidate_basket();
        info!(basket_id = %basket_id, "Cart cleared");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn preview_item(url: &str, name: &str) -> PreviewItem {
        PreviewItem {
            count: 1,
            name: name.to_string(),
            price: "19,90 €".to_string(),
            detail_action: DetailAction {
                web_link: url.to_string(),
            },
            ..PreviewItem::default()
        }
    }

    #[test]
    fn test_reconcile_matches_by_product_id() {
        let lines = vec![CartLine {
            product_id: 12345,
            count: 1,
            basket_item_id: 67890,
        }];
        let preview = vec![preview_item("/x-d12345.htm", "X")];

        let items = reconcile(&lines, &preview);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id, 12345);
        assert_eq!(items[0].basket_item_id, 67890);
        assert_eq!(items[0].name, "X");
        assert_eq!(items[0].url, "/x-d12345.htm");
    }

    #[test]
    fn test_reconcile_unmatched_gets_zero_key() {
        let lines = vec![CartLine {
            product_id: 1,
            count: 1,
            basket_item_id: 2,
        }];
        let preview = vec![
            preview_item("https://www.alza.sk/a-d99.htm", "A"),
            preview_item("https://www.alza.sk/no-marker", "B"),
        ];

        let items = reconcile(&lines, &preview);
        assert_eq!(items[0].product_id, 99);
        assert_eq!(items[0].basket_item_id, 0);
        assert_eq!(items[1].product_id, 0);
        assert!(!items[1].is_removable());
    }

    #[test]
    fn test_basic_items_keep_line_fields() {
        let items = basic_items(vec![CartLine {
            product_id: 5,
            count: 3,
            basket_item_id: 8,
        }]);
        assert_eq!(items[0].count, 3);
        assert!(!items[0].has_details());
    }

    #[test]
    fn test_order_update_body() {
        let body = OrderUpdate {
            id: "67890".into(),
            count: 0,
            add_hook: None,
            source: UPDATE_SOURCE_BASKET,
            accessory_variant: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "id": "67890",
                "count": 0,
                "addHook": null,
                "source": 4,
                "accessoryvariant": null
            })
        );
    }

    #[test]
    fn test_preview_parse_tolerates_missing_fields() {
        let preview: CartPreview =
            serde_json::from_value(json!({"items": [{"name": "Y"}]})).unwrap();
        assert_eq!(preview.items[0].name, "Y");
        assert_eq!(preview.items[0].detail_action.web_link, "");
    }

    #[test]
    fn test_null_counts_read_as_zero() {
        let lines: CartLines = serde_json::from_value(json!({
            "items": [{"productId": 100, "count": null, "basketItemId": null}]
        }))
        .unwrap();
        assert_eq!(lines.items[0].product_id, 100);
        assert_eq!(lines.items[0].count, 0);
        assert_eq!(lines.items[0].basket_item_id, 0);

        let preview: CartPreview =
            serde_json::from_value(json!({"items": [{"count": null, "name": null}]})).unwrap();
        assert_eq!(preview.items[0].count, 0);
        assert_eq!(preview.items[0].name, "");
    }
}
