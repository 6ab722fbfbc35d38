//! Cart types.
//!
//! The cart is assembled from two endpoints that share no key: a line-item
//! listing (mutation keys, counts) and a preview listing (names, prices,
//! links). [`CartView`] records whether the preview half made it in.

use serde::{Deserialize, Serialize};

// ============================================================================
// Cart Item
// ============================================================================

/// One reconciled cart line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product ID, recovered from the product URL.
    pub product_id: u64,
    /// Quantity in the basket.
    pub count: u32,
    /// Basket line ID used to mutate this line. Zero when unknown.
    pub basket_item_id: u64,
    /// Display name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Formatted price.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub price: String,
    /// Product image URL.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_url: String,
    /// Product page URL.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
}

impl CartItem {
    /// Returns true if this line can be removed (has a mutation key).
    pub fn is_removable(&self) -> bool {
        self.basket_item_id != 0
    }

    /// Returns true if display fields are populated.
    pub fn has_details(&self) -> bool {
        !self.name.is_empty()
    }
}

// ============================================================================
// Cart View
// ============================================================================

/// How complete the cart data is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartDetail {
    /// Line items and preview data were both available.
    Full,
    /// Only line-item fields are populated; the preview fetch failed.
    Basic {
        /// Why the preview data is missing.
        reason: String,
    },
}

/// Cart contents plus their completeness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    /// Cart lines.
    pub items: Vec<CartItem>,
    /// Whether display fields are present.
    pub detail: CartDetail,
}

impl CartView {
    /// A cart built from both listings.
    pub fn full(items: Vec<CartItem>) -> Self {
        Self {
            items,
            detail: CartDetail::Full,
        }
    }

    /// A cart built from line items only.
    pub fn basic(items: Vec<CartItem>, reason: impl Into<String>) -> Self {
        Self {
            items,
            detail: CartDetail::Basic {
                reason: reason.into(),
            },
        }
    }

    /// An empty cart (no active basket).
    pub fn empty() -> Self {
        Self::full(Vec::new())
    }

    /// Returns true if the preview data is missing.
    pub fn is_degraded(&self) -> bool {
        matches!(self.detail, CartDetail::Basic { .. })
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of cart lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Finds the first removable line for a product.
    pub fn removable_line(&self, product_id: u64) -> Option<&CartItem> {
        self.items
            .iter()
            .find(|item| item.product_id == product_id && item.is_removable())
    }
}

impl Default for CartView {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: u64, basket_item_id: u64) -> CartItem {
        CartItem {
            product_id,
            count: 1,
            basket_item_id,
            ..CartItem::default()
        }
    }

    #[test]
    fn test_removable_line_skips_zero_key() {
        let view = CartView::full(vec![line(5, 0), line(5, 77)]);
        assert_eq!(view.removable_line(5).map(|i| i.basket_item_id), Some(77));
        assert!(view.removable_line(6).is_none());
    }

    #[test]
    fn test_basic_view_is_degraded() {
        let view = CartView::basic(vec![line(1, 2)], "preview: HTTP 500");
        assert!(view.is_degraded());
        assert_eq!(view.len(), 1);
        assert!(!CartView::empty().is_degraded());
        assert!(CartView::empty().is_empty());
    }
}
