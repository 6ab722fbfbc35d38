//! Order history types.

use serde::{Deserialize, Serialize};

/// An order from either the active or the archived listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order number.
    pub id: String,
    /// Creation date (`YYYY-MM-DD` when the source parsed).
    pub date: String,
    /// Status text.
    pub status: String,
    /// Formatted total price.
    pub total_price: String,
}

/// A page of orders plus the server-side total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage {
    /// Orders, most recent first, capped at the requested limit.
    pub orders: Vec<Order>,
    /// Total number of orders the account has.
    #[serde(rename = "totalCount")]
    pub total: u64,
}
