//! Account status.

use serde::{Deserialize, Serialize};

/// Summary of the signed-in account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatus {
    /// Numeric user ID.
    pub user_id: i64,
    /// Display name.
    pub user_name: String,
    /// Active basket ID, empty when there is none.
    pub basket_id: String,
    /// Number of products in the basket.
    pub basket_count: u32,
    /// Number of active orders.
    pub orders_count: u32,
    /// Membership flag.
    pub is_premium: bool,
}
