//! Commodity lists (favorites, custom lists, "buy later").

use serde::{Deserialize, Serialize};

use crate::de::null_as_default;

/// List type code for the built-in favorites list.
pub const LIST_TYPE_FAVORITES: i32 = 1;

/// A commodity list as returned by the lists endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommodityList {
    /// List ID.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    /// List name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Number of items.
    #[serde(default, deserialize_with = "null_as_default")]
    pub item_count: u32,
    /// Type code.
    #[serde(default, rename = "type")]
    pub list_type: i32,
    /// Whether the user can modify the list.
    #[serde(default, deserialize_with = "null_as_default")]
    pub can_modify: bool,
}

impl CommodityList {
    /// Human-readable label for the list type.
    pub fn type_label(&self) -> String {
        match self.list_type {
            0 => "custom".to_string(),
            LIST_TYPE_FAVORITES => "favorites".to_string(),
            9 => "frequent".to_string(),
            14 => "buy-later".to_string(),
            15 => "pc-config".to_string(),
            other => format!("type-{other}"),
        }
    }
}

/// An item on a commodity list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    /// Product page URL.
    pub navigation_url: String,
    /// Quantity.
    pub count: u32,
    /// Formatted price with VAT.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub price: String,
}

impl ListItem {
    /// Product ID recovered from the item URL (0 when unknown).
    pub fn product_id(&self) -> u64 {
        crate::extract::product_id_from_url(&self.navigation_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_label() {
        let mut list = CommodityList::default();
        assert_eq!(list.type_label(), "custom");
        list.list_type = 14;
        assert_eq!(list.type_label(), "buy-later");
        list.list_type = 42;
        assert_eq!(list.type_label(), "type-42");
    }

    #[test]
    fn test_list_item_product_id() {
        let item = ListItem {
            navigation_url: "/hracka-d555.htm".into(),
            count: 1,
            price: String::new(),
        };
        assert_eq!(item.product_id(), 555);
    }
}
