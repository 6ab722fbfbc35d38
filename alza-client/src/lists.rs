//! Commodity lists and favorites.

use std::collections::BTreeMap;

use alza_core::de::null_as_default;
use alza_core::models::list::LIST_TYPE_FAVORITES;
use alza_core::{CommodityList, ListItem};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::client::ShopClient;
use crate::endpoints;
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// List names tried when no favorites list is configured.
pub const DEFAULT_FAVORITES_NAMES: [&str; 2] = ["AGENT", "AGENTS"];

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct ListsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    data: Vec<CommodityList>,
    #[serde(default, deserialize_with = "null_as_default")]
    user_id: i64,
}

#[derive(Debug, Default, Deserialize)]
struct ListItemsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    data: Vec<ListWithItems>,
}

#[derive(Debug, Default, Deserialize)]
struct ListWithItems {
    #[serde(default, deserialize_with = "null_as_default")]
    items: Vec<RawListItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawListItem {
    #[serde(default, deserialize_with = "null_as_default")]
    navigation_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    count: u32,
    #[serde(default)]
    price_info_v2: Option<PriceInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    price_with_vat: String,
}

impl RawListItem {
    fn into_item(self) -> ListItem {
        ListItem {
            navigation_url: self.navigation_url,
            count: self.count,
            price: self.price_info_v2.map(|p| p.price_with_vat).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AddResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    is_success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    error_message: String,
}

// ============================================================================
// Request Bodies
// ============================================================================

#[derive(Debug, Serialize)]
struct CreateList<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    list_type: i32,
}

#[derive(Debug, Serialize)]
struct AddToList {
    #[serde(rename = "listID")]
    list_id: i64,
    #[serde(rename = "cId")]
    commodity_id: u64,
    path: &'static str,
    #[serde(rename = "pageType")]
    page_type: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoveFromList {
    id: i64,
    product_id: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddToFavorites {
    items: BTreeMap<String, u32>,
    list_type: i32,
    country: &'static str,
}

// ============================================================================
// Selection
// ============================================================================

/// Picks the favorites list.
///
/// Names are compared case-insensitively: `preferred` first, then the
/// default names, and finally the first list of the favorites type.
pub fn select_favorites_list<'a>(
    lists: &'a [CommodityList],
    preferred: Option<&str>,
) -> Option<&'a CommodityList> {
    let preferred = preferred.map(str::trim).filter(|name| !name.is_empty());

    preferred
        .into_iter()
        .chain(DEFAULT_FAVORITES_NAMES)
        .find_map(|name| lists.iter().find(|list| list.name.eq_ignore_ascii_case(name)))
        .or_else(|| lists.iter().find(|list| list.list_type == LIST_TYPE_FAVORITES))
}

// ============================================================================
// Operations
// ============================================================================

impl ShopClient {
    /// All lists of the signed-in user.
    #[instrument(skip(self, session))]
    pub async fn lists(&self, session: &mut Session) -> ClientResult<Vec<CommodityList>> {
        let response: ListsResponse = self
            .get_json(session, endpoints::COMMODITY_LISTS, "commodity lists")
            .await?;
        if response.user_id > 0 && session.user_id().is_empty() {
            session.set_user_id(response.user_id.to_string());
        }
        debug!(count = response.data.len(), "Lists loaded");
        Ok(response.data)
    }

    /// Items of one list.
    ///
    /// # Errors
    ///
    /// [`ClientError::ListNotFound`] when the response holds no list.
    #[instrument(skip(self, session))]
    pub async fn list_items(&self, session: &Session, list_id: i64) -> ClientResult<Vec<ListItem>> {
        let response: ListItemsResponse = self
            .get_json(session, &endpoints::list_items(list_id), "list items")
            .await?;
        let list = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::ListNotFound(list_id.to_string()))?;
        Ok(list.items.into_iter().map(RawListItem::into_item).collect())
    }

    /// Creates a custom list and returns it.
    #[instrument(skip(self, session))]
    pub async fn create_list(&self, session: &Session, name: &str) -> ClientResult<CommodityList> {
        let body = CreateList { name, list_type: 0 };
        let response: ListsResponse = self
            .post_json(session, endpoints::CREATE_LIST, &body, "created list")
            .await?;
        let list = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::RemoteRejected {
                step: "create list",
                message: "no list returned in response".to_string(),
            })?;
        info!(list_id = list.id, "List created");
        Ok(list)
    }

    /// Adds a product to a list.
    #[instrument(skip(self, session))]
    pub async fn add_to_list(&self, session: &Session, list_id: i64, product_id: u64) -> ClientResult<()> {
        let body = AddToList {
            list_id,
            commodity_id: product_id,
            path: "",
            page_type: 0,
        };
        self.post(session, endpoints::ADD_TO_LIST, &body).await?;
        info!(list_id, product_id, "Added to list");
        Ok(())
    }

    /// Removes a product from a list.
    #[instrument(skip(self, session))]
    pub async fn remove_from_list(
        &self,
        session: &Session,
        list_id: i64,
        product_id: u64,
    ) -> ClientResult<()> {
        let body = RemoveFromList {
            id: list_id,
            product_id,
        };
        self.post(session, endpoints::REMOVE_FROM_LIST, &body).await?;
        info!(list_id, product_id, "Removed from list");
        Ok(())
    }

    /// Adds a product to the account's built-in favorites.
    ///
    /// # Errors
    ///
    /// [`ClientError::RemoteRejected`] when the API reports no success.
    #[instrument(skip(self, session))]
    pub async fn add_to_favorites(&self, session: &mut Session, product_id: u64) -> ClientResult<()> {
        let user_id = self.resolve_identity(session).await?;
        let body = AddToFavorites {
            items: BTreeMap::from([(product_id.to_string(), 1)]),
            list_type: LIST_TYPE_FAVORITES,
            country: endpoints::COUNTRY,
        };
        let response: AddResponse = self
            .post_json(session, &endpoints::favorites_items(&user_id), &body, "favorites response")
            .await?;
        if !response.is_success {
            return Err(ClientError::RemoteRejected {
                step: "add to favorites",
                message: response.error_message,
            });
        }
        info!(product_id, "Added to favorites");
        Ok(())
    }

    /// Finds the list that stands in for favorites.
    ///
    /// # Errors
    ///
    /// [`ClientError::ListNotFound`] when no list qualifies.
    #[instrument(skip(self, session))]
    pub async fn resolve_favorites_list(
        &self,
        session: &mut Session,
        preferred: Option<&str>,
    ) -> ClientResult<CommodityList> {
        let lists = self.lists(session).await?;
        select_favorites_list(&lists, preferred)
            .cloned()
            .ok_or_else(|| {
                ClientError::ListNotFound(
                    preferred
                        .filter(|name| !name.trim().is_empty())
                        .unwrap_or("favorites (set ALZA_FAVORITES_LIST or create a list named AGENT)")
                        .to_string(),
                )
            })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list(id: i64, name: &str, list_type: i32) -> CommodityList {
        CommodityList {
            id,
            name: name.to_string(),
            list_type,
            ..CommodityList::default()
        }
    }

    #[test]
    fn test_select_preferred_case_insensitive() {
        let lists = vec![list(1, "agent", 0), list(2, "Wishlist", 0)];
        assert_eq!(select_favorites_list(&lists, Some("WISHLIST")).map(|l| l.id), Some(2));
        assert_eq!(select_favorites_list(&lists, None).map(|l| l.id), Some(1));
    }

    #[test]
    fn test_select_falls_back_to_type() {
        let lists = vec![list(1, "Custom", 0), list(5, "Obľúbené", LIST_TYPE_FAVORITES)];
        assert_eq!(select_favorites_list(&lists, Some("  ")).map(|l| l.id), Some(5));
        assert!(select_favorites_list(&[list(1, "Custom", 0)], None).is_none());
    }

    #[test]
    fn test_list_item_price() {
        let raw: RawListItem = serde_json::from_value(json!({
            "navigationUrl": "/x-d1.htm", "count": 2, "priceInfoV2": {"priceWithVat": "9,90 €"}
        }))
        .unwrap();
        let item = raw.into_item();
        assert_eq!(item.price, "9,90 €");
        assert_eq!(item.product_id(), 1);
    }

    #[test]
    fn test_request_bodies() {
        let add = AddToList {
            list_id: 3,
            commodity_id: 4,
            path: "",
            page_type: 0,
        };
        assert_eq!(
            serde_json::to_value(&add).unwrap(),
            json!({"listID": 3, "cId": 4, "path": "", "pageType": 0})
        );

        let fav = AddToFavorites {
            items: BTreeMap::from([("77".to_string(), 1)]),
            list_type: 1,
            country: "SK",
        };
        assert_eq!(
            serde_json::to_value(&fav).unwrap(),
            json!({"items": {"77": 1}, "listType": 1, "country": "SK"})
        );

        let create = CreateList {
            name: "Darčeky",
            list_type: 0,
        };
        assert_eq!(
            serde_json::to_value(&create).unwrap(),
            json!({"name": "Darčeky", "type": 0})
        );
    }
}
