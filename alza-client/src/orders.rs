//! Order history.
//!
//! Active orders and archived orders come from different endpoints with
//! different shapes. Active orders go first, then the archive fills what
//! is left of the limit.

use alza_core::de::null_as_default;
use alza_core::extract::format_order_date;
use alza_core::{Order, OrderPage};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::client::ShopClient;
use crate::endpoints;
use crate::error::ClientResult;
use crate::session::Session;

/// Orders returned when the caller gives no limit.
pub const DEFAULT_ORDER_LIMIT: usize = 10;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct ActiveOrders {
    #[serde(default, deserialize_with = "null_as_default")]
    groups: Vec<ActiveGroup>,
}

#[derive(Debug, Default, Deserialize)]
struct ActiveGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    orders: Vec<ActiveOrder>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActiveOrder {
    #[serde(default, deserialize_with = "null_as_default")]
    order_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    created: String,
    #[serde(default, deserialize_with = "null_as_default")]
    parts: Vec<OrderPart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderPart {
    #[serde(default, deserialize_with = "null_as_default")]
    status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    total_price: String,
}

#[derive(Debug, Default, Deserialize)]
struct ArchivedOrders {
    #[serde(default, deserialize_with = "null_as_default")]
    paging: Paging,
    #[serde(default, deserialize_with = "null_as_default")]
    value: Vec<ArchivedOrder>,
}

#[derive(Debug, Default, Deserialize)]
struct Paging {
    #[serde(default, deserialize_with = "null_as_default")]
    size: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArchivedOrder {
    #[serde(default, deserialize_with = "null_as_default")]
    order_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    created: String,
    #[serde(default, deserialize_with = "null_as_default")]
    state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    total_price: String,
}

impl ActiveOrders {
    /// Flattens the groups; status and total come from the first part.
    fn into_orders(self) -> Vec<Order> {
        self.groups
            .into_iter()
            .flat_map(|group| group.orders)
            .map(|order| {
                let first = order.parts.into_iter().next().unwrap_or_default();
                Order {
                    id: order.order_id,
                    date: format_order_date(&order.created),
                    status: first.status,
                    total_price: first.total_price,
                }
            })
            .collect()
    }
}

impl ArchivedOrder {
    fn into_order(self) -> Order {
        Order {
            id: self.order_id,
            date: format_order_date(&self.created),
            status: self.state,
            total_price: self.total_price,
        }
    }
}

/// How many archived orders to request for a given limit.
///
/// The archive call also supplies the total count, so it is made even
/// when the active orders already fill the limit.
fn archive_fetch_limit(limit: usize, active: usize) -> usize {
    limit.saturating_sub(active).max(1)
}

/// Combines both listings into one capped page.
fn merge_orders(active: Vec<Order>, archive: ArchivedOrders, limit: usize) -> OrderPage {
    let active_count = active.len();
    let remaining = limit.saturating_sub(active_count);

    let mut orders = active;
    if remaining > 0 {
        orders.extend(archive.value.into_iter().map(ArchivedOrder::into_order));
    }
    orders.truncate(limit);

    OrderPage {
        orders,
        total: archive.paging.size + active_count as u64,
    }
}

// ============================================================================
// Operations
// ============================================================================

impl ShopClient {
    /// Lists recent orders, active first.
    ///
    /// A `limit` of 0 means [`DEFAULT_ORDER_LIMIT`].
    #[instrument(skip(self, session))]
    pub async fn orders(&self, session: &mut Session, limit: usize) -> ClientResult<OrderPage> {
        let limit = if limit == 0 { DEFAULT_ORDER_LIMIT } else { limit };
        let user_id = self.resolve_identity(session).await?;

        let active: ActiveOrders = self
            .get_json(session, &endpoints::active_orders(&user_id), "active orders")
            .await?;
        let active = active.into_orders();

        let archive_limit = archive_fetch_limit(limit, active.len());
        let archive: ArchivedOrders = self
            .get_json(
                session,
                &endpoints::archived_orders(&user_id, archive_limit),
                "archived orders",
            )
            .await?;

        let page = merge_orders(active, archive, limit);
        debug!(count = page.orders.len(), total = page.total, "Orders loaded");
        Ok(page)
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

    fn archive(size: u64, ids: &[&str]) -> ArchivedOrders {
        ArchivedOrders {
            paging: Paging { size },
            value: ids
                .iter()
                .map(|id| ArchivedOrder {
                    order_id: (*id).to_string(),
                    state: "Vybavená".into(),
                    ..ArchivedOrder::default()
                })
                .collect(),
        }
    }

    fn active(ids: &[&str]) -> Vec<Order> {
        ids.iter()
            .map(|id| Order {
                id: (*id).to_string(),
                ..Order::default()
            })
            .collect()
    }

    #[test]
    fn test_active_orders_use_first_part() {
        let parsed: ActiveOrders = serde_json::from_value(json!({
            "groups": [{"orders": [
                {"orderId": "A1", "created": "2024-05-01T08:00:00+02:00",
                 "parts": [{"status": "Expedovaná", "totalPrice": "10 €"},
                           {"status": "Other", "totalPrice": "1 €"}]},
                {"orderId": "A2", "created": "", "parts": []}
            ]}]
        }))
        .unwrap();

        let orders = parsed.into_orders();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].date, "2024-05-01");
        assert_eq!(orders[0].status, "Expedovaná");
        assert_eq!(orders[0].total_price, "10 €");
        assert_eq!(orders[1].status, "");
    }

    #[test]
    fn test_archive_limit_never_zero() {
        assert_eq!(archive_fetch_limit(10, 3), 7);
        assert_eq!(archive_fetch_limit(2, 5), 1);
        assert_eq!(archive_fetch_limit(3, 3), 1);
    }

    #[test]
    fn test_merge_fills_remaining() {
        let page = merge_orders(active(&["A1"]), archive(40, &["B1", "B2", "B3"]), 3);
        let ids: Vec<_> = page.orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "B1", "B2"]);
        assert_eq!(page.total, 41);
    }

    #[test]
    fn test_merge_skips_archive_when_full() {
        let page = merge_orders(active(&["A1", "A2", "A3"]), archive(12, &["B1"]), 2);
        let ids: Vec<_> = page.orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A2"]);
        assert_eq!(page.total, 15);
    }
}
