//! Identity and basket resolution.
//!
//! The token is opaque. The user ID comes back as a side field of the
//! commodity-lists envelope, and the basket ID only as a segment of the
//! basket preview link in the status summary. Both are resolved on demand
//! and cached on the [`Session`].

use alza_core::de::null_as_default;
use alza_core::UserStatus;
use alza_core::extract::basket_id_from_href;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::client::ShopClient;
use crate::endpoints;
use crate::error::{ClientError, ClientResult};
use crate::session::{Basket, Session};

// ============================================================================
// Response Types
// ============================================================================

/// Identity fields of the commodity-lists envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct IdentityEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub basket_cnt: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    basket_products_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    orders_status_info: OrdersStatusInfo,
    #[serde(default)]
    basket_preview_action: Option<PreviewAction>,
    #[serde(default, deserialize_with = "null_as_default")]
    is_alza_plus: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrdersStatusInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    active_orders_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    overdue_orders_count: u32,
}

#[derive(Debug, Default, Deserialize)]
struct PreviewAction {
    #[serde(default)]
    href: Option<String>,
}

impl StatusSummary {
    fn preview_href(&self) -> &str {
        self.basket_preview_action
            .as_ref()
            .and_then(|action| action.href.as_deref())
            .map_or("", str::trim)
    }
}

/// Maps a status summary to a basket state.
fn basket_from_summary(summary: &StatusSummary) -> ClientResult<Basket> {
    let href = summary.preview_href();
    if href.is_empty() {
        return if summary.basket_products_count == 0 {
            Ok(Basket::Empty)
        } else {
            Err(ClientError::MissingBasketLink)
        };
    }

    basket_id_from_href(href)
        .map(Basket::Active)
        .ok_or_else(|| ClientError::MalformedBasketLink(href.to_string()))
}

// ============================================================================
// Resolution
// ============================================================================

impl ShopClient {
    async fn identity_envelope(&self, session: &Session) -> ClientResult<IdentityEnvelope> {
        self.get_json(session, endpoints::COMMODITY_LISTS, "commodity lists")
            .await
    }

    /// Resolves the user ID, caching it on the session.
    ///
    /// # Errors
    ///
    /// [`ClientError::TokenExpired`] when the API reports no user.
    #[instrument(skip(self, session))]
    pub async fn resolve_identity(&self, session: &mut Session) -> ClientResult<String> {
        if !session.user_id().is_empty() {
            return Ok(session.user_id().to_string());
        }

        let envelope = self.identity_envelope(session).await?;
        if envelope.user_id <= 0 {
            warn!(user_id = envelope.user_id, "Token not accepted");
            return Err(ClientError::TokenExpired);
        }

        let user_id = envelope.user_id.to_string();
        debug!(user_id = %user_id, "Identity resolved");
        session.set_user_id(user_id.clone());
        Ok(user_id)
    }

    /// Resolves the active basket ID, caching it on the session.
    ///
    /// Returns `""` when the account has no basket; that is not an error.
    #[instrument(skip(self, session))]
    pub async fn resolve_basket(&self, session: &mut Session) -> ClientResult<String> {
        if *session.basket() != Basket::Unresolved {
            return Ok(session.basket_id().to_string());
        }

        let user_id = self.resolve_identity(session).await?;
        let summary: StatusSummary = self
            .get_json(session, &endpoints::status_summary(&user_id), "status summary")
            .await?;

        let basket = basket_from_summary(&summary)?;
        debug!(
            count = summary.basket_products_count,
            basket = ?basket,
            "Basket resolved"
        );
        session.set_basket(basket);
        Ok(session.basket_id().to_string())
    }

    /// Checks that the session's token is still accepted.
    #[instrument(skip(self, session))]
    pub async fn validate_session(&self, session: &mut Session) -> ClientResult<()> {
        self.resolve_identity(session).await.map(|_| ())
    }

    /// Account summary for `whoami`.
    ///
    /// The status summary call is best-effort: when it fails, the user
    /// fields from the lists envelope are still returned.
    #[instrument(skip(self, session))]
    pub async fn user_status(&self, session: &mut Session) -> ClientResult<UserStatus> {
        let envelope = self.identity_envelope(session).await?;
        if envelope.user_id <= 0 {
            return Err(ClientError::TokenExpired);
        }
        let user_id = envelope.user_id.to_string();
        session.set_user_id(user_id.clone());

        let mut status = UserStatus {
            user_id: envelope.user_id,
            user_name: envelope.user_name,
            basket_count: envelope.basket_cnt,
            ..UserStatus::default()
        };

        let summary = match self
            .get_json::<StatusSummary>(session, &endpoints::status_summary(&user_id), "status summary")
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                debug!(error = %e, "Status summary unavailable, returning basic status");
                return Ok(status);
            }
        };

        status.basket_count = summary.basket_products_count;
        status.orders_count = summary.orders_status_info.active_orders_count
            + summary.orders_status_info.overdue_orders_count;
        status.is_premium = summary.is_alza_plus;

        match basket_from_summary(&summary) {
            Ok(basket) => {
                session.set_basket(basket);
                status.basket_id = session.basket_id().to_string();
            }
            Err(e) => debug!(error = %e, "Basket link unusable"),
        }

        info!(user_id = status.user_id, "User status loaded");
        Ok(status)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summary(value: serde_json::Value) -> StatusSummary {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_basket_from_absolute_link() {
        let s = summary(json!({
            "basketProductsCount": 2,
            "basketPreviewAction": {"href": "https://host/api/basket/1538710316/preview"}
        }));
        assert_eq!(
            basket_from_summary(&s).unwrap(),
            Basket::Active("1538710316".into())
        );
    }

    #[test]
    fn test_empty_basket_without_link() {
        let s = summary(json!({"basketProductsCount": 0, "basketPreviewAction": {"href": ""}}));
        assert_eq!(basket_from_summary(&s).unwrap(), Basket::Empty);

        let s = summary(json!({}));
        assert_eq!(basket_from_summary(&s).unwrap(), Basket::Empty);
    }

    #[test]
    fn test_null_counts_read_as_zero() {
        let s = summary(json!({
            "basketProductsCount": null,
            "ordersStatusInfo": {"activeOrdersCount": null, "overdueOrdersCount": 2},
            "basketPreviewAction": {"href": null},
            "isAlzaPlus": null
        }));
        assert_eq!(s.basket_products_count, 0);
        assert_eq!(s.orders_status_info.active_orders_count, 0);
        assert_eq!(s.orders_status_info.overdue_orders_count, 2);
        assert_eq!(basket_from_summary(&s).unwrap(), Basket::Empty);

        let envelope: IdentityEnvelope =
            serde_json::from_value(json!({"user_id": 42, "user_name": null, "basket_cnt": null}))
                .unwrap();
        assert_eq!(envelope.user_id, 42);
        assert_eq!(envelope.basket_cnt, 0);
    }

    #[test]
    fn test_items_without_link() {
        let s = summary(json!({"basketProductsCount": 3, "basketPreviewAction": null}));
        assert!(matches!(
            basket_from_summary(&s),
            Err(ClientError::MissingBasketLink)
        ));
    }

    #[test]
    fn test_malformed_link() {
        let s = summary(json!({
            "basketProductsCount": 1,
            "basketPreviewAction": {"href": "https://host/api/cart/1/preview"}
        }));
        assert!(matches!(
            basket_from_summary(&s),
            Err(ClientError::MalformedBasketLink(href)) if href.contains("/cart/1/")
        ));
    }

    #[test]
    fn test_envelope_defaults() {
        let envelope: IdentityEnvelope = serde_json::from_value(json!({"data": []})).unwrap();
        assert_eq!(envelope.user_id, 0);
        assert!(envelope.user_name.is_empty());
    }
}
