//! API paths.
//!
//! Relative paths resolve against the shop base URL. The whisperer lives
//! on a separate host; its paths are joined onto [`WHISPER_BASE_URL`] (or
//! the override a test installs on the client).

/// Host serving the suggestion endpoint.
pub const WHISPER_BASE_URL: &str = "https://webapi.alza.cz";

/// Shop front page, echoed back to the whisperer as `eshopUrl`.
pub const ESHOP_URL: &str = "https://www.alza.sk/";

/// Visitor ID the site sends for anonymous suggestion requests.
pub const ANONYMOUS_VISITOR: &str = "00000000-0000-0000-0000-000000000000";

/// Country parameter for every country-scoped call.
pub const COUNTRY: &str = "SK";

/// Access-token exchange (cookies in, bearer token out).
pub const ACCESS_TOKEN: &str = "/api/identity/v1/accesstoken";

/// Commodity lists of the current user; the envelope carries the identity.
pub const COMMODITY_LISTS: &str = "/services/restservice.svc/v1/getCommodityLists";

/// List creation.
pub const CREATE_LIST: &str = "/services/restservice.svc/v1/createCommodityList";

/// Removal of a product from a list.
pub const REMOVE_FROM_LIST: &str = "/services/restservice.svc/v1/deleteCommodityFromList";

/// Addition of a product to a list.
pub const ADD_TO_LIST: &str = "/Services/EShopService.svc/AddCommodityToShoppingList";

/// Add to cart.
pub const ORDER_COMMODITY: &str = "/Services/EShopService.svc/OrderCommodity";

/// Cart line update (count 0 removes).
pub const ORDER_UPDATE: &str = "/Services/EShopService.svc/OrderUpdate?country=SK";

/// Primary full-text search.
pub const SEARCH: &str = "/Services/RestService.svc/v5/search";

/// Quote step of fast checkout.
pub const FAST_ORDER_SAVE: &str = "/Services/EShopService.svc/FastOrderSave";

/// Commit step of fast checkout.
pub const FAST_ORDER_SEND: &str = "/Services/EShopService.svc/FastOrderSend";

/// Saved-card payment.
pub const RECURRENT_PAYMENT: &str = "/api/payment/v3/recurrent";

/// Items of one commodity list.
pub fn list_items(list_id: i64) -> String {
    format!("{COMMODITY_LISTS}/{list_id}")
}

/// Favorites addition for a user.
pub fn favorites_items(user_id: &str) -> String {
    format!("/api/v1/users/{user_id}/commodityList/items")
}

/// Account status summary (basket link, order counts).
pub fn status_summary(user_id: &str) -> String {
    format!("/api/users/{user_id}/statusSummary")
}

/// Cart line items; also the DELETE target for clearing.
pub fn cart_items(basket_id: &str) -> String {
    format!("/api/v1/anonymous/baskets/{basket_id}/checkout/cart/items?country={COUNTRY}")
}

/// Cart preview with display fields.
pub fn cart_preview(basket_id: &str) -> String {
    format!("/api/basket/{basket_id}/preview")
}

/// Whisperer path, user-scoped when the identity is known.
pub fn whisper(user_id: &str) -> String {
    if user_id.is_empty() {
        "/api/anonymous/search/whisperer/v1/whisper".to_string()
    } else {
        format!("/api/users/{user_id}/search/whisperer/v1/whisper")
    }
}

/// Active orders.
pub fn active_orders(user_id: &str) -> String {
    format!("/api/users/{user_id}/v1/orders/active")
}

/// Archived orders.
pub fn archived_orders(user_id: &str, limit: usize) -> String {
    format!(
        "/api/users/{user_id}/v1/orders/archive?offset=0&limit={limit}&hideCancelledOrders=false"
    )
}

/// Product detail.
pub fn product_detail(product_id: u64) -> String {
    format!(
        "/api/router/legacy/catalog/product/{product_id}?country={COUNTRY}&electronicContentOnly=False"
    )
}

/// Product availability, user-scoped when the identity is known.
pub fn product_availability(user_id: &str, product_id: u64) -> String {
    if user_id.is_empty() {
        format!("/api/productAvailability/v1/anonymous/products/{product_id}?country={COUNTRY}")
    } else {
        format!(
            "/api/productAvailability/v1/users/{user_id}/products/{product_id}?country={COUNTRY}"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_paths() {
        assert_eq!(
            cart_items("42"),
            "/api/v1/anonymous/baskets/42/checkout/cart/items?country=SK"
        );
        assert_eq!(status_summary("7"), "/api/users/7/statusSummary");
        assert_eq!(
            archived_orders("7", 3),
            "/api/users/7/v1/orders/archive?offset=0&limit=3&hideCancelledOrders=false"
        );
    }

    #[test]
    fn test_identity_dependent_paths() {
        assert_eq!(whisper(""), "/api/anonymous/search/whisperer/v1/whisper");
        assert_eq!(whisper("9"), "/api/users/9/search/whisperer/v1/whisper");
        assert!(product_availability("", 5).contains("/anonymous/products/5"));
        assert!(product_availability("9", 5).contains("/users/9/products/5"));
    }
}
