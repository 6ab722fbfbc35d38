//! Product detail types.

use serde::{Deserialize, Serialize};

/// Rich product information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    /// Product ID.
    pub id: u64,
    /// Product name.
    pub name: String,
    /// Formatted price with VAT.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub price: String,
    /// Formatted price without VAT.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub price_without_vat: String,
    /// Numeric price.
    #[serde(default)]
    pub price_no_currency: f64,
    /// Discount percentage, if discounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<i32>,
    /// Cash-back promo label.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cash_back_label: String,
    /// Cash-back amount.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cash_back_price: String,
    /// Original price text shown before a discount.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub discount_description: String,
    /// Promo prices (coupon or membership).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub promo_prices: Vec<PromoPrice>,
    /// Parameter groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterGroup>,
    /// Product variants.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<ProductVariant>,
    /// Availability headline.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub availability: String,
    /// Availability detail.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub availability_detail: String,
    /// Expected restock date text.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub expected_stock_date: String,
    /// Plain-text description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// A promotional price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoPrice {
    /// Promo name.
    pub name: String,
    /// Formatted price.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub price: String,
    /// Coupon code that unlocks the price.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
    /// Numeric price (0 when unknown).
    #[serde(default)]
    pub unformatted_price: f64,
}

/// A named group of parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterGroup {
    /// Group name.
    pub name: String,
    /// Parameters in the group.
    pub parameters: Vec<ProductParameter>,
}

/// A single product parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductParameter {
    /// Parameter name.
    pub name: String,
    /// Parameter values.
    pub values: Vec<String>,
}

/// A product variant (colour, capacity, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    /// Variant product ID.
    pub id: u64,
    /// Variant name.
    pub name: String,
    /// Variant image URL.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_url: String,
    /// Whether this is the variant being viewed.
    #[serde(default)]
    pub is_selected: bool,
}
