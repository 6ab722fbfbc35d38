//! Product detail.
//!
//! The detail endpoint has carried three generations of price fields
//! (`priceInfoV3`, `priceInfoV2`, plain `price`) and serves whichever the
//! product was last indexed with. Description and availability come from
//! separate calls that are allowed to fail.

use std::sync::LazyLock;

use alza_core::de::null_as_default;
use alza_core::extract::normalize_external_url;
use alza_core::{FieldProbe, ParameterGroup, ProductDetail, ProductParameter, ProductVariant, PromoPrice};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::client::ShopClient;
use crate::endpoints;
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct DetailResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    data: DetailData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailData {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    price: String,
    #[serde(default, deserialize_with = "null_as_default")]
    ga_price: f64,
    #[serde(default)]
    sale_percentage: Option<i32>,
    #[serde(default)]
    price_info_v2: Option<PriceInfoV2>,
    #[serde(default)]
    price_info_v3: Option<PriceInfoV3>,
    #[serde(default, deserialize_with = "null_as_default")]
    cash_back_price_label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    cash_back_price: String,
    #[serde(default, deserialize_with = "null_as_default")]
    description_before_discount: String,
    #[serde(default, deserialize_with = "null_as_default")]
    desc_page_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    parameter_groups: Vec<RawParameterGroup>,
    #[serde(default)]
    product_variants_info: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceInfoV2 {
    #[serde(default, deserialize_with = "null_as_default")]
    price_with_vat: String,
    #[serde(default, deserialize_with = "null_as_default")]
    price_without_vat: String,
    #[serde(default, deserialize_with = "null_as_default")]
    price_no_currency: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    promo_prices: Vec<RawPromoPrice>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceInfoV3 {
    #[serde(default, deserialize_with = "null_as_default")]
    promo_prices: Vec<RawPromoPrice>,
    #[serde(default, deserialize_with = "null_as_default")]
    main_price_tag: MainPriceTag,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MainPriceTag {
    #[serde(default, deserialize_with = "null_as_default")]
    primary_price: String,
    #[serde(default, deserialize_with = "null_as_default")]
    primary_price_no_currency: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    secondary_price: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPromoPrice {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    formatted_price: String,
    #[serde(default, deserialize_with = "null_as_default")]
    primary_price: String,
    #[serde(default, deserialize_with = "null_as_default")]
    unformatted_price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    discount_coupon_code: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawParameterGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    params: Vec<RawParameter>,
}

#[derive(Debug, Default, Deserialize)]
struct RawParameter {
    #[serde(default, deserialize_with = "null_as_default")]
    name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    values: Vec<RawParameterValue>,
}

#[derive(Debug, Default, Deserialize)]
struct RawParameterValue {
    #[serde(default, deserialize_with = "null_as_default")]
    desc: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawVariant {
    #[serde(default, rename = "Id", alias = "id")]
    id: u64,
    #[serde(default, rename = "Name", alias = "name")]
    name: String,
    #[serde(default, rename = "ImageUrl", alias = "imageUrl")]
    image_url: String,
    #[serde(default, rename = "IsSelected", alias = "isSelected")]
    is_selected: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Availability {
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    expected_stock_date: String,
}

// ============================================================================
// Field Selection
// ============================================================================

impl DetailData {
    fn v3_tag(&self) -> Option<&MainPriceTag> {
        self.price_info_v3.as_ref().map(|v3| &v3.main_price_tag)
    }

    fn pick_price(&self) -> String {
        if let Some(tag) = self.v3_tag().filter(|t| !t.primary_price.is_empty()) {
            return tag.primary_price.clone();
        }
        if let Some(v2) = self.price_info_v2.as_ref().filter(|v2| !v2.price_with_vat.is_empty()) {
            return v2.price_with_vat.clone();
        }
        self.price.clone()
    }

    fn pick_price_without_vat(&self) -> String {
        if let Some(tag) = self.v3_tag().filter(|t| !t.secondary_price.is_empty()) {
            return tag.secondary_price.clone();
        }
        self.price_info_v2
            .as_ref()
            .map(|v2| v2.price_without_vat.clone())
            .unwrap_or_default()
    }

    fn pick_price_no_currency(&self) -> f64 {
        if let Some(tag) = self.v3_tag().filter(|t| t.primary_price_no_currency > 0.0) {
            return tag.primary_price_no_currency;
        }
        if let Some(v2) = self.price_info_v2.as_ref().filter(|v2| v2.price_no_currency > 0.0) {
            return v2.price_no_currency;
        }
        self.ga_price
    }

    fn pick_promo_prices(&self) -> Vec<PromoPrice> {
        let v3 = self.price_info_v3.as_ref().map(|v3| &v3.promo_prices);
        let v2 = self.price_info_v2.as_ref().map(|v2| &v2.promo_prices);
        v3.filter(|p| !p.is_empty())
            .or(v2)
            .map(|promos| promos.iter().map(RawPromoPrice::to_promo).collect())
            .unwrap_or_default()
    }
}

impl RawPromoPrice {
    fn to_promo(&self) -> PromoPrice {
        let price = if self.primary_price.is_empty() {
            &self.formatted_price
        } else {
            &self.primary_price
        };
        PromoPrice {
            name: self.name.clone(),
            price: price.clone(),
            code: self.discount_coupon_code.clone(),
            unformatted_price: self.unformatted_price.max(0.0),
        }
    }
}

/// Keeps groups and parameters that have a name and at least one value.
fn map_parameters(groups: Vec<RawParameterGroup>) -> Vec<ParameterGroup> {
    groups
        .into_iter()
        .filter(|group| !group.name.is_empty())
        .filter_map(|group| {
            let parameters: Vec<ProductParameter> = group
                .params
                .into_iter()
                .filter(|param| !param.name.is_empty())
                .filter_map(|param| {
                    let values: Vec<String> = param
                        .values
                        .into_iter()
                        .map(|v| v.desc)
                        .filter(|desc| !desc.is_empty())
                        .collect();
                    (!values.is_empty()).then_some(ProductParameter {
                        name: param.name,
                        values,
                    })
                })
                .collect();
            (!parameters.is_empty()).then_some(ParameterGroup {
                name: group.name,
                parameters,
            })
        })
        .collect()
}

/// Reads variants from either key casing of the variants block.
fn map_variants(info: Option<&Value>) -> ClientResult<Vec<ProductVariant>> {
    let Some(info) = info else {
        return Ok(Vec::new());
    };
    let Some(list) = FieldProbe::new()
        .or(&["ProductVariants"])
        .or(&["productVariants"])
        .value(info)
    else {
        return Ok(Vec::new());
    };

    let raw: Vec<RawVariant> = serde_json::from_value(list.clone())
        .map_err(|source| ClientError::parse("product variants", source))?;
    Ok(raw
        .into_iter()
        .map(|v| ProductVariant {
            id: v.id,
            name: v.name,
            image_url: v.image_url,
            is_selected: v.is_selected,
        })
        .collect())
}

// ============================================================================
// Description
// ============================================================================

static HIDDEN_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style|noscript)\b.*?</(?:script|style|noscript)\s*>")
        .expect("Invalid regex")
});

static TEXT_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:h1|h2|h3|p|li)\b[^>]*>(.*?)</(?:h1|h2|h3|p|li)\s*>")
        .expect("Invalid regex")
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));

static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("Invalid regex"));

fn unescape_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .or_else(|| entity.strip_prefix('#').map(str::parse::<u32>))
                    .and_then(Result::ok)
                    .and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn looks_like_cookie_notice(text: &str) -> bool {
    text.to_lowercase().contains("cookie")
}

/// Extracts readable text from a description page.
///
/// Headings, paragraphs and list items become one line each.
pub fn extract_description(html: &str) -> String {
    let visible = HIDDEN_BLOCK_RE.replace_all(html, " ");
    TEXT_BLOCK_RE
        .captures_iter(&visible)
        .filter_map(|caps| {
            let inner = TAG_RE.replace_all(&caps[1], " ");
            let text = unescape_entities(&inner)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            (!text.is_empty() && !looks_like_cookie_notice(&text)).then_some(text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Operations
// ============================================================================

impl ShopClient {
    /// Fetches rich product information.
    ///
    /// Description and availability are filled in when their calls
    /// succeed and left empty otherwise.
    #[instrument(skip(self, session))]
    pub async fn product(&self, session: &mut Session, product_id: u64) -> ClientResult<ProductDetail> {
        let response: DetailResponse = self
            .get_json(session, &endpoints::product_detail(product_id), "product")
            .await?;
        let data = response.data;

        let mut detail = ProductDetail {
            id: product_id,
            price: data.pick_price(),
            price_without_vat: data.pick_price_without_vat(),
            price_no_currency: data.pick_price_no_currency(),
            promo_prices: data.pick_promo_prices(),
            variants: map_variants(data.product_variants_info.as_ref())?,
            discount_percent: data.sale_percentage,
            name: data.name,
            cash_back_label: data.cash_back_price_label,
            cash_back_price: data.cash_back_price,
            discount_description: data.description_before_discount,
            parameters: map_parameters(data.parameter_groups),
            ..ProductDetail::default()
        };

        if !data.desc_page_url.is_empty() {
            let url = normalize_external_url(&data.desc_page_url);
            match self.http().get(&url, None).await {
                Ok(page) => detail.description = extract_description(&page.body),
                Err(e) => debug!(error = %e, "Description unavailable"),
            }
        }

        if session.user_id().is_empty() {
            if let Err(e) = self.resolve_identity(session).await {
                debug!(error = %e, "Identity unavailable, using anonymous availability");
            }
        }
        match self
            .get_json::<Availability>(
                session,
                &endpoints::product_availability(session.user_id(), product_id),
                "availability",
            )
            .await
        {
            Ok(availability) => {
                detail.availability = availability.title;
                detail.availability_detail = availability.description;
                detail.expected_stock_date = availability.expected_stock_date;
            }
            Err(e) => debug!(error = %e, "Availability unavailable"),
        }

        Ok(detail)
    }
}

// ============================================================================
// Tests
// ============================================================================
