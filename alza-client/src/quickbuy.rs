//! Fast checkout.
//!
//! A purchase is three dependent calls: a quote (`FastOrderSave`), a
//! commit (`FastOrderSend`) and a saved-card payment. Stages advance
//! strictly in order:
//!
//! ```text
//! Init -> Validated -> Quoted -> Committed -> PaymentAttempted -> Done
//!                        \-> Done (quote only)
//! ```
//!
//! Everything up to the commit fails the run. After the commit the order
//! exists, so a payment failure is recorded in the result instead.

use std::fmt;

use alza_core::{FieldProbe, PaymentStatus, QuickBuyConfig, QuickBuyResult};
use alza_fetch::user_agent;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::client::ShopClient;
use crate::endpoints;
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

// ============================================================================
// Stages
// ============================================================================

/// Purchase progress, as logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing checked yet.
    Init,
    /// Configuration complete for the selected mode.
    Validated,
    /// Price computed by the quote call.
    Quoted,
    /// Order placed.
    Committed,
    /// Payment call made (either outcome).
    PaymentAttempted,
    /// Terminal.
    Done,
}

impl Stage {
    /// Name used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Validated => "validated",
            Self::Quoted => "quoted",
            Self::Committed => "committed",
            Self::PaymentAttempted => "payment_attempted",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Request Bodies
// ============================================================================

/// One ordered product.
#[derive(Debug, Clone, Serialize)]
pub struct FastOrderItem {
    /// Product ID.
    #[serde(rename = "CommodityId")]
    pub commodity_id: u64,
    /// Quantity.
    #[serde(rename = "Count")]
    pub count: u32,
}

/// The options object the checkout dialog posts.
///
/// Most flags are constants the site sends for a logged-in, box-delivered
/// order. Key spellings (including `PrefferedCard` and the two
/// differently cased `SelectedPayment`s) match the site.
#[derive(Debug, Clone, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct FastOrderOptions {
    #[serde(rename = "Items")]
    items: Vec<FastOrderItem>,
    #[serde(rename = "AlzaBoxId")]
    alzabox_id: u64,
    #[serde(rename = "DeliveryId")]
    delivery_id: u64,
    #[serde(rename = "PaymentId")]
    payment_id: String,
    #[serde(rename = "PrefferedCard", skip_serializing_if = "String::is_empty")]
    preferred_card: String,
    #[serde(rename = "IsAlzaPlus")]
    is_alza_plus: bool,
    #[serde(rename = "IsLoggedIn")]
    is_logged_in: bool,
    #[serde(rename = "Source")]
    source: &'static str,
    #[serde(rename = "IsDelayedPayment")]
    is_delayed_payment: bool,
    #[serde(rename = "wasDeliveryPaymentChanged")]
    was_delivery_payment_changed: bool,
    #[serde(rename = "ShowAlert")]
    show_alert: bool,
    #[serde(rename = "DeliveryAddressId")]
    delivery_address_id: i64,
    #[serde(rename = "IsAddressRequired")]
    is_address_required: bool,
    #[serde(rename = "IsTretinka")]
    is_tretinka: bool,
    #[serde(rename = "IsVirtual")]
    is_virtual: bool,
    #[serde(rename = "NeedAddress")]
    need_address: bool,
    #[serde(rename = "ShowPaymentCards")]
    show_payment_cards: bool,
    #[serde(rename = "IsBusinessCardSelected")]
    is_business_card_selected: bool,
    #[serde(rename = "AddressId")]
    address_id: i64,
    #[serde(rename = "PromoCodes")]
    promo_codes: Vec<String>,
    #[serde(rename = "selectedPayment")]
    selected_payment_lower: Option<()>,
    #[serde(rename = "Step")]
    step: Option<()>,
    #[serde(rename = "IsDialogVisible")]
    is_dialog_visible: bool,
    #[serde(rename = "SendCallback")]
    send_callback: Option<()>,
    #[serde(rename = "Note")]
    note: Option<()>,
    #[serde(rename = "SelectedPayment")]
    selected_payment: Option<()>,
    #[serde(rename = "AlzaPremium")]
    alza_premium: bool,
    #[serde(rename = "TotalPriceDec")]
    total_price_dec: f64,
}

impl FastOrderOptions {
    /// Options for the quote step.
    pub fn new(product_id: u64, quantity: u32, config: &QuickBuyConfig) -> Self {
        Self {
            items: vec![FastOrderItem {
                commodity_id: product_id,
                count: quantity,
            }],
            alzabox_id: config.alzabox_id,
            delivery_id: config.delivery_id,
            payment_id: config.payment_id.clone(),
            preferred_card: config.card_id.clone(),
            is_alza_plus: config.is_alza_plus,
            is_logged_in: true,
            source: "Unknown",
            is_delayed_payment: false,
            was_delivery_payment_changed: true,
            show_alert: false,
            delivery_address_id: -1,
            is_address_required: false,
            is_tretinka: false,
            is_virtual: false,
            need_address: false,
            show_payment_cards: true,
            is_business_card_selected: false,
            address_id: -1,
            promo_codes: config.promo_codes.clone(),
            selected_payment_lower: None,
            step: None,
            is_dialog_visible: false,
            send_callback: None,
            note: None,
            selected_payment: None,
            alza_premium: false,
            total_price_dec: 0.0,
        }
    }

    /// Turns quote options into commit options for the quoted total.
    #[must_use]
    pub fn for_commit(mut self, total_price: f64) -> Self {
        self.total_price_dec = total_price;
        self.is_address_required = true;
        self
    }
}

#[derive(Debug, Serialize)]
struct FastOrderRequest<'a> {
    options: &'a FastOrderOptions,
}

/// Browser block of the payment request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrowserInfo<'a> {
    screen_width: u32,
    screen_height: u32,
    color_depth: u32,
    user_agent: &'a str,
    time_zone_offset: i32,
    language: &'a str,
    java_enabled: bool,
    device_fingerprint: &'a str,
}

/// Saved-card payment request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentRequest<'a> {
    browser: BrowserInfo<'a>,
    card_id: &'a str,
    fast_order: bool,
    order_id: &'a str,
    after_order_payment_id: i64,
    device_fingerprint: &'a str,
}

impl<'a> PaymentRequest<'a> {
    fn new(config: &'a QuickBuyConfig, order_id: &'a str, after_order_payment_id: i64) -> Self {
        Self {
            browser: BrowserInfo {
                screen_width: 1800,
                screen_height: 1169,
                color_depth: 30,
                user_agent: user_agent(),
                time_zone_offset: -60,
                language: "sk-SK",
                java_enabled: false,
                device_fingerprint: &config.visitor_id,
            },
            card_id: &config.card_id,
            fast_order: true,
            order_id,
            after_order_payment_id,
            device_fingerprint: &config.visitor_id,
        }
    }
}

// ============================================================================
// Response Probes
// ============================================================================

/// Values read from the quote response.
#[derive(Debug, Clone, PartialEq)]
struct Quote {
    total_price: f64,
    after_order_payment_id: i64,
}

/// Values read from the commit response.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Commit {
    order_id: String,
    after_order_payment_id: i64,
}

/// Fails the step when the API put an error message in the envelope.
fn check_rejected(doc: &Value, step: &'static str) -> ClientResult<()> {
    match FieldProbe::new().or(&["d", "ErrorMessage"]).string(doc) {
        Some(message) => Err(ClientError::RemoteRejected { step, message }),
        None => Ok(()),
    }
}

fn probe_id(probe: &FieldProbe, doc: &Value) -> i64 {
    probe
        .string(doc)
        .and_then(|id| id.parse().ok())
        .unwrap_or(0)
}

fn read_quote(doc: &Value) -> ClientResult<Quote> {
    check_rejected(doc, "save")?;
    let total_price = FieldProbe::new()
        .or(&["d", "TotalPrice"])
        .or(&["d", "Data", "TotalPriceDec"])
        .f64(doc)
        .unwrap_or(0.0);
    let payment = FieldProbe::new()
        .or(&["d", "AfterOrderPaymentId"])
        .or(&["d", "Data", "AfterOrderPaymentId"]);
    Ok(Quote {
        total_price,
        after_order_payment_id: probe_id(&payment, doc),
    })
}

fn read_commit(doc: &Value, quote: &Quote) -> ClientResult<Commit> {
    check_rejected(doc, "send")?;
    let order_id = FieldProbe::new()
        .or(&["d", "Code"])
        .or(&["d", "OrderId"])
        .string(doc)
        .unwrap_or_default();
    let after_order_payment_id =
        match probe_id(&FieldProbe::new().or(&["d", "AfterOrderPaymentId"]), doc) {
            0 => quote.after_order_payment_id,
            id => id,
        };
    Ok(Commit {
        order_id,
        after_order_payment_id,
    })
}

// ============================================================================
// Orchestration
// ============================================================================

impl ShopClient {
    /// Runs a fast checkout for one product.
    ///
    /// Dry runs call nothing. Quote-only runs stop after the quote. Full
    /// runs place the order and attempt the payment; a failed payment
    /// still returns a successful result with [`PaymentStatus::Uncertain`].
    ///
    /// # Errors
    ///
    /// Validation failures, transport failures before the commit, and
    /// error messages returned by the quote or commit call.
    #[instrument(skip(self, session, config), fields(mode = config.mode_label()))]
    pub async fn quick_buy(
        &self,
        session: &Session,
        product_id: u64,
        quantity: u32,
        config: &QuickBuyConfig,
    ) -> ClientResult<QuickBuyResult> {
        info!(stage = %Stage::Init, product_id, quantity, "Starting purchase");
        config.validate()?;
        info!(stage = %Stage::Validated, "Configuration valid");

        if config.dry_run {
            info!(stage = %Stage::Done, "Dry run, nothing sent");
            return Ok(QuickBuyResult::dry_run());
        }

        let options = FastOrderOptions::new(product_id, quantity, config);
        let doc: Value = self
            .post_json(
                session,
                endpoints::FAST_ORDER_SAVE,
                &FastOrderRequest { options: &options },
                "fast order save",
            )
            .await?;
        let quote = read_quote(&doc)?;
        info!(stage = %Stage::Quoted, total = quote.total_price, "Quote received");

        if config.quote_only {
            info!(stage = %Stage::Done, "Quote only, order not sent");
            return Ok(QuickBuyResult::quote(quote.total_price));
        }

        let options = options.for_commit(quote.total_price);
        let doc: Value = self
            .post_json(
                session,
                endpoints::FAST_ORDER_SEND,
                &FastOrderRequest { options: &options },
                "fast order send",
            )
            .await?;
        let commit = read_commit(&doc, &quote)?;
        if commit.order_id.is_empty() {
            warn!(stage = %Stage::Committed, "Commit response carried no order ID");
        }
        info!(stage = %Stage::Committed, order_id = %commit.order_id, "Order placed");

        let payment_body = PaymentRequest::new(config, &commit.order_id, commit.after_order_payment_id);
        let payment = match self
            .post(session, endpoints::RECURRENT_PAYMENT, &payment_body)
            .await
        {
            Ok(_) => PaymentStatus::Confirmed,
            Err(e) => {
                warn!(
                    stage = %Stage::PaymentAttempted,
                    order_id = %commit.order_id,
                    error = %e,
                    "Payment call failed, order needs checking"
                );
                PaymentStatus::Uncertain {
                    reason: e.to_string(),
                }
            }
        };
        info!(stage = %Stage::PaymentAttempted, payment = ?payment, "Payment step finished");

        info!(stage = %Stage::Done, "Purchase finished");
        Ok(QuickBuyResult::placed(commit.order_id, quote.total_price, payment))
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

    fn config() -> QuickBuyConfig {
        QuickBuyConfig {
            alzabox_id: 1_009_905,
            delivery_id: 2680,
            payment_id: "216".into(),
            card_id: "card-1".into(),
            visitor_id: "fp-1".into(),
            promo_codes: vec!["SAVE10".into()],
            ..QuickBuyConfig::default()
        }
    }

    #[test]
    fn test_options_wire_keys() {
        let value = serde_json::to_value(FastOrderOptions::new(42, 2, &config())).unwrap();
        assert_eq!(value["Items"], json!([{"CommodityId": 42, "Count": 2}]));
        assert_eq!(value["AlzaBoxId"], 1_009_905);
        assert_eq!(value["PaymentId"], "216");
        assert_eq!(value["PrefferedCard"], "card-1");
        assert_eq!(value["IsLoggedIn"], true);
        assert_eq!(value["Source"], "Unknown");
        assert_eq!(value["wasDeliveryPaymentChanged"], true);
        assert_eq!(value["DeliveryAddressId"], -1);
        assert_eq!(value["AddressId"], -1);
        assert_eq!(value["IsAddressRequired"], false);
        assert_eq!(value["selectedPayment"], Value::Null);
        assert_eq!(value["SelectedPayment"], Value::Null);
        assert_eq!(value["PromoCodes"], json!(["SAVE10"]));
        assert_eq!(value["TotalPriceDec"], 0.0);
    }

    #[test]
    fn test_empty_card_omitted() {
        let config = QuickBuyConfig {
            card_id: String::new(),
            ..config()
        };
        let value = serde_json::to_value(FastOrderOptions::new(1, 1, &config)).unwrap();
        assert!(value.get("PrefferedCard").is_none());
    }

    #[test]
    fn test_commit_options() {
        let options = FastOrderOptions::new(1, 1, &config()).for_commit(99.9);
        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(value["TotalPriceDec"], 99.9);
        assert_eq!(value["IsAddressRequired"], true);
    }

    #[test]
    fn test_quote_total_fallback() {
        let doc = json!({"d": {"TotalPrice": 0, "Data": {"TotalPriceDec": 24.9, "AfterOrderPaymentId": 555}}});
        let quote = read_quote(&doc).unwrap();
        assert!((quote.total_price - 24.9).abs() < f64::EPSILON);
        assert_eq!(quote.after_order_payment_id, 555);
    }

    #[test]
    fn test_quote_rejected() {
        let doc = json!({"d": {"ErrorMessage": "Produkt nie je skladom"}});
        let err = read_quote(&doc).unwrap_err();
        assert!(matches!(
            err,
            ClientError::RemoteRejected { step: "save", ref message } if message == "Produkt nie je skladom"
        ));
    }

    #[test]
    fn test_commit_order_id_fallback() {
        let quote = Quote {
            total_price: 10.0,
            after_order_payment_id: 7,
        };
        let commit = read_commit(&json!({"d": {"Code": "", "OrderId": "123456"}}), &quote).unwrap();
        assert_eq!(commit.order_id, "123456");
        assert_eq!(commit.after_order_payment_id, 7);

        let commit = read_commit(
            &json!({"d": {"Code": "987", "AfterOrderPaymentId": 8}}),
            &quote,
        )
        .unwrap();
        assert_eq!(commit.order_id, "987");
        assert_eq!(commit.after_order_payment_id, 8);
    }

    #[test]
    fn test_payment_body() {
        let config = config();
        let value = serde_json::to_value(PaymentRequest::new(&config, "987", 8)).unwrap();
        assert_eq!(value["browser"]["screenWidth"], 1800);
        assert_eq!(value["browser"]["screenHeight"], 1169);
        assert_eq!(value["browser"]["colorDepth"], 30);
        assert_eq!(value["browser"]["timeZoneOffset"], -60);
        assert_eq!(value["browser"]["language"], "sk-SK");
        assert_eq!(value["browser"]["deviceFingerprint"], "fp-1");
        assert_eq!(value["cardId"], "card-1");
        assert_eq!(value["fastOrder"], true);
        assert_eq!(value["orderId"], "987");
        assert_eq!(value["afterOrderPaymentId"], 8);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::PaymentAttempted.to_string(), "payment_attempted");
        assert_eq!(Stage::Init.as_str(), "init");
    }
}
